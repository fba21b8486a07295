//! Two-queue Cuthill-McKee numbering, level by level.

use super::{Queue, Sequence, Walk, out_of_level};
use crate::combine::Combined;
use crate::error::{Error, Result};
use crate::graph::{Graph, Mark, Marks};
use crate::scratch::Frame;
use crate::sort;

/// Numbers every node of `c`. Degree ties keep discovery order; the degree sort runs
/// increasing when the walk starts at the diameter start and decreasing otherwise, matching
/// the direction `seq` hands out indices in.
pub(crate) fn number(
    g: &Graph<'_>,
    marks: &mut Marks,
    c: &Combined<'_>,
    walk: Walk,
    seq: &mut Sequence<'_>,
    frame: &mut Frame<'_>,
) -> Result<()> {
    let width = c.list.width();
    let mut current = Queue::new(frame.take(width)?);
    let mut next = Queue::new(frame.take(width)?);
    let increasing = walk.from_start();

    let root = walk.root(c);
    current.push(root)?;
    marks.queue(root);

    for step in 0..c.list.depth() {
        let level = c.list.level(walk.level(step));
        let mut done = 0usize;
        loop {
            while let Some(v) = current.pop() {
                seq.assign(marks, v);
                done += 1;

                let same_mark = current.mark();
                let next_mark = next.mark();
                for w in g.neighbors(v) {
                    match marks.get(w) {
                        Mark::Numbered => {}
                        Mark::Queued => {
                            let s = walk.step_of(c, w)?;
                            if s != step && s != step + 1 {
                                return Err(out_of_level(v, w, step, s));
                            }
                        }
                        Mark::Free => {
                            let s = walk.step_of(c, w)?;
                            if s == step {
                                current.push(w)?;
                            } else if s == step + 1 {
                                next.push(w)?;
                            } else {
                                return Err(out_of_level(v, w, step, s));
                            }
                            marks.queue(w);
                        }
                    }
                }
                sort::by_degree(current.since(same_mark), g, increasing);
                sort::by_degree(next.since(next_mark), g, increasing);
            }

            if done == level.len() {
                break;
            }
            // The level is split; restart from its lowest-degree leftover.
            let Some(&restart) = level
                .iter()
                .filter(|&&v| marks.is_free(v as usize))
                .min_by_key(|&&v| g.degree(v as usize))
            else {
                return Err(Error::bad(format!(
                    "walk position {step} numbered {done} of {} nodes but none is left",
                    level.len()
                )));
            };
            current.push(restart as usize)?;
            marks.queue(restart as usize);
        }

        std::mem::swap(&mut current, &mut next);
        next.clear();
    }
    Ok(())
}
