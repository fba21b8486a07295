//! Merging the two end-rooted level trees of a component into one generalized level structure.
//!
//! Tree 1 is rooted at the diameter start; tree 2 at the far end, with its levels mirrored so
//! both trees count from the start side. Nodes on which the two trees agree are placed first.
//! The rest split into connected pieces of the reduced graph; largest first, each piece takes
//! the levels of whichever tree keeps the widest level it touches smaller.

use crate::diameter::Diameter;
use crate::error::{Error, Result};
use crate::graph::{Graph, Marks};
use crate::level::{self, LevelList, LevelMap};
use crate::scratch::Frame;
use crate::sort;

/// The combined level structure of one component, ready for numbering.
#[derive(Debug)]
pub(crate) struct Combined<'a> {
    pub(crate) list: LevelList<'a>,
    pub(crate) levels: LevelMap<'a>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// The largest reduced-graph piece took its levels from the tree rooted at `end`.
    pub(crate) reversed: bool,
}

pub(crate) fn combine<'a>(
    g: &Graph<'_>,
    marks: &mut Marks,
    diameter: &Diameter,
    frame: &mut Frame<'a>,
) -> Result<Combined<'a>> {
    let n = g.node_count();
    let depth = diameter.depth;
    let active = diameter.active;

    // Tree 1 lives on as the level map plus the component's node list; tree 2 only as a
    // mirrored map that is dropped once every node has its combined level.
    let mut levels = LevelMap::new(frame.take(n)?);
    let nodes: &'a mut [u32] = frame.take(active)?;
    let shape = level::map_tree(g, marks, diameter.start, nodes, &mut levels, None)?;
    expect_shape(shape.active, shape.depth, diameter)?;

    let reversed = {
        let mut work = frame.nested();
        let mut mirrored = LevelMap::new(work.take(n)?);
        {
            let mut bfs = work.nested();
            let queue = bfs.take(active)?;
            let shape =
                level::map_tree(g, marks, diameter.end, queue, &mut mirrored, Some(depth))?;
            expect_shape(shape.active, shape.depth, diameter)?;
        }

        let totals = work.take_zeroed(depth)?;
        let mut placed = 0usize;
        for &v in nodes.iter() {
            let l = levels.checked(v, depth)?;
            if l == mirrored.checked(v, depth)? {
                totals[l] += 1;
                placed += 1;
            }
        }

        let residual = active - placed;
        let reversed = if residual == 0 {
            false
        } else {
            place_reduced(
                g,
                marks,
                nodes,
                &mut levels,
                &mirrored,
                totals,
                residual,
                &mut work.nested(),
            )?
        };

        let total: usize = totals.iter().map(|&t| t as usize).sum();
        if total != active {
            return Err(Error::bad(format!(
                "combined levels hold {total} nodes but the component has {active}"
            )));
        }
        reversed
    };

    let starts = frame.take(depth)?;
    let list = {
        let mut work = frame.nested();
        LevelList::from_map(nodes, starts, &levels, work.take(active)?)?
    };
    tracing::trace!(
        start = diameter.start + 1,
        end = diameter.end + 1,
        depth,
        start_width = diameter.start_width,
        end_width = diameter.end_width,
        width = list.width(),
        reversed,
        "combined level structure"
    );
    Ok(Combined {
        list,
        levels,
        start: diameter.start,
        end: diameter.end,
        reversed,
    })
}

fn expect_shape(active: usize, depth: usize, diameter: &Diameter) -> Result<()> {
    if active != diameter.active || depth != diameter.depth {
        return Err(Error::bad(format!(
            "level trees of the component rooted at {} and {} disagree ({} nodes/{} levels vs {}/{})",
            diameter.start + 1,
            diameter.end + 1,
            diameter.active,
            diameter.depth,
            active,
            depth
        )));
    }
    Ok(())
}

/// Splits the reduced graph into connected pieces and gives each piece the levels of one of
/// the two trees. Returns whether the largest piece used the mirrored tree.
#[allow(clippy::too_many_arguments)]
fn place_reduced(
    g: &Graph<'_>,
    marks: &mut Marks,
    nodes: &[u32],
    levels: &mut LevelMap<'_>,
    mirrored: &LevelMap<'_>,
    totals: &mut [u32],
    residual: usize,
    work: &mut Frame<'_>,
) -> Result<bool> {
    let depth = totals.len();
    let queue = work.take(residual)?;
    let spans = work.take(2 * residual)?;

    let mut count = 0usize;
    let mut pieces = 0usize;
    let filled: Result<()> = 'fill: {
        for &seed in nodes {
            if !marks.is_free(seed as usize) || levels.get(seed) == mirrored.get(seed) {
                continue;
            }
            if count == queue.len() {
                break 'fill Err(overflow());
            }
            let first = count;
            queue[count] = seed;
            count += 1;
            marks.queue(seed as usize);

            let mut head = first;
            while head < count {
                let v = queue[head] as usize;
                head += 1;
                for w in g.neighbors(v) {
                    let w32 = w as u32;
                    if !marks.is_free(w) || levels.get(w32) == mirrored.get(w32) {
                        continue;
                    }
                    if count == queue.len() {
                        break 'fill Err(overflow());
                    }
                    queue[count] = w32;
                    count += 1;
                    marks.queue(w);
                }
            }
            spans[2 * pieces] = first as u32;
            spans[2 * pieces + 1] = (count - first) as u32;
            pieces += 1;
        }
        Ok(())
    };
    marks.release(&queue[..count]);
    filled?;
    if count != residual {
        return Err(Error::bad(format!(
            "reduced graph holds {count} nodes but {residual} were left over"
        )));
    }

    let spans = &mut spans[..2 * pieces];
    sort::spans_by_size_desc(spans);

    let by_start = work.take(depth)?;
    let by_end = work.take(depth)?;
    let mut reversed = false;
    for (i, span) in spans.chunks_exact(2).enumerate() {
        let piece = &queue[span[0] as usize..(span[0] + span[1]) as usize];
        by_start.fill(0);
        by_end.fill(0);
        for &v in piece {
            by_start[levels.checked(v, depth)?] += 1;
            by_end[mirrored.checked(v, depth)?] += 1;
        }

        // Ties go to the mirrored tree.
        let use_end = worst_level(totals, by_end) <= worst_level(totals, by_start);
        if i == 0 {
            reversed = use_end;
        }
        for &v in piece {
            let l = if use_end {
                mirrored.get(v) as usize
            } else {
                levels.get(v) as usize
            };
            levels.set(v, l);
            totals[l] += 1;
        }
    }
    Ok(reversed)
}

fn overflow() -> Error {
    Error::bad("reduced graph reaches more nodes than the level trees left over")
}

/// Widest level total after adding `extra`, over the levels `extra` touches.
fn worst_level(totals: &[u32], extra: &[u32]) -> u32 {
    totals
        .iter()
        .zip(extra)
        .filter(|(_, e)| **e > 0)
        .map(|(t, e)| t + e)
        .max()
        .unwrap_or(0)
}
