//! King numbering: inside a level, always take the node with the fewest unqueued neighbors on
//! the next level.
//!
//! The priority list and the queue of next-level nodes share one window. Queued nodes grow
//! from the front; list entries `(node, key, next)` grow from the back and are chained in
//! `(key, node)` order. Entries are only reclaimed when a level ends and the queue is promoted
//! into a fresh list, so a level costs at most three words per node it lists.

use super::{Sequence, Walk, out_of_level};
use crate::combine::Combined;
use crate::error::{Error, Result};
use crate::graph::{Graph, Mark, Marks};
use crate::scratch::{Frame, Spare};

const NIL: u32 = u32::MAX;
const ENTRY: usize = 3;

pub(crate) fn number(
    g: &Graph<'_>,
    marks: &mut Marks,
    c: &Combined<'_>,
    walk: Walk,
    seq: &mut Sequence<'_>,
    frame: &mut Frame<'_>,
) -> Result<()> {
    let mut spare = frame.spare();
    let mut list = PriorityList::new(&mut spare);
    let result = run(g, marks, c, walk, seq, &mut list);
    let used = list.high_water;
    match result {
        Err(Error::NoSpace { .. }) => Err(spare.exhausted(used + ENTRY)),
        other => {
            spare.record(used);
            other
        }
    }
}

fn run(
    g: &Graph<'_>,
    marks: &mut Marks,
    c: &Combined<'_>,
    walk: Walk,
    seq: &mut Sequence<'_>,
    list: &mut PriorityList<'_>,
) -> Result<()> {
    let depth = c.list.depth();
    let root = walk.root(c);
    list.insert(root as u32, forward(g, marks, c, walk, 0, root)?)?;
    marks.queue(root);

    for step in 0..depth {
        let level = c.list.level(walk.level(step));
        let mut done = 0usize;
        loop {
            while let Some(x) = list.pop() {
                let x = x as usize;
                seq.assign(marks, x);
                done += 1;

                for w in g.neighbors(x) {
                    if !marks.is_free(w) {
                        continue;
                    }
                    let s = walk.step_of(c, w)?;
                    if s == step {
                        list.insert(w as u32, forward(g, marks, c, walk, step, w)?)?;
                        marks.queue(w);
                    } else if s == step + 1 {
                        marks.queue(w);
                        list.push_queued(w as u32)?;
                        for y in g.neighbors(w) {
                            if marks.get(y) == Mark::Queued && walk.step_of(c, y)? == step {
                                list.decrement(y as u32);
                            }
                        }
                    } else {
                        return Err(out_of_level(x, w, step, s));
                    }
                }
            }

            if done == level.len() {
                break;
            }
            let mut restart: Option<(u32, u32)> = None;
            for &v in level {
                if !marks.is_free(v as usize) {
                    continue;
                }
                let key = forward(g, marks, c, walk, step, v as usize)?;
                if restart.is_none_or(|best| (key, v) < best) {
                    restart = Some((key, v));
                }
            }
            let Some((key, v)) = restart else {
                return Err(Error::bad(format!(
                    "walk position {step} numbered {done} of {} nodes but none is left",
                    level.len()
                )));
            };
            list.insert(v, key)?;
            marks.queue(v as usize);
        }

        if step + 1 < depth {
            list.promote(|v| forward(g, marks, c, walk, step + 1, v as usize))?;
        }
    }
    Ok(())
}

/// Unqueued neighbors of `v` on the level after walk position `step`.
fn forward(
    g: &Graph<'_>,
    marks: &Marks,
    c: &Combined<'_>,
    walk: Walk,
    step: usize,
    v: usize,
) -> Result<u32> {
    let mut count = 0u32;
    for w in g.neighbors(v) {
        if marks.is_free(w) && walk.step_of(c, w)? == step + 1 {
            count += 1;
        }
    }
    Ok(count)
}

struct PriorityList<'a> {
    words: &'a mut [u32],
    queued: usize,
    entries: usize,
    head: u32,
    high_water: usize,
}

impl<'a> PriorityList<'a> {
    fn new(spare: &'a mut Spare<'_>) -> Self {
        Self {
            words: &mut *spare.words,
            queued: 0,
            entries: 0,
            head: NIL,
            high_water: 0,
        }
    }

    fn grow(&mut self, queued: usize, entries: usize) -> Result<()> {
        let used = queued + ENTRY * entries;
        if used > self.words.len() {
            return Err(Error::no_space(used));
        }
        self.high_water = self.high_water.max(used);
        Ok(())
    }

    fn slot(&self, entry: u32) -> usize {
        self.words.len() - ENTRY * (entry as usize + 1)
    }

    fn node(&self, entry: u32) -> u32 {
        self.words[self.slot(entry)]
    }

    fn key(&self, entry: u32) -> u32 {
        self.words[self.slot(entry) + 1]
    }

    fn next(&self, entry: u32) -> u32 {
        self.words[self.slot(entry) + 2]
    }

    fn set_next(&mut self, entry: u32, next: u32) {
        let s = self.slot(entry);
        self.words[s + 2] = next;
    }

    fn push_queued(&mut self, v: u32) -> Result<()> {
        self.grow(self.queued + 1, self.entries)?;
        self.words[self.queued] = v;
        self.queued += 1;
        Ok(())
    }

    fn insert(&mut self, v: u32, key: u32) -> Result<()> {
        self.grow(self.queued, self.entries + 1)?;
        let entry = self.entries as u32;
        self.entries += 1;
        let s = self.slot(entry);
        self.words[s] = v;
        self.words[s + 1] = key;
        self.link(entry);
        Ok(())
    }

    /// Chains `entry` in after every entry that sorts before it.
    fn link(&mut self, entry: u32) {
        let order = (self.key(entry), self.node(entry));
        let mut prev = NIL;
        let mut cur = self.head;
        while cur != NIL && (self.key(cur), self.node(cur)) < order {
            prev = cur;
            cur = self.next(cur);
        }
        self.set_next(entry, cur);
        if prev == NIL {
            self.head = entry;
        } else {
            self.set_next(prev, entry);
        }
    }

    fn pop(&mut self) -> Option<u32> {
        if self.head == NIL {
            return None;
        }
        let entry = self.head;
        self.head = self.next(entry);
        Some(self.node(entry))
    }

    /// Lowers the key of the listed entry for `v` by one, if it is listed.
    fn decrement(&mut self, v: u32) {
        let mut prev = NIL;
        let mut cur = self.head;
        while cur != NIL && self.node(cur) != v {
            prev = cur;
            cur = self.next(cur);
        }
        if cur == NIL {
            return;
        }
        let after = self.next(cur);
        if prev == NIL {
            self.head = after;
        } else {
            self.set_next(prev, after);
        }
        let s = self.slot(cur);
        self.words[s + 1] = self.words[s + 1].saturating_sub(1);
        self.link(cur);
    }

    /// Turns the queued next-level nodes into the new list, keyed by `key`.
    ///
    /// The queue is read back to front while entries are written from the back, so the last
    /// entry lands on queue slots that were already read.
    fn promote(&mut self, mut key: impl FnMut(u32) -> Result<u32>) -> Result<()> {
        let count = self.queued;
        self.grow(0, count)?;
        self.head = NIL;
        self.entries = 0;
        for i in (0..count).rev() {
            let v = self.words[i];
            let k = key(v)?;
            let entry = self.entries as u32;
            self.entries += 1;
            let s = self.slot(entry);
            self.words[s] = v;
            self.words[s + 1] = k;
            self.link(entry);
        }
        self.queued = 0;
        Ok(())
    }
}
