//! Final numbering of one component from its combined level structure.
//!
//! Both strategies walk the levels from one end of the pseudo-diameter to the other and only
//! differ in the order they pick nodes inside a level.

pub(crate) mod king;
pub(crate) mod rcm;

use crate::combine::Combined;
use crate::error::{Error, Result};
use crate::graph::{Graph, Marks};

/// Which end of the combined structure the numbering starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Walk {
    from_start: bool,
    depth: usize,
}

impl Walk {
    /// Starts at the lower-degree end, flipped when the largest reduced piece took the
    /// mirrored levels.
    pub(crate) fn new(g: &Graph<'_>, c: &Combined<'_>) -> Self {
        let low = g.degree(c.start) <= g.degree(c.end);
        Self {
            from_start: low != c.reversed,
            depth: c.list.depth(),
        }
    }

    pub(crate) fn from_start(&self) -> bool {
        self.from_start
    }

    pub(crate) fn root(&self, c: &Combined<'_>) -> usize {
        if self.from_start { c.start } else { c.end }
    }

    /// Level visited at position `step` of the walk. The mapping is its own inverse.
    pub(crate) fn level(&self, step: usize) -> usize {
        if self.from_start {
            step
        } else {
            self.depth - 1 - step
        }
    }

    /// Walk position of node `v`.
    pub(crate) fn step_of(&self, c: &Combined<'_>, v: usize) -> Result<usize> {
        let l = c.levels.checked(v as u32, self.depth)?;
        Ok(self.level(l))
    }
}

/// Hands out the new indices of one component.
#[derive(Debug)]
pub(crate) struct Sequence<'p> {
    permutation: &'p mut [usize],
    next: usize,
    descending: bool,
    assigned: usize,
}

impl<'p> Sequence<'p> {
    /// Indices `first, first + 1, ...`.
    pub(crate) fn ascending(permutation: &'p mut [usize], first: usize) -> Self {
        Self {
            permutation,
            next: first,
            descending: false,
            assigned: 0,
        }
    }

    /// Indices `first + active - 1` down to `first`.
    pub(crate) fn descending(permutation: &'p mut [usize], first: usize, active: usize) -> Self {
        Self {
            permutation,
            next: first + active - 1,
            descending: true,
            assigned: 0,
        }
    }

    pub(crate) fn assign(&mut self, marks: &mut Marks, v: usize) {
        self.permutation[v] = self.next;
        marks.number(v);
        self.assigned += 1;
        if self.descending {
            self.next -= 1;
        } else {
            self.next += 1;
        }
    }

    pub(crate) fn assigned(&self) -> usize {
        self.assigned
    }
}

/// Bounded FIFO over one arena window, reset per level.
#[derive(Debug)]
pub(crate) struct Queue<'a> {
    slots: &'a mut [u32],
    head: usize,
    tail: usize,
}

impl<'a> Queue<'a> {
    pub(crate) fn new(slots: &'a mut [u32]) -> Self {
        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    pub(crate) fn push(&mut self, v: usize) -> Result<()> {
        if self.tail == self.slots.len() {
            return Err(Error::bad(format!(
                "node {} overflows a level queue of {} slots",
                v + 1,
                self.slots.len()
            )));
        }
        self.slots[self.tail] = v as u32;
        self.tail += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        if self.head == self.tail {
            return None;
        }
        let v = self.slots[self.head];
        self.head += 1;
        Some(v as usize)
    }

    /// Current end of the queue, used to delimit the batch a scan appends.
    pub(crate) fn mark(&self) -> usize {
        self.tail
    }

    /// Entries appended since `mark`.
    pub(crate) fn since(&mut self, mark: usize) -> &mut [u32] {
        &mut self.slots[mark..self.tail]
    }

    pub(crate) fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

pub(crate) fn out_of_level(v: usize, w: usize, step: usize, other: usize) -> Error {
    Error::bad(format!(
        "node {} at walk position {step} is adjacent to unnumbered node {} at position {other}",
        v + 1,
        w + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_pops_in_push_order_and_reports_batches() {
        let mut words = [0u32; 4];
        let mut q = Queue::new(&mut words);
        q.push(3).unwrap();
        let mark = q.mark();
        q.push(1).unwrap();
        q.push(2).unwrap();
        assert_eq!(q.since(mark), &[1, 2]);
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), Some(1));
        q.push(0).unwrap();
        assert!(q.push(5).is_err());
        q.clear();
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn descending_sequence_fills_the_block_from_the_top() {
        let mut perm = vec![0usize; 4];
        let mut marks = Marks::new(4);
        let mut seq = Sequence::descending(&mut perm, 2, 3);
        seq.assign(&mut marks, 1);
        seq.assign(&mut marks, 3);
        seq.assign(&mut marks, 2);
        assert_eq!(seq.assigned(), 3);
        assert_eq!(perm, vec![0, 4, 2, 3]);
    }
}
