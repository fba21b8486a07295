//! The scratch arena every phase of a call carves its working storage from.
//!
//! A call opens a [`Frame`] over the whole buffer. Frames hand out windows by splitting off the
//! front of what is left, so two live windows can never alias. Nested frames borrow the
//! remainder of their parent and give it back when dropped, which is how a phase releases its
//! temporaries while keeping the windows its caller still needs.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct ScratchArena {
    words: Vec<u32>,
    peak: usize,
}

impl ScratchArena {
    /// Arena with the nominal `4 * node_count` words. Paths and grids fit; a component whose
    /// end-rooted trees disagree on many nodes (a star, say) can need up to
    /// [`Self::sufficient_words`].
    pub fn new(node_count: usize) -> Self {
        Self::with_capacity(4 * node_count)
    }

    pub fn with_capacity(words: usize) -> Self {
        Self {
            words: vec![0; words],
            peak: 0,
        }
    }

    /// Arena guaranteed to be large enough for any graph with `node_count` nodes.
    pub fn sufficient(node_count: usize) -> Self {
        Self::with_capacity(Self::sufficient_words(node_count))
    }

    /// Upper bound of the words a call on a graph with `node_count` nodes can require.
    pub fn sufficient_words(node_count: usize) -> usize {
        6 * node_count + 3
    }

    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// High-water mark of the most recent call, in words.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub(crate) fn begin(&mut self) -> Frame<'_> {
        self.peak = 0;
        self.frame()
    }

    pub(crate) fn frame(&mut self) -> Frame<'_> {
        let Self { words, peak } = self;
        Frame {
            rest: words.as_mut_slice(),
            base: 0,
            peak,
        }
    }
}

pub(crate) struct Frame<'a> {
    rest: &'a mut [u32],
    base: usize,
    peak: &'a mut usize,
}

impl<'a> Frame<'a> {
    /// Splits a window of `len` words off the front of the frame.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a mut [u32]> {
        if len > self.rest.len() {
            return Err(Error::no_space(self.base + len));
        }
        let rest = std::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(len);
        self.rest = tail;
        self.base += len;
        *self.peak = (*self.peak).max(self.base);
        Ok(head)
    }

    pub(crate) fn take_zeroed(&mut self, len: usize) -> Result<&'a mut [u32]> {
        let words = self.take(len)?;
        words.fill(0);
        Ok(words)
    }

    /// Lends everything left in the frame for a phase that grows from both ends.
    pub(crate) fn spare(&mut self) -> Spare<'_> {
        Spare {
            words: &mut *self.rest,
            base: self.base,
            peak: &mut *self.peak,
        }
    }

    pub(crate) fn spare_len(&self) -> usize {
        self.rest.len()
    }

    /// A child frame over the remainder; its windows are released when it is dropped.
    pub(crate) fn nested(&mut self) -> Frame<'_> {
        Frame {
            rest: &mut *self.rest,
            base: self.base,
            peak: &mut *self.peak,
        }
    }
}

/// The unclaimed remainder of a frame, lent out for one build.
pub(crate) struct Spare<'b> {
    pub(crate) words: &'b mut [u32],
    base: usize,
    peak: &'b mut usize,
}

impl Spare<'_> {
    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    /// Records that the build needed `used` words of this remainder.
    pub(crate) fn record(&mut self, used: usize) {
        *self.peak = (*self.peak).max(self.base + used);
    }

    /// `NoSpace` for a build that needed `used` words here.
    pub(crate) fn exhausted(&self, used: usize) -> Error {
        Error::no_space(self.base + used)
    }
}
