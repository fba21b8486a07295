//! Graph input/output types and the read-only view the ordering phases traverse.
//!
//! Node ids and adjacency offsets are 1-based on the public types, matching the layout sparse
//! solvers usually hand over. Everything inside the crate works on 0-based indices.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Adjacency description of a sparse symmetric graph.
///
/// For every node `i` (0-based position in the vectors), the slice
/// `adjacency[adjacency_start[i] - 1 .. adjacency_start[i] - 1 + degree[i]]` lists the 1-based
/// ids of its neighbors. Nodes with `degree[i] == 0` are isolated and their start offset is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInput {
    pub node_count: usize,
    pub degree: Vec<i32>,
    pub adjacency_start: Vec<usize>,
    pub adjacency: Vec<usize>,
}

impl GraphInput {
    /// Builds the symmetric adjacency form from an undirected edge list with 1-based endpoints.
    ///
    /// Self-loops are dropped; repeated edges are kept as given.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut degree: Vec<i32> = vec![0; node_count];
        for &(a, b) in edges {
            for end in [a, b] {
                if end == 0 || end > node_count {
                    return Err(Error::bad(format!(
                        "edge ({a}, {b}) references node {end} outside 1..={node_count}"
                    )));
                }
            }
            if a == b {
                continue;
            }
            degree[a - 1] += 1;
            degree[b - 1] += 1;
        }

        let mut adjacency_start: Vec<usize> = Vec::with_capacity(node_count);
        let mut next = 1usize;
        for &d in &degree {
            adjacency_start.push(next);
            next += d as usize;
        }

        let mut fill: Vec<usize> = adjacency_start.clone();
        let mut adjacency: Vec<usize> = vec![0; next - 1];
        for &(a, b) in edges {
            if a == b {
                continue;
            }
            adjacency[fill[a - 1] - 1] = b;
            fill[a - 1] += 1;
            adjacency[fill[b - 1] - 1] = a;
            fill[b - 1] += 1;
        }

        Ok(Self {
            node_count,
            degree,
            adjacency_start,
            adjacency,
        })
    }

    /// Checks vector lengths, degrees, offsets, neighbor ids and symmetry: every listed edge
    /// must be listed from both ends, the same number of times.
    pub fn validate(&self) -> Result<()> {
        let n = self.node_count;
        if self.degree.len() != n || self.adjacency_start.len() != n {
            return Err(Error::bad(format!(
                "node_count is {n} but degree has {} entries and adjacency_start has {}",
                self.degree.len(),
                self.adjacency_start.len()
            )));
        }
        if n >= u32::MAX as usize {
            return Err(Error::bad(format!("{n} nodes exceed the supported maximum")));
        }

        for i in 0..n {
            let d = self.degree[i];
            if d < 0 {
                return Err(Error::bad(format!("node {} has negative degree {d}", i + 1)));
            }
            if d == 0 {
                continue;
            }
            let start = self.adjacency_start[i];
            let end = start.saturating_sub(1) + d as usize;
            if start == 0 || end > self.adjacency.len() {
                return Err(Error::bad(format!(
                    "node {} has adjacency range {start}..{end} outside 1..={}",
                    i + 1,
                    self.adjacency.len()
                )));
            }
            if let Some(&w) = self.adjacency[start - 1..end]
                .iter()
                .find(|&&w| w == 0 || w > n)
            {
                return Err(Error::bad(format!(
                    "node {} lists neighbor {w} outside 1..={n}",
                    i + 1
                )));
            }
        }
        self.check_symmetric()
    }

    /// Neighbors of 0-based node `i`; only valid once the offsets are checked.
    fn listed(&self, i: usize) -> &[usize] {
        let d = self.degree[i] as usize;
        if d == 0 {
            return &[];
        }
        let start = self.adjacency_start[i] - 1;
        &self.adjacency[start..start + d]
    }

    fn check_symmetric(&self) -> Result<()> {
        let n = self.node_count;

        // Transposed adjacency: the nodes listing `v` are `listed_by[offsets[v]..offsets[v + 1]]`.
        let mut offsets = vec![0usize; n + 1];
        for i in 0..n {
            for &w in self.listed(i) {
                offsets[w] += 1;
            }
        }
        for v in 0..n {
            offsets[v + 1] += offsets[v];
        }
        let mut fill = offsets.clone();
        let mut listed_by = vec![0usize; offsets[n]];
        for i in 0..n {
            for &w in self.listed(i) {
                listed_by[fill[w - 1]] = i + 1;
                fill[w - 1] += 1;
            }
        }

        let mut tally = vec![0i64; n];
        for v in 0..n {
            let out = self.listed(v);
            let back = &listed_by[offsets[v]..offsets[v + 1]];
            if out.len() != back.len() {
                return Err(Error::bad(format!(
                    "node {} lists {} neighbors but is listed by {}; adjacency is not symmetric",
                    v + 1,
                    out.len(),
                    back.len()
                )));
            }
            for &w in out {
                tally[w - 1] += 1;
            }
            for &u in back {
                tally[u - 1] -= 1;
            }
            let unmatched = out.iter().copied().find(|&w| tally[w - 1] != 0);
            for &w in out.iter().chain(back) {
                tally[w - 1] = 0;
            }
            if let Some(w) = unmatched {
                return Err(Error::bad(format!(
                    "node {} lists neighbor {w} a different number of times than {w} lists it",
                    v + 1
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn view(&self) -> Result<Graph<'_>> {
        self.validate()?;
        Ok(Graph { input: self })
    }
}

/// A computed ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOutput {
    /// `permutation[i]` is the new 1-based index of node `i + 1`.
    pub permutation: Vec<usize>,
    pub bandwidth: usize,
    pub profile: usize,
    /// Scratch arena high-water mark in words. An arena of exactly this size reproduces the
    /// result.
    pub scratch_used: usize,
}

impl GraphOutput {
    /// Old node ids (1-based) listed in their new order.
    pub fn inverse(&self) -> Vec<usize> {
        let mut order = vec![0; self.permutation.len()];
        for (i, &p) in self.permutation.iter().enumerate() {
            if let Some(slot) = p.checked_sub(1).and_then(|p| order.get_mut(p)) {
                *slot = i + 1;
            }
        }
        order
    }
}

/// Validated, read-only view over a [`GraphInput`] with 0-based node indices.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Graph<'a> {
    input: &'a GraphInput,
}

impl<'a> Graph<'a> {
    pub(crate) fn node_count(&self) -> usize {
        self.input.node_count
    }

    pub(crate) fn degree(&self, v: usize) -> usize {
        self.input.degree[v] as usize
    }

    pub(crate) fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + 'a {
        let input: &'a GraphInput = self.input;
        let d = self.degree(v);
        let list: &'a [usize] = if d == 0 {
            &[]
        } else {
            let start = input.adjacency_start[v] - 1;
            &input.adjacency[start..start + d]
        };
        list.iter().map(|&w| w - 1)
    }
}

/// Traversal state of a node during one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    Free,
    Queued,
    Numbered,
}

/// Per-node marks, kept next to the graph instead of inside it.
#[derive(Debug, Clone)]
pub(crate) struct Marks(Vec<Mark>);

impl Marks {
    pub(crate) fn new(node_count: usize) -> Self {
        Self(vec![Mark::Free; node_count])
    }

    pub(crate) fn get(&self, v: usize) -> Mark {
        self.0[v]
    }

    pub(crate) fn is_free(&self, v: usize) -> bool {
        self.0[v] == Mark::Free
    }

    pub(crate) fn queue(&mut self, v: usize) {
        self.0[v] = Mark::Queued;
    }

    pub(crate) fn number(&mut self, v: usize) {
        self.0[v] = Mark::Numbered;
    }

    /// Returns queued nodes to `Free`. Numbered nodes stay numbered.
    pub(crate) fn release(&mut self, nodes: &[u32]) {
        for &v in nodes {
            let m = &mut self.0[v as usize];
            if *m == Mark::Queued {
                *m = Mark::Free;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn all_free(&self) -> bool {
        self.0.iter().all(|m| *m == Mark::Free)
    }
}
