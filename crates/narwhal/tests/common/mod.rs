#![allow(dead_code)]

use narwhal::GraphInput;

/// Deterministic generator so failures reproduce from the seed alone.
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform-ish value in `0..bound`.
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

pub fn path_edges(n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i, i + 1)).collect()
}

pub fn star_edges(n: usize) -> Vec<(usize, usize)> {
    (2..=n).map(|leaf| (1, leaf)).collect()
}

/// Row-major `rows x cols` grid with 4-neighbor edges.
pub fn grid_edges(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let id = |r: usize, c: usize| r * cols + c + 1;
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                edges.push((id(r, c), id(r, c + 1)));
            }
            if r + 1 < rows {
                edges.push((id(r, c), id(r + 1, c)));
            }
        }
    }
    edges
}

/// Renames node `i` to `labels[i - 1]` in every edge.
pub fn relabel(edges: &[(usize, usize)], labels: &[usize]) -> Vec<(usize, usize)> {
    edges
        .iter()
        .map(|&(a, b)| (labels[a - 1], labels[b - 1]))
        .collect()
}

/// Same graph with its node ids shuffled by `seed`.
pub fn scrambled(n: usize, edges: &[(usize, usize)], seed: u64) -> Vec<(usize, usize)> {
    let mut labels: Vec<usize> = (1..=n).collect();
    XorShift64Star::new(seed).shuffle(&mut labels);
    relabel(edges, &labels)
}

/// A sparse random graph: a few random chains plus scattered chords and isolated nodes.
pub fn random_edges(n: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = XorShift64Star::new(seed);
    let mut edges = Vec::new();
    if n < 2 {
        return edges;
    }
    let mut order: Vec<usize> = (1..=n).collect();
    rng.shuffle(&mut order);
    for pair in order.windows(2) {
        // Occasional gaps split the graph into several components.
        if rng.below(8) != 0 {
            edges.push((pair[0], pair[1]));
        }
    }
    for _ in 0..n / 2 {
        let a = rng.below(n) + 1;
        let b = rng.below(n) + 1;
        if a != b {
            edges.push((a, b));
        }
    }
    edges
}

pub fn graph(n: usize, edges: &[(usize, usize)]) -> GraphInput {
    GraphInput::from_edges(n, edges).expect("valid edge list")
}

pub fn assert_bijection(permutation: &[usize]) {
    let mut sorted = permutation.to_vec();
    sorted.sort_unstable();
    let expected: Vec<usize> = (1..=permutation.len()).collect();
    assert_eq!(sorted, expected, "not a permutation: {permutation:?}");
}

pub fn bandwidth_of(edges: &[(usize, usize)], permutation: &[usize]) -> usize {
    edges
        .iter()
        .map(|&(a, b)| permutation[a - 1].abs_diff(permutation[b - 1]))
        .max()
        .unwrap_or(0)
}
