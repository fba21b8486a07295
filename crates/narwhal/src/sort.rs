//! Insertion sorts used for every tie-break in the ordering.
//!
//! The batches being sorted are short (one level, or the neighbors of one node), and
//! stability is load-bearing: equal keys keep their discovery order.

use crate::graph::Graph;

/// Stable sort of node ids by degree, increasing or decreasing.
pub(crate) fn by_degree(nodes: &mut [u32], g: &Graph<'_>, increasing: bool) {
    for i in 1..nodes.len() {
        let v = nodes[i];
        let key = g.degree(v as usize);
        let mut j = i;
        while j > 0 {
            let prev = g.degree(nodes[j - 1] as usize);
            let out_of_order = if increasing { prev > key } else { prev < key };
            if !out_of_order {
                break;
            }
            nodes[j] = nodes[j - 1];
            j -= 1;
        }
        nodes[j] = v;
    }
}

/// Stable sort of `(start, size)` pairs, stored flat, by decreasing size.
pub(crate) fn spans_by_size_desc(spans: &mut [u32]) {
    let count = spans.len() / 2;
    for i in 1..count {
        let (start, size) = (spans[2 * i], spans[2 * i + 1]);
        let mut j = i;
        while j > 0 && spans[2 * (j - 1) + 1] < size {
            spans[2 * j] = spans[2 * (j - 1)];
            spans[2 * j + 1] = spans[2 * (j - 1) + 1];
            j -= 1;
        }
        spans[2 * j] = start;
        spans[2 * j + 1] = size;
    }
}
