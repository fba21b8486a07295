//! Pseudo-diameter search.
//!
//! Starting from a seed, repeatedly grow level trees from the nodes of the deepest level of
//! the current tree. A deeper tree moves the start; among trees of the same depth the
//! narrowest one rooted at the far end is kept. This is the usual greedy local search: the
//! result is a pair of far-apart nodes, not a certified diameter.

use crate::error::{Error, Result};
use crate::graph::{Graph, Marks};
use crate::level::{self, LevelList};
use crate::scratch::Frame;
use crate::sort;

/// End points of a pseudo-diameter and the shapes of the trees rooted at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Diameter {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) depth: usize,
    pub(crate) active: usize,
    pub(crate) start_width: usize,
    pub(crate) end_width: usize,
}

pub(crate) fn find(
    g: &Graph<'_>,
    marks: &mut Marks,
    seed: usize,
    scratch: &mut Frame<'_>,
) -> Result<Diameter> {
    let n = g.node_count();
    let mut root = seed;

    'restart: loop {
        let mut frame = scratch.nested();
        let shape = {
            let mut spare = frame.spare();
            level::build(g, marks, root, &mut spare)?
        };
        let mut tree = LevelList::from_tree(frame.take(shape.words())?, shape);
        let deepest = shape.depth - 1;
        sort::by_degree(tree.level_mut(deepest), g, true);

        let mut best: Option<(usize, usize)> = None;
        let mut ceiling = n + 1;
        for &candidate in tree.level(deepest) {
            let candidate = candidate as usize;
            let max_depth = frame.spare_len().saturating_sub(shape.active);
            let probe = {
                let mut spare = frame.spare();
                level::build_narrower(g, marks, candidate, ceiling, max_depth, &mut spare)?
            };
            if probe.is_not_narrower() {
                continue;
            }
            if probe.depth > shape.depth {
                tracing::trace!(
                    from = root + 1,
                    to = candidate + 1,
                    depth = probe.depth,
                    "pseudo-diameter grew"
                );
                root = candidate;
                continue 'restart;
            }
            if probe.depth == shape.depth && probe.width < ceiling {
                best = Some((candidate, probe.width));
                ceiling = probe.width;
            }
        }

        let Some((end, end_width)) = best else {
            return Err(Error::bad(format!(
                "no level tree from the far level of node {} matches its depth",
                root + 1
            )));
        };
        return Ok(Diameter {
            start: root,
            end,
            depth: shape.depth,
            active: shape.active,
            start_width: shape.width,
            end_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphInput;
    use crate::scratch::ScratchArena;

    fn run(input: &GraphInput, seed: usize) -> Diameter {
        let g = input.view().unwrap();
        let mut marks = Marks::new(g.node_count());
        let mut arena = ScratchArena::sufficient(g.node_count());
        let mut frame = arena.begin();
        let d = find(&g, &mut marks, seed, &mut frame).unwrap();
        assert!(marks.all_free());
        d
    }

    #[test]
    fn path_diameter_spans_the_whole_path() {
        // 3 - 1 - 5 - 2 - 6 - 4
        let input =
            GraphInput::from_edges(6, &[(3, 1), (1, 5), (5, 2), (2, 6), (6, 4)]).unwrap();
        let d = run(&input, 4);
        assert_eq!(d.depth, 6);
        assert_eq!(d.active, 6);
        let mut ends = [d.start, d.end];
        ends.sort();
        assert_eq!(ends, [2, 3]);
        assert_eq!((d.start_width, d.end_width), (1, 1));
    }

    #[test]
    fn star_diameter_runs_leaf_to_leaf() {
        let edges: Vec<_> = (2..=7).map(|leaf| (1, leaf)).collect();
        let input = GraphInput::from_edges(7, &edges).unwrap();
        let d = run(&input, 1);
        assert_eq!((d.start, d.end), (1, 2));
        assert_eq!((d.depth, d.active), (3, 7));
        assert_eq!((d.start_width, d.end_width), (5, 5));
    }

    #[test]
    fn search_from_the_middle_is_at_least_as_deep_as_one_sweep() {
        let edges: Vec<_> = (1..10).map(|i| (i, i + 1)).chain([(3, 11), (11, 12)]).collect();
        let input = GraphInput::from_edges(12, &edges).unwrap();
        let d = run(&input, 4);
        assert!(d.depth >= 6);
        assert_eq!(d.active, 12);
    }
}
