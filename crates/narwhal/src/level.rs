//! Rooted level trees and the two level-structure representations.
//!
//! A level tree is built breadth-first inside a spare window: discovered nodes are appended
//! from the front while the start offset of each level is recorded from the back. Once the
//! traversal ends the level table is moved directly behind the node list, giving the
//! list-by-level layout `[nodes; active][level starts; depth]` that [`LevelList`] reads.
//!
//! [`map_tree`] is the lean form used once the depth is known: it writes each node's level
//! straight into a [`LevelMap`] and keeps no level table at all.

use crate::error::{Error, Result};
use crate::graph::{Graph, Marks};
use crate::scratch::Spare;
use std::ops::Range;

/// Outcome of one level-tree build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeShape {
    pub(crate) depth: usize,
    pub(crate) width: usize,
    pub(crate) active: usize,
}

impl TreeShape {
    /// Deliberately invalid shape reported when a narrower build gives up.
    pub(crate) fn not_narrower(node_count: usize) -> Self {
        Self {
            depth: 0,
            width: node_count + 1,
            active: 0,
        }
    }

    pub(crate) fn is_not_narrower(&self) -> bool {
        self.depth == 0
    }

    /// Words the compacted tree occupies.
    pub(crate) fn words(&self) -> usize {
        self.active + self.depth
    }
}

/// Builds the level tree rooted at `root` into `spare`.
pub(crate) fn build(
    g: &Graph<'_>,
    marks: &mut Marks,
    root: usize,
    spare: &mut Spare<'_>,
) -> Result<TreeShape> {
    let shape = grow(g, marks, root, spare, None)?;
    spare.record(shape.words());
    Ok(shape)
}

/// Like [`build`], but gives up as soon as a level holds `ceiling` or more nodes, and fails
/// with `NoSpace` past `max_depth` levels.
pub(crate) fn build_narrower(
    g: &Graph<'_>,
    marks: &mut Marks,
    root: usize,
    ceiling: usize,
    max_depth: usize,
    spare: &mut Spare<'_>,
) -> Result<TreeShape> {
    grow(g, marks, root, spare, Some(Narrower { ceiling, max_depth }))
}

/// Breadth-first levels of the tree rooted at `root`, written into `levels`.
///
/// `queue` receives the reached nodes in discovery order and has to hold all of them. With
/// `mirror_depth`, level `k` is stored as `mirror_depth - 1 - k`.
pub(crate) fn map_tree(
    g: &Graph<'_>,
    marks: &mut Marks,
    root: usize,
    queue: &mut [u32],
    levels: &mut LevelMap<'_>,
    mirror_depth: Option<usize>,
) -> Result<TreeShape> {
    if queue.is_empty() {
        return Err(Error::bad(format!(
            "no room to queue the level tree rooted at node {}",
            root + 1
        )));
    }
    queue[0] = root as u32;
    marks.queue(root);
    let mut count = 1usize;
    let mut depth = 0usize;
    let mut width = 0usize;
    let mut level_start = 0usize;

    let outcome: Result<()> = 'bfs: loop {
        let level_end = count;
        let level = match mirror_depth {
            Some(total) if depth >= total => {
                break 'bfs Err(Error::bad(format!(
                    "level tree rooted at node {} is deeper than {total} levels",
                    root + 1
                )));
            }
            Some(total) => total - 1 - depth,
            None => depth,
        };
        depth += 1;
        width = width.max(level_end - level_start);

        for i in level_start..level_end {
            let v = queue[i];
            levels.set(v, level);
            for w in g.neighbors(v as usize) {
                if !marks.is_free(w) {
                    continue;
                }
                if count == queue.len() {
                    break 'bfs Err(Error::bad(format!(
                        "level tree rooted at node {} reaches more than {count} nodes",
                        root + 1
                    )));
                }
                queue[count] = w as u32;
                count += 1;
                marks.queue(w);
            }
        }

        if count == level_end {
            break 'bfs Ok(());
        }
        level_start = level_end;
    };

    marks.release(&queue[..count]);
    outcome.map(|()| TreeShape {
        depth,
        width,
        active: count,
    })
}

#[derive(Debug, Clone, Copy)]
struct Narrower {
    ceiling: usize,
    max_depth: usize,
}

fn grow(
    g: &Graph<'_>,
    marks: &mut Marks,
    root: usize,
    spare: &mut Spare<'_>,
    narrower: Option<Narrower>,
) -> Result<TreeShape> {
    let len = spare.len();
    if len < 2 {
        return Err(spare.exhausted(2));
    }
    let buf = &mut *spare.words;

    buf[0] = root as u32;
    marks.queue(root);
    let mut count = 1usize;
    let mut depth = 0usize;
    let mut width = 0usize;
    let mut level_start = 0usize;

    let outcome: Result<Option<TreeShape>> = 'bfs: loop {
        let level_end = count;
        if let Some(limit) = narrower {
            if depth + 1 > limit.max_depth {
                break 'bfs Err(Error::no_space(0));
            }
        }
        if count + depth + 1 > len {
            break 'bfs Err(Error::no_space(0));
        }
        buf[len - 1 - depth] = level_start as u32;
        depth += 1;

        let level_width = level_end - level_start;
        width = width.max(level_width);
        if narrower.is_some_and(|limit| level_width >= limit.ceiling) {
            break 'bfs Ok(None);
        }

        for i in level_start..level_end {
            let v = buf[i] as usize;
            for w in g.neighbors(v) {
                if !marks.is_free(w) {
                    continue;
                }
                if narrower.is_some_and(|limit| count + 1 - level_end >= limit.ceiling) {
                    break 'bfs Ok(None);
                }
                if count + 1 + depth > len {
                    break 'bfs Err(Error::no_space(0));
                }
                buf[count] = w as u32;
                count += 1;
                marks.queue(w);
            }
        }

        if count == level_end {
            break 'bfs Ok(Some(TreeShape {
                depth,
                width,
                active: count,
            }));
        }
        level_start = level_end;
    };

    marks.release(&buf[..count]);

    // An aborted narrower build still needed room for a full node list next to its table.
    let needed = match narrower {
        Some(limit) => count.max(len.saturating_sub(limit.max_depth)) + depth,
        None => count + depth,
    };
    match outcome {
        Err(_) => Err(spare.exhausted(needed + 1)),
        Ok(None) => {
            spare.record(needed);
            Ok(TreeShape::not_narrower(g.node_count()))
        }
        Ok(Some(shape)) => {
            let table = len - depth;
            buf[table..].reverse();
            buf.copy_within(table.., count);
            spare.record(needed);
            Ok(shape)
        }
    }
}

/// List-by-level view: nodes grouped by level plus the start offset of every level.
#[derive(Debug)]
pub(crate) struct LevelList<'a> {
    nodes: &'a mut [u32],
    starts: &'a mut [u32],
}

impl<'a> LevelList<'a> {
    /// Reads a compacted tree produced by [`build`].
    pub(crate) fn from_tree(words: &'a mut [u32], shape: TreeShape) -> Self {
        let (nodes, rest) = words.split_at_mut(shape.active);
        Self {
            nodes,
            starts: &mut rest[..shape.depth],
        }
    }

    /// Buckets `nodes` in place by their level in `levels`, keeping the given order inside a
    /// level. `starts` becomes the level table; `scratch` must hold `nodes.len()` words.
    pub(crate) fn from_map(
        nodes: &'a mut [u32],
        starts: &'a mut [u32],
        levels: &LevelMap<'_>,
        scratch: &mut [u32],
    ) -> Result<Self> {
        let depth = starts.len();
        starts.fill(0);
        for &v in nodes.iter() {
            let l = levels.checked(v, depth)?;
            starts[l] += 1;
        }
        let mut acc = 0u32;
        for s in starts.iter_mut() {
            let c = *s;
            *s = acc;
            acc += c;
        }
        let sorted = &mut scratch[..nodes.len()];
        for &v in nodes.iter() {
            let l = levels.get(v) as usize;
            sorted[starts[l] as usize] = v;
            starts[l] += 1;
        }
        nodes.copy_from_slice(sorted);
        // Each start now holds the end of its level.
        for l in (1..depth).rev() {
            starts[l] = starts[l - 1];
        }
        if depth > 0 {
            starts[0] = 0;
        }
        Ok(Self { nodes, starts })
    }

    pub(crate) fn depth(&self) -> usize {
        self.starts.len()
    }

    fn bounds(&self, k: usize) -> Range<usize> {
        let start = self.starts[k] as usize;
        let end = self
            .starts
            .get(k + 1)
            .map_or(self.nodes.len(), |&s| s as usize);
        start..end
    }

    pub(crate) fn level(&self, k: usize) -> &[u32] {
        let r = self.bounds(k);
        &self.nodes[r]
    }

    pub(crate) fn level_mut(&mut self, k: usize) -> &mut [u32] {
        let r = self.bounds(k);
        &mut self.nodes[r]
    }

    pub(crate) fn width(&self) -> usize {
        (0..self.depth())
            .map(|k| self.bounds(k).len())
            .max()
            .unwrap_or(0)
    }
}

/// Level-number-per-node view over a dense window of `node_count` words.
#[derive(Debug)]
pub(crate) struct LevelMap<'a> {
    levels: &'a mut [u32],
}

impl<'a> LevelMap<'a> {
    pub(crate) fn new(levels: &'a mut [u32]) -> Self {
        Self { levels }
    }

    pub(crate) fn get(&self, v: u32) -> u32 {
        self.levels[v as usize]
    }

    pub(crate) fn set(&mut self, v: u32, level: usize) {
        self.levels[v as usize] = level as u32;
    }

    /// Level of `v`, rejecting values outside `0..depth`.
    pub(crate) fn checked(&self, v: u32, depth: usize) -> Result<usize> {
        let l = self.get(v) as usize;
        if l >= depth {
            return Err(Error::bad(format!(
                "node {} sits on level {l} of a {depth}-level structure",
                v + 1
            )));
        }
        Ok(l)
    }
}
