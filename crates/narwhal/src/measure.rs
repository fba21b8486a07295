//! Bandwidth and profile of a numbering, and the choice between candidate numberings.

use crate::Objective;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphInput};
use serde::{Deserialize, Serialize};

/// Bandwidth and profile of one numbering.
///
/// Row `i` of the renumbered matrix contributes `i - min(i, lowest neighbor index)`; the
/// bandwidth is the largest contribution and the profile their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub bandwidth: usize,
    pub profile: usize,
}

/// Evaluates an arbitrary numbering: `permutation[i]` is the 1-based new index of node `i + 1`.
///
/// Fails with `BadElement` unless the graph is valid and `permutation` is a bijection onto
/// `1..=node_count`.
pub fn measure(input: &GraphInput, permutation: &[usize]) -> Result<Envelope> {
    let g = input.view()?;
    let n = g.node_count();
    if permutation.len() != n {
        return Err(Error::bad(format!(
            "numbering has {} entries for {n} nodes",
            permutation.len()
        )));
    }
    let mut seen = vec![false; n];
    for (i, &p) in permutation.iter().enumerate() {
        if p == 0 || p > n || std::mem::replace(&mut seen[p - 1], true) {
            return Err(Error::bad(format!(
                "node {} gets index {p}, which is out of range or already taken",
                i + 1
            )));
        }
    }
    Ok(envelope(&g, |v| permutation[v]))
}

pub(crate) fn envelope(g: &Graph<'_>, index: impl Fn(usize) -> usize) -> Envelope {
    let mut out = Envelope::default();
    for v in 0..g.node_count() {
        let row = index(v);
        let lowest = g.neighbors(v).map(&index).fold(row, usize::min);
        let reach = row - lowest;
        out.bandwidth = out.bandwidth.max(reach);
        out.profile += reach;
    }
    out
}

/// Keeps the better of the identity numbering and `candidate`, and for the profile
/// objective also the reversal of `candidate`. A later candidate only wins when strictly
/// better, so ties keep the identity.
pub(crate) fn choose(
    g: &Graph<'_>,
    objective: Objective,
    candidate: Vec<usize>,
) -> (Vec<usize>, Envelope) {
    let n = g.node_count();
    let identity = envelope(g, |v| v + 1);
    let fresh = envelope(g, |v| candidate[v]);

    match objective {
        Objective::Bandwidth => {
            if fresh.bandwidth < identity.bandwidth {
                (candidate, fresh)
            } else {
                ((1..=n).collect(), identity)
            }
        }
        Objective::Profile => {
            let reversed = envelope(g, |v| n + 1 - candidate[v]);
            let mut best = (0u8, identity);
            for (which, env) in [(1u8, fresh), (2u8, reversed)] {
                if env.profile < best.1.profile {
                    best = (which, env);
                }
            }
            let numbering = match best.0 {
                0 => (1..=n).collect(),
                1 => candidate,
                _ => candidate.iter().map(|&p| n + 1 - p).collect(),
            };
            (numbering, best.1)
        }
    }
}
