//! The driver: numbers every component in turn, then keeps the better of the assembled
//! numbering and the identity.

use crate::Objective;
use crate::combine;
use crate::diameter;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphInput, GraphOutput, Marks};
use crate::measure;
use crate::number::{Sequence, Walk, king, rcm};
use crate::scratch::ScratchArena;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
struct Timings {
    total: Duration,
    diameter: Duration,
    combine: Duration,
    number: Duration,
    evaluate: Duration,
}

fn timed<T>(enabled: bool, slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = enabled.then(Instant::now);
    let out = f();
    if let Some(s) = start {
        *slot += s.elapsed();
    }
    out
}

/// Computes a bandwidth (RCM) or profile (King) reducing numbering of `input`.
///
/// Errors leave `input` untouched. A `NoSpace` error always asks for at least
/// [`ScratchArena::sufficient_words`] words, so one retry with an arena of that size succeeds.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = input.node_count, ?objective))]
pub fn reorder(
    input: &GraphInput,
    objective: Objective,
    scratch: &mut ScratchArena,
) -> Result<GraphOutput> {
    let g = input.view()?;
    let floor = ScratchArena::sufficient_words(g.node_count());
    run(&g, objective, scratch).map_err(|err| {
        tracing::debug!(%err, "reordering failed");
        err.with_space_floor(floor)
    })
}

/// Boolean-flag form of [`reorder`]: `true` minimizes the bandwidth, `false` the profile.
pub fn minimize_bandwidth_or_profile(
    input: &GraphInput,
    optimize_for_bandwidth: bool,
    scratch: &mut ScratchArena,
) -> Result<GraphOutput> {
    let objective = if optimize_for_bandwidth {
        Objective::Bandwidth
    } else {
        Objective::Profile
    };
    reorder(input, objective, scratch)
}

fn run(g: &Graph<'_>, objective: Objective, scratch: &mut ScratchArena) -> Result<GraphOutput> {
    let timing_enabled = std::env::var("NARWHAL_TIMING").ok().as_deref() == Some("1");
    let mut timings = Timings::default();
    let total_start = timing_enabled.then(Instant::now);

    let n = g.node_count();
    let mut marks = Marks::new(n);
    let mut permutation = vec![0usize; n];
    let mut next = 1usize;

    for v in 0..n {
        if g.degree(v) == 0 {
            permutation[v] = next;
            next += 1;
            marks.number(v);
        }
    }
    let isolated = next - 1;

    // Seeds in (degree, index) order; the cursor skips nodes an earlier component numbered.
    let mut seeds: Vec<usize> = (0..n).filter(|&v| g.degree(v) > 0).collect();
    seeds.sort_by_key(|&v| g.degree(v));

    let mut components = 0usize;
    {
        let mut frame = scratch.begin();
        for &seed in &seeds {
            if !marks.is_free(seed) {
                continue;
            }
            let mut work = frame.nested();

            let d = timed(timing_enabled, &mut timings.diameter, || {
                diameter::find(g, &mut marks, seed, &mut work.nested())
            })?;
            let c = timed(timing_enabled, &mut timings.combine, || {
                combine::combine(g, &mut marks, &d, &mut work)
            })?;

            let walk = Walk::new(g, &c);
            let assigned = timed(timing_enabled, &mut timings.number, || {
                let mut seq = match objective {
                    Objective::Bandwidth if !walk.from_start() => {
                        Sequence::descending(&mut permutation, next, d.active)
                    }
                    _ => Sequence::ascending(&mut permutation, next),
                };
                let numbered = match objective {
                    Objective::Bandwidth => rcm::number(g, &mut marks, &c, walk, &mut seq, &mut work),
                    Objective::Profile => king::number(g, &mut marks, &c, walk, &mut seq, &mut work),
                };
                numbered.map(|()| seq.assigned())
            })?;
            if assigned != d.active {
                return Err(Error::bad(format!(
                    "component seeded at node {} has {} nodes but {assigned} were numbered",
                    seed + 1,
                    d.active
                )));
            }

            tracing::debug!(
                component = components,
                seed = seed + 1,
                nodes = d.active,
                depth = d.depth,
                width = c.list.width(),
                reversed = c.reversed,
                from_start = walk.from_start(),
                "numbered component"
            );
            next += d.active;
            components += 1;
        }
    }

    if next != n + 1 {
        return Err(Error::bad(format!(
            "numbered {} of {n} nodes; the level structures lost track of the rest",
            next - 1
        )));
    }

    let (permutation, envelope) = timed(timing_enabled, &mut timings.evaluate, || {
        measure::choose(g, objective, permutation)
    });
    let scratch_used = scratch.peak();
    tracing::debug!(
        isolated,
        components,
        bandwidth = envelope.bandwidth,
        profile = envelope.profile,
        scratch_used,
        "reordered"
    );

    if let Some(s) = total_start {
        timings.total = s.elapsed();
        eprintln!(
            "[narwhal-timing] total={:?} diameter={:?} combine={:?} number={:?} evaluate={:?} nodes={} components={} scratch_used={}",
            timings.total,
            timings.diameter,
            timings.combine,
            timings.number,
            timings.evaluate,
            n,
            components,
            scratch_used,
        );
    }

    Ok(GraphOutput {
        permutation,
        bandwidth: envelope.bandwidth,
        profile: envelope.profile,
        scratch_used,
    })
}
