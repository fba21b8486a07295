mod common;

use common::*;
use narwhal::{Objective, ScratchArena, reorder};

const BOTH: [Objective; 2] = [Objective::Bandwidth, Objective::Profile];

fn run(n: usize, edges: &[(usize, usize)], objective: Objective) -> narwhal::GraphOutput {
    let input = graph(n, edges);
    let mut scratch = ScratchArena::sufficient(n);
    reorder(&input, objective, &mut scratch).unwrap()
}

#[test]
fn scrambled_path_is_laid_out_end_to_end() {
    let edges = scrambled(12, &path_edges(12), 7);
    for objective in BOTH {
        let out = run(12, &edges, objective);
        assert_bijection(&out.permutation);
        assert_eq!(out.bandwidth, 1, "{objective}");
        assert_eq!(out.profile, 11, "{objective}");
    }
}

#[test]
fn star_fixture_is_pinned() {
    let edges = star_edges(7);

    let out = run(7, &edges, Objective::Bandwidth);
    assert_eq!(out.permutation, vec![4, 3, 7, 2, 6, 1, 5]);
    assert_eq!((out.bandwidth, out.profile), (3, 9));

    let out = run(7, &edges, Objective::Profile);
    assert_eq!(out.permutation, vec![4, 5, 1, 6, 2, 7, 3]);
    assert_eq!((out.bandwidth, out.profile), (3, 9));
}

#[test]
fn boolean_entry_point_selects_the_objective() {
    let input = graph(7, &star_edges(7));
    let mut scratch = ScratchArena::sufficient(7);
    let by_flag = narwhal::minimize_bandwidth_or_profile(&input, false, &mut scratch).unwrap();
    let by_enum = reorder(&input, Objective::Profile, &mut scratch).unwrap();
    assert_eq!(by_flag, by_enum);
}

#[test]
fn disconnected_components_are_numbered_independently() {
    // A star on 1..=7 and a path on 8..=13, both scrambled inside their own id range.
    let star = scrambled(7, &star_edges(7), 3);
    let path: Vec<_> = scrambled(6, &path_edges(6), 5)
        .into_iter()
        .map(|(a, b)| (a + 7, b + 7))
        .collect();
    let edges: Vec<_> = star.iter().chain(&path).copied().collect();

    let star_alone = run(7, &star, Objective::Bandwidth);
    let whole = run(13, &edges, Objective::Bandwidth);
    assert_bijection(&whole.permutation);
    assert_eq!(whole.bandwidth, star_alone.bandwidth.max(1));
    assert_eq!(bandwidth_of(&edges, &whole.permutation), whole.bandwidth);

    let whole = run(13, &edges, Objective::Profile);
    assert_bijection(&whole.permutation);
    assert_eq!(bandwidth_of(&edges, &whole.permutation), whole.bandwidth);
}

#[test]
fn isolated_nodes_come_first() {
    // 1 and 3 are isolated; 2 - 4 - 5 is a path.
    let out = run(5, &[(2, 5), (5, 4)], Objective::Bandwidth);
    assert_eq!(out.permutation[0], 1);
    assert_eq!(out.permutation[2], 2);
    assert_eq!(out.bandwidth, 1);
}

#[test]
fn degenerate_graphs() {
    for objective in BOTH {
        let empty = run(0, &[], objective);
        assert!(empty.permutation.is_empty());
        assert_eq!((empty.bandwidth, empty.profile), (0, 0));

        let edgeless = run(3, &[], objective);
        assert_eq!(edgeless.permutation, vec![1, 2, 3]);

        let pair = run(2, &[(2, 1)], objective);
        assert_bijection(&pair.permutation);
        assert_eq!(pair.bandwidth, 1);
    }
}

#[test]
fn grid_bandwidth_follows_the_short_side() {
    // Row-major numbering of a 5 x 10 grid has bandwidth 10; anti-diagonal levels hold at most
    // five nodes each.
    let edges = scrambled(50, &grid_edges(5, 10), 11);
    let out = run(50, &edges, Objective::Bandwidth);
    assert_bijection(&out.permutation);
    assert!(out.bandwidth <= 9, "bandwidth {}", out.bandwidth);
    assert_eq!(bandwidth_of(&edges, &out.permutation), out.bandwidth);
}

#[test]
fn random_graphs_never_lose_to_the_identity() {
    for seed in 1..=40u64 {
        let n = 1 + (seed as usize * 7) % 60;
        let edges = random_edges(n, seed);
        let input = graph(n, &edges);
        let identity: Vec<usize> = (1..=n).collect();
        let before = narwhal::measure(&input, &identity).unwrap();

        let mut scratch = ScratchArena::sufficient(n);
        let rcm = reorder(&input, Objective::Bandwidth, &mut scratch).unwrap();
        assert_bijection(&rcm.permutation);
        assert!(rcm.bandwidth <= before.bandwidth, "seed {seed}");

        let king = reorder(&input, Objective::Profile, &mut scratch).unwrap();
        assert_bijection(&king.permutation);
        assert!(king.profile <= before.profile, "seed {seed}");
    }
}

#[test]
fn reordering_the_reordered_graph_does_not_regress() {
    for seed in [2u64, 9, 23, 31] {
        let n = 45;
        let edges = random_edges(n, seed);
        for objective in BOTH {
            let first = run(n, &edges, objective);
            let again = run(n, &relabel(&edges, &first.permutation), objective);
            match objective {
                Objective::Bandwidth => assert!(again.bandwidth <= first.bandwidth, "seed {seed}"),
                Objective::Profile => assert!(again.profile <= first.profile, "seed {seed}"),
            }
        }
    }
}

#[test]
fn objective_parses_from_text() {
    assert_eq!("Profile".parse::<Objective>().unwrap(), Objective::Profile);
    assert_eq!(" rcm ".parse::<Objective>().unwrap(), Objective::Bandwidth);
    let err = "fastest".parse::<Objective>().unwrap_err();
    assert_eq!(err.name, "fastest");
    assert!(err.to_string().contains("expected `bandwidth` or `profile`"));
    assert_eq!(Objective::default(), Objective::Bandwidth);
    assert_eq!(
        serde_json::to_string(&Objective::Profile).unwrap(),
        "\"profile\""
    );
}
