mod common;

use common::*;
use narwhal::{Error, GraphInput, Objective, ScratchArena, reorder};

#[test]
fn undersized_arena_reports_a_size_that_works() {
    let input = graph(20, &scrambled(20, &path_edges(20), 4));
    let mut small = ScratchArena::with_capacity(10);
    let err = reorder(&input, Objective::Bandwidth, &mut small).unwrap_err();
    assert_eq!(err, Error::NoSpace { required: 123 });
    assert!(err.is_recoverable());

    let Error::NoSpace { required } = err else {
        unreachable!()
    };
    let mut retry = ScratchArena::with_capacity(required);
    let retried = reorder(&input, Objective::Bandwidth, &mut retry).unwrap();
    let mut large = ScratchArena::with_capacity(10 * required);
    let reference = reorder(&input, Objective::Bandwidth, &mut large).unwrap();
    assert_eq!(retried, reference);
}

#[test]
fn reported_peak_is_enough_to_reproduce_the_result() {
    for seed in [3u64, 8, 15, 21, 34] {
        let n = 30 + seed as usize;
        let input = graph(n, &random_edges(n, seed));
        for objective in [Objective::Bandwidth, Objective::Profile] {
            let mut roomy = ScratchArena::sufficient(n);
            let first = reorder(&input, objective, &mut roomy).unwrap();
            assert!(first.scratch_used <= ScratchArena::sufficient_words(n));
            assert_eq!(roomy.peak(), first.scratch_used);

            let mut exact = ScratchArena::with_capacity(first.scratch_used);
            let again = reorder(&input, objective, &mut exact).unwrap();
            assert_eq!(again.permutation, first.permutation, "seed {seed} {objective}");
        }
    }
}

#[test]
fn sufficient_arena_covers_dense_and_wide_shapes() {
    let cases: Vec<(usize, Vec<(usize, usize)>)> = vec![
        (25, star_edges(25)),
        (40, grid_edges(2, 20)),
        (36, grid_edges(6, 6)),
        (
            12,
            (1..=12)
                .flat_map(|a| (a + 1..=12).map(move |b| (a, b)))
                .collect(),
        ),
    ];
    for (n, edges) in cases {
        let input = graph(n, &edges);
        for objective in [Objective::Bandwidth, Objective::Profile] {
            let mut scratch = ScratchArena::with_capacity(ScratchArena::sufficient_words(n));
            let out = reorder(&input, objective, &mut scratch).unwrap();
            assert_bijection(&out.permutation);
        }
    }
}

#[test]
fn nominal_arena_fits_paths_and_grids() {
    let cases: Vec<(usize, Vec<(usize, usize)>)> = vec![
        (20, path_edges(20)),
        (20, scrambled(20, &path_edges(20), 9)),
        (100, grid_edges(10, 10)),
        (90, grid_edges(3, 30)),
        (48, scrambled(48, &grid_edges(6, 8), 2)),
    ];
    for (n, edges) in cases {
        let input = graph(n, &edges);
        for objective in [Objective::Bandwidth, Objective::Profile] {
            let mut scratch = ScratchArena::new(n);
            assert_eq!(scratch.capacity(), 4 * n);
            let out = reorder(&input, objective, &mut scratch)
                .unwrap_or_else(|err| panic!("{n} nodes, {objective}: {err}"));
            assert_bijection(&out.permutation);
            assert!(out.scratch_used <= 4 * n);

            let mut roomy = ScratchArena::sufficient(n);
            assert_eq!(reorder(&input, objective, &mut roomy).unwrap(), out);
        }
    }
}

#[test]
fn asymmetric_adjacency_is_bad_even_with_a_sufficient_arena() {
    let cycle = GraphInput {
        node_count: 3,
        degree: vec![1, 1, 1],
        adjacency_start: vec![1, 2, 3],
        adjacency: vec![2, 3, 1],
    };
    for objective in [Objective::Bandwidth, Objective::Profile] {
        let mut scratch = ScratchArena::sufficient(3);
        let err = reorder(&cycle, objective, &mut scratch).unwrap_err();
        assert!(matches!(err, Error::BadElement { .. }), "{err}");
    }

    // One direction of a single edge dropped from an otherwise fine graph.
    let mut input = graph(6, &grid_edges(2, 3));
    input.degree[5] -= 1;
    let mut scratch = ScratchArena::sufficient(6);
    assert!(matches!(
        reorder(&input, Objective::Bandwidth, &mut scratch),
        Err(Error::BadElement { .. })
    ));
}

#[test]
fn failed_calls_leave_the_input_alone() {
    let input = graph(15, &random_edges(15, 6));
    let before = input.clone();
    let mut tiny = ScratchArena::with_capacity(4);
    assert!(reorder(&input, Objective::Profile, &mut tiny).is_err());
    assert_eq!(input, before);

    let mut broken = input.clone();
    broken.degree[3] = -2;
    let snapshot = broken.clone();
    let mut scratch = ScratchArena::sufficient(15);
    let err = reorder(&broken, Objective::Bandwidth, &mut scratch).unwrap_err();
    assert!(matches!(err, Error::BadElement { .. }));
    assert!(!err.is_recoverable());
    assert_eq!(broken, snapshot);
}

#[test]
fn malformed_adjacency_is_rejected() {
    let mut input = graph(4, &path_edges(4));
    input.adjacency[1] = 0;
    let mut scratch = ScratchArena::sufficient(4);
    assert!(matches!(
        reorder(&input, Objective::Bandwidth, &mut scratch),
        Err(Error::BadElement { .. })
    ));

    let mut input = graph(4, &path_edges(4));
    input.adjacency_start.pop();
    assert!(input.validate().is_err());
}
