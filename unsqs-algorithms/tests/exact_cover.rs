use unsqs_algorithms::nested_sqs::*;
use unsqs_challenges::{ErrorKind, UnsqsError};

fn assert_exact_cover(v: usize, blocks: &[[usize; 4]]) {
    let universe = Universe::new(v);
    assert_eq!(blocks.len(), v * (v - 1) * (v - 2) / 24);

    let mut times_covered = vec![0; universe.num_triples()];
    for &[a, b, c, d] in blocks {
        assert!(a < b && b < c && c < d && d < v, "{:?}", [a, b, c, d]);
        for [i, j, k] in [[a, b, c], [a, b, d], [a, c, d], [b, c, d]] {
            times_covered[universe.triple_id(i, j, k)] += 1;
        }
    }
    assert!(times_covered.iter().all(|&n| n == 1));
}

#[test]
fn test_universe_tables() {
    let universe = Universe::new(8);
    assert_eq!(universe.num_triples(), 56);
    assert_eq!(universe.num_candidates(), 70);
    assert_eq!(universe.required_blocks(), 14);

    // lexicographic triple ids
    assert_eq!(universe.triple_id(0, 1, 2), 0);
    assert_eq!(universe.triple_id(0, 1, 3), 1);
    assert_eq!(universe.triple_id(5, 6, 7), 55);
    assert_eq!(universe.triple(universe.triple_id(2, 4, 7)), [2, 4, 7]);

    let block = universe.candidate(0);
    assert_eq!(block.points, [0, 1, 2, 3]);
    assert_eq!(
        block.triples,
        [
            universe.triple_id(0, 1, 2),
            universe.triple_id(0, 1, 3),
            universe.triple_id(0, 2, 3),
            universe.triple_id(1, 2, 3),
        ]
    );

    for t in 0..universe.num_triples() {
        let covering = universe.covering(t);
        assert_eq!(covering.len(), 5);
        assert!(covering.windows(2).all(|w| w[0] < w[1]));
        assert!(covering
            .iter()
            .all(|&c| universe.candidate(c).triples.contains(&t)));
    }
}

#[test]
fn test_sqs_4_is_a_single_block() {
    assert_eq!(construct_sqs(4).unwrap(), vec![[0, 1, 2, 3]]);
}

#[test]
fn test_sqs_8() {
    let blocks = construct_sqs(8).unwrap();
    assert_exact_cover(8, &blocks);
    // without backtracking the search lands on the planes of AG(3,2)
    assert_eq!(
        blocks,
        vec![
            [0, 1, 2, 3],
            [0, 1, 4, 5],
            [0, 1, 6, 7],
            [0, 2, 4, 6],
            [0, 2, 5, 7],
            [0, 3, 4, 7],
            [0, 3, 5, 6],
            [1, 2, 4, 7],
            [1, 2, 5, 6],
            [1, 3, 4, 6],
            [1, 3, 5, 7],
            [2, 3, 4, 5],
            [2, 3, 6, 7],
            [4, 5, 6, 7],
        ]
    );
}

#[test]
fn test_sqs_10_and_14() {
    for v in [10, 14] {
        let blocks = construct_sqs(v).unwrap();
        assert_exact_cover(v, &blocks);
    }
}

#[test]
fn test_construction_is_deterministic() {
    assert_eq!(construct_sqs(14).unwrap(), construct_sqs(14).unwrap());
}

#[test]
fn test_construction_reports_infeasible_order() {
    // 6*5*4/24 = 5 blocks would be needed, but no SQS(6) exists
    let universe = Universe::new(6);
    let mut search = ExactCover::new(&universe);
    let err = search.solve().unwrap_err();
    assert!(matches!(err, UnsqsError::ConstructionFailed { v: 6, .. }));
    assert_eq!(err.kind(), ErrorKind::Construction);

    // the search unwinds completely
    for t in 0..universe.num_triples() {
        assert!(!search.is_covered(t));
        assert_eq!(search.available_candidates(t), universe.covering(t).len());
    }
}

#[test]
fn test_stats_track_search() {
    let universe = Universe::new(10);
    let mut search = ExactCover::new(&universe);
    search.solve().unwrap();
    let stats = search.stats();
    assert!(stats.nodes >= 30);
    assert_eq!(stats.max_depth, 30);
}
