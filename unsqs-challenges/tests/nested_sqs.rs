use unsqs_challenges::{nested_sqs::*, ErrorKind, UnsqsError};

// Planes of AG(3,2) split so that all 28 pairs occur exactly once.
const UNSQS_8_28: [[usize; 4]; 14] = [
    [0, 1, 2, 3],
    [0, 4, 1, 5],
    [0, 6, 1, 7],
    [0, 2, 4, 6],
    [0, 5, 2, 7],
    [0, 7, 3, 4],
    [0, 3, 5, 6],
    [1, 2, 4, 7],
    [1, 6, 2, 5],
    [1, 4, 3, 6],
    [1, 3, 5, 7],
    [2, 4, 3, 5],
    [2, 6, 3, 7],
    [4, 5, 6, 7],
];

fn known_solution() -> Solution {
    Solution {
        blocks: UNSQS_8_28.to_vec(),
    }
}

#[test]
fn test_generate_instance_derives_targets() {
    let challenge = Challenge::generate_instance(42, &Track { v: 8, p: 28 }).unwrap();
    assert_eq!(challenge.required_blocks, 14);
    assert_eq!(challenge.total_pairs, 28);
    assert_eq!(challenge.f_target, 1);

    let challenge = Challenge::generate_instance(42, &Track { v: 16, p: 56 }).unwrap();
    assert_eq!(challenge.required_blocks, 140);
    assert_eq!(challenge.f_target, 5);
}

#[test]
fn test_generate_instance_rejects_fractional_target() {
    // 8*7*6 = 336 is not a multiple of 12*5
    let err = Challenge::generate_instance(0, &Track { v: 8, p: 5 }).unwrap_err();
    assert_eq!(
        err,
        UnsqsError::FractionalTarget {
            v: 8,
            p: 5,
            total_pairs: 28
        }
    );
    assert_eq!(err.kind(), ErrorKind::Parameter);
}

#[test]
fn test_generate_instance_rejects_degenerate_parameters() {
    assert_eq!(
        Challenge::generate_instance(0, &Track { v: 3, p: 1 }).unwrap_err(),
        UnsqsError::TooFewPoints { v: 3 }
    );
    assert_eq!(
        Challenge::generate_instance(0, &Track { v: 62, p: 1891 }).unwrap_err(),
        UnsqsError::TooManyPoints {
            v: 62,
            max_points: MAX_POINTS
        }
    );
    // would overflow v*(v-1)*(v-2) if it were computed
    let err = Challenge::generate_instance(0, &Track { v: 1 << 22, p: 1 }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert!(Challenge::generate_instance(0, &Track { v: MAX_POINTS, p: 1711 }).is_ok());
    assert_eq!(
        Challenge::generate_instance(0, &Track { v: 7, p: 7 }).unwrap_err(),
        UnsqsError::FractionalBlockCount { v: 7 }
    );
    assert_eq!(
        Challenge::generate_instance(0, &Track { v: 8, p: 0 }).unwrap_err(),
        UnsqsError::InvalidDistinctPairs { p: 0, max_pairs: 28 }
    );
    assert_eq!(
        Challenge::generate_instance(0, &Track { v: 8, p: 56 }).unwrap_err(),
        UnsqsError::InvalidDistinctPairs {
            p: 56,
            max_pairs: 28
        }
    );
}

#[test]
fn test_generate_instance_rejects_target_above_pair_degree() {
    // every pair of an SQS(8) lies in 3 blocks, so 7 occurrences are impossible
    let err = Challenge::generate_instance(0, &Track { v: 8, p: 4 }).unwrap_err();
    assert_eq!(
        err,
        UnsqsError::TargetExceedsPairDegree {
            f_target: 7,
            pair_degree: 3
        }
    );
    assert_eq!(err.kind(), ErrorKind::Parameter);
}

#[test]
fn test_catalogue_instances_are_admissible() {
    for (v, p) in DEV_INSTANCES.iter().chain(OPEN_INSTANCES.iter()) {
        assert!(
            Challenge::generate_instance(0, &Track::from((*v, *p))).is_ok(),
            "({}, {}) rejected",
            v,
            p
        );
    }
}

#[test]
fn test_verify_known_solution() {
    let challenge = Challenge::generate_instance(0, &Track { v: 8, p: 28 }).unwrap();
    assert_eq!(challenge.verify_solution(&known_solution()), Ok(()));
}

#[test]
fn test_verify_rejects_wrong_row_count() {
    let challenge = Challenge::generate_instance(0, &Track { v: 8, p: 28 }).unwrap();
    let mut solution = known_solution();
    solution.blocks.pop();
    let err = challenge.verify_solution(&solution).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSolution);
}

#[test]
fn test_verify_rejects_out_of_range_and_repeated_points() {
    let challenge = Challenge::generate_instance(0, &Track { v: 8, p: 28 }).unwrap();

    let mut solution = known_solution();
    solution.blocks[3] = [0, 2, 4, 8];
    assert!(challenge.verify_solution(&solution).is_err());

    let mut solution = known_solution();
    solution.blocks[3] = [0, 2, 4, 4];
    assert!(challenge.verify_solution(&solution).is_err());
}

#[test]
fn test_verify_rejects_repeated_triple() {
    let challenge = Challenge::generate_instance(0, &Track { v: 8, p: 28 }).unwrap();
    let mut solution = known_solution();
    // shares the triple {0,1,2} with the first block
    solution.blocks[13] = [0, 4, 1, 2];
    let err = challenge.verify_solution(&solution).unwrap_err();
    match err {
        UnsqsError::InvalidSolution { reason } => assert!(reason.contains("[0, 1, 2]")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_verify_rejects_non_uniform_pairs() {
    let challenge = Challenge::generate_instance(0, &Track { v: 8, p: 28 }).unwrap();
    let mut solution = known_solution();
    // same block, different split: {0,1},{2,3} becomes {0,2},{1,3}
    solution.blocks[0] = [0, 2, 1, 3];
    let err = challenge.verify_solution(&solution).unwrap_err();
    match err {
        UnsqsError::InvalidSolution { reason } => assert!(reason.contains("occurs 2 times")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_solution_text_format() {
    let solution = known_solution();
    let text = solution.to_text(false);
    assert!(text.starts_with("0 1 2 3\n0 4 1 5\n"));
    assert_eq!(Solution::from_text(&text, false).unwrap(), solution);

    let one_indexed = solution.to_text(true);
    assert!(one_indexed.starts_with("1 2 3 4\n"));
    assert_eq!(Solution::from_text(&one_indexed, true).unwrap(), solution);
}

#[test]
fn test_solution_text_rejects_short_rows() {
    let err = Solution::from_text("0 1 2 3\n4 5 6\n", false).unwrap_err();
    match err {
        UnsqsError::InvalidSolution { reason } => assert!(reason.starts_with("line 2")),
        other => panic!("unexpected error {:?}", other),
    }
}
