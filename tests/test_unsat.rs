//! Sizes with no round-robin design, and rejected input

use roundrobin_sat::{
    assign_groups, pair_rounds, AssignmentEncoding, PairingEncoding, ScheduleError, Solver,
};

#[test]
fn three_players_two_groups() {
    assert!(assign_groups(3, 2).unwrap().is_unsat());
    assert!(pair_rounds(3, 2).unwrap().is_unsat());
}

#[test]
fn four_players_three_groups() {
    // Four players only admit 1, 4 or 6 groups
    assert!(assign_groups(4, 3).unwrap().is_unsat());
    assert!(assign_groups(4, 5).unwrap().is_unsat());
    assert!(pair_rounds(4, 3).unwrap().is_unsat());
}

#[test]
fn five_players_two_groups() {
    let solution = assign_groups(5, 2).unwrap();

    assert!(solution.is_unsat());
    assert!(solution.schedule().is_none());
    assert!(solution.statistics().num_clauses() > 0);
}

#[test]
fn single_player_has_no_pairs() {
    // One player admits no group of two, so any group count is rejected
    let err = assign_groups(1, 1).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidArgument(_)));
}

#[test]
fn zero_sizes_rejected() {
    assert!(matches!(
        assign_groups(0, 3),
        Err(ScheduleError::InvalidArgument(_))
    ));
    assert!(matches!(
        assign_groups(3, 0),
        Err(ScheduleError::InvalidArgument(_))
    ));
    assert!(matches!(
        pair_rounds(0, 1),
        Err(ScheduleError::InvalidArgument(_))
    ));
}

#[test]
fn too_many_groups_rejected() {
    let solver = Solver::default();
    let err = solver.solve(&AssignmentEncoding, 4, 7).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidArgument(_)));

    let err = solver.solve(&PairingEncoding, 3, 4).unwrap_err();
    assert!(err.to_string().contains("3 players"));
}

#[test]
fn oversized_problems_rejected_before_encoding() {
    // The pair count alone overflows
    assert!(matches!(
        assign_groups(1 << 33, 1),
        Err(ScheduleError::InvalidArgument(_))
    ));

    // The pair count fits, but the pairing cube outgrows the label space
    assert!(matches!(
        pair_rounds(50_000, 1),
        Err(ScheduleError::InvalidArgument(_))
    ));
}
