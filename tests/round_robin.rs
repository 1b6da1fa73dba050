//! End-to-end schedules from the assignment encoding

use roundrobin_sat::{assign_groups, AssignmentEncoding, GroupSchedule, Solver};

fn solve(players: usize, groups: usize) -> GroupSchedule {
    assign_groups(players, groups)
        .unwrap()
        .into_schedule()
        .unwrap_or_else(|| panic!("{players} players / {groups} groups should be satisfiable"))
}

#[test]
fn four_players_six_groups_are_all_pairs() {
    let schedule = solve(4, 6);

    assert_eq!(
        schedule.groups(),
        &[
            vec![0, 1],
            vec![0, 2],
            vec![0, 3],
            vec![1, 2],
            vec![1, 3],
            vec![2, 3]
        ]
    );
    schedule.verify(4).unwrap();
}

#[test]
fn four_players_four_groups_is_near_pencil() {
    let schedule = solve(4, 4);
    schedule.verify(4).unwrap();

    // One triple, and the fourth player paired with each of its members
    let mut sizes: Vec<usize> = schedule.groups().iter().map(Vec::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 2, 2, 3]);

    let triple = schedule.groups().iter().find(|g| g.len() == 3).unwrap();
    let outsider = (0..4).find(|p| !triple.contains(p)).unwrap();
    for &member in triple {
        assert_eq!(schedule.co_occurrences(member, outsider), 1);
    }
}

#[test]
fn single_group_holds_everyone() {
    let schedule = solve(5, 1);
    assert_eq!(schedule.groups(), &[vec![0, 1, 2, 3, 4]]);
}

#[test]
fn two_players_one_group() {
    let schedule = solve(2, 1);
    assert_eq!(schedule.groups(), &[vec![0, 1]]);
}

#[test]
fn seven_players_seven_groups() {
    let schedule = solve(7, 7);
    schedule.verify(7).unwrap();
    assert_eq!(schedule.len(), 7);

    // Only the Fano plane and the near-pencil have seven points and lines
    let mut sizes: Vec<usize> = schedule.groups().iter().map(Vec::len).collect();
    sizes.sort_unstable();
    assert!(
        sizes == vec![3; 7] || sizes == vec![2, 2, 2, 2, 2, 2, 6],
        "unexpected group sizes {sizes:?}"
    );
}

#[test]
fn groups_are_sorted_by_smallest_member() {
    let schedule = solve(5, 6);
    schedule.verify(5).unwrap();

    for group in schedule.groups() {
        assert!(group.windows(2).all(|w| w[0] < w[1]));
    }
    let firsts: Vec<usize> = schedule.groups().iter().map(|g| g[0]).collect();
    assert!(firsts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn repeated_solves_are_identical() {
    let solver = Solver::default();
    let first = solver.solve(&AssignmentEncoding, 6, 7).unwrap();
    let second = solver.solve(&AssignmentEncoding, 6, 7).unwrap();

    assert_eq!(first.is_sat(), second.is_sat());
    assert_eq!(first.schedule(), second.schedule());
}

#[test]
fn every_player_appears() {
    let schedule = solve(6, 10);
    schedule.verify(6).unwrap();

    for player in 0..6 {
        assert!(schedule.groups().iter().any(|g| g.contains(&player)));
    }
}
