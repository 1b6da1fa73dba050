//! Assignment model: each variable says "player i is in group g".

use super::{exactly_one, not_exactly_one, Problem, ProblemEncoding};
use crate::bool::{BoolValue, VariableGrid};
use crate::schedule::GroupSchedule;
use crate::session::{Model, Session};
use crate::{Result, ScheduleError};
use log::trace;

/// Encodes the design as a `players × groups` membership grid
///
/// Axioms:
/// - every pair of players shares exactly one group
/// - no group has exactly one member, and every group has some member
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentEncoding;

impl ProblemEncoding for AssignmentEncoding {
    type Schedule = GroupSchedule;

    fn name(&self) -> &'static str {
        "assignment"
    }

    fn allocate(&self, session: &mut Session<'_>, problem: &Problem) -> Result<VariableGrid> {
        session.allocate_matrix(problem.players(), problem.groups())
    }

    fn compile(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let groups = grid.dimensions().groups();

        for i in 0..players {
            for j in i + 1..players {
                let shared: Vec<BoolValue> = (0..groups)
                    .map(|u| f.and(grid.at(i, u).into(), grid.at(j, u).into()))
                    .collect();
                session.assert(exactly_one(f, &shared));
            }
        }
        trace!("assignment: pair co-occurrence axioms asserted");

        for u in 0..groups {
            let members: Vec<BoolValue> = (0..players).map(|i| grid.at(i, u).into()).collect();
            session.assert(not_exactly_one(f, &members));
            session.assert(f.or_multi(members));
        }
        trace!("assignment: group size axioms asserted");
    }

    fn decode(&self, grid: &VariableGrid, model: &Model) -> Result<GroupSchedule> {
        let players = grid.dimensions().players();
        let groups = grid.dimensions().groups();

        let mut members = vec![Vec::new(); groups];
        for i in 0..players {
            for (k, group) in members.iter_mut().enumerate() {
                if model.value(grid.at(i, k)) {
                    group.push(i);
                }
            }
        }

        if let Some(k) = members.iter().position(Vec::is_empty) {
            return Err(ScheduleError::InvariantViolation(format!(
                "group {k} decoded with no members"
            )));
        }

        Ok(GroupSchedule::new(members))
    }

    fn verify(&self, schedule: &GroupSchedule, problem: &Problem) -> Result<()> {
        if schedule.len() != problem.groups() {
            return Err(ScheduleError::InvariantViolation(format!(
                "decoded {} groups, expected {}",
                schedule.len(),
                problem.groups()
            )));
        }
        schedule.verify(problem.players())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool::{FormulaArena, Options};

    #[test]
    fn decode_sorts_by_smallest_member() {
        let arena = FormulaArena::new();
        let problem = Problem::new(3, 3).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();

        // group 0 = {1, 2}, group 1 = {0, 2}, group 2 = {0, 1}
        let model = Model::from_true([
            grid.at(1, 0),
            grid.at(2, 0),
            grid.at(0, 1),
            grid.at(2, 1),
            grid.at(0, 2),
            grid.at(1, 2),
        ]);
        let schedule = AssignmentEncoding.decode(&grid, &model).unwrap();

        assert_eq!(schedule.groups(), &[vec![0, 1], vec![0, 2], vec![1, 2]]);
        assert!(AssignmentEncoding.verify(&schedule, &problem).is_ok());
    }

    #[test]
    fn empty_group_is_invariant_violation() {
        let arena = FormulaArena::new();
        let problem = Problem::new(3, 3).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();

        let model = Model::from_true([grid.at(0, 0), grid.at(1, 0), grid.at(2, 0)]);
        let err = AssignmentEncoding.decode(&grid, &model).unwrap_err();

        assert!(matches!(err, ScheduleError::InvariantViolation(_)));
    }

    #[test]
    fn axioms_accept_near_pencil() {
        let arena = FormulaArena::new();
        let problem = Problem::new(4, 4).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();
        AssignmentEncoding.compile(&session, &grid);

        // {0,1,2}, {0,3}, {1,3}, {2,3}
        let truth = [(0, 0), (1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (3, 2), (2, 3), (3, 3)];
        let model = Model::from_true(truth.iter().map(|&(i, g)| grid.at(i, g)));

        assert!(session.satisfied_by(&model));
    }

    #[test]
    fn axioms_reject_singleton_group() {
        let arena = FormulaArena::new();
        let problem = Problem::new(3, 2).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();
        AssignmentEncoding.compile(&session, &grid);

        // {0,1,2}, {2}: every pair still shares exactly one group
        let truth = [(0, 0), (1, 0), (2, 0), (2, 1)];
        let model = Model::from_true(truth.iter().map(|&(i, g)| grid.at(i, g)));

        assert!(!session.satisfied_by(&model));
    }

    #[test]
    fn axioms_reject_repeated_pair() {
        let arena = FormulaArena::new();
        let problem = Problem::new(3, 2).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();
        AssignmentEncoding.compile(&session, &grid);

        // {0,1,2}, {0,1}
        let truth = [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)];
        let model = Model::from_true(truth.iter().map(|&(i, g)| grid.at(i, g)));

        assert!(!session.satisfied_by(&model));
    }

    #[test]
    fn single_group_of_everyone() {
        let arena = FormulaArena::new();
        let problem = Problem::new(4, 1).unwrap();
        let mut session = Session::new(&arena, Options::default());
        let grid = AssignmentEncoding.allocate(&mut session, &problem).unwrap();
        AssignmentEncoding.compile(&session, &grid);

        let model = Model::from_true((0..4).map(|i| grid.at(i, 0)));
        assert!(session.satisfied_by(&model));

        let schedule = AssignmentEncoding.decode(&grid, &model).unwrap();
        assert_eq!(schedule.groups(), &[vec![0, 1, 2, 3]]);
        assert!(AssignmentEncoding.verify(&schedule, &problem).is_ok());
    }
}
