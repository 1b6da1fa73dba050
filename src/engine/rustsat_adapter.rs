//! Adapters for rustsat solver backends
//!
//! Provides adapters to use rustsat-compatible SAT solvers as the solving
//! capability behind a session.

use super::SATSolver;
use crate::{Result, ScheduleError};
use rustsat::types::{Assignment, Clause, Lit, TernaryVal, Var};

/// Adapter that wraps rustsat solvers to implement our SATSolver trait
///
/// # Example
///
/// ```ignore
/// use rustsat_batsat::BasicSolver;
/// let solver = RustSatAdapter::new(BasicSolver::default());
/// ```
pub struct RustSatAdapter<S> {
    solver: S,
    num_vars: u32,
    num_clauses: u32,
    /// Highest variable mentioned by a clause
    max_var: u32,
    assignment: Option<Assignment>,
}

impl<S> RustSatAdapter<S> {
    /// Creates a new adapter wrapping the given solver
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            num_vars: 0,
            num_clauses: 0,
            max_var: 0,
            assignment: None,
        }
    }
}

fn to_lit(lit: i32) -> Result<Lit> {
    if lit == 0 {
        return Err(ScheduleError::SolverFailure("literal 0 is not a variable".to_string()));
    }
    let var_idx = lit.unsigned_abs() - 1;
    if var_idx > Var::MAX_IDX {
        return Err(ScheduleError::SolverFailure(format!(
            "literal {lit} out of range for rustsat (max index {})",
            Var::MAX_IDX
        )));
    }
    let var = Var::new(var_idx);
    Ok(if lit > 0 { var.pos_lit() } else { var.neg_lit() })
}

impl<S: rustsat::solvers::Solve> SATSolver for RustSatAdapter<S> {
    fn add_variables(&mut self, num_vars: u32) {
        // RustSat creates variables as clauses mention them; only the count
        // is tracked here
        self.num_vars += num_vars;
    }

    fn add_clause(&mut self, lits: &[i32]) -> Result<()> {
        let lits = lits.iter().map(|&lit| to_lit(lit)).collect::<Result<Vec<Lit>>>()?;
        if let Some(high) = lits.iter().map(|lit| lit.var().idx32() + 1).max() {
            self.max_var = self.max_var.max(high);
        }
        let clause = Clause::from(&lits[..]);
        self.num_clauses += 1;
        self.assignment = None;
        self.solver
            .add_clause(clause)
            .map_err(|e| ScheduleError::SolverFailure(e.to_string()))
    }

    fn solve(&mut self) -> Result<bool> {
        use rustsat::solvers::SolverResult;

        let result = self
            .solver
            .solve()
            .map_err(|e| ScheduleError::SolverFailure(e.to_string()))?;

        match result {
            SolverResult::Sat => {
                // The backend only knows variables that reached a clause
                self.assignment = if self.max_var == 0 {
                    None
                } else {
                    let high_var = Var::new(self.max_var - 1);
                    Some(
                        self.solver
                            .solution(high_var)
                            .map_err(|e| ScheduleError::SolverFailure(e.to_string()))?,
                    )
                };
                Ok(true)
            }
            SolverResult::Unsat => {
                self.assignment = None;
                Ok(false)
            }
            SolverResult::Interrupted => Err(ScheduleError::SolverFailure(
                "solver was interrupted".to_string(),
            )),
        }
    }

    fn value_of(&self, var: u32) -> bool {
        if var == 0 || var > self.max_var {
            return false;
        }
        match &self.assignment {
            Some(assignment) => matches!(assignment.var_value(Var::new(var - 1)), TernaryVal::True),
            None => false,
        }
    }

    fn num_variables(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> u32 {
        self.num_clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustsat_batsat::BasicSolver;

    #[test]
    fn test_batsat_adapter_basic() {
        let mut solver = RustSatAdapter::new(BasicSolver::default());

        solver.add_variables(2);
        assert_eq!(solver.num_variables(), 2);

        // x1 OR x2
        solver.add_clause(&[1, 2]).unwrap();
        assert_eq!(solver.num_clauses(), 1);

        assert!(solver.solve().unwrap());
    }

    #[test]
    fn test_batsat_adapter_unsat() {
        let mut solver = RustSatAdapter::new(BasicSolver::default());

        solver.add_variables(1);
        solver.add_clause(&[1]).unwrap();
        solver.add_clause(&[-1]).unwrap();

        assert!(!solver.solve().unwrap());
        assert!(!solver.value_of(1));
    }

    #[test]
    fn test_batsat_adapter_solution() {
        let mut solver = RustSatAdapter::new(BasicSolver::default());

        solver.add_variables(2);
        solver.add_clause(&[1]).unwrap();
        solver.add_clause(&[-2]).unwrap();

        assert!(solver.solve().unwrap());
        assert!(solver.value_of(1));
        assert!(!solver.value_of(2));
        // Out of range reads as false
        assert!(!solver.value_of(0));
        assert!(!solver.value_of(3));
    }

    #[test]
    fn test_zero_literal_rejected() {
        let mut solver = RustSatAdapter::new(BasicSolver::default());
        solver.add_variables(1);

        let err = solver.add_clause(&[0]).unwrap_err();
        assert!(matches!(err, ScheduleError::SolverFailure(_)));
    }
}
