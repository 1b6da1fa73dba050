//! SAT solver trait and implementations

pub mod rustsat_adapter;

pub use rustsat_adapter::RustSatAdapter;

use crate::Result;

/// Core SAT solver trait
///
/// This is the only boundary to the external solving engine. Variables are
/// 1-indexed, and literals are represented as signed integers (positive for
/// true, negative for false).
pub trait SATSolver {
    /// Adds the given number of variables to the solver
    fn add_variables(&mut self, num_vars: u32);

    /// Adds a clause to the solver
    ///
    /// # Arguments
    /// * `lits` - Slice of literals (1-indexed, negated by sign)
    fn add_clause(&mut self, lits: &[i32]) -> Result<()>;

    /// Solves the current formula
    ///
    /// Returns true if satisfiable, false if unsatisfiable. Backend failures
    /// and interrupts are errors, never UNSAT.
    fn solve(&mut self) -> Result<bool>;

    /// Returns the assignment of a variable in the solution
    ///
    /// Only meaningful after solve() returns true. Unknown variables read
    /// as false.
    fn value_of(&self, var: u32) -> bool;

    /// Returns the number of variables in the solver
    fn num_variables(&self) -> u32;

    /// Returns the number of clauses added
    fn num_clauses(&self) -> u32;
}
