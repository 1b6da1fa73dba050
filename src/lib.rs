//! # roundrobin-sat
//!
//! SAT encodings of round-robin tournament designs.
//!
//! A design splits `players` into `groups` so that every pair of players
//! meets in exactly one group. The crate builds the design axioms as a
//! boolean circuit, translates it to CNF, solves it with a SAT backend and
//! decodes the model back into a schedule.
//!
//! Two interchangeable encodings are provided:
//! - [`AssignmentEncoding`]: one variable per (player, group)
//! - [`PairingEncoding`]: one variable per (player, player, round), with
//!   clique closure forcing each round to be one group
//!
//! ## Example
//!
//! ```rust,no_run
//! use roundrobin_sat::{assign_groups, Solution};
//!
//! match assign_groups(7, 7)? {
//!     Solution::Sat { schedule, .. } => {
//!         for group in schedule.groups() {
//!             println!("{group:?}");
//!         }
//!     }
//!     Solution::Unsat { .. } => println!("no solution"),
//! }
//! # Ok::<(), roundrobin_sat::ScheduleError>(())
//! ```

#![warn(missing_docs)]

/// Boolean circuit types, arena, factory and variable allocation
pub mod bool;

/// CNF translation
pub mod cnf;

/// SAT backend trait and adapters
pub mod engine;

/// Solving sessions and models
pub mod session;

/// Problem encodings and the exactly-one construction
pub mod encoding;

/// Decoded schedules and their verification
pub mod schedule;

/// Main solver API
pub mod solver;

/// Error types
pub mod error {
    //! Error types for roundrobin-sat

    use thiserror::Error;

    /// Errors that can occur while building or solving a schedule
    ///
    /// An unsatisfiable problem is not an error; see
    /// [`Solution::Unsat`](crate::solver::Solution::Unsat).
    #[derive(Error, Debug)]
    pub enum ScheduleError {
        /// Problem size rejected before encoding
        #[error("invalid argument: {0}")]
        InvalidArgument(String),

        /// Decoded model breaks an exactly-one or closure axiom
        #[error("invariant violation: {0}")]
        InvariantViolation(String),

        /// SAT backend failed or was interrupted
        #[error("solver failure: {0}")]
        SolverFailure(String),
    }

    /// Result type for roundrobin-sat operations
    pub type Result<T> = std::result::Result<T, ScheduleError>;
}

// Re-export commonly used types
pub use encoding::{AssignmentEncoding, PairingEncoding, Problem, ProblemEncoding};
pub use error::{Result, ScheduleError};
pub use schedule::{GroupSchedule, PairingMatrix, Round, RoundSchedule};
pub use solver::{assign_groups, pair_rounds, Options, Solution, Solver, Statistics};
