//! Main solver API
//!
//! The solver runs one encoding of a round-robin problem through a fresh
//! session: allocate variables, compile axioms, translate to CNF, solve,
//! decode and verify.

use crate::bool::{FormulaArena, Options as BoolOptions};
use crate::encoding::{AssignmentEncoding, PairingEncoding, Problem, ProblemEncoding};
use crate::engine::{RustSatAdapter, SATSolver};
use crate::schedule::{GroupSchedule, RoundSchedule};
use crate::session::Session;
use crate::Result;
use log::{debug, info};
use rustsat_batsat::BasicSolver;
use std::time::{Duration, Instant};

/// Solver options
#[derive(Debug, Clone)]
pub struct Options {
    /// Boolean circuit options
    pub bool_options: BoolOptions,
    /// Re-check decoded schedules against the design properties
    /// (default: true)
    pub verify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bool_options: BoolOptions::default(),
            verify: true,
        }
    }
}

/// Round-robin schedule solver (uses batsat by default)
pub struct Solver {
    options: Options,
}

impl Solver {
    /// Creates a new solver with the given options (uses batsat backend)
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Returns the options of this solver
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Solves `players`/`groups` with `encoding` using the batsat backend
    pub fn solve<E: ProblemEncoding>(
        &self,
        encoding: &E,
        players: usize,
        groups: usize,
    ) -> Result<Solution<E::Schedule>> {
        let mut sat_solver = RustSatAdapter::new(BasicSolver::default());
        self.solve_with(&mut sat_solver, encoding, players, groups)
    }

    /// Solves with a custom SAT solver
    ///
    /// Input is validated before any variable is declared. The session and
    /// its arena are dropped on return, whatever the outcome.
    pub fn solve_with<S: SATSolver, E: ProblemEncoding>(
        &self,
        sat_solver: &mut S,
        encoding: &E,
        players: usize,
        groups: usize,
    ) -> Result<Solution<E::Schedule>> {
        let problem = Problem::new(players, groups)?;

        // Step 1: Allocate variables and compile axioms
        let translation_start = Instant::now();
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, self.options.bool_options.clone());
        let grid = encoding.allocate(&mut session, &problem)?;
        encoding.compile(&session, &grid);
        let translation_time = translation_start.elapsed();
        debug!(
            "{}: {} variables, {} root constraints for {} players / {} groups",
            encoding.name(),
            grid.len(),
            session.num_assertions(),
            players,
            groups
        );

        // Step 2: Translate to CNF and run the SAT solver
        let solving_start = Instant::now();
        let check = session.check(sat_solver)?;
        let solving_time = solving_start.elapsed();

        let stats = Statistics {
            translation_time,
            solving_time,
            num_variables: check.num_variables,
            num_clauses: check.num_clauses,
        };

        if !check.satisfiable {
            info!(
                "{}: no solution for {} players / {} groups ({} ms)",
                encoding.name(),
                players,
                groups,
                stats.total_time()
            );
            return Ok(Solution::Unsat { stats });
        }

        // Step 3: Decode the model
        let model = session.model(sat_solver);
        let schedule = encoding.decode(&grid, &model)?;
        if self.options.verify {
            encoding.verify(&schedule, &problem)?;
        }

        info!(
            "{}: solved {} players / {} groups ({} ms)",
            encoding.name(),
            players,
            groups,
            stats.total_time()
        );
        Ok(Solution::Sat { schedule, stats })
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Splits `players` into `groups` groups so every pair shares exactly one
/// group, using the assignment encoding.
pub fn assign_groups(players: usize, groups: usize) -> Result<Solution<GroupSchedule>> {
    Solver::default().solve(&AssignmentEncoding, players, groups)
}

/// Schedules every pair of `players` into exactly one of `rounds` rounds,
/// using the pairing encoding.
pub fn pair_rounds(players: usize, rounds: usize) -> Result<Solution<RoundSchedule>> {
    Solver::default().solve(&PairingEncoding, players, rounds)
}

/// Result of a solve
#[derive(Debug)]
pub enum Solution<T> {
    /// A schedule exists
    Sat {
        /// Decoded schedule
        schedule: T,
        /// Solving statistics
        stats: Statistics,
    },
    /// No schedule exists for the requested size
    Unsat {
        /// Solving statistics
        stats: Statistics,
    },
}

impl<T> Solution<T> {
    /// Returns true if a schedule was found
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat { .. })
    }

    /// Returns true if no schedule exists
    pub fn is_unsat(&self) -> bool {
        matches!(self, Solution::Unsat { .. })
    }

    /// Returns the schedule if one was found
    pub fn schedule(&self) -> Option<&T> {
        match self {
            Solution::Sat { schedule, .. } => Some(schedule),
            Solution::Unsat { .. } => None,
        }
    }

    /// Consumes the solution, returning the schedule if one was found
    pub fn into_schedule(self) -> Option<T> {
        match self {
            Solution::Sat { schedule, .. } => Some(schedule),
            Solution::Unsat { .. } => None,
        }
    }

    /// Returns the statistics
    pub fn statistics(&self) -> &Statistics {
        match self {
            Solution::Sat { stats, .. } => stats,
            Solution::Unsat { stats } => stats,
        }
    }
}

/// Statistics collected during solving
#[derive(Debug, Clone)]
pub struct Statistics {
    translation_time: Duration,
    solving_time: Duration,
    num_variables: u32,
    num_clauses: usize,
}

impl Statistics {
    /// Returns translation time in milliseconds
    pub fn translation_time(&self) -> u64 {
        self.translation_time.as_millis() as u64
    }

    /// Returns solving time in milliseconds (includes CNF translation)
    pub fn solving_time(&self) -> u64 {
        self.solving_time.as_millis() as u64
    }

    /// Returns total time in milliseconds
    pub fn total_time(&self) -> u64 {
        self.translation_time() + self.solving_time()
    }

    /// Returns number of variables
    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    /// Returns number of clauses
    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }
}
