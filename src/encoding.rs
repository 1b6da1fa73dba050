//! Problem encodings
//!
//! A round-robin design can be encoded two ways: by assigning players to
//! groups ([`AssignmentEncoding`]) or by assigning player pairs to rounds
//! ([`PairingEncoding`]). Both implement [`ProblemEncoding`] and share the
//! exactly-one construction in this module.

mod assignment;
mod pairing;

pub use assignment::AssignmentEncoding;
pub use pairing::PairingEncoding;

use crate::bool::{BoolValue, BooleanFactory, VariableGrid};
use crate::session::{Model, Session};
use crate::{Result, ScheduleError};

/// Size of a scheduling problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Problem {
    players: usize,
    groups: usize,
}

impl Problem {
    /// Validates and creates a problem.
    ///
    /// Every group must hold at least one pair of players and no pair may be
    /// shared, so more groups than `C(players, 2)` can never be satisfied and
    /// is rejected here rather than by the solver.
    pub fn new(players: usize, groups: usize) -> Result<Self> {
        if players == 0 {
            return Err(ScheduleError::InvalidArgument(
                "players must be positive".to_string(),
            ));
        }
        if groups == 0 {
            return Err(ScheduleError::InvalidArgument(
                "groups must be positive".to_string(),
            ));
        }
        let max_groups = Self::max_groups(players).ok_or_else(|| {
            ScheduleError::InvalidArgument(format!("{players} players is too many to pair up"))
        })?;
        if groups > max_groups {
            return Err(ScheduleError::InvalidArgument(format!(
                "{groups} groups cannot be filled by {players} players (at most {max_groups})"
            )));
        }
        Ok(Self { players, groups })
    }

    /// Largest satisfiable group count for `players` players, `C(players, 2)`
    ///
    /// `None` if the pair count does not fit in `usize`.
    pub fn max_groups(players: usize) -> Option<usize> {
        players
            .checked_mul(players.saturating_sub(1))
            .map(|twice| twice / 2)
    }

    /// Number of players
    pub fn players(&self) -> usize {
        self.players
    }

    /// Number of groups (rounds in the pairing model)
    pub fn groups(&self) -> usize {
        self.groups
    }
}

/// Exactly one of `values` is true.
///
/// The disjunction of all values conjoined with `v_i → ¬v_j` for every
/// `i < j`. An empty list yields FALSE.
pub fn exactly_one<'a>(factory: &BooleanFactory<'a>, values: &[BoolValue<'a>]) -> BoolValue<'a> {
    let mut conjuncts = Vec::with_capacity(1 + values.len() * values.len().saturating_sub(1) / 2);
    conjuncts.push(factory.or_multi(values.to_vec()));

    for (i, &vi) in values.iter().enumerate() {
        for &vj in &values[i + 1..] {
            conjuncts.push(factory.implies(vi, factory.not(vj)));
        }
    }

    factory.and_multi(conjuncts)
}

/// Zero or at least two of `values` are true.
pub fn not_exactly_one<'a>(
    factory: &BooleanFactory<'a>,
    values: &[BoolValue<'a>],
) -> BoolValue<'a> {
    factory.not(exactly_one(factory, values))
}

/// A boolean encoding of a round-robin scheduling problem
///
/// The solver drives an encoding through allocate → compile → solve →
/// decode → verify, with one fresh session per solve.
pub trait ProblemEncoding {
    /// Decoded result type
    type Schedule;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Declares the decision variables for `problem`
    ///
    /// Fails if the grid does not fit the session.
    fn allocate(&self, session: &mut Session<'_>, problem: &Problem) -> Result<VariableGrid>;

    /// Asserts the axioms over `grid`
    fn compile(&self, session: &Session<'_>, grid: &VariableGrid);

    /// Rebuilds a schedule from a satisfying model
    fn decode(&self, grid: &VariableGrid, model: &Model) -> Result<Self::Schedule>;

    /// Checks a decoded schedule against the design properties
    fn verify(&self, schedule: &Self::Schedule, problem: &Problem) -> Result<()>;
}
