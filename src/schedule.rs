//! Decoded schedules
//!
//! [`GroupSchedule`] is the assignment-model result: groups of players,
//! sorted by their smallest member. [`RoundSchedule`] is the pairing-model
//! result: one entry per round plus the dense [`PairingMatrix`].
//!
//! Both carry a `verify` that re-checks the design properties on the
//! decoded data, independently of the formulas that produced it.

use crate::{Result, ScheduleError};
use log::error;
use std::collections::BTreeSet;

fn violation(message: String) -> ScheduleError {
    error!("invariant violation: {message}");
    ScheduleError::InvariantViolation(message)
}

/// Groups of players, each sorted ascending, ordered by smallest member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSchedule {
    groups: Vec<Vec<usize>>,
}

impl GroupSchedule {
    /// Normalizes member order and group order
    ///
    /// Groups are compared lexicographically, so the smallest member decides
    /// first and ties fall to the next member. Empty groups sort first.
    pub fn new(mut groups: Vec<Vec<usize>>) -> Self {
        for group in &mut groups {
            group.sort_unstable();
            group.dedup();
        }
        groups.sort();
        Self { groups }
    }

    /// The groups
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups containing both `i` and `j`
    pub fn co_occurrences(&self, i: usize, j: usize) -> usize {
        self.groups
            .iter()
            .filter(|g| g.binary_search(&i).is_ok() && g.binary_search(&j).is_ok())
            .count()
    }

    /// Checks the design properties for `players` players:
    /// no group smaller than two, every pair sharing exactly one group, and
    /// every player appearing somewhere.
    pub fn verify(&self, players: usize) -> Result<()> {
        for group in &self.groups {
            if group.len() < 2 {
                return Err(violation(format!("group {group:?} has fewer than two members")));
            }
            if let Some(&p) = group.iter().find(|&&p| p >= players) {
                return Err(violation(format!("group {group:?} names unknown player {p}")));
            }
        }

        for i in 0..players {
            for j in i + 1..players {
                let shared = self.co_occurrences(i, j);
                if shared != 1 {
                    return Err(violation(format!(
                        "players {i} and {j} share {shared} groups, expected exactly one"
                    )));
                }
            }
        }

        let covered: BTreeSet<usize> = self.groups.iter().flatten().copied().collect();
        if covered.len() != players {
            return Err(violation(format!(
                "groups cover {} of {players} players",
                covered.len()
            )));
        }

        Ok(())
    }
}

/// Dense `players × players` matrix of meeting rounds
///
/// `get(i, j)` is the round in which `i` and `j` meet; the diagonal and
/// unresolved pairs are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingMatrix {
    players: usize,
    cells: Vec<Option<usize>>,
}

impl PairingMatrix {
    /// Creates a matrix with every entry unset
    pub fn new(players: usize) -> Self {
        Self {
            players,
            cells: vec![None; players * players],
        }
    }

    /// Number of players along each axis
    pub fn players(&self) -> usize {
        self.players
    }

    /// Round in which `i` and `j` meet
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        self.cells[i * self.players + j]
    }

    /// Records that `i` and `j` meet in `round`
    ///
    /// Fails if the pair already resolved to a different round.
    pub fn set(&mut self, i: usize, j: usize, round: usize) -> Result<()> {
        let cell = &mut self.cells[i * self.players + j];
        match *cell {
            Some(existing) if existing != round => Err(violation(format!(
                "pair ({i}, {j}) meets in rounds {existing} and {round}"
            ))),
            _ => {
                *cell = Some(round);
                Ok(())
            }
        }
    }

    /// Rows of the matrix
    pub fn rows(&self) -> impl Iterator<Item = &[Option<usize>]> {
        self.cells.chunks(self.players.max(1))
    }
}

/// Pairings of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    index: usize,
    members: Vec<usize>,
    pairs: Vec<(usize, usize)>,
}

impl Round {
    /// Builds a round from its pairs, normalizing each to `(low, high)`
    pub fn new(index: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let pairs: BTreeSet<(usize, usize)> = pairs
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        let members: BTreeSet<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        Self {
            index,
            members: members.into_iter().collect(),
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Round index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Players paired in this round, ascending
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Unordered pairs of this round, ascending
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}

/// Pairing-model result: rounds by index and the dense matrix view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSchedule {
    rounds: Vec<Round>,
    matrix: PairingMatrix,
}

impl RoundSchedule {
    /// Creates a schedule, ordering rounds by index
    pub fn new(mut rounds: Vec<Round>, matrix: PairingMatrix) -> Self {
        rounds.sort_by_key(Round::index);
        Self { rounds, matrix }
    }

    /// Rounds, ascending by index
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Dense matrix view
    pub fn matrix(&self) -> &PairingMatrix {
        &self.matrix
    }

    /// Members of each round, one entry per round
    pub fn members_by_round(&self) -> Vec<Vec<usize>> {
        self.rounds.iter().map(|r| r.members.clone()).collect()
    }

    /// The rounds read as groups of the assignment model
    pub fn blocks(&self) -> GroupSchedule {
        GroupSchedule::new(self.members_by_round())
    }

    /// Checks symmetry, exactly one round per pair, and clique closure, then
    /// checks the rounds as assignment-model groups.
    pub fn verify(&self, players: usize) -> Result<()> {
        if self.matrix.players != players {
            return Err(violation(format!(
                "matrix is {0}x{0}, expected {players}x{players}",
                self.matrix.players
            )));
        }

        for i in 0..players {
            if self.matrix.get(i, i).is_some() {
                return Err(violation(format!("player {i} is paired with itself")));
            }
            for j in i + 1..players {
                let (ij, ji) = (self.matrix.get(i, j), self.matrix.get(j, i));
                if ij != ji {
                    return Err(violation(format!(
                        "pair ({i}, {j}) is asymmetric: {ij:?} vs {ji:?}"
                    )));
                }
                if ij.is_none() {
                    return Err(violation(format!("pair ({i}, {j}) never meets")));
                }
            }
        }

        for round in &self.rounds {
            for (n, &a) in round.members.iter().enumerate() {
                for &b in &round.members[n + 1..] {
                    if self.matrix.get(a, b) != Some(round.index) {
                        return Err(violation(format!(
                            "round {} is not closed: {a} and {b} are not paired in it",
                            round.index
                        )));
                    }
                }
            }
        }

        self.blocks().verify(players)
    }
}
