//! Pairing model: each variable says "players i and j meet in round g".

use super::{exactly_one, not_exactly_one, Problem, ProblemEncoding};
use crate::bool::{BoolValue, BooleanFactory, VariableGrid};
use crate::schedule::{PairingMatrix, Round, RoundSchedule};
use crate::session::{Model, Session};
use crate::Result;
use log::trace;

/// Encodes the design as a `players × players × rounds` pairing cube
///
/// Axioms:
/// - every unordered pair meets in exactly one round
/// - pairing is symmetric and nobody is paired with themselves
/// - every round holds at least one pairing and is not exactly one pairing
/// - triangle and quad closure, so each round's pairings form one clique
#[derive(Debug, Clone, Copy, Default)]
pub struct PairingEncoding;

impl PairingEncoding {
    fn exactly_one_round_per_pair(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        for i in 0..players {
            for j in i + 1..players {
                let meetings: Vec<BoolValue> =
                    (0..rounds).map(|u| grid.pair_at(i, j, u).into()).collect();
                session.assert(exactly_one(f, &meetings));
            }
        }
    }

    fn symmetry(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        for u in 0..rounds {
            for i in 0..players {
                session.assert(f.not(grid.pair_at(i, i, u).into()));
                for j in i + 1..players {
                    let ij = grid.pair_at(i, j, u).into();
                    let ji = grid.pair_at(j, i, u).into();
                    session.assert(f.iff(ij, ji));
                }
            }
        }
    }

    fn round_non_degeneracy(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        for u in 0..rounds {
            let pairings: Vec<BoolValue> = (0..players)
                .flat_map(|i| (0..players).filter(move |&j| j != i).map(move |j| (i, j)))
                .map(|(i, j)| grid.pair_at(i, j, u).into())
                .collect();
            session.assert(not_exactly_one(f, &pairings));
            session.assert(f.or_multi(pairings));
        }
    }

    fn triangle_closure(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        for i in 0..players {
            for j in i + 1..players {
                for a in j + 1..players {
                    for x in 0..rounds {
                        let ij = grid.pair_at(i, j, x).into();
                        let aj = grid.pair_at(a, j, x).into();
                        let ai = grid.pair_at(a, i, x).into();
                        session.assert(two_imply_third(f, ij, aj, ai));
                        session.assert(two_imply_third(f, ij, ai, aj));
                        session.assert(two_imply_third(f, aj, ai, ij));
                    }
                }
            }
        }
    }

    fn quad_closure(&self, session: &Session<'_>, grid: &VariableGrid) {
        let f = session.factory();
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        for i in 0..players {
            for j in i + 1..players {
                for a in j + 1..players {
                    for b in a + 1..players {
                        for x in 0..rounds {
                            let v = |p: usize, q: usize| BoolValue::from(grid.pair_at(p, q, x));
                            // Each perfect matching of {i, j, a, b} forces the
                            // four cross pairings
                            let matchings = [
                                ((i, j), (a, b), [(i, a), (i, b), (j, a), (j, b)]),
                                ((i, a), (j, b), [(i, j), (i, b), (j, a), (a, b)]),
                                ((i, b), (j, a), [(i, j), (i, a), (j, b), (a, b)]),
                            ];
                            for ((p, q), (r, s), cross) in matchings {
                                let premise = f.and(v(p, q), v(r, s));
                                let conclusion =
                                    f.and_multi(cross.iter().map(|&(c, d)| v(c, d)).collect());
                                session.assert(f.implies(premise, conclusion));
                            }
                        }
                    }
                }
            }
        }
    }
}

fn two_imply_third<'a>(
    f: &BooleanFactory<'a>,
    first: BoolValue<'a>,
    second: BoolValue<'a>,
    third: BoolValue<'a>,
) -> BoolValue<'a> {
    f.implies(f.and(first, second), third)
}

impl ProblemEncoding for PairingEncoding {
    type Schedule = RoundSchedule;

    fn name(&self) -> &'static str {
        "pairing"
    }

    fn allocate(&self, session: &mut Session<'_>, problem: &Problem) -> Result<VariableGrid> {
        session.allocate_cube(problem.players(), problem.groups())
    }

    fn compile(&self, session: &Session<'_>, grid: &VariableGrid) {
        self.exactly_one_round_per_pair(session, grid);
        trace!("pairing: exactly-one-round axioms asserted");
        self.symmetry(session, grid);
        trace!("pairing: symmetry axioms asserted");
        self.round_non_degeneracy(session, grid);
        trace!("pairing: round size axioms asserted");
        self.triangle_closure(session, grid);
        trace!("pairing: triangle closure asserted");
        self.quad_closure(session, grid);
        trace!("pairing: quad closure asserted");
    }

    fn decode(&self, grid: &VariableGrid, model: &Model) -> Result<RoundSchedule> {
        let players = grid.dimensions().players();
        let rounds = grid.dimensions().groups();

        let mut matrix = PairingMatrix::new(players);
        let mut pairs_by_round = vec![Vec::new(); rounds];
        for i in 0..players {
            for j in (0..players).filter(|&j| j != i) {
                for (k, pairs) in pairs_by_round.iter_mut().enumerate() {
                    if model.value(grid.pair_at(i, j, k)) {
                        matrix.set(i, j, k)?;
                        pairs.push((i, j));
                    }
                }
            }
        }

        let rounds = pairs_by_round
            .into_iter()
            .enumerate()
            .map(|(k, pairs)| Round::new(k, pairs))
            .collect();
        Ok(RoundSchedule::new(rounds, matrix))
    }

    fn verify(&self, schedule: &RoundSchedule, problem: &Problem) -> Result<()> {
        schedule.verify(problem.players())
    }
}
