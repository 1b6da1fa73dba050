//! Solving sessions
//!
//! A session is the explicit handle through which an encoding talks to the
//! solving capability: it declares named variables, collects hard
//! constraints, hands them to a SAT backend and reads back the model.
//! Everything a session builds lives in the arena it borrows, so dropping
//! the session and its arena releases the whole circuit.

use crate::bool::{
    BoolValue, BooleanFactory, BooleanVariable, FormulaArena, FormulaKind, Options,
    VariableAllocator, VariableGrid,
};
use crate::cnf::{CNFTranslator, CNF};
use crate::engine::SATSolver;
use crate::{Result, ScheduleError};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// One solving session over a single arena
pub struct Session<'arena> {
    factory: BooleanFactory<'arena>,
    allocator: VariableAllocator,
    assertions: RefCell<Vec<BoolValue<'arena>>>,
}

/// Outcome of a satisfiability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    /// Whether the asserted constraints are satisfiable
    pub satisfiable: bool,
    /// Variables handed to the backend
    pub num_variables: u32,
    /// Clauses handed to the backend
    pub num_clauses: usize,
}

impl<'arena> Session<'arena> {
    /// Creates a new session allocating its circuit in `arena`
    pub fn new(arena: &'arena FormulaArena, options: Options) -> Self {
        Self {
            factory: BooleanFactory::new(arena, options),
            allocator: VariableAllocator::new(),
            assertions: RefCell::new(Vec::new()),
        }
    }

    /// Returns the factory used to build formulas
    pub fn factory(&self) -> &BooleanFactory<'arena> {
        &self.factory
    }

    /// Declares a named boolean variable (idempotent per name)
    pub fn declare_boolean(&mut self, name: &str) -> BooleanVariable {
        self.allocator.declare(&self.factory, name)
    }

    /// Declares a `players × groups` variable grid
    ///
    /// Fails if the grid would reuse an already declared name or outgrow
    /// the label space.
    pub fn allocate_matrix(&mut self, players: usize, groups: usize) -> Result<VariableGrid> {
        self.allocator.allocate_matrix(&self.factory, players, groups)
    }

    /// Declares a `players × players × groups` variable grid
    pub fn allocate_cube(&mut self, players: usize, groups: usize) -> Result<VariableGrid> {
        self.allocator.allocate_cube(&self.factory, players, groups)
    }

    /// Looks up a declared variable by name
    pub fn lookup(&self, name: &str) -> Option<BooleanVariable> {
        self.allocator.get(name)
    }

    /// Returns the name a variable was declared with
    pub fn name_of(&self, var: BooleanVariable) -> Option<&str> {
        self.allocator.name_of(var)
    }

    /// Adds a hard constraint
    ///
    /// Top-level conjunctions are split so each conjunct becomes its own
    /// root clause.
    pub fn assert(&self, value: BoolValue<'arena>) {
        let mut assertions = self.assertions.borrow_mut();
        let mut pending = vec![value];
        while let Some(value) = pending.pop() {
            match value {
                BoolValue::Formula(f) => match f.kind() {
                    FormulaKind::And(inputs) => pending.extend(inputs.iter().rev().copied()),
                    _ => assertions.push(value),
                },
                _ => assertions.push(value),
            }
        }
    }

    /// Number of root constraints asserted so far
    pub fn num_assertions(&self) -> usize {
        self.assertions.borrow().len()
    }

    /// True if every assertion holds under `model`
    pub fn satisfied_by(&self, model: &Model) -> bool {
        self.assertions
            .borrow()
            .iter()
            .all(|value| value.evaluate(&|var| model.value(var)))
    }

    /// Translates every assertion into one CNF
    pub fn to_cnf(&self) -> CNF {
        let mut translator = CNFTranslator::new();
        for value in self.assertions.borrow().iter() {
            translator.assert(value);
        }
        let mut cnf = translator.finish();
        cnf.reserve_variables(self.factory.max_label().max(0) as u32);
        cnf
    }

    /// Runs the satisfiability check on `sat`
    ///
    /// A constant-FALSE assertion short-circuits to UNSAT without touching
    /// the backend.
    pub fn check<S: SATSolver>(&self, sat: &mut S) -> Result<Check> {
        if self.factory.label_overflow() {
            return Err(ScheduleError::InvalidArgument(format!(
                "circuit needs more than {} labels",
                i32::MAX
            )));
        }

        let cnf = self.to_cnf();
        debug!(
            "session: {} variables ({} declared, {} gates), {} clauses",
            cnf.num_variables,
            self.factory.num_variables(),
            self.factory.num_gates(),
            cnf.num_clauses()
        );

        if cnf.is_trivially_unsat() {
            trace!("session: constant FALSE asserted, skipping backend");
            return Ok(Check {
                satisfiable: false,
                num_variables: cnf.num_variables,
                num_clauses: cnf.num_clauses(),
            });
        }

        sat.add_variables(cnf.num_variables);
        for clause in &cnf.clauses {
            sat.add_clause(clause)?;
        }

        Ok(Check {
            satisfiable: sat.solve()?,
            num_variables: cnf.num_variables,
            num_clauses: cnf.num_clauses(),
        })
    }

    /// Reads the value of every declared variable from a solved backend
    pub fn model<S: SATSolver>(&self, sat: &S) -> Model {
        let max_label = self.factory.max_label();
        let mut values = FxHashMap::default();
        for label in 1..=max_label {
            let var = BooleanVariable::new(label);
            if self.allocator.name_of(var).is_some() {
                values.insert(var, sat.value_of(label as u32));
            }
        }
        Model { values }
    }
}

/// A satisfying assignment of the declared variables
///
/// Variables missing from the model read as false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: FxHashMap<BooleanVariable, bool>,
}

impl Model {
    /// Builds a model in which exactly the given variables are true
    pub fn from_true(vars: impl IntoIterator<Item = BooleanVariable>) -> Self {
        Self {
            values: vars.into_iter().map(|v| (v, true)).collect(),
        }
    }

    /// Value of a variable
    pub fn value(&self, var: BooleanVariable) -> bool {
        self.values.get(&var).copied().unwrap_or(false)
    }

    /// Variables assigned true, sorted by label
    pub fn true_variables(&self) -> Vec<BooleanVariable> {
        let mut vars: Vec<BooleanVariable> =
            self.values.iter().filter(|(_, v)| **v).map(|(var, _)| *var).collect();
        vars.sort();
        vars
    }

    /// Number of variables with a recorded value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no variable has a recorded value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RustSatAdapter;
    use rustsat_batsat::BasicSolver;

    #[test]
    fn declare_and_lookup() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());

        let x = session.declare_boolean("x");
        assert_eq!(session.declare_boolean("x"), x);
        assert_eq!(session.lookup("x"), Some(x));
        assert_eq!(session.lookup("y"), None);
        assert_eq!(session.name_of(x), Some("x"));
    }

    #[test]
    fn conjunctions_are_split() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());
        let x = BoolValue::from(session.declare_boolean("x"));
        let y = BoolValue::from(session.declare_boolean("y"));
        let z = BoolValue::from(session.declare_boolean("z"));

        let f = session.factory();
        let nested = f.and(x, f.and_multi(vec![y, f.or(y, z)]));
        session.assert(nested);

        assert_eq!(session.num_assertions(), 3);
    }

    #[test]
    fn check_sat_and_read_model() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());
        let x = session.declare_boolean("x");
        let y = session.declare_boolean("y");

        let f = session.factory();
        session.assert(f.or(x.into(), y.into()));
        session.assert(f.not(x.into()));

        let mut sat = RustSatAdapter::new(BasicSolver::default());
        let check = session.check(&mut sat).unwrap();
        assert!(check.satisfiable);

        let model = session.model(&sat);
        assert!(session.satisfied_by(&model));
        assert!(!model.value(x));
        assert!(model.value(y));
        assert_eq!(model.len(), 2);
        assert_eq!(model.true_variables(), vec![y]);
    }

    #[test]
    fn check_unsat() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());
        let x = session.declare_boolean("x");

        let f = session.factory();
        session.assert(f.iff(x.into(), f.not(x.into())));

        let mut sat = RustSatAdapter::new(BasicSolver::default());
        assert!(!session.check(&mut sat).unwrap().satisfiable);
    }

    #[test]
    fn constant_false_skips_backend() {
        let arena = FormulaArena::new();
        let session = Session::new(&arena, Options::default());
        session.assert(session.factory().constant(false));

        let mut sat = RustSatAdapter::new(BasicSolver::default());
        let check = session.check(&mut sat).unwrap();
        assert!(!check.satisfiable);
        assert_eq!(sat.num_clauses(), 0);
    }

    #[test]
    fn unconstrained_variable_has_a_value() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());
        let x = session.declare_boolean("x");
        session.declare_boolean("y");
        session.assert(x.into());

        let mut sat = RustSatAdapter::new(BasicSolver::default());
        assert!(session.check(&mut sat).unwrap().satisfiable);
        assert_eq!(sat.num_variables(), 2);

        let model = session.model(&sat);
        assert!(model.value(x));
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn missing_variables_read_false() {
        let model = Model::from_true([BooleanVariable::new(2)]);
        assert!(model.value(BooleanVariable::new(2)));
        assert!(!model.value(BooleanVariable::new(5)));
        assert!(Model::default().is_empty());
    }

    #[test]
    fn second_grid_in_a_session_is_rejected() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());

        let grid = session.allocate_matrix(3, 2).unwrap();
        let err = session.allocate_matrix(3, 2).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidArgument(_)));

        // The first grid still owns its names
        assert_eq!(session.lookup("v-2-1"), Some(grid.at(2, 1)));
        assert_eq!(session.factory().num_variables(), 6);
    }

    #[test]
    fn label_overflow_fails_check() {
        let arena = FormulaArena::new();
        let mut session = Session::new(&arena, Options::default());
        let x = session.declare_boolean("x");
        session.factory().skip_labels(i64::from(i32::MAX));

        let f = session.factory();
        session.assert(f.or(x.into(), f.not(x.into())));

        let mut sat = RustSatAdapter::new(BasicSolver::default());
        let err = session.check(&mut sat).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidArgument(_)));
        assert_eq!(sat.num_clauses(), 0);
    }
}
