//! Boolean circuit to CNF translation
//!
//! Converts asserted boolean gates to CNF clauses using the Tseitin
//! transformation. Every gate gets a defining equivalence and every
//! asserted root becomes a unit clause.

use crate::bool::{BoolValue, BooleanFormula, FormulaKind};
use rustc_hash::FxHashSet;

/// CNF representation
#[derive(Debug, Clone, Default)]
pub struct CNF {
    /// Number of variables
    pub num_variables: u32,
    /// CNF clauses (each clause is a vec of literals, negative = negated)
    pub clauses: Vec<Vec<i32>>,
}

impl CNF {
    /// Creates a new empty CNF
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause to the CNF
    pub fn add_clause(&mut self, clause: Vec<i32>) {
        for &lit in &clause {
            let var = lit.unsigned_abs();
            if var > self.num_variables {
                self.num_variables = var;
            }
        }
        self.clauses.push(clause);
    }

    /// Ensures at least `num_variables` variables are reported, so declared
    /// variables that never reach a clause still get a model value.
    pub fn reserve_variables(&mut self, num_variables: u32) {
        self.num_variables = self.num_variables.max(num_variables);
    }

    /// Number of clauses
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// True if an empty clause was added (some root was constant FALSE)
    pub fn is_trivially_unsat(&self) -> bool {
        self.clauses.iter().any(Vec::is_empty)
    }
}

/// Translates boolean circuits to CNF
#[derive(Default)]
pub struct CNFTranslator {
    cnf: CNF,
    /// Labels of gates that already have their defining clauses
    visited: FxHashSet<i32>,
}

impl CNFTranslator {
    /// Creates a new CNF translator
    pub fn new() -> Self {
        Self::default()
    }

    /// Asserts a boolean value as a hard constraint
    ///
    /// TRUE adds nothing, FALSE adds the empty clause, anything else adds
    /// its gate definitions plus a unit clause on its label.
    pub fn assert(&mut self, value: &BoolValue<'_>) {
        match value {
            BoolValue::Constant(c) => {
                if !c.boolean_value() {
                    self.cnf.add_clause(vec![]);
                }
            }
            _ => {
                let label = self.translate_value(value);
                self.cnf.add_clause(vec![label]);
            }
        }
    }

    /// Finishes translation and returns the clauses
    pub fn finish(self) -> CNF {
        self.cnf
    }

    /// Translates a boolean value and returns its label
    fn translate_value(&mut self, value: &BoolValue<'_>) -> i32 {
        match value {
            BoolValue::Constant(c) => c.label(),
            BoolValue::Variable(v) => v.label(),
            BoolValue::Formula(f) => self.translate_formula(f),
        }
    }

    fn translate_formula(&mut self, formula: &BooleanFormula<'_>) -> i32 {
        let output = formula.label();

        if !self.visited.insert(output) {
            return output;
        }

        match formula.kind() {
            FormulaKind::And(inputs) => self.translate_and(output, inputs),
            FormulaKind::Or(inputs) => self.translate_or(output, inputs),
            FormulaKind::Not(input) => self.translate_not(output, input),
        }

        output
    }

    /// Translates AND gate: output = a1 ∧ a2 ∧ ... ∧ an
    ///
    /// CNF encoding:
    /// - (¬a1 ∨ ¬a2 ∨ ... ∨ ¬an ∨ output) - if all inputs true, output true
    /// - (a1 ∨ ¬output) - if output true, each input must be true
    fn translate_and(&mut self, output: i32, inputs: &[BoolValue<'_>]) {
        let input_labels: Vec<i32> = inputs.iter().map(|v| self.translate_value(v)).collect();

        let mut clause: Vec<i32> = input_labels.iter().map(|&l| -l).collect();
        clause.push(output);
        self.cnf.add_clause(clause);

        for &input in &input_labels {
            self.cnf.add_clause(vec![input, -output]);
        }
    }

    /// Translates OR gate: output = a1 ∨ a2 ∨ ... ∨ an
    ///
    /// CNF encoding:
    /// - (a1 ∨ a2 ∨ ... ∨ an ∨ ¬output) - output true needs some input true
    /// - (¬a1 ∨ output) - any input true forces output true
    fn translate_or(&mut self, output: i32, inputs: &[BoolValue<'_>]) {
        let input_labels: Vec<i32> = inputs.iter().map(|v| self.translate_value(v)).collect();

        let mut clause = input_labels.clone();
        clause.push(-output);
        self.cnf.add_clause(clause);

        for &input in &input_labels {
            self.cnf.add_clause(vec![-input, output]);
        }
    }

    /// Translates NOT gate: output = ¬input
    fn translate_not(&mut self, output: i32, input: &BoolValue<'_>) {
        let input_label = self.translate_value(input);

        self.cnf.add_clause(vec![input_label, output]);
        self.cnf.add_clause(vec![-input_label, -output]);
    }
}
