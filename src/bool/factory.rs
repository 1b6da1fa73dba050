//! Boolean factory with gate caching
//!
//! The factory hands out fresh decision variables and builds gates, with
//! automatic deduplication. Uses interior mutability (Cell/RefCell) to avoid
//! &mut self everywhere, so encoders can hold a shared reference while
//! building large nested formulas.

use super::{
    BoolValue, BooleanConstant, BooleanFormula, BooleanVariable, FormulaArena, FormulaKind,
};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};

/// Options for boolean factory
#[derive(Debug, Clone)]
pub struct Options {
    /// Enable sharing of boolean formulas (default: true)
    pub sharing: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { sharing: true }
    }
}

/// Boolean circuit factory with caching
///
/// Variables and gates draw labels from one counter starting at 1, so the
/// largest label handed out is also the number of CNF variables needed.
/// Labels are `i32` literals; a circuit that outgrows them is flagged by
/// [`label_overflow`](Self::label_overflow) and must not be translated.
pub struct BooleanFactory<'arena> {
    arena: &'arena FormulaArena,
    next_label: Cell<i64>,
    overflow: Cell<bool>,
    num_variables: Cell<u32>,
    num_gates: Cell<u32>,
    options: Options,
    // Key: (kind, input labels) -> cached formula
    cache: RefCell<FxHashMap<CacheKey, BooleanFormula<'arena>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    And(Vec<i32>),
    Or(Vec<i32>),
    Not(i32),
}

#[derive(Clone, Copy)]
enum Gate {
    And,
    Or,
}

impl<'arena> BooleanFactory<'arena> {
    /// Creates a new boolean factory allocating gates in `arena`
    pub fn new(arena: &'arena FormulaArena, options: Options) -> Self {
        Self {
            arena,
            next_label: Cell::new(1),
            overflow: Cell::new(false),
            num_variables: Cell::new(0),
            num_gates: Cell::new(0),
            options,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Returns the number of variables created so far
    pub fn num_variables(&self) -> u32 {
        self.num_variables.get()
    }

    /// Returns the number of distinct gates created so far
    pub fn num_gates(&self) -> u32 {
        self.num_gates.get()
    }

    /// Returns the largest label handed out (0 if none)
    pub fn max_label(&self) -> i32 {
        i32::try_from(self.next_label.get() - 1).unwrap_or(i32::MAX)
    }

    /// True if more labels were requested than `i32` can hold
    pub fn label_overflow(&self) -> bool {
        self.overflow.get()
    }

    /// True if `labels` more labels can be handed out without overflow
    pub fn has_room_for(&self, labels: usize) -> bool {
        let remaining = i64::from(i32::MAX) - (self.next_label.get() - 1);
        i64::try_from(labels).is_ok_and(|n| n <= remaining)
    }

    /// Returns the options this factory was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Creates a fresh decision variable
    pub fn variable(&self) -> BooleanVariable {
        self.num_variables.set(self.num_variables.get() + 1);
        BooleanVariable::new(self.allocate_label())
    }

    /// Creates a constant
    pub fn constant(&self, value: bool) -> BoolValue<'arena> {
        BoolValue::Constant(if value {
            BooleanConstant::TRUE
        } else {
            BooleanConstant::FALSE
        })
    }

    /// Creates an AND gate
    pub fn and(&self, left: BoolValue<'arena>, right: BoolValue<'arena>) -> BoolValue<'arena> {
        self.and_multi(vec![left, right])
    }

    /// Creates a multi-input AND gate
    pub fn and_multi(&self, inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        self.nary(Gate::And, inputs)
    }

    /// Creates an OR gate
    pub fn or(&self, left: BoolValue<'arena>, right: BoolValue<'arena>) -> BoolValue<'arena> {
        self.or_multi(vec![left, right])
    }

    /// Creates a multi-input OR gate
    pub fn or_multi(&self, inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        self.nary(Gate::Or, inputs)
    }

    /// Creates a NOT gate
    pub fn not(&self, input: BoolValue<'arena>) -> BoolValue<'arena> {
        match input {
            BoolValue::Constant(c) => return self.constant(!c.boolean_value()),
            BoolValue::Formula(f) => {
                if let FormulaKind::Not(inner) = f.kind() {
                    return **inner;
                }
            }
            BoolValue::Variable(_) => {}
        }

        let arena = self.arena;
        self.gate(CacheKey::Not(input.label()), |label| {
            BooleanFormula::new(label, FormulaKind::Not(arena.alloc(input)))
        })
    }

    /// IMPLIES: a IMPLIES b = NOT a OR b
    pub fn implies(&self, a: BoolValue<'arena>, b: BoolValue<'arena>) -> BoolValue<'arena> {
        let not_a = self.not(a);
        self.or(not_a, b)
    }

    /// IFF (if and only if): a IFF b = (a AND b) OR (NOT a AND NOT b)
    pub fn iff(&self, a: BoolValue<'arena>, b: BoolValue<'arena>) -> BoolValue<'arena> {
        let a_and_b = self.and(a, b);
        let not_a = self.not(a);
        let not_b = self.not(b);
        let not_a_and_not_b = self.and(not_a, not_b);
        self.or(a_and_b, not_a_and_not_b)
    }

    fn nary(&self, gate: Gate, mut inputs: Vec<BoolValue<'arena>>) -> BoolValue<'arena> {
        let (absorbing, identity) = match gate {
            Gate::And => (BooleanConstant::FALSE, BooleanConstant::TRUE),
            Gate::Or => (BooleanConstant::TRUE, BooleanConstant::FALSE),
        };

        if inputs.iter().any(|v| matches!(v, BoolValue::Constant(c) if *c == absorbing)) {
            return BoolValue::Constant(absorbing);
        }
        inputs.retain(|v| !matches!(v, BoolValue::Constant(c) if *c == identity));

        match inputs.len() {
            0 => return BoolValue::Constant(identity),
            1 => return inputs[0],
            _ => {}
        }

        let labels: Vec<i32> = inputs.iter().map(|v| v.label()).collect();
        let key = match gate {
            Gate::And => CacheKey::And(labels),
            Gate::Or => CacheKey::Or(labels),
        };

        let arena = self.arena;
        self.gate(key, |label| {
            let slice = arena.alloc_slice(&inputs);
            let kind = match gate {
                Gate::And => FormulaKind::And(slice),
                Gate::Or => FormulaKind::Or(slice),
            };
            BooleanFormula::new(label, kind)
        })
    }

    fn gate(
        &self,
        key: CacheKey,
        build: impl FnOnce(i32) -> BooleanFormula<'arena>,
    ) -> BoolValue<'arena> {
        if self.options.sharing {
            if let Some(cached) = self.cache.borrow().get(&key) {
                return BoolValue::Formula(*cached);
            }
        }

        let formula = build(self.allocate_label());
        self.num_gates.set(self.num_gates.get() + 1);
        if self.options.sharing {
            self.cache.borrow_mut().insert(key, formula);
        }
        BoolValue::Formula(formula)
    }

    fn allocate_label(&self) -> i32 {
        let label = self.next_label.get();
        self.next_label.set(label + 1);
        i32::try_from(label).unwrap_or_else(|_| {
            self.overflow.set(true);
            i32::MAX
        })
    }

    #[cfg(test)]
    pub(crate) fn skip_labels(&self, count: i64) {
        self.next_label.set(self.next_label.get() + count);
    }
}
