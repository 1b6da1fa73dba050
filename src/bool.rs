//! Boolean circuit representation
//!
//! The boolean layer is the intermediate representation between the
//! combinatorial axioms of a scheduling problem and the CNF handed to the
//! SAT backend.
//!
//! Key types:
//! - `BooleanConstant`: TRUE (label 0) or FALSE (label -1)
//! - `BooleanVariable`: Decision variables with positive integer labels
//! - `BoolValue<'arena>`: Enum encompassing all boolean value types
//! - `BooleanFormula`: Boolean gates (AND, OR, NOT)
//! - `Dimensions`: Shape of a variable grid
//! - `VariableGrid`: Dense grid of decision variables
//! - `BooleanFactory`: Factory for creating and caching boolean circuits

mod factory;
pub mod arena;
pub mod var_allocator;

pub use arena::FormulaArena;
pub use factory::{BooleanFactory, Options};
pub use var_allocator::VariableAllocator;

/// Boolean constant (TRUE or FALSE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanConstant {
    /// TRUE constant (label 0)
    TRUE,
    /// FALSE constant (label -1)
    FALSE,
}

impl BooleanConstant {
    /// Returns the label for this constant
    pub fn label(&self) -> i32 {
        match self {
            BooleanConstant::TRUE => 0,
            BooleanConstant::FALSE => -1,
        }
    }

    /// Returns the boolean value of this constant
    pub fn boolean_value(&self) -> bool {
        *self == BooleanConstant::TRUE
    }
}

/// A decision variable
///
/// Identity is the label: two variables with the same label are the same
/// symbol within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BooleanVariable {
    label: i32,
}

impl BooleanVariable {
    /// Creates a new boolean variable with the given label.
    ///
    /// # Panics
    /// Panics if label is not positive (must be > 0).
    pub fn new(label: i32) -> Self {
        assert!(label > 0, "Variable labels must be positive");
        Self { label }
    }

    /// Returns the label for this variable
    pub fn label(&self) -> i32 {
        self.label
    }
}

/// Boolean formula (gate)
///
/// Gate inputs live in the session's arena, so a formula is a cheap `Copy`
/// handle. Labels are unique per factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BooleanFormula<'arena> {
    label: i32,
    kind: FormulaKind<'arena>,
}

impl<'arena> BooleanFormula<'arena> {
    pub(crate) fn new(label: i32, kind: FormulaKind<'arena>) -> Self {
        Self { label, kind }
    }

    /// Returns the label for this formula
    pub fn label(&self) -> i32 {
        self.label
    }

    /// Returns the kind of this formula
    pub fn kind(&self) -> &FormulaKind<'arena> {
        &self.kind
    }
}

/// Formula kind (gate type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaKind<'arena> {
    /// Multi-input AND gate
    And(&'arena [BoolValue<'arena>]),
    /// Multi-input OR gate
    Or(&'arena [BoolValue<'arena>]),
    /// NOT gate
    Not(&'arena BoolValue<'arena>),
}

/// Unified boolean value type
///
/// Encompasses constants, variables, and formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolValue<'arena> {
    /// Constant (TRUE or FALSE)
    Constant(BooleanConstant),
    /// Variable
    Variable(BooleanVariable),
    /// Formula (gate)
    Formula(BooleanFormula<'arena>),
}

impl<'arena> BoolValue<'arena> {
    /// Returns the label for this value
    pub fn label(&self) -> i32 {
        match self {
            BoolValue::Constant(c) => c.label(),
            BoolValue::Variable(v) => v.label(),
            BoolValue::Formula(f) => f.label(),
        }
    }

    /// Returns true if this is a constant
    pub fn is_constant(&self) -> bool {
        matches!(self, BoolValue::Constant(_))
    }

    /// Returns true if this is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, BoolValue::Formula(_))
    }

    /// Evaluates this value under an assignment of the decision variables.
    ///
    /// Used to check encodings against brute-force semantics.
    pub fn evaluate(&self, assignment: &impl Fn(BooleanVariable) -> bool) -> bool {
        match self {
            BoolValue::Constant(c) => c.boolean_value(),
            BoolValue::Variable(v) => assignment(*v),
            BoolValue::Formula(f) => match f.kind() {
                FormulaKind::And(inputs) => inputs.iter().all(|v| v.evaluate(assignment)),
                FormulaKind::Or(inputs) => inputs.iter().any(|v| v.evaluate(assignment)),
                FormulaKind::Not(input) => !input.evaluate(assignment),
            },
        }
    }
}

impl<'arena> From<BooleanConstant> for BoolValue<'arena> {
    fn from(c: BooleanConstant) -> Self {
        BoolValue::Constant(c)
    }
}

impl<'arena> From<BooleanVariable> for BoolValue<'arena> {
    fn from(v: BooleanVariable) -> Self {
        BoolValue::Variable(v)
    }
}

impl<'arena> From<BooleanFormula<'arena>> for BoolValue<'arena> {
    fn from(f: BooleanFormula<'arena>) -> Self {
        BoolValue::Formula(f)
    }
}

/// Shape of a variable grid
///
/// Arity 2 is the `players × groups` assignment grid, arity 3 the
/// `players × players × groups` pairing cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    players: usize,
    groups: usize,
    arity: usize,
}

impl Dimensions {
    /// Dimensions of a `players × groups` grid
    pub fn matrix(players: usize, groups: usize) -> Self {
        Self { players, groups, arity: 2 }
    }

    /// Dimensions of a `players × players × groups` grid
    pub fn cube(players: usize, groups: usize) -> Self {
        Self { players, groups, arity: 3 }
    }

    /// Number of players along each player axis
    pub fn players(&self) -> usize {
        self.players
    }

    /// Number of groups (or rounds)
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// 2 for a matrix, 3 for a cube
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Total number of cells, or `None` if it does not fit in `usize`
    pub fn capacity(&self) -> Option<usize> {
        self.players
            .checked_pow(self.arity as u32 - 1)?
            .checked_mul(self.groups)
    }
}

/// Dense, fully populated grid of decision variables
///
/// Cells are stored in row-major order with the group index varying fastest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGrid {
    dimensions: Dimensions,
    cells: Vec<BooleanVariable>,
}

impl VariableGrid {
    pub(crate) fn new(dimensions: Dimensions, cells: Vec<BooleanVariable>) -> Self {
        debug_assert_eq!(Some(cells.len()), dimensions.capacity());
        Self { dimensions, cells }
    }

    /// Returns the dimensions of this grid
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Variable for "player `i` is in group `g`" (matrix grids)
    pub fn at(&self, i: usize, g: usize) -> BooleanVariable {
        debug_assert_eq!(self.dimensions.arity, 2);
        debug_assert!(i < self.dimensions.players && g < self.dimensions.groups);
        self.cells[i * self.dimensions.groups + g]
    }

    /// Variable for "players `i` and `j` meet in round `g`" (cube grids)
    pub fn pair_at(&self, i: usize, j: usize, g: usize) -> BooleanVariable {
        debug_assert_eq!(self.dimensions.arity, 3);
        debug_assert!(i < self.dimensions.players && j < self.dimensions.players);
        debug_assert!(g < self.dimensions.groups);
        self.cells[(i * self.dimensions.players + j) * self.dimensions.groups + g]
    }

    /// Iterates over all variables in storage order
    pub fn iter(&self) -> impl Iterator<Item = BooleanVariable> + '_ {
        self.cells.iter().copied()
    }

    /// Number of variables in the grid
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_labels() {
        assert_eq!(BooleanConstant::TRUE.label(), 0);
        assert_eq!(BooleanConstant::FALSE.label(), -1);
        assert!(BooleanConstant::TRUE.boolean_value());
        assert!(!BooleanConstant::FALSE.boolean_value());
    }

    #[test]
    #[should_panic(expected = "Variable labels must be positive")]
    fn variable_rejects_zero_label() {
        BooleanVariable::new(0);
    }

    #[test]
    fn dimensions_capacity() {
        assert_eq!(Dimensions::matrix(4, 3).capacity(), Some(12));
        assert_eq!(Dimensions::cube(4, 3).capacity(), Some(48));
        assert_eq!(Dimensions::cube(1 << 33, 1).capacity(), None);
        assert_eq!(Dimensions::cube(4, 3).arity(), 3);
    }

    #[test]
    fn grid_indexing() {
        let dims = Dimensions::cube(2, 3);
        let cells = (1..=12).map(BooleanVariable::new).collect();
        let grid = VariableGrid::new(dims, cells);

        assert_eq!(grid.pair_at(0, 0, 0).label(), 1);
        assert_eq!(grid.pair_at(0, 1, 2).label(), 6);
        assert_eq!(grid.pair_at(1, 0, 0).label(), 7);
        assert_eq!(grid.pair_at(1, 1, 2).label(), 12);
        assert_eq!(grid.len(), 12);
    }

    #[test]
    fn evaluate_variable_and_constant() {
        let v = BoolValue::from(BooleanVariable::new(3));
        assert!(v.evaluate(&|var| var.label() == 3));
        assert!(!v.evaluate(&|_| false));
        assert!(BoolValue::from(BooleanConstant::TRUE).evaluate(&|_| false));
    }
}
