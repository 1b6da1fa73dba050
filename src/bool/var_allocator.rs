//! Variable allocation for SAT encoding
//!
//! Declares named decision variables against a factory and lays them out in
//! dense grids before any axiom is compiled. Names are derived from grid
//! indices (`v-i-j` for the assignment grid, `v-i-j-k` for the pairing cube)
//! and declaring a name twice returns the same variable.

use super::{BooleanFactory, BooleanVariable, Dimensions, VariableGrid};
use crate::{Result, ScheduleError};
use rustc_hash::FxHashMap;

/// Registry of named decision variables
pub struct VariableAllocator {
    by_name: FxHashMap<String, BooleanVariable>,
    names: FxHashMap<BooleanVariable, String>,
}

impl VariableAllocator {
    /// Creates a new variable allocator
    pub fn new() -> Self {
        Self {
            by_name: FxHashMap::default(),
            names: FxHashMap::default(),
        }
    }

    /// Declares a boolean variable with the given name.
    ///
    /// Idempotent per name: a second declaration returns the variable
    /// created by the first.
    pub fn declare(&mut self, factory: &BooleanFactory<'_>, name: &str) -> BooleanVariable {
        if let Some(&var) = self.by_name.get(name) {
            return var;
        }

        let var = factory.variable();
        self.by_name.insert(name.to_owned(), var);
        self.names.insert(var, name.to_owned());
        var
    }

    /// Allocates a `players × groups` grid named `v-i-j`
    ///
    /// Fails if any of the names is already declared, so two grids never
    /// share a variable.
    pub fn allocate_matrix(
        &mut self,
        factory: &BooleanFactory<'_>,
        players: usize,
        groups: usize,
    ) -> Result<VariableGrid> {
        let names = (0..players)
            .flat_map(|i| (0..groups).map(move |j| format!("v-{i}-{j}")));
        self.allocate_grid(factory, Dimensions::matrix(players, groups), names)
    }

    /// Allocates a `players × players × groups` grid named `v-i-j-k`
    ///
    /// Fails if any of the names is already declared.
    pub fn allocate_cube(
        &mut self,
        factory: &BooleanFactory<'_>,
        players: usize,
        groups: usize,
    ) -> Result<VariableGrid> {
        let names = (0..players).flat_map(|i| {
            (0..players).flat_map(move |j| (0..groups).map(move |k| format!("v-{i}-{j}-{k}")))
        });
        self.allocate_grid(factory, Dimensions::cube(players, groups), names)
    }

    fn allocate_grid(
        &mut self,
        factory: &BooleanFactory<'_>,
        dimensions: Dimensions,
        names: impl Iterator<Item = String>,
    ) -> Result<VariableGrid> {
        let capacity = dimensions
            .capacity()
            .filter(|&cells| factory.has_room_for(cells))
            .ok_or_else(|| {
                ScheduleError::InvalidArgument(format!(
                    "{dimensions:?} needs more variables than a circuit can label"
                ))
            })?;

        let names: Vec<String> = names.collect();
        if let Some(taken) = names.iter().find(|name| self.by_name.contains_key(name.as_str())) {
            return Err(ScheduleError::InvalidArgument(format!(
                "variable {taken} is already declared in this session"
            )));
        }

        let mut cells = Vec::with_capacity(capacity);
        for name in &names {
            cells.push(self.declare(factory, name));
        }
        Ok(VariableGrid::new(dimensions, cells))
    }

    /// Looks up a variable by name
    pub fn get(&self, name: &str) -> Option<BooleanVariable> {
        self.by_name.get(name).copied()
    }

    /// Returns the name a variable was declared with
    pub fn name_of(&self, var: BooleanVariable) -> Option<&str> {
        self.names.get(&var).map(String::as_str)
    }

    /// Returns the number of declared variables
    pub fn total_variables(&self) -> usize {
        self.by_name.len()
    }
}

impl Default for VariableAllocator {
    fn default() -> Self {
        Self::new()
    }
}
