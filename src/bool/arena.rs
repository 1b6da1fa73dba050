//! Arena allocator for gate storage
//!
//! Provides a wrapper around bumpalo::Bump for the gate inputs built during
//! one solve. All allocations are freed when the arena is dropped, which is
//! how a session releases its circuit on every exit path.

use bumpalo::Bump;

/// Arena for boolean gate inputs
///
/// Gates hold `&'arena` references into this arena, so the borrow checker
/// ties every formula to the session that built it.
pub struct FormulaArena {
    bump: Bump,
}

impl FormulaArena {
    /// Creates a new arena allocator
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Allocates a value in the arena and returns a reference to it
    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    /// Copies a slice into the arena
    pub fn alloc_slice<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    /// Bytes currently held by the arena
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for FormulaArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_survive_source_drop() {
        let arena = FormulaArena::new();
        let stored = {
            let source = vec![1, 2, 3];
            arena.alloc_slice(&source)
        };
        assert_eq!(stored, &[1, 2, 3]);
        assert!(arena.allocated_bytes() > 0);
    }
}
