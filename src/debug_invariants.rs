//! Structural self-checks for the array containers.
//!
//! Each container states what must hold between its fields (value buffer
//! length against extents or `max_id`, sparse coordinate columns against the
//! value column, unique array names in field data) and reports the first
//! violation as an [`ArrayError`]. Mutating methods call
//! [`debug_assert_invariants`](DebugInvariants::debug_assert_invariants)
//! afterwards; it panics on a violation in debug builds, or in release builds
//! with the `check-invariants` / `strict-invariants` features, and is a no-op
//! otherwise.

use crate::array_error::ArrayError;

/// Containers that can validate their own layout.
pub trait DebugInvariants {
    /// Container name used in panic messages.
    const CONTAINER: &'static str;

    /// Return the first broken invariant, if any.
    fn validate_invariants(&self) -> Result<(), ArrayError>;

    /// Panic on a broken invariant when checking is compiled in.
    #[inline]
    fn debug_assert_invariants(&self) {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {}: {e}", Self::CONTAINER);
        }
    }
}
