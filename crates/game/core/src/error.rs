//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (e.g., `FleeError`, `DeathError`) live beside the
//! operations that raise them. Every one of them implements [`CombatError`] so
//! callers can classify failures without matching on concrete types.
//!
//! Expected domain failures are returned as values. Nothing in this crate
//! panics on bad input.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same command may succeed later (target moved, actor busy).
    Recoverable,

    /// Invalid input; retrying unchanged will fail again.
    ///
    /// Examples: actor not found, unknown exit, dead actor.
    Validation,

    /// Snapshot inconsistency (index points at a missing location, ...).
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for metrics, logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
