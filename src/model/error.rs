//! Typed failures for the projection core.

use thiserror::Error;

/// The ways in which projection inputs may be rejected at the boundary.
///
/// Out-of-domain values fail here before any trajectory arithmetic runs, so
/// no NaN or infinity ever propagates into a [`crate::model::types::YearPoint`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A field is outside its documented domain.
    #[error("invalid input: {field} — {message}")]
    InvalidInput {
        /// Dotted field path (e.g., `"datacenter.capacity_mw"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },
    /// A denominator that must be positive was zero or negative.
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),
}

impl InputError {
    /// Shorthand for an [`InputError::InvalidInput`] with a formatted message.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}
