//! # Error Types
//!
//! Validation errors for vinoteca-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vinoteca-core errors (this file)                                      │
//! │  └── ValidationError  - Field-map parsing failures                     │
//! │                                                                         │
//! │  vinoteca-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vinoteca-tasks / vinoteca-export errors (separate crates)             │
//! │  └── TaskError / ExportError - delivered to the shell as signals       │
//! │                                                                         │
//! │  Flow: ValidationError → (shell shows form error, nothing dispatched)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and value in the message
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Input validation errors.
///
/// Produced while parsing the field-name-keyed maps the shell's entry and
/// search forms submit, before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A numeric field could not be parsed.
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A date field was present but not in `YYYY-MM-DD` form.
    #[error("{field} is not a valid date (expected YYYY-MM-DD): '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidNumber {
            field: "price",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price is not a valid number: 'abc'");
    }
}
