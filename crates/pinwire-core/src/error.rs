//! Error types for pinwire.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError  - type, converter and factory registration failures
//! ConversionError    - resolution failures and failures applying a converter
//! ```
//!
//! Resolution itself never fails loudly: `try_get_converter` returns `None`.
//! Only `get_converter` turns "nothing found" into
//! [`ConversionError::NotFound`]. Every other `ConversionError` variant is
//! produced while a converter is applied to an actual value and propagates
//! to the caller of `apply` untouched.

use thiserror::Error;

use crate::TypeHash;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating a type catalog or converter registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this hash is already registered.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(TypeHash),

    /// A generic instance names a definition that is not registered.
    #[error("unknown generic definition: {0}")]
    UnknownGenericDefinition(TypeHash),

    /// A generic instance names a type that is not a generic definition.
    #[error("'{0}' is not a generic definition")]
    NotGenericDefinition(String),

    /// A generic instance was given the wrong number of type arguments.
    #[error("generic '{name}' expects {expected} type argument(s), got {actual}")]
    GenericArityMismatch {
        /// Generic definition name.
        name: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        actual: usize,
    },

    /// An exact-match converter for this pair already exists and the
    /// registry rejects duplicates.
    #[error("converter {from} -> {to} is already registered")]
    DuplicateConverter {
        /// Source type name.
        from: String,
        /// Destination type name.
        to: String,
    },

    /// A dynamic converter factory for this shape pair already exists and
    /// the registry rejects duplicates.
    #[error("dynamic converter {from} -> {to} is already registered")]
    DuplicateFactory {
        /// Source shape description.
        from: String,
        /// Destination shape description.
        to: String,
    },
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors raised by converter lookup or by applying a converter to a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// No strategy produced a converter for the pair.
    #[error("no converter from '{from}' to '{to}'")]
    NotFound {
        /// Source type name.
        from: String,
        /// Destination type name.
        to: String,
    },

    /// The value handed to a converter is not of the converter's source type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// What the converter expected.
        expected: String,
        /// What it received.
        actual: String,
    },

    /// A numeric value does not fit the destination type.
    #[error("value {value} out of range for {target}")]
    Overflow {
        /// Textual form of the offending value.
        value: String,
        /// Destination type name.
        target: &'static str,
    },

    /// Text could not be parsed as the destination type.
    #[error("cannot parse '{input}' as {target}")]
    Parse {
        /// The text that failed to parse.
        input: String,
        /// Destination type name.
        target: &'static str,
    },

    /// A null value reached a converter that needs a value.
    #[error("null value cannot be converted to {0}")]
    NullValue(String),

    /// Failure reported by a module-supplied converter.
    #[error("{0}")]
    Custom(String),
}

impl ConversionError {
    /// Build a [`ConversionError::TypeMismatch`].
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ConversionError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build a [`ConversionError::Custom`] from any message.
    pub fn custom(message: impl Into<String>) -> Self {
        ConversionError::Custom(message.into())
    }
}
