//! Error types for opbind-core
//!
//! Validation failures are not errors: they are recorded on the contract as
//! [`crate::Errors`]. This type covers input that cannot be bound at all.

use thiserror::Error;

/// Core error type for binding operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input document is not valid JSON, or not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Represented object could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// A JSON value has the wrong type for the field it is written into
    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidValue {
        /// Field the value was bound to
        field: String,
        /// Human-readable description of the accepted type
        expected: &'static str,
    },

    /// A representer addressed a field the target type does not have
    #[error("Unknown field '{field}' on {type_name}")]
    UnknownField {
        /// Type name of the target object
        type_name: String,
        /// Requested field name
        field: String,
    },

    /// A required operation parameter was not supplied
    #[error("Missing parameter: {0}")]
    MissingParam(String),

    /// Operation configuration failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The processing step of an operation failed
    #[error("Process error: {0}")]
    Process(String),
}

impl Error {
    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected,
        }
    }

    /// Create an unknown field error.
    #[must_use]
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for opbind-core operations
pub type Result<T> = std::result::Result<T, Error>;
