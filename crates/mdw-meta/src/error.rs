//! Metainf parsing errors.

/// Error raised while parsing a metainf block.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MetaInfFieldError {
    /// Field is not registered and the schema rejects custom fields.
    #[error("Unsupported field '{field}'")]
    UnknownField {
        /// Normalized field name.
        field: String,
    },
    /// Field is present but its value is empty.
    #[error("Field '{field}' has an empty value")]
    EmptyValue {
        /// Normalized field name.
        field: String,
    },
    /// Value cannot be cast to the declared field type.
    #[error("Field '{field}' expects {kind}, got '{value}'")]
    InvalidValue {
        /// Normalized field name.
        field: String,
        /// Declared type name.
        kind: &'static str,
        /// Raw value.
        value: String,
    },
    /// Non-empty block that is not a `key: value` pair.
    #[error("Malformed metainf line '{line}'")]
    Malformed {
        /// The joined block text.
        line: String,
    },
}

impl MetaInfFieldError {
    /// Field name involved in the error, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField { field }
            | Self::EmptyValue { field }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::Malformed { .. } => None,
        }
    }
}
