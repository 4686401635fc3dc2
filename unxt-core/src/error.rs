//! Structured errors for unit bookkeeping
//!
//! Errors are never recovered internally. They surface immediately to the
//! caller with a machine-readable code and, where one exists, a suggestion
//! naming the API that fixes the problem.

use std::fmt;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_NAME: &str = "INVALID_NAME";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_DIMENSION: &str = "UNKNOWN_DIMENSION";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    pub const AMBIGUOUS_DISPATCH: &str = "AMBIGUOUS_DISPATCH";
    pub const UNREGISTERED_CONVERTER: &str = "UNREGISTERED_CONVERTER";
    pub const NOT_IN_UNIT_SYSTEM: &str = "NOT_IN_UNIT_SYSTEM";
    pub const SHAPE_ERROR: &str = "SHAPE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Every failure the quantity machinery can report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnxtError {
    /// Malformed dimension-name string
    #[error("Input contains non-letter characters: {0:?}")]
    InvalidName(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown physical type: {0}")]
    UnknownDimension(String),

    /// Conversion or construction across incompatible dimensions
    #[error("'{from}' ({from_dim}) and '{to}' ({to_dim}) are not convertible")]
    DimensionMismatch {
        from: String,
        to: String,
        from_dim: String,
        to_dim: String,
    },

    /// A value of the wrong kind was handed to an API
    #[error("{message}")]
    Type { type_name: String, message: String },

    /// No handler registered for the argument's type
    #[error("{function}() has no handler registered for type '{type_name}'")]
    NotImplemented { function: String, type_name: String },

    /// More than one handler matched at the same specificity
    #[error("{function}() is ambiguous for type '{type_name}': candidates {candidates:?}")]
    AmbiguousDispatch {
        function: String,
        type_name: String,
        candidates: Vec<String>,
    },

    /// Raised instead of warning when the warning policy is `error`
    #[error("{0}")]
    UnregisteredConverter(UnregisteredConverterWarning),

    #[error("unit system '{system}' has no unit for dimension '{dimension}'")]
    NotInUnitSystem { system: String, dimension: String },

    #[error("shape error: {0}")]
    Shape(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl UnxtError {
    // ========== Common Error Constructors ==========

    /// Attempt to use a quantity where a bare value is expected.
    pub fn quantity_as_value(type_name: &str) -> Self {
        Self::Type {
            type_name: type_name.to_string(),
            message: format!(
                "Cannot convert '{}' to a value. For a Quantity, use the `from_` constructor instead.",
                type_name
            ),
        }
    }

    pub fn not_implemented(function: &str, type_name: &str) -> Self {
        Self::NotImplemented {
            function: function.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn dimension_mismatch(
        from: impl fmt::Display,
        to: impl fmt::Display,
        from_dim: impl fmt::Display,
        to_dim: impl fmt::Display,
    ) -> Self {
        Self::DimensionMismatch {
            from: from.to_string(),
            to: to.to_string(),
            from_dim: from_dim.to_string(),
            to_dim: to_dim.to_string(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => codes::INVALID_NAME,
            Self::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            Self::UnknownDimension(_) => codes::UNKNOWN_DIMENSION,
            Self::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            Self::Type { .. } => codes::TYPE_ERROR,
            Self::NotImplemented { .. } => codes::NOT_IMPLEMENTED,
            Self::AmbiguousDispatch { .. } => codes::AMBIGUOUS_DISPATCH,
            Self::UnregisteredConverter(_) => codes::UNREGISTERED_CONVERTER,
            Self::NotInUnitSystem { .. } => codes::NOT_IN_UNIT_SYSTEM,
            Self::Shape(_) => codes::SHAPE_ERROR,
            Self::Internal(_) => codes::INTERNAL,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidName(_) => {
                Some("Dimension names may only contain letters, spaces and underscores".to_string())
            }
            Self::UnknownUnit(u) => Some(format!("Check the spelling of '{}' or compose it from catalog units", u)),
            Self::DimensionMismatch { to_dim, .. } => {
                Some(format!("Convert to a unit whose physical type is {}", to_dim))
            }
            Self::Type { .. } => Some("Use the `from_` constructor".to_string()),
            Self::NotImplemented { function, .. } => {
                Some(format!("Register a handler for this type with {}", function))
            }
            Self::AmbiguousDispatch { .. } => {
                Some("Register a handler for the concrete type to break the tie".to_string())
            }
            Self::UnregisteredConverter(_) => {
                Some("Register a value converter or set UNXT_UNREGISTERED_CONVERTER=warn".to_string())
            }
            Self::NotInUnitSystem { system, .. } => {
                Some(format!("Add the missing base unit to '{}'", system))
            }
            Self::Internal(_) => Some("This is a bug, please report it".to_string()),
            Self::UnknownDimension(_) | Self::Shape(_) => None,
        }
    }
}

/// Non-fatal notice that a foreign array value was passed through unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnregisteredConverterWarning {
    pub type_name: String,
}

impl UnregisteredConverterWarning {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into() }
    }
}

impl fmt::Display for UnregisteredConverterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'ArrayValue' type '{}' does not have a registered converter. Returning the object as is.",
            self.type_name
        )
    }
}
