//! The value field of a quantity
//!
//! Normally a canonical [`Array`]. Foreign array values without a registered
//! converter are kept as the original [`Object`] and materialised lazily.

use crate::{Array, Object, UnxtError};
use std::fmt;

/// Numeric payload stored in a quantity
#[derive(Debug, Clone)]
pub enum Value {
    Array(Array),
    Opaque(Object),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Object> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque(_))
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Array(_) => "Array",
            Value::Opaque(o) => o.type_name(),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Value::Array(a) => a.shape().to_vec(),
            Value::Opaque(o) => o.as_array_value().map(|v| v.shape()).unwrap_or_default(),
        }
    }

    // ========== Numeric views ==========

    /// Canonical array for this value, materialising opaque payloads
    pub fn materialize(&self) -> Result<Array, UnxtError> {
        match self {
            Value::Array(a) => Ok(a.clone()),
            Value::Opaque(o) => o
                .as_array_value()
                .map(|v| v.materialize())
                .ok_or_else(|| UnxtError::Type {
                    type_name: o.type_name().to_string(),
                    message: format!("'{}' cannot be materialised as an array", o.type_name()),
                }),
        }
    }

    /// Multiply by a conversion factor. A factor of exactly one is a no-op
    /// and keeps opaque payloads untouched.
    pub fn scale(&self, factor: f64) -> Result<Value, UnxtError> {
        if factor == 1.0 {
            return Ok(self.clone());
        }
        Ok(Value::Array(self.materialize()?.scale(factor)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Array(a) => write!(f, "{}", a),
            Value::Opaque(o) => write!(f, "{:?}", o),
        }
    }
}

impl PartialEq for Value {
    /// Arrays compare by content, opaque payloads by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}
