//! Interop with quantity records from other libraries

use crate::quantity::AbstractQuantity;
use serde::{Deserialize, Serialize};
use std::fmt;
use unxt_core::{Array, DType, Dispatchable, UnxtError, Value};
use unxt_units::{parse_unit, IntoUnit, Unit};

/// A plain array-with-unit record, as exchanged with other quantity
/// libraries: a flat row-major buffer, its shape and a unit string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalQuantity {
    pub value: Vec<f64>,
    pub shape: Vec<usize>,
    pub unit: String,
}

impl ExternalQuantity {
    pub fn new(value: Vec<f64>, shape: Vec<usize>, unit: impl Into<String>) -> Self {
        ExternalQuantity {
            value,
            shape,
            unit: unit.into(),
        }
    }

    pub(crate) fn from_parts(value: &Value, unit: &Unit) -> Result<Self, UnxtError> {
        let array = value.materialize()?;
        Ok(ExternalQuantity {
            value: array.to_vec(),
            shape: array.shape().to_vec(),
            unit: unit.symbol().to_string(),
        })
    }

    /// Export any quantity
    pub fn from_quantity<Q: AbstractQuantity>(q: &Q) -> Result<Self, UnxtError> {
        Self::from_parts(q.value(), q.unit())
    }

    fn array(&self) -> Result<Array, UnxtError> {
        Array::from_shape_vec(&self.shape, self.value.clone(), DType::Float)
    }

    /// Import as a quantity of variant `Q`
    pub fn to_quantity<Q: AbstractQuantity>(&self) -> Result<Q, UnxtError> {
        Q::from_parts(Value::Array(self.array()?), parse_unit(&self.unit)?)
    }

    /// Values expressed in `unit`
    pub fn to_value(&self, unit: impl IntoUnit) -> Result<Array, UnxtError> {
        let factor = parse_unit(&self.unit)?.to(&unit.into_unit()?)?;
        Ok(self.array()?.scale(factor))
    }
}

impl Dispatchable for ExternalQuantity {
    fn type_name(&self) -> &'static str {
        "ExternalQuantity"
    }
}

impl fmt::Display for ExternalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ExternalQuantity {:?} {}>", self.value, self.unit)
    }
}
