//! Quantity without dimension checks

use super::base::{fmt_parts, AbstractQuantity, ABSTRACT_QUANTITY};
use std::fmt;
use std::str::FromStr;
use unxt_core::{Dispatchable, Lineage, Object, UnxtError, Value};
use unxt_units::{parse_quantity_string, IntoUnit, Unit};

/// A quantity that never validates its physical type.
///
/// Conversion still needs the catalog to agree on dimensions, because that
/// is where the factor comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct UncheckedQuantity {
    value: Value,
    unit: Unit,
}

impl UncheckedQuantity {
    pub fn new(value: impl Into<Object>, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        Self::from_value(value, unit)
    }
}

impl AbstractQuantity for UncheckedQuantity {
    fn value(&self) -> &Value {
        &self.value
    }

    fn unit(&self) -> &Unit {
        &self.unit
    }

    fn from_parts(value: Value, unit: Unit) -> Result<Self, UnxtError> {
        Ok(UncheckedQuantity { value, unit })
    }

    fn into_parts(self) -> (Value, Unit) {
        (self.value, self.unit)
    }
}

impl Dispatchable for UncheckedQuantity {
    fn type_name(&self) -> &'static str {
        "UncheckedQuantity"
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<UncheckedQuantity>().then(ABSTRACT_QUANTITY)
    }
}

impl fmt::Display for UncheckedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UncheckedQuantity")?;
        fmt_parts(f, &self.value, &self.unit)
    }
}

impl FromStr for UncheckedQuantity {
    type Err = UnxtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = parse_quantity_string(s)?;
        Self::from_parts(Value::Array(value), unit)
    }
}
