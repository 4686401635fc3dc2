//! Dimension-checked quantity

use super::base::{fmt_parts, AbstractQuantity, ABSTRACT_PARAMETRIC_QUANTITY, ABSTRACT_QUANTITY};
use crate::value::value_converter;
use std::fmt;
use std::str::FromStr;
use unxt_core::{Dispatchable, Lineage, Object, UnxtError, Value};
use unxt_units::{get_dimension_name, parse_quantity_string, Dimension, IntoUnit, Unit};

/// A quantity whose physical type is the dimension of its unit.
///
/// ```
/// use unxt::{AbstractQuantity, Quantity};
///
/// let q = Quantity::new(vec![1i64, 2, 3], "m").unwrap();
/// assert_eq!(q.dimension_name(), "length");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    value: Value,
    unit: Unit,
}

impl Quantity {
    pub fn new(value: impl Into<Object>, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        Self::from_value(value, unit)
    }

    /// Construct, requiring the unit to have the `expected` physical type
    pub fn with_dimension(
        expected: Dimension,
        value: impl Into<Object>,
        unit: impl IntoUnit,
    ) -> Result<Self, UnxtError> {
        let unit = unit.into_unit()?;
        if unit.dimension() != expected {
            return Err(UnxtError::dimension_mismatch(
                &unit,
                expected.formula(),
                unit.dimension(),
                expected,
            ));
        }
        Ok(Quantity {
            value: value_converter(value)?,
            unit,
        })
    }
}

impl AbstractQuantity for Quantity {
    fn value(&self) -> &Value {
        &self.value
    }

    fn unit(&self) -> &Unit {
        &self.unit
    }

    fn from_parts(value: Value, unit: Unit) -> Result<Self, UnxtError> {
        Ok(Quantity { value, unit })
    }

    fn into_parts(self) -> (Value, Unit) {
        (self.value, self.unit)
    }
}

impl Dispatchable for Quantity {
    fn type_name(&self) -> &'static str {
        "Quantity"
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Quantity>()
            .then(ABSTRACT_PARAMETRIC_QUANTITY)
            .then(ABSTRACT_QUANTITY)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.unit.dimension();
        let name = get_dimension_name(&d).unwrap_or_else(|_| d.formula());
        write!(f, "Quantity['{}']", name)?;
        fmt_parts(f, &self.value, &self.unit)
    }
}

impl FromStr for Quantity {
    type Err = UnxtError;

    /// Parse `"5 km"` style strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = parse_quantity_string(s)?;
        Self::from_parts(Value::Array(value), unit)
    }
}
