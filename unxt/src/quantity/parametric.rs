//! Quantities whose physical type is fixed by a type parameter

use super::base::{fmt_parts, register_parts, AbstractQuantity, ABSTRACT_PARAMETRIC_QUANTITY, ABSTRACT_QUANTITY};
use std::fmt;
use std::marker::PhantomData;
use unxt_core::{Dispatchable, Lineage, Object, UnxtError, Value};
use unxt_dispatch::Dispatcher;
use unxt_units::{Dimension, IntoUnit, Unit};

/// Compile-time physical type
pub trait DimensionTag: Send + Sync + 'static {
    const DIMENSION: Dimension;
    /// Display name of the quantity type, e.g. `Quantity['length']`
    const TYPE_NAME: &'static str;
}

macro_rules! dimension_tags {
    ($($tag:ident => $dim:ident, $name:literal;)*) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $tag;

            impl DimensionTag for $tag {
                const DIMENSION: Dimension = Dimension::$dim;
                const TYPE_NAME: &'static str = concat!("Quantity['", $name, "']");
            }
        )*

        pub(crate) fn register_builtin_tags(d: &Dispatcher<(Value, Unit)>) {
            $( register_parts::<ParametricQuantity<$tag>>(d); )*
        }
    };
}

dimension_tags! {
    Dimensionless => DIMENSIONLESS, "dimensionless";
    Length => LENGTH, "length";
    Mass => MASS, "mass";
    Time => TIME, "time";
    Angle => ANGLE, "angle";
    Speed => SPEED, "speed";
    Acceleration => ACCELERATION, "acceleration";
    Energy => ENERGY, "energy";
}

pub type Distance = ParametricQuantity<Length>;

/// Quantity whose unit must have the physical type `D`
pub struct ParametricQuantity<D: DimensionTag> {
    value: Value,
    unit: Unit,
    _tag: PhantomData<fn() -> D>,
}

impl<D: DimensionTag> ParametricQuantity<D> {
    pub fn new(value: impl Into<Object>, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        Self::from_value(value, unit)
    }
}

impl<D: DimensionTag> AbstractQuantity for ParametricQuantity<D> {
    fn value(&self) -> &Value {
        &self.value
    }

    fn unit(&self) -> &Unit {
        &self.unit
    }

    fn from_parts(value: Value, unit: Unit) -> Result<Self, UnxtError> {
        if unit.dimension() != D::DIMENSION {
            return Err(UnxtError::dimension_mismatch(
                &unit,
                D::TYPE_NAME,
                unit.dimension(),
                D::DIMENSION,
            ));
        }
        Ok(ParametricQuantity {
            value,
            unit,
            _tag: PhantomData,
        })
    }

    fn into_parts(self) -> (Value, Unit) {
        (self.value, self.unit)
    }
}

impl<D: DimensionTag> Dispatchable for ParametricQuantity<D> {
    fn type_name(&self) -> &'static str {
        D::TYPE_NAME
    }

    fn lineage(&self) -> Lineage {
        Lineage::of::<Self>()
            .then(ABSTRACT_PARAMETRIC_QUANTITY)
            .then(ABSTRACT_QUANTITY)
    }
}

impl<D: DimensionTag> Clone for ParametricQuantity<D> {
    fn clone(&self) -> Self {
        ParametricQuantity {
            value: self.value.clone(),
            unit: self.unit.clone(),
            _tag: PhantomData,
        }
    }
}

impl<D: DimensionTag> PartialEq for ParametricQuantity<D> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.unit == other.unit
    }
}

impl<D: DimensionTag> fmt::Debug for ParametricQuantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(D::TYPE_NAME)
            .field("value", &self.value)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<D: DimensionTag> fmt::Display for ParametricQuantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", D::TYPE_NAME)?;
        fmt_parts(f, &self.value, &self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_dimension() {
        let d = Distance::new(vec![1.0, 2.0], "kpc").unwrap();
        assert_eq!(d.to_string(), "Quantity['length'](Array([1.0, 2.0], dtype=float64), unit='kpc')");
        assert_eq!(d.type_name(), "Quantity['length']");
    }

    #[test]
    fn test_rejects_other_dimension() {
        let err = Distance::new(1.0, "Myr").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'Myr' (time) and 'Quantity['length']' (length) are not convertible"
        );
    }

    #[test]
    fn test_uconvert_keeps_tag() {
        let v = ParametricQuantity::<Speed>::new(1.0, "kpc / Myr").unwrap();
        let kms = v.uconvert("km / s").unwrap();
        assert!((kms.value().as_array().unwrap().item().unwrap() - 977.792).abs() < 1e-3);
        assert!(v.uconvert("kpc").is_err());
    }

    #[test]
    fn test_from_rejects_other_dimension() {
        let t = crate::Quantity::new(1.0, "Myr").unwrap();
        assert!(matches!(Distance::from_(t.clone(), "Myr"), Err(UnxtError::DimensionMismatch { .. })));
        assert!(matches!(Distance::from_(t, "pc"), Err(UnxtError::DimensionMismatch { .. })));

        let d = Distance::from_(crate::Quantity::new(1.0, "kpc").unwrap(), "pc").unwrap();
        assert!((d.value().as_array().unwrap().item().unwrap() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_is_not_dimensionless() {
        assert!(ParametricQuantity::<Angle>::new(90.0, "deg").is_ok());
        assert!(ParametricQuantity::<Dimensionless>::new(90.0, "deg").is_err());
    }
}
