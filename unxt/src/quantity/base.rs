//! The abstract quantity interface shared by every quantity variant

use crate::value::value_converter;
use std::sync::LazyLock;
use unxt_core::{Dispatchable, Object, TypeKey, UnxtError, Value};
use unxt_dispatch::Dispatcher;
use unxt_units::{get_dimension_name, ConvertTarget, Dimension, IntoUnit, Unit};

/// Capability shared by every quantity variant
pub const ABSTRACT_QUANTITY: TypeKey = TypeKey::Abstract("AbstractQuantity");

/// Capability of quantities that carry a physical-type tag
pub const ABSTRACT_PARAMETRIC_QUANTITY: TypeKey = TypeKey::Abstract("AbstractParametricQuantity");

/// Type-erased access to the parts of any registered quantity type
static QUANTITY_PARTS: LazyLock<Dispatcher<(Value, Unit)>> = LazyLock::new(|| {
    let d = Dispatcher::new("quantity_parts");
    register_parts::<super::Quantity>(&d);
    register_parts::<super::UncheckedQuantity>(&d);
    super::parametric::register_builtin_tags(&d);
    d
});

pub(crate) fn register_parts<Q: AbstractQuantity>(d: &Dispatcher<(Value, Unit)>) {
    d.register_concrete::<Q, _>(|q| Ok((q.value().clone(), q.unit().clone())));
}

/// Make a quantity type usable through type-erased conversion.
///
/// Built-in quantity types are registered automatically.
pub fn register_quantity_type<Q: AbstractQuantity>() {
    register_parts::<Q>(&QUANTITY_PARTS);
}

/// Value and unit of a type-erased quantity
pub fn quantity_parts(obj: &Object) -> Result<(Value, Unit), UnxtError> {
    QUANTITY_PARTS.call(obj.clone())
}

/// A numeric value tagged with a unit.
///
/// Implementors provide storage and validation; construction, conversion
/// and stripping are shared.
pub trait AbstractQuantity: Dispatchable + Clone {
    fn value(&self) -> &Value;

    fn unit(&self) -> &Unit;

    /// Assemble from an already coerced value, validating the unit as this
    /// variant requires
    fn from_parts(value: Value, unit: Unit) -> Result<Self, UnxtError>;

    fn into_parts(self) -> (Value, Unit);

    // ========== Construction ==========

    /// Construct from a raw value and unit. The value goes through
    /// [`value_converter`], so quantities are rejected.
    fn from_value(value: impl Into<Object>, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        let value = value_converter(value)?;
        Self::from_parts(value, unit.into_unit()?)
    }

    /// Construct from a raw value, or from an existing quantity converted
    /// to `unit`
    fn from_(value: impl Into<Object>, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        let obj = value.into();
        if !obj.lineage().contains(ABSTRACT_QUANTITY) {
            return Self::from_value(obj, unit);
        }
        let to = unit.into_unit()?;
        let (value, from) = quantity_parts(&obj)?;
        if from.ptr_eq(&to) {
            return Self::from_parts(value, to);
        }
        let factor = from.to(&to)?;
        Self::from_parts(value.scale(factor)?, to)
    }

    /// Reinterpret another quantity as this variant, keeping its unit
    fn from_quantity<Q: AbstractQuantity>(q: &Q) -> Result<Self, UnxtError> {
        Self::from_parts(q.value().clone(), q.unit().clone())
    }

    /// Convert another quantity to `unit`, then reinterpret it
    fn from_quantity_in<Q: AbstractQuantity>(q: &Q, unit: impl IntoUnit) -> Result<Self, UnxtError> {
        let unit = unit.into_unit()?;
        Self::from_quantity(&q.uconvert(&unit)?)
    }

    // ========== Queries ==========

    fn dimension(&self) -> Dimension {
        self.unit().dimension()
    }

    fn shape(&self) -> Vec<usize> {
        self.value().shape()
    }

    /// Name of the physical type, e.g. `length`
    fn dimension_name(&self) -> String {
        let d = self.dimension();
        get_dimension_name(&d).unwrap_or_else(|_| d.formula())
    }

    // ========== Conversion ==========

    /// Same variant in another unit. Converting to the current unit returns
    /// an unchanged copy.
    fn uconvert<T: ConvertTarget + ?Sized>(&self, target: &T) -> Result<Self, UnxtError> {
        let to = target.target_unit(self.dimension())?;
        if to.ptr_eq(self.unit()) {
            return Ok(self.clone());
        }
        let factor = self.unit().to(&to)?;
        Self::from_parts(self.value().scale(factor)?, to)
    }

    /// Value expressed in `target`, without the unit
    fn ustrip<T: ConvertTarget + ?Sized>(&self, target: &T) -> Result<Value, UnxtError> {
        Ok(self.uconvert(target)?.into_parts().0)
    }

    /// Whether this quantity can be expressed in `target`. Never fails.
    fn is_unit_convertible<T: ConvertTarget + ?Sized>(&self, target: &T) -> bool {
        target
            .target_unit(self.dimension())
            .and_then(|to| self.unit().to(&to))
            .is_ok()
    }
}

/// `Repr`-style rendering of a value and unit, e.g. `(Array(1, dtype=int64), unit='m')`
pub(crate) fn fmt_parts(f: &mut std::fmt::Formatter<'_>, value: &Value, unit: &Unit) -> std::fmt::Result {
    write!(f, "({}, unit='{}')", value, unit)
}
