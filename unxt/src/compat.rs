//! Conversion registry and query-protocol implementations

use crate::interop::ExternalQuantity;
use crate::quantity::{
    quantity_parts, AbstractQuantity, DimensionTag, ParametricQuantity, Quantity, UncheckedQuantity, ABSTRACT_QUANTITY,
};
use std::sync::{Arc, LazyLock};
use unxt_core::{Dispatchable, Object, TypeKey, UnxtError};
use unxt_dispatch::ConversionRegistry;
use unxt_units::{Dimension, DimensionsOf, Unit, UnitsOf};

static CONVERSIONS: LazyLock<ConversionRegistry> = LazyLock::new(|| {
    let reg = ConversionRegistry::new();

    reg.register::<Quantity, _>(ABSTRACT_QUANTITY, |obj| {
        let (value, unit) = quantity_parts(obj)?;
        Quantity::from_parts(value, unit)
    });
    reg.register::<UncheckedQuantity, _>(ABSTRACT_QUANTITY, |obj| {
        let (value, unit) = quantity_parts(obj)?;
        UncheckedQuantity::from_parts(value, unit)
    });
    reg.register::<ExternalQuantity, _>(ABSTRACT_QUANTITY, |obj| {
        let (value, unit) = quantity_parts(obj)?;
        ExternalQuantity::from_parts(&value, &unit)
    });
    reg.register_concrete::<ExternalQuantity, Quantity, _>(|ext| ext.to_quantity());
    reg.register_concrete::<ExternalQuantity, UncheckedQuantity, _>(|ext| ext.to_quantity());

    reg
});

/// Convert `obj` to `T`.
///
/// An object that already is a `T` comes back as the same allocation.
/// Otherwise the most specific registered conversion is used.
///
/// ```
/// use unxt::{convert, Object, Quantity, UncheckedQuantity};
///
/// let obj = Object::new(Quantity::new(1.0, "m").unwrap());
/// let same = convert::<Quantity>(&obj).unwrap();
/// assert!(obj.is_same(&same));
///
/// let unchecked = convert::<UncheckedQuantity>(&obj).unwrap();
/// assert_eq!(unchecked.to_string(), "UncheckedQuantity(Array(1.0, dtype=float64), unit='m')");
/// ```
pub fn convert<T: Dispatchable>(obj: &Object) -> Result<Arc<T>, UnxtError> {
    CONVERSIONS.convert::<T>(obj)
}

/// Register a conversion to `T` from every object whose lineage contains `source`
pub fn register_conversion<T, F>(source: TypeKey, f: F)
where
    T: Dispatchable,
    F: Fn(&Object) -> Result<T, UnxtError> + Send + Sync + 'static,
{
    CONVERSIONS.register::<T, F>(source, f);
}

pub fn can_convert<T: Dispatchable>(obj: &Object) -> bool {
    CONVERSIONS.can_convert::<T>(obj)
}

// ========== Query protocol ==========

macro_rules! quantity_queries {
    ($(impl$(<$g:ident: $b:ident>)? for $t:ty;)*) => {
        $(
            impl$(<$g: $b>)? DimensionsOf for $t {
                fn dimensions_of(&self) -> Dimension {
                    self.unit().dimension()
                }
            }

            impl$(<$g: $b>)? UnitsOf for $t {
                fn units_of(&self) -> Unit {
                    self.unit().clone()
                }
            }
        )*
    };
}

quantity_queries! {
    impl for Quantity;
    impl for UncheckedQuantity;
    impl<D: DimensionTag> for ParametricQuantity<D>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Distance;
    use unxt_units::{dimensions_of, units_of};

    #[test]
    fn test_identity_conversion_is_same_allocation() {
        let q = Arc::new(UncheckedQuantity::new(vec![1.0, 2.0], "m").unwrap());
        let obj = Object::from_arc(Arc::clone(&q));
        let out = convert::<UncheckedQuantity>(&obj).unwrap();
        assert!(Arc::ptr_eq(&q, &out));
    }

    #[test]
    fn test_abstract_quantity_conversions() {
        let obj = Object::new(Distance::new(3.0, "kpc").unwrap());
        let q = convert::<Quantity>(&obj).unwrap();
        assert_eq!(q.unit().symbol(), "kpc");
        assert!(can_convert::<UncheckedQuantity>(&obj));
    }

    #[test]
    fn test_no_conversion() {
        let err = convert::<Quantity>(&Object::new(1.0f64)).unwrap_err();
        assert!(matches!(err, UnxtError::NotImplemented { ref type_name, .. } if type_name == "f64"));
    }

    /// Values in coherent SI units, as another library might store them
    #[derive(Debug)]
    struct SiReading {
        values: Vec<f64>,
        dimension: Dimension,
    }

    impl Dispatchable for SiReading {
        fn type_name(&self) -> &'static str {
            "SiReading"
        }
    }

    #[test]
    fn test_register_conversion_to_user_type() {
        let obj = Object::new(Quantity::new(vec![1.0, 2.0], "km").unwrap());
        assert!(!can_convert::<SiReading>(&obj));

        register_conversion::<SiReading, _>(ABSTRACT_QUANTITY, |obj| {
            let (value, unit) = quantity_parts(obj)?;
            Ok(SiReading {
                values: value.materialize()?.scale(unit.scale()).to_vec(),
                dimension: unit.dimension(),
            })
        });

        let reading = convert::<SiReading>(&obj).unwrap();
        assert_eq!(reading.values, vec![1000.0, 2000.0]);
        assert_eq!(reading.dimension, Dimension::LENGTH);

        let unchecked = Object::new(UncheckedQuantity::new(3.0, "g").unwrap());
        assert_eq!(convert::<SiReading>(&unchecked).unwrap().dimension, Dimension::MASS);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Power;

    impl DimensionTag for Power {
        const DIMENSION: Dimension = Dimension::POWER;
        const TYPE_NAME: &'static str = "Quantity['power']";
    }

    #[test]
    fn test_user_dimension_tag_needs_registration() {
        let lsun = Object::new(ParametricQuantity::<Power>::new(2.0, "Lsun").unwrap());
        let err = convert::<Quantity>(&lsun).unwrap_err();
        assert!(matches!(err, UnxtError::NotImplemented { ref type_name, .. } if type_name == "Quantity['power']"));

        crate::register_quantity_type::<ParametricQuantity<Power>>();
        let q = convert::<Quantity>(&lsun).unwrap();
        assert_eq!(q.unit().symbol(), "Lsun");
        assert_eq!(q.dimension_name(), "power");
        assert_eq!(q.value().as_array().unwrap().item(), Some(2.0));
    }

    #[test]
    fn test_query_protocol() {
        let q = Quantity::new(1.0, "km / s").unwrap();
        assert_eq!(dimensions_of(&q), Dimension::SPEED);
        assert!(units_of(&q).ptr_eq(q.unit()));

        let d = Distance::new(1.0, "pc").unwrap();
        assert_eq!(dimensions_of(&d), Dimension::LENGTH);
    }
}
