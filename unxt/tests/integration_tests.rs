//! End-to-end behaviour of quantities, conversions and coercion

use approx::assert_relative_eq;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use unxt::{
    asarray, convert, get_dimension_name, is_unit_convertible, parse_unit, uconvert, ustrip, ustrip_value,
    value_converter, AbstractQuantity, Array, ArrayValue, Dimension, Distance, Object, Quantity, UncheckedQuantity,
    UnitSystem, UnxtError, Value,
};

fn item(v: &Value) -> f64 {
    v.as_array().and_then(|a| a.item()).unwrap()
}

// ========== Warning capture ==========

#[derive(Clone, Default)]
struct WarningCapture(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() == "unxt::value" && *meta.level() == tracing::Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push(visitor.0);
        }
    }
}

#[derive(Debug)]
struct LazyZeros(usize);

impl ArrayValue for LazyZeros {
    fn shape(&self) -> Vec<usize> {
        vec![self.0]
    }

    fn materialize(&self) -> Array {
        asarray(&vec![0.0; self.0]).unwrap()
    }
}

unxt_core::array_value!(LazyZeros);

// ========== Conversion registry ==========

#[test]
fn test_convert_to_own_type_is_identity() {
    let q = Arc::new(Quantity::new(vec![1.0, 2.0, 3.0], "m").unwrap());
    let obj = Object::from_arc(Arc::clone(&q));
    let out = convert::<Quantity>(&obj).unwrap();
    assert!(Arc::ptr_eq(&q, &out));

    let d = Object::new(Distance::new(1.0, "pc").unwrap());
    let same = convert::<Distance>(&d).unwrap();
    assert!(d.is_same(&same));
}

#[test]
fn test_convert_between_variants() {
    let obj = Object::new(UncheckedQuantity::new(2.0, "kpc").unwrap());
    let q = convert::<Quantity>(&obj).unwrap();
    assert_eq!(q.to_string(), "Quantity['length'](Array(2.0, dtype=float64), unit='kpc')");
}

// ========== Conversion ==========

#[test]
fn test_metre_to_kilometre() {
    let q = Quantity::new(1i64, "m").unwrap();
    let km = uconvert("km", &q).unwrap();
    assert_relative_eq!(item(&ustrip("km", &km).unwrap()), 0.001);
    assert!(matches!(uconvert("s", &q), Err(UnxtError::DimensionMismatch { .. })));
}

#[test]
fn test_unequal_dimensions() {
    let q = Quantity::new(vec![1.0, 2.0], "Msun").unwrap();
    assert!(matches!(uconvert("pc", &q), Err(UnxtError::DimensionMismatch { .. })));
    assert!(!is_unit_convertible("pc", &q));
    assert!(!is_unit_convertible("not a unit", &q));
    assert!(is_unit_convertible("kg", &q));

    let m = Quantity::new(1.0, "m").unwrap();
    assert!(!is_unit_convertible("1 / m^-2147483648", &m));
    assert!(!is_unit_convertible("m^2147483647 m", &m));
}

#[test]
fn test_galactic_unit_system() {
    let q = Quantity::new(1e17, "km").unwrap();
    let usys = UnitSystem::galactic().unwrap();
    let kpc = uconvert(&usys, &q).unwrap();
    assert_eq!(kpc.unit().symbol(), "kpc");
    assert_relative_eq!(item(kpc.value()), 3.240_779_2, max_relative = 1e-7);
}

#[test]
fn test_unchecked_conversion() {
    let q = UncheckedQuantity::new(vec![1i64, 2], "deg").unwrap();
    let arcmin = q.uconvert("arcmin").unwrap();
    assert_eq!(arcmin.value().as_array().unwrap().to_vec().len(), 2);
    assert_relative_eq!(arcmin.value().as_array().unwrap().to_vec()[1], 120.0, max_relative = 1e-12);
}

#[test]
fn test_ustrip_value_does_not_convert() {
    let q = Quantity::new(5i64, "km").unwrap();
    assert_eq!(ustrip_value(&q), q.value());
    assert_eq!(item(ustrip_value(&q)), 5.0);
}

proptest! {
    #[test]
    fn prop_round_trip_through_other_unit(
        x in -1e6f64..1e6,
        u1 in prop::sample::select(vec!["m", "km", "AU", "pc", "kpc", "lyr", "Rsun"]),
        u2 in prop::sample::select(vec!["m", "km", "AU", "pc", "kpc", "lyr", "Rsun"]),
    ) {
        let q = Quantity::new(x, "km").unwrap();
        let direct = item(&ustrip(u1, &q).unwrap());
        let via = item(&ustrip(u1, &uconvert(u2, &q).unwrap()).unwrap());
        prop_assert!((direct - via).abs() <= 1e-9 * direct.abs().max(1e-300));
    }

    #[test]
    fn prop_is_unit_convertible_never_panics(s in "[a-zA-Z /*]{0,8}(\\^-?[0-9]{1,10})?( [a-zA-Z]{1,3}(\\^-?[0-9]{1,10})?)?") {
        let q = Quantity::new(1.0, "m").unwrap();
        let expected = parse_unit(&s).map(|u| u.dimension() == Dimension::LENGTH).unwrap_or(false);
        prop_assert_eq!(is_unit_convertible(s.as_str(), &q), expected);
    }
}

// ========== Dimension names ==========

#[test]
fn test_dimension_names() {
    assert_eq!(get_dimension_name("length").unwrap(), "length");
    assert!(matches!(get_dimension_name("*62"), Err(UnxtError::InvalidName(_))));
    for _ in 0..5 {
        assert_eq!(get_dimension_name(&Dimension::SPEED).unwrap(), "speed");
    }
    assert_eq!(get_dimension_name(&parse_unit("km / s").unwrap()).unwrap(), "speed");
}

// ========== Value coercion ==========

#[test]
fn test_quantities_are_not_values() {
    let cases: Vec<(Object, &str)> = vec![
        (Object::new(Quantity::new(1.0, "m").unwrap()), "Quantity"),
        (Object::new(UncheckedQuantity::new(1.0, "m").unwrap()), "UncheckedQuantity"),
        (Object::new(Distance::new(1.0, "m").unwrap()), "Quantity['length']"),
    ];
    for (obj, name) in cases {
        let err = value_converter(obj).unwrap_err();
        assert_eq!(err.code(), unxt_core::codes::TYPE_ERROR);
        assert_eq!(
            err.to_string(),
            format!(
                "Cannot convert '{}' to a value. For a Quantity, use the `from_` constructor instead.",
                name
            )
        );
    }
}

#[test]
fn test_array_like_matches_asarray() {
    let v = value_converter(vec![1i64, 2, 3]).unwrap();
    assert_eq!(v, Value::Array(asarray(&vec![1i64, 2, 3]).unwrap()));
}

#[test]
fn test_unregistered_array_value_warns_once() {
    let capture = WarningCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    let obj = Object::new(LazyZeros(4));
    let value = tracing::subscriber::with_default(subscriber, || value_converter(obj.clone()).unwrap());

    assert!(value.as_opaque().unwrap().ptr_eq(&obj));
    let warnings = capture.0.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("'LazyZeros'"));
    assert!(warnings[0].contains("Returning the object as is"));
}

#[test]
fn test_opaque_value_in_quantity() {
    let q = Quantity::new(Object::new(LazyZeros(3)), "km").unwrap();
    assert!(q.value().is_opaque());
    assert_eq!(q.shape(), vec![3]);

    // Same unit keeps the foreign object, a real conversion materialises it
    assert!(uconvert("km", &q).unwrap().value().is_opaque());
    let m = uconvert("m", &q).unwrap();
    assert_eq!(m.value().as_array().unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
}

// ========== Parsing ==========

#[test]
fn test_parsed_units_are_cached() {
    let a = parse_unit("Msun kpc^2 / Myr^2").unwrap();
    let b = parse_unit("Msun kpc^2 / Myr^2").unwrap();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.dimension(), Dimension::ENERGY);
}

#[test]
fn test_quantity_from_str() {
    let q: Quantity = "3 AU".parse().unwrap();
    let km = q.uconvert("km").unwrap();
    assert_relative_eq!(item(km.value()), 448_793_612.1, max_relative = 1e-9);
}
