//! Value coercion: raw inputs to the value field of a quantity

use crate::quantity::ABSTRACT_QUANTITY;
use std::sync::LazyLock;
use unxt_core::{asarray, Array, Dispatchable, Object, UnxtError, Value, ARRAY_LIKE, ARRAY_VALUE};
use unxt_dispatch::{report_unregistered, Dispatcher};

static VALUE_CONVERTER: LazyLock<Dispatcher<Value>> = LazyLock::new(|| {
    let d = Dispatcher::new("value_converter");
    d.register(ARRAY_LIKE, |obj: Object| array_like(&obj).map(Value::Array));
    d.register(ARRAY_VALUE, |obj: Object| {
        report_unregistered(&obj)?;
        Ok(Value::Opaque(obj))
    });
    d.register(ABSTRACT_QUANTITY, |obj: Object| Err(UnxtError::quantity_as_value(obj.type_name())));
    d
});

macro_rules! try_asarray {
    ($obj:expr; $($t:ty),* $(,)?) => {
        $(
            if let Some(v) = $obj.downcast_ref::<$t>() {
                return asarray(v);
            }
        )*
    };
}

/// Canonical array for the built-in array-like types
fn array_like(obj: &Object) -> Result<Array, UnxtError> {
    try_asarray!(obj;
        Array, f64, f32, i64, i32, u32, bool,
        Vec<f64>, Vec<f32>, Vec<i64>, Vec<i32>, Vec<bool>,
        Vec<Vec<f64>>, Vec<Vec<i64>>,
        ndarray::ArrayD<f64>, ndarray::ArrayD<i64>, ndarray::Array1<f64>, ndarray::Array2<f64>,
    );
    Err(UnxtError::not_implemented("value_converter", obj.type_name()))
}

/// Coerce a raw input into a quantity value.
///
/// - array-likes become an [`Array`] through `asarray`
/// - foreign array values without a converter are returned as the same
///   object, after an `UnregisteredConverterWarning`
/// - quantities are rejected; use `from_` to build from a quantity
/// - anything else has no handler
pub fn value_converter(x: impl Into<Object>) -> Result<Value, UnxtError> {
    VALUE_CONVERTER.call(x.into())
}

/// Register a converter for a concrete input type. It takes precedence
/// over the built-in capability handlers.
pub fn register_value_converter<T, F>(f: F)
where
    T: Dispatchable,
    F: Fn(&T) -> Result<Value, UnxtError> + Send + Sync + 'static,
{
    VALUE_CONVERTER.register_concrete::<T, F>(f);
}
