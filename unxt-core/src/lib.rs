//! unxt Core - Fundamental types
//!
//! This crate provides the core types used throughout unxt:
//! - `Array`: canonical n-dimensional numeric array with a dtype
//! - `Object`: shared, type-erased runtime value for open dispatch
//! - `Value`: the value field of a quantity
//! - `UnxtError`: structured errors with codes and suggestions

mod array;
mod error;
mod object;
mod value;

pub use array::{asarray, broadcast_shape, Array, AsArray, DType, Scalar, MAX_EXACT_INT};
pub use error::{codes, UnregisteredConverterWarning, UnxtError};
pub use object::{
    AsAny, ArrayValue, Dispatchable, Lineage, Object, TypeKey, ARRAY_LIKE, ARRAY_VALUE,
};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{asarray, Array, ArrayValue, Dispatchable, Object, UnxtError, Value};
    pub use crate::error::codes;
}
