//! unxt - Unitful quantities over n-dimensional arrays
//!
//! Attaches units and physical types to numeric array values so that unit
//! errors are caught and conversions are automatic.
//!
//! - `Quantity`: value plus unit, physical type taken from the unit
//! - `ParametricQuantity<D>`: physical type fixed at compile time
//! - `UncheckedQuantity`: no physical-type checks
//! - `uconvert` / `ustrip`: conversion to units and unit systems
//! - `value_converter` / `convert`: open coercion and conversion registries
//!
//! ```
//! use unxt::{uconvert, AbstractQuantity, Quantity, UnitSystem};
//!
//! let q = Quantity::new(1e17, "km").unwrap();
//! let kpc = uconvert(&UnitSystem::galactic().unwrap(), &q).unwrap();
//! assert_eq!(kpc.unit().symbol(), "kpc");
//! assert_eq!(kpc.dimension_name(), "length");
//! ```

mod api;
mod compat;
mod interop;
pub mod ops;
pub mod quantity;
mod value;

pub use api::{is_unit_convertible, uconvert, ustrip, ustrip_value, ConvertSource};
pub use compat::{can_convert, convert, register_conversion};
pub use interop::ExternalQuantity;
pub use quantity::{
    register_quantity_type, AbstractQuantity, Distance, DimensionTag, ParametricQuantity, Quantity, UncheckedQuantity,
    ABSTRACT_PARAMETRIC_QUANTITY, ABSTRACT_QUANTITY,
};
pub use value::{register_value_converter, value_converter};

pub use unxt_core::{asarray, Array, ArrayValue, DType, Dispatchable, Lineage, Object, TypeKey, UnxtError, Value};
pub use unxt_dispatch::{set_config, DispatchConfig, WarningPolicy};
pub use unxt_units::{
    dimension, dimensions_of, get_dimension_name, parse_unit, unit, units_of, ConvertTarget, Dimension, IntoUnit,
    Unit, UnitSystem, UNITS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        uconvert, ustrip, AbstractQuantity, Dimension, Quantity, UncheckedQuantity, Unit, UnitSystem, UnxtError,
    };
}
