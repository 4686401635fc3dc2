//! unxt Units - Physical types and unit catalog
//!
//! Provides the unit and dimension layer used by quantities:
//! - `Dimension`: exponent vector over eight base dimensions, with names
//! - `Unit`: shared handle to a catalog or composed unit
//! - `UNITS`: SI and astronomy unit catalog
//! - `parse_unit`: cached unit-string parser
//! - `UnitSystem`: base units from which any dimension's unit is composed
//!
//! Categories:
//! - Length (m, km, AU, pc, kpc, lyr, ...)
//! - Mass (kg, g, Msun, Mearth, Mjup)
//! - Time (s, min, h, d, yr, Myr, Gyr, ...)
//! - Angle (rad, deg, arcmin, arcsec, mas, sr, ...)
//! - Derived (Hz, N, J, erg, eV, W, Lsun, Pa, C, V, Ohm, ...)

mod dimension;
mod names;
mod parse;
mod system;
mod unit;
mod units;

pub use dimension::{dimension, Dimension, BASE_SYMBOLS, NUM_BASE};
pub use names::{
    dimensions_of, get_dimension_name, unit, units_of, DimensionName, DimensionsOf, IntoUnit, UnitsOf,
};
pub use parse::{cache_len, parse_quantity_string, parse_unit};
pub use system::{ConvertTarget, UnitSystem};
pub use unit::Unit;
pub use units::{UnitCatalog, UNITS};
