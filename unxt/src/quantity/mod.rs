//! Quantity variants

mod base;
mod checked;
mod parametric;
mod unchecked;

pub use base::{
    quantity_parts, register_quantity_type, AbstractQuantity, ABSTRACT_PARAMETRIC_QUANTITY, ABSTRACT_QUANTITY,
};
pub use checked::Quantity;
pub use parametric::{
    Acceleration, Angle, Dimensionless, DimensionTag, Distance, Energy, Length, Mass, ParametricQuantity, Speed,
    Time,
};
pub use unchecked::UncheckedQuantity;
