//! Functional API over quantities and units

use crate::quantity::AbstractQuantity;
use unxt_core::{UnxtError, Value};
use unxt_units::{parse_unit, ConvertTarget, Unit};

/// Convert `q` to `target` (a unit, unit string or unit system).
///
/// ```
/// use unxt::{uconvert, ustrip, Quantity};
///
/// let q = Quantity::new(1i64, "m").unwrap();
/// let km = uconvert("km", &q).unwrap();
/// assert_eq!(ustrip("km", &km).unwrap().as_array().unwrap().item(), Some(0.001));
/// ```
pub fn uconvert<T, Q>(target: &T, q: &Q) -> Result<Q, UnxtError>
where
    T: ConvertTarget + ?Sized,
    Q: AbstractQuantity,
{
    q.uconvert(target)
}

/// Convert `q` to `target` and drop the unit
pub fn ustrip<T, Q>(target: &T, q: &Q) -> Result<Value, UnxtError>
where
    T: ConvertTarget + ?Sized,
    Q: AbstractQuantity,
{
    q.ustrip(target)
}

/// The stored value, without any conversion
pub fn ustrip_value<Q: AbstractQuantity>(q: &Q) -> &Value {
    q.value()
}

/// Anything that has a unit to convert from
pub trait ConvertSource {
    fn source_unit(&self) -> Result<Unit, UnxtError>;
}

impl ConvertSource for Unit {
    fn source_unit(&self) -> Result<Unit, UnxtError> {
        Ok(self.clone())
    }
}

impl ConvertSource for str {
    fn source_unit(&self) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

impl ConvertSource for String {
    fn source_unit(&self) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

impl<Q: AbstractQuantity> ConvertSource for Q {
    fn source_unit(&self) -> Result<Unit, UnxtError> {
        Ok(self.unit().clone())
    }
}

/// Whether `from` (a quantity, unit or unit string) can be expressed in
/// `target`. Unknown units and differing dimensions give `false`.
pub fn is_unit_convertible<T, F>(target: &T, from: &F) -> bool
where
    T: ConvertTarget + ?Sized,
    F: ConvertSource + ?Sized,
{
    from.source_unit()
        .and_then(|unit| {
            let to = target.target_unit(unit.dimension())?;
            unit.to(&to)
        })
        .is_ok()
}
