//! Dimension names and the dimension/unit query protocol

use crate::{parse_unit, Dimension, Unit};
use regex::Regex;
use std::sync::LazyLock;
use unxt_core::UnxtError;

static NON_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z_ ]").expect("valid pattern"));

/// Dimensions whose name is fixed rather than taken from the catalog order
const PREFERRED_NAMES: &[(Dimension, &str)] = &[(Dimension::SPEED, "speed")];

// ========== Dimension names ==========

/// Anything that has a canonical dimension name
pub trait DimensionName {
    fn dimension_name(&self) -> Result<String, UnxtError>;
}

impl DimensionName for str {
    /// Validates the characters and lower-cases. The name is not checked
    /// against the catalog.
    fn dimension_name(&self) -> Result<String, UnxtError> {
        if NON_NAME_CHARS.is_match(self) {
            return Err(UnxtError::InvalidName(self.to_string()));
        }
        Ok(self.to_lowercase())
    }
}

impl DimensionName for String {
    fn dimension_name(&self) -> Result<String, UnxtError> {
        self.as_str().dimension_name()
    }
}

impl DimensionName for Dimension {
    fn dimension_name(&self) -> Result<String, UnxtError> {
        let name = PREFERRED_NAMES
            .iter()
            .find(|(d, _)| d == self)
            .map(|(_, name)| *name)
            .or_else(|| self.names().first().copied())
            .unwrap_or("unknown");
        name.dimension_name()
    }
}

impl DimensionName for Unit {
    fn dimension_name(&self) -> Result<String, UnxtError> {
        self.dimension().dimension_name()
    }
}

/// Canonical name of a dimension, unit or dimension-name string.
///
/// ```
/// use unxt_units::{get_dimension_name, Dimension};
///
/// assert_eq!(get_dimension_name("length").unwrap(), "length");
/// assert_eq!(get_dimension_name(&Dimension::SPEED).unwrap(), "speed");
/// assert!(get_dimension_name("*62").is_err());
/// ```
pub fn get_dimension_name<T: DimensionName + ?Sized>(x: &T) -> Result<String, UnxtError> {
    x.dimension_name()
}

// ========== Query protocol ==========

/// Types that carry a physical dimension
pub trait DimensionsOf {
    fn dimensions_of(&self) -> Dimension;
}

/// Types that carry a unit
pub trait UnitsOf {
    fn units_of(&self) -> Unit;
}

impl DimensionsOf for Dimension {
    fn dimensions_of(&self) -> Dimension {
        *self
    }
}

impl DimensionsOf for Unit {
    fn dimensions_of(&self) -> Dimension {
        self.dimension()
    }
}

impl UnitsOf for Unit {
    fn units_of(&self) -> Unit {
        self.clone()
    }
}

pub fn dimensions_of<T: DimensionsOf + ?Sized>(x: &T) -> Dimension {
    x.dimensions_of()
}

pub fn units_of<T: UnitsOf + ?Sized>(x: &T) -> Unit {
    x.units_of()
}

// ========== Unit input coercion ==========

/// Anything accepted where a unit is expected
pub trait IntoUnit {
    fn into_unit(self) -> Result<Unit, UnxtError>;
}

impl IntoUnit for Unit {
    fn into_unit(self) -> Result<Unit, UnxtError> {
        Ok(self)
    }
}

impl IntoUnit for &Unit {
    fn into_unit(self) -> Result<Unit, UnxtError> {
        Ok(self.clone())
    }
}

impl IntoUnit for &str {
    fn into_unit(self) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

impl IntoUnit for String {
    fn into_unit(self) -> Result<Unit, UnxtError> {
        parse_unit(&self)
    }
}

impl IntoUnit for &String {
    fn into_unit(self) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

/// Construct a unit from a unit or unit string
pub fn unit(x: impl IntoUnit) -> Result<Unit, UnxtError> {
    x.into_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_string() {
        assert_eq!(get_dimension_name("length").unwrap(), "length");
        assert_eq!(get_dimension_name("Amount_Of Substance").unwrap(), "amount_of substance");
        assert_eq!(get_dimension_name(&"not a real thing".to_string()).unwrap(), "not a real thing");
    }

    #[test]
    fn test_invalid_name() {
        let err = get_dimension_name("*62").unwrap_err();
        assert_eq!(err, UnxtError::InvalidName("*62".to_string()));
        assert!(err.to_string().contains("non-letter characters"));
        assert!(get_dimension_name("length2").is_err());
    }

    #[test]
    fn test_speed_is_stable() {
        for _ in 0..10 {
            assert_eq!(get_dimension_name(&Dimension::SPEED).unwrap(), "speed");
        }
    }

    #[test]
    fn test_name_from_dimension() {
        assert_eq!(get_dimension_name(&Dimension::ENERGY).unwrap(), "energy");
        assert_eq!(get_dimension_name(&Dimension::LENGTH.power(7)).unwrap(), "unknown");
    }

    #[test]
    fn test_name_from_unit() {
        assert_eq!(get_dimension_name(&unit("km / s").unwrap()).unwrap(), "speed");
        assert_eq!(get_dimension_name(&unit("kpc").unwrap()).unwrap(), "length");
    }

    #[test]
    fn test_query_protocol() {
        let km = unit("km").unwrap();
        assert_eq!(dimensions_of(&km), Dimension::LENGTH);
        assert!(units_of(&km).ptr_eq(&km));
        assert_eq!(dimensions_of(&Dimension::MASS), Dimension::MASS);
    }

    #[test]
    fn test_into_unit() {
        let a = unit("Msun").unwrap();
        let b = unit(&a).unwrap();
        let c = unit(String::from("solMass")).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(a, c);
        assert!(matches!(unit("parsnip"), Err(UnxtError::UnknownUnit(_))));
    }
}
