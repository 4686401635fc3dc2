//! Unit systems - one base unit per base dimension

use crate::dimension::{BASE_SYMBOLS, NUM_BASE};
use crate::{parse_unit, Dimension, Unit};
use std::fmt;
use unxt_core::UnxtError;

/// An ordered set of base units with distinct single-base dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSystem {
    name: String,
    base_units: Vec<Unit>,
}

/// Index of the only base dimension of `d`, if `d` is a plain base dimension
fn base_index(d: &Dimension) -> Option<usize> {
    let mut nonzero = d.exponents.iter().copied().enumerate().filter(|&(_, e)| e != 0);
    match (nonzero.next(), nonzero.next()) {
        (Some((i, 1)), None) => Some(i),
        _ => None,
    }
}

impl UnitSystem {
    /// Build a unit system. Each unit must have a single base dimension and
    /// no two units may share one.
    pub fn new(name: impl Into<String>, base_units: Vec<Unit>) -> Result<Self, UnxtError> {
        let name = name.into();
        let mut seen = [false; NUM_BASE];
        for u in &base_units {
            let idx = base_index(&u.dimension()).ok_or_else(|| UnxtError::Type {
                type_name: "UnitSystem".to_string(),
                message: format!("'{}' ({}) is not a base unit", u, u.dimension()),
            })?;
            if std::mem::replace(&mut seen[idx], true) {
                return Err(UnxtError::Type {
                    type_name: "UnitSystem".to_string(),
                    message: format!("unit system '{}' has more than one {} unit", name, u.dimension()),
                });
            }
        }
        Ok(UnitSystem { name, base_units })
    }

    /// Build a unit system from unit strings
    pub fn from_symbols(name: &str, symbols: &[&str]) -> Result<Self, UnxtError> {
        let units = symbols.iter().map(|s| parse_unit(s)).collect::<Result<Vec<_>, _>>()?;
        Self::new(name, units)
    }

    /// Built-in system by name
    pub fn named(name: &str) -> Result<Self, UnxtError> {
        match name.to_lowercase().as_str() {
            "dimensionless" => Self::new("dimensionless", Vec::new()),
            "si" => Self::from_symbols("si", &["m", "kg", "s", "A", "K", "mol", "cd", "rad"]),
            "cgs" => Self::from_symbols("cgs", &["cm", "g", "s", "rad"]),
            "galactic" => Self::from_symbols("galactic", &["kpc", "Myr", "Msun", "rad"]),
            "solar_system" | "solarsystem" => Self::from_symbols("solar_system", &["AU", "yr", "Msun", "rad"]),
            other => Err(UnxtError::Type {
                type_name: "UnitSystem".to_string(),
                message: format!("unknown unit system '{}'", other),
            }),
        }
    }

    pub fn galactic() -> Result<Self, UnxtError> {
        Self::named("galactic")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_units(&self) -> &[Unit] {
        &self.base_units
    }

    /// Unit of this system for an arbitrary dimension
    pub fn get(&self, dimension: Dimension) -> Result<Unit, UnxtError> {
        if let Some(u) = self.base_units.iter().find(|u| u.dimension() == dimension) {
            return Ok(u.clone());
        }

        let mut result = Unit::dimensionless();
        for (idx, &exp) in dimension.exponents.iter().enumerate() {
            if exp == 0 {
                continue;
            }
            let base = self
                .base_units
                .iter()
                .find(|u| base_index(&u.dimension()) == Some(idx))
                .ok_or_else(|| UnxtError::NotInUnitSystem {
                    system: self.name.clone(),
                    dimension: format!("{} (missing {})", dimension, BASE_SYMBOLS[idx]),
                })?;
            result = result.multiply(&base.powi(exp));
        }
        Ok(result)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.base_units.iter().map(|u| u.symbol()).collect();
        write!(f, "UnitSystem({})", symbols.join(", "))
    }
}

// ========== Conversion targets ==========

/// Anything a quantity of a given dimension can be converted to
pub trait ConvertTarget {
    fn target_unit(&self, dimension: Dimension) -> Result<Unit, UnxtError>;
}

impl ConvertTarget for Unit {
    fn target_unit(&self, _dimension: Dimension) -> Result<Unit, UnxtError> {
        Ok(self.clone())
    }
}

impl ConvertTarget for str {
    fn target_unit(&self, _dimension: Dimension) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

impl ConvertTarget for String {
    fn target_unit(&self, _dimension: Dimension) -> Result<Unit, UnxtError> {
        parse_unit(self)
    }
}

impl ConvertTarget for UnitSystem {
    fn target_unit(&self, dimension: Dimension) -> Result<Unit, UnxtError> {
        self.get(dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_galactic_base_units() {
        let usys = UnitSystem::galactic().unwrap();
        assert_eq!(usys.to_string(), "UnitSystem(kpc, Myr, Msun, rad)");
        assert_eq!(usys.get(Dimension::LENGTH).unwrap().symbol(), "kpc");
        assert_eq!(usys.get(Dimension::ANGLE).unwrap().symbol(), "rad");
    }

    #[test]
    fn test_derived_units() {
        let usys = UnitSystem::galactic().unwrap();
        let speed = usys.get(Dimension::SPEED).unwrap();
        assert_eq!(speed.symbol(), "kpc / Myr");
        assert_relative_eq!(speed.to(&parse_unit("km/s").unwrap()).unwrap(), 977.792_221_680_356, max_relative = 1e-6);

        let energy = usys.get(Dimension::ENERGY).unwrap();
        assert_eq!(energy.symbol(), "kpc^2 Msun / Myr^2");
        assert!(usys.get(Dimension::DIMENSIONLESS).unwrap().is_dimensionless());
    }

    #[test]
    fn test_missing_base() {
        let usys = UnitSystem::galactic().unwrap();
        let err = usys.get(Dimension::TEMPERATURE).unwrap_err();
        assert!(matches!(err, UnxtError::NotInUnitSystem { ref system, .. } if system == "galactic"));
    }

    #[test]
    fn test_validation() {
        assert!(UnitSystem::from_symbols("bad", &["km / s"]).is_err());
        assert!(UnitSystem::from_symbols("dup", &["m", "km"]).is_err());
        assert!(UnitSystem::named("imperial").is_err());
    }

    #[test]
    fn test_cgs_energy_is_erg() {
        let cgs = UnitSystem::named("cgs").unwrap();
        let energy = cgs.get(Dimension::ENERGY).unwrap();
        assert_eq!(energy, parse_unit("erg").unwrap());
    }

    #[test]
    fn test_convert_targets() {
        let usys = UnitSystem::named("solar_system").unwrap();
        assert_eq!(usys.target_unit(Dimension::TIME).unwrap().symbol(), "yr");
        assert_eq!("km".target_unit(Dimension::TIME).unwrap().symbol(), "km");
    }
}
