//! Unit string parsing - parse expressions like "km / s" or "m^2"
//!
//! Catalog symbols resolve to the shared catalog unit. Parsed expressions
//! are cached by their source string, up to a fixed number of entries, so
//! repeated lookups of the same string return the same shared unit.

use crate::units::UNITS;
use crate::Unit;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;
use unxt_core::{Array, UnxtError};

/// Expressions beyond this many are parsed on every call
const CACHE_CAPACITY: usize = 1024;

static CACHE: LazyLock<RwLock<ParseCache>> = LazyLock::new(|| RwLock::new(ParseCache::new(CACHE_CAPACITY)));

/// Parsed expressions by source string, holding at most `capacity` entries
struct ParseCache {
    entries: HashMap<String, Unit>,
    capacity: usize,
}

impl ParseCache {
    fn new(capacity: usize) -> Self {
        ParseCache {
            entries: HashMap::new(),
            capacity,
        }
    }

    fn get(&self, s: &str) -> Option<&Unit> {
        self.entries.get(s)
    }

    /// The shared unit for `s`: an earlier entry, `unit` once stored, or
    /// `unit` itself when the cache is full
    fn insert(&mut self, s: &str, unit: Unit) -> Unit {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(s) {
            return unit;
        }
        self.entries.entry(s.to_string()).or_insert(unit).clone()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

const SUPERSCRIPTS: [(char, char); 11] = [
    ('⁰', '0'), ('¹', '1'), ('²', '2'), ('³', '3'), ('⁴', '4'),
    ('⁵', '5'), ('⁶', '6'), ('⁷', '7'), ('⁸', '8'), ('⁹', '9'),
    ('⁻', '-'),
];

/// Parse a unit string into a Unit
///
/// Supported formats:
/// - Simple: "m", "kg", "Msun", long names such as "meter"
/// - Powers: "m^2", "s**-1", "m²", "s⁻¹"
/// - Products: "kg*m", "kg m", "kg·m"
/// - Quotients: "km/s", "kg m / s^2"
/// - Empty string: dimensionless
pub fn parse_unit(s: &str) -> Result<Unit, UnxtError> {
    let s = s.trim();

    if let Some(unit) = UNITS.get(s) {
        return Ok(unit.clone());
    }
    if let Some(unit) = CACHE.read().get(s) {
        return Ok(unit.clone());
    }

    let unit = parse_unit_expression(s)?;
    tracing::trace!(input = s, unit = %unit, "unit parsed");

    Ok(CACHE.write().insert(s, unit))
}

/// Number of distinct expressions in the parse cache
pub fn cache_len() -> usize {
    CACHE.read().len()
}

/// Parse a complex unit expression like "kg m / s^2"
fn parse_unit_expression(s: &str) -> Result<Unit, UnxtError> {
    let normalized = s.replace("**", "^");
    let mut parts = normalized.split('/');

    let mut result = parse_product(parts.next().unwrap_or(""))?;
    for part in parts {
        if part.trim().is_empty() {
            return Err(UnxtError::UnknownUnit(s.to_string()));
        }
        let divisor = parse_product(part)?.checked_powi(-1).ok_or_else(|| out_of_range(s))?;
        result = result.checked_multiply(&divisor).ok_or_else(|| out_of_range(s))?;
    }
    if !result.scale().is_normal() {
        return Err(out_of_range(s));
    }
    Ok(result)
}

fn out_of_range(s: &str) -> UnxtError {
    UnxtError::UnknownUnit(format!("{} (exponent out of range)", s))
}

/// Parse a product of units like "kg*m" or "m^2 s"
fn parse_product(s: &str) -> Result<Unit, UnxtError> {
    s.split(['*', '·', ' '])
        .filter(|p| !p.is_empty())
        .try_fold(Unit::dimensionless(), |acc, factor| {
            acc.checked_multiply(&parse_power(factor)?).ok_or_else(|| out_of_range(s))
        })
}

/// Parse a unit with optional power like "m^2", "s²" or "s-1"
fn parse_power(s: &str) -> Result<Unit, UnxtError> {
    if let Some((base, exp)) = s.split_once('^') {
        return checked_power(lookup_base_unit(base)?, parse_exponent(exp, s)?, s);
    }

    if let Some((base, exp)) = split_superscript(s) {
        return checked_power(lookup_base_unit(base)?, parse_exponent(&exp, s)?, s);
    }

    match lookup_base_unit(s) {
        Ok(unit) => Ok(unit),
        // Trailing integer exponent, as in "s-1" or "cm3"
        Err(e) => {
            let split = s.trim_end_matches(|c: char| c.is_ascii_digit() || c == '-');
            if split.is_empty() || split.len() == s.len() {
                return Err(e);
            }
            checked_power(lookup_base_unit(split)?, parse_exponent(&s[split.len()..], s)?, s)
        }
    }
}

fn checked_power(unit: Unit, exp: i32, context: &str) -> Result<Unit, UnxtError> {
    unit.checked_powi(exp).ok_or_else(|| out_of_range(context))
}

fn parse_exponent(exp: &str, context: &str) -> Result<i32, UnxtError> {
    exp.trim()
        .parse()
        .map_err(|_| UnxtError::UnknownUnit(format!("{} (invalid exponent '{}')", context, exp)))
}

/// Split trailing superscript exponents like m², s⁻¹
fn split_superscript(s: &str) -> Option<(&str, String)> {
    let base = s.trim_end_matches(|c: char| SUPERSCRIPTS.iter().any(|(sup, _)| *sup == c));
    if base.len() == s.len() {
        return None;
    }
    let exp = s[base.len()..]
        .chars()
        .filter_map(|c| SUPERSCRIPTS.iter().find(|(sup, _)| *sup == c).map(|(_, d)| *d))
        .collect();
    Some((base, exp))
}

/// Look up a base unit by symbol or alias
fn lookup_base_unit(s: &str) -> Result<Unit, UnxtError> {
    let s = s.trim();

    if s == "1" || s.is_empty() {
        return Ok(Unit::dimensionless());
    }

    UNITS
        .get(s)
        .cloned()
        .ok_or_else(|| UnxtError::UnknownUnit(s.to_string()))
}

/// Parse a quantity string like "5 km" or "-3.5e2 km / s".
///
/// Integer literals keep an integer dtype.
pub fn parse_quantity_string(s: &str) -> Result<(Array, Unit), UnxtError> {
    let s = s.trim();
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    let mut split_pos = 0;
    for (i, &(pos, c)) in chars.iter().enumerate() {
        let exponent_marker = (c == 'e' || c == 'E')
            && split_pos > 0
            && chars
                .get(i + 1)
                .is_some_and(|(_, n)| n.is_ascii_digit() || *n == '-' || *n == '+');
        if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || exponent_marker {
            split_pos = pos + c.len_utf8();
        } else {
            break;
        }
    }

    let num_str = &s[..split_pos];
    let unit_str = s[split_pos..].trim();

    let value = if let Ok(n) = num_str.parse::<i64>() {
        Array::scalar(n)?
    } else if let Ok(x) = num_str.parse::<f64>() {
        Array::scalar(x)?
    } else {
        return Err(UnxtError::Type {
            type_name: "str".to_string(),
            message: format!("no number found in '{}'", s),
        });
    };

    Ok((value, parse_unit(unit_str)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimension;
    use approx::assert_relative_eq;
    use unxt_core::DType;

    #[test]
    fn test_parse_simple_unit() {
        let unit = parse_unit("m").unwrap();
        assert_eq!(unit.symbol(), "m");
        assert_eq!(unit.dimension(), Dimension::LENGTH);
    }

    #[test]
    fn test_parse_unit_with_power() {
        assert_eq!(parse_unit("m^2").unwrap().dimension(), Dimension::AREA);
        assert_eq!(parse_unit("s^-1").unwrap().dimension(), Dimension::FREQUENCY);
        assert_eq!(parse_unit("s**-1").unwrap().dimension(), Dimension::FREQUENCY);
        assert_eq!(parse_unit("m³").unwrap().dimension(), Dimension::VOLUME);
        assert_eq!(parse_unit("s⁻¹").unwrap().dimension(), Dimension::FREQUENCY);
        assert_eq!(parse_unit("cm3").unwrap().dimension(), Dimension::VOLUME);
    }

    #[test]
    fn test_parse_quotient() {
        let unit = parse_unit("km/s").unwrap();
        assert_eq!(unit.dimension(), Dimension::SPEED);
        assert_eq!(unit.symbol(), "km / s");
        assert_relative_eq!(unit.scale(), 1000.0);
    }

    #[test]
    fn test_parse_complex() {
        let unit = parse_unit("kg*m/s^2").unwrap();
        assert_eq!(unit.dimension(), Dimension::FORCE);
        assert_eq!(parse_unit("kg m / s^2").unwrap(), unit);
        assert_relative_eq!(parse_unit("g cm / s^2").unwrap().to(&unit).unwrap(), 1e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_symbol_round_trip() {
        for s in ["km / s", "kpc^2 / Myr", "1 / s", "Msun kpc^2 / Myr^2"] {
            let unit = parse_unit(s).unwrap();
            assert_eq!(unit.symbol(), s);
        }
    }

    #[test]
    fn test_empty_is_dimensionless() {
        assert!(parse_unit("").unwrap().is_dimensionless());
        assert!(parse_unit("dimensionless").unwrap().is_dimensionless());
    }

    #[test]
    fn test_cache_returns_same_handle() {
        let a = parse_unit("Msun / pc^3").unwrap();
        let b = parse_unit("Msun / pc^3").unwrap();
        assert!(a.ptr_eq(&b));
        assert!(cache_len() >= 1);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut cache = ParseCache::new(2);
        let a = cache.insert("m^2", parse_unit_expression("m^2").unwrap());
        let b = cache.insert("m^3", parse_unit_expression("m^3").unwrap());
        let c = cache.insert("m^4", parse_unit_expression("m^4").unwrap());
        assert_eq!(cache.len(), 2);
        assert!(cache.get("m^4").is_none());
        assert_eq!(c.dimension(), Dimension::LENGTH.power(4));

        let again = cache.insert("m^2", parse_unit_expression("m^2").unwrap());
        assert!(again.ptr_eq(&a));
        assert!(cache.get("m^3").unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_catalog_symbols_bypass_cache() {
        assert!(parse_unit("km").unwrap().ptr_eq(UNITS.get("km").unwrap()));
        assert!(parse_unit(" Msun ").unwrap().ptr_eq(UNITS.get("Msun").unwrap()));
    }

    #[test]
    fn test_exponent_overflow_is_rejected() {
        for s in ["m^2147483647 m", "1 / m^-2147483648", "kg^65536 / kg^-2147483647"] {
            assert!(matches!(parse_unit(s), Err(UnxtError::UnknownUnit(_))), "{}", s);
        }
        assert!(matches!(parse_unit("pc^200"), Err(UnxtError::UnknownUnit(_))));
        assert!(parse_unit("m^2147483647").is_ok());
        assert_eq!(parse_unit("m^-2147483648").unwrap().symbol(), "1 / m^2147483648");
    }

    #[test]
    fn test_alias_lookup() {
        assert_eq!(parse_unit("meter").unwrap().symbol(), "m");
        assert_eq!(parse_unit("kilogram").unwrap().symbol(), "kg");
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(parse_unit("unknown_xyz"), Err(UnxtError::UnknownUnit(_))));
        assert!(parse_unit("m/").is_err());
        assert!(parse_unit("m^x").is_err());
    }

    #[test]
    fn test_parse_quantity_string() {
        let (value, unit) = parse_quantity_string("5 km").unwrap();
        assert_eq!(value.item(), Some(5.0));
        assert_eq!(value.dtype(), DType::Int);
        assert_eq!(unit.symbol(), "km");

        let (value, unit) = parse_quantity_string("100kg").unwrap();
        assert_eq!(value.item(), Some(100.0));
        assert_eq!(unit.symbol(), "kg");

        let (value, unit) = parse_quantity_string("-3.5e2 km / s").unwrap();
        assert_eq!(value.item(), Some(-350.0));
        assert_eq!(value.dtype(), DType::Float);
        assert_eq!(unit.dimension(), Dimension::SPEED);

        let (value, unit) = parse_quantity_string("2 eV").unwrap();
        assert_eq!(value.item(), Some(2.0));
        assert_eq!(unit.symbol(), "eV");

        assert!(parse_quantity_string("km").is_err());
    }
}
