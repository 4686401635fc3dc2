//! Unit representation with conversion factors

use crate::Dimension;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use unxt_core::UnxtError;

/// Relative tolerance under which two scales are the same unit
const SCALE_RTOL: f64 = 1e-12;

#[derive(Debug)]
struct UnitInner {
    symbol: String,
    name: String,
    dimension: Dimension,
    /// Factor to the coherent SI unit of `dimension` (value_si = value * scale)
    scale: f64,
    /// Catalog symbols and powers this unit is composed of
    terms: Vec<(String, i32)>,
}

/// A physical unit. Cheap to clone: all clones share one allocation.
#[derive(Clone)]
pub struct Unit {
    inner: Arc<UnitInner>,
}

impl Unit {
    /// Create a named catalog unit
    pub fn new(symbol: &str, name: &str, dimension: Dimension, scale: f64) -> Self {
        Unit {
            inner: Arc::new(UnitInner {
                symbol: symbol.to_string(),
                name: name.to_string(),
                dimension,
                scale,
                terms: vec![(symbol.to_string(), 1)],
            }),
        }
    }

    pub fn dimensionless() -> Self {
        Self::composed(Vec::new(), Dimension::DIMENSIONLESS, 1.0)
    }

    fn composed(terms: Vec<(String, i32)>, dimension: Dimension, scale: f64) -> Self {
        // A single plain term is a catalog unit again (e.g., km s / s)
        if let [(sym, 1)] = terms.as_slice() {
            if let Some(unit) = crate::UNITS.get(sym) {
                if unit.dimension() == dimension {
                    return unit.clone();
                }
            }
        }
        let symbol = render_terms(&terms);
        let name = if terms.is_empty() { "dimensionless".to_string() } else { symbol.clone() };
        Unit {
            inner: Arc::new(UnitInner { symbol, name, dimension, scale, terms }),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.inner.symbol
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn dimension(&self) -> Dimension {
        self.inner.dimension
    }

    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    pub fn is_dimensionless(&self) -> bool {
        self.inner.dimension.is_dimensionless()
    }

    /// Whether both handles share the same allocation
    pub fn ptr_eq(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.inner.dimension == other.inner.dimension
    }

    /// Multiplicative factor taking values in `self` to values in `target`
    pub fn to(&self, target: &Unit) -> Result<f64, UnxtError> {
        if !self.is_equivalent(target) {
            return Err(UnxtError::dimension_mismatch(
                self.symbol(),
                target.symbol(),
                self.dimension(),
                target.dimension(),
            ));
        }
        if self.ptr_eq(target) {
            return Ok(1.0);
        }
        Ok(self.inner.scale / target.inner.scale)
    }

    /// Multiply two units (e.g., kg * m -> kg m). Exponents must stay
    /// within `i32`; see [`Unit::checked_multiply`].
    pub fn multiply(&self, other: &Unit) -> Unit {
        let mut terms = self.inner.terms.clone();
        for (sym, p) in &other.inner.terms {
            merge_term(&mut terms, sym, *p);
        }
        Self::composed(
            terms,
            self.inner.dimension.multiply(&other.inner.dimension),
            self.inner.scale * other.inner.scale,
        )
    }

    /// Multiply two units, `None` if an exponent overflows
    pub fn checked_multiply(&self, other: &Unit) -> Option<Unit> {
        let mut terms = self.inner.terms.clone();
        for (sym, p) in &other.inner.terms {
            checked_merge_term(&mut terms, sym, *p)?;
        }
        Some(Self::composed(
            terms,
            self.inner.dimension.checked_multiply(&other.inner.dimension)?,
            self.inner.scale * other.inner.scale,
        ))
    }

    /// Raise to an integer power, `None` if an exponent overflows
    pub fn checked_powi(&self, exp: i32) -> Option<Unit> {
        if exp == 1 {
            return Some(self.clone());
        }
        let terms = if exp == 0 {
            Vec::new()
        } else {
            self.inner
                .terms
                .iter()
                .map(|(s, p)| p.checked_mul(exp).map(|p| (s.clone(), p)))
                .collect::<Option<Vec<_>>>()?
        };
        Some(Self::composed(terms, self.inner.dimension.checked_power(exp)?, self.inner.scale.powi(exp)))
    }

    /// Divide two units (e.g., km / s)
    pub fn divide(&self, other: &Unit) -> Unit {
        self.multiply(&other.powi(-1))
    }

    /// Raise to an integer power (e.g., m^2, s^-1). Exponents must stay
    /// within `i32`; see [`Unit::checked_powi`].
    pub fn powi(&self, exp: i32) -> Unit {
        if exp == 1 {
            return self.clone();
        }
        let terms = if exp == 0 {
            Vec::new()
        } else {
            self.inner.terms.iter().map(|(s, p)| (s.clone(), p * exp)).collect()
        };
        Self::composed(terms, self.inner.dimension.power(exp), self.inner.scale.powi(exp))
    }
}

fn merge_term(terms: &mut Vec<(String, i32)>, symbol: &str, power: i32) {
    match terms.iter().position(|(s, _)| s == symbol) {
        Some(i) => {
            terms[i].1 += power;
            if terms[i].1 == 0 {
                terms.remove(i);
            }
        }
        None => terms.push((symbol.to_string(), power)),
    }
}

fn checked_merge_term(terms: &mut Vec<(String, i32)>, symbol: &str, power: i32) -> Option<()> {
    match terms.iter().position(|(s, _)| s == symbol) {
        Some(i) => {
            terms[i].1 = terms[i].1.checked_add(power)?;
            if terms[i].1 == 0 {
                terms.remove(i);
            }
        }
        None => terms.push((symbol.to_string(), power)),
    }
    Some(())
}

/// Render terms as `a b^2 / c`, the form `parse_unit` reads back
fn render_terms(terms: &[(String, i32)]) -> String {
    let fmt_term = |sym: &str, p: i64| if p == 1 { sym.to_string() } else { format!("{}^{}", sym, p) };

    let num: Vec<String> = terms.iter().filter(|(_, p)| *p > 0).map(|(s, p)| fmt_term(s, i64::from(*p))).collect();
    let den: Vec<String> = terms.iter().filter(|(_, p)| *p < 0).map(|(s, p)| fmt_term(s, -i64::from(*p))).collect();

    match (num.is_empty(), den.is_empty()) {
        (true, true) => String::new(),
        (false, true) => num.join(" "),
        (true, false) => format!("1 / {}", den.join(" ")),
        (false, false) => format!("{} / {}", num.join(" "), den.join(" ")),
    }
}

impl PartialEq for Unit {
    /// Same physical type and the same scale
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (self.inner.scale, other.inner.scale);
        self.inner.dimension == other.inner.dimension && (a - b).abs() <= SCALE_RTOL * a.abs().max(b.abs())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.symbol)
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit(\"{}\")", self.inner.symbol)
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        crate::parse_unit(&symbol).map_err(serde::de::Error::custom)
    }
}
