//! Dimensional analysis types
//!
//! Each physical type is represented as an 8-element exponent vector:
//! [length, mass, time, current, temperature, amount, luminous intensity, angle]
//!
//! Angle is kept as a base dimension so that `rad` and `deg` stay distinct
//! from dimensionless ratios.

use serde::{Deserialize, Serialize};
use std::fmt;
use unxt_core::UnxtError;

/// Number of base dimensions
pub const NUM_BASE: usize = 8;

/// Symbols of the base dimensions, in exponent order
pub const BASE_SYMBOLS: [&str; NUM_BASE] = ["L", "M", "T", "I", "Θ", "N", "J", "A"];

/// Exponents of a physical type over the base dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminous intensity, angle]
    pub exponents: [i32; NUM_BASE],
}

macro_rules! dims {
    ($($(#[$doc:meta])* $name:ident = [$($e:expr),*];)*) => {
        impl Dimension {
            $(
                $(#[$doc])*
                pub const $name: Dimension = Dimension { exponents: [$($e),*] };
            )*
        }
    };
}

dims! {
    DIMENSIONLESS = [0, 0, 0, 0, 0, 0, 0, 0];
    /// [L]
    LENGTH = [1, 0, 0, 0, 0, 0, 0, 0];
    /// [M]
    MASS = [0, 1, 0, 0, 0, 0, 0, 0];
    /// [T]
    TIME = [0, 0, 1, 0, 0, 0, 0, 0];
    /// [I]
    CURRENT = [0, 0, 0, 1, 0, 0, 0, 0];
    /// [Θ]
    TEMPERATURE = [0, 0, 0, 0, 1, 0, 0, 0];
    /// [N]
    AMOUNT = [0, 0, 0, 0, 0, 1, 0, 0];
    /// [J]
    LUMINOUS_INTENSITY = [0, 0, 0, 0, 0, 0, 1, 0];
    /// [A]
    ANGLE = [0, 0, 0, 0, 0, 0, 0, 1];

    SOLID_ANGLE = [0, 0, 0, 0, 0, 0, 0, 2];
    AREA = [2, 0, 0, 0, 0, 0, 0, 0];
    VOLUME = [3, 0, 0, 0, 0, 0, 0, 0];
    /// [L T^-1]
    SPEED = [1, 0, -1, 0, 0, 0, 0, 0];
    ACCELERATION = [1, 0, -2, 0, 0, 0, 0, 0];
    FREQUENCY = [0, 0, -1, 0, 0, 0, 0, 0];
    ANGULAR_SPEED = [0, 0, -1, 0, 0, 0, 0, 1];
    FORCE = [1, 1, -2, 0, 0, 0, 0, 0];
    ENERGY = [2, 1, -2, 0, 0, 0, 0, 0];
    POWER = [2, 1, -3, 0, 0, 0, 0, 0];
    PRESSURE = [-1, 1, -2, 0, 0, 0, 0, 0];
    MOMENTUM = [1, 1, -1, 0, 0, 0, 0, 0];
    ANGULAR_MOMENTUM = [2, 1, -1, 0, 0, 0, 0, 0];
    MASS_DENSITY = [-3, 1, 0, 0, 0, 0, 0, 0];
    CHARGE = [0, 0, 1, 1, 0, 0, 0, 0];
    VOLTAGE = [2, 1, -3, -1, 0, 0, 0, 0];
    RESISTANCE = [2, 1, -3, -2, 0, 0, 0, 0];
}

/// Physical-type names, most common name first
static NAMES: &[(Dimension, &[&str])] = &[
    (Dimension::DIMENSIONLESS, &["dimensionless"]),
    (Dimension::LENGTH, &["length"]),
    (Dimension::MASS, &["mass"]),
    (Dimension::TIME, &["time"]),
    (Dimension::CURRENT, &["electrical current"]),
    (Dimension::TEMPERATURE, &["temperature"]),
    (Dimension::AMOUNT, &["amount of substance"]),
    (Dimension::LUMINOUS_INTENSITY, &["luminous intensity"]),
    (Dimension::ANGLE, &["angle"]),
    (Dimension::SOLID_ANGLE, &["solid angle"]),
    (Dimension::AREA, &["area"]),
    (Dimension::VOLUME, &["volume"]),
    (Dimension::SPEED, &["speed", "velocity"]),
    (Dimension::ACCELERATION, &["acceleration"]),
    (Dimension::FREQUENCY, &["frequency"]),
    (Dimension::ANGULAR_SPEED, &["angular speed", "angular velocity", "angular frequency"]),
    (Dimension::FORCE, &["force"]),
    (Dimension::ENERGY, &["energy", "torque", "work"]),
    (Dimension::POWER, &["power", "radiant flux"]),
    (Dimension::PRESSURE, &["pressure", "energy density", "stress"]),
    (Dimension::MOMENTUM, &["momentum", "impulse"]),
    (Dimension::ANGULAR_MOMENTUM, &["angular momentum"]),
    (Dimension::MASS_DENSITY, &["mass density"]),
    (Dimension::CHARGE, &["electrical charge"]),
    (Dimension::VOLTAGE, &["electrical potential", "voltage"]),
    (Dimension::RESISTANCE, &["electrical resistance"]),
];

impl Dimension {
    pub fn new(exponents: [i32; NUM_BASE]) -> Self {
        Dimension { exponents }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        let mut result = [0i32; NUM_BASE];
        for (i, r) in result.iter_mut().enumerate() {
            *r = self.exponents[i] + other.exponents[i];
        }
        Dimension { exponents: result }
    }

    /// Multiply dimensions, `None` if an exponent overflows
    pub fn checked_multiply(&self, other: &Dimension) -> Option<Dimension> {
        let mut result = [0i32; NUM_BASE];
        for (i, r) in result.iter_mut().enumerate() {
            *r = self.exponents[i].checked_add(other.exponents[i])?;
        }
        Some(Dimension { exponents: result })
    }

    /// Raise to integer power, `None` if an exponent overflows
    pub fn checked_power(&self, exp: i32) -> Option<Dimension> {
        let mut result = self.exponents;
        for e in result.iter_mut() {
            *e = e.checked_mul(exp)?;
        }
        Some(Dimension { exponents: result })
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.multiply(&other.power(-1))
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Dimension {
        let mut result = self.exponents;
        for e in result.iter_mut() {
            *e *= exp;
        }
        Dimension { exponents: result }
    }

    /// Catalog names of this physical type, in catalog order. Empty when
    /// the dimension has no name.
    pub fn names(&self) -> &'static [&'static str] {
        NAMES
            .iter()
            .find(|(d, _)| d == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    /// Exponent formula such as `L T^-1`; `1` when dimensionless
    pub fn formula(&self) -> String {
        let parts: Vec<String> = self
            .exponents
            .iter()
            .zip(BASE_SYMBOLS)
            .filter(|(exp, _)| **exp != 0)
            .map(|(&exp, sym)| if exp == 1 { sym.to_string() } else { format!("{}^{}", sym, exp) })
            .collect();
        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Look up a physical type by any of its names, case-insensitively
pub fn dimension(name: &str) -> Result<Dimension, UnxtError> {
    let wanted = name.trim().to_lowercase();
    NAMES
        .iter()
        .find(|(_, names)| names.iter().any(|n| *n == wanted))
        .map(|(d, _)| *d)
        .ok_or_else(|| UnxtError::UnknownDimension(name.to_string()))
}

impl fmt::Display for Dimension {
    /// First catalog name, or the exponent formula for unnamed types
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.names().first() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.formula()),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}
