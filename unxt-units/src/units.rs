//! Unit definitions - SI and astronomy units organized by physical type

use crate::{Dimension, Unit};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// Global unit catalog
pub static UNITS: LazyLock<UnitCatalog> = LazyLock::new(UnitCatalog::new);

const AU: f64 = 149_597_870_700.0;
const PC: f64 = 3.085_677_581_491_367_3e16;
const YR: f64 = 31_557_600.0;
const DEG: f64 = PI / 180.0;

/// Registry of all known units
pub struct UnitCatalog {
    units: HashMap<String, Unit>,
    aliases: HashMap<String, String>,
}

impl UnitCatalog {
    fn new() -> Self {
        let mut catalog = UnitCatalog {
            units: HashMap::new(),
            aliases: HashMap::new(),
        };
        catalog.register_all_units();
        tracing::debug!(units = catalog.units.len(), aliases = catalog.aliases.len(), "unit catalog initialised");
        catalog
    }

    /// Get a unit by symbol or alias
    pub fn get(&self, symbol: &str) -> Option<&Unit> {
        if let Some(unit) = self.units.get(symbol) {
            return Some(unit);
        }
        self.aliases.get(symbol).and_then(|canonical| self.units.get(canonical))
    }

    /// Get all units of a physical type
    pub fn by_dimension(&self, dimension: Dimension) -> Vec<&Unit> {
        self.units.values().filter(|u| u.dimension() == dimension).collect()
    }

    /// Get all unit symbols
    pub fn symbols(&self) -> Vec<&str> {
        self.units.keys().map(|s| s.as_str()).collect()
    }

    fn register(&mut self, symbol: &str, name: &str, dimension: Dimension, scale: f64) {
        self.units
            .insert(symbol.to_string(), Unit::new(symbol, name, dimension, scale));
    }

    fn alias(&mut self, alias: &str, symbol: &str) {
        self.aliases.insert(alias.to_string(), symbol.to_string());
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_mass_units();
        self.register_time_units();
        self.register_base_units();
        self.register_angle_units();
        self.register_derived_units();
    }

    fn register_length_units(&mut self) {
        use Dimension as D;
        self.register("m", "meter", D::LENGTH, 1.0);
        self.register("km", "kilometer", D::LENGTH, 1e3);
        self.register("cm", "centimeter", D::LENGTH, 1e-2);
        self.register("mm", "millimeter", D::LENGTH, 1e-3);
        self.register("um", "micrometer", D::LENGTH, 1e-6);
        self.register("nm", "nanometer", D::LENGTH, 1e-9);
        self.register("Angstrom", "angstrom", D::LENGTH, 1e-10);

        // Astronomy
        self.register("AU", "astronomical unit", D::LENGTH, AU);
        self.register("pc", "parsec", D::LENGTH, PC);
        self.register("kpc", "kiloparsec", D::LENGTH, PC * 1e3);
        self.register("Mpc", "megaparsec", D::LENGTH, PC * 1e6);
        self.register("Gpc", "gigaparsec", D::LENGTH, PC * 1e9);
        self.register("lyr", "light year", D::LENGTH, 9.460_730_472_580_8e15);
        self.register("Rsun", "solar radius", D::LENGTH, 6.957e8);
        self.register("Rearth", "earth radius", D::LENGTH, 6_378_100.0);

        self.alias("meter", "m");
        self.alias("meters", "m");
        self.alias("metre", "m");
        self.alias("kilometer", "km");
        self.alias("kilometers", "km");
        self.alias("centimeter", "cm");
        self.alias("millimeter", "mm");
        self.alias("micrometer", "um");
        self.alias("μm", "um");
        self.alias("micron", "um");
        self.alias("nanometer", "nm");
        self.alias("angstrom", "Angstrom");
        self.alias("Å", "Angstrom");
        self.alias("au", "AU");
        self.alias("parsec", "pc");
        self.alias("kiloparsec", "kpc");
        self.alias("megaparsec", "Mpc");
        self.alias("ly", "lyr");
        self.alias("lightyear", "lyr");
        self.alias("R_sun", "Rsun");
        self.alias("R_earth", "Rearth");
    }

    fn register_mass_units(&mut self) {
        use Dimension as D;
        self.register("kg", "kilogram", D::MASS, 1.0);
        self.register("g", "gram", D::MASS, 1e-3);
        self.register("Msun", "solar mass", D::MASS, 1.988_409_870_698_051e30);
        self.register("Mearth", "earth mass", D::MASS, 5.972_167_867_791_379e24);
        self.register("Mjup", "jupiter mass", D::MASS, 1.898_124_597_336_050_5e27);

        self.alias("kilogram", "kg");
        self.alias("gram", "g");
        self.alias("solMass", "Msun");
        self.alias("M_sun", "Msun");
        self.alias("M_earth", "Mearth");
        self.alias("M_jup", "Mjup");
    }

    fn register_time_units(&mut self) {
        use Dimension as D;
        self.register("s", "second", D::TIME, 1.0);
        self.register("ms", "millisecond", D::TIME, 1e-3);
        self.register("us", "microsecond", D::TIME, 1e-6);
        self.register("ns", "nanosecond", D::TIME, 1e-9);
        self.register("min", "minute", D::TIME, 60.0);
        self.register("h", "hour", D::TIME, 3600.0);
        self.register("d", "day", D::TIME, 86_400.0);
        self.register("yr", "year", D::TIME, YR);
        self.register("kyr", "kiloyear", D::TIME, YR * 1e3);
        self.register("Myr", "megayear", D::TIME, YR * 1e6);
        self.register("Gyr", "gigayear", D::TIME, YR * 1e9);

        self.alias("second", "s");
        self.alias("seconds", "s");
        self.alias("sec", "s");
        self.alias("μs", "us");
        self.alias("minute", "min");
        self.alias("hour", "h");
        self.alias("hr", "h");
        self.alias("day", "d");
        self.alias("year", "yr");
        self.alias("a", "yr");
    }

    fn register_base_units(&mut self) {
        use Dimension as D;
        self.register("A", "ampere", D::CURRENT, 1.0);
        self.register("K", "kelvin", D::TEMPERATURE, 1.0);
        self.register("mol", "mole", D::AMOUNT, 1.0);
        self.register("cd", "candela", D::LUMINOUS_INTENSITY, 1.0);
        self.units.insert("dimensionless".to_string(), Unit::dimensionless());

        self.alias("ampere", "A");
        self.alias("Kelvin", "K");
        self.alias("kelvin", "K");
        self.alias("mole", "mol");
        self.alias("candela", "cd");
        self.alias("one", "dimensionless");
    }

    fn register_angle_units(&mut self) {
        use Dimension as D;
        self.register("rad", "radian", D::ANGLE, 1.0);
        self.register("deg", "degree", D::ANGLE, DEG);
        self.register("arcmin", "arcminute", D::ANGLE, DEG / 60.0);
        self.register("arcsec", "arcsecond", D::ANGLE, DEG / 3600.0);
        self.register("mas", "milliarcsecond", D::ANGLE, DEG / 3.6e6);
        self.register("uas", "microarcsecond", D::ANGLE, DEG / 3.6e9);
        self.register("sr", "steradian", D::SOLID_ANGLE, 1.0);
        self.register("deg2", "square degree", D::SOLID_ANGLE, DEG * DEG);

        self.alias("radian", "rad");
        self.alias("radians", "rad");
        self.alias("degree", "deg");
        self.alias("degrees", "deg");
        self.alias("°", "deg");
        self.alias("steradian", "sr");
    }

    fn register_derived_units(&mut self) {
        use Dimension as D;
        self.register("Hz", "hertz", D::FREQUENCY, 1.0);
        self.register("kHz", "kilohertz", D::FREQUENCY, 1e3);
        self.register("MHz", "megahertz", D::FREQUENCY, 1e6);
        self.register("GHz", "gigahertz", D::FREQUENCY, 1e9);
        self.register("N", "newton", D::FORCE, 1.0);
        self.register("dyn", "dyne", D::FORCE, 1e-5);
        self.register("J", "joule", D::ENERGY, 1.0);
        self.register("erg", "erg", D::ENERGY, 1e-7);
        self.register("eV", "electronvolt", D::ENERGY, 1.602_176_634e-19);
        self.register("keV", "kiloelectronvolt", D::ENERGY, 1.602_176_634e-16);
        self.register("W", "watt", D::POWER, 1.0);
        self.register("Lsun", "solar luminosity", D::POWER, 3.828e26);
        self.register("Pa", "pascal", D::PRESSURE, 1.0);
        self.register("bar", "bar", D::PRESSURE, 1e5);
        self.register("atm", "atmosphere", D::PRESSURE, 101_325.0);
        self.register("C", "coulomb", D::CHARGE, 1.0);
        self.register("V", "volt", D::VOLTAGE, 1.0);
        self.register("Ohm", "ohm", D::RESISTANCE, 1.0);

        self.alias("hertz", "Hz");
        self.alias("newton", "N");
        self.alias("dyne", "dyn");
        self.alias("joule", "J");
        self.alias("electronvolt", "eV");
        self.alias("watt", "W");
        self.alias("L_sun", "Lsun");
        self.alias("pascal", "Pa");
        self.alias("coulomb", "C");
        self.alias("volt", "V");
        self.alias("ohm", "Ohm");
        self.alias("Ω", "Ohm");
    }
}
