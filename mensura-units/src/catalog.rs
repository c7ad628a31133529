//! Default unit and prefix catalog
//!
//! SI base and derived units, a handful of accepted non-SI units, a few
//! imperial ones, and the full decimal and binary prefix ranges. Values
//! are expressed against the coherent SI reference of their dimension
//! (kilogram for mass, which is why the gram's coefficient is 0.001 and
//! `kg` comes out with a coefficient of exactly 1).

use crate::{Dimension, Prefix, SimpleUnit, UnitRegistry};
use mensura_core::MensuraError;

const CELSIUS_OFFSET: f64 = 273.15;
const FAHRENHEIT_COEFF: f64 = 5.0 / 9.0;
const FAHRENHEIT_OFFSET: f64 = 459.67 * 5.0 / 9.0;

/// Register the default prefixes and units into `registry`.
///
/// Safe to call on a registry that was cleared and is being refilled;
/// duplicate symbols are skipped with an error log, never a failure.
pub fn register_defaults(registry: &mut UnitRegistry) -> Result<(), MensuraError> {
    register_prefixes(registry)?;
    register_units(registry)?;
    Ok(())
}

fn register_prefixes(registry: &mut UnitRegistry) -> Result<(), MensuraError> {
    let decimal = [
        ("Q", "quetta", 30.0),
        ("R", "ronna", 27.0),
        ("Y", "yotta", 24.0),
        ("Z", "zetta", 21.0),
        ("E", "exa", 18.0),
        ("P", "peta", 15.0),
        ("T", "tera", 12.0),
        ("G", "giga", 9.0),
        ("M", "mega", 6.0),
        ("k", "kilo", 3.0),
        ("h", "hecto", 2.0),
        ("da", "deca", 1.0),
        ("d", "deci", -1.0),
        ("c", "centi", -2.0),
        ("m", "milli", -3.0),
        ("µ", "micro", -6.0),
        // ASCII spelling of micro
        ("u", "micro", -6.0),
        ("n", "nano", -9.0),
        ("p", "pico", -12.0),
        ("f", "femto", -15.0),
        ("a", "atto", -18.0),
        ("z", "zepto", -21.0),
        ("y", "yocto", -24.0),
        ("r", "ronto", -27.0),
        ("q", "quecto", -30.0),
    ];
    for (symbol, name, exponent) in decimal {
        registry.register_prefix(Prefix::decimal(symbol, name, exponent))?;
    }

    let binary = [
        ("Ki", "kibi", 10.0),
        ("Mi", "mebi", 20.0),
        ("Gi", "gibi", 30.0),
        ("Ti", "tebi", 40.0),
        ("Pi", "pebi", 50.0),
        ("Ei", "exbi", 60.0),
        ("Zi", "zebi", 70.0),
        ("Yi", "yobi", 80.0),
    ];
    for (symbol, name, exponent) in binary {
        registry.register_prefix(Prefix::binary(symbol, name, exponent))?;
    }
    Ok(())
}

fn register_units(registry: &mut UnitRegistry) -> Result<(), MensuraError> {
    let units = vec![
        // SI base
        SimpleUnit::new(&["m"], "meter", Dimension::LENGTH, 1.0),
        SimpleUnit::new(&["g"], "gram", Dimension::MASS, 0.001),
        SimpleUnit::new(&["s"], "second", Dimension::TIME, 1.0),
        SimpleUnit::new(&["A"], "ampere", Dimension::CURRENT, 1.0),
        SimpleUnit::new(&["K"], "kelvin", Dimension::TEMPERATURE, 1.0),
        SimpleUnit::new(&["mol"], "mole", Dimension::AMOUNT, 1.0),
        SimpleUnit::new(&["cd"], "candela", Dimension::LUMINOSITY, 1.0),
        SimpleUnit::new(&["rad"], "radian", Dimension::ANGLE, 1.0),
        // SI derived
        SimpleUnit::new(&["Hz"], "hertz", Dimension::FREQUENCY, 1.0),
        SimpleUnit::new(&["N"], "newton", Dimension::FORCE, 1.0),
        SimpleUnit::new(&["Pa"], "pascal", Dimension::PRESSURE, 1.0),
        SimpleUnit::new(&["J"], "joule", Dimension::ENERGY, 1.0),
        SimpleUnit::new(&["W"], "watt", Dimension::POWER, 1.0),
        SimpleUnit::new(&["C"], "coulomb", Dimension::CHARGE, 1.0),
        SimpleUnit::new(&["V"], "volt", Dimension::VOLTAGE, 1.0),
        SimpleUnit::new(&["Ω", "ohm"], "ohm", Dimension::RESISTANCE, 1.0),
        SimpleUnit::new(&["lm"], "lumen", Dimension::LUMINOSITY, 1.0),
        SimpleUnit::new(
            &["lx"],
            "lux",
            Dimension::LUMINOSITY.divide(&Dimension::AREA),
            1.0,
        ),
        // affine temperatures
        SimpleUnit::new(&["°C", "degC"], "degree Celsius", Dimension::TEMPERATURE, 1.0)
            .with_offset(CELSIUS_OFFSET)
            .not_prefixable(),
        SimpleUnit::new(
            &["°F", "degF"],
            "degree Fahrenheit",
            Dimension::TEMPERATURE,
            FAHRENHEIT_COEFF,
        )
        .with_offset(FAHRENHEIT_OFFSET)
        .not_prefixable(),
        // accepted non-SI
        SimpleUnit::new(&["L", "l"], "liter", Dimension::VOLUME, 0.001),
        SimpleUnit::new(&["t"], "tonne", Dimension::MASS, 1000.0),
        SimpleUnit::new(&["bar"], "bar", Dimension::PRESSURE, 100_000.0),
        SimpleUnit::new(&["min"], "minute", Dimension::TIME, 60.0).not_prefixable(),
        SimpleUnit::new(&["h"], "hour", Dimension::TIME, 3600.0).not_prefixable(),
        SimpleUnit::new(&["d"], "day", Dimension::TIME, 86400.0).not_prefixable(),
        SimpleUnit::new(
            &["°", "deg"],
            "degree",
            Dimension::ANGLE,
            std::f64::consts::PI / 180.0,
        )
        .not_prefixable(),
        // imperial
        SimpleUnit::new(&["in"], "inch", Dimension::LENGTH, 0.0254).not_prefixable(),
        SimpleUnit::new(&["ft"], "foot", Dimension::LENGTH, 0.3048).not_prefixable(),
        SimpleUnit::new(&["mi"], "mile", Dimension::LENGTH, 1609.344).not_prefixable(),
        SimpleUnit::new(&["lb"], "pound", Dimension::MASS, 0.453_592_37).not_prefixable(),
        SimpleUnit::new(&["oz"], "ounce", Dimension::MASS, 0.028_349_523_125).not_prefixable(),
        // data, radix 2
        SimpleUnit::new(&["bit"], "bit", Dimension::DATA, 1.0).with_base(2.0),
        SimpleUnit::new(&["B"], "byte", Dimension::DATA, 8.0).with_base(2.0),
    ];
    for unit in units {
        registry.register_unit(unit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unit;
    use mensura_core::approx_eq;

    fn registry() -> UnitRegistry {
        let mut reg = UnitRegistry::new();
        register_defaults(&mut reg).unwrap();
        reg
    }

    #[test]
    fn test_prefixed_forms_parse() {
        let reg = registry();
        for symbol in ["mm", "km", "kg", "mg", "dL", "GHz", "µs", "us", "ns"] {
            assert!(reg.parse_unit(symbol).is_ok(), "'{}' failed to parse", symbol);
        }
    }

    #[test]
    fn test_kg_is_coherent() {
        let reg = registry();
        let kg = reg.parse_unit("kg").unwrap();
        assert!(approx_eq(kg.coeff(), 1.0));
    }

    #[test]
    fn test_longest_match_over_prefix_split() {
        let reg = registry();
        // mol, min and mi stay whole instead of parsing as milli-something
        assert_eq!(reg.parse_unit("mol").unwrap().name(), "mole");
        assert_eq!(reg.parse_unit("min").unwrap().name(), "minute");
        assert_eq!(reg.parse_unit("mi").unwrap().name(), "mile");
    }

    #[test]
    fn test_binary_units() {
        let reg = registry();
        let kib = reg.parse_unit("KiB").unwrap();
        assert!(approx_eq(kib.coeff(), 8.0 * 1024.0));
        // decimal prefixes do not attach to radix-2 units
        assert!(reg.try_parse("kB").is_none());
    }

    #[test]
    fn test_affine_units_unprefixable() {
        let reg = registry();
        assert!(reg.parse_unit("°C").is_ok());
        assert!(reg.parse_unit("degC").is_ok());
        assert!(reg.try_parse("m°C").is_none());
        let f = reg.parse_unit("°F").unwrap();
        assert!(approx_eq(f.coeff(), 5.0 / 9.0));
    }

    #[test]
    fn test_ohm_aliases() {
        let reg = registry();
        let a = reg.parse_unit("Ω").unwrap();
        let b = reg.parse_unit("ohm").unwrap();
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_micro_ascii_alias() {
        let reg = registry();
        let a = reg.parse_unit("µm").unwrap();
        let b = reg.parse_unit("um").unwrap();
        assert!(approx_eq(a.coeff(), b.coeff()));
    }

    #[test]
    fn test_refill_after_clear() {
        let mut reg = registry();
        reg.unregister_units();
        reg.unregister_prefixes();
        assert!(reg.is_empty());
        register_defaults(&mut reg).unwrap();
        assert!(reg.parse_unit("km").is_ok());
    }

    #[test]
    fn test_dimensionless_check() {
        let reg = registry();
        let rad = reg.parse_unit("rad").unwrap();
        // the angle axis keeps radians from being silently dimensionless
        assert!(!rad.is_dimensionless());
        let one = Unit::one();
        assert!(one.is_dimensionless());
    }
}
