//! Unit and prefix symbol tables
//!
//! The registry is an owned object passed by reference into parsing and
//! rendering, so tests can run isolated registries side by side. It has an
//! explicit two-phase lifecycle: bulk registration at startup (see
//! `catalog::register_defaults`) and `unregister_units` /
//! `unregister_prefixes` at shutdown, both idempotent.

use crate::normalize;
use crate::{Prefix, PrefixedUnit, SimpleUnit, Unit};
use mensura_core::{approx_eq, MensuraError};
use std::collections::HashMap;

/// Symbol tables for units and prefixes
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: HashMap<String, SimpleUnit>,
    prefixes: HashMap<String, Prefix>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under each of its aliases.
    ///
    /// A taken alias is skipped with an error log. An alias that would
    /// already parse to something else - alone, or combined with any
    /// registered prefix of the unit's radix - is registered anyway but
    /// logged as a shadowing warning.
    pub fn register_unit(&mut self, unit: SimpleUnit) -> Result<(), MensuraError> {
        if unit.coeff <= 0.0 {
            return Err(MensuraError::Unit(format!(
                "unit '{}' must have a positive coefficient",
                unit.symbol()
            )));
        }
        if unit.symbols.is_empty() {
            return Err(MensuraError::Unit(format!(
                "unit '{}' has no symbols",
                unit.name
            )));
        }
        for alias in unit.symbols.clone() {
            if self.units.contains_key(&alias) {
                tracing::error!(symbol = %alias, "unit symbol already registered, skipping");
                continue;
            }
            self.warn_unit_shadowing(&alias, &unit);
            self.units.insert(alias, unit.clone());
        }
        Ok(())
    }

    /// Register a prefix; symmetric to `register_unit`
    pub fn register_prefix(&mut self, prefix: Prefix) -> Result<(), MensuraError> {
        if prefix.base <= 0.0 {
            return Err(MensuraError::Prefix(format!(
                "prefix '{}' must have a positive radix",
                prefix.symbol
            )));
        }
        if self.prefixes.contains_key(&prefix.symbol) {
            tracing::error!(symbol = %prefix.symbol, "prefix symbol already registered, skipping");
            return Ok(());
        }
        self.warn_prefix_shadowing(&prefix);
        self.prefixes.insert(prefix.symbol.clone(), prefix);
        Ok(())
    }

    fn warn_unit_shadowing(&self, alias: &str, unit: &SimpleUnit) {
        if let Some(existing) = self.try_parse(alias) {
            tracing::warn!(
                symbol = %alias,
                shadows = %existing.name(),
                "unit symbol already parses to another unit"
            );
        }
        if !unit.prefixable {
            return;
        }
        for prefix in self.prefixes.values() {
            if !approx_eq(prefix.base, unit.base) {
                continue;
            }
            let combined = format!("{}{}", prefix.symbol, alias);
            if let Some(existing) = self.try_parse(&combined) {
                tracing::warn!(
                    symbol = %combined,
                    shadows = %existing.name(),
                    "prefixed form of new unit already parses to another unit"
                );
            }
        }
    }

    fn warn_prefix_shadowing(&self, prefix: &Prefix) {
        for unit in self.units.values() {
            if !unit.prefixable || !approx_eq(prefix.base, unit.base) {
                continue;
            }
            for alias in &unit.symbols {
                let combined = format!("{}{}", prefix.symbol, alias);
                if let Some(existing) = self.try_parse(&combined) {
                    tracing::warn!(
                        symbol = %combined,
                        shadows = %existing.name(),
                        "prefixed form introduced by new prefix already parses to another unit"
                    );
                }
            }
        }
    }

    /// Clear all units (idempotent)
    pub fn unregister_units(&mut self) {
        self.units.clear();
    }

    /// Clear all prefixes (idempotent)
    pub fn unregister_prefixes(&mut self) {
        self.prefixes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.prefixes.is_empty()
    }

    /// Look up a unit by exact symbol
    pub fn unit(&self, symbol: &str) -> Option<&SimpleUnit> {
        self.units.get(symbol)
    }

    /// Look up a prefix by exact symbol
    pub fn prefix(&self, symbol: &str) -> Option<&Prefix> {
        self.prefixes.get(symbol)
    }

    /// All prefixes of one radix, sorted by descending exponent
    pub fn prefixes_for_base(&self, base: f64) -> Vec<Prefix> {
        let mut prefixes: Vec<Prefix> = self
            .prefixes
            .values()
            .filter(|p| approx_eq(p.base, base))
            .cloned()
            .collect();
        // ties between alias spellings (µ and u) keep the canonical
        // symbol first
        prefixes.sort_by(|a, b| {
            b.exponent
                .partial_cmp(&a.exponent)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.symbol.cmp(&a.symbol))
        });
        prefixes
    }

    /// Resolve a symbol to a unit, or None.
    ///
    /// Candidate unit-symbol lengths are scanned longest first: a split
    /// matches when the trailing substring is a known unit and either it
    /// consumes the whole input or the leading remainder is a known prefix
    /// of the unit's radix on a prefixable unit. Longest-match keeps `mol`
    /// from decomposing into `m` + `ol`-style spurious prefixed forms.
    pub fn try_parse(&self, text: &str) -> Option<Unit> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let chars: Vec<char> = text.chars().collect();
        for split in 0..chars.len() {
            let unit_symbol: String = chars[split..].iter().collect();
            let Some(unit) = self.units.get(&unit_symbol) else {
                continue;
            };
            if split == 0 {
                return Some(Unit::Simple(unit.clone()));
            }
            let prefix_symbol: String = chars[..split].iter().collect();
            let Some(prefix) = self.prefixes.get(&prefix_symbol) else {
                continue;
            };
            if unit.prefixable && approx_eq(prefix.base, unit.base) {
                return Some(Unit::Prefixed(PrefixedUnit::new(
                    prefix.clone(),
                    unit.clone(),
                )));
            }
        }
        None
    }

    /// Resolve a symbol to a unit, or fail with UnitNotFound
    pub fn parse_unit(&self, text: &str) -> Result<Unit, MensuraError> {
        self.try_parse(text)
            .ok_or_else(|| MensuraError::UnitNotFound(text.trim().to_string()))
    }

    /// Render a unit's display symbol; compounds go through the prefix
    /// normalizer so no hidden scale factor remains
    pub fn render_unit(&self, unit: &Unit) -> Result<String, MensuraError> {
        match unit {
            Unit::Simple(u) => Ok(u.symbol().to_string()),
            Unit::Prefixed(p) => Ok(p.symbol()),
            Unit::Compound(c) => normalize::normalized_symbol(c, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimension;
    use mensura_core::approx_eq;

    fn registry() -> UnitRegistry {
        let mut reg = UnitRegistry::new();
        reg.register_prefix(Prefix::decimal("k", "kilo", 3.0)).unwrap();
        reg.register_prefix(Prefix::decimal("m", "milli", -3.0)).unwrap();
        reg.register_unit(SimpleUnit::new(&["m"], "meter", Dimension::LENGTH, 1.0))
            .unwrap();
        reg.register_unit(SimpleUnit::new(&["mol"], "mole", Dimension::AMOUNT, 1.0))
            .unwrap();
        reg.register_unit(SimpleUnit::new(&["s"], "second", Dimension::TIME, 1.0))
            .unwrap();
        reg
    }

    #[test]
    fn test_parse_simple() {
        let reg = registry();
        let m = reg.parse_unit("m").unwrap();
        assert_eq!(m.symbol(), "m");
        assert!(matches!(m, Unit::Simple(_)));
    }

    #[test]
    fn test_parse_prefixed() {
        let reg = registry();
        let km = reg.parse_unit("km").unwrap();
        assert_eq!(km.symbol(), "km");
        assert!(matches!(km, Unit::Prefixed(_)));
        assert!(approx_eq(km.coeff(), 1000.0));
    }

    #[test]
    fn test_longest_match_wins() {
        // "mol" is a unit even though "m" + "ol" would fail and
        // "mol" could never be milli+ol; more to the point, "mm"
        // resolves prefix+unit while "mol" stays whole.
        let reg = registry();
        let mol = reg.parse_unit("mol").unwrap();
        assert_eq!(mol.symbol(), "mol");
        assert!(matches!(mol, Unit::Simple(_)));
    }

    #[test]
    fn test_parse_trims() {
        let reg = registry();
        assert!(reg.parse_unit("  km ").is_ok());
    }

    #[test]
    fn test_parse_unknown() {
        let reg = registry();
        let err = reg.parse_unit("xyz").unwrap_err();
        assert!(matches!(err, MensuraError::UnitNotFound(_)));
    }

    #[test]
    fn test_unprefixable_unit_rejects_prefix() {
        let mut reg = registry();
        reg.register_unit(
            SimpleUnit::new(&["°C"], "degree Celsius", Dimension::TEMPERATURE, 1.0)
                .with_offset(273.15)
                .not_prefixable(),
        )
        .unwrap();
        assert!(reg.parse_unit("°C").is_ok());
        assert!(reg.try_parse("k°C").is_none());
    }

    #[test]
    fn test_radix_must_match() {
        let mut reg = registry();
        reg.register_unit(SimpleUnit::new(&["B"], "byte", Dimension::DATA, 1.0).with_base(2.0))
            .unwrap();
        reg.register_prefix(Prefix::binary("Ki", "kibi", 10.0)).unwrap();
        assert!(reg.try_parse("KiB").is_some());
        // decimal k does not attach to the binary byte
        assert!(reg.try_parse("kB").is_none());
        // binary Ki does not attach to the decimal meter
        assert!(reg.try_parse("Kim").is_none());
    }

    #[test]
    fn test_duplicate_alias_skipped() {
        let mut reg = registry();
        reg.register_unit(SimpleUnit::new(&["m"], "minim", Dimension::VOLUME, 1.0))
            .unwrap();
        // the original meter survives
        let m = reg.parse_unit("m").unwrap();
        assert_eq!(m.name(), "meter");
    }

    #[test]
    fn test_invalid_coefficient_rejected() {
        let mut reg = UnitRegistry::new();
        let err = reg
            .register_unit(SimpleUnit::new(&["x"], "x", Dimension::LENGTH, 0.0))
            .unwrap_err();
        assert!(matches!(err, MensuraError::Unit(_)));
    }

    #[test]
    fn test_lifecycle_idempotent() {
        let mut reg = registry();
        reg.unregister_units();
        reg.unregister_prefixes();
        assert!(reg.is_empty());
        reg.unregister_units();
        reg.unregister_prefixes();
        assert!(reg.is_empty());
        // a fresh cycle behaves like a fresh process
        reg.register_prefix(Prefix::decimal("k", "kilo", 3.0)).unwrap();
        reg.register_unit(SimpleUnit::new(&["m"], "meter", Dimension::LENGTH, 1.0))
            .unwrap();
        assert!(reg.parse_unit("km").is_ok());
    }

    #[test]
    fn test_prefixes_for_base_sorted() {
        let reg = registry();
        let prefixes = reg.prefixes_for_base(10.0);
        assert_eq!(prefixes.len(), 2);
        assert!(prefixes[0].exponent > prefixes[1].exponent);
    }
}
