//! Multiplicative unit prefixes (kilo, milli, kibi, ...)

use mensura_core::approx_eq;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A multiplicative prefix: `factor = base^exponent`
///
/// Value type; the factor is recomputed on read instead of being cached,
/// so a `Prefix` can never go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefix {
    /// The prefix symbol (e.g. "k", "µ", "Ki")
    pub symbol: String,
    /// The prefix name (e.g. "kilo", "micro", "kibi")
    pub name: String,
    /// Radix of the prefix (10 for SI prefixes, 2 for binary ones)
    pub base: f64,
    /// Exponent over the radix (kilo = 10^3, kibi = 2^10)
    pub exponent: f64,
}

impl Prefix {
    pub fn new(symbol: &str, name: &str, base: f64, exponent: f64) -> Self {
        Prefix {
            symbol: symbol.to_string(),
            name: name.to_string(),
            base,
            exponent,
        }
    }

    /// Decimal (radix-10) prefix
    pub fn decimal(symbol: &str, name: &str, exponent: f64) -> Self {
        Self::new(symbol, name, 10.0, exponent)
    }

    /// Binary (radix-2) prefix
    pub fn binary(symbol: &str, name: &str, exponent: f64) -> Self {
        Self::new(symbol, name, 2.0, exponent)
    }

    /// The multiplicative factor, `base^exponent`
    pub fn factor(&self) -> f64 {
        self.base.powf(self.exponent)
    }
}

/// Prefixes compare by (exponent, base); symbols and names are aliases
impl PartialEq for Prefix {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.exponent, other.exponent) && approx_eq(self.base, other.base)
    }
}

impl PartialOrd for Prefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.exponent.partial_cmp(&other.exponent) {
            Some(Ordering::Equal) => self.base.partial_cmp(&other.base),
            ord => ord,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor() {
        let kilo = Prefix::decimal("k", "kilo", 3.0);
        assert_eq!(kilo.factor(), 1000.0);

        let kibi = Prefix::binary("Ki", "kibi", 10.0);
        assert_eq!(kibi.factor(), 1024.0);
    }

    #[test]
    fn test_ordering() {
        let kilo = Prefix::decimal("k", "kilo", 3.0);
        let milli = Prefix::decimal("m", "milli", -3.0);
        assert!(milli < kilo);
    }

    #[test]
    fn test_alias_equality() {
        // µ and u are the same prefix under (exponent, base) comparison
        let micro = Prefix::decimal("µ", "micro", -6.0);
        let micro_ascii = Prefix::decimal("u", "micro", -6.0);
        assert_eq!(micro, micro_ascii);
    }
}
