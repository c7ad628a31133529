//! Quantity type - a value with an associated unit

use crate::Unit;
use mensura_core::{is_integral, round_sig, MensuraError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical quantity: a numeric value with an associated unit
///
/// Not itself a unit; it represents a measurement. Operations never mutate
/// their operands and every mismatch is a typed error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// The dimensionless quantity 1
    pub fn one() -> Self {
        Quantity::new(1.0, Unit::one())
    }

    /// A bare number as a dimensionless quantity
    pub fn dimensionless(value: f64) -> Self {
        Quantity::new(value, Unit::one())
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Add two quantities of the same dimension.
    ///
    /// When the units are not fully equal, the other operand is read as a
    /// difference: it is stripped to its delta form and converted into this
    /// unit's delta form before the values are summed. That single rule
    /// makes `10°C + 5K` and `10°C + 5°C` both come out as `15°C` without
    /// double-applying the Celsius offset.
    pub fn add(&self, other: &Quantity) -> Result<Quantity, MensuraError> {
        if !self.unit.is_same_dimension(&other.unit) {
            return Err(MensuraError::UnitMismatch(format!(
                "cannot add '{}' to '{}'",
                other.unit.symbol(),
                self.unit.symbol()
            )));
        }
        if self.unit.is_equal(&other.unit) {
            return Ok(Quantity::new(self.value + other.value, self.unit.clone()));
        }
        let delta = Quantity::new(other.value, other.unit.delta());
        let converted = delta.convert(&self.unit.delta())?;
        Ok(Quantity::new(self.value + converted.value, self.unit.clone()))
    }

    /// Convert into another unit of the same dimension
    pub fn convert(&self, new_unit: &Unit) -> Result<Quantity, MensuraError> {
        if !self.unit.is_same_dimension(new_unit) {
            return Err(MensuraError::UnitMismatch(format!(
                "cannot convert '{}' to '{}'",
                self.unit.symbol(),
                new_unit.symbol()
            )));
        }
        let reference = self.value * self.unit.coeff() + self.unit.offset();
        let value = (reference - new_unit.offset()) / new_unit.coeff();
        Ok(Quantity::new(round_sig(value, 12), new_unit.clone()))
    }

    pub fn multiply(&self, other: &Quantity) -> Result<Quantity, MensuraError> {
        Ok(Quantity::new(
            self.value * other.value,
            self.unit.multiply(&other.unit)?,
        ))
    }

    pub fn divide(&self, other: &Quantity) -> Result<Quantity, MensuraError> {
        if other.value == 0.0 {
            return Err(MensuraError::value("division by zero"));
        }
        Ok(Quantity::new(
            self.value / other.value,
            self.unit.divide(&other.unit)?,
        ))
    }

    /// Raise to a power; fails where the result is mathematically undefined
    pub fn power(&self, exp: f64) -> Result<Quantity, MensuraError> {
        if self.value == 0.0 && exp <= 0.0 {
            return Err(MensuraError::Value(format!(
                "undefined for value={} and power={}",
                self.value, exp
            )));
        }
        if self.value < 0.0 && !is_integral(exp) {
            return Err(MensuraError::Value(format!(
                "undefined for value={} and power={}",
                self.value, exp
            )));
        }
        Ok(Quantity::new(self.value.powf(exp), self.unit.power(exp)))
    }

    /// Negate the value, keep the unit
    pub fn oppose(&self) -> Quantity {
        Quantity::new(-self.value, self.unit.clone())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.unit.symbol();
        if symbol.is_empty() {
            write!(f, "{}", round_sig(self.value, 12))
        } else {
            write!(f, "{} {}", round_sig(self.value, 12), symbol)
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        if !self.unit.is_same_dimension(&other.unit) {
            return false;
        }
        let a = self.value * self.unit.coeff() + self.unit.offset();
        let b = other.value * other.unit.coeff() + other.unit.offset();
        mensura_core::approx_eq(a, b)
    }
}
