//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 9-element vector:
//! [length, mass, time, current, temperature, amount, luminosity, angle, data]
//!
//! Exponents are f64 because units and quantities can be raised to
//! non-integer powers (`m^0.5` is a legal intermediate).

use mensura_core::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension indices for the 9 base axes
pub const LENGTH: usize = 0;
pub const MASS: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOSITY: usize = 6;
pub const ANGLE: usize = 7;
pub const DATA: usize = 8;

/// Represents the dimensions of a physical quantity as exponents of the
/// 9 base axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminosity, angle, data]
    pub exponents: [f64; 9],
}

impl Dimension {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [0.0; 9] };

    /// Length dimension [L]
    pub const LENGTH: Dimension =
        Dimension { exponents: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Mass dimension [M]
    pub const MASS: Dimension =
        Dimension { exponents: [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Time dimension [T]
    pub const TIME: Dimension =
        Dimension { exponents: [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Electric current dimension [I]
    pub const CURRENT: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Temperature dimension [Θ]
    pub const TEMPERATURE: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0] };

    /// Amount of substance dimension [N]
    pub const AMOUNT: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0] };

    /// Luminous intensity dimension [J]
    pub const LUMINOSITY: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0] };

    /// Plane angle dimension
    pub const ANGLE: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0] };

    /// Information dimension (bits, bytes)
    pub const DATA: Dimension =
        Dimension { exponents: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0] };

    /// Velocity [L T^-1]
    pub const VELOCITY: Dimension =
        Dimension { exponents: [1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Force [M L T^-2]
    pub const FORCE: Dimension =
        Dimension { exponents: [1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Energy [M L^2 T^-2]
    pub const ENERGY: Dimension =
        Dimension { exponents: [2.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Power [M L^2 T^-3]
    pub const POWER: Dimension =
        Dimension { exponents: [2.0, 1.0, -3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: Dimension =
        Dimension { exponents: [-1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Area [L^2]
    pub const AREA: Dimension =
        Dimension { exponents: [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Volume [L^3]
    pub const VOLUME: Dimension =
        Dimension { exponents: [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Frequency [T^-1]
    pub const FREQUENCY: Dimension =
        Dimension { exponents: [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Electric charge [I T]
    pub const CHARGE: Dimension =
        Dimension { exponents: [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension =
        Dimension { exponents: [2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension =
        Dimension { exponents: [2.0, 1.0, -3.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0] };

    /// Create a new dimension from exponents
    pub fn new(exponents: [f64; 9]) -> Self {
        Dimension { exponents }
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e.abs() <= EPS)
    }

    /// Elementwise equality after rounding (float exponents drift when
    /// non-integer powers are involved)
    pub fn is_same(&self, other: &Dimension) -> bool {
        self.exponents
            .iter()
            .zip(other.exponents.iter())
            .all(|(&a, &b)| (a - b).abs() <= EPS)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        let mut result = [0.0; 9];
        for i in 0..9 {
            result[i] = self.exponents[i] + other.exponents[i];
        }
        Dimension { exponents: result }
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        let mut result = [0.0; 9];
        for i in 0..9 {
            result[i] = self.exponents[i] - other.exponents[i];
        }
        Dimension { exponents: result }
    }

    /// Raise to a power (multiply exponents; the power need not be integer)
    pub fn power(&self, exp: f64) -> Dimension {
        let mut result = [0.0; 9];
        for i in 0..9 {
            result[i] = self.exponents[i] * exp;
        }
        Dimension { exponents: result }
    }

    /// Invert dimensions (negate exponents)
    pub fn invert(&self) -> Dimension {
        self.power(-1.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ["L", "M", "T", "I", "Θ", "N", "J", "A", "D"];
        let mut parts = Vec::new();

        for (i, &exp) in self.exponents.iter().enumerate() {
            if exp.abs() > EPS {
                if (exp - 1.0).abs() <= EPS {
                    parts.push(names[i].to_string());
                } else {
                    parts.push(format!("{}^{}", names[i], exp));
                }
            }
        }

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}
