//! Float helpers
//!
//! The calculator works in ordinary f64 and rounds explicitly instead of
//! carrying arbitrary precision. These helpers centralize the tolerances so
//! every comparison in the workspace agrees on what "equal" means.

/// Tolerance for value and coefficient comparisons
pub const EPS: f64 = 1e-9;

/// Tolerance for the prefix normalizer's leftover factor
pub const LEFTOVER_EPS: f64 = 1e-6;

/// Round to a fixed number of significant decimal digits.
///
/// Used before display and after conversions to keep accumulated float
/// drift out of results (`0.1 + 0.2` renders as `0.3`).
pub fn round_sig(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor();
    let scale = 10f64.powf(digits as f64 - 1.0 - magnitude);
    (value * scale).round() / scale
}

/// Equality within [`EPS`], relative for large magnitudes
pub fn approx_eq(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    if diff <= EPS {
        return true;
    }
    diff <= EPS * a.abs().max(b.abs())
}

/// True when the value is an integer within [`EPS`]
pub fn is_integral(value: f64) -> bool {
    (value - value.round()).abs() <= EPS
}

/// Round an exponent to the normalizer's working resolution (1e-6)
pub fn round_exp(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_sig() {
        assert_eq!(round_sig(0.1 + 0.2, 12), 0.3);
        assert_eq!(round_sig(2002.0, 12), 2002.0);
        assert_eq!(round_sig(0.0, 12), 0.0);
    }

    #[test]
    fn test_round_sig_large() {
        let v = round_sig(1234567.89123456789, 12);
        assert!(approx_eq(v, 1234567.89123));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12));
        assert!(!approx_eq(1.0, 1.001));
        assert!(approx_eq(1e12, 1e12 + 1.0));
    }

    #[test]
    fn test_is_integral() {
        assert!(is_integral(3.0));
        assert!(is_integral(-2.0000000001));
        assert!(!is_integral(0.6));
    }

    #[test]
    fn test_round_exp() {
        assert_eq!(round_exp(2.9999999), 3.0);
        assert_eq!(round_exp(1.5), 1.5);
    }
}
