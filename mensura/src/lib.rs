//! Mensura - unit-aware expression calculator
//!
//! Parses arithmetic expressions over numbers and unit symbols, carries
//! units through every operation, and renders results with normalized
//! prefixes. Unit knowledge comes from a caller-owned
//! [`UnitRegistry`]; see `mensura_units::catalog` for the default set.
//!
//! ```
//! use mensura::{evaluate_expression, convert_expression};
//! use mensura_units::{catalog, UnitRegistry};
//!
//! let mut registry = UnitRegistry::new();
//! catalog::register_defaults(&mut registry).unwrap();
//!
//! assert_eq!(evaluate_expression(&registry, "2mm + 2m"), "2002 mm");
//! assert_eq!(
//!     convert_expression(&registry, "5kg / (3L + 20dL)", "kg/m^3"),
//!     "1000 kg*m^-3"
//! );
//! ```

mod ast;
mod eval;
mod group;
mod token;
mod tree;

pub use ast::{ExprNode, Op};
pub use eval::{evaluate, render_value, resolve_symbols, EvalValue};
pub use group::MAX_DEPTH;
pub use mensura_core::MensuraError;
pub use mensura_units::{Quantity, Unit, UnitRegistry};

/// Parse input into a single reduced expression node
pub fn parse_expression(input: &str) -> Result<ExprNode, MensuraError> {
    let segments = group::split_groups(input)?;
    let tokens = token::tokenize(&segments)?;
    tree::build(tokens)
}

/// Evaluate an expression and render the result
pub fn try_evaluate(registry: &UnitRegistry, input: &str) -> Result<String, MensuraError> {
    let node = eval::resolve_symbols(&parse_expression(input)?, registry)?;
    let value = eval::evaluate(&node, registry)?;
    eval::render_value(registry, &value)
}

/// Evaluate an expression, convert the result into the target unit, and
/// render it. The target expression must reduce to a bare unit.
pub fn try_convert(
    registry: &UnitRegistry,
    input: &str,
    target: &str,
) -> Result<String, MensuraError> {
    let node = eval::resolve_symbols(&parse_expression(input)?, registry)?;
    let value = eval::evaluate(&node, registry)?;

    let target_node = eval::resolve_symbols(&parse_expression(target)?, registry)?;
    let EvalValue::Unit(unit) = eval::evaluate(&target_node, registry)? else {
        return Err(MensuraError::value(format!(
            "conversion target '{}' is not a unit",
            target
        )));
    };

    let quantity = match value {
        EvalValue::Number(n) => Quantity::dimensionless(n),
        EvalValue::Unit(u) => Quantity::new(1.0, u),
        EvalValue::Quantity(q) => q,
    };
    let converted = quantity.convert(&unit)?;
    eval::render_value(registry, &EvalValue::Quantity(converted))
}

/// Evaluate an expression; failures come back as their display text
pub fn evaluate_expression(registry: &UnitRegistry, input: &str) -> String {
    match try_evaluate(registry, input) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(expression = input, error = %e, "expression evaluation failed");
            e.to_string()
        }
    }
}

/// Evaluate and convert an expression; failures come back as their
/// display text
pub fn convert_expression(registry: &UnitRegistry, input: &str, target: &str) -> String {
    match try_convert(registry, input, target) {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(expression = input, target = target, error = %e, "conversion failed");
            e.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mensura_units::catalog;

    fn registry() -> UnitRegistry {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let mut reg = UnitRegistry::new();
        catalog::register_defaults(&mut reg).unwrap();
        reg
    }

    #[test]
    fn test_plain_arithmetic() {
        let reg = registry();
        assert_eq!(evaluate_expression(&reg, "2 + 3"), "5");
        assert_eq!(evaluate_expression(&reg, "2 3"), "6");
        assert_eq!(evaluate_expression(&reg, "2+3*4"), "14");
        assert_eq!(evaluate_expression(&reg, "(2+3)*4"), "20");
    }

    #[test]
    fn test_mixed_prefix_addition() {
        let reg = registry();
        assert_eq!(evaluate_expression(&reg, "2mm + 2m"), "2002 mm");
    }

    #[test]
    fn test_compound_result_gets_normalized_prefixes() {
        let reg = registry();
        assert_eq!(evaluate_expression(&reg, "5kg / (3L + 20dL)"), "1 kg*L^-1");
    }

    #[test]
    fn test_conversion_renders_target_unit() {
        let reg = registry();
        assert_eq!(
            convert_expression(&reg, "5kg / (3L + 20dL)", "kg/m^3"),
            "1000 kg*m^-3"
        );
    }

    #[test]
    fn test_conversion_round_trip() {
        let reg = registry();
        let there = convert_expression(&reg, "3mi", "km");
        assert_eq!(there, "4.828032 km");
        assert_eq!(convert_expression(&reg, &there, "mi"), "3 mi");
    }

    #[test]
    fn test_speed_conversion() {
        let reg = registry();
        assert_eq!(
            convert_expression(&reg, "100 km/h", "m/s"),
            "27.7777777778 m*s^-1"
        );
    }

    #[test]
    fn test_affine_arithmetic() {
        let reg = registry();
        assert_eq!(evaluate_expression(&reg, "10°C + 5K"), "15 °C");
        assert_eq!(convert_expression(&reg, "25°C", "K"), "298.15 K");
        assert_eq!(convert_expression(&reg, "0°C", "°F"), "32 °F");
    }

    #[test]
    fn test_power_domain_error_text() {
        let reg = registry();
        assert_eq!(
            evaluate_expression(&reg, "(-25°C)^0.6"),
            "undefined for value=-25 and power=0.6"
        );
    }

    #[test]
    fn test_dimensioned_exponent_error_text() {
        let reg = registry();
        assert_eq!(
            evaluate_expression(&reg, "25°C^(6rad)"),
            "invalid operation: exponent of a power must be dimensionless"
        );
    }

    #[test]
    fn test_unit_addition_error() {
        let reg = registry();
        assert!(evaluate_expression(&reg, "°C+K").starts_with("invalid operation:"));
    }

    #[test]
    fn test_depth_limit_error_text() {
        let reg = registry();
        let nested_ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate_expression(&reg, &nested_ok), "1");

        let nested_err = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(
            evaluate_expression(&reg, &nested_err),
            "expression nesting deeper than 20 levels"
        );
    }

    #[test]
    fn test_delimiter_error_text() {
        let reg = registry();
        assert!(evaluate_expression(&reg, "(2+[3)]").starts_with("delimiter error:"));
        assert!(evaluate_expression(&reg, "2+3)").starts_with("delimiter error:"));
    }

    #[test]
    fn test_unknown_unit_error_text() {
        let reg = registry();
        assert_eq!(
            evaluate_expression(&reg, "3 parsec"),
            "unknown unit 'parsec'"
        );
    }

    #[test]
    fn test_conversion_target_must_be_a_unit() {
        let reg = registry();
        assert_eq!(
            convert_expression(&reg, "3m", "2km"),
            "conversion target '2km' is not a unit"
        );
    }

    #[test]
    fn test_conversion_dimension_mismatch() {
        let reg = registry();
        assert!(convert_expression(&reg, "3m", "s").starts_with("unit mismatch:"));
    }

    #[test]
    fn test_pure_unit_expression_renders_symbol() {
        let reg = registry();
        assert_eq!(evaluate_expression(&reg, "m/s"), "m*s^-1");
        assert_eq!(evaluate_expression(&reg, "km/m"), "km*m^-1");
    }

    #[test]
    fn test_binary_units_end_to_end() {
        let reg = registry();
        assert_eq!(convert_expression(&reg, "1KiB", "bit"), "8192 bit");
    }
}
