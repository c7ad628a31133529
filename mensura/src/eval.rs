//! Expression evaluation
//!
//! Walks a reduced expression tree and folds it into an [`EvalValue`].
//! Numbers, bare units, and quantities mix freely under multiplication
//! and division; addition requires dimensioned operands, and the
//! exponent of a power must be dimensionless.

use crate::ast::ExprNode;
use mensura_core::{round_sig, MensuraError};
use mensura_units::{Quantity, Unit, UnitRegistry};

/// The result of evaluating an expression node
#[derive(Debug, Clone, PartialEq)]
pub enum EvalValue {
    Number(f64),
    Unit(Unit),
    Quantity(Quantity),
}

/// Rewrite every symbol leaf into its registry unit, returning a new tree
pub fn resolve_symbols(node: &ExprNode, registry: &UnitRegistry) -> Result<ExprNode, MensuraError> {
    let resolve_all = |nodes: &[ExprNode]| -> Result<Vec<ExprNode>, MensuraError> {
        nodes.iter().map(|n| resolve_symbols(n, registry)).collect()
    };
    match node {
        ExprNode::Symbol(s) => Ok(ExprNode::Unit(registry.parse_unit(s)?)),
        ExprNode::Negate(inner) => Ok(ExprNode::Negate(Box::new(resolve_symbols(
            inner, registry,
        )?))),
        ExprNode::Power(base, exp) => Ok(ExprNode::Power(
            Box::new(resolve_symbols(base, registry)?),
            Box::new(resolve_symbols(exp, registry)?),
        )),
        ExprNode::Divide(a, b) => Ok(ExprNode::Divide(
            Box::new(resolve_symbols(a, registry)?),
            Box::new(resolve_symbols(b, registry)?),
        )),
        ExprNode::Multiply(factors) => Ok(ExprNode::Multiply(resolve_all(factors)?)),
        ExprNode::Add(terms) => Ok(ExprNode::Add(resolve_all(terms)?)),
        ExprNode::Group(inner) => Ok(ExprNode::Group(resolve_all(inner)?)),
        other => Ok(other.clone()),
    }
}

/// Evaluate a reduced, symbol-resolved expression tree
pub fn evaluate(node: &ExprNode, registry: &UnitRegistry) -> Result<EvalValue, MensuraError> {
    match node {
        ExprNode::Number(n) => Ok(EvalValue::Number(*n)),
        ExprNode::Unit(u) => Ok(EvalValue::Unit(u.clone())),
        ExprNode::Symbol(s) => Err(MensuraError::value(format!(
            "unresolved symbol '{}'",
            s
        ))),
        ExprNode::Negate(inner) => negate(evaluate(inner, registry)?),
        ExprNode::Add(terms) => fold_values(terms, registry, add),
        ExprNode::Multiply(factors) => fold_values(factors, registry, multiply),
        ExprNode::Divide(a, b) => divide(evaluate(a, registry)?, evaluate(b, registry)?),
        ExprNode::Power(base, exponent) => {
            let exp = exponent_value(exponent, registry)?;
            match evaluate(base, registry)? {
                EvalValue::Number(n) => {
                    Ok(EvalValue::Number(Quantity::dimensionless(n).power(exp)?.value))
                }
                EvalValue::Unit(u) => Ok(EvalValue::Unit(u.power(exp))),
                EvalValue::Quantity(q) => Ok(EvalValue::Quantity(q.power(exp)?)),
            }
        }
        ExprNode::Empty => Err(MensuraError::value("empty expression")),
        ExprNode::Op(_) | ExprNode::Group(_) => {
            Err(MensuraError::unexpected("unreduced node reached evaluation"))
        }
    }
}

fn fold_values(
    nodes: &[ExprNode],
    registry: &UnitRegistry,
    combine: fn(EvalValue, EvalValue) -> Result<EvalValue, MensuraError>,
) -> Result<EvalValue, MensuraError> {
    let mut values = nodes.iter().map(|n| evaluate(n, registry));
    let first = values
        .next()
        .ok_or_else(|| MensuraError::unexpected("empty operand list"))??;
    values.try_fold(first, |acc, value| combine(acc, value?))
}

/// A power's exponent must reduce to a dimensionless number
fn exponent_value(node: &ExprNode, registry: &UnitRegistry) -> Result<f64, MensuraError> {
    match evaluate(node, registry)? {
        EvalValue::Number(n) => Ok(n),
        EvalValue::Quantity(q) if q.is_dimensionless() => Ok(q.value * q.unit.coeff()),
        EvalValue::Unit(u) if u.is_dimensionless() => Ok(u.coeff()),
        _ => Err(MensuraError::invalid(
            "exponent of a power must be dimensionless",
        )),
    }
}

fn negate(value: EvalValue) -> Result<EvalValue, MensuraError> {
    match value {
        EvalValue::Number(n) => Ok(EvalValue::Number(-n)),
        EvalValue::Quantity(q) => Ok(EvalValue::Quantity(q.oppose())),
        EvalValue::Unit(u) => Err(MensuraError::invalid(format!(
            "cannot negate bare unit '{}'",
            u.symbol()
        ))),
    }
}

fn add(a: EvalValue, b: EvalValue) -> Result<EvalValue, MensuraError> {
    match (a, b) {
        (EvalValue::Number(x), EvalValue::Number(y)) => Ok(EvalValue::Number(x + y)),
        (EvalValue::Unit(u), _) | (_, EvalValue::Unit(u)) => Err(MensuraError::invalid(format!(
            "cannot add bare unit '{}'",
            u.symbol()
        ))),
        (EvalValue::Number(x), EvalValue::Quantity(q)) => {
            Ok(EvalValue::Quantity(Quantity::dimensionless(x).add(&q)?))
        }
        (EvalValue::Quantity(q), EvalValue::Number(x)) => {
            Ok(EvalValue::Quantity(q.add(&Quantity::dimensionless(x))?))
        }
        (EvalValue::Quantity(p), EvalValue::Quantity(q)) => Ok(EvalValue::Quantity(p.add(&q)?)),
    }
}

fn multiply(a: EvalValue, b: EvalValue) -> Result<EvalValue, MensuraError> {
    match (a, b) {
        (EvalValue::Number(x), EvalValue::Number(y)) => Ok(EvalValue::Number(x * y)),
        (EvalValue::Number(n), EvalValue::Unit(u)) | (EvalValue::Unit(u), EvalValue::Number(n)) => {
            Ok(EvalValue::Quantity(Quantity::new(n, u)))
        }
        (EvalValue::Unit(a), EvalValue::Unit(b)) => Ok(EvalValue::Unit(a.multiply(&b)?)),
        (EvalValue::Number(n), EvalValue::Quantity(q))
        | (EvalValue::Quantity(q), EvalValue::Number(n)) => Ok(EvalValue::Quantity(
            q.multiply(&Quantity::dimensionless(n))?,
        )),
        (EvalValue::Quantity(q), EvalValue::Unit(u)) => Ok(EvalValue::Quantity(Quantity::new(
            q.value,
            q.unit.multiply(&u)?,
        ))),
        (EvalValue::Unit(u), EvalValue::Quantity(q)) => Ok(EvalValue::Quantity(Quantity::new(
            q.value,
            u.multiply(&q.unit)?,
        ))),
        (EvalValue::Quantity(p), EvalValue::Quantity(q)) => {
            Ok(EvalValue::Quantity(p.multiply(&q)?))
        }
    }
}

fn divide(a: EvalValue, b: EvalValue) -> Result<EvalValue, MensuraError> {
    match (a, b) {
        (EvalValue::Number(x), EvalValue::Number(y)) => {
            if y == 0.0 {
                return Err(MensuraError::value("division by zero"));
            }
            Ok(EvalValue::Number(x / y))
        }
        (EvalValue::Number(n), EvalValue::Unit(u)) => {
            Ok(EvalValue::Quantity(Quantity::new(n, Unit::one().divide(&u)?)))
        }
        (EvalValue::Unit(u), EvalValue::Number(n)) => {
            if n == 0.0 {
                return Err(MensuraError::value("division by zero"));
            }
            Ok(EvalValue::Quantity(Quantity::new(1.0 / n, u)))
        }
        (EvalValue::Unit(a), EvalValue::Unit(b)) => Ok(EvalValue::Unit(a.divide(&b)?)),
        (EvalValue::Quantity(q), EvalValue::Number(n)) => Ok(EvalValue::Quantity(
            q.divide(&Quantity::dimensionless(n))?,
        )),
        (EvalValue::Number(n), EvalValue::Quantity(q)) => Ok(EvalValue::Quantity(
            Quantity::dimensionless(n).divide(&q)?,
        )),
        (EvalValue::Quantity(q), EvalValue::Unit(u)) => Ok(EvalValue::Quantity(Quantity::new(
            q.value,
            q.unit.divide(&u)?,
        ))),
        (EvalValue::Unit(u), EvalValue::Quantity(q)) => {
            if q.value == 0.0 {
                return Err(MensuraError::value("division by zero"));
            }
            Ok(EvalValue::Quantity(Quantity::new(
                1.0 / q.value,
                u.divide(&q.unit)?,
            )))
        }
        (EvalValue::Quantity(p), EvalValue::Quantity(q)) => {
            Ok(EvalValue::Quantity(p.divide(&q)?))
        }
    }
}

/// Render an evaluated value for display. Compound units go through the
/// prefix normalizer; a fully cancelled unit renders as `1`.
pub fn render_value(registry: &UnitRegistry, value: &EvalValue) -> Result<String, MensuraError> {
    match value {
        EvalValue::Number(n) => Ok(format_number(*n)),
        EvalValue::Unit(u) => {
            let symbol = registry.render_unit(u)?;
            if symbol.is_empty() {
                Ok("1".to_string())
            } else {
                Ok(symbol)
            }
        }
        EvalValue::Quantity(q) => {
            let symbol = registry.render_unit(&q.unit)?;
            let value = format_number(q.value);
            if symbol.is_empty() {
                Ok(value)
            } else {
                Ok(format!("{} {}", value, symbol))
            }
        }
    }
}

fn format_number(n: f64) -> String {
    format!("{}", round_sig(n, 12))
}
