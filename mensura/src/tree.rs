//! Tree builder
//!
//! Folds a flat token list into a single expression node through a fixed
//! sequence of passes:
//!
//! 1. subgroups reduce recursively to single operands
//! 2. spacing normalizes: the multiplication dot becomes `*`, spaces
//!    next to operators are dropped, a space between two operands
//!    becomes implicit multiplication
//! 3. operator sequences sanitize: sign chains collapse, redundant `+`
//!    after another operator is dropped, adjacent operands gain implicit
//!    multiplication, malformed sequences fail
//! 4. `^` reduces left to right (stacked powers associate left)
//! 5. implicit multiplication reduces, binding tighter than `/`
//! 6. `/` reduces, then `*`
//! 7. remaining unary and binary minus turn into negated terms
//! 8. what is left flattens into one n-ary sum
//!
//! After sanitization a `-` directly after `*`, `/`, `^` or implicit
//! multiplication is a unary sign; each reduction pass folds it into its
//! right operand as it goes.

use crate::ast::{ExprNode, Op};
use mensura_core::MensuraError;

/// Reduce a token list to a single expression node
pub fn build(nodes: Vec<ExprNode>) -> Result<ExprNode, MensuraError> {
    let nodes = resolve_groups(nodes)?;
    let nodes = normalize_spacing(nodes);
    let nodes = sanitize(nodes)?;
    let nodes = reduce_power(nodes)?;
    let nodes = reduce_binary(nodes, Op::ImplicitMultiply)?;
    let nodes = reduce_binary(nodes, Op::Divide)?;
    let nodes = reduce_binary(nodes, Op::Multiply)?;
    let nodes = reduce_minus(nodes)?;
    collect_sum(nodes)
}

fn resolve_groups(nodes: Vec<ExprNode>) -> Result<Vec<ExprNode>, MensuraError> {
    nodes
        .into_iter()
        .map(|node| match node {
            ExprNode::Group(inner) => match build(inner)? {
                ExprNode::Empty => Err(MensuraError::invalid("empty group")),
                reduced => Ok(reduced),
            },
            other => Ok(other),
        })
        .collect()
}

fn normalize_spacing(nodes: Vec<ExprNode>) -> Vec<ExprNode> {
    let nodes: Vec<ExprNode> = nodes
        .into_iter()
        .map(|n| match n {
            ExprNode::Op(Op::Dot) => ExprNode::Op(Op::Multiply),
            other => other,
        })
        .collect();

    let mut out: Vec<ExprNode> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        if !matches!(node, ExprNode::Op(Op::Space)) {
            out.push(node.clone());
            continue;
        }
        let prev_is_operand = out.last().map(ExprNode::is_operand).unwrap_or(false);
        let next_is_operand = nodes[i + 1..]
            .iter()
            .find(|n| !matches!(n, ExprNode::Op(Op::Space)))
            .map(ExprNode::is_operand)
            .unwrap_or(false);
        if prev_is_operand && next_is_operand {
            out.push(ExprNode::Op(Op::ImplicitMultiply));
        }
    }
    out
}

fn sanitize(nodes: Vec<ExprNode>) -> Result<Vec<ExprNode>, MensuraError> {
    let mut out: Vec<ExprNode> = Vec::new();
    for node in nodes {
        match node {
            ExprNode::Op(op) => push_op(&mut out, op)?,
            operand => {
                if out.last().map(ExprNode::is_operand).unwrap_or(false) {
                    out.push(ExprNode::Op(Op::ImplicitMultiply));
                }
                out.push(operand);
            }
        }
    }
    if matches!(out.last(), Some(ExprNode::Op(_))) {
        return Err(MensuraError::invalid("expression ends with an operator"));
    }
    Ok(out)
}

/// Append an operator, collapsing it against whatever precedes it. Sign
/// folding can cascade (`2 - -3` becomes `2 + 3`), hence the recursion
/// after a pop.
fn push_op(out: &mut Vec<ExprNode>, op: Op) -> Result<(), MensuraError> {
    let prev = match out.last() {
        None => {
            return match op {
                Op::Plus => Ok(()),
                Op::Minus => {
                    out.push(ExprNode::Op(Op::Minus));
                    Ok(())
                }
                other => Err(MensuraError::invalid(format!(
                    "expression cannot start with '{}'",
                    other
                ))),
            };
        }
        Some(ExprNode::Op(prev)) => *prev,
        Some(_) => {
            out.push(ExprNode::Op(op));
            return Ok(());
        }
    };
    match (prev, op) {
        (Op::Plus, Op::Plus) | (Op::Minus, Op::Plus) => Ok(()),
        (Op::Plus, Op::Minus) => {
            out.pop();
            push_op(out, Op::Minus)
        }
        (Op::Minus, Op::Minus) => {
            out.pop();
            push_op(out, Op::Plus)
        }
        (Op::Multiply | Op::ImplicitMultiply | Op::Divide | Op::Power, Op::Plus) => Ok(()),
        (Op::Multiply | Op::ImplicitMultiply | Op::Divide | Op::Power, Op::Minus) => {
            out.push(ExprNode::Op(Op::Minus));
            Ok(())
        }
        (_, other) => Err(MensuraError::invalid(format!(
            "operator '{}' cannot follow '{}'",
            other, prev
        ))),
    }
}

/// Take the operand at `i`, folding a unary minus into it
fn take_operand(nodes: &[ExprNode], i: usize) -> Result<(ExprNode, usize), MensuraError> {
    match nodes.get(i) {
        Some(ExprNode::Op(Op::Minus)) => match nodes.get(i + 1) {
            Some(operand) if operand.is_operand() => {
                Ok((ExprNode::Negate(Box::new(operand.clone())), 2))
            }
            _ => Err(MensuraError::unexpected("dangling unary minus")),
        },
        Some(operand) if operand.is_operand() => Ok((operand.clone(), 1)),
        _ => Err(MensuraError::unexpected("operator without an operand")),
    }
}

/// Reduce `^` left to right; `2^3^2` groups as `(2^3)^2`
fn reduce_power(mut nodes: Vec<ExprNode>) -> Result<Vec<ExprNode>, MensuraError> {
    while let Some(i) = nodes
        .iter()
        .position(|n| matches!(n, ExprNode::Op(Op::Power)))
    {
        if i == 0 || !nodes[i - 1].is_operand() {
            return Err(MensuraError::unexpected("power without a base"));
        }
        let (exponent, consumed) = take_operand(&nodes, i + 1)?;
        let base = nodes[i - 1].clone();
        let node = ExprNode::Power(Box::new(base), Box::new(exponent));
        nodes.splice(i - 1..i + 1 + consumed, [node]);
    }
    Ok(nodes)
}

/// Reduce one binary operator left to right. Both multiplication forms
/// flatten into a single n-ary product; division stays binary.
fn reduce_binary(mut nodes: Vec<ExprNode>, op: Op) -> Result<Vec<ExprNode>, MensuraError> {
    while let Some(i) = nodes.iter().position(|n| *n == ExprNode::Op(op)) {
        if i == 0 || !nodes[i - 1].is_operand() {
            return Err(MensuraError::unexpected("operator without a left operand"));
        }
        let (right, consumed) = take_operand(&nodes, i + 1)?;
        let left = nodes[i - 1].clone();
        let node = match op {
            Op::Divide => ExprNode::Divide(Box::new(left), Box::new(right)),
            _ => match left {
                ExprNode::Multiply(mut factors) => {
                    factors.push(right);
                    ExprNode::Multiply(factors)
                }
                other => ExprNode::Multiply(vec![other, right]),
            },
        };
        nodes.splice(i - 1..i + 1 + consumed, [node]);
    }
    Ok(nodes)
}

/// Turn the remaining leading and binary minuses into negated terms
fn reduce_minus(nodes: Vec<ExprNode>) -> Result<Vec<ExprNode>, MensuraError> {
    let mut out: Vec<ExprNode> = Vec::new();
    let mut i = 0;
    while i < nodes.len() {
        if nodes[i] == ExprNode::Op(Op::Minus) {
            let (negated, consumed) = take_operand(&nodes, i)?;
            if !out.is_empty() {
                out.push(ExprNode::Op(Op::Plus));
            }
            out.push(negated);
            i += consumed;
        } else {
            out.push(nodes[i].clone());
            i += 1;
        }
    }
    Ok(out)
}

/// Flatten `operand (+ operand)*` into one node
fn collect_sum(nodes: Vec<ExprNode>) -> Result<ExprNode, MensuraError> {
    if nodes.is_empty() {
        return Ok(ExprNode::Empty);
    }
    let mut terms: Vec<ExprNode> = Vec::new();
    let mut expect_operand = true;
    for node in nodes {
        if let ExprNode::Op(op) = &node {
            if *op == Op::Plus && !expect_operand {
                expect_operand = true;
                continue;
            }
            return Err(MensuraError::unexpected(format!(
                "unreduced operator '{}'",
                op
            )));
        }
        if !expect_operand {
            return Err(MensuraError::unexpected("adjacent operands after reduction"));
        }
        terms.push(node);
        expect_operand = false;
    }
    if expect_operand {
        return Err(MensuraError::unexpected("sum ends with an operator"));
    }
    if terms.len() == 1 {
        return Ok(terms.remove(0));
    }
    Ok(ExprNode::Add(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::split_groups;
    use crate::token::tokenize;

    fn parse(text: &str) -> Result<ExprNode, MensuraError> {
        build(tokenize(&split_groups(text)?)?)
    }

    fn num(v: f64) -> ExprNode {
        ExprNode::Number(v)
    }

    fn sym(s: &str) -> ExprNode {
        ExprNode::Symbol(s.to_string())
    }

    #[test]
    fn test_spaced_addition() {
        assert_eq!(
            parse("2 + 3").unwrap(),
            ExprNode::Add(vec![num(2.0), num(3.0)])
        );
    }

    #[test]
    fn test_space_is_implicit_multiplication() {
        assert_eq!(
            parse("2 3").unwrap(),
            ExprNode::Multiply(vec![num(2.0), num(3.0)])
        );
    }

    #[test]
    fn test_adjacency_is_implicit_multiplication() {
        assert_eq!(
            parse("2mm").unwrap(),
            ExprNode::Multiply(vec![num(2.0), sym("mm")])
        );
    }

    #[test]
    fn test_products_flatten() {
        assert_eq!(
            parse("2*3*4").unwrap(),
            ExprNode::Multiply(vec![num(2.0), num(3.0), num(4.0)])
        );
        assert_eq!(
            parse("2·3").unwrap(),
            ExprNode::Multiply(vec![num(2.0), num(3.0)])
        );
    }

    #[test]
    fn test_implicit_binds_tighter_than_division() {
        // 5kg / 3L groups as (5*kg) / (3*L)
        assert_eq!(
            parse("5kg / 3L").unwrap(),
            ExprNode::Divide(
                Box::new(ExprNode::Multiply(vec![num(5.0), sym("kg")])),
                Box::new(ExprNode::Multiply(vec![num(3.0), sym("L")])),
            )
        );
    }

    #[test]
    fn test_power_binds_tighter_than_implicit() {
        // 25°C^2 groups as 25 * (°C^2)
        assert_eq!(
            parse("25°C^2").unwrap(),
            ExprNode::Multiply(vec![
                num(25.0),
                ExprNode::Power(Box::new(sym("°C")), Box::new(num(2.0))),
            ])
        );
    }

    #[test]
    fn test_power_left_associative() {
        // 2^3^2 = (2^3)^2 = 64
        assert_eq!(
            parse("2^3^2").unwrap(),
            ExprNode::Power(
                Box::new(ExprNode::Power(Box::new(num(2.0)), Box::new(num(3.0)))),
                Box::new(num(2.0)),
            )
        );
    }

    #[test]
    fn test_sign_chains_collapse() {
        assert_eq!(
            parse("2--3").unwrap(),
            ExprNode::Add(vec![num(2.0), num(3.0)])
        );
        assert_eq!(
            parse("2+-3").unwrap(),
            ExprNode::Add(vec![num(2.0), ExprNode::Negate(Box::new(num(3.0)))])
        );
        assert_eq!(parse("+2").unwrap(), num(2.0));
    }

    #[test]
    fn test_unary_minus_after_operator() {
        assert_eq!(
            parse("2*-3").unwrap(),
            ExprNode::Multiply(vec![num(2.0), ExprNode::Negate(Box::new(num(3.0)))])
        );
        assert_eq!(
            parse("2^-3").unwrap(),
            ExprNode::Power(
                Box::new(num(2.0)),
                Box::new(ExprNode::Negate(Box::new(num(3.0)))),
            )
        );
    }

    #[test]
    fn test_leading_minus() {
        assert_eq!(
            parse("-2m").unwrap(),
            ExprNode::Negate(Box::new(ExprNode::Multiply(vec![num(2.0), sym("m")])))
        );
    }

    #[test]
    fn test_malformed_sequences() {
        assert!(matches!(
            parse("*2").unwrap_err(),
            MensuraError::InvalidOperation(_)
        ));
        assert!(matches!(
            parse("2//3").unwrap_err(),
            MensuraError::InvalidOperation(_)
        ));
        assert!(matches!(
            parse("2+*3").unwrap_err(),
            MensuraError::InvalidOperation(_)
        ));
        assert!(matches!(
            parse("2+").unwrap_err(),
            MensuraError::InvalidOperation(_)
        ));
    }

    #[test]
    fn test_groups_reduce_first() {
        assert_eq!(
            parse("2*(3+4)").unwrap(),
            ExprNode::Multiply(vec![
                num(2.0),
                ExprNode::Add(vec![num(3.0), num(4.0)]),
            ])
        );
    }

    #[test]
    fn test_blank_group_rejected() {
        assert!(matches!(
            parse("2*( )").unwrap_err(),
            MensuraError::InvalidOperation(_)
        ));
    }

    #[test]
    fn test_empty_input_reduces_to_empty() {
        assert_eq!(parse("").unwrap(), ExprNode::Empty);
        assert_eq!(parse("   ").unwrap(), ExprNode::Empty);
    }
}
