//! Expression tree
//!
//! The tree is built in place: the tokenizer emits a flat list of
//! `Number`, `Symbol`, `Op` and `Group` nodes, and the builder passes in
//! [`crate::tree`] fold that list into the structured variants until a
//! single node remains.

use mensura_units::Unit;
use serde::{Deserialize, Serialize};

/// An operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Plus,
    Minus,
    Multiply,
    /// Multiplication implied by adjacency (`2mm`, `100 km`)
    ImplicitMultiply,
    Divide,
    Power,
    /// Whitespace; dropped or turned into implicit multiplication
    Space,
    /// The `·` multiplication sign
    Dot,
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Multiply => "*",
            Op::ImplicitMultiply => "*",
            Op::Divide => "/",
            Op::Power => "^",
            Op::Space => " ",
            Op::Dot => "·",
        };
        write!(f, "{}", s)
    }
}

/// One node of the expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode {
    /// Numeric literal
    Number(f64),
    /// Unresolved unit symbol; replaced by `Unit` during symbol resolution
    Symbol(String),
    /// A symbol resolved against the registry
    Unit(Unit),
    /// Operator awaiting reduction
    Op(Op),
    /// Delimited subexpression awaiting reduction
    Group(Vec<ExprNode>),
    Negate(Box<ExprNode>),
    Power(Box<ExprNode>, Box<ExprNode>),
    /// n-ary product; implicit and explicit multiplication both flatten
    /// into it
    Multiply(Vec<ExprNode>),
    Divide(Box<ExprNode>, Box<ExprNode>),
    /// n-ary sum; binary minus contributes negated terms
    Add(Vec<ExprNode>),
    /// The empty expression
    Empty,
}

impl ExprNode {
    /// True for nodes that can stand as an operand
    pub fn is_operand(&self) -> bool {
        !matches!(self, ExprNode::Op(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let node = ExprNode::Add(vec![
            ExprNode::Number(2.0),
            ExprNode::Negate(Box::new(ExprNode::Multiply(vec![
                ExprNode::Number(3.0),
                ExprNode::Symbol("mm".to_string()),
            ]))),
        ]);
        let json = serde_json::to_string(&node).unwrap();
        let back: ExprNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_operand_classification() {
        assert!(ExprNode::Number(1.0).is_operand());
        assert!(ExprNode::Symbol("m".into()).is_operand());
        assert!(!ExprNode::Op(Op::Plus).is_operand());
    }
}
