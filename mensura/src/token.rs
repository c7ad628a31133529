//! Tokenizer
//!
//! Turns the raw text segments produced by the group matcher into flat
//! lists of `Number`, `Symbol` and `Op` nodes; nested segments become
//! `Group` nodes tokenized recursively. No reduction happens here.

use crate::ast::{ExprNode, Op};
use crate::group::Segment;
use mensura_core::MensuraError;

/// True for characters that may appear in a unit symbol
fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic() || c == '°'
}

/// Tokenize segments into a flat node list (groups stay nested)
pub fn tokenize(segments: &[Segment]) -> Result<Vec<ExprNode>, MensuraError> {
    let mut out = Vec::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => scan_text(text, &mut out)?,
            Segment::Group(inner) => out.push(ExprNode::Group(tokenize(inner)?)),
        }
    }
    Ok(out)
}

fn scan_text(text: &str, out: &mut Vec<ExprNode>) -> Result<(), MensuraError> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            // collapse runs into a single space token
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            out.push(ExprNode::Op(Op::Space));
        } else if let Some(op) = operator(c) {
            out.push(ExprNode::Op(op));
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && next_is_digit(&chars, i + 1)) {
            i = scan_number(&chars, i, out)?;
        } else if c == '.' {
            // not part of a numeric literal: a multiplication dot
            out.push(ExprNode::Op(Op::Dot));
            i += 1;
        } else if is_symbol_char(c) {
            let start = i;
            while i < chars.len() && is_symbol_char(chars[i]) {
                i += 1;
            }
            out.push(ExprNode::Symbol(chars[start..i].iter().collect()));
        } else {
            return Err(MensuraError::value(format!("unexpected character '{}'", c)));
        }
    }
    Ok(())
}

fn operator(c: char) -> Option<Op> {
    match c {
        '+' => Some(Op::Plus),
        '-' | '−' => Some(Op::Minus),
        '*' | '×' => Some(Op::Multiply),
        '/' => Some(Op::Divide),
        '^' => Some(Op::Power),
        '·' => Some(Op::Dot),
        _ => None,
    }
}

fn next_is_digit(chars: &[char], i: usize) -> bool {
    chars.get(i).map(|c| c.is_ascii_digit()).unwrap_or(false)
}

/// Scan a numeric literal: digits, an optional fraction, and an optional
/// exponent suffix. The suffix is only consumed when a digit follows it,
/// so `2em` stays `2 * em`.
fn scan_number(chars: &[char], start: usize, out: &mut Vec<ExprNode>) -> Result<usize, MensuraError> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let after_sign = if matches!(chars.get(i + 1), Some('+') | Some('-')) {
            i + 2
        } else {
            i + 1
        };
        if next_is_digit(chars, after_sign) {
            i = after_sign;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    let literal: String = chars[start..i].iter().collect();
    let value: f64 = literal
        .parse()
        .map_err(|_| MensuraError::value(format!("invalid number literal '{}'", literal)))?;
    out.push(ExprNode::Number(value));
    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::split_groups;

    fn scan(text: &str) -> Vec<ExprNode> {
        tokenize(&split_groups(text).unwrap()).unwrap()
    }

    #[test]
    fn test_number_and_symbol_adjacency() {
        let tokens = scan("2mm");
        assert_eq!(
            tokens,
            vec![ExprNode::Number(2.0), ExprNode::Symbol("mm".to_string())]
        );
    }

    #[test]
    fn test_operators_and_spaces() {
        let tokens = scan("2 + 3");
        assert_eq!(
            tokens,
            vec![
                ExprNode::Number(2.0),
                ExprNode::Op(Op::Space),
                ExprNode::Op(Op::Plus),
                ExprNode::Op(Op::Space),
                ExprNode::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(scan("0.5"), vec![ExprNode::Number(0.5)]);
        assert_eq!(scan(".5"), vec![ExprNode::Number(0.5)]);
        assert_eq!(scan("2e3"), vec![ExprNode::Number(2000.0)]);
        assert_eq!(scan("1.5e-2"), vec![ExprNode::Number(0.015)]);
    }

    #[test]
    fn test_exponent_suffix_needs_digits() {
        // em is a symbol, not a dangling exponent
        assert_eq!(
            scan("2em"),
            vec![ExprNode::Number(2.0), ExprNode::Symbol("em".to_string())]
        );
    }

    #[test]
    fn test_unicode_symbols() {
        assert_eq!(
            scan("25°C"),
            vec![ExprNode::Number(25.0), ExprNode::Symbol("°C".to_string())]
        );
        assert_eq!(scan("µs"), vec![ExprNode::Symbol("µs".to_string())]);
    }

    #[test]
    fn test_unicode_operators() {
        let tokens = scan("2×3·4−1");
        assert_eq!(
            tokens,
            vec![
                ExprNode::Number(2.0),
                ExprNode::Op(Op::Multiply),
                ExprNode::Number(3.0),
                ExprNode::Op(Op::Dot),
                ExprNode::Number(4.0),
                ExprNode::Op(Op::Minus),
                ExprNode::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_dot_outside_a_number_multiplies() {
        assert_eq!(
            scan("m.s"),
            vec![
                ExprNode::Symbol("m".to_string()),
                ExprNode::Op(Op::Dot),
                ExprNode::Symbol("s".to_string()),
            ]
        );
    }

    #[test]
    fn test_groups_nest() {
        let tokens = scan("2*(3+4)");
        assert!(matches!(tokens[2], ExprNode::Group(_)));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize(&split_groups("2?3").unwrap()).unwrap_err();
        assert!(matches!(err, MensuraError::Value(_)));
    }
}
