//! Delimiter matching
//!
//! Splits raw input into nested segments along `()`, `{}` and `[]`
//! before any tokenization. The three delimiter kinds are
//! interchangeable in meaning but must nest properly.

use mensura_core::MensuraError;

/// Maximum group nesting depth
pub const MAX_DEPTH: usize = 20;

/// A run of raw text or a delimited subexpression
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Group(Vec<Segment>),
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '{' => '}',
        _ => ']',
    }
}

/// Split input into nested segments along the group delimiters
pub fn split_groups(input: &str) -> Result<Vec<Segment>, MensuraError> {
    let mut stack: Vec<(char, Vec<Segment>)> = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut text = String::new();

    for c in input.chars() {
        match c {
            '(' | '{' | '[' => {
                flush(&mut text, &mut current);
                if stack.len() >= MAX_DEPTH {
                    return Err(MensuraError::DepthLimitExceeded { limit: MAX_DEPTH });
                }
                stack.push((c, std::mem::take(&mut current)));
            }
            ')' | '}' | ']' => {
                flush(&mut text, &mut current);
                let Some((opener, parent)) = stack.pop() else {
                    return Err(MensuraError::Delimiter(format!("unmatched '{}'", c)));
                };
                if closer_for(opener) != c {
                    return Err(MensuraError::Delimiter(format!(
                        "'{}' closed by '{}'",
                        opener, c
                    )));
                }
                if current.is_empty() {
                    return Err(MensuraError::invalid("empty group"));
                }
                let group = std::mem::replace(&mut current, parent);
                current.push(Segment::Group(group));
            }
            _ => text.push(c),
        }
    }
    flush(&mut text, &mut current);

    if let Some((opener, _)) = stack.last() {
        return Err(MensuraError::Delimiter(format!("unmatched '{}'", opener)));
    }
    Ok(current)
}

fn flush(text: &mut String, current: &mut Vec<Segment>) {
    if !text.is_empty() {
        current.push(Segment::Text(std::mem::take(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_text() {
        let segments = split_groups("2+3").unwrap();
        assert_eq!(segments, vec![Segment::Text("2+3".to_string())]);
    }

    #[test]
    fn test_nested_groups() {
        let segments = split_groups("2*(3+[4])").unwrap();
        assert_eq!(segments.len(), 2);
        let Segment::Group(inner) = &segments[1] else {
            panic!("expected group");
        };
        assert_eq!(inner.len(), 2);
        assert!(matches!(inner[1], Segment::Group(_)));
    }

    #[test]
    fn test_mixed_delimiters_must_nest() {
        let err = split_groups("(2+[3)]").unwrap_err();
        assert!(matches!(err, MensuraError::Delimiter(_)));
    }

    #[test]
    fn test_unmatched_delimiters() {
        assert!(matches!(
            split_groups("(2+3").unwrap_err(),
            MensuraError::Delimiter(_)
        ));
        assert!(matches!(
            split_groups("2+3)").unwrap_err(),
            MensuraError::Delimiter(_)
        ));
    }

    #[test]
    fn test_empty_group() {
        let err = split_groups("2*()").unwrap_err();
        assert!(matches!(err, MensuraError::InvalidOperation(_)));
    }

    #[test]
    fn test_depth_limit() {
        let deep_ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(split_groups(&deep_ok).is_ok());

        let too_deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        let err = split_groups(&too_deep).unwrap_err();
        assert!(matches!(err, MensuraError::DepthLimitExceeded { limit: MAX_DEPTH }));
    }
}
