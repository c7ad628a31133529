//! Error taxonomy shared by the whole workspace
//!
//! Errors never cross the public boundary as panics. Every fallible
//! operation returns `Result<_, MensuraError>`; the two entry points in the
//! `mensura` crate turn any error into its user-facing message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed error for parsing, unit algebra, and evaluation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum MensuraError {
    /// Malformed bracket nesting: unmatched or crossed delimiters
    #[error("delimiter error: {0}")]
    Delimiter(String),

    /// Bracket recursion deeper than the fixed limit
    #[error("expression nesting deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },

    /// Malformed or unevaluable value (empty group, division by zero,
    /// undefined power, unresolved symbol at evaluation time)
    #[error("{0}")]
    Value(String),

    /// Dimension mismatch in addition or conversion
    #[error("unit mismatch: {0}")]
    UnitMismatch(String),

    /// A symbol that resolves to no known unit, prefixed or not
    #[error("unknown unit '{0}'")]
    UnitNotFound(String),

    /// Unit construction or registration conflict
    #[error("unit error: {0}")]
    Unit(String),

    /// Prefix construction or registration conflict, or incompatible radices
    #[error("prefix error: {0}")]
    Prefix(String),

    /// Semantically illegal operation (adding pure units, non-dimensionless
    /// exponent, malformed operator sequence)
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Internal invariant violation; never expected for well-formed input
    #[error("unexpected internal error: {0}")]
    Unexpected(String),
}

impl MensuraError {
    pub fn value(msg: impl Into<String>) -> Self {
        MensuraError::Value(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        MensuraError::InvalidOperation(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        MensuraError::Unexpected(msg.into())
    }
}
