//! Mensura Core - Fundamental types
//!
//! This crate provides the types shared by the rest of the workspace:
//! - `MensuraError`: the typed error taxonomy
//! - float helpers: explicit rounding and tolerant comparison

mod approx;
mod error;

pub use approx::{approx_eq, is_integral, round_exp, round_sig, EPS, LEFTOVER_EPS};
pub use error::MensuraError;
