//! Unit algebra for mensura
//!
//! Dimensions, units, prefixes, and quantities, plus the registry that
//! parses and renders unit symbols. The three unit shapes (simple,
//! prefixed, compound) live behind the closed [`Unit`] enum; arithmetic
//! over [`Quantity`] values carries units through every operation and
//! surfaces mismatches as typed errors.
//!
//! Rendering a compound unit chooses display prefixes through the
//! [`normalize`] module so the printed value never hides a scale factor.

pub mod catalog;
pub mod dimension;
pub mod normalize;
pub mod prefix;
pub mod quantity;
pub mod registry;
pub mod unit;

pub use dimension::Dimension;
pub use prefix::Prefix;
pub use quantity::Quantity;
pub use registry::UnitRegistry;
pub use unit::{Component, CompoundUnit, PrefixedUnit, SimpleUnit, Unit};
