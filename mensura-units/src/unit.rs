//! The unit family: simple, prefixed, and compound units
//!
//! The three shapes share one operation set behind the closed [`Unit`]
//! enum. All operations return new values; nothing is mutated in place.
//!
//! Composition follows delta semantics: multiplying, dividing, or raising
//! a unit drops additive offsets, so an affine unit (Celsius) only keeps
//! its offset while it stands alone with exponent 1.

use crate::{Dimension, Prefix};
use mensura_core::{approx_eq, is_integral, MensuraError, EPS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named base unit with conversion coefficient and optional offset
///
/// Conversion to the reference unit of its dimension is
/// `reference = value * coeff + offset`. Invariant: `coeff > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleUnit {
    /// Ordered symbol aliases; the first one is the display symbol
    pub symbols: Vec<String>,
    /// The unit name (e.g. "meter")
    pub name: String,
    /// The dimensional signature
    pub dimension: Dimension,
    /// Radix accepted for prefixing (10 for SI units, 2 for bytes)
    pub base: f64,
    /// Multiplicative coefficient to the dimension's reference unit
    pub coeff: f64,
    /// Additive offset; non-zero makes the unit affine (Celsius)
    pub offset: f64,
    /// Whether prefixes may attach to this unit
    pub prefixable: bool,
}

impl SimpleUnit {
    /// Create a decimal-radix, prefixable unit with no offset
    pub fn new(symbols: &[&str], name: &str, dimension: Dimension, coeff: f64) -> Self {
        SimpleUnit {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            name: name.to_string(),
            dimension,
            base: 10.0,
            coeff,
            offset: 0.0,
            prefixable: true,
        }
    }

    /// Builder: set the additive offset (affine units)
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set the prefix radix
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    /// Builder: forbid prefixing
    pub fn not_prefixable(mut self) -> Self {
        self.prefixable = false;
        self
    }

    /// The dimensionless identity unit (coeff 1, offset 0, no symbol)
    pub fn one() -> Self {
        SimpleUnit::new(&[], "one", Dimension::DIMENSIONLESS, 1.0).not_prefixable()
    }

    /// The display symbol (first alias, empty for the identity)
    pub fn symbol(&self) -> &str {
        self.symbols.first().map(|s| s.as_str()).unwrap_or("")
    }

    /// The same unit with its offset stripped
    pub fn delta(&self) -> Self {
        let mut unit = self.clone();
        unit.offset = 0.0;
        unit
    }

    /// True when this unit carries an additive offset
    pub fn is_affine(&self) -> bool {
        self.offset.abs() > EPS
    }
}

/// A base unit decorated by one prefix
///
/// Derived values (symbol, name, coeff) are computed from the parts;
/// swapping the prefix builds a new value instead of mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixedUnit {
    pub prefix: Prefix,
    pub base_unit: SimpleUnit,
}

impl PrefixedUnit {
    pub fn new(prefix: Prefix, base_unit: SimpleUnit) -> Self {
        PrefixedUnit { prefix, base_unit }
    }

    /// The display symbol, `prefix + base symbol`
    pub fn symbol(&self) -> String {
        format!("{}{}", self.prefix.symbol, self.base_unit.symbol())
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.prefix.name, self.base_unit.name)
    }

    /// `base coeff * prefix factor`
    pub fn coeff(&self) -> f64 {
        self.base_unit.coeff * self.prefix.factor()
    }

    /// A new prefixed unit over the same base with another prefix
    pub fn with_prefix(&self, prefix: Prefix) -> Self {
        PrefixedUnit::new(prefix, self.base_unit.clone())
    }
}

/// One factor of a compound unit: a base unit raised to `unit_exp`,
/// carrying accumulated prefix scale `prefix_base^prefix_exp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub unit: SimpleUnit,
    pub unit_exp: f64,
    pub prefix_base: f64,
    pub prefix_exp: f64,
    /// Display prefix assigned by the normalizer; None before normalization
    pub chosen_prefix: Option<Prefix>,
}

impl Component {
    /// Scale contributed to the compound coefficient
    pub fn scale(&self) -> f64 {
        self.prefix_base.powf(self.prefix_exp) * self.unit.coeff.powf(self.unit_exp)
    }
}

/// A product of base units raised to exponents, each optionally prefixed
///
/// Components are keyed by the base unit's display symbol. An empty
/// component list is the dimensionless identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompoundUnit {
    pub components: Vec<Component>,
}

impl CompoundUnit {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.components.iter().position(|c| c.unit.symbol() == key)
    }

    /// Lift any unit variant into compound form
    pub fn from_unit(unit: &Unit) -> CompoundUnit {
        match unit {
            Unit::Simple(u) => {
                if u.symbol().is_empty() {
                    return CompoundUnit::default();
                }
                CompoundUnit {
                    components: vec![Component {
                        unit: u.clone(),
                        unit_exp: 1.0,
                        prefix_base: u.base,
                        prefix_exp: 0.0,
                        chosen_prefix: None,
                    }],
                }
            }
            Unit::Prefixed(p) => CompoundUnit {
                components: vec![Component {
                    unit: p.base_unit.clone(),
                    unit_exp: 1.0,
                    prefix_base: p.prefix.base,
                    prefix_exp: p.prefix.exponent,
                    chosen_prefix: None,
                }],
            },
            Unit::Compound(c) => c.clone(),
        }
    }

    /// Merge another compound in multiplicatively
    pub fn multiply(&self, other: &CompoundUnit) -> Result<CompoundUnit, MensuraError> {
        let mut result = self.clone();
        for comp in &other.components {
            match result.find(comp.unit.symbol()) {
                Some(i) => {
                    let existing = &mut result.components[i];
                    if existing.prefix_exp.abs() > EPS
                        && comp.prefix_exp.abs() > EPS
                        && !approx_eq(existing.prefix_base, comp.prefix_base)
                    {
                        return Err(MensuraError::Prefix(format!(
                            "incompatible prefix radices for '{}'",
                            comp.unit.symbol()
                        )));
                    }
                    if existing.prefix_exp.abs() <= EPS {
                        existing.prefix_base = comp.prefix_base;
                    }
                    existing.unit_exp += comp.unit_exp;
                    existing.prefix_exp += comp.prefix_exp;
                }
                None => result.components.push(comp.clone()),
            }
        }
        // drop factors that cancelled completely; reset stale prefix picks
        result.components.retain(|c| c.unit_exp.abs() > EPS || c.prefix_exp.abs() > EPS);
        for comp in &mut result.components {
            comp.chosen_prefix = None;
        }
        Ok(result)
    }

    /// Raise every component to a power
    pub fn power(&self, exp: f64) -> CompoundUnit {
        let mut result = self.clone();
        for comp in &mut result.components {
            comp.unit_exp *= exp;
            comp.prefix_exp *= exp;
            comp.chosen_prefix = None;
        }
        result.components.retain(|c| c.unit_exp.abs() > EPS || c.prefix_exp.abs() > EPS);
        result
    }

    pub fn dimension(&self) -> Dimension {
        let mut dim = Dimension::DIMENSIONLESS;
        for comp in &self.components {
            dim = dim.multiply(&comp.unit.dimension.power(comp.unit_exp));
        }
        dim
    }

    pub fn coeff(&self) -> f64 {
        self.components.iter().map(Component::scale).product()
    }

    /// Offsets survive only on a lone component with exponent 1
    pub fn offset(&self) -> f64 {
        match self.components.as_slice() {
            [only] if approx_eq(only.unit_exp, 1.0) => only.unit.offset,
            _ => 0.0,
        }
    }

    /// Strip offsets from every component
    pub fn delta(&self) -> CompoundUnit {
        CompoundUnit {
            components: self
                .components
                .iter()
                .map(|c| Component { unit: c.unit.delta(), ..c.clone() })
                .collect(),
        }
    }

    /// Components sorted by descending unit exponent (render order)
    pub fn sorted_components(&self) -> Vec<Component> {
        let mut comps = self.components.clone();
        comps.sort_by(|a, b| {
            b.unit_exp
                .partial_cmp(&a.unit_exp)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        comps
    }

    /// Un-normalized symbol, base symbols only (diagnostics; display of
    /// results goes through the registry's prefix normalizer instead)
    pub fn raw_symbol(&self) -> String {
        let parts: Vec<String> = self
            .sorted_components()
            .iter()
            .filter(|c| c.unit_exp.abs() > EPS)
            .map(|c| {
                if approx_eq(c.unit_exp, 1.0) {
                    c.unit.symbol().to_string()
                } else {
                    format!("{}^{}", c.unit.symbol(), format_exponent(c.unit_exp))
                }
            })
            .collect();
        parts.join("*")
    }
}

/// Render an exponent without a trailing `.0` when it is integral
pub(crate) fn format_exponent(exp: f64) -> String {
    if is_integral(exp) {
        format!("{}", exp.round() as i64)
    } else {
        format!("{}", exp)
    }
}

/// Any unit: the closed union over the three shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Unit {
    Simple(SimpleUnit),
    Prefixed(PrefixedUnit),
    Compound(CompoundUnit),
}

impl Unit {
    /// The dimensionless identity
    pub fn one() -> Unit {
        Unit::Simple(SimpleUnit::one())
    }

    pub fn symbol(&self) -> String {
        match self {
            Unit::Simple(u) => u.symbol().to_string(),
            Unit::Prefixed(p) => p.symbol(),
            Unit::Compound(c) => c.raw_symbol(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Unit::Simple(u) => u.name.clone(),
            Unit::Prefixed(p) => p.name(),
            Unit::Compound(c) => c.raw_symbol(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Simple(u) => u.dimension,
            Unit::Prefixed(p) => p.base_unit.dimension,
            Unit::Compound(c) => c.dimension(),
        }
    }

    pub fn coeff(&self) -> f64 {
        match self {
            Unit::Simple(u) => u.coeff,
            Unit::Prefixed(p) => p.coeff(),
            Unit::Compound(c) => c.coeff(),
        }
    }

    pub fn offset(&self) -> f64 {
        match self {
            Unit::Simple(u) => u.offset,
            Unit::Prefixed(p) => p.base_unit.offset,
            Unit::Compound(c) => c.offset(),
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension().is_dimensionless()
    }

    /// The same unit with additive offsets stripped
    pub fn delta(&self) -> Unit {
        match self {
            Unit::Simple(u) => Unit::Simple(u.delta()),
            Unit::Prefixed(p) => {
                Unit::Prefixed(PrefixedUnit::new(p.prefix.clone(), p.base_unit.delta()))
            }
            Unit::Compound(c) => Unit::Compound(c.delta()),
        }
    }

    /// Elementwise dimension equality
    pub fn is_same_dimension(&self, other: &Unit) -> bool {
        self.dimension().is_same(&other.dimension())
    }

    /// Same dimension and coefficient, offsets ignored
    pub fn is_delta_equal(&self, other: &Unit) -> bool {
        self.is_same_dimension(other) && approx_eq(self.coeff(), other.coeff())
    }

    /// Same dimension, coefficient, and offset
    pub fn is_equal(&self, other: &Unit) -> bool {
        self.is_delta_equal(other) && approx_eq(self.offset(), other.offset())
    }

    /// unit × unit → compound unit (delta semantics)
    pub fn multiply(&self, other: &Unit) -> Result<Unit, MensuraError> {
        let product =
            CompoundUnit::from_unit(self).multiply(&CompoundUnit::from_unit(other))?;
        Ok(Unit::Compound(product))
    }

    /// unit ÷ unit → compound unit (delta semantics)
    pub fn divide(&self, other: &Unit) -> Result<Unit, MensuraError> {
        self.multiply(&other.power(-1.0))
    }

    /// unit ^ exponent → compound unit; the exponent need not be integral
    pub fn power(&self, exp: f64) -> Unit {
        Unit::Compound(CompoundUnit::from_unit(self).power(exp))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
