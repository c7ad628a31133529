//! Compound-unit prefix normalization
//!
//! A compound unit accumulates arbitrary prefix scale while it is being
//! built (`kg/L` carries a 10^3 on the gram component). Before display, a
//! prefix is chosen for each component so that the product of all
//! unaccounted scale - the leftover factor - is exactly 1, and the value
//! printed next to the unit needs no hidden correction.
//!
//! The normalizer runs an ordered sequence of passes over an explicit
//! (slots, leftover) state, one radix group at a time (decimal and binary
//! prefixes never mix on one component). Each pass only runs while the
//! leftover, rounded at LEFTOVER_EPS, still differs from 1. All passes are pure
//! over the group state and independently testable.

use crate::registry::UnitRegistry;
use crate::unit::{format_exponent, Component, CompoundUnit};
use crate::{Prefix, SimpleUnit};
use mensura_core::{approx_eq, is_integral, round_exp, MensuraError, EPS, LEFTOVER_EPS};

/// One component being fitted with a prefix
#[derive(Debug, Clone)]
struct Slot {
    unit: SimpleUnit,
    unit_exp: f64,
    /// Accumulated prefix exponent this slot has to account for
    prefix_exp: f64,
    chosen: Option<Prefix>,
    /// Set once a pass has accounted this slot exactly
    resolved: bool,
}

impl Slot {
    fn new(unit: SimpleUnit, unit_exp: f64, prefix_exp: f64) -> Self {
        Slot { unit, unit_exp, prefix_exp, chosen: None, resolved: false }
    }

    fn chosen_exp(&self) -> f64 {
        self.chosen.as_ref().map(|p| p.exponent).unwrap_or(0.0)
    }

    /// Prefix exponent not covered by the chosen prefix
    fn unaccounted(&self) -> f64 {
        self.prefix_exp - self.chosen_exp() * self.unit_exp
    }

    /// The exponent a single prefix would need to account this slot alone
    fn needed(&self) -> f64 {
        round_exp(self.prefix_exp / self.unit_exp)
    }
}

/// All slots sharing one prefix radix, plus the radix-wide leftover
#[derive(Debug)]
struct RadixGroup {
    base: f64,
    /// Available prefixes of this radix, descending by exponent
    prefixes: Vec<Prefix>,
    slots: Vec<Slot>,
    /// Prefixable base units from cancelled (exponent 0) components,
    /// kept for the synthesize pass
    spares: Vec<SimpleUnit>,
    /// Leftover exponent contributed by cancelled components
    folded: f64,
}

impl RadixGroup {
    /// Leftover exponent of the whole group, rounded at LEFTOVER_EPS
    fn leftover(&self) -> f64 {
        round_exp(self.folded + self.slots.iter().map(Slot::unaccounted).sum::<f64>())
    }

    fn resolved(&self) -> bool {
        self.leftover().abs() <= LEFTOVER_EPS
    }

    /// Prefixes this slot may take (none for unprefixable units)
    fn allowed(&self, slot: &Slot) -> &[Prefix] {
        if slot.unit.prefixable {
            &self.prefixes
        } else {
            &[]
        }
    }

    /// An exact prefix for the given exponent; `Some(None)` means "no
    /// prefix" (exponent 0), `None` means no representation exists
    fn exact(&self, prefixes: &[Prefix], exp: f64) -> Option<Option<Prefix>> {
        let exp = round_exp(exp);
        if exp.abs() <= LEFTOVER_EPS {
            return Some(None);
        }
        prefixes
            .iter()
            .find(|p| approx_eq(p.exponent, exp))
            .map(|p| Some(p.clone()))
    }
}

/// Pass 2: assign a prefix whose exponent exactly matches
/// `prefix_exp / unit_exp`
fn pass_exact(group: &mut RadixGroup) {
    for i in 0..group.slots.len() {
        let needed = group.slots[i].needed();
        if let Some(choice) = group.exact(group.allowed(&group.slots[i]), needed) {
            group.slots[i].chosen = choice;
            group.slots[i].resolved = true;
        }
    }
}

/// Pass 3: for unresolved slots, take the largest prefix not exceeding the
/// needed exponent; the remainder stays in the leftover
fn pass_best_fit(group: &mut RadixGroup) {
    for i in 0..group.slots.len() {
        if group.slots[i].resolved {
            continue;
        }
        let needed = group.slots[i].needed();
        let pick = group
            .allowed(&group.slots[i])
            .iter()
            .find(|p| p.exponent <= needed + LEFTOVER_EPS)
            .cloned();
        if let Some(p) = pick {
            group.slots[i].chosen = Some(p);
            group.slots[i].resolved = true;
        }
    }
}

/// Pass 4: try absorbing the whole leftover into one slot by moving it to
/// a better-fitting prefix
fn pass_upgrade(group: &mut RadixGroup) {
    for i in 0..group.slots.len() {
        let leftover = group.leftover();
        if leftover.abs() <= LEFTOVER_EPS {
            return;
        }
        let slot = &group.slots[i];
        if slot.unit_exp.abs() <= EPS {
            continue;
        }
        let want = slot.chosen_exp() + leftover / slot.unit_exp;
        if let Some(choice) = group.exact(group.allowed(slot), want) {
            group.slots[i].chosen = choice;
            group.slots[i].resolved = true;
        }
    }
}

/// Pass 5: over every same-radix pair, find the prefix shift on one slot
/// whose complementary shift on the other minimizes the residual mismatch.
/// Ties keep the first candidate encountered (slots are ordered by
/// descending unit exponent, prefixes by descending exponent).
fn pass_pairwise(group: &mut RadixGroup) {
    let leftover = group.leftover();
    if leftover.abs() <= LEFTOVER_EPS {
        return;
    }
    let mut best: Option<(usize, Option<Prefix>, usize, Option<Prefix>, f64)> = None;

    for i in 0..group.slots.len() {
        for j in (i + 1)..group.slots.len() {
            let (si, sj) = (&group.slots[i], &group.slots[j]);
            if si.unit_exp.abs() <= EPS || sj.unit_exp.abs() <= EPS {
                continue;
            }
            let mut candidates_i: Vec<Option<Prefix>> =
                vec![None];
            candidates_i.extend(group.allowed(si).iter().cloned().map(Some));
            let mut candidates_j: Vec<Option<Prefix>> =
                vec![None];
            candidates_j.extend(group.allowed(sj).iter().cloned().map(Some));

            for pi in &candidates_i {
                let exp_i = pi.as_ref().map(|p| p.exponent).unwrap_or(0.0);
                let shift_i = exp_i - si.chosen_exp();
                for pj in &candidates_j {
                    let exp_j = pj.as_ref().map(|p| p.exponent).unwrap_or(0.0);
                    let shift_j = exp_j - sj.chosen_exp();
                    let residual =
                        (leftover - shift_i * si.unit_exp - shift_j * sj.unit_exp).abs();
                    let improves = match &best {
                        None => residual < leftover.abs() - LEFTOVER_EPS,
                        Some((.., best_residual)) => residual < best_residual - LEFTOVER_EPS,
                    };
                    if improves {
                        best = Some((i, pi.clone(), j, pj.clone(), residual));
                    }
                }
            }
        }
    }

    if let Some((i, pi, j, pj, _)) = best {
        group.slots[i].chosen = pi;
        group.slots[i].resolved = true;
        group.slots[j].chosen = pj;
        group.slots[j].resolved = true;
    }
}

/// Pass 6: split a slot with unit exponent >= 2 into exponents (n-1, 1) so
/// the two halves can carry different prefixes. The high half re-runs the
/// best-fit search against the full target (largest prefix not exceeding
/// it); the remainder must be exactly representable on the low half.
fn pass_split(group: &mut RadixGroup) {
    for i in 0..group.slots.len() {
        let leftover = group.leftover();
        if leftover.abs() <= LEFTOVER_EPS {
            return;
        }
        let slot = group.slots[i].clone();
        if !slot.unit.prefixable || !is_integral(slot.unit_exp) || slot.unit_exp < 2.0 {
            continue;
        }
        // total prefix exponent the split pair must account for
        let target = slot.prefix_exp + leftover - slot.unaccounted();
        let high_exp = slot.unit_exp - 1.0;
        for p in group.allowed(&slot).iter().cloned().collect::<Vec<_>>() {
            let high_prefix_exp = p.exponent * high_exp;
            if high_prefix_exp > target + LEFTOVER_EPS {
                continue;
            }
            let rest = round_exp(target - high_prefix_exp);
            if let Some(low) = group.exact(group.allowed(&slot), rest) {
                let mut high_slot = Slot::new(slot.unit.clone(), high_exp, high_prefix_exp);
                high_slot.chosen = Some(p);
                high_slot.resolved = true;
                let mut low_slot =
                    Slot::new(slot.unit.clone(), 1.0, slot.prefix_exp - high_prefix_exp);
                low_slot.chosen = low;
                low_slot.resolved = true;
                group.slots[i] = high_slot;
                group.slots.insert(i + 1, low_slot);
                return;
            }
        }
    }
}

/// Pass 7: a cancelled (exponent 0) prefixable component can re-enter as a
/// +1/-1 pair of the same base unit whose prefix ratio equals the leftover
fn pass_synthesize(group: &mut RadixGroup) {
    let leftover = group.leftover();
    if leftover.abs() <= LEFTOVER_EPS {
        return;
    }
    let Some(unit) = group.spares.iter().find(|u| u.prefixable).cloned() else {
        return;
    };
    // numerator: smallest prefix at or above the leftover; then walk up
    // until the denominator gap is exactly representable
    let mut ascending: Vec<Option<Prefix>> = vec![None];
    ascending.extend(group.prefixes.iter().rev().cloned().map(Some));
    for numer in ascending
        .iter()
        .filter(|p| p.as_ref().map(|p| p.exponent).unwrap_or(0.0) >= leftover - LEFTOVER_EPS)
    {
        let numer_exp = numer.as_ref().map(|p| p.exponent).unwrap_or(0.0);
        let denom_exp = round_exp(numer_exp - leftover);
        if let Some(denom) = group.exact(&group.prefixes, denom_exp) {
            let mut numer_slot = Slot::new(unit.clone(), 1.0, numer_exp);
            numer_slot.chosen = numer.clone();
            numer_slot.resolved = true;
            let mut denom_slot = Slot::new(unit.clone(), -1.0, -denom_exp);
            denom_slot.chosen = denom;
            denom_slot.resolved = true;
            group.slots.push(numer_slot);
            group.slots.push(denom_slot);
            // the pair absorbs exactly the folded scale it replaces
            group.folded -= leftover;
            return;
        }
    }
}

fn run_group(group: &mut RadixGroup) {
    pass_exact(group);
    if group.resolved() {
        return;
    }
    pass_best_fit(group);
    if group.resolved() {
        return;
    }
    pass_upgrade(group);
    if group.resolved() {
        return;
    }
    pass_pairwise(group);
    if group.resolved() {
        return;
    }
    pass_split(group);
    if group.resolved() {
        return;
    }
    pass_synthesize(group);
}

/// Choose display prefixes for every component of a compound unit.
///
/// The result has the same coefficient and dimension as the input; the
/// only change is which prefix carries each component's scale. Fails with
/// an internal error when no prefix assignment reaches a leftover of 1 -
/// never expected for compositions of registered units.
pub fn normalize(
    compound: &CompoundUnit,
    registry: &UnitRegistry,
) -> Result<CompoundUnit, MensuraError> {
    let mut groups: Vec<RadixGroup> = Vec::new();

    for comp in &compound.sorted_components() {
        let base = comp.prefix_base;
        let idx = match groups.iter().position(|g| approx_eq(g.base, base)) {
            Some(i) => i,
            None => {
                groups.push(RadixGroup {
                    base,
                    prefixes: registry.prefixes_for_base(base),
                    slots: Vec::new(),
                    spares: Vec::new(),
                    folded: 0.0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        if comp.unit_exp.abs() <= EPS {
            // cancelled component: scale folds into the leftover
            group.folded += comp.prefix_exp;
            group.spares.push(comp.unit.clone());
        } else {
            group.slots.push(Slot::new(comp.unit.clone(), comp.unit_exp, comp.prefix_exp));
        }
    }

    let mut components: Vec<Component> = Vec::new();
    for group in &mut groups {
        run_group(group);
        if !group.resolved() {
            return Err(MensuraError::unexpected(format!(
                "prefix normalization left a scale factor of {}^{}",
                group.base,
                group.leftover()
            )));
        }
        for slot in &group.slots {
            components.push(Component {
                unit: slot.unit.clone(),
                unit_exp: slot.unit_exp,
                prefix_base: group.base,
                prefix_exp: slot.chosen_exp() * slot.unit_exp,
                chosen_prefix: slot.chosen.clone(),
            });
        }
    }

    components.sort_by(|a, b| {
        b.unit_exp
            .partial_cmp(&a.unit_exp)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(CompoundUnit { components })
}

/// The normalized display symbol: `prefix+symbol[^exponent]` per
/// component, sorted by descending unit exponent, joined by `*`
pub fn normalized_symbol(
    compound: &CompoundUnit,
    registry: &UnitRegistry,
) -> Result<String, MensuraError> {
    let normalized = normalize(compound, registry)?;
    let parts: Vec<String> = normalized
        .components
        .iter()
        .filter(|c| c.unit_exp.abs() > EPS)
        .map(|c| {
            let prefix = c
                .chosen_prefix
                .as_ref()
                .map(|p| p.symbol.as_str())
                .unwrap_or("");
            if approx_eq(c.unit_exp, 1.0) {
                format!("{}{}", prefix, c.unit.symbol())
            } else {
                format!("{}{}^{}", prefix, c.unit.symbol(), format_exponent(c.unit_exp))
            }
        })
        .collect();
    Ok(parts.join("*"))
}
