use core::cmp::Ordering;

use num_traits::{One, Signed, Zero};

use crate::shims::Vec;
use crate::{DomainError, HyperReal};

/// A set of allowed exponent step sizes, generalizing classic engineering
/// notation (exponents in multiples of 3) to arbitrary mixed-radix grids.
///
/// The steps are kept sorted descending and deduplicated. A value `x >= 0`
/// decomposes greedily: each step takes `floor(remainder / step)` of the
/// remainder in turn, so the representable values are exactly those the
/// greedy rule reproduces. The default set `[1]` makes the three bucketing
/// functions behave as ordinary floor/ceiling by integers.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeringSet<D> {
    steps: Vec<D>,
}

impl<D: HyperReal> EngineeringSet<D> {
    /// Builds a set from the given steps, sorting and deduplicating.
    ///
    /// # Errors
    /// [`DomainError::EmptySteps`] for an empty list,
    /// [`DomainError::NonPositiveStep`] if any step is not strictly
    /// positive (NaN steps included).
    pub fn new(mut steps: Vec<D>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::EmptySteps);
        }
        for step in &steps {
            if !(*step > D::zero()) || step.is_nan() || step.is_infinite() {
                return Err(DomainError::NonPositiveStep);
            }
        }
        steps.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        steps.dedup_by(|a, b| a == b);
        Ok(Self { steps })
    }

    /// The single-step set `[step]`.
    pub fn single(step: D) -> Result<Self, DomainError> {
        let mut steps = Vec::new();
        steps.push(step);
        Self::new(steps)
    }

    /// The steps, sorted descending.
    pub fn steps(&self) -> &[D] {
        &self.steps
    }
}

impl<D: HyperReal> Default for EngineeringSet<D> {
    /// The integer grid: a single step of 1.
    fn default() -> Self {
        let mut steps = Vec::new();
        steps.push(D::one());
        Self { steps }
    }
}

/// Largest value no greater than `value` that the greedy mixed-radix rule
/// over `steps` can represent.
///
/// Negative inputs mirror: the result is the negation of the smallest
/// representable value at least `|value|`.
pub fn current_engineering_value<D: HyperReal>(value: &D, steps: &EngineeringSet<D>) -> D {
    if value.is_nan() {
        return value.clone();
    }
    if *value < D::zero() {
        return -ceiling_engineering(&value.abs(), steps);
    }
    greedy(value, steps)
}

/// Smallest representable value strictly greater than `value`.
///
/// For each step position, the candidate is that position's coefficient
/// incremented with every smaller position zeroed; the smallest candidate
/// above `value` wins. Negative inputs mirror through
/// [`previous_engineering_value`].
pub fn next_engineering_value<D: HyperReal>(value: &D, steps: &EngineeringSet<D>) -> D {
    if value.is_nan() || value.is_infinite() {
        return value.clone();
    }
    if *value < D::zero() {
        return -previous_engineering_value(&value.abs(), steps);
    }
    let mut prefix = D::zero();
    let mut remainder = value.clone();
    let mut best: Option<D> = None;
    for step in steps.steps() {
        let mut count = (remainder.clone() / step.clone()).floor();
        if count < D::zero() {
            count = D::zero();
        }
        let candidate = prefix.clone() + (count.clone() + D::one()) * step.clone();
        if candidate > *value {
            best = Some(match best {
                Some(held) if held <= candidate => held,
                _ => candidate,
            });
        }
        let taken = count * step.clone();
        prefix = prefix + taken.clone();
        remainder = remainder - taken;
    }
    match best {
        Some(found) => found,
        // unreachable for a validated set; fall back to the greedy value
        None => prefix,
    }
}

/// Largest representable value strictly less than `value`.
///
/// Inputs at or below zero mirror through [`next_engineering_value`], so
/// `previous(0)` is the negation of the smallest step.
pub fn previous_engineering_value<D: HyperReal>(value: &D, steps: &EngineeringSet<D>) -> D {
    if value.is_nan() || value.is_infinite() {
        return value.clone();
    }
    if !(*value > D::zero()) {
        return -next_engineering_value(&value.abs(), steps);
    }
    match strictly_below(value, steps.steps()) {
        Some(found) => found,
        None => D::zero(),
    }
}

fn greedy<D: HyperReal>(value: &D, steps: &EngineeringSet<D>) -> D {
    if !value.is_finite() {
        return value.clone();
    }
    let mut total = D::zero();
    let mut remainder = value.clone();
    for step in steps.steps() {
        let count = (remainder.clone() / step.clone()).floor();
        if count > D::zero() {
            let taken = count * step.clone();
            total = total + taken.clone();
            remainder = remainder - taken;
        }
    }
    total
}

/// Smallest representable value at least `value` (for `value >= 0`).
fn ceiling_engineering<D: HyperReal>(value: &D, steps: &EngineeringSet<D>) -> D {
    let current = greedy(value, steps);
    if current == *value {
        current
    } else {
        next_engineering_value(value, steps)
    }
}

/// Largest value representable with `steps` that is strictly below `bound`,
/// or `None` when nothing (not even zero) fits.
fn strictly_below<D: HyperReal>(bound: &D, steps: &[D]) -> Option<D> {
    if !(*bound > D::zero()) {
        return None;
    }
    let Some((step, rest)) = steps.split_first() else {
        return Some(D::zero());
    };
    let mut count = (bound.clone() / step.clone()).floor();
    if count < D::zero() {
        count = D::zero();
    }
    let mut taken = count.clone() * step.clone();
    if taken >= *bound {
        // exact multiple: drop one step and refill below it
        if count <= D::zero() {
            return strictly_below(bound, rest);
        }
        count = count - D::one();
        taken = count * step.clone();
    }
    let remainder = bound.clone() - taken.clone();
    let tail = strictly_below(&remainder, rest).unwrap_or_else(D::zero);
    Some(taken + tail)
}
