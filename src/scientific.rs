use core::fmt;

use num_traits::{One, Signed, Zero};

use crate::constants::*;
use crate::engineering::{
    current_engineering_value, next_engineering_value, previous_engineering_value, EngineeringSet,
};
use crate::{DomainError, HyperReal};

/// How a normalizer rounds the mantissa it produces.
///
/// A step of zero (or any non-positive step) leaves the mantissa alone, so
/// `Multiple(D::zero())` and `None` are interchangeable.
pub enum Rounding<'a, D> {
    /// No rounding.
    None,
    /// Round to the nearest multiple of the step.
    Multiple(D),
    /// The step depends on the mantissa being rounded.
    Custom(&'a dyn Fn(&D) -> D),
}

impl<D: fmt::Debug> fmt::Debug for Rounding<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Multiple(step) => write!(f, "Multiple({step:?})"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl<D: Clone> Clone for Rounding<'_, D> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Multiple(step) => Self::Multiple(step.clone()),
            Self::Custom(step_of) => Self::Custom(*step_of),
        }
    }
}

impl<D> Default for Rounding<'_, D> {
    fn default() -> Self {
        Self::None
    }
}

impl<D: HyperReal> Rounding<'_, D> {
    /// Applies the policy to a value.
    pub fn apply(&self, value: &D) -> D {
        let step = match self {
            Self::None => return value.clone(),
            Self::Multiple(step) => step.clone(),
            Self::Custom(step_of) => step_of(value),
        };
        if !(step > D::zero()) || !step.is_finite() {
            return value.clone();
        }
        (value.clone() / step.clone()).round() * step
    }
}

/// Scientific decomposition: `value = mantissa * base^exponent`, with the
/// exponent on an engineering grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scientific<D> {
    pub mantissa: D,
    pub exponent: D,
}

impl<D: HyperReal> Scientific<D> {
    /// Reapplies the invariant, recombining the parts into a value.
    pub fn reconstruct(&self, base: &D) -> D {
        self.mantissa.clone() * base.pow(&self.exponent)
    }
}

/// Hyperscientific decomposition: `value = base^base^…^mantissa` with
/// `exponent` layers of exponentiation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hyperscientific<D> {
    pub mantissa: D,
    pub exponent: D,
}

impl<D: HyperReal> Hyperscientific<D> {
    /// Reapplies the invariant, recombining the parts into a value.
    pub fn reconstruct(&self, base: &D) -> D {
        base.iteratedexp(&self.exponent, &self.mantissa)
    }
}

/// [`scientifify_with`] under the default configuration: no rounding,
/// mantissa power 0, integer exponent grid, multiplier 1.
pub fn scientifify<D: HyperReal>(value: &D, base: &D) -> Result<Scientific<D>, DomainError> {
    scientifify_with(
        value,
        base,
        &Rounding::None,
        &D::zero(),
        &EngineeringSet::default(),
        &D::one(),
    )
}

/// Splits `value` into a mantissa and an engineering-grid exponent so that
/// `value = mantissa * base^exponent` (before rounding and before the
/// exponent is scaled by `exp_multiplier`).
///
/// The mantissa lands in `[base^mantissa_power, base^(mantissa_power + gap))`
/// where `gap` is the engineering gap at the chosen exponent. Rounding can
/// push it over either bound; a correction loop walks the exponent along
/// the grid until the rounded mantissa settles, snapping to the lower
/// boundary if the loop has pushed in both directions (a numerical
/// plateau). Exponents beyond the safe-integer range skip the loop and pin
/// the mantissa to its lower boundary.
///
/// # Errors
/// [`DomainError::BaseTooSmall`] when `base^(1/exp_multiplier) <= 1`, and
/// [`DomainError::ConvergentBase`] when it is at most e^(1/e).
pub fn scientifify_with<D: HyperReal>(
    value: &D,
    base: &D,
    rounding: &Rounding<'_, D>,
    mantissa_power: &D,
    engineerings: &EngineeringSet<D>,
    exp_multiplier: &D,
) -> Result<Scientific<D>, DomainError> {
    check_divergent_base(base, exp_multiplier)?;
    if value.is_nan() {
        return Ok(Scientific { mantissa: D::nan(), exponent: D::nan() });
    }
    if value.is_zero() {
        return Ok(Scientific { mantissa: D::zero(), exponent: D::neg_infinity() });
    }
    if value.is_infinite() {
        return Ok(Scientific { mantissa: value.clone(), exponent: D::infinity() });
    }
    if *value < D::zero() {
        let mut split = scientifify_with(
            &value.abs(),
            base,
            rounding,
            mantissa_power,
            engineerings,
            exp_multiplier,
        )?;
        split.mantissa = -split.mantissa;
        return Ok(split);
    }
    let (mantissa, exponent) = sci_core(value, base, rounding, mantissa_power, engineerings);
    Ok(Scientific { mantissa, exponent: exponent * exp_multiplier.clone() })
}

/// [`hyperscientifify_with`] under the default configuration.
pub fn hyperscientifify<D: HyperReal>(
    value: &D,
    base: &D,
) -> Result<Hyperscientific<D>, DomainError> {
    hyperscientifify_with(
        value,
        base,
        &Rounding::None,
        &D::zero(),
        &EngineeringSet::default(),
        &D::one(),
        &D::one(),
    )
}

/// The scientific split one hyperoperator level up: `value` becomes a
/// hypermantissa and a count of exponentiation layers, so that
/// `iteratedexp(base, exponent, mantissa)` reproduces it.
///
/// Bases whose tower converges (`base^(1/exp_multiplier)` at most e^(1/e))
/// return the tower's limit as the mantissa with an infinite hyperexponent
/// instead of erroring. Hyperexponents within
/// [`SLOG_STABILITY_STEPS`] engineering steps of zero return
/// `(value, 0)` directly, since the super-logarithm is too unstable there
/// to snap against the grid (the invariant holds trivially: zero layers of
/// exponentiation leave the mantissa as the value itself). Negative values
/// and NaN slogs land in the same direct form.
///
/// # Errors
/// [`DomainError::BaseTooSmall`] when `base^(1/exp_multiplier) <= 1`.
pub fn hyperscientifify_with<D: HyperReal>(
    value: &D,
    base: &D,
    rounding: &Rounding<'_, D>,
    hypermantissa_power: &D,
    hyperengineerings: &EngineeringSet<D>,
    exp_multiplier: &D,
    hyperexp_multiplier: &D,
) -> Result<Hyperscientific<D>, DomainError> {
    let effective = base.pow(&exp_multiplier.recip());
    if effective.is_nan() || !(effective > D::one()) {
        return Err(DomainError::BaseTooSmall);
    }
    if effective <= D::from_f64(TETRATION_CONVERGENCE_BASE) {
        return Ok(Hyperscientific {
            mantissa: tower_limit(&effective),
            exponent: D::infinity(),
        });
    }
    if value.is_nan() {
        return Ok(Hyperscientific { mantissa: D::nan(), exponent: D::nan() });
    }
    if value.is_infinite() {
        return Ok(Hyperscientific { mantissa: value.clone(), exponent: D::infinity() });
    }

    let position = value.slog(base);
    let mut window_high = D::zero();
    let mut window_low = D::zero();
    for _ in 0..SLOG_STABILITY_STEPS {
        window_high = next_engineering_value(&window_high, hyperengineerings);
        window_low = previous_engineering_value(&window_low, hyperengineerings);
    }
    if position.is_nan() || (position >= window_low && position <= window_high) {
        return Ok(Hyperscientific { mantissa: value.clone(), exponent: D::zero() });
    }

    let (mantissa, exponent) =
        hyper_core(value, base, rounding, hypermantissa_power, hyperengineerings);
    Ok(Hyperscientific { mantissa, exponent: exponent * hyperexp_multiplier.clone() })
}

/// Shared base validation: the effective base must exceed 1 and sit above
/// the tetration convergence threshold.
pub(crate) fn check_divergent_base<D: HyperReal>(
    base: &D,
    exp_multiplier: &D,
) -> Result<(), DomainError> {
    let effective = base.pow(&exp_multiplier.recip());
    if effective.is_nan() || !(effective > D::one()) {
        return Err(DomainError::BaseTooSmall);
    }
    if effective <= D::from_f64(TETRATION_CONVERGENCE_BASE) {
        return Err(DomainError::ConvergentBase);
    }
    Ok(())
}

/// Limit of the tower `base^base^…` for a convergent base.
pub(crate) fn tower_limit<D: HyperReal>(base: &D) -> D {
    let mut x = D::one();
    for _ in 0..FIXED_POINT_ITERATION_LIMIT {
        x = base.pow(&x);
    }
    x
}

/// Mantissa/exponent split of a positive finite value. No validation, no
/// exponent multiplier; both belong to the callers.
pub(crate) fn sci_core<D: HyperReal>(
    value: &D,
    base: &D,
    rounding: &Rounding<'_, D>,
    mantissa_power: &D,
    engineerings: &EngineeringSet<D>,
) -> (D, D) {
    let raw = value.log(base);
    let mut exponent =
        current_engineering_value(&(raw.clone() - mantissa_power.clone()), engineerings);
    let mut mantissa = base.pow(&(raw - exponent.clone()));

    if exponent.abs() > D::from_f64(MAX_SAFE_INTEGER_F) {
        // precision exhausted: pin the mantissa to its lower boundary
        return (base.pow(mantissa_power), exponent);
    }

    let lower = base.pow(mantissa_power);
    let mut rounded = rounding.apply(&mantissa);
    let mut raised = false;
    let mut lowered = false;
    for _ in 0..CORRECTION_LOOP_LIMIT {
        let gap = next_engineering_value(&exponent, engineerings) - exponent.clone();
        let upper = base.pow(&(mantissa_power.clone() + gap));
        if rounded >= upper {
            raised = true;
            let bumped = next_engineering_value(&exponent, engineerings);
            mantissa = rounded / base.pow(&(bumped.clone() - exponent));
            exponent = bumped;
        } else if rounded < lower {
            lowered = true;
            let dropped = previous_engineering_value(&exponent, engineerings);
            mantissa = rounded * base.pow(&(exponent - dropped.clone()));
            exponent = dropped;
        } else {
            mantissa = rounded;
            break;
        }
        if raised && lowered {
            // pushed both ways: a numerical plateau, snap to the boundary
            mantissa = lower;
            break;
        }
        rounded = rounding.apply(&mantissa);
    }
    (mantissa, exponent)
}

/// Hypermantissa/hyperexponent split of a positive finite value whose slog
/// is trustworthy. No validation, no multiplier, no stability window.
pub(crate) fn hyper_core<D: HyperReal>(
    value: &D,
    base: &D,
    rounding: &Rounding<'_, D>,
    hypermantissa_power: &D,
    hyperengineerings: &EngineeringSet<D>,
) -> (D, D) {
    let one = D::one();
    let position = value.slog(base);
    let mut exponent = current_engineering_value(
        &(position - hypermantissa_power.clone()),
        hyperengineerings,
    );
    let mut mantissa = value.iteratedlog(base, &exponent);

    if exponent.abs() > D::from_f64(MAX_SAFE_INTEGER_F) {
        return (base.tetrate(hypermantissa_power, &one), exponent);
    }

    let lower = base.tetrate(hypermantissa_power, &one);
    let mut rounded = rounding.apply(&mantissa);
    let mut raised = false;
    let mut lowered = false;
    for _ in 0..CORRECTION_LOOP_LIMIT {
        let gap = next_engineering_value(&exponent, hyperengineerings) - exponent.clone();
        let upper = base.tetrate(&(hypermantissa_power.clone() + gap), &one);
        if rounded >= upper {
            raised = true;
            exponent = next_engineering_value(&exponent, hyperengineerings);
            mantissa = value.iteratedlog(base, &exponent);
        } else if rounded < lower {
            lowered = true;
            exponent = previous_engineering_value(&exponent, hyperengineerings);
            mantissa = value.iteratedlog(base, &exponent);
        } else {
            mantissa = rounded;
            break;
        }
        if raised && lowered {
            mantissa = lower;
            break;
        }
        rounded = rounding.apply(&mantissa);
    }
    (mantissa, exponent)
}
