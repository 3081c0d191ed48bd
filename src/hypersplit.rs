use num_traits::{One, Signed, Zero};

use crate::constants::*;
use crate::engineering::{next_engineering_value, EngineeringSet};
use crate::scientific::{check_divergent_base, hyper_core, sci_core, Rounding};
use crate::{DomainError, HyperReal};

/// Four-level decomposition of a value: `pentation` tower-of-tower layers,
/// then `tetration` layers of exponentiation, then `mantissa * base^exponent`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hypersplit<D> {
    pub mantissa: D,
    pub exponent: D,
    pub tetration: D,
    pub pentation: D,
}

/// Configuration for [`hypersplit`].
///
/// `maximums` are the rollover caps for the mantissa, exponent, and
/// tetration levels: when a level's (multiplier-scaled) value reaches its
/// cap, responsibility shifts one level up. `original_maximums` are the
/// caps in effect while every level above the one being checked is still
/// zero, letting a notation switch forms at a different point the first
/// time. A level is disabled when its cap does not exceed its own
/// multiplier (the mantissa's multiplier being 1); a disabled mantissa
/// produces a unit mantissa with a fractional exponent, and a disabled
/// tetration level keeps pentation at zero as well.
///
/// Values in `(0, min_value)` are decomposed with a negative exponent;
/// values from `min_value` up to the mantissa cap pass through as a bare
/// mantissa.
#[derive(Debug, Clone)]
pub struct HypersplitOptions<'a, D> {
    pub base: D,
    pub maximums: [D; 3],
    pub original_maximums: [D; 3],
    pub min_value: D,
    pub rounding: Rounding<'a, D>,
    pub engineerings: EngineeringSet<D>,
    pub hyperengineerings: EngineeringSet<D>,
    pub pentaengineerings: EngineeringSet<D>,
    pub exp_multiplier: D,
    pub hyperexp_multiplier: D,
    pub pentaexp_multiplier: D,
}

impl<D: HyperReal> Default for HypersplitOptions<'static, D> {
    fn default() -> Self {
        let safe = D::from_f64(MAX_SAFE_INTEGER_F);
        let mantissa_cap = D::from_f64(DEFAULT_MANTISSA_CAP);
        Self {
            base: D::from_f64(10.0),
            maximums: [mantissa_cap.clone(), safe.clone(), safe.clone()],
            original_maximums: [mantissa_cap, safe.clone(), safe],
            min_value: D::from_f64(DEFAULT_MIN_VALUE),
            rounding: Rounding::None,
            engineerings: EngineeringSet::default(),
            hyperengineerings: EngineeringSet::default(),
            pentaengineerings: EngineeringSet::default(),
            exp_multiplier: D::one(),
            hyperexp_multiplier: D::one(),
            pentaexp_multiplier: D::one(),
        }
    }
}

/// Decomposes `value` into mantissa, exponent, tetration, and pentation
/// parts under the given caps.
///
/// Values the exponent level can hold stay there; when the scaled exponent
/// reaches its cap the tetration level engages (a super-logarithm snap
/// against the hyperengineering grid), and when the scaled tetration count
/// reaches *its* cap the value is pulled down by repeated super-logarithms
/// while the pentation count steps along its grid. Rollovers caused by
/// rounding re-run the level checks inside the same bounded loop, so a
/// mantissa rounded up to a level boundary lands in the next level instead
/// of printing out of range.
///
/// # Errors
/// [`DomainError::BaseTooSmall`] and [`DomainError::ConvergentBase`]; a
/// divergent tower is required here, unlike
/// [`hyperscientifify_with`](crate::hyperscientifify_with).
pub fn hypersplit<D: HyperReal>(
    value: &D,
    options: &HypersplitOptions<'_, D>,
) -> Result<Hypersplit<D>, DomainError> {
    let o = options;
    check_divergent_base(&o.base, &o.exp_multiplier)?;
    let effective = o.base.pow(&o.exp_multiplier.recip());
    let one = D::one();

    if value.is_nan() || value.is_infinite() {
        return Ok(Hypersplit {
            mantissa: value.clone(),
            exponent: D::zero(),
            tetration: D::zero(),
            pentation: D::zero(),
        });
    }
    if value.is_zero() {
        return Ok(Hypersplit {
            mantissa: D::zero(),
            exponent: D::zero(),
            tetration: D::zero(),
            pentation: D::zero(),
        });
    }
    if *value < D::zero() {
        let mut split = hypersplit(&value.abs(), options)?;
        split.mantissa = -split.mantissa;
        return Ok(split);
    }

    let mantissa_on = o.maximums[0] > one;
    let exponent_on = o.maximums[1] > o.exp_multiplier;
    let tetration_on = o.maximums[2] > o.hyperexp_multiplier;

    if *value < o.min_value {
        // too small for a bare mantissa: negative exponent form
        let (mantissa, exponent) =
            mantissa_exponent_stage(value, o, true, false, mantissa_on, exponent_on);
        return Ok(Hypersplit {
            mantissa,
            exponent: exponent * o.exp_multiplier.clone(),
            tetration: D::zero(),
            pentation: D::zero(),
        });
    }

    let mut working = value.clone();
    let mut pentation = D::zero();
    let mut budget = PENTATION_LOOP_LIMIT;

    'outer: loop {
        if tetration_on {
            // pull the working value under the tetration-level limit
            loop {
                let cap = if pentation.is_zero() {
                    &o.original_maximums[2]
                } else {
                    &o.maximums[2]
                };
                let height = cap.clone() / o.hyperexp_multiplier.clone();
                let limit = o.base.tetrate(&height, &one);
                if limit.is_nan() || working < limit || budget == 0 {
                    break;
                }
                let stepped = next_engineering_value(&pentation, &o.pentaengineerings);
                let mut count = stepped.clone() - pentation.clone();
                let mut slogs = 0;
                while count >= one && slogs < HYPER_LOOP_LIMIT {
                    working = working.slog(&effective);
                    count = count - one.clone();
                    slogs += 1;
                    if working.is_nan() {
                        break;
                    }
                }
                pentation = stepped;
                budget -= 1;
            }
        }

        // does the exponent level alone hold it, or does tetration engage?
        let mut tetration = D::zero();
        let mut payload = working.clone();
        if tetration_on {
            let engaged = if exponent_on {
                let (_, raw_exponent) =
                    mantissa_exponent_stage(&working, o, pentation.is_zero(), true, mantissa_on, exponent_on);
                let cap = if pentation.is_zero() {
                    &o.original_maximums[1]
                } else {
                    &o.maximums[1]
                };
                raw_exponent * o.exp_multiplier.clone() >= *cap
            } else {
                let cap = if pentation.is_zero() {
                    &o.original_maximums[0]
                } else {
                    &o.maximums[0]
                };
                working >= *cap
            };
            if engaged {
                let (hypermantissa, snapped) = hyper_core(
                    &working,
                    &o.base,
                    &Rounding::None,
                    &D::zero(),
                    &o.hyperengineerings,
                );
                payload = hypermantissa;
                tetration = snapped;
                let cap = if pentation.is_zero() {
                    &o.original_maximums[2]
                } else {
                    &o.maximums[2]
                };
                if tetration.clone() * o.hyperexp_multiplier.clone() >= *cap && budget > 0 {
                    // the snap itself crossed the tetration cap: one more
                    // pentation step, then redo everything below it
                    let stepped = next_engineering_value(&pentation, &o.pentaengineerings);
                    let mut count = stepped.clone() - pentation.clone();
                    let mut slogs = 0;
                    while count >= one && slogs < HYPER_LOOP_LIMIT {
                        working = working.slog(&effective);
                        count = count - one.clone();
                        slogs += 1;
                    }
                    pentation = stepped;
                    budget -= 1;
                    continue 'outer;
                }
            }
        }

        // mantissa/exponent split, re-checking the tetration gap when
        // rounding pushes the payload over it
        let mut rolls = 0;
        loop {
            let higher_zero = tetration.is_zero() && pentation.is_zero();
            let (mantissa, exponent) =
                mantissa_exponent_stage(&payload, o, higher_zero, true, mantissa_on, exponent_on);
            if !tetration.is_zero() && rolls < CORRECTION_LOOP_LIMIT {
                let gap = next_engineering_value(&tetration, &o.hyperengineerings)
                    - tetration.clone();
                let bound = o.base.tetrate(&gap, &one);
                let rebuilt = mantissa.clone() * o.base.pow(&exponent);
                if !bound.is_nan() && rebuilt >= bound {
                    rolls += 1;
                    tetration = next_engineering_value(&tetration, &o.hyperengineerings);
                    payload = working.iteratedlog(&o.base, &tetration);
                    continue;
                }
            }
            return Ok(Hypersplit {
                mantissa,
                exponent: exponent * o.exp_multiplier.clone(),
                tetration: tetration * o.hyperexp_multiplier.clone(),
                pentation: pentation * o.pentaexp_multiplier.clone(),
            });
        }
    }
}

/// Splits a payload into mantissa and (unscaled) exponent under the level
/// configuration. `allow_plain` permits the bare-mantissa form when the
/// payload is under its cap; the sub-`min_value` path turns it off to force
/// a negative exponent.
fn mantissa_exponent_stage<D: HyperReal>(
    payload: &D,
    o: &HypersplitOptions<'_, D>,
    higher_zero: bool,
    allow_plain: bool,
    mantissa_on: bool,
    exponent_on: bool,
) -> (D, D) {
    if !mantissa_on {
        // logarithm form: unit mantissa, fractional exponent
        let exponent = o.rounding.apply(&payload.log(&o.base));
        return (D::one(), exponent);
    }
    if !exponent_on {
        return (o.rounding.apply(payload), D::zero());
    }
    let cap = if higher_zero {
        &o.original_maximums[0]
    } else {
        &o.maximums[0]
    };
    if allow_plain && payload < cap {
        let mantissa = o.rounding.apply(payload);
        if mantissa < *cap {
            return (mantissa, D::zero());
        }
        // rounded over the cap: fall through to the full split
    }
    sci_core(payload, &o.base, &o.rounding, &D::zero(), &o.engineerings)
}
