use num_traits::{Float, One, Signed, Zero};

use crate::constants::*;
use crate::{DomainError, HyperReal};

/// Inverts a strictly increasing `forward` function by adaptive bisection.
///
/// Starting from `seed`, the active bound is doubled upward (or halved
/// toward `floor`) until the probes change direction once; from then on the
/// bracket is bisected. Probes within `tolerance` (relative) of `target`
/// end the search, as does a bracket too narrow to split. After
/// [`BISECTION_ITERATION_LIMIT`] iterations the best estimate so far is
/// returned rather than failing.
pub(crate) fn solve_monotone<D: HyperReal>(
    target: &D,
    seed: D,
    floor: Option<&D>,
    tolerance: f64,
    forward: impl Fn(&D) -> D,
) -> D {
    let two = D::from_f64(2.0);
    let mut lower = match floor {
        Some(bound) => bound.clone(),
        None => D::zero(),
    };
    let mut upper = seed.clone();
    let mut guess = seed;
    let mut changed_direction = false;
    let mut last_climbing: Option<bool> = None;
    for _ in 0..BISECTION_ITERATION_LIMIT {
        let probe = forward(&guess);
        if within_tolerance(&probe, target, tolerance) {
            return guess;
        }
        let climbing = probe < *target;
        if let Some(previous) = last_climbing {
            if previous != climbing {
                changed_direction = true;
            }
        }
        last_climbing = Some(climbing);
        let next = if climbing {
            lower = guess.clone();
            if changed_direction {
                (lower.clone() + upper.clone()) / two.clone()
            } else {
                upper = guess * two.clone();
                upper.clone()
            }
        } else {
            upper = guess.clone();
            if changed_direction {
                (lower.clone() + upper.clone()) / two.clone()
            } else {
                (lower.clone() + guess) / two.clone()
            }
        };
        if changed_direction && (next == lower || next == upper) {
            // bracket exhausted at this precision
            return next;
        }
        guess = next;
    }
    guess
}

fn within_tolerance<D: HyperReal>(probe: &D, target: &D, tolerance: f64) -> bool {
    if probe == target {
        return true;
    }
    if probe.is_nan() {
        return false;
    }
    if target.is_zero() {
        return probe.abs() <= D::from_f64(tolerance);
    }
    match (probe.clone() / target.clone()).to_f64() {
        Some(ratio) => Float::abs(ratio - 1.0) <= tolerance,
        None => false,
    }
}

/// The factorial of `value`, continued to non-integers through the gamma
/// function, with Stirling's approximation past double range.
pub fn factorial<D: HyperReal>(value: &D) -> D {
    if value.is_nan() || value.is_infinite() {
        return value.clone();
    }
    if let Some(x) = value.to_f64() {
        // gamma overflows a double just past 170!
        if Float::abs(x) <= 170.0 {
            return D::from_f64(gamma(x + 1.0));
        }
    }
    let e = D::from_f64(core::f64::consts::E);
    let tau = D::from_f64(core::f64::consts::TAU);
    (value.clone() / e).pow(value) * (tau * value.clone()).sqrt()
}

/// Applies the factorial `iterations` times. Fractional counts interpolate
/// the final application linearly in log space; negative counts apply
/// [`inverse_factorial`] instead.
pub fn iterated_factorial<D: HyperReal>(value: &D, iterations: &D) -> Result<D, DomainError> {
    if iterations.is_nan() {
        return Ok(D::nan());
    }
    if *iterations < D::zero() {
        return inverse_factorial(value, &-iterations.clone());
    }
    let whole = iterations.floor();
    let fraction = iterations.clone() - whole.clone();
    let mut result = value.clone();
    let mut applied = D::zero();
    let mut guard = 0;
    while applied < whole && guard < HYPER_LOOP_LIMIT {
        result = factorial(&result);
        applied = applied + D::one();
        guard += 1;
        if !result.is_finite() {
            return Ok(result);
        }
    }
    if fraction > D::zero() {
        let stepped = factorial(&result);
        result = log_lerp(&result, &stepped, &fraction);
    }
    Ok(result)
}

/// Inverts `iterations` applications of the factorial by adaptive
/// bisection.
///
/// # Errors
/// [`DomainError::BelowDomainMinimum`] when `value` is beneath the image of
/// the factorial minimum (x = [`FACTORIAL_MIN_X`]) under that many
/// iterations; below it the factorial is not increasing and the inverse
/// would be a guess.
pub fn inverse_factorial<D: HyperReal>(value: &D, iterations: &D) -> Result<D, DomainError> {
    if value.is_nan() || iterations.is_nan() {
        return Ok(D::nan());
    }
    if iterations.is_zero() {
        return Ok(value.clone());
    }
    if *iterations < D::zero() {
        return iterated_factorial(value, &-iterations.clone());
    }
    let min_x = D::from_f64(FACTORIAL_MIN_X);
    let min_reachable = iterated_factorial(&min_x, iterations)?;
    if *value < min_reachable {
        return Err(DomainError::BelowDomainMinimum);
    }
    if value.is_infinite() {
        return Ok(value.clone());
    }
    Ok(solve_monotone(
        value,
        D::from_f64(3.0),
        Some(&min_x),
        DEFAULT_SOLVER_TOLERANCE,
        |guess| match iterated_factorial(guess, iterations) {
            Ok(result) => result,
            Err(_) => D::nan(),
        },
    ))
}

/// How many factorial applications take `base` to `value`. Fractional and
/// negative counts follow the [`iterated_factorial`] conventions.
///
/// # Errors
/// [`DomainError::BaseTooSmall`] for `base <= 2` (1 and 2 are fixed points
/// of the factorial, so towers from them never move), and
/// [`DomainError::BelowDomainMinimum`] for `value <= 2`, which no chain of
/// inverse factorials from such a base can reach.
pub fn factorial_slog<D: HyperReal>(value: &D, base: &D) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*base > two) {
        return Err(DomainError::BaseTooSmall);
    }
    if value.is_nan() {
        return Ok(D::nan());
    }
    if !(*value > two) {
        return Err(DomainError::BelowDomainMinimum);
    }
    if value == base {
        return Ok(D::zero());
    }
    if value.is_infinite() {
        return Ok(value.clone());
    }
    // inverse chains bottom out at the factorial fixed point well before
    // this many applications
    let deepest = -D::from_f64(HYPER_LOOP_LIMIT as f64);
    Ok(solve_monotone(
        value,
        D::one(),
        Some(&deepest),
        DEFAULT_SOLVER_TOLERANCE,
        |count| match iterated_factorial(base, count) {
            Ok(result) => result,
            Err(_) => D::nan(),
        },
    ))
}

/// The `value`-th `sides`-gonal number: `((s-2)v^2 - (s-4)v) / 2`.
pub fn polygon<D: HyperReal>(value: &D, sides: &D) -> D {
    let two = D::from_f64(2.0);
    let four = D::from_f64(4.0);
    ((sides.clone() - two.clone()) * value.clone() * value.clone()
        - (sides.clone() - four) * value.clone())
        / two
}

/// Closed-form inverse of [`polygon`] in its first argument.
///
/// # Errors
/// [`DomainError::TooFewSides`] for `sides <= 2`, where the quadratic
/// degenerates.
pub fn polygon_root<D: HyperReal>(value: &D, sides: &D) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    let four = D::from_f64(4.0);
    let eight = D::from_f64(8.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    let s2 = sides.clone() - two.clone();
    let s4 = sides.clone() - four;
    let discriminant = s4.clone() * s4.clone() + eight * s2.clone() * value.clone();
    Ok((s4 + discriminant.sqrt()) / (two * s2))
}

/// [`bi_polygon_with`] from the standard seed of 2 (the fixed start where
/// one application of [`polygon`] yields `sides` itself).
pub fn bi_polygon<D: HyperReal>(count: &D, sides: &D) -> Result<D, DomainError> {
    bi_polygon_with(count, sides, &D::from_f64(2.0))
}

/// `polygon(·, sides)` iterated `count` times starting from `seed`.
/// Fractional counts interpolate the final application in log space;
/// negative counts apply [`polygon_root`].
pub fn bi_polygon_with<D: HyperReal>(
    count: &D,
    sides: &D,
    seed: &D,
) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if count.is_nan() {
        return Ok(D::nan());
    }
    if *count < D::zero() {
        return iterated_polygon_root(seed, sides, &-count.clone());
    }
    let whole = count.floor();
    let fraction = count.clone() - whole.clone();
    let mut result = seed.clone();
    let mut applied = D::zero();
    let mut guard = 0;
    while applied < whole && guard < HYPER_LOOP_LIMIT {
        result = polygon(&result, sides);
        applied = applied + D::one();
        guard += 1;
        if !result.is_finite() {
            return Ok(result);
        }
    }
    if fraction > D::zero() {
        let stepped = polygon(&result, sides);
        result = log_lerp(&result, &stepped, &fraction);
    }
    Ok(result)
}

/// Inverse of [`bi_polygon`]: how many polygon applications take the seed
/// of 2 to `value`. Found by adaptive bisection; there is no closed form
/// for the iteration count.
pub fn bi_polygon_root<D: HyperReal>(value: &D, sides: &D) -> Result<D, DomainError> {
    bi_polygon_root_with(value, sides, &D::from_f64(2.0))
}

/// Inverse of [`bi_polygon_with`] in its count argument.
///
/// # Errors
/// [`DomainError::TooFewSides`] as for the forward function, and
/// [`DomainError::BelowDomainMinimum`] for `value <= 1`: 1 is the polygon
/// fixed point that inverse chains approach but never pass.
pub fn bi_polygon_root_with<D: HyperReal>(
    value: &D,
    sides: &D,
    seed: &D,
) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if value.is_nan() {
        return Ok(D::nan());
    }
    if !(*value > D::one()) {
        return Err(DomainError::BelowDomainMinimum);
    }
    if value == seed {
        return Ok(D::zero());
    }
    if value.is_infinite() {
        return Ok(value.clone());
    }
    let deepest = -D::from_f64(HYPER_LOOP_LIMIT as f64);
    let seed = seed.clone();
    Ok(solve_monotone(
        value,
        D::one(),
        Some(&deepest),
        DEFAULT_SOLVER_TOLERANCE,
        |count| match bi_polygon_with(count, sides, &seed) {
            Ok(result) => result,
            Err(_) => D::nan(),
        },
    ))
}

/// `bi_polygon(·, sides)` iterated `count` times starting from `seed`.
pub fn tri_polygon_with<D: HyperReal>(
    count: &D,
    sides: &D,
    seed: &D,
) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if count.is_nan() {
        return Ok(D::nan());
    }
    if *count < D::zero() {
        return iterated_bi_polygon_root(seed, sides, &-count.clone());
    }
    let whole = count.floor();
    let fraction = count.clone() - whole.clone();
    let mut result = seed.clone();
    let mut applied = D::zero();
    let mut guard = 0;
    while applied < whole && guard < HYPER_LOOP_LIMIT {
        result = bi_polygon_with(&result, sides, &two)?;
        applied = applied + D::one();
        guard += 1;
        if !result.is_finite() {
            return Ok(result);
        }
    }
    if fraction > D::zero() {
        let stepped = bi_polygon_with(&result, sides, &two)?;
        result = log_lerp(&result, &stepped, &fraction);
    }
    Ok(result)
}

/// [`tri_polygon_with`] from the standard seed of 2.
pub fn tri_polygon<D: HyperReal>(count: &D, sides: &D) -> Result<D, DomainError> {
    tri_polygon_with(count, sides, &D::from_f64(2.0))
}

/// Inverse of [`tri_polygon`] in its count argument, by adaptive bisection.
pub fn tri_polygon_root<D: HyperReal>(value: &D, sides: &D) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if value.is_nan() {
        return Ok(D::nan());
    }
    if !(*value > D::one()) {
        return Err(DomainError::BelowDomainMinimum);
    }
    if value.is_infinite() {
        return Ok(value.clone());
    }
    let deepest = -D::from_f64(HYPER_LOOP_LIMIT as f64);
    Ok(solve_monotone(
        value,
        D::one(),
        Some(&deepest),
        DEFAULT_SOLVER_TOLERANCE,
        |count| match tri_polygon(count, sides) {
            Ok(result) => result,
            Err(_) => D::nan(),
        },
    ))
}

/// [`polygon_root`] applied `iterations` times.
///
/// Non-integer iteration counts are only well-behaved for
/// `sides >= `[`POLYGON_STABLE_SIDES`]; below that the request returns NaN.
pub fn iterated_polygon_root<D: HyperReal>(
    value: &D,
    sides: &D,
    iterations: &D,
) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if value.is_nan() || iterations.is_nan() {
        return Ok(D::nan());
    }
    if !iterations.is_integer() && *sides < D::from_f64(POLYGON_STABLE_SIDES) {
        return Ok(D::nan());
    }
    let whole = iterations.floor();
    let fraction = iterations.clone() - whole.clone();
    let mut result = value.clone();
    let mut applied = D::zero();
    let mut guard = 0;
    while applied < whole && guard < HYPER_LOOP_LIMIT {
        result = polygon_root(&result, sides)?;
        applied = applied + D::one();
        guard += 1;
    }
    if fraction > D::zero() {
        let stepped = polygon_root(&result, sides)?;
        result = log_lerp(&result, &stepped, &fraction);
    }
    Ok(result)
}

/// [`bi_polygon_root`] applied `iterations` times, under the same
/// integer-only restriction for chaotic side counts.
pub fn iterated_bi_polygon_root<D: HyperReal>(
    value: &D,
    sides: &D,
    iterations: &D,
) -> Result<D, DomainError> {
    let two = D::from_f64(2.0);
    if !(*sides > two) {
        return Err(DomainError::TooFewSides);
    }
    if value.is_nan() || iterations.is_nan() {
        return Ok(D::nan());
    }
    if !iterations.is_integer() && *sides < D::from_f64(POLYGON_STABLE_SIDES) {
        return Ok(D::nan());
    }
    let whole = iterations.floor();
    let fraction = iterations.clone() - whole.clone();
    let mut result = value.clone();
    let mut applied = D::zero();
    let mut guard = 0;
    while applied < whole && guard < HYPER_LOOP_LIMIT {
        result = bi_polygon_root(&result, sides)?;
        applied = applied + D::one();
        guard += 1;
    }
    if fraction > D::zero() {
        let stepped = bi_polygon_root(&result, sides)?;
        result = log_lerp(&result, &stepped, &fraction);
    }
    Ok(result)
}

/// Interpolates between consecutive applications of an iterated function,
/// linearly in log space so the count stays monotone wherever the values
/// exceed 1.
fn log_lerp<D: HyperReal>(from: &D, to: &D, fraction: &D) -> D {
    if !from.is_finite() || !to.is_finite() {
        return to.clone();
    }
    if !(*from > D::zero()) || !(*to > D::zero()) {
        // no log to interpolate in; fall back to a plain lerp
        return from.clone() + (to.clone() - from.clone()) * fraction.clone();
    }
    (from.ln() * (D::one() - fraction.clone()) + to.ln() * fraction.clone()).exp()
}

const LANCZOS: [f64; 8] = [
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Lanczos approximation of the gamma function (g = 7, n = 9).
fn gamma(x: f64) -> f64 {
    use core::f64::consts::PI;
    if x.is_nan() {
        return x;
    }
    if x < 0.5 {
        // reflection formula
        return PI / (Float::sin(PI * x) * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut acc = 0.99999999999980993;
    for (index, coefficient) in LANCZOS.iter().enumerate() {
        acc += coefficient / (x + index as f64 + 1.0);
    }
    let t = x + 7.5;
    Float::sqrt(2.0 * PI) * Float::powf(t, x + 0.5) * Float::exp(-t) * acc
}
