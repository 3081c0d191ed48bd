use core::fmt::Debug;

use num_traits::{Float, Signed, ToPrimitive};

use crate::constants::*;

/// Capability surface the engine needs from an extended-precision number.
///
/// The normalizers and solvers never touch a concrete representation; they
/// work entirely through this trait, so any big-number type that can order,
/// do arithmetic, exponentiate, and climb the tetration ladder can drive
/// them. The `num_traits` supertraits carry the ordinary numeric operations;
/// the methods here add construction, predicates, rounding, and the
/// exponential/hyperoperator families.
///
/// Fractional tetration heights follow the piecewise-linear convention used
/// by the break-eternity family of substrates: `slog(v) = log_base(v)` for
/// `v` in `[1, base)` and `slog(v) = v - 1` for `v` in `[0, 1)`.
///
/// An implementation for [`f64`] ships with the crate. It is an adapter for
/// testing and for games that never leave double range, not a big-number
/// library of its own.
pub trait HyperReal: Clone + Debug + PartialOrd + Signed + ToPrimitive {
    fn from_f64(value: f64) -> Self;
    fn nan() -> Self;
    fn infinity() -> Self;
    fn neg_infinity() -> Self;

    fn is_nan(&self) -> bool;
    fn is_finite(&self) -> bool;
    fn is_infinite(&self) -> bool;
    /// Whether the value is an exact integer. Values beyond the
    /// safe-integer range count as integers.
    fn is_integer(&self) -> bool;

    fn floor(&self) -> Self;
    fn ceil(&self) -> Self;
    fn round(&self) -> Self;
    fn trunc(&self) -> Self;
    fn recip(&self) -> Self;

    fn pow(&self, exponent: &Self) -> Self;
    /// Arbitrary-base logarithm of `self`.
    fn log(&self, base: &Self) -> Self;

    fn ln(&self) -> Self {
        self.log(&Self::from_f64(core::f64::consts::E))
    }

    fn log10(&self) -> Self {
        self.log(&Self::from_f64(10.0))
    }

    fn exp(&self) -> Self {
        Self::from_f64(core::f64::consts::E).pow(self)
    }

    fn sqrt(&self) -> Self {
        self.pow(&Self::from_f64(0.5))
    }

    /// The tower `self^self^…^payload` of the given height, with `self` as
    /// the base. Negative heights peel logarithms off the payload instead.
    fn tetrate(&self, height: &Self, payload: &Self) -> Self;

    /// Super-logarithm: how many times `base` must be exponentiated to
    /// reach `self`.
    fn slog(&self, base: &Self) -> Self;

    /// `self` is the base; repeated exponentiation applied to `payload`.
    fn iteratedexp(&self, height: &Self, payload: &Self) -> Self {
        self.tetrate(height, payload)
    }

    /// `log(base)` applied `times` times to `self`.
    fn iteratedlog(&self, base: &Self, times: &Self) -> Self;
}

impl HyperReal for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn nan() -> Self {
        f64::NAN
    }

    #[inline]
    fn infinity() -> Self {
        f64::INFINITY
    }

    #[inline]
    fn neg_infinity() -> Self {
        f64::NEG_INFINITY
    }

    #[inline]
    fn is_nan(&self) -> bool {
        f64::is_nan(*self)
    }

    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    #[inline]
    fn is_infinite(&self) -> bool {
        f64::is_infinite(*self)
    }

    #[inline]
    fn is_integer(&self) -> bool {
        f64::is_finite(*self)
            && (Float::abs(*self) >= MAX_SAFE_INTEGER_F || *self % 1.0 == 0.0)
    }

    #[inline]
    fn floor(&self) -> Self {
        Float::floor(*self)
    }

    #[inline]
    fn ceil(&self) -> Self {
        Float::ceil(*self)
    }

    #[inline]
    fn round(&self) -> Self {
        Float::round(*self)
    }

    #[inline]
    fn trunc(&self) -> Self {
        Float::trunc(*self)
    }

    #[inline]
    fn recip(&self) -> Self {
        Float::recip(*self)
    }

    #[inline]
    fn pow(&self, exponent: &Self) -> Self {
        Float::powf(*self, *exponent)
    }

    fn log(&self, base: &Self) -> Self {
        // exact-ish paths keep round trips like log10(1e100) = 100 clean
        if *base == 10.0 {
            Float::log10(*self)
        } else if *base == core::f64::consts::E {
            Float::ln(*self)
        } else {
            Float::log(*self, *base)
        }
    }

    fn tetrate(&self, height: &Self, payload: &Self) -> Self {
        let base = *self;
        let height = *height;
        let payload = *payload;
        if base.is_nan() || height.is_nan() || payload.is_nan() {
            return f64::NAN;
        }
        if base <= 0.0 {
            return f64::NAN;
        }
        if height == f64::INFINITY {
            if base <= TETRATION_CONVERGENCE_BASE {
                return tower_fixed_point(base);
            }
            return f64::INFINITY;
        }
        if height < 0.0 {
            return HyperReal::iteratedlog(&payload, self, &-height);
        }
        let position = HyperReal::slog(&payload, self) + height;
        tower_from_slog(base, position)
    }

    fn slog(&self, base: &Self) -> Self {
        let base = *base;
        let mut x = *self;
        if base.is_nan() || x.is_nan() || base <= 1.0 {
            return f64::NAN;
        }
        if x == f64::INFINITY {
            return f64::INFINITY;
        }
        if x < 0.0 {
            return f64::NAN;
        }
        let mut result = 0.0;
        for _ in 0..HYPER_LOOP_LIMIT {
            if x <= 1.0 {
                return result + x - 1.0;
            }
            result += 1.0;
            x = HyperReal::log(&x, &base);
            if !x.is_finite() {
                return f64::NAN;
            }
        }
        result
    }

    fn iteratedlog(&self, base: &Self, times: &Self) -> Self {
        let times = *times;
        if times == 0.0 {
            return *self;
        }
        if times < 0.0 {
            return HyperReal::tetrate(base, &-times, self);
        }
        let whole = Float::trunc(times);
        let fraction = times - whole;
        let mut result = *self;
        let mut applied = 0.0;
        while applied < whole && applied < HYPER_LOOP_LIMIT as f64 {
            result = HyperReal::log(&result, base);
            applied += 1.0;
            if !result.is_finite() {
                return result;
            }
        }
        if fraction > 0.0 {
            let position = HyperReal::slog(&result, base) - fraction;
            result = tower_from_slog(*base, position);
        }
        result
    }
}

/// Evaluates `base^^position` for the linear-approximation slog convention.
fn tower_from_slog(base: f64, position: f64) -> f64 {
    if position.is_nan() {
        return f64::NAN;
    }
    if position == f64::INFINITY {
        return f64::INFINITY;
    }
    if position < -1.0 {
        return f64::NAN;
    }
    let whole = Float::floor(position);
    let mut value;
    let mut remaining;
    if position < 0.0 {
        // slog(v) = v - 1 on [0, 1)
        value = position + 1.0;
        remaining = 0.0;
    } else {
        value = Float::powf(base, position - whole);
        remaining = whole;
    }
    let mut steps = 0;
    while remaining >= 1.0 && steps < TOWER_ITERATION_LIMIT {
        value = Float::powf(base, value);
        remaining -= 1.0;
        steps += 1;
        if !value.is_finite() {
            return value;
        }
    }
    value
}

/// Limit of the tower `base^base^…` for a convergent base.
fn tower_fixed_point(base: f64) -> f64 {
    let mut x = 1.0;
    for _ in 0..FIXED_POINT_ITERATION_LIMIT {
        x = Float::powf(base, x);
    }
    x
}
