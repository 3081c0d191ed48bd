//! Numeric constants and loop ceilings used throughout the crate.
//!
//! The ceilings are part of the crate's contract: every internal loop is
//! bounded either by a convergence check or by one of these, so a call can
//! never spin forever under floating-point noise. Callers that depend on
//! the at-the-ceiling fallback behavior should treat these values as fixed.

pub(crate) const MAX_SAFE_INT: u64 = (1u64 << 53) - 1;

/// Largest integer exactly representable in an `f64`, as an `f64`.
pub const MAX_SAFE_INTEGER_F: f64 = MAX_SAFE_INT as f64;

/// e^(1/e). Tetration towers of bases at or below this converge to a finite
/// limit instead of diverging.
pub const TETRATION_CONVERGENCE_BASE: f64 = 1.444667861009766;

/// Argument of the factorial function's local minimum.
pub const FACTORIAL_MIN_X: f64 = 0.4616321449683623;

/// Value of the factorial function at [`FACTORIAL_MIN_X`]; no smaller value
/// has a factorial inverse.
pub const FACTORIAL_MIN_VALUE: f64 = 0.8856031944108887;

/// Hard cap on adaptive-bisection iterations. When the cap is reached the
/// solver returns its best estimate instead of failing.
pub const BISECTION_ITERATION_LIMIT: usize = 10_000;

/// Default relative tolerance for the bisection solvers.
pub const DEFAULT_SOLVER_TOLERANCE: f64 = 1e-15;

/// Cap on the mantissa correction loops in the normalizers.
pub const CORRECTION_LOOP_LIMIT: usize = 100;

/// Cap on pentation rollover steps in `hypersplit`.
pub const PENTATION_LOOP_LIMIT: usize = 1_000;

/// Iterations used to settle the fixed point of a convergent tower.
pub const FIXED_POINT_ITERATION_LIMIT: usize = 100;

/// Cap on plain iterated exp/log loops, matching the break-eternity family
/// of substrates.
pub const HYPER_LOOP_LIMIT: usize = 100;

/// Cap on tower evaluation steps for bases barely above the convergence
/// threshold, where divergence is glacial.
pub const TOWER_ITERATION_LIMIT: usize = 10_000;

/// Width, in engineering steps on either side of zero, of the window where
/// the super-logarithm is considered too unstable to snap hyperexponents.
pub const SLOG_STABILITY_STEPS: usize = 10;

/// Fractional iteration counts of the polygon root finders require at least
/// this many sides; below it the interpolation is not monotone.
pub const POLYGON_STABLE_SIDES: f64 = 7.0;

/// Default mantissa rollover cap for `hypersplit`.
pub const DEFAULT_MANTISSA_CAP: f64 = 1e12;

/// Default smallest value `hypersplit` shows as a bare mantissa; anything
/// smaller gets a negative exponent.
pub const DEFAULT_MIN_VALUE: f64 = 1e-6;
