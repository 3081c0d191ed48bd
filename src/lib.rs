#![no_std]
//! Hyperscientific normalization and hyperoperator inversion for the
//! enormous (and minuscule) numbers of incremental games.
//!
//! Everything here is a pure function over a number type you bring along
//! by implementing [`HyperReal`]: decomposers that split a value into
//! mantissa/exponent pairs ([`scientifify`]), hypermantissa/hyperexponent
//! pairs ([`hyperscientifify`]), or a full four-level
//! mantissa/exponent/tetration/pentation form ([`hypersplit`]); the
//! engineering-grid bucketing those decomposers snap their exponents to;
//! and adaptive-bisection inverses for iterated functions with no closed
//! form ([`inverse_factorial`], [`factorial_slog`], the polygonal root
//! finders). String formatting is left to the notation layer on top.
//!
//! An implementation of [`HyperReal`] for [`f64`] is included for games
//! (and tests) that never leave double range.
//!
//! # Features
//!
//! Either `std` (default) or `libm` must be enabled to provide float math.
//! Enable `serde` for de/serialization of the decomposition forms, and
//! `error_in_core` on nightly no-std toolchains to keep the `Error` impl.
#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("either libm or the standard library must be included to use hypersci");

use core::fmt;

mod shims;
#[cfg(any(feature = "std", feature = "error_in_core"))]
use shims::Error;

pub mod constants;

mod engineering;
pub use engineering::{
    current_engineering_value, next_engineering_value, previous_engineering_value, EngineeringSet,
};

mod real;
pub use real::HyperReal;

mod scientific;
pub use scientific::{
    hyperscientifify, hyperscientifify_with, scientifify, scientifify_with, Hyperscientific,
    Rounding, Scientific,
};

mod hypersplit;
pub use hypersplit::{hypersplit, Hypersplit, HypersplitOptions};

mod inverse;
pub use inverse::{
    bi_polygon, bi_polygon_root, bi_polygon_root_with, bi_polygon_with, factorial,
    factorial_slog, inverse_factorial, iterated_bi_polygon_root, iterated_factorial,
    iterated_polygon_root, polygon, polygon_root, tri_polygon, tri_polygon_root,
    tri_polygon_with,
};

/// An invalid configuration or an input outside a function's supported
/// region. Sentinel numeric inputs (zero, infinity, NaN) are not errors;
/// they short-circuit to defined outputs instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The (multiplier-adjusted) base does not exceed 1, or a factorial
    /// tower was asked to grow from a base at or below its fixed points.
    BaseTooSmall,
    /// The base's tetration tower converges where divergence is required.
    ConvergentBase,
    /// An engineering set was built from no steps.
    EmptySteps,
    /// An engineering step was zero, negative, NaN, or infinite.
    NonPositiveStep,
    /// The value lies beneath the inverted function's reachable range.
    BelowDomainMinimum,
    /// Polygonal numbers need more than 2 sides.
    TooFewSides,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseTooSmall => write!(f, "base is too small to grow"),
            Self::ConvergentBase => {
                write!(f, "base's tetration tower converges; a divergent base is required")
            }
            Self::EmptySteps => write!(f, "engineering sets need at least one step"),
            Self::NonPositiveStep => {
                write!(f, "engineering steps must be strictly positive and finite")
            }
            Self::BelowDomainMinimum => {
                write!(f, "value lies below the function's reachable range")
            }
            Self::TooFewSides => write!(f, "polygonal numbers need more than 2 sides"),
        }
    }
}

#[cfg(any(feature = "std", feature = "error_in_core"))]
impl Error for DomainError {}
