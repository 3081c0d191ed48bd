#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(any(feature = "std", docsrs))]
extern crate std;

#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(any(docsrs, feature = "std"))]
pub use std::{error::Error, vec::Vec};

#[cfg(all(not(feature = "std"), feature = "error_in_core"))]
pub use core::error::Error;
