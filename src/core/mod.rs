//! Shared foundations: error taxonomy, rounding, Swiss display
//! formatting, and enterprise identification (UID) numbers.

mod che;
mod error;
mod format;

pub use che::*;
pub use error::*;
pub use format::*;
