//! # Disparity Computation
//!
//! This crate provides dense disparity map computation for rectified stereo pairs using
//! window-normalised cross-correlation block matching.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod disparity;
mod error;
pub mod correlation;
pub mod ncc;
pub mod stereo;
pub mod sweep;
pub mod window;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::disparity::{DisparityAlgorithm, DisparityMap};
    pub use crate::stereo::{GreyscaleImage, StereoPair};
    pub use crate::sweep::{Execution, Progress, SweepControl};
}
