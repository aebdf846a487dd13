//! # Window correlation criteria
//!
//! Scores how well two windows match. Higher scores are better matches. All sums are accumulated
//! exactly over scaled integer deviations (see [`WindowStats::scaled_deviation`]); the score is a
//! ratio of sums of equal degree so the scaling does not change it.
//!
//! [`WindowStats::scaled_deviation`]: crate::window::WindowStats::scaled_deviation

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::window::{Patch, Window};

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// Sums the deviations instead of multiplying them:
    ///
    /// `upper = Σ(l + r)`, `lower_left = Σ(l + l)`, `lower_right = Σ(r + r)`.
    ///
    /// Deviations from a window's own mean sum to zero, so with exact accumulation every window
    /// is degenerate under this criterion and the search never leaves disparity 0.
    AdditiveDifference,

    /// Zero-mean normalised cross-correlation:
    ///
    /// `upper = Σ(l * r)`, `lower_left = Σ(l * l)`, `lower_right = Σ(r * r)`.
    ZeroMeanProduct
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Accumulators for a single candidate evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Sums {
    upper: i64,
    lower_left: i64,
    lower_right: i64
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for Correlation {
    fn default() -> Self {
        Correlation::AdditiveDifference
    }
}

impl Correlation {
    /// Score the match between two patches.
    ///
    /// Returns `None` when either denominator sum is zero or negative (uniform windows, or the
    /// additive criterion), in which case the candidate should be skipped.
    pub fn score(self, window: Window, reference: &Patch, candidate: &Patch) -> Option<f64> {
        let mut sums = Sums::default();

        for (wx, wy) in window.offsets() {
            let l = reference.deviation(wx, wy);
            let r = candidate.deviation(wx, wy);

            match self {
                Correlation::AdditiveDifference => {
                    sums.upper += l + r;
                    sums.lower_left += l + l;
                    sums.lower_right += r + r;
                }
                Correlation::ZeroMeanProduct => {
                    sums.upper += l * r;
                    sums.lower_left += l * l;
                    sums.lower_right += r * r;
                }
            }
        }

        sums.score()
    }
}

impl Sums {
    fn score(&self) -> Option<f64> {
        if self.lower_left <= 0 || self.lower_right <= 0 {
            return None;
        }

        // sqrt(a) * sqrt(b) taken as sqrt(a * b), which is exact when a == b
        let denom = (self.lower_left as f64 * self.lower_right as f64).sqrt();

        Some(self.upper as f64 / denom)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
