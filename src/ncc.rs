//! # Normalised cross-correlation block matching
//!
//! Dense local-window disparity estimation. For every pixel of the reference image the search
//! tries each horizontal shift up to the maximum search distance in the other image, scores the
//! two windows with the configured [`Correlation`] criterion and keeps the shift with the highest
//! score.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;
use std::time::Instant;

use serde::Deserialize;

use crate::correlation::Correlation;
use crate::disparity::{DisparityAlgorithm, DisparityMap};
use crate::error::*;
use crate::stereo::{GreyscaleImage, StereoPair};
use crate::sweep::{self, Execution, SweepControl};
use crate::window::{Patch, Window};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct Ncc {
    params: Params,
    window: Window
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Side length of the square correlation window, must be odd.
    pub window_size: usize,

    /// Largest disparity considered.
    pub max_search_dist: usize,

    #[serde(default)]
    pub correlation: Correlation,

    #[serde(default)]
    pub direction: SearchDirection,

    #[serde(default)]
    pub execution: Execution
}

/// Best candidate found for a single pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    pub disparity: u32,

    /// Score of the winning candidate, or `0.0` when no candidate scored above zero.
    pub correlation: f64
}

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// Disparity of the left image: windows in the right image are searched towards the left.
    LeftToRight,

    /// Disparity of the right image: windows in the left image are searched towards the right.
    RightToLeft
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for SearchDirection {
    fn default() -> Self {
        SearchDirection::LeftToRight
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_size: 9,
            max_search_dist: 32,
            correlation: Correlation::default(),
            direction: SearchDirection::default(),
            execution: Execution::default()
        }
    }
}

impl Params {
    /// Parse parameters from a TOML document.
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Load parameters from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml(&src)
    }
}

impl Ncc {
    /// Create a new instance of the algorithm with the given parameters.
    ///
    /// Fails if the window size is even, zero or too large, or if the search distance does not
    /// fit in a disparity value.
    pub fn new(params: Params) -> Result<Self> {
        let window = Window::new(params.window_size)?;

        if params.max_search_dist > u32::MAX as usize {
            return Err(Error::SearchDistanceTooLarge(params.max_search_dist));
        }

        log::debug!("NCC disparity with parameters: {:?}", params);

        Ok(Self { params, window })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Largest disparity that keeps the candidate window inside the image at column `x`.
    fn search_limit(&self, x: usize, width: usize) -> usize {
        let half = self.window.half();

        let room = match self.params.direction {
            SearchDirection::LeftToRight => x.saturating_sub(half),
            SearchDirection::RightToLeft => width.saturating_sub(1).saturating_sub(half + x)
        };

        room.min(self.params.max_search_dist)
    }

    /// The image disparities are measured for and the image searched in.
    fn views<'a>(&self, pair: &'a StereoPair) -> (&'a GreyscaleImage, &'a GreyscaleImage) {
        match self.params.direction {
            SearchDirection::LeftToRight => (pair.left(), pair.right()),
            SearchDirection::RightToLeft => (pair.right(), pair.left())
        }
    }

    /// Search all candidate disparities for the pixel at `(x, y)`.
    ///
    /// Only scores strictly greater than the best so far, starting from `0.0`, are accepted. A
    /// result of disparity 0 therefore also covers pixels where no candidate correlated
    /// positively or every candidate was degenerate.
    pub fn best_match(&self, pair: &StereoPair, x: usize, y: usize) -> Match {
        let (reference, target) = self.views(pair);

        let mut best = Match {
            disparity: 0,
            correlation: 0.0
        };

        let reference_patch = Patch::new(reference, self.window, x as isize, y as isize);

        for d in 0..=self.search_limit(x, pair.width()) {
            let tx = match self.params.direction {
                SearchDirection::LeftToRight => x as isize - d as isize,
                SearchDirection::RightToLeft => x as isize + d as isize
            };
            let candidate = Patch::new(target, self.window, tx, y as isize);

            let score = self.params.correlation.score(self.window, &reference_patch, &candidate);

            if let Some(score) = score {
                if score > best.correlation {
                    best.correlation = score;
                    best.disparity = d as u32;
                }
            }
        }

        best
    }

    /// Compute the disparity map, reporting progress and honouring cancellation through
    /// `control`.
    pub fn compute_with(&self, pair: &StereoPair, control: &SweepControl) -> Result<DisparityMap> {
        let width = pair.width();
        let height = pair.height();
        let half = self.window.half();

        let mut disp_map = DisparityMap::new(width, height);

        // Interior only, the border stays at 0
        let xs = half..width.saturating_sub(half);
        let ys = half..height.saturating_sub(half);

        log::debug!(
            "Computing {}x{} disparity map, {} interior rows, {:?} execution",
            width, height, ys.len(), self.params.execution
        );
        let start = Instant::now();

        sweep::run_rows(&mut disp_map, ys.clone(), self.params.execution, control, |y, row| {
            for x in xs.clone() {
                row[x] = self.best_match(pair, x, y).disparity;
            }
        })?;

        disp_map.update_range(xs, ys);

        log::debug!(
            "Disparity map complete in {:?}, range {:?}..{:?}",
            start.elapsed(), disp_map.min_disp, disp_map.max_disp
        );

        Ok(disp_map)
    }
}

impl DisparityAlgorithm for Ncc {
    /// Compute the disparity map for the given pair.
    fn compute(&mut self, pair: &StereoPair) -> Result<DisparityMap> {
        self.compute_with(pair, &SweepControl::new())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
