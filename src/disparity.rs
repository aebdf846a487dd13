//! # General disparity objects
//!
//! This module provides generic disparity traits and structures for use by different algorithms.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use image::GrayImage;
use crate::error::*;
use crate::stereo::StereoPair;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A dense integer disparity map.
///
/// Cells that were not computed (the border of an algorithm's window) hold `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisparityMap {
    width: usize,
    height: usize,
    data: Vec<u32>,
    pub max_disp: Option<u32>,
    pub min_disp: Option<u32>
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait DisparityAlgorithm {
    /// Compute the disparity map of the given stereo pair.
    fn compute(&mut self, pair: &StereoPair) -> Result<DisparityMap>;
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl DisparityMap {
    pub fn new(width: usize, height: usize) -> Self {
        DisparityMap {
            width,
            height,
            data: vec![0; width * height],
            min_disp: None,
            max_disp: None
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.width + x]
    }

    pub fn put(&mut self, x: usize, y: usize, val: u32) {
        self.data[y * self.width + x] = val;
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Mutable access to the raw row-major buffer, for sweeps that fill it row by row.
    pub(crate) fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Recompute `min_disp` and `max_disp` over the given rectangle of cells.
    pub(crate) fn update_range(
        &mut self,
        xs: std::ops::Range<usize>,
        ys: std::ops::Range<usize>
    ) {
        let mut min_disp = None;
        let mut max_disp = None;

        for y in ys {
            for x in xs.clone() {
                let val = self.get(x, y);
                min_disp = Some(min_disp.map_or(val, |m: u32| m.min(val)));
                max_disp = Some(max_disp.map_or(val, |m: u32| m.max(val)));
            }
        }

        self.min_disp = min_disp;
        self.max_disp = max_disp;
    }

    /// Converts the map into a Luma8 image, clamping values above 255.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let val = self.get(x as usize, y as usize).min(255);
            image::Luma([val as u8])
        })
    }

    /// Converts the map to a normalised GrayImage.
    ///
    /// Normalises by the maximum observed disparity in the map. If the maximum disparity is not
    /// set, or is zero, the function is equivalent to `.to_luma()`.
    pub fn to_luma_normalised(&self) -> GrayImage {
        let mult = match self.max_disp {
            Some(d) if d > 0 => 255.0 / d as f32,
            _ => 1.0
        };

        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let mut val = self.get(x as usize, y as usize) as f32 * mult;

            if val > 255.0 {
                val = 255.0;
            }

            image::Luma([val as u8])
        })
    }

    /// Save the normalised map as an image, the format is picked from the path's extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_luma_normalised().save(path)?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
