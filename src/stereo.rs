//! # Greyscale images and stereo pairs
//!
//! Immutable 8-bit greyscale buffers used as input to the disparity algorithms, and the pair type
//! grouping a rectified left and right view.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use image::{DynamicImage, GrayImage};
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A row-major greyscale image with one `u8` sample per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreyscaleImage {
    width: usize,
    height: usize,
    data: Vec<u8>
}

/// A rectified pair of equally sized greyscale images.
#[derive(Clone, Debug)]
pub struct StereoPair {
    left: GreyscaleImage,
    right: GreyscaleImage
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl GreyscaleImage {
    /// Create a black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height]
        }
    }

    /// Wrap a row-major sample buffer. The buffer must hold exactly `width * height` samples.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height;

        if data.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                expected,
                actual: data.len()
            });
        }

        Ok(Self { width, height, data })
    }

    pub fn from_luma(img: &GrayImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.as_raw().clone()
        }
    }

    /// Convert any decoded image into greyscale.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self::from_luma(&img.to_luma8())
    }

    /// Load and decode an image from disk, converting it to greyscale.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        Ok(Self::from_dynamic(&img))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Read the sample at `(x, y)`.
    ///
    /// Reads outside the image return `0` rather than failing or clamping to the nearest edge, so
    /// window code can run over the border without bounds branching.
    #[inline]
    pub fn get_pixel(&self, x: isize, y: isize) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }

        self.data[y as usize * self.width + x as usize]
    }

    /// Converts the image into an `image` crate luma buffer.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Luma([self.data[y as usize * self.width + x as usize]])
        })
    }

    /// Shrink the image by an integer factor.
    ///
    /// Every kept sample is the mean of a square mask centred on it, whose size is the closest odd
    /// number at or above `factor`. Mask cells outside the image read as zero and the mean is
    /// floored. The last sample of every `factor x factor` block is kept. Factors of 0 or 1 return
    /// a copy.
    pub fn downscale(&self, factor: usize) -> Self {
        if factor <= 1 {
            return self.clone();
        }

        let mask_size = if factor % 2 == 0 { factor + 1 } else { factor };
        let half = (mask_size / 2) as isize;
        let area = (mask_size * mask_size) as u64;

        let width = self.width / factor;
        let height = self.height / factor;
        let mut data = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let sx = (x * factor + factor - 1) as isize;
                let sy = (y * factor + factor - 1) as isize;

                let mut sum = 0u64;
                for my in -half..=half {
                    for mx in -half..=half {
                        sum += self.get_pixel(sx + mx, sy + my) as u64;
                    }
                }

                data.push((sum / area) as u8);
            }
        }

        Self { width, height, data }
    }
}

impl StereoPair {
    /// Build a pair, checking that both views have the same dimensions.
    pub fn new(left: GreyscaleImage, right: GreyscaleImage) -> Result<Self> {
        if left.width() != right.width() || left.height() != right.height() {
            return Err(Error::DimensionMismatch {
                left: (left.width(), left.height()),
                right: (right.width(), right.height())
            });
        }

        Ok(Self { left, right })
    }

    /// Load a pair of images from disk.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> Result<Self> {
        let left = GreyscaleImage::open(left)?;
        let right = GreyscaleImage::open(right)?;

        log::debug!(
            "Loaded stereo pair, left {}x{}, right {}x{}",
            left.width(), left.height(), right.width(), right.height()
        );

        Self::new(left, right)
    }

    pub fn left(&self) -> &GreyscaleImage {
        &self.left
    }

    pub fn right(&self) -> &GreyscaleImage {
        &self.right
    }

    pub fn width(&self) -> usize {
        self.left.width()
    }

    pub fn height(&self) -> usize {
        self.left.height()
    }

    /// Downscale both views by the same factor.
    pub fn downscale(&self, factor: usize) -> Self {
        Self {
            left: self.left.downscale(factor),
            right: self.right.downscale(factor)
        }
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
