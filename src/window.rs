//! # Correlation windows
//!
//! Square, odd sized neighbourhoods around a pixel and the statistics gathered over them. Windows
//! are never materialised, they only describe which samples an evaluation visits.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::error::*;
use crate::stereo::GreyscaleImage;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Largest accepted window size. Keeps the exact product sums of the correlation inside `i64`.
pub const MAX_WINDOW_SIZE: usize = 127;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    size: usize
}

/// Sum of the samples covered by a window, together with the number of cells it spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowStats {
    sum: i64,
    area: i64
}

/// A window placed on an image, with its statistics already gathered.
#[derive(Clone, Copy, Debug)]
pub struct Patch<'a> {
    image: &'a GreyscaleImage,
    cx: isize,
    cy: isize,
    stats: WindowStats
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Window {
    /// Create a window, the size must be odd and no larger than [`MAX_WINDOW_SIZE`].
    pub fn new(size: usize) -> Result<Self> {
        if size % 2 == 0 {
            return Err(Error::InvalidWindowSize(size));
        }
        if size > MAX_WINDOW_SIZE {
            return Err(Error::WindowTooLarge {
                size,
                max: MAX_WINDOW_SIZE
            });
        }

        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Radius of the window around its centre pixel.
    pub fn half(&self) -> usize {
        (self.size - 1) / 2
    }

    /// Number of cells in the window.
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Offsets `(wx, wy)` relative to the centre, row by row.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> {
        let half = self.half() as isize;

        (-half..=half).flat_map(move |wy| (-half..=half).map(move |wx| (wx, wy)))
    }
}

impl WindowStats {
    /// Sum the samples of `image` covered by `window` centred on `(cx, cy)`.
    ///
    /// Cells outside the image read as zero but still count toward the area.
    pub fn gather(image: &GreyscaleImage, window: Window, cx: isize, cy: isize) -> Self {
        let sum = window
            .offsets()
            .map(|(wx, wy)| image.get_pixel(cx + wx, cy + wy) as i64)
            .sum();

        Self {
            sum,
            area: window.area() as i64
        }
    }

    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.area as f64
    }

    /// Deviation of `sample` from the window mean, multiplied by the window area.
    ///
    /// The scaled value is an exact integer, so sums over it carry no rounding error.
    #[inline]
    pub fn scaled_deviation(&self, sample: u8) -> i64 {
        self.area * sample as i64 - self.sum
    }
}

impl<'a> Patch<'a> {
    pub fn new(image: &'a GreyscaleImage, window: Window, cx: isize, cy: isize) -> Self {
        Self {
            image,
            cx,
            cy,
            stats: WindowStats::gather(image, window, cx, cy)
        }
    }

    pub fn stats(&self) -> &WindowStats {
        &self.stats
    }

    /// Scaled deviation from the patch mean of the sample at offset `(wx, wy)`.
    #[inline]
    pub fn deviation(&self, wx: isize, wy: isize) -> i64 {
        self.stats.scaled_deviation(self.image.get_pixel(self.cx + wx, self.cy + wy))
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> GreyscaleImage {
        let data = (0..width * height).map(|i| (i % 251) as u8).collect();
        GreyscaleImage::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn window_size_validation() {
        assert!(matches!(Window::new(0), Err(Error::InvalidWindowSize(0))));
        assert!(matches!(Window::new(4), Err(Error::InvalidWindowSize(4))));
        assert!(matches!(Window::new(129), Err(Error::WindowTooLarge { .. })));

        let w = Window::new(11).unwrap();
        assert_eq!(w.half(), 5);
        assert_eq!(w.area(), 121);
        assert_eq!(w.offsets().count(), 121);

        let single = Window::new(1).unwrap();
        assert_eq!(single.half(), 0);
        assert_eq!(single.offsets().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn mean_inside_image() {
        let img = ramp(10, 10);
        let window = Window::new(3).unwrap();

        let stats = WindowStats::gather(&img, window, 4, 4);

        let mut expected = 0i64;
        for y in 3..=5 {
            for x in 3..=5 {
                expected += (y * 10 + x) as i64;
            }
        }

        assert_eq!(stats.sum(), expected);
        assert_eq!(stats.mean(), expected as f64 / 9.0);
    }

    #[test]
    fn mean_partially_outside_counts_full_area() {
        let img = GreyscaleImage::from_raw(3, 3, vec![90; 9]).unwrap();
        let window = Window::new(3).unwrap();

        // Only the 2x2 bottom right quadrant is inside
        let stats = WindowStats::gather(&img, window, 0, 0);

        assert_eq!(stats.sum(), 4 * 90);
        assert_eq!(stats.mean(), 40.0);
    }

    #[test]
    fn deviations_cancel_over_window() {
        let img = ramp(12, 12);
        let window = Window::new(5).unwrap();
        let patch = Patch::new(&img, window, 6, 5);

        let total: i64 = window.offsets().map(|(wx, wy)| patch.deviation(wx, wy)).sum();
        assert_eq!(total, 0);
    }
}
