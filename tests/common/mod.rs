//! Synthetic stereo pairs shared by the integration tests.

#![allow(dead_code)]

use cv_ncc_disparity::prelude::*;

/// Deterministic pseudo-random sample for pixel `(x, y)`.
pub fn noise(x: usize, y: usize, seed: u64) -> u8 {
    let mut h = seed ^ ((x as u64) << 32 | y as u64);
    h = h.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= h >> 29;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 32;
    (h & 0xff) as u8
}

pub fn textured(width: usize, height: usize, seed: u64) -> GreyscaleImage {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(noise(x, y, seed));
        }
    }
    GreyscaleImage::from_raw(width, height, data).unwrap()
}

/// A pair where every left pixel reappears `shift` columns further left in the right image.
///
/// Columns of the right image with no left counterpart are filled with unrelated noise.
pub fn shifted_pair(width: usize, height: usize, shift: usize, seed: u64) -> StereoPair {
    let left = textured(width, height, seed);

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            if x + shift < width {
                data.push(left.get_pixel((x + shift) as isize, y as isize));
            } else {
                data.push(noise(x, y, seed.wrapping_add(7919)));
            }
        }
    }
    let right = GreyscaleImage::from_raw(width, height, data).unwrap();

    StereoPair::new(left, right).unwrap()
}

pub fn identical_pair(width: usize, height: usize, seed: u64) -> StereoPair {
    let img = textured(width, height, seed);
    StereoPair::new(img.clone(), img).unwrap()
}
