/*
 *  filters.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Whole-frame pixel filters over a straight (non-premultiplied) RGBA snapshot
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
//! Pixel filters. Each one walks the snapshot 4 bytes (one RGBA pixel) at
//! a time and leaves alpha alone.

use rand::Rng;

use crate::constants::{NOISE_LEVEL, NOISE_PROBABILITY};

/// Straight-alpha RGBA copy of a surface, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Fully transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; width as usize * height as usize * 4] }
    }

    /// Wrap an existing RGBA buffer; `None` when the length does not fit.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self { width, height, data })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn data(&self) -> &[u8] { &self.data }
    pub fn data_mut(&mut self) -> &mut [u8] { &mut self.data }

    /// RGBA of the pixel at (x, y); `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Speckle: each pixel independently turns near-white with 1% probability.
pub fn noise<R: Rng + ?Sized>(image: &mut ImageData, rng: &mut R) {
    for px in image.data.chunks_exact_mut(4) {
        if rng.random::<f64>() < NOISE_PROBABILITY {
            px[0] = NOISE_LEVEL;
            px[1] = NOISE_LEVEL;
            px[2] = NOISE_LEVEL;
        }
    }
}

/// Replace R, G and B with their truncated average.
pub fn monochrome(image: &mut ImageData) {
    for px in image.data.chunks_exact_mut(4) {
        let avg = ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8;
        px[0] = avg;
        px[1] = avg;
        px[2] = avg;
    }
}

/// Negate R, G and B.
pub fn invert(image: &mut ImageData) {
    for px in image.data.chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_image() -> ImageData {
        let mut data = Vec::new();
        for i in 0..64u32 {
            data.extend_from_slice(&[(i * 3) as u8, (i * 7 % 256) as u8, (255 - i) as u8, (i * 4) as u8]);
        }
        ImageData::from_rgba(8, 8, data).unwrap()
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let original = sample_image();
        let mut img = original.clone();
        invert(&mut img);
        assert_ne!(img, original);
        invert(&mut img);
        assert_eq!(img, original);
    }

    #[test]
    fn test_invert_keeps_alpha() {
        let original = sample_image();
        let mut img = original.clone();
        invert(&mut img);
        for (a, b) in img.data().chunks_exact(4).zip(original.data().chunks_exact(4)) {
            assert_eq!(a[3], b[3]);
            assert_eq!(a[0], 255 - b[0]);
        }
    }

    #[test]
    fn test_monochrome_idempotent() {
        let mut once = sample_image();
        monochrome(&mut once);
        let mut twice = once.clone();
        monochrome(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_monochrome_truncates() {
        let mut img = ImageData::from_rgba(1, 1, vec![10, 10, 11, 200]).unwrap();
        monochrome(&mut img);
        assert_eq!(img.pixel(0, 0), Some([10, 10, 10, 200]));
    }

    #[test]
    fn test_noise_rate_near_one_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = 0usize;
        let mut total = 0usize;
        for _ in 0..10 {
            let mut img = ImageData::from_rgba(100, 100, [0u8, 0, 0, 255].repeat(100 * 100)).unwrap();
            noise(&mut img, &mut rng);
            for px in img.data().chunks_exact(4) {
                total += 1;
                if px[0] == NOISE_LEVEL {
                    assert_eq!(px[1], NOISE_LEVEL);
                    assert_eq!(px[2], NOISE_LEVEL);
                    hits += 1;
                }
                assert_eq!(px[3], 255);
            }
        }
        let rate = hits as f64 / total as f64;
        assert!((0.008..0.012).contains(&rate), "noise rate {rate}");
    }

    #[test]
    fn test_noise_then_monochrome_then_invert() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut img = ImageData::from_rgba(50, 50, [10u8, 200, 40, 255].repeat(50 * 50)).unwrap();
        noise(&mut img, &mut rng);
        monochrome(&mut img);
        let speckled = img.data().chunks_exact(4).filter(|px| px[0] == NOISE_LEVEL).count();
        assert!(speckled > 0);
        // (10 + 200 + 40) / 3 = 83; speckles stay at the noise gray
        assert!(img.data().chunks_exact(4).all(|px| px[..3] == [83, 83, 83] || px[..3] == [250, 250, 250]));

        invert(&mut img);
        let dark = img.data().chunks_exact(4).filter(|px| px[..3] == [5, 5, 5]).count();
        assert_eq!(dark, speckled);
        assert!(img.data().chunks_exact(4).all(|px| px[..3] == [172, 172, 172] || px[..3] == [5, 5, 5]));
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        assert!(ImageData::from_rgba(2, 2, vec![0; 15]).is_none());
        assert_eq!(ImageData::new(3, 2).data().len(), 24);
    }
}
