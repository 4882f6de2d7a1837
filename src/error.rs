/*
 *  error.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the renderer and its collaborators
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

use thiserror::Error;

/// Errors raised while setting up or exporting a visualizer.
///
/// Drawing a frame never fails; only construction and I/O can.
#[derive(Debug, Error)]
pub enum VizError {
    /// Pixmap could not be allocated (zero or oversized dimensions)
    #[error("Cannot create a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    /// Gradient stops were rejected by the rasterizer
    #[error("Invalid gradient definition")]
    Gradient,

    /// Analyser transform size out of range or not a power of two
    #[error("Invalid FFT size: {0} (must be a power of two in 32..=32768)")]
    InvalidFftSize(usize),

    /// Image snapshot does not match the surface
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// PNG encoding failed
    #[error("PNG export failed: {0}")]
    Png(String),
}
