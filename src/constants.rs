/*
 *  constants.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
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
//! This module contains global constants used across the renderer and the driver.

/// Default surface width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default surface height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;
/// Default analyser transform size; the sample buffer is half of this.
pub const DEFAULT_FFT_SIZE: usize = 128;
/// Default synthetic sample rate.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;
/// Default frame rate of the driver loop.
pub const DEFAULT_FPS: u32 = 60;
/// Default length of the looping synthetic track.
pub const DEFAULT_TRACK_SECS: f64 = 180.0;

/// Trailing bins dropped from bars and pulse, they hardly ever move.
pub const UNUSED_TAIL_BINS: usize = 32;

// Background / overlay opacities
pub const BACKGROUND_FADE_ALPHA: f32 = 0.1;
pub const GRADIENT_ALPHA: f32 = 0.3;

// Bar layout
pub const BAR_SPACING: f32 = 4.0;
pub const BAR_MARGIN: f32 = 5.0;
pub const BAR_TOP_OFFSET: f32 = 2.0;
/// Minimum bar length along the growth axis, the sample value is added to it.
pub const BAR_BASE_LENGTH: f32 = 50.0;
/// Fixed bar extent across the growth axis.
pub const BAR_THICKNESS: f32 = 250.0;
pub const BAR_FADE_ALPHA: f64 = 0.5;

/// Canvas default line width, used for every outline.
pub const OUTLINE_WIDTH: f32 = 1.0;

// Pulse circle color walk
pub const COUNTER_START: f64 = 255.0;
pub const COUNTER_HIGH: f64 = 200.0;
pub const COUNTER_LOW: f64 = 50.0;
pub const COUNTER_BUCKET_RED: f64 = 0.34;
pub const COUNTER_BUCKET_GREEN: f64 = 0.67;

/// Nominal progress line thickness; the line sits half of it above the bottom edge.
pub const PROGRESS_LINE_THICKNESS: f32 = 20.0;

/// Per-pixel speckle probability for the noise filter.
pub const NOISE_PROBABILITY: f64 = 0.01;
/// Channel value written by the noise filter.
pub const NOISE_LEVEL: u8 = 250;

// Analyser defaults (Web Audio compatible)
pub const FFT_SIZE_MIN: usize = 32;
pub const FFT_SIZE_MAX: usize = 32_768;
pub const DEFAULT_MIN_DECIBELS: f32 = -100.0;
pub const DEFAULT_MAX_DECIBELS: f32 = -30.0;
pub const DEFAULT_SMOOTHING: f32 = 0.8;
