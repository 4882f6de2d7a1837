/*
 *  lib.rs
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
//! Real-time audio visualization painted onto a persistent RGBA surface.
//!
//! Build a [`Visualizer`] over any [`AnalysisSource`], then call
//! [`Visualizer::draw`] once per frame with the layer toggles and a
//! playback snapshot.

pub mod analyser;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod pacer;
pub mod params;
pub mod playback;
pub mod surface;
pub mod tone;
pub mod visualizer;

pub use analyser::{AnalysisSource, SpectrumAnalyser};
pub use error::VizError;
pub use filters::ImageData;
pub use params::{ColorMode, RenderParams};
pub use playback::{PlaybackClock, PlaybackSnapshot};
pub use surface::Surface;
pub use visualizer::{ColorCounters, Visualizer};
