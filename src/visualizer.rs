/*
 *  visualizer.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame renderer: fade, gradient, mirrored bars, pulse, progress, filters
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
//! The visualizer owns everything a frame needs: the surface, the sample
//! buffer, the precomputed backdrop gradient, the pulse color counters and
//! the random source. `draw` is called once per displayed frame and paints
//! over what the previous frames left behind.

use std::f64::consts::TAU;

use log::{debug, warn};
use rand::Rng;
use tiny_skia::{Color, Shader};

use crate::analyser::AnalysisSource;
use crate::color::{backdrop_gradient, black, make_color, round_near, white};
use crate::constants::*;
use crate::error::VizError;
use crate::filters::{self, ImageData};
use crate::params::{ColorMode, RenderParams};
use crate::playback::PlaybackSnapshot;
use crate::surface::Surface;

/// Samples that take part in bars and pulse; the tail bins are dropped.
#[inline]
pub fn used_len(buffer_len: usize) -> usize {
    buffer_len.saturating_sub(UNUSED_TAIL_BINS)
}

/// One bar of the mirrored chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub value: u8,
}

/// Geometry for the mirrored bar chart.
///
/// The first half of the used samples grow rightward from the left edge,
/// the second half grow leftward from the right edge. Both halves stack
/// top to bottom from the same starting row.
pub fn bar_layout(samples: &[u8], width: f32, height: f32) -> impl Iterator<Item = BarRect> + '_ {
    let used = used_len(samples.len());
    let n = used.max(1) as f32;
    let usable = height - n * BAR_SPACING - BAR_MARGIN * 2.0;
    let stride = (usable / n) * 2.0 + BAR_SPACING;
    let half = used as f32 / 2.0;

    samples[..used].iter().enumerate().map(move |(i, &value)| {
        let length = BAR_BASE_LENGTH + value as f32;
        let i = i as f32;
        let (x, row) = if i < half { (0.0, i) } else { (width - length, i - half) };
        BarRect {
            x,
            y: BAR_TOP_OFFSET + BAR_MARGIN + row * stride,
            width: length,
            height: BAR_THICKNESS,
            value,
        }
    })
}

/// Mean of the used samples divided by their count.
///
/// Not normalized: a mean above the count gives a value over 1.
/// Zero when no samples are in use.
pub fn pulse_intensity(samples: &[u8]) -> f64 {
    let used = used_len(samples.len());
    if used == 0 {
        return 0.0;
    }
    let sum: u64 = samples[..used].iter().map(|&v| v as u64).sum();
    let mean = sum as f64 / used as f64;
    mean / used as f64
}

/// Pulse radius for a surface height: intensity times a quarter of the height.
pub fn pulse_radius(samples: &[u8], height: f32) -> f32 {
    pulse_intensity(samples) as f32 * (height / 4.0)
}

/// Right end of the progress line, `None` when nothing should be drawn.
pub fn progress_endpoint(playback: PlaybackSnapshot, width: f32) -> Option<f32> {
    playback.fraction().map(|f| width * f as f32)
}

/// Three channel counters doing a mean-reverting random walk.
///
/// Values are not clamped; a large tangent draw can push one well
/// outside 0..=255 and it then walks back by later draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCounters {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Default for ColorCounters {
    fn default() -> Self {
        Self { red: COUNTER_START, green: COUNTER_START, blue: COUNTER_START }
    }
}

// Both bounds test the counter being moved, the blue bucket included.
#[inline]
fn drift(counter: f64, value: f64) -> f64 {
    if counter > COUNTER_HIGH {
        counter - value.abs()
    } else if counter < COUNTER_LOW {
        counter + value.abs()
    } else {
        counter + value
    }
}

impl ColorCounters {
    /// Advance one counter using a fresh draw from `rng`.
    pub fn evolve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let amount: f64 = rng.random();
        self.step(amount);
    }

    /// Advance with a given draw in [0, 1). The draw both picks the
    /// counter and sets the step, `round(tan(amount * 2pi))`.
    pub fn step(&mut self, amount: f64) {
        let value = round_near((amount * TAU).tan());
        let counter = if amount < COUNTER_BUCKET_RED {
            &mut self.red
        } else if amount < COUNTER_BUCKET_GREEN {
            &mut self.green
        } else {
            &mut self.blue
        };
        *counter = drift(*counter, value);
    }

    pub fn color(&self) -> Color {
        make_color(self.red, self.green, self.blue, 1.0)
    }
}

pub struct Visualizer<A: AnalysisSource, R: Rng> {
    surface: Surface,
    gradient: Shader<'static>,
    source: A,
    samples: Vec<u8>,
    counters: ColorCounters,
    rng: R,
    frames: u64,
}

impl<A: AnalysisSource, R: Rng> Visualizer<A, R> {
    /// Bind a `width` x `height` surface to an analysis source.
    pub fn new(width: u32, height: u32, source: A, rng: R) -> Result<Self, VizError> {
        let surface = Surface::new(width, height)?;
        let gradient = backdrop_gradient(height as f32)?;
        let samples = vec![0u8; source.fft_size() / 2];
        debug!(
            "visualizer: {width}x{height}, {} samples ({} used)",
            samples.len(),
            used_len(samples.len())
        );
        Ok(Self {
            surface,
            gradient,
            source,
            samples,
            counters: ColorCounters::default(),
            rng,
            frames: 0,
        })
    }

    pub fn surface(&self) -> &Surface { &self.surface }
    pub fn samples(&self) -> &[u8] { &self.samples }
    pub fn counters(&self) -> ColorCounters { self.counters }
    pub fn frame_count(&self) -> u64 { self.frames }
    pub fn source(&self) -> &A { &self.source }
    pub fn source_mut(&mut self) -> &mut A { &mut self.source }

    /// Render one frame over the previous one.
    pub fn draw(&mut self, params: &RenderParams, playback: PlaybackSnapshot) {
        self.sample(params.show_freq);
        self.fade_background();

        if params.show_gradient {
            self.draw_gradient();
        }
        if params.show_bars {
            self.draw_bars(params.bar_color);
        }
        if params.show_circles {
            self.draw_pulse(params.circle_color);
        }
        self.draw_progress(playback, params.progress_stroke_width);

        if params.any_filter() {
            self.apply_filters(params);
        }
        self.frames += 1;
    }

    fn sample(&mut self, freq: bool) {
        if freq {
            self.source.byte_frequency_data(&mut self.samples);
        } else {
            self.source.byte_time_domain_data(&mut self.samples);
        }
    }

    fn fade_background(&mut self) {
        let (w, h) = (self.surface.width() as f32, self.surface.height() as f32);
        self.surface.fill_rect(0.0, 0.0, w, h, black(), BACKGROUND_FADE_ALPHA);
    }

    fn draw_gradient(&mut self) {
        self.surface.fill_with_shader(&self.gradient, GRADIENT_ALPHA);
    }

    fn draw_bars(&mut self, mode: Option<ColorMode>) {
        let (w, h) = (self.surface.width() as f32, self.surface.height() as f32);
        for bar in bar_layout(&self.samples, w, h) {
            let fill = match mode {
                Some(ColorMode::Fixed(c)) => c,
                Some(ColorMode::Fade) => {
                    let v = bar.value as f64;
                    make_color(v, v, v, BAR_FADE_ALPHA)
                }
                None => black(),
            };
            self.surface.stroke_rect(bar.x, bar.y, bar.width, bar.height, black(), OUTLINE_WIDTH);
            self.surface.fill_rect(bar.x, bar.y, bar.width, bar.height, fill, 1.0);
        }
    }

    fn draw_pulse(&mut self, mode: Option<ColorMode>) {
        self.counters.evolve(&mut self.rng);

        let fill = match mode {
            Some(ColorMode::Fixed(c)) => c,
            Some(ColorMode::Fade) => self.counters.color(),
            None => black(),
        };
        let (w, h) = (self.surface.width() as f32, self.surface.height() as f32);
        let radius = pulse_radius(&self.samples, h);
        self.surface.circle(w / 2.0, h / 2.0, radius, fill, black(), OUTLINE_WIDTH);
    }

    fn draw_progress(&mut self, playback: PlaybackSnapshot, stroke_width: f32) {
        let (w, h) = (self.surface.width() as f32, self.surface.height() as f32);
        if let Some(end) = progress_endpoint(playback, w) {
            let y = h - PROGRESS_LINE_THICKNESS / 2.0;
            self.surface.line(0.0, y, end, y, white(), stroke_width);
        }
    }

    /// One snapshot, filters in a fixed order, written back after each.
    fn apply_filters(&mut self, params: &RenderParams) {
        let mut image = self.surface.get_image_data();

        if params.show_noise {
            filters::noise(&mut image, &mut self.rng);
            self.write_back(&image);
        }
        if params.show_monochrome {
            filters::monochrome(&mut image);
            self.write_back(&image);
        }
        if params.show_invert {
            filters::invert(&mut image);
            self.write_back(&image);
        }
    }

    fn write_back(&mut self, image: &ImageData) {
        if let Err(e) = self.surface.put_image_data(image) {
            warn!("visualizer: filter write-back skipped: {e}");
        }
    }
}
