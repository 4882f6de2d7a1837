/*
 *  analyser.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Byte-level frequency / waveform sampling for the renderer
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
//! Analysis sources fill a caller-owned byte buffer each frame, either with
//! per-bin magnitudes or with the raw waveform, both mapped to 0..=255.

use std::sync::Arc;

use log::debug;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::constants::{
    DEFAULT_MAX_DECIBELS, DEFAULT_MIN_DECIBELS, DEFAULT_SMOOTHING, FFT_SIZE_MAX, FFT_SIZE_MIN,
};
use crate::error::VizError;

/// Anything that can hand the renderer one frame of samples.
pub trait AnalysisSource {
    /// Transform window size; the renderer's buffer is half of this.
    fn fft_size(&self) -> usize;

    /// Fill `out` with per-bin magnitudes (0..=255).
    fn byte_frequency_data(&mut self, out: &mut [u8]);

    /// Fill `out` with the waveform (silence = 128).
    fn byte_time_domain_data(&mut self, out: &mut [u8]);
}

/// Web Audio style analyser over a sliding window of PCM samples.
pub struct SpectrumAnalyser {
    nfft: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,       // blackman
    history: Vec<f32>,      // last `nfft` samples, oldest first
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,     // per-bin magnitude carried between frames
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize) -> Result<Self, VizError> {
        if !fft_size.is_power_of_two() || !(FFT_SIZE_MIN..=FFT_SIZE_MAX).contains(&fft_size) {
            return Err(VizError::InvalidFftSize(fft_size));
        }
        let nfft = fft_size;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(nfft);

        // Blackman, a = 0.16
        let n = nfft as f32;
        let window = (0..nfft)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / n;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect::<Vec<_>>();

        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        debug!("analyser: fft size {nfft}, {} bins", nfft / 2);

        Ok(Self {
            nfft,
            fft,
            window,
            history: vec![0.0; nfft],
            buf: vec![Complex::new(0.0, 0.0); nfft],
            scratch,
            smoothed: vec![0.0; nfft / 2],
            smoothing: DEFAULT_SMOOTHING,
            min_db: DEFAULT_MIN_DECIBELS,
            max_db: DEFAULT_MAX_DECIBELS,
        })
    }

    /// Time smoothing between frames, 0 = none, clamped to 0..=1.
    pub fn set_smoothing(&mut self, tau: f32) {
        self.smoothing = tau.clamp(0.0, 1.0);
    }

    /// dB range mapped onto 0..=255. Ignored unless `min < max`.
    pub fn set_decibel_range(&mut self, min_db: f32, max_db: f32) {
        if min_db < max_db {
            self.min_db = min_db;
            self.max_db = max_db;
        }
    }

    /// Append PCM (-1.0..=1.0) to the analysis window.
    pub fn push_samples(&mut self, pcm: &[f32]) {
        let n = self.nfft;
        if pcm.len() >= n {
            self.history.copy_from_slice(&pcm[pcm.len() - n..]);
        } else {
            self.history.rotate_left(pcm.len());
            self.history[n - pcm.len()..].copy_from_slice(pcm);
        }
    }

    fn update_spectrum(&mut self) {
        for (i, c) in self.buf.iter_mut().enumerate() {
            c.re = self.history[i] * self.window[i];
            c.im = 0.0;
        }

        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let scale = 1.0 / self.nfft as f32;
        let tau = self.smoothing;
        for (k, s) in self.smoothed.iter_mut().enumerate() {
            let mag = self.buf[k].norm() * scale;
            let v = tau * *s + (1.0 - tau) * mag;
            // keep NaN/inf from sticking around forever
            *s = if v.is_finite() { v } else { 0.0 };
        }
    }
}

impl AnalysisSource for SpectrumAnalyser {
    fn fft_size(&self) -> usize {
        self.nfft
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.update_spectrum();
        let range = self.max_db - self.min_db;
        for (dst, &mag) in out.iter_mut().zip(self.smoothed.iter()) {
            let db = 20.0 * mag.log10();
            let scaled = (255.0 / range) * (db - self.min_db);
            *dst = if scaled.is_nan() { 0 } else { scaled.floor().clamp(0.0, 255.0) as u8 };
        }
    }

    fn byte_time_domain_data(&mut self, out: &mut [u8]) {
        for (dst, &s) in out.iter_mut().zip(self.history.iter()) {
            *dst = (128.0 * (1.0 + s)).floor().clamp(0.0, 255.0) as u8;
        }
    }
}
