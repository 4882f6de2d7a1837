/*
 *  tone.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Deterministic synthetic PCM for driving the analyser headless
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

use std::f64::consts::TAU;

/// (frequency Hz, amplitude, wobble Hz)
const PARTIALS: [(f64, f64, f64); 5] = [
    (110.0, 0.30, 0.25),
    (220.0, 0.20, 0.40),
    (440.0, 0.15, 0.70),
    (1760.0, 0.08, 1.30),
    (5280.0, 0.04, 2.10),
];

/// Sum of a few sines, each with its own slow amplitude wobble.
#[derive(Debug, Clone)]
pub struct ToneSource {
    sample_rate: u32,
    t: u64,
}

impl ToneSource {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate: sample_rate.max(1), t: 0 }
    }

    pub fn sample_rate(&self) -> u32 { self.sample_rate }

    /// Next `n` samples, peak stays inside -1.0..=1.0.
    pub fn next_block(&mut self, n: usize) -> Vec<f32> {
        let sr = self.sample_rate as f64;
        let block = (0..n as u64)
            .map(|i| {
                let secs = (self.t + i) as f64 / sr;
                PARTIALS
                    .iter()
                    .map(|&(f, amp, wobble)| {
                        let env = 0.5 + 0.5 * (TAU * wobble * secs).sin();
                        amp * env * (TAU * f * secs).sin()
                    })
                    .sum::<f64>() as f32
            })
            .collect();
        self.t += n as u64;
        block
    }
}
