/*
 *  playback.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Playback position snapshots for the progress layer
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

use std::time::{Duration, Instant};

/// Position and duration in seconds, as read from a player at one instant.
/// `None` means not known yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub position: Option<f64>,
    pub duration: Option<f64>,
}

#[inline]
fn known(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

impl PlaybackSnapshot {
    pub fn new(position: f64, duration: f64) -> Self {
        Self { position: Some(position), duration: Some(duration) }
    }

    /// Nothing playing / nothing known
    pub fn idle() -> Self {
        Self::default()
    }

    /// Position with unknowns treated as 0
    pub fn position_secs(&self) -> f64 { known(self.position) }

    /// Duration with unknowns treated as 0
    pub fn duration_secs(&self) -> f64 { known(self.duration) }

    /// Fraction played, `None` when either side is 0 or unknown.
    pub fn fraction(&self) -> Option<f64> {
        let (pos, dur) = (self.position_secs(), self.duration_secs());
        if pos == 0.0 || dur == 0.0 {
            return None;
        }
        Some(pos / dur)
    }
}

/// Looping wall-clock track of a fixed length.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    started: Instant,
    duration: Duration,
}

impl PlaybackClock {
    pub fn new(duration: Duration) -> Self {
        Self::starting_at(Instant::now(), duration)
    }

    pub fn starting_at(started: Instant, duration: Duration) -> Self {
        Self { started, duration }
    }

    pub fn snapshot(&self, now: Instant) -> PlaybackSnapshot {
        let dur = self.duration.as_secs_f64();
        if dur <= 0.0 {
            return PlaybackSnapshot { position: None, duration: None };
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        PlaybackSnapshot::new(elapsed % dur, dur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        assert_eq!(PlaybackSnapshot::new(30.0, 60.0).fraction(), Some(0.5));
        assert_eq!(PlaybackSnapshot::new(0.0, 60.0).fraction(), None);
        assert_eq!(PlaybackSnapshot::new(30.0, 0.0).fraction(), None);
        assert_eq!(PlaybackSnapshot::idle().fraction(), None);
        assert_eq!(PlaybackSnapshot { position: Some(5.0), duration: Some(f64::NAN) }.fraction(), None);
    }

    #[test]
    fn test_clock_loops() {
        let start = Instant::now();
        let clock = PlaybackClock::starting_at(start, Duration::from_secs(10));
        let snap = clock.snapshot(start + Duration::from_secs(25));
        assert_eq!(snap.duration, Some(10.0));
        assert!((snap.position_secs() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_clock_is_unknown() {
        let start = Instant::now();
        let clock = PlaybackClock::starting_at(start, Duration::ZERO);
        assert_eq!(clock.snapshot(start + Duration::from_secs(1)).fraction(), None);
    }
}
