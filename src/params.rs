/*
 *  params.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-frame render parameters
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

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use tiny_skia::Color;

use crate::color::{parse_css_color, to_css_hex};
use crate::constants::OUTLINE_WIDTH;

/// Fill selection for the bar and pulse layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorMode {
    /// Fixed color
    Fixed(Color),
    /// Color derived from live data (sample magnitude, or the counter walk)
    Fade,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("fade") {
            return Ok(ColorMode::Fade);
        }
        parse_css_color(s)
            .map(ColorMode::Fixed)
            .ok_or_else(|| format!("unrecognised color '{s}'"))
    }
}

impl TryFrom<String> for ColorMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColorMode> for String {
    fn from(mode: ColorMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Fade => write!(f, "fade"),
            ColorMode::Fixed(c) => write!(f, "{}", to_css_hex(c)),
        }
    }
}

/// Config-file colors degrade to unset instead of failing the whole load.
fn lenient_color<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ColorMode>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| match s.parse::<ColorMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!("render: ignoring {e}");
            None
        }
    }))
}

/// Which layers to draw and how to color them.
///
/// Every toggle defaults to off and both colors to unset, so a partially
/// specified record just draws less. Field names also accept the camelCase
/// spelling (`showFreq`, `barColor`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Frequency-domain sampling when set, waveform otherwise
    #[serde(alias = "showFreq")]
    pub show_freq: bool,
    #[serde(alias = "showGradient")]
    pub show_gradient: bool,
    #[serde(alias = "showBars")]
    pub show_bars: bool,
    #[serde(alias = "barColor", deserialize_with = "lenient_color", skip_serializing_if = "Option::is_none")]
    pub bar_color: Option<ColorMode>,
    #[serde(alias = "showCircles")]
    pub show_circles: bool,
    #[serde(alias = "circleColor", deserialize_with = "lenient_color", skip_serializing_if = "Option::is_none")]
    pub circle_color: Option<ColorMode>,
    #[serde(alias = "showNoise")]
    pub show_noise: bool,
    #[serde(alias = "showMonochrome")]
    pub show_monochrome: bool,
    #[serde(alias = "showInvert")]
    pub show_invert: bool,
    /// Outline width of the progress line
    #[serde(alias = "progressStrokeWidth")]
    pub progress_stroke_width: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            show_freq: false,
            show_gradient: false,
            show_bars: false,
            bar_color: None,
            show_circles: false,
            circle_color: None,
            show_noise: false,
            show_monochrome: false,
            show_invert: false,
            progress_stroke_width: OUTLINE_WIDTH,
        }
    }
}

impl RenderParams {
    /// True when at least one whole-frame pixel filter is on.
    pub fn any_filter(&self) -> bool {
        self.show_noise || self.show_monochrome || self.show_invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("fade".parse::<ColorMode>(), Ok(ColorMode::Fade));
        assert_eq!("FADE".parse::<ColorMode>(), Ok(ColorMode::Fade));
        match "red".parse::<ColorMode>() {
            Ok(ColorMode::Fixed(c)) => assert_eq!(c.to_color_u8().red(), 255),
            other => panic!("unexpected {other:?}"),
        }
        assert!("not-a-color".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_defaults_are_off() {
        let p = RenderParams::default();
        assert!(!p.show_freq && !p.show_bars && !p.show_circles);
        assert!(!p.any_filter());
        assert!(p.bar_color.is_none());
    }

    #[test]
    fn test_yaml_camel_case_and_partial() {
        let yaml = "showFreq: true\nshowBars: true\nbarColor: fade\ncircleColor: '#ff0000'\nshow_invert: true\n";
        let p: RenderParams = serde_yaml::from_str(yaml).unwrap();
        assert!(p.show_freq);
        assert!(p.show_bars);
        assert!(p.show_invert);
        assert!(!p.show_noise);
        assert_eq!(p.bar_color, Some(ColorMode::Fade));
        assert!(matches!(p.circle_color, Some(ColorMode::Fixed(_))));
        assert_eq!(p.progress_stroke_width, OUTLINE_WIDTH);
    }

    #[test]
    fn test_yaml_bad_color_is_unset() {
        let yaml = "showBars: true\nbarColor: 'grba(0,0,0,0.50)'\ncircleColor: red\n";
        let p: RenderParams = serde_yaml::from_str(yaml).unwrap();
        assert!(p.show_bars);
        assert_eq!(p.bar_color, None);
        assert!(matches!(p.circle_color, Some(ColorMode::Fixed(_))));
    }

    #[test]
    fn test_yaml_dump_roundtrip() {
        let p = RenderParams {
            show_circles: true,
            circle_color: Some(ColorMode::Fade),
            ..Default::default()
        };
        let s = serde_yaml::to_string(&p).unwrap();
        let back: RenderParams = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
