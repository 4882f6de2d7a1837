/*
 *  color.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Color, gradient and rounding helpers shared by the layers
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

use tiny_skia::{Color, GradientStop, LinearGradient, Point, Shader, SpreadMode, Transform};

use crate::error::VizError;

/// Named CSS colors used by the fixed parts of a frame
pub fn black() -> Color { Color::from_rgba8(0, 0, 0, 255) }
pub fn white() -> Color { Color::from_rgba8(255, 255, 255, 255) }
/// CSS `green` is half intensity
pub fn green() -> Color { Color::from_rgba8(0, 128, 0, 255) }
pub fn magenta() -> Color { Color::from_rgba8(255, 0, 255, 255) }

/// Round half up, same as `Math.round`.
///
/// `f64::round` goes away from zero, which differs for negative halves
/// (-2.5 -> -3 instead of -2).
#[inline]
pub fn round_near(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[inline]
fn channel(v: f64) -> u8 {
    if v.is_nan() { 0 } else { v.round().clamp(0.0, 255.0) as u8 }
}

/// Build a fill color from raw channel values and an opacity.
///
/// Channels clamp into 0..=255 the way CSS `rgba()` does, so unbounded
/// inputs (the pulse counters) still produce a valid color.
pub fn make_color(r: f64, g: f64, b: f64, alpha: f64) -> Color {
    let mut color = Color::from_rgba8(channel(r), channel(g), channel(b), 255);
    let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    color.set_alpha(a as f32);
    color
}

/// Parse any CSS color string (`red`, `#0f0`, `rgba(0,0,0,.5)`, `hsl(...)`).
pub fn parse_css_color(s: &str) -> Option<Color> {
    csscolorparser::parse(s.trim())
        .ok()
        .map(|c| {
            let [r, g, b, a] = c.to_rgba8();
            Color::from_rgba8(r, g, b, a)
        })
}

/// Format a color as `#rrggbbaa`.
pub fn to_css_hex(color: &Color) -> String {
    let c = color.to_color_u8();
    format!("#{:02x}{:02x}{:02x}{:02x}", c.red(), c.green(), c.blue(), c.alpha())
}

/// Build a linear gradient between two points from `(offset, color)` stops.
pub fn linear_gradient(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    stops: &[(f32, Color)],
) -> Result<Shader<'static>, VizError> {
    let stops = stops
        .iter()
        .map(|(offset, color)| GradientStop::new(*offset, *color))
        .collect::<Vec<_>>();
    LinearGradient::new(
        Point::from_xy(x0, y0),
        Point::from_xy(x1, y1),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or(VizError::Gradient)
}

/// The five-stop black/green banding that runs top to bottom.
pub fn backdrop_gradient(height: f32) -> Result<Shader<'static>, VizError> {
    linear_gradient(
        0.0,
        0.0,
        0.0,
        height,
        &[
            (0.0, black()),
            (0.25, green()),
            (0.5, black()),
            (0.75, green()),
            (1.0, black()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(c: Color) -> [u8; 4] {
        let c = c.to_color_u8();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn test_round_near_half_up() {
        assert_eq!(round_near(2.5), 3.0);
        assert_eq!(round_near(-2.5), -2.0);
        assert_eq!(round_near(-3.0777), -3.0);
        assert_eq!(round_near(0.49), 0.0);
    }

    #[test]
    fn test_make_color_clamps() {
        assert_eq!(rgba(make_color(300.0, -20.0, 128.0, 1.0)), [255, 0, 128, 255]);
        assert!((127..=128).contains(&rgba(make_color(100.0, 100.0, 100.0, 0.5))[3]));
        assert_eq!(rgba(make_color(f64::NAN, 1e18, 0.0, 7.0)), [0, 255, 0, 255]);
    }

    #[test]
    fn test_parse_css_color() {
        assert_eq!(parse_css_color("red").map(rgba), Some([255, 0, 0, 255]));
        assert_eq!(parse_css_color("#00ff00").map(rgba), Some([0, 255, 0, 255]));
        assert_eq!(parse_css_color(" green ").map(rgba), Some([0, 128, 0, 255]));
        assert!(parse_css_color("grba(0,0,0,0.50)").is_none());
    }

    #[test]
    fn test_css_hex_roundtrip() {
        let c = parse_css_color("#12345678").unwrap();
        assert_eq!(to_css_hex(&c), "#12345678");
    }

    #[test]
    fn test_backdrop_gradient_builds() {
        assert!(backdrop_gradient(400.0).is_ok());
    }
}
