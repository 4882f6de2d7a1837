/*
 *  surface.rs
 *
 *  pulseviz - canvas audio visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Persistent RGBA drawing surface with canvas-like primitives
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

use std::path::Path;

use tiny_skia::{
    Color, ColorU8, FillRule, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Shader, Stroke,
    Transform,
};

use crate::error::VizError;
use crate::filters::ImageData;

/// A runtime-sized RGBA surface.
///
/// Starts fully transparent and is never cleared by the renderer, only
/// painted over. Pixels are stored premultiplied; `get_image_data` and
/// `put_image_data` convert to and from straight alpha.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

/// Canvas accepts negative extents and flips the rect; do the same.
fn normalized_rect(x: f32, y: f32, w: f32, h: f32) -> Option<Rect> {
    let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
    let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
    Rect::from_xywh(x, y, w, h)
}

fn solid(color: Color, alpha: f32) -> Paint<'static> {
    let mut c = color;
    c.apply_opacity(alpha);
    let mut paint = Paint::default();
    paint.set_color(c);
    paint.anti_alias = true;
    paint
}

fn outline(width: f32) -> Stroke {
    Stroke { width, ..Stroke::default() }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, VizError> {
        let pixmap = Pixmap::new(width, height).ok_or(VizError::Surface { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 { self.pixmap.width() }
    pub fn height(&self) -> u32 { self.pixmap.height() }

    /// Immutable raw access
    pub fn pixmap(&self) -> &Pixmap { &self.pixmap }

    /// Straight-alpha RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Fill a rect with a solid color at the given global opacity.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, alpha: f32) {
        if let Some(rect) = normalized_rect(x, y, w, h) {
            self.pixmap.fill_rect(rect, &solid(color, alpha), Transform::identity(), None);
        }
    }

    /// Fill the whole surface with a shader at the given global opacity.
    pub fn fill_with_shader(&mut self, shader: &Shader<'static>, alpha: f32) {
        let mut shader = shader.clone();
        shader.apply_opacity(alpha);
        let paint = Paint { shader, anti_alias: true, ..Paint::default() };
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32) {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        if let Some(rect) = normalized_rect(x, y, w, h) {
            let path = PathBuilder::from_rect(rect);
            self.stroke(&path, color, width);
        }
    }

    /// Filled and outlined circle. A radius of zero or less draws nothing.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Color, stroke: Color, width: f32) {
        if !radius.is_finite() {
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.fill_path(&path, &solid(fill, 1.0), FillRule::Winding, Transform::identity(), None);
            self.stroke(&path, stroke, width);
        }
    }

    /// Closed two-point path, outline only. A fill would cover no area.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Color, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        pb.close();
        if let Some(path) = pb.finish() {
            self.stroke(&path, stroke, width);
        }
    }

    fn stroke(&mut self, path: &SkPath, color: Color, width: f32) {
        self.pixmap.stroke_path(path, &solid(color, 1.0), &outline(width), Transform::identity(), None);
    }

    /// Copy the surface out as straight-alpha RGBA.
    pub fn get_image_data(&self) -> ImageData {
        let mut image = ImageData::new(self.width(), self.height());
        for (dst, src) in image.data_mut().chunks_exact_mut(4).zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    /// Write a straight-alpha snapshot back over the whole surface.
    pub fn put_image_data(&mut self, image: &ImageData) -> Result<(), VizError> {
        let expected = self.pixmap.data().len();
        if image.width() != self.width() || image.height() != self.height() {
            return Err(VizError::BufferSizeMismatch { expected, actual: image.data().len() });
        }
        for (dst, src) in self.pixmap.pixels_mut().iter_mut().zip(image.data().chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(())
    }

    /// Encode the current frame as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), VizError> {
        self.pixmap.save_png(path).map_err(|e| VizError::Png(e.to_string()))
    }
}
