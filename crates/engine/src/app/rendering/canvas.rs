use crate::app::Vec2;

use super::font::{glyph_rows, GLYPH_ADVANCE_CELLS, GLYPH_HEIGHT, GLYPH_WIDTH, LINE_ADVANCE_CELLS};
use super::{StageTransform, Viewport};

/// RGBA, straight alpha.
pub type Color = [u8; 4];

/// Immediate-mode drawing surface over an RGBA frame.
///
/// Shape methods take stage coordinates and go through the letterbox
/// transform; the `*_px` methods draw in raw window pixels for overlays.
/// Every write is clipped, so callers may pass anything.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    viewport: Viewport,
    transform: StageTransform,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], viewport: Viewport, stage_size: Vec2) -> Self {
        Self {
            frame,
            viewport,
            transform: StageTransform::fit(stage_size, viewport),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> StageTransform {
        self.transform
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Blends `color` over the whole window, letterbox included.
    pub fn tint(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            blend_into(chunk, color);
        }
    }

    pub fn fill_rect(&mut self, top_left: Vec2, size: Vec2, color: Color) {
        let (x, y) = self.transform.stage_to_screen(top_left);
        let (x2, y2) = self.transform.stage_to_screen(top_left + size);
        self.fill_rect_px(x, y, x2 - x, y2 - y, color);
    }

    pub fn stroke_rect(&mut self, top_left: Vec2, size: Vec2, color: Color) {
        let (x, y) = self.transform.stage_to_screen(top_left);
        let (x2, y2) = self.transform.stage_to_screen(top_left + size);
        self.stroke_rect_px(x, y, x2 - x, y2 - y, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_ellipse(center, radius, radius, color);
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32, color: Color) {
        let (cx, cy) = self.transform.stage_to_screen(center);
        let rx = (radius_x * self.transform.scale).max(0.5);
        let ry = (radius_y * self.transform.scale).max(0.5);
        let top = (cy as f32 - ry).floor() as i32;
        let bottom = (cy as f32 + ry).ceil() as i32;
        for py in top..=bottom {
            let dy = (py - cy) as f32 / ry;
            let span = 1.0 - dy * dy;
            if span < 0.0 {
                continue;
            }
            let half_width = (rx * span.sqrt()).round() as i32;
            self.hline_px(cx - half_width, cx + half_width, py, color);
        }
    }

    /// One-pixel ellipse outline.
    pub fn stroke_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32, color: Color) {
        let (cx, cy) = self.transform.stage_to_screen(center);
        let rx = radius_x * self.transform.scale;
        let ry = radius_y * self.transform.scale;
        let steps = ((rx.max(ry) * std::f32::consts::TAU).ceil() as i32).clamp(8, 4096);
        let mut last: Option<(i32, i32)> = None;
        for step in 0..steps {
            let angle = step as f32 / steps as f32 * std::f32::consts::TAU;
            let point = (
                cx + (angle.cos() * rx).round() as i32,
                cy + (angle.sin() * ry).round() as i32,
            );
            if last != Some(point) {
                self.blend_pixel_px(point.0, point.1, color);
                last = Some(point);
            }
        }
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (x0, y0) = self.transform.stage_to_screen(from);
        let (x1, y1) = self.transform.stage_to_screen(to);
        self.line_px(x0, y0, x1, y1, color);
    }

    /// Draws text with its top-left corner at `top_left`; `cell` is the glyph
    /// pixel size in stage units.
    pub fn text(&mut self, top_left: Vec2, text: &str, cell: f32, color: Color) {
        let (x, y) = self.transform.stage_to_screen(top_left);
        let cell_px = self.transform.length_px(cell).max(1);
        self.text_px(x, y, text, cell_px, color);
    }

    pub fn text_centered(&mut self, center_top: Vec2, text: &str, cell: f32, color: Color) {
        let width = text_width_cells(text) as f32 * cell;
        self.text(
            Vec2::new(center_top.x - width * 0.5, center_top.y),
            text,
            cell,
            color,
        );
    }

    pub fn fill_rect_px(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let start_y = y.max(0);
        let end_y = (y + height).min(self.viewport.height as i32);
        for py in start_y..end_y {
            self.hline_px(x, x + width - 1, py, color);
        }
    }

    pub fn stroke_rect_px(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 1 || height <= 1 {
            return;
        }
        self.hline_px(x, x + width - 1, y, color);
        self.hline_px(x, x + width - 1, y + height - 1, color);
        for py in y + 1..y + height - 1 {
            self.blend_pixel_px(x, py, color);
            self.blend_pixel_px(x + width - 1, py, color);
        }
    }

    pub fn line_px(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.blend_pixel_px(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = error * 2;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }

    pub fn text_px(&mut self, mut x: i32, y: i32, text: &str, cell_px: i32, color: Color) {
        let cell_px = cell_px.max(1);
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                self.glyph_px(x, y, rows, cell_px, color);
            }
            x += GLYPH_ADVANCE_CELLS * cell_px;
        }
    }

    fn glyph_px(&mut self, x: i32, y: i32, rows: [u8; 5], cell_px: i32, color: Color) {
        for (row_index, row_bits) in rows.iter().enumerate() {
            let glyph_y = y + row_index as i32 * cell_px;
            for col in 0..GLYPH_WIDTH {
                if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                self.fill_rect_px(x + col * cell_px, glyph_y, cell_px, cell_px, color);
            }
        }
    }

    fn hline_px(&mut self, x_start: i32, x_end: i32, y: i32, color: Color) {
        if y < 0 || y >= self.viewport.height as i32 {
            return;
        }
        let start = x_start.max(0);
        let end = x_end.min(self.viewport.width as i32 - 1);
        for x in start..=end {
            self.blend_pixel_px(x, y, color);
        }
    }

    fn blend_pixel_px(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.viewport.width as i32 || y >= self.viewport.height as i32 {
            return;
        }
        let Some(pixel_offset) = (y as usize)
            .checked_mul(self.viewport.width as usize)
            .and_then(|row| row.checked_add(x as usize))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(pixel) = self.frame.get_mut(byte_offset..byte_offset + 4) else {
            return;
        };
        blend_into(pixel, color);
    }
}

pub(crate) fn text_width_cells(text: &str) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        0
    } else {
        count * GLYPH_ADVANCE_CELLS - 1
    }
}

pub(crate) fn text_height_cells(lines: usize) -> i32 {
    if lines == 0 {
        0
    } else {
        lines as i32 * LINE_ADVANCE_CELLS - (LINE_ADVANCE_CELLS - GLYPH_HEIGHT)
    }
}

fn blend_into(pixel: &mut [u8], color: Color) {
    let alpha = color[3] as u32;
    if alpha == 255 {
        pixel[..3].copy_from_slice(&color[..3]);
        pixel[3] = 255;
        return;
    }
    if alpha == 0 {
        return;
    }
    let inverse = 255 - alpha;
    for channel in 0..3 {
        let blended = (color[channel] as u32 * alpha + pixel[channel] as u32 * inverse + 127) / 255;
        pixel[channel] = blended as u8;
    }
    pixel[3] = 255;
}
