use crate::app::LoopMetricsSnapshot;

use super::canvas::{text_height_cells, text_width_cells, Canvas, Color};
use super::font::LINE_ADVANCE_CELLS;

const TEXT_CELL_PX: i32 = 2;
const OVERLAY_PADDING: i32 = 6 * TEXT_CELL_PX;
const OVERLAY_PANEL_INSET: i32 = 4 * TEXT_CELL_PX;
const OVERLAY_TEXT_PRIMARY_COLOR: Color = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: Color = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: Color = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: Color = [92, 106, 126, 255];
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(canvas: &mut Canvas<'_>, data: &OverlayData) {
    let viewport = canvas.viewport();
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest = lines
        .iter()
        .map(|line| text_width_cells(line))
        .max()
        .unwrap_or(0);
    let panel_left = OVERLAY_PADDING - OVERLAY_PANEL_INSET;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET;
    let panel_width = longest * TEXT_CELL_PX + OVERLAY_PANEL_INSET * 2;
    let panel_height = text_height_cells(lines.len()) * TEXT_CELL_PX + OVERLAY_PANEL_INSET * 2;
    canvas.fill_rect_px(
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    canvas.stroke_rect_px(
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = OVERLAY_PADDING;
    for line in &lines {
        canvas.text_px(
            OVERLAY_PADDING,
            y,
            line,
            TEXT_CELL_PX,
            overlay_line_color(line),
        );
        y += LINE_ADVANCE_CELLS * TEXT_CELL_PX;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(data.metrics.fps, data.render_fps_cap),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
    ];
    if !data.scene_lines.is_empty() {
        lines.push(String::new());
        lines.push(SCENE_SECTION_LABEL.to_string());
        lines.extend(data.scene_lines.iter().cloned());
    }
    lines
}

fn overlay_line_color(line: &str) -> Color {
    if line == PERF_SECTION_LABEL || line == SCENE_SECTION_LABEL {
        OVERLAY_TEXT_PRIMARY_COLOR
    } else {
        OVERLAY_TEXT_DIM_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>) -> String {
    match cap {
        Some(cap) => format!("FPS: {current_fps:.1} (cap {cap})"),
        None => format!("FPS: {current_fps:.1} (cap off)"),
    }
}
