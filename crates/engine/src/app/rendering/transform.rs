use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Uniform scale plus letterbox offset mapping stage units to window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl StageTransform {
    pub fn fit(stage_size: Vec2, viewport: Viewport) -> Self {
        if stage_size.x <= 0.0 || stage_size.y <= 0.0 || viewport.width == 0 || viewport.height == 0
        {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }
        let scale = (viewport.width as f32 / stage_size.x).min(viewport.height as f32 / stage_size.y);
        Self {
            scale,
            offset_x: (viewport.width as f32 - stage_size.x * scale) * 0.5,
            offset_y: (viewport.height as f32 - stage_size.y * scale) * 0.5,
        }
    }

    pub fn stage_to_screen(&self, stage: Vec2) -> (i32, i32) {
        let x = stage.x * self.scale + self.offset_x;
        let y = stage.y * self.scale + self.offset_y;
        (x.round() as i32, y.round() as i32)
    }

    pub fn screen_to_stage(&self, screen_px: Vec2) -> Vec2 {
        Vec2 {
            x: (screen_px.x - self.offset_x) / self.scale,
            y: (screen_px.y - self.offset_y) / self.scale,
        }
    }

    pub fn length_px(&self, stage_length: f32) -> i32 {
        (stage_length * self.scale).round() as i32
    }
}
