use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{OverlayData, Scene};

use super::{draw_overlay, Canvas, Color, Viewport};

const LETTERBOX_COLOR: Color = [4, 4, 8, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Redraws the whole frame from the scene, then the optional overlay.
    pub(crate) fn render_scene(
        &mut self,
        scene: &dyn Scene,
        overlay_data: Option<&OverlayData>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        {
            let mut canvas = Canvas::new(self.pixels.frame_mut(), self.viewport, scene.stage_size());
            canvas.clear(LETTERBOX_COLOR);
            scene.render(&mut canvas);
            if let Some(data) = overlay_data {
                draw_overlay(&mut canvas, data);
            }
        }

        self.pixels.render()
    }
}
