mod canvas;
mod font;
mod overlay;
mod renderer;
mod transform;

pub use canvas::{Canvas, Color};
pub use font::{glyph_rows, wrap_text};
pub(crate) use overlay::{draw_overlay, OverlayData};
pub use renderer::Renderer;
pub use transform::{StageTransform, Viewport};
