mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, RENDER_FPS_CAP_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{glyph_rows, wrap_text, Canvas, Color, Renderer, StageTransform, Viewport};
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2};
pub(crate) use rendering::OverlayData;
