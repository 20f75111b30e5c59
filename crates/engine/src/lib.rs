pub mod app;

pub use app::{
    glyph_rows, run_app, wrap_text, AppError, Canvas, Color, InputAction, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, Scene, SceneCommand, StageTransform, Vec2, Viewport,
    RENDER_FPS_CAP_ENV_VAR,
};
