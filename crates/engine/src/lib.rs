pub mod app;
pub mod bus;

pub use app::{
    run_app, scene_to_canvas_px, split_viewports, Aabb, AppError, Entity, EntityId, InputAction,
    InputSnapshot, LoopConfig, LoopMetricsSnapshot, RenderableDesc, RenderableKind, Renderer,
    Scene, SceneCommand, SceneKey, SceneWorld, Transform, Vec2, Viewport, SLOW_FRAME_ENV_VAR,
};
pub use bus::{EventBus, HandlerId, OwnerId, TopicEvent};
