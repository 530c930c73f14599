mod renderer;
mod transform;

pub use renderer::Renderer;
pub(crate) use renderer::SceneFrame;
pub use transform::{scene_to_canvas_px, split_viewports, Viewport};
