use crate::app::{SceneKey, Vec2};

/// A rectangular region of the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn contains_px(&self, x: i32, y: i32) -> bool {
        x >= self.x as i32
            && y >= self.y as i32
            && x < (self.x + self.width) as i32
            && y < (self.y + self.height) as i32
    }
}

/// Splits the canvas into two equal halves: scene A on the left, B on the right.
pub fn split_viewports(canvas_width: u32, canvas_height: u32) -> [(SceneKey, Viewport); 2] {
    let half = canvas_width / 2;
    [
        (
            SceneKey::A,
            Viewport {
                x: 0,
                y: 0,
                width: half,
                height: canvas_height,
            },
        ),
        (
            SceneKey::B,
            Viewport {
                x: half,
                y: 0,
                width: canvas_width - half,
                height: canvas_height,
            },
        ),
    ]
}

/// Maps a scene-local position (origin at the viewport's top-left) to canvas
/// pixels.
pub fn scene_to_canvas_px(viewport: Viewport, local: Vec2) -> (i32, i32) {
    (
        (viewport.x as f32 + local.x).round() as i32,
        (viewport.y as f32 + local.y).round() as i32,
    )
}
