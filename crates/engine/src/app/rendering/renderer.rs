use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use crate::app::{Entity, RenderableKind, SceneWorld};

use super::{scene_to_canvas_px, Viewport};

const PLACEHOLDER_COLOR: [u8; 4] = [220, 220, 240, 255];
const DIVIDER_COLOR: [u8; 4] = [8, 8, 10, 255];

/// One scene's world and where on the canvas it is drawn.
pub(crate) struct SceneFrame<'a> {
    pub(crate) world: &'a SceneWorld,
    pub(crate) viewport: Viewport,
    pub(crate) clear_color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRectPx {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

/// Draws both scenes into one fixed-size framebuffer. The buffer keeps the
/// configured canvas size and is scaled onto the window surface, so scene-local
/// coordinates always equal buffer pixels.
pub struct Renderer {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, canvas_width: u32, canvas_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(canvas_width, canvas_height, surface)?;
        Ok(Self {
            pixels,
            width: canvas_width,
            height: canvas_height,
        })
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub(crate) fn render_scenes(&mut self, frames: &[SceneFrame<'_>]) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let width = self.width;
        draw_scene_frames(self.pixels.frame_mut(), width, frames);
        self.pixels.render()
    }
}

fn draw_scene_frames(frame: &mut [u8], frame_width: u32, frames: &[SceneFrame<'_>]) {
    for scene_frame in frames {
        let viewport = scene_frame.viewport;
        fill_viewport(frame, frame_width, viewport, rgba_from_hex(scene_frame.clear_color));
        for entity in scene_frame.world.draw_order() {
            draw_entity(frame, frame_width, viewport, entity);
        }
    }
    for scene_frame in frames.iter().skip(1) {
        let viewport = scene_frame.viewport;
        let divider = ScreenRectPx {
            left: viewport.x as i32,
            right: viewport.x as i32,
            top: viewport.y as i32,
            bottom: (viewport.y + viewport.height) as i32 - 1,
        };
        fill_rect_clipped(frame, frame_width, viewport, divider, DIVIDER_COLOR);
    }
}

fn draw_entity(frame: &mut [u8], frame_width: u32, viewport: Viewport, entity: &Entity) {
    let bounds = entity.bounds();
    let (left, top) = scene_to_canvas_px(viewport, bounds.min);
    let (right, bottom) = scene_to_canvas_px(viewport, bounds.max);
    // Max edges are exclusive in scene space.
    let rect = ScreenRectPx {
        left,
        right: right - 1,
        top,
        bottom: bottom - 1,
    };
    match &entity.renderable.kind {
        RenderableKind::Placeholder => {
            fill_rect_clipped(frame, frame_width, viewport, rect, PLACEHOLDER_COLOR)
        }
        RenderableKind::Tinted { tint, .. } => {
            fill_rect_clipped(frame, frame_width, viewport, rect, rgba_from_hex(*tint))
        }
        RenderableKind::Outline { color } => {
            outline_rect_clipped(frame, frame_width, viewport, rect, rgba_from_hex(*color))
        }
    }
}

fn rgba_from_hex(color: u32) -> [u8; 4] {
    [
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
        255,
    ]
}

fn fill_viewport(frame: &mut [u8], frame_width: u32, viewport: Viewport, color: [u8; 4]) {
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }
    let rect = ScreenRectPx {
        left: viewport.x as i32,
        right: (viewport.x + viewport.width) as i32 - 1,
        top: viewport.y as i32,
        bottom: (viewport.y + viewport.height) as i32 - 1,
    };
    fill_rect_clipped(frame, frame_width, viewport, rect, color);
}

fn fill_rect_clipped(
    frame: &mut [u8],
    frame_width: u32,
    clip: Viewport,
    rect: ScreenRectPx,
    color: [u8; 4],
) {
    for y in rect.top..=rect.bottom {
        for x in rect.left..=rect.right {
            if clip.contains_px(x, y) {
                write_pixel_rgba_clipped(frame, frame_width as usize, x, y, color);
            }
        }
    }
}

fn outline_rect_clipped(
    frame: &mut [u8],
    frame_width: u32,
    clip: Viewport,
    rect: ScreenRectPx,
    color: [u8; 4],
) {
    for x in rect.left..=rect.right {
        for y in [rect.top, rect.bottom] {
            if clip.contains_px(x, y) {
                write_pixel_rgba_clipped(frame, frame_width as usize, x, y, color);
            }
        }
    }
    for y in rect.top..=rect.bottom {
        for x in [rect.left, rect.right] {
            if clip.contains_px(x, y) {
                write_pixel_rgba_clipped(frame, frame_width as usize, x, y, color);
            }
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}
