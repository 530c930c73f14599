use engine::Vec2;

use crate::app::registry::clamp_axis;

/// Advances `position` by the axis input at `speed` px/s. Diagonals are
/// normalized so every direction moves at the same speed, and the result keeps
/// the shape of `half_extents` inside `zone_size`.
pub(crate) fn step_position(
    position: Vec2,
    axes: (f32, f32),
    speed: f32,
    dt_seconds: f32,
    half_extents: Vec2,
    zone_size: Vec2,
) -> Vec2 {
    let (mut dx, mut dy) = axes;
    if dx != 0.0 && dy != 0.0 {
        dx *= std::f32::consts::FRAC_1_SQRT_2;
        dy *= std::f32::consts::FRAC_1_SQRT_2;
    }
    let distance = speed * dt_seconds;
    Vec2::new(
        clamp_axis(position.x + dx * distance, half_extents.x, zone_size.x),
        clamp_axis(position.y + dy * distance, half_extents.y, zone_size.y),
    )
}
