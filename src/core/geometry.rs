//! Pure geometry helpers over arena positions

use crate::core::types::Position;

/// Euclidean distance between two positions
#[inline]
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Clamp a position into `[0, width] x [0, height]`
pub fn clamp_to_bounds(position: Position, width: f64, height: f64) -> Position {
    Position {
        x: position.x.clamp(0.0, width.max(0.0)),
        y: position.y.clamp(0.0, height.max(0.0)),
    }
}

/// True when `position` lies in the half-open arena `[0, width) x [0, height)`.
///
/// Non-finite coordinates are never in bounds.
pub fn in_bounds(position: Position, width: f64, height: f64) -> bool {
    position.x >= 0.0 && position.x < width && position.y >= 0.0 && position.y < height
}

/// Midpoint of the arena
pub fn arena_center(width: f64, height: f64) -> Position {
    Position::new(width / 2.0, height / 2.0)
}

/// Step from `from` towards `to` by at most `max_step`, never past `to`.
///
/// A zero-length path yields `from` unchanged.
pub fn step_towards(from: Position, to: Position, max_step: f64) -> Position {
    let remaining = distance(from, to);
    if remaining <= 0.0 || max_step <= 0.0 {
        return from;
    }
    if max_step >= remaining {
        return to;
    }
    let scale = max_step / remaining;
    Position {
        x: from.x + (to.x - from.x) * scale,
        y: from.y + (to.y - from.y) * scale,
    }
}

/// Does the circle at `center` with `radius` touch the axis-aligned square
/// centered at `box_center` with half extent `half_size`?
pub fn circle_intersects_square(
    center: Position,
    radius: f64,
    box_center: Position,
    half_size: f64,
) -> bool {
    let nearest_x = center.x.clamp(box_center.x - half_size, box_center.x + half_size);
    let nearest_y = center.y.clamp(box_center.y - half_size, box_center.y + half_size);
    distance(center, Position::new(nearest_x, nearest_y)) <= radius
}
