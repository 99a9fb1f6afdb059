//! Rectangle collision tests.
//!
//! Every function here is pure: spacing values come in as parameters and
//! nothing is cached between calls.

use roomfit_core::{Obstacle, Rect, SpacingPolicy};

/// Zero-buffer overlap test. Touching edges do not overlap.
#[inline]
pub fn overlaps_strict(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Overlap test with a spacing buffer.
///
/// Both rectangles are grown by `spacing / 2` on every side before testing,
/// so two rectangles exactly `spacing` apart do not collide. A non-positive
/// spacing reduces to [`overlaps_strict`].
pub fn overlaps(a: &Rect, b: &Rect, spacing: f64) -> bool {
    if spacing <= 0.0 {
        return overlaps_strict(a, b);
    }
    let half = spacing / 2.0;
    a.expand(half).intersects(&b.expand(half))
}

/// Returns the first obstacle that `rect` collides with under `margin`.
pub fn obstacle_conflict<'a>(
    rect: &Rect,
    obstacles: &'a [Obstacle],
    margin: f64,
) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| overlaps(rect, &obstacle.rect, margin))
}

/// True if `rect` keeps at least `margin` from every obstacle.
pub fn clears_obstacles(rect: &Rect, obstacles: &[Obstacle], margin: f64) -> bool {
    obstacle_conflict(rect, obstacles, margin).is_none()
}

/// True if `rect` keeps the policy-adjusted `spacing` from every placed rectangle.
pub fn clears_placed(rect: &Rect, placed: &[Rect], spacing: f64, policy: &SpacingPolicy) -> bool {
    placed
        .iter()
        .all(|other| !overlaps(rect, other, policy.effective_spacing(rect, other, spacing)))
}
