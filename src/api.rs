use glam::Vec2;

use crate::types::*;

/// Narrowphase and primitive intersection signatures.
///
/// All functions are pure; shapes are taken by reference and never mutated.
/// Directions are expected to be normalized unless noted otherwise.
pub trait NarrowphaseApi {
    // Nearest points -------------------------------------------------------

    /// Closest point on (or inside) the rect to `p`.
    fn nearest_rect_point(r: &Rect, p: Vec2) -> Vec2;

    /// Closest point on the circle's boundary to `p`. Undefined (NaN) when
    /// `p` coincides with the center; caller responsibility.
    fn nearest_circle_point(c: &Circle, p: Vec2) -> Vec2;

    // Overlaps (inclusive boundaries) --------------------------------------

    fn is_point_in_rect(p: Vec2, r: &Rect) -> bool;
    fn is_point_in_circle(p: Vec2, c: &Circle) -> bool;
    fn is_rects_intersect(r1: &Rect, r2: &Rect) -> bool;
    fn is_circles_intersect(c1: &Circle, c2: &Circle) -> bool;
    fn is_circle_rect_intersect(c: &Circle, r: &Rect) -> bool;

    // Raycasts -------------------------------------------------------------

    /// Ray-vs-ray parametric intersection: returns `(t1, t2)` along each
    /// ray, or `None` when the rays are parallel or the crossing lies behind
    /// either origin.
    fn ray_intersect(p1: Vec2, dir1: Vec2, p2: Vec2, dir2: Vec2) -> Option<(f32, f32)>;

    /// Raycast against a rect's four edges. An origin already inside yields
    /// a zero-distance initial-overlap hit with no meaningful normal.
    fn raycast_rect(p: Vec2, dir: Vec2, r: &Rect) -> Option<HitResult>;

    /// Raycast against a circle. An origin already inside yields an
    /// initial-overlap hit.
    fn raycast_circle(p: Vec2, dir: Vec2, c: &Circle) -> Option<HitResult>;

    // Sweeps (Minkowski reduction; `t` is a distance along `dir`) ----------

    fn sweep_rects(moving: &Rect, stationary: &Rect, dir: Vec2) -> Option<HitResult>;
    fn sweep_circles(moving: &Circle, stationary: &Circle, dir: Vec2) -> Option<HitResult>;
    fn sweep_circle_rect(moving: &Circle, stationary: &Rect, dir: Vec2) -> Option<HitResult>;

    // Helpers --------------------------------------------------------------

    /// Smallest rect containing both inputs.
    fn rect_union(r1: &Rect, r2: &Rect) -> Rect;

    /// Split `v` into `(tangent, normal_component)` relative to a unit
    /// surface normal.
    fn decompose_vector(v: Vec2, normal: Vec2) -> (Vec2, Vec2);
}

/// Color used by debug visualization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Green,
}

/// Injected renderer seam for [`crate::PhysicsScene::render_debug`].
pub trait DebugDraw {
    fn draw_rect(&mut self, rect: &Rect, color: DebugColor);
    fn draw_circle(&mut self, circle: &Circle, color: DebugColor);
}

/// Injected event-bus seam; triggers enqueue their events here. Delivery and
/// ordering past the sink are the embedding game's concern.
pub trait EventSink {
    fn enqueue(&mut self, event: TriggerEvent);
}

impl EventSink for Vec<TriggerEvent> {
    fn enqueue(&mut self, event: TriggerEvent) {
        self.push(event);
    }
}
