use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Narrowphase primitive tests.
pub struct Narrowphase;

/// Rect edge order used by [`Narrowphase::raycast_rect`]; ties between equal
/// hit distances resolve to the earliest entry.
const EDGE_FLAGS: [HitFlags; 4] = [
    HitFlags::TOP,
    HitFlags::LEFT,
    HitFlags::BOTTOM,
    HitFlags::RIGHT,
];

const EDGE_NORMALS: [Vec2; 4] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
];

/// Corner labels used by [`Narrowphase::sweep_circle_rect`], paired with the
/// corner array order {top-left, bottom-right, top-right, bottom-left}.
const CORNER_FLAGS: [HitFlags; 4] = [
    HitFlags::LEFT_TOP_CORNER,
    HitFlags::RIGHT_BOTTOM_CORNER,
    HitFlags::RIGHT_TOP_CORNER,
    HitFlags::LEFT_BOTTOM_CORNER,
];

impl NarrowphaseApi for Narrowphase {
    fn nearest_rect_point(r: &Rect, p: Vec2) -> Vec2 {
        p.clamp(r.min(), r.max())
    }

    fn nearest_circle_point(c: &Circle, p: Vec2) -> Vec2 {
        (p - c.center).normalize() * c.radius + c.center
    }

    fn is_point_in_rect(p: Vec2, r: &Rect) -> bool {
        let min = r.min();
        let max = r.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    fn is_point_in_circle(p: Vec2, c: &Circle) -> bool {
        (p - c.center).length_squared() <= c.radius * c.radius
    }

    fn is_rects_intersect(r1: &Rect, r2: &Rect) -> bool {
        // Minkowski sum: inflate r1 by r2's extents, test r2's center.
        let inflated = Rect::new(r1.center, r1.half_size + r2.half_size);
        Self::is_point_in_rect(r2.center, &inflated)
    }

    fn is_circles_intersect(c1: &Circle, c2: &Circle) -> bool {
        let radius_sum = c1.radius + c2.radius;
        (c1.center - c2.center).length_squared() <= radius_sum * radius_sum
    }

    fn is_circle_rect_intersect(c: &Circle, r: &Rect) -> bool {
        Self::is_point_in_circle(Self::nearest_rect_point(r, c.center), c)
    }

    fn ray_intersect(p1: Vec2, dir1: Vec2, p2: Vec2, dir2: Vec2) -> Option<(f32, f32)> {
        let delta = dir1.perp_dot(-dir2);
        if delta.abs() <= f32::EPSILON {
            return None;
        }

        let p_diff = p2 - p1;
        let t1 = p_diff.perp_dot(-dir2) / delta;
        let t2 = dir1.perp_dot(p_diff) / delta;

        if t1 >= 0.0 && t2 >= 0.0 {
            Some((t1, t2))
        } else {
            None
        }
    }

    fn raycast_rect(p: Vec2, dir: Vec2, r: &Rect) -> Option<HitResult> {
        if Self::is_point_in_rect(p, r) {
            return Some(HitResult::initial_overlap());
        }

        let top_left = r.min();
        let bottom_right = r.max();
        let extent_x = Vec2::X * (r.half_size.x * 2.0);
        let extent_y = Vec2::Y * (r.half_size.y * 2.0);

        // Each edge is a bounded segment; the second parameter rejects hits
        // outside it.
        let edges = [
            Self::ray_intersect(p, dir, top_left, extent_x),
            Self::ray_intersect(p, dir, top_left, extent_y),
            Self::ray_intersect(p, dir, bottom_right, -extent_x),
            Self::ray_intersect(p, dir, bottom_right, -extent_y),
        ];

        let mut best: Option<usize> = None;
        let mut best_t = f32::INFINITY;
        for (i, edge) in edges.iter().enumerate() {
            let Some((t, s)) = edge else { continue };
            if *s < 0.0 || *s > 1.0 {
                continue;
            }
            if *t < best_t {
                best_t = *t;
                best = Some(i);
            }
        }

        best.map(|i| HitResult {
            t: best_t,
            flags: EDGE_FLAGS[i],
            normal: EDGE_NORMALS[i],
            is_initial_overlap: false,
        })
    }

    fn raycast_circle(p: Vec2, dir: Vec2, c: &Circle) -> Option<HitResult> {
        let q = p - c.center;
        let a = dir.length_squared() as f64;
        let b = 2.0 * q.dot(dir) as f64;
        let cc = (q.length_squared() - c.radius * c.radius) as f64;
        let delta = b * b - 4.0 * a * cc;

        if delta <= f32::EPSILON as f64 {
            return None;
        }

        let sqrt_delta = delta.sqrt();
        let t1 = (-b + sqrt_delta) / (2.0 * a);
        let t2 = (-b - sqrt_delta) / (2.0 * a);

        if t1 < 0.0 || t2 < 0.0 {
            if t1 < 0.0 && t2 < 0.0 {
                return None;
            }
            // One root behind: origin is inside the circle.
            return Some(HitResult::initial_overlap());
        }

        let t = t1.min(t2) as f32;
        Some(HitResult {
            t,
            flags: HitFlags::NONE,
            normal: ((p + dir * t) - c.center).normalize(),
            is_initial_overlap: false,
        })
    }

    fn sweep_rects(moving: &Rect, stationary: &Rect, dir: Vec2) -> Option<HitResult> {
        let inflated = Rect::new(stationary.center, stationary.half_size + moving.half_size);
        Self::raycast_rect(moving.center, dir, &inflated)
    }

    fn sweep_circles(moving: &Circle, stationary: &Circle, dir: Vec2) -> Option<HitResult> {
        let inflated = Circle::new(stationary.center, stationary.radius + moving.radius);
        Self::raycast_circle(moving.center, dir, &inflated)
    }

    fn sweep_circle_rect(moving: &Circle, stationary: &Rect, dir: Vec2) -> Option<HitResult> {
        let top_left = stationary.min();
        let bottom_right = stationary.max();

        let inflated = Rect::new(
            stationary.center,
            stationary.half_size + Vec2::splat(moving.radius),
        );

        // A face hit only counts if the contact projects onto the rect's
        // span along the other axis; past the span the rounded corner rules.
        if let Some(hit) = Self::raycast_rect(moving.center, dir, &inflated) {
            let final_position = moving.center + dir * hit.t;
            if hit.flags.intersects(HitFlags::LEFT) || hit.flags.intersects(HitFlags::RIGHT) {
                if final_position.y >= top_left.y && final_position.y <= bottom_right.y {
                    return Some(hit);
                }
            }
            if hit.flags.intersects(HitFlags::TOP) || hit.flags.intersects(HitFlags::BOTTOM) {
                if final_position.x >= top_left.x && final_position.x <= bottom_right.x {
                    return Some(hit);
                }
            }
        }

        let span_x = Vec2::X * (stationary.half_size.x * 2.0);
        let corners = [
            top_left,
            bottom_right,
            top_left + span_x,
            bottom_right - span_x,
        ];

        let mut corner_hits: [Option<HitResult>; 4] = [None; 4];
        for (i, corner) in corners.iter().enumerate() {
            corner_hits[i] =
                Self::raycast_circle(moving.center, dir, &Circle::new(*corner, moving.radius));
        }

        if let Some(initial) = corner_hits
            .iter()
            .flatten()
            .find(|hit| hit.is_initial_overlap)
        {
            return Some(*initial);
        }

        let mut best: Option<(usize, HitResult)> = None;
        for (i, hit) in corner_hits.iter().enumerate() {
            let Some(hit) = hit else { continue };
            if best.is_none_or(|(_, b)| hit.t < b.t) {
                best = Some((i, *hit));
            }
        }

        best.map(|(i, mut hit)| {
            hit.flags = CORNER_FLAGS[i];
            hit
        })
    }

    fn rect_union(r1: &Rect, r2: &Rect) -> Rect {
        let min = r1.min().min(r2.min());
        let max = r1.max().max(r2.max());
        Rect::new((min + max) * 0.5, (max - min) * 0.5)
    }

    fn decompose_vector(v: Vec2, normal: Vec2) -> (Vec2, Vec2) {
        let normal_component = v.dot(normal) * normal;
        (v - normal_component, normal_component)
    }
}
