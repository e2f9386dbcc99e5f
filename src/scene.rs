use std::collections::HashSet;

use glam::{UVec2, Vec2};

use crate::api::{DebugColor, DebugDraw, NarrowphaseApi};
use crate::chunk::TilemapCollision;
use crate::narrowphase::Narrowphase;
use crate::types::*;

/// Extra margin added to every broad-phase box so near-touching candidates
/// survive into the narrow phase.
const BROAD_SKIN: Vec2 = Vec2::ONE;

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Kinematic collision scene: owns every actor and tilemap, answers sweep
/// and overlap queries against them.
///
/// Actors live in a generational arena; an [`ActorId`] whose slot was freed
/// (and possibly reused) fails lookup instead of aliasing the new occupant.
/// Queries take `&self` and allocate their own result buffers, so shared
/// references can query concurrently.
#[derive(Debug, Default)]
pub struct PhysicsScene {
    actors: Vec<Slot<PhysicsActor>>,
    free_actors: Vec<u32>,
    tilemaps: Vec<Slot<TilemapCollision>>,
    free_tilemaps: Vec<u32>,
    debug_draw: bool,
}

impl PhysicsScene {
    pub fn new() -> Self {
        Self::default()
    }

    // Actor lifecycle ------------------------------------------------------

    /// Create a free-standing actor, scanned linearly by every query.
    /// Defaults to colliding with everything; adjust via
    /// [`PhysicsActor::set_collision_layer`] / `set_collision_mask`.
    pub fn create_actor(&mut self, entity: Entity, shape: impl Into<Shape>) -> ActorId {
        self.alloc_actor(PhysicsActor::new(entity, shape.into(), StorageKind::Normal))
    }

    /// Create a free-standing actor from a configuration record.
    pub fn create_actor_from_info(&mut self, entity: Entity, info: &ActorInfo) -> ActorId {
        let mut actor = PhysicsActor::new(entity, info.shape, StorageKind::Normal);
        actor.set_collision_layer(info.collision_layer);
        actor.set_collision_mask(info.collision_mask);
        self.alloc_actor(actor)
    }

    /// Create a static actor registered in one tilemap layer's chunk cells.
    /// Returns `None` (and logs) when the actor's bounds fall outside the
    /// layer's non-negative chunk space, or when `tilemap`/`layer` is stale.
    pub fn create_actor_in_chunk(
        &mut self,
        entity: Entity,
        tilemap: TilemapId,
        layer: u32,
        shape: impl Into<Shape>,
    ) -> Option<ActorId> {
        let shape = shape.into();
        if self
            .tilemap(tilemap)
            .and_then(|map| map.layers.get(layer as usize))
            .is_none()
        {
            log::error!("create_actor_in_chunk: unknown tilemap {tilemap:?} layer {layer}");
            return None;
        }

        let id = self.alloc_actor(PhysicsActor::new(
            entity,
            shape,
            StorageKind::InChunk { tilemap, layer },
        ));
        let bounds = shape.bounding_box();

        let map = self.tilemap_mut(tilemap)?;
        if !map.layers[layer as usize].insert(&bounds, id) {
            self.free_actor_slot(id);
            return None;
        }
        map.actors.push(id);
        Some(id)
    }

    /// Remove an actor and free its id. A chunk-stored actor is also erased
    /// from every cell its bounds cover. Stale ids are ignored.
    pub fn remove_actor(&mut self, id: ActorId) {
        let Some(actor) = self.actor(id) else {
            log::warn!("remove_actor: stale id {id:?}");
            return;
        };
        let storage = actor.storage_kind();
        let bounds = actor.shape().bounding_box();

        if let StorageKind::InChunk { tilemap, layer } = storage {
            if let Some(map) = self.tilemap_mut(tilemap) {
                if let Some(chunk_layer) = map.layers.get_mut(layer as usize) {
                    chunk_layer.remove(&bounds, id);
                }
                map.actors.retain(|a| *a != id);
            }
        }
        self.free_actor_slot(id);
    }

    pub fn actor(&self, id: ActorId) -> Option<&PhysicsActor> {
        let slot = self.actors.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut PhysicsActor> {
        let slot = self.actors.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Position-sync hook: place the actor's shape at `p`. Chunk-stored
    /// actors keep their original cell registration.
    pub fn move_actor_to(&mut self, id: ActorId, p: Vec2) {
        if let Some(actor) = self.actor_mut(id) {
            actor.shape.move_to(p);
        }
    }

    pub fn translate_actor(&mut self, id: ActorId, delta: Vec2) {
        if let Some(actor) = self.actor_mut(id) {
            actor.shape.translate(delta);
        }
    }

    // Tilemap lifecycle ----------------------------------------------------

    pub fn create_tilemap(&mut self, topleft: Vec2) -> TilemapId {
        let map = TilemapCollision::new(topleft);
        if let Some(index) = self.free_tilemaps.pop() {
            let slot = &mut self.tilemaps[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(map);
            TilemapId {
                index,
                generation: slot.generation,
            }
        } else {
            self.tilemaps.push(Slot {
                generation: 0,
                value: Some(map),
            });
            TilemapId {
                index: (self.tilemaps.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Add a chunk layer to a tilemap. `tile_size` is in world units,
    /// `chunk_size` in tiles. Returns the layer index.
    pub fn create_tilemap_layer(
        &mut self,
        id: TilemapId,
        tile_size: UVec2,
        chunk_size: UVec2,
    ) -> Option<u32> {
        Some(self.tilemap_mut(id)?.create_layer(tile_size, chunk_size))
    }

    /// Remove a tilemap along with every actor registered in it.
    pub fn remove_tilemap(&mut self, id: TilemapId) {
        let Some(slot) = self.tilemaps.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation {
            return;
        }
        let Some(map) = slot.value.take() else { return };
        for actor in map.actors {
            self.free_actor_slot(actor);
        }
        self.free_tilemaps.push(id.index);
    }

    // Queries --------------------------------------------------------------

    /// Sweep `shape` along `dir` (normalized) for `dist` units against every
    /// actor whose layer intersects `mask`. Results are sorted by ascending
    /// hit distance and silently truncated to `limit`; initial overlaps sort
    /// first at `t = 0`.
    pub fn sweep(
        &self,
        shape: &Shape,
        mask: CollisionGroup,
        dir: Vec2,
        dist: f32,
        limit: usize,
    ) -> Vec<SweepResult> {
        self.sweep_filtered(shape, mask, dir, dist, limit, None)
    }

    /// Sweep an existing actor's shape with its own mask, never reporting
    /// the actor itself.
    pub fn sweep_actor(
        &self,
        id: ActorId,
        dir: Vec2,
        dist: f32,
        limit: usize,
    ) -> Vec<SweepResult> {
        let Some(actor) = self.actor(id) else {
            return Vec::new();
        };
        self.sweep_filtered(actor.shape(), actor.collision_mask(), dir, dist, limit, Some(id))
    }

    /// All actors whose shape overlaps `shape` and whose layer intersects
    /// `mask`, truncated to `limit`. Unordered.
    pub fn overlap(&self, shape: &Shape, mask: CollisionGroup, limit: usize) -> Vec<OverlapResult> {
        self.overlap_filtered(shape, mask, limit, None)
    }

    /// Overlaps of an existing actor, excluding itself.
    pub fn overlap_actor(&self, id: ActorId, limit: usize) -> Vec<OverlapResult> {
        let Some(actor) = self.actor(id) else {
            return Vec::new();
        };
        self.overlap_filtered(actor.shape(), actor.collision_mask(), limit, Some(id))
    }

    /// Pairwise shape test between two live actors; masks are not consulted.
    pub fn overlap_actors(&self, a: ActorId, b: ActorId) -> bool {
        match (self.actor(a), self.actor(b)) {
            (Some(a), Some(b)) => Self::overlap_shapes(a.shape(), b.shape()),
            _ => false,
        }
    }

    /// Exact overlap test between two shapes.
    pub fn overlap_shapes(a: &Shape, b: &Shape) -> bool {
        match (a, b) {
            (Shape::Rect(a), Shape::Rect(b)) => Narrowphase::is_rects_intersect(a, b),
            (Shape::Circle(a), Shape::Circle(b)) => Narrowphase::is_circles_intersect(a, b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                Narrowphase::is_circle_rect_intersect(c, r)
            }
        }
    }

    /// Exact sweep of `moving` along `dir` against a stationary shape.
    pub fn sweep_shapes(moving: &Shape, stationary: &Shape, dir: Vec2) -> Option<HitResult> {
        match (moving, stationary) {
            (Shape::Rect(m), Shape::Rect(s)) => Narrowphase::sweep_rects(m, s, dir),
            (Shape::Circle(m), Shape::Circle(s)) => Narrowphase::sweep_circles(m, s, dir),
            (Shape::Circle(m), Shape::Rect(s)) => Narrowphase::sweep_circle_rect(m, s, dir),
            // The circle-rect sweep is relative motion; flip the direction
            // when the rect is the mover.
            (Shape::Rect(m), Shape::Circle(s)) => Narrowphase::sweep_circle_rect(s, m, -dir),
        }
    }

    // Debug draw -----------------------------------------------------------

    pub fn toggle_debug_draw(&mut self) {
        self.debug_draw = !self.debug_draw;
    }

    pub fn is_debug_draw_enabled(&self) -> bool {
        self.debug_draw
    }

    /// Draw every actor shape (red) and every allocated chunk boundary
    /// (green). No-op unless debug draw was toggled on.
    pub fn render_debug(&self, draw: &mut dyn DebugDraw) {
        if !self.debug_draw {
            return;
        }
        for slot in &self.actors {
            let Some(actor) = &slot.value else { continue };
            match actor.shape() {
                Shape::Rect(r) => draw.draw_rect(r, DebugColor::Red),
                Shape::Circle(c) => draw.draw_circle(c, DebugColor::Red),
            }
        }
        for slot in &self.tilemaps {
            let Some(map) = &slot.value else { continue };
            for layer in &map.layers {
                layer.each_chunk_rect(&mut |r| {
                    draw.draw_rect(&Rect::new(r.center + map.topleft, r.half_size), DebugColor::Green);
                });
            }
        }
    }

    // Internals ------------------------------------------------------------

    fn alloc_actor(&mut self, actor: PhysicsActor) -> ActorId {
        if let Some(index) = self.free_actors.pop() {
            let slot = &mut self.actors[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(actor);
            ActorId {
                index,
                generation: slot.generation,
            }
        } else {
            self.actors.push(Slot {
                generation: 0,
                value: Some(actor),
            });
            ActorId {
                index: (self.actors.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    fn free_actor_slot(&mut self, id: ActorId) {
        if let Some(slot) = self.actors.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.value.take().is_some() {
                self.free_actors.push(id.index);
            }
        }
    }

    fn tilemap(&self, id: TilemapId) -> Option<&TilemapCollision> {
        let slot = self.tilemaps.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    fn tilemap_mut(&mut self, id: TilemapId) -> Option<&mut TilemapCollision> {
        let slot = self.tilemaps.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Identity exclusion first, then mask-vs-layer.
    fn check_need_query(
        actor: &PhysicsActor,
        id: ActorId,
        exclude: Option<ActorId>,
        mask: CollisionGroup,
    ) -> bool {
        if exclude == Some(id) {
            return false;
        }
        mask.can_collide(actor.collision_layer())
    }

    /// Bounds of the whole swept motion, with skin.
    fn sweep_bounding_box(shape: &Shape, dir: Vec2, dist: f32) -> Rect {
        let bb = shape.bounding_box();
        let half_travel = dir * dist * 0.5;
        Rect::new(
            bb.center + half_travel,
            bb.half_size + half_travel.abs() + BROAD_SKIN,
        )
    }

    /// Broad phase: AABB-pruned candidate ids. Free actors via a linear
    /// scan, chunk-stored actors via the cell ranges their tilemaps cover,
    /// deduplicated across cells.
    fn broad_candidates(
        &self,
        broad: &Rect,
        exclude: Option<ActorId>,
        mask: CollisionGroup,
    ) -> Vec<ActorId> {
        let mut out = Vec::new();

        for (index, slot) in self.actors.iter().enumerate() {
            let Some(actor) = &slot.value else { continue };
            if actor.storage_kind() != StorageKind::Normal {
                continue;
            }
            let id = ActorId {
                index: index as u32,
                generation: slot.generation,
            };
            if !Self::check_need_query(actor, id, exclude, mask) {
                continue;
            }
            if Narrowphase::is_rects_intersect(broad, &actor.shape().bounding_box()) {
                out.push(id);
            }
        }

        let mut seen: HashSet<ActorId> = HashSet::new();
        for slot in &self.tilemaps {
            let Some(map) = &slot.value else { continue };
            if !Narrowphase::is_rects_intersect(broad, &map.bounds()) {
                continue;
            }
            for layer in &map.layers {
                layer.each_overlapping(broad, &mut |id| {
                    if !seen.insert(id) {
                        return;
                    }
                    let Some(actor) = self.actor(id) else { return };
                    if Self::check_need_query(actor, id, exclude, mask) {
                        out.push(id);
                    }
                });
            }
        }

        out
    }

    fn sweep_filtered(
        &self,
        shape: &Shape,
        mask: CollisionGroup,
        dir: Vec2,
        dist: f32,
        limit: usize,
        exclude: Option<ActorId>,
    ) -> Vec<SweepResult> {
        let broad = Self::sweep_bounding_box(shape, dir, dist);
        let mut results = Vec::new();

        for id in self.broad_candidates(&broad, exclude, mask) {
            let Some(actor) = self.actor(id) else { continue };
            let Some(hit) = Self::sweep_shapes(shape, actor.shape(), dir) else {
                continue;
            };
            if hit.t > dist {
                continue;
            }
            results.push(SweepResult {
                hit,
                entity: actor.entity(),
                actor: id,
            });
        }

        results.sort_unstable_by(|a, b| a.hit.t.total_cmp(&b.hit.t));
        results.truncate(limit);
        results
    }

    fn overlap_filtered(
        &self,
        shape: &Shape,
        mask: CollisionGroup,
        limit: usize,
        exclude: Option<ActorId>,
    ) -> Vec<OverlapResult> {
        let broad = {
            let bb = shape.bounding_box();
            Rect::new(bb.center, bb.half_size + BROAD_SKIN)
        };
        let mut results = Vec::new();

        for id in self.broad_candidates(&broad, exclude, mask) {
            if results.len() >= limit {
                break;
            }
            let Some(actor) = self.actor(id) else { continue };
            if Self::overlap_shapes(shape, actor.shape()) {
                results.push(OverlapResult {
                    entity: actor.entity(),
                    actor: id,
                });
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, hw: f32, hh: f32) -> Shape {
        Shape::Rect(Rect::new(Vec2::new(x, y), Vec2::new(hw, hh)))
    }

    fn circle(x: f32, y: f32, r: f32) -> Shape {
        Shape::Circle(Circle::new(Vec2::new(x, y), r))
    }

    #[test]
    fn test_sweep_sorted_and_truncated() {
        let mut scene = PhysicsScene::new();
        scene.create_actor(30, rect(30.0, 0.0, 1.0, 1.0));
        scene.create_actor(10, rect(10.0, 0.0, 1.0, 1.0));
        scene.create_actor(20, rect(20.0, 0.0, 1.0, 1.0));

        let probe = rect(0.0, 0.0, 1.0, 1.0);
        let hits = scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 100.0, 16);
        assert_eq!(hits.len(), 3);
        let entities: Vec<Entity> = hits.iter().map(|h| h.entity).collect();
        assert_eq!(entities, vec![10, 20, 30]);
        assert!(hits[0].hit.t < hits[1].hit.t);
        assert!(hits[1].hit.t < hits[2].hit.t);

        let capped = scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 100.0, 2);
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].entity, 10);
        assert_eq!(capped[1].entity, 20);
    }

    #[test]
    fn test_sweep_respects_distance() {
        let mut scene = PhysicsScene::new();
        scene.create_actor(1, rect(50.0, 0.0, 1.0, 1.0));
        let probe = rect(0.0, 0.0, 1.0, 1.0);
        assert!(scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 10.0, 16).is_empty());
        assert_eq!(scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 60.0, 16).len(), 1);
    }

    #[test]
    fn test_sweep_actor_excludes_self() {
        let mut scene = PhysicsScene::new();
        let id = scene.create_actor(1, rect(0.0, 0.0, 1.0, 1.0));
        scene.create_actor(2, rect(10.0, 0.0, 1.0, 1.0));
        let hits = scene.sweep_actor(id, Vec2::X, 100.0, 16);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, 2);

        // Overlapping itself never shows up either.
        let overlaps = scene.overlap_actor(id, 16);
        assert!(overlaps.iter().all(|o| o.actor != id));
    }

    #[test]
    fn test_mask_filtering() {
        let mut scene = PhysicsScene::new();
        let id = scene.create_actor(1, rect(10.0, 0.0, 1.0, 1.0));
        scene
            .actor_mut(id)
            .unwrap()
            .set_collision_layer(CollisionGroup::single(3));

        let probe = rect(0.0, 0.0, 1.0, 1.0);
        assert!(scene
            .sweep(&probe, CollisionGroup::single(5), Vec2::X, 100.0, 16)
            .is_empty());
        assert_eq!(
            scene
                .sweep(&probe, CollisionGroup::single(3), Vec2::X, 100.0, 16)
                .len(),
            1
        );
    }

    #[test]
    fn test_rect_sweeps_into_circle() {
        let mut scene = PhysicsScene::new();
        scene.create_actor(1, circle(10.0, 0.0, 1.0));
        let probe = rect(0.0, 0.0, 1.0, 1.0);
        let hits = scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 100.0, 16);
        assert_eq!(hits.len(), 1);
        // Gap between rect face and circle boundary is 10 - 1 - 1 = 8.
        assert!((hits[0].hit.t - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlap_shapes_symmetric() {
        let pairs = [
            (rect(0.0, 0.0, 1.0, 1.0), rect(1.5, 0.0, 1.0, 1.0), true),
            (rect(0.0, 0.0, 1.0, 1.0), rect(5.0, 0.0, 1.0, 1.0), false),
            (circle(0.0, 0.0, 1.0), circle(1.5, 0.0, 1.0), true),
            (circle(0.0, 0.0, 1.0), circle(5.0, 0.0, 1.0), false),
            (circle(1.4, 0.0, 0.5), rect(0.0, 0.0, 1.0, 1.0), true),
            (circle(5.0, 0.0, 0.5), rect(0.0, 0.0, 1.0, 1.0), false),
        ];
        for (a, b, expected) in pairs {
            assert_eq!(PhysicsScene::overlap_shapes(&a, &b), expected);
            assert_eq!(PhysicsScene::overlap_shapes(&b, &a), expected);
        }
    }

    #[test]
    fn test_chunk_actor_roundtrip() {
        let mut scene = PhysicsScene::new();
        let map = scene.create_tilemap(Vec2::ZERO);
        let layer = scene
            .create_tilemap_layer(map, UVec2::splat(16), UVec2::splat(8))
            .unwrap();
        let id = scene
            .create_actor_in_chunk(7, map, layer, rect(40.0, 40.0, 8.0, 8.0))
            .unwrap();

        let probe = rect(40.0, 40.0, 1.0, 1.0);
        let overlaps = scene.overlap(&probe, CollisionGroup::ALL, 16);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].entity, 7);

        // Sweeps reach chunk actors too.
        let start = rect(40.0, 0.0, 1.0, 1.0);
        let hits = scene.sweep(&start, CollisionGroup::ALL, Vec2::Y, 100.0, 16);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].actor, id);

        scene.remove_actor(id);
        assert!(scene.actor(id).is_none());
        assert!(scene.overlap(&probe, CollisionGroup::ALL, 16).is_empty());
    }

    #[test]
    fn test_chunk_actor_negative_bounds_rejected() {
        let mut scene = PhysicsScene::new();
        let map = scene.create_tilemap(Vec2::ZERO);
        let layer = scene
            .create_tilemap_layer(map, UVec2::splat(16), UVec2::splat(8))
            .unwrap();
        assert!(scene
            .create_actor_in_chunk(1, map, layer, rect(-40.0, 8.0, 4.0, 4.0))
            .is_none());
        let everything = rect(0.0, 0.0, 1000.0, 1000.0);
        assert!(scene.overlap(&everything, CollisionGroup::ALL, 16).is_empty());
    }

    #[test]
    fn test_stale_id_fails_lookup_after_reuse() {
        let mut scene = PhysicsScene::new();
        let old = scene.create_actor(1, rect(0.0, 0.0, 1.0, 1.0));
        scene.remove_actor(old);
        let new = scene.create_actor(2, rect(0.0, 0.0, 1.0, 1.0));
        // Slot was reused; the stale handle must not alias the new actor.
        assert_eq!(old.index, new.index);
        assert!(scene.actor(old).is_none());
        assert_eq!(scene.actor(new).unwrap().entity(), 2);
        // Removing through the stale id leaves the new actor alone.
        scene.remove_actor(old);
        assert!(scene.actor(new).is_some());
    }

    #[test]
    fn test_remove_tilemap_frees_actors() {
        let mut scene = PhysicsScene::new();
        let map = scene.create_tilemap(Vec2::ZERO);
        let layer = scene
            .create_tilemap_layer(map, UVec2::splat(16), UVec2::splat(8))
            .unwrap();
        let a = scene
            .create_actor_in_chunk(1, map, layer, rect(24.0, 24.0, 4.0, 4.0))
            .unwrap();
        scene.remove_tilemap(map);
        assert!(scene.actor(a).is_none());
        let probe = rect(24.0, 24.0, 1.0, 1.0);
        assert!(scene.overlap(&probe, CollisionGroup::ALL, 16).is_empty());
    }

    #[test]
    fn test_move_actor_updates_queries() {
        let mut scene = PhysicsScene::new();
        let id = scene.create_actor(1, rect(0.0, 0.0, 1.0, 1.0));
        let probe = circle(20.0, 0.0, 1.0);
        assert!(scene.overlap(&probe, CollisionGroup::ALL, 16).is_empty());
        scene.move_actor_to(id, Vec2::new(20.0, 0.0));
        assert_eq!(scene.overlap(&probe, CollisionGroup::ALL, 16).len(), 1);
        scene.translate_actor(id, Vec2::new(100.0, 0.0));
        assert!(scene.overlap(&probe, CollisionGroup::ALL, 16).is_empty());
        assert_eq!(scene.actor(id).unwrap().position(), Vec2::new(120.0, 0.0));
    }

    #[test]
    fn test_initial_overlap_sorts_first() {
        let mut scene = PhysicsScene::new();
        scene.create_actor(1, rect(10.0, 0.0, 1.0, 1.0));
        scene.create_actor(2, rect(0.5, 0.0, 1.0, 1.0));
        let probe = rect(0.0, 0.0, 1.0, 1.0);
        let hits = scene.sweep(&probe, CollisionGroup::ALL, Vec2::X, 100.0, 16);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, 2);
        assert!(hits[0].hit.is_initial_overlap);
        assert_eq!(hits[0].hit.t, 0.0);
    }

    #[test]
    fn test_debug_draw_gated_and_colored() {
        struct Recorder {
            rects: Vec<(Rect, DebugColor)>,
            circles: Vec<(Circle, DebugColor)>,
        }
        impl DebugDraw for Recorder {
            fn draw_rect(&mut self, rect: &Rect, color: DebugColor) {
                self.rects.push((*rect, color));
            }
            fn draw_circle(&mut self, circle: &Circle, color: DebugColor) {
                self.circles.push((*circle, color));
            }
        }

        let mut scene = PhysicsScene::new();
        scene.create_actor(1, rect(0.0, 0.0, 1.0, 1.0));
        scene.create_actor(2, circle(5.0, 0.0, 1.0));
        let map = scene.create_tilemap(Vec2::ZERO);
        let layer = scene
            .create_tilemap_layer(map, UVec2::splat(16), UVec2::splat(8))
            .unwrap();
        scene
            .create_actor_in_chunk(3, map, layer, rect(24.0, 24.0, 4.0, 4.0))
            .unwrap();

        let mut rec = Recorder {
            rects: Vec::new(),
            circles: Vec::new(),
        };
        scene.render_debug(&mut rec);
        assert!(rec.rects.is_empty() && rec.circles.is_empty());

        scene.toggle_debug_draw();
        assert!(scene.is_debug_draw_enabled());
        scene.render_debug(&mut rec);
        // Two red actor rects (free + chunk) and one green chunk boundary.
        assert_eq!(rec.circles.len(), 1);
        assert_eq!(rec.circles[0].1, DebugColor::Red);
        let reds = rec.rects.iter().filter(|(_, c)| *c == DebugColor::Red).count();
        let greens = rec.rects.iter().filter(|(_, c)| *c == DebugColor::Green).count();
        assert_eq!(reds, 2);
        assert_eq!(greens, 1);
    }
}
