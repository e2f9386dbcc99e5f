use crate::api::EventSink;
use crate::scene::PhysicsScene;
use crate::types::*;

/// Hard cap on actors a trigger tracks per frame; overlaps past this are
/// silently dropped.
const MAX_TOUCHES: usize = 16;

/// Volume that diffs its overlap set every frame and reports Enter, Touch
/// and Leave transitions to an [`EventSink`].
///
/// The trigger owns one scene actor; keeping its position in sync with the
/// owning entity (via [`PhysicsScene::move_actor_to`]) is the caller's job,
/// before `update`.
#[derive(Debug)]
pub struct Trigger {
    actor: ActorId,
    event_type: TriggerEventType,
    fire_every_frame: bool,
    /// Entities are recorded alongside ids so a Leave can still name its
    /// peer after that actor was removed from the scene.
    touching: Vec<(ActorId, Entity)>,
}

impl Trigger {
    pub fn new(
        scene: &mut PhysicsScene,
        entity: Entity,
        shape: impl Into<Shape>,
        event_type: TriggerEventType,
        layer: CollisionGroup,
        mask: CollisionGroup,
        fire_every_frame: bool,
    ) -> Self {
        let actor = scene.create_actor(entity, shape);
        if let Some(a) = scene.actor_mut(actor) {
            a.set_collision_layer(layer);
            a.set_collision_mask(mask);
        }
        Self {
            actor,
            event_type,
            fire_every_frame,
            touching: Vec::new(),
        }
    }

    pub fn from_def(scene: &mut PhysicsScene, entity: Entity, def: &TriggerDef) -> Self {
        let actor = scene.create_actor_from_info(entity, &def.actor);
        Self {
            actor,
            event_type: def.event_type,
            fire_every_frame: def.fire_every_frame,
            touching: Vec::new(),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn event_type(&self) -> TriggerEventType {
        self.event_type
    }

    /// Re-test the touch set and emit transitions.
    ///
    /// Order: Leave for peers no longer overlapping (a dead id counts as
    /// gone), then Touch for the remaining peers when `fire_every_frame` is
    /// set, then Enter for newly overlapping actors. A peer entering this
    /// frame gets its first Touch on the next update.
    pub fn update(&mut self, scene: &PhysicsScene, sink: &mut dyn EventSink) {
        for i in (0..self.touching.len()).rev() {
            let (peer, entity) = self.touching[i];
            if !scene.overlap_actors(self.actor, peer) {
                self.touching.remove(i);
                sink.enqueue(TriggerEvent::Leave(
                    self.event_type,
                    OverlapResult {
                        entity,
                        actor: peer,
                    },
                ));
            }
        }

        if self.fire_every_frame {
            for (peer, entity) in &self.touching {
                sink.enqueue(TriggerEvent::Touch(
                    self.event_type,
                    OverlapResult {
                        entity: *entity,
                        actor: *peer,
                    },
                ));
            }
        }

        for overlap in scene.overlap_actor(self.actor, MAX_TOUCHES) {
            if self.touching.iter().any(|(peer, _)| *peer == overlap.actor) {
                continue;
            }
            self.touching.push((overlap.actor, overlap.entity));
            sink.enqueue(TriggerEvent::Enter(self.event_type, overlap));
        }
    }

    /// Remove the trigger's actor from the scene.
    pub fn despawn(self, scene: &mut PhysicsScene) {
        scene.remove_actor(self.actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DOOR: TriggerEventType = TriggerEventType(3);

    fn zone(scene: &mut PhysicsScene, fire_every_frame: bool) -> Trigger {
        Trigger::new(
            scene,
            100,
            Rect::new(Vec2::ZERO, Vec2::splat(5.0)),
            DOOR,
            CollisionGroup::ALL,
            CollisionGroup::ALL,
            fire_every_frame,
        )
    }

    #[test]
    fn test_enter_touch_leave_sequence() {
        let mut scene = PhysicsScene::new();
        let mut trigger = zone(&mut scene, true);
        let peer = scene.create_actor(7, Circle::new(Vec2::new(50.0, 0.0), 1.0));
        let mut events: Vec<TriggerEvent> = Vec::new();

        // Outside: nothing.
        trigger.update(&scene, &mut events);
        assert!(events.is_empty());

        // Inside: Enter, no Touch yet.
        scene.move_actor_to(peer, Vec2::ZERO);
        trigger.update(&scene, &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TriggerEvent::Enter(DOOR, r) if r.entity == 7));

        // Still inside: Touch only, no second Enter.
        events.clear();
        trigger.update(&scene, &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TriggerEvent::Touch(DOOR, r) if r.entity == 7));

        // Outside again: Leave.
        events.clear();
        scene.move_actor_to(peer, Vec2::new(50.0, 0.0));
        trigger.update(&scene, &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TriggerEvent::Leave(DOOR, r) if r.entity == 7));

        // And quiet afterwards.
        events.clear();
        trigger.update(&scene, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_no_touch_when_not_every_frame() {
        let mut scene = PhysicsScene::new();
        let mut trigger = zone(&mut scene, false);
        scene.create_actor(7, Circle::new(Vec2::ZERO, 1.0));
        let mut events: Vec<TriggerEvent> = Vec::new();

        trigger.update(&scene, &mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TriggerEvent::Enter(..)));

        events.clear();
        trigger.update(&scene, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_leave_after_peer_removed() {
        let mut scene = PhysicsScene::new();
        let mut trigger = zone(&mut scene, false);
        let peer = scene.create_actor(9, Rect::new(Vec2::ZERO, Vec2::ONE));
        let mut events: Vec<TriggerEvent> = Vec::new();

        trigger.update(&scene, &mut events);
        assert!(matches!(events[0], TriggerEvent::Enter(..)));

        events.clear();
        scene.remove_actor(peer);
        trigger.update(&scene, &mut events);
        assert_eq!(events.len(), 1);
        // The entity is still reported even though the actor is gone.
        assert!(matches!(events[0], TriggerEvent::Leave(DOOR, r) if r.entity == 9));
    }

    #[test]
    fn test_from_def_and_despawn() {
        let mut scene = PhysicsScene::new();
        let def = TriggerDef {
            actor: ActorInfo {
                shape: Shape::Rect(Rect::new(Vec2::ZERO, Vec2::splat(2.0))),
                collision_layer: CollisionGroup::single(1),
                collision_mask: CollisionGroup::ALL,
            },
            event_type: DOOR,
            fire_every_frame: false,
        };
        let trigger = Trigger::from_def(&mut scene, 5, &def);
        let id = trigger.actor();
        assert_eq!(trigger.event_type(), DOOR);
        assert_eq!(scene.actor(id).unwrap().entity(), 5);
        trigger.despawn(&mut scene);
        assert!(scene.actor(id).is_none());
    }
}
