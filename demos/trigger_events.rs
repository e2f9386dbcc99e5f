//! A trigger zone reporting a passing actor.

use glam::Vec2;
use swept::{
    Circle, CollisionGroup, PhysicsScene, Rect, Trigger, TriggerEvent, TriggerEventType,
};

fn main() {
    env_logger::init();

    let mut scene = PhysicsScene::new();
    let mut zone = Trigger::new(
        &mut scene,
        1,
        Rect::new(Vec2::ZERO, Vec2::splat(20.0)),
        TriggerEventType(1),
        CollisionGroup::ALL,
        CollisionGroup::ALL,
        true,
    );
    let player = scene.create_actor(2, Circle::new(Vec2::new(-60.0, 0.0), 5.0));

    let mut events: Vec<TriggerEvent> = Vec::new();
    for frame in 0..13 {
        scene.move_actor_to(player, Vec2::new(-60.0 + frame as f32 * 10.0, 0.0));
        zone.update(&scene, &mut events);
        for event in events.drain(..) {
            println!("frame {frame}: {event:?}");
        }
    }
}
