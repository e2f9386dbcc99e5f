//! A character sliding along the walls of a tile corridor.
//!
//! Run with `RUST_LOG=trace` to see the per-iteration slide decisions.

use glam::{UVec2, Vec2};
use swept::{CharacterController, Circle, PhysicsScene, Rect};

fn main() {
    env_logger::init();

    let mut scene = PhysicsScene::new();
    let map = scene.create_tilemap(Vec2::ZERO);
    let layer = scene
        .create_tilemap_layer(map, UVec2::splat(16), UVec2::splat(8))
        .expect("fresh tilemap");

    // Horizontal corridor: solid rows of blocks above and below.
    for i in 0..12 {
        let x = i as f32 * 32.0 + 16.0;
        let _ = scene.create_actor_in_chunk(0, map, layer, Rect::new(Vec2::new(x, 16.0), Vec2::splat(16.0)));
        let _ = scene.create_actor_in_chunk(0, map, layer, Rect::new(Vec2::new(x, 112.0), Vec2::splat(16.0)));
    }

    let player = CharacterController::new(&mut scene, 1, Circle::new(Vec2::new(48.0, 64.0), 12.0));

    // Push diagonally into the lower wall; the slide keeps us moving right.
    for step in 0..8 {
        player.move_and_slide(&mut scene, Vec2::new(24.0, 18.0));
        if let Some(pos) = player.position(&scene) {
            println!("step {step}: position ({:.1}, {:.1})", pos.x, pos.y);
        }
    }
}
