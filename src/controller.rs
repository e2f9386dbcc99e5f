use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::narrowphase::Narrowphase;
use crate::scene::PhysicsScene;
use crate::types::*;

/// Upper bound on slide iterations per move; corners and creases converge
/// well below this.
const MAX_ITER: u32 = 10;

const DEFAULT_SKIN: f32 = 0.1;
const DEFAULT_MIN_DISP: f32 = 1.0;

/// Kinematic character mover: advances an actor through the scene, stopping
/// at the first blocking contact and sliding the remaining displacement
/// along the contact tangent.
#[derive(Debug)]
pub struct CharacterController {
    actor: ActorId,
    /// Contact tolerance kept between the actor and blocking geometry.
    skin: f32,
    /// Displacements at or below this length are dropped to avoid jitter.
    min_disp: f32,
}

impl CharacterController {
    pub fn new(scene: &mut PhysicsScene, entity: Entity, shape: impl Into<Shape>) -> Self {
        Self {
            actor: scene.create_actor(entity, shape),
            skin: DEFAULT_SKIN,
            min_disp: DEFAULT_MIN_DISP,
        }
    }

    pub fn from_def(scene: &mut PhysicsScene, entity: Entity, def: &ControllerDef) -> Self {
        Self {
            actor: scene.create_actor_from_info(entity, &def.actor),
            skin: def.skin,
            min_disp: def.min_disp,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn skin(&self) -> f32 {
        self.skin
    }

    pub fn set_skin(&mut self, skin: f32) {
        self.skin = skin;
    }

    pub fn min_disp(&self) -> f32 {
        self.min_disp
    }

    pub fn set_min_disp(&mut self, min_disp: f32) {
        self.min_disp = min_disp;
    }

    pub fn position(&self, scene: &PhysicsScene) -> Option<Vec2> {
        Some(scene.actor(self.actor)?.position())
    }

    /// Place the actor at `p` without collision checks.
    pub fn teleport(&self, scene: &mut PhysicsScene, p: Vec2) {
        scene.move_actor_to(self.actor, p);
    }

    /// Move the actor by `disp`, sliding along whatever it hits.
    ///
    /// Each iteration sweeps the remaining displacement (plus skin), backs
    /// off `skin` units from the first contact and projects what is left
    /// onto the contact tangent. Stops when the remainder drops under
    /// `min_disp`, turns against the requested direction, or `MAX_ITER`
    /// iterations have run.
    pub fn move_and_slide(&self, scene: &mut PhysicsScene, disp: Vec2) {
        let mut disp = disp;
        let mut disp_length = disp.length();
        if disp_length <= self.min_disp {
            return;
        }
        let requested_dir = disp / disp_length;

        for iter in 0..MAX_ITER {
            if disp_length <= self.min_disp {
                break;
            }
            if disp.dot(requested_dir) <= 0.0 {
                break;
            }
            let dir = disp / disp_length;

            let hits = scene.sweep_actor(self.actor, dir, disp_length + self.skin, 1);
            let Some(first) = hits.first() else {
                scene.translate_actor(self.actor, disp);
                break;
            };
            if first.hit.is_initial_overlap {
                // Already inside something; push through rather than wedge.
                scene.translate_actor(self.actor, disp);
                break;
            }

            log::trace!(
                "slide iter {iter}: t={} normal={:?} remaining={disp_length}",
                first.hit.t,
                first.hit.normal,
            );

            let advanced = (first.hit.t - self.skin).max(0.0);
            if advanced > 0.0 {
                scene.translate_actor(self.actor, dir * advanced);
            }

            let remaining = disp_length - advanced;
            let (tangent, _) = Narrowphase::decompose_vector(dir * remaining, first.hit.normal);
            disp = tangent;
            disp_length = tangent.length();
            if disp_length <= f32::EPSILON {
                break;
            }
        }
    }

    /// Remove the controller's actor from the scene.
    pub fn despawn(self, scene: &mut PhysicsScene) {
        scene.remove_actor(self.actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn scene_with_wall() -> PhysicsScene {
        let mut scene = PhysicsScene::new();
        // Long wall whose lower face sits at y = 4.
        scene.create_actor(1, Rect::new(Vec2::new(0.0, 5.0), Vec2::new(20.0, 1.0)));
        scene
    }

    #[test]
    fn test_stops_at_wall_with_skin_gap() {
        let mut scene = scene_with_wall();
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.move_and_slide(&mut scene, Vec2::new(0.0, 100.0));
        let pos = cct.position(&scene).unwrap();
        // Contact at y = 3, backed off by the default skin.
        assert!((pos.y - 2.9).abs() < EPS);
        assert!(pos.x.abs() < EPS);
    }

    #[test]
    fn test_slides_along_wall() {
        let mut scene = scene_with_wall();
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.move_and_slide(&mut scene, Vec2::new(5.0, 10.0));
        let pos = cct.position(&scene).unwrap();
        // Vertical motion is absorbed by the wall, horizontal carries on.
        assert!((pos.x - 5.0).abs() < 0.01);
        assert!(pos.y < 3.0);
        assert!(pos.y > 2.5);
    }

    #[test]
    fn test_does_not_tunnel_thin_wall() {
        let mut scene = PhysicsScene::new();
        scene.create_actor(1, Rect::new(Vec2::new(0.0, 50.0), Vec2::new(20.0, 0.5)));
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.move_and_slide(&mut scene, Vec2::new(0.0, 1000.0));
        let pos = cct.position(&scene).unwrap();
        assert!(pos.y < 49.5);
    }

    #[test]
    fn test_short_displacement_ignored() {
        let mut scene = PhysicsScene::new();
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.move_and_slide(&mut scene, Vec2::new(0.5, 0.0));
        assert_eq!(cct.position(&scene).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_free_space_moves_full_distance() {
        let mut scene = PhysicsScene::new();
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.move_and_slide(&mut scene, Vec2::new(30.0, 40.0));
        let pos = cct.position(&scene).unwrap();
        assert!((pos - Vec2::new(30.0, 40.0)).length() < EPS);
    }

    #[test]
    fn test_teleport_and_despawn() {
        let mut scene = PhysicsScene::new();
        let cct = CharacterController::new(&mut scene, 2, Circle::new(Vec2::ZERO, 1.0));
        cct.teleport(&mut scene, Vec2::new(7.0, 8.0));
        assert_eq!(cct.position(&scene).unwrap(), Vec2::new(7.0, 8.0));
        let id = cct.actor();
        cct.despawn(&mut scene);
        assert!(scene.actor(id).is_none());
    }

    #[test]
    fn test_from_def_applies_tunables() {
        let mut scene = PhysicsScene::new();
        let def = ControllerDef {
            actor: ActorInfo {
                shape: Shape::Circle(Circle::new(Vec2::ZERO, 1.0)),
                collision_layer: CollisionGroup::single(0),
                collision_mask: CollisionGroup::ALL,
            },
            skin: 0.25,
            min_disp: 2.0,
        };
        let cct = CharacterController::from_def(&mut scene, 3, &def);
        assert_eq!(cct.skin(), 0.25);
        assert_eq!(cct.min_disp(), 2.0);
        // Below the configured min_disp: dropped.
        cct.move_and_slide(&mut scene, Vec2::new(1.5, 0.0));
        assert_eq!(cct.position(&scene).unwrap(), Vec2::ZERO);
    }
}
