//! 2D kinematic collision for tile-based games.
//!
//! A [`PhysicsScene`] owns rect and circle actors, either free-standing or
//! registered in chunked tilemap layers, and answers swept and overlap
//! queries against them. On top of the scene sit [`Trigger`] volumes that
//! diff their overlap set into Enter/Touch/Leave events, and a
//! [`CharacterController`] that moves an actor with slide-along-surface
//! collision response.
//!
//! Detection and response are kinematic only: no dynamics, no forces. All
//! sweeps reduce to raycasts via Minkowski sums; `t` in a [`HitResult`] is a
//! distance along the (normalized) sweep direction.

pub mod api;
mod chunk;
pub mod controller;
pub mod narrowphase;
pub mod scene;
pub mod trigger;
pub mod types;

pub use api::{DebugColor, DebugDraw, EventSink, NarrowphaseApi};
pub use controller::CharacterController;
pub use narrowphase::Narrowphase;
pub use scene::PhysicsScene;
pub use trigger::Trigger;
pub use types::*;
