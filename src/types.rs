use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque entity handle supplied by the embedding game; echoed back in
/// sweep/overlap results and trigger events, never interpreted here.
pub type Entity = u64;

/// Sentinel for "no entity".
pub const NULL_ENTITY: Entity = u64::MAX;

/// Bitmask used both as a collision layer (what an actor *is*) and as a
/// collision mask (what a query wants to hit).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroup(pub u32);

impl CollisionGroup {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Group containing only the given bit index (0..32).
    pub fn single(bit: u32) -> Self {
        Self(1 << bit)
    }

    pub fn with(self, bit: u32) -> Self {
        Self(self.0 | (1 << bit))
    }

    pub fn without(self, bit: u32) -> Self {
        Self(self.0 & !(1 << bit))
    }

    pub fn has(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    /// Mask filtering rule: a query with mask `self` may hit an actor on
    /// `layer` iff the bitmasks intersect. Self-collision is excluded by
    /// identity in the scene, never by mask.
    pub fn can_collide(self, layer: CollisionGroup) -> bool {
        self.0 & layer.0 != 0
    }
}

/// Which part of a shape a sweep/raycast hit: one of the four faces, or one
/// of the four rounded corners for circle-vs-rect sweeps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitFlags(pub u32);

impl HitFlags {
    pub const NONE: Self = Self(0);

    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const TOP: Self = Self(1 << 2);
    pub const BOTTOM: Self = Self(1 << 3);

    pub const LEFT_TOP_CORNER: Self = Self(Self::LEFT.0 | Self::TOP.0);
    pub const RIGHT_TOP_CORNER: Self = Self(Self::RIGHT.0 | Self::TOP.0);
    pub const LEFT_BOTTOM_CORNER: Self = Self(Self::LEFT.0 | Self::BOTTOM.0);
    pub const RIGHT_BOTTOM_CORNER: Self = Self(Self::RIGHT.0 | Self::BOTTOM.0);

    /// True if any bit of `other` is set in `self`.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Axis-aligned rectangle, center + half extents. Degenerate when either
/// half extent is <= 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_size: Vec2) -> Self {
        Self { center, half_size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_size
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_size
    }
}

/// Circle, center + radius. Degenerate when radius <= 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Circle,
}

/// Collision shape of an actor or query volume.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Shape::Rect(r) => Some(r),
            Shape::Circle(_) => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            Shape::Rect(_) => None,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.center,
            Shape::Circle(c) => c.center,
        }
    }

    pub fn move_to(&mut self, p: Vec2) {
        match self {
            Shape::Rect(r) => r.center = p,
            Shape::Circle(c) => c.center = p,
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Shape::Rect(r) => r.center += offset,
            Shape::Circle(c) => c.center += offset,
        }
    }

    /// Tight axis-aligned bounds of the shape.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => Rect::new(c.center, Vec2::splat(c.radius)),
        }
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

/// Generation-checked handle to an actor in the scene arena. A stale id
/// (actor removed, slot reused) fails lookup instead of dangling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActorId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Generation-checked handle to a tilemap collision set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilemapId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Where an actor's spatial registration lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// Scanned linearly by every query.
    Normal,
    /// Referenced from every chunk cell its bounds cover in one tilemap layer.
    InChunk { tilemap: TilemapId, layer: u32 },
}

/// One collidable participant owned by the scene.
#[derive(Clone, Debug)]
pub struct PhysicsActor {
    pub(crate) shape: Shape,
    pub(crate) entity: Entity,
    pub(crate) storage: StorageKind,
    pub(crate) layer: CollisionGroup,
    pub(crate) mask: CollisionGroup,
}

impl PhysicsActor {
    pub(crate) fn new(entity: Entity, shape: Shape, storage: StorageKind) -> Self {
        Self {
            shape,
            entity,
            storage,
            layer: CollisionGroup::ALL,
            mask: CollisionGroup::ALL,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage
    }

    pub fn position(&self) -> Vec2 {
        self.shape.position()
    }

    pub fn collision_layer(&self) -> CollisionGroup {
        self.layer
    }

    pub fn set_collision_layer(&mut self, group: CollisionGroup) {
        self.layer = group;
    }

    pub fn collision_mask(&self) -> CollisionGroup {
        self.mask
    }

    pub fn set_collision_mask(&mut self, group: CollisionGroup) {
        self.mask = group;
    }
}

/// Single sweep/raycast contact.
#[derive(Copy, Clone, Debug, Default)]
pub struct HitResult {
    /// Distance along the swept motion where contact occurs, in [0, dist].
    pub t: f32,
    pub flags: HitFlags,
    /// Unit surface normal at the contact; zero for initial overlaps.
    pub normal: Vec2,
    /// Shapes already overlapped at t = 0; `t`/`normal` carry no information.
    pub is_initial_overlap: bool,
}

impl HitResult {
    pub fn initial_overlap() -> Self {
        Self {
            is_initial_overlap: true,
            ..Self::default()
        }
    }
}

/// Scene sweep hit: geometric contact plus the actor that was struck.
#[derive(Copy, Clone, Debug)]
pub struct SweepResult {
    pub hit: HitResult,
    pub entity: Entity,
    pub actor: ActorId,
}

/// Scene overlap hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlapResult {
    pub entity: Entity,
    pub actor: ActorId,
}

/// Gameplay-defined discriminator carried on trigger events (e.g. "door",
/// "damage zone"); assigned by the collision configuration assets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerEventType(pub u32);

/// Event emitted by a trigger's per-frame diff of its touch set.
#[derive(Copy, Clone, Debug)]
pub enum TriggerEvent {
    Enter(TriggerEventType, OverlapResult),
    Leave(TriggerEventType, OverlapResult),
    Touch(TriggerEventType, OverlapResult),
}

impl TriggerEvent {
    pub fn event_type(&self) -> TriggerEventType {
        match self {
            TriggerEvent::Enter(ty, _)
            | TriggerEvent::Leave(ty, _)
            | TriggerEvent::Touch(ty, _) => *ty,
        }
    }

    pub fn result(&self) -> &OverlapResult {
        match self {
            TriggerEvent::Enter(_, r) | TriggerEvent::Leave(_, r) | TriggerEvent::Touch(_, r) => r,
        }
    }
}

/// Actor description loaded from collision configuration assets.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ActorInfo {
    pub shape: Shape,
    pub collision_layer: CollisionGroup,
    pub collision_mask: CollisionGroup,
}

/// Trigger description loaded from collision configuration assets.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct TriggerDef {
    pub actor: ActorInfo,
    pub event_type: TriggerEventType,
    /// Re-emit a Touch event every frame for actors that stay inside.
    pub fire_every_frame: bool,
}

/// Character controller description loaded from collision configuration
/// assets.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ControllerDef {
    pub actor: ActorInfo,
    /// Contact tolerance kept between the controller and geometry.
    pub skin: f32,
    /// Displacements shorter than this are dropped to avoid jitter.
    pub min_disp: f32,
}
