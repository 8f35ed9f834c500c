use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{ContentFlags, SurfaceFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u16);

impl EntityId {
    pub const MAX: u16 = 4096;
    pub const WORLD: Self = Self(Self::MAX - 2);

    pub fn is_world(self) -> bool {
        self == Self::WORLD
    }
}

/// Result of sweeping a box through the world.
///
/// `plane_normal` is zero when nothing was hit. `end_pos` is where the box
/// stopped, backed off the impact plane by the world's clip epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub fraction: f32,
    pub all_solid: bool,
    pub start_solid: bool,
    pub end_pos: Vec3,
    pub plane_normal: Vec3,
    pub surface_flags: SurfaceFlags,
    pub contents: ContentFlags,
    pub entity: Option<EntityId>,
}

impl Trace {
    pub fn missed(end: Vec3) -> Self {
        Self {
            fraction: 1.0,
            all_solid: false,
            start_solid: false,
            end_pos: end,
            plane_normal: Vec3::ZERO,
            surface_flags: SurfaceFlags::empty(),
            contents: ContentFlags::empty(),
            entity: None,
        }
    }

    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::missed(Vec3::ZERO)
    }
}

/// Collision oracle queried by movement. Implementations must be free of
/// side effects so client and server replays see identical answers.
pub trait CollisionWorld {
    fn trace(
        &self,
        start: Vec3,
        mins: Vec3,
        maxs: Vec3,
        end: Vec3,
        pass_entity: Option<EntityId>,
        mask: ContentFlags,
    ) -> Trace;

    fn point_contents(&self, point: Vec3, pass_entity: Option<EntityId>) -> ContentFlags;
}
