use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{ContentFlags, SurfaceFlags};

use super::Brush;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapObjectKind {
    Ground,
    StaticBox,
    /// Solid wedge rising along +x.
    Ramp,
    Liquid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObject {
    pub kind: MapObjectKind,
    pub mins: Vec3,
    pub maxs: Vec3,
    pub contents: ContentFlags,
    pub surface_flags: SurfaceFlags,
}

impl MapObject {
    pub fn ground(center: Vec3, half_size: f32, thickness: f32) -> Self {
        Self {
            kind: MapObjectKind::Ground,
            mins: Vec3::new(center.x - half_size, center.y - half_size, center.z - thickness),
            maxs: Vec3::new(center.x + half_size, center.y + half_size, center.z),
            contents: ContentFlags::SOLID,
            surface_flags: SurfaceFlags::empty(),
        }
    }

    pub fn static_box(mins: Vec3, maxs: Vec3) -> Self {
        Self {
            kind: MapObjectKind::StaticBox,
            mins,
            maxs,
            contents: ContentFlags::SOLID,
            surface_flags: SurfaceFlags::empty(),
        }
    }

    pub fn ramp(mins: Vec3, maxs: Vec3) -> Self {
        Self {
            kind: MapObjectKind::Ramp,
            ..Self::static_box(mins, maxs)
        }
    }

    pub fn water(mins: Vec3, maxs: Vec3) -> Self {
        Self {
            kind: MapObjectKind::Liquid,
            mins,
            maxs,
            contents: ContentFlags::WATER,
            surface_flags: SurfaceFlags::empty(),
        }
    }

    pub fn with_surface(mut self, surface_flags: SurfaceFlags) -> Self {
        self.surface_flags = surface_flags;
        self
    }

    pub fn to_brush(&self) -> Brush {
        match self.kind {
            MapObjectKind::Ramp => {
                Brush::ramp(self.mins, self.maxs, self.contents, self.surface_flags)
            }
            MapObjectKind::Ground | MapObjectKind::StaticBox | MapObjectKind::Liquid => {
                Brush::aabb(self.mins, self.maxs, self.contents, self.surface_flags)
            }
        }
    }
}
