use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, ContentFlags, EntityId, SurfaceFlags, Trace};

/// Distance a sweep stops short of the surface it hits.
pub const SURFACE_CLIP_EPSILON: f32 = 0.125;

/// One bounding plane of a convex brush. Points with
/// `normal.dot(p) - dist <= 0` are behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSide {
    pub normal: Vec3,
    pub dist: f32,
    pub surface_flags: SurfaceFlags,
}

impl BrushSide {
    pub fn new(normal: Vec3, dist: f32, surface_flags: SurfaceFlags) -> Self {
        Self {
            normal,
            dist,
            surface_flags,
        }
    }

    fn through(normal: Vec3, point: Vec3, surface_flags: SurfaceFlags) -> Self {
        Self::new(normal, normal.dot(point), surface_flags)
    }
}

/// A convex volume bounded by planes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub sides: Vec<BrushSide>,
    pub contents: ContentFlags,
}

impl Brush {
    pub fn new(sides: Vec<BrushSide>, contents: ContentFlags) -> Self {
        Self { sides, contents }
    }

    /// Axis-aligned box with the same surface flags on every face.
    pub fn aabb(mins: Vec3, maxs: Vec3, contents: ContentFlags, surface: SurfaceFlags) -> Self {
        let sides = vec![
            BrushSide::through(Vec3::X, maxs, surface),
            BrushSide::through(Vec3::NEG_X, mins, surface),
            BrushSide::through(Vec3::Y, maxs, surface),
            BrushSide::through(Vec3::NEG_Y, mins, surface),
            BrushSide::through(Vec3::Z, maxs, surface),
            BrushSide::through(Vec3::NEG_Z, mins, surface),
        ];
        Self::new(sides, contents)
    }

    /// Wedge filling `mins..maxs` whose top rises along +x from `mins.z` at
    /// `mins.x` to `maxs.z` at `maxs.x`.
    pub fn ramp(mins: Vec3, maxs: Vec3, contents: ContentFlags, surface: SurfaceFlags) -> Self {
        let run = maxs.x - mins.x;
        let rise = maxs.z - mins.z;
        let slope = Vec3::new(-rise, 0.0, run).normalize_or_zero();

        let sides = vec![
            BrushSide::through(slope, mins, surface),
            BrushSide::through(Vec3::X, maxs, surface),
            BrushSide::through(Vec3::NEG_X, mins, surface),
            BrushSide::through(Vec3::Y, maxs, surface),
            BrushSide::through(Vec3::NEG_Y, mins, surface),
            BrushSide::through(Vec3::Z, maxs, surface),
            BrushSide::through(Vec3::NEG_Z, mins, surface),
        ];
        Self::new(sides, contents)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.sides
            .iter()
            .all(|side| side.normal.dot(point) - side.dist <= 0.0)
    }

    /// Clips a box sweep against this brush, tightening `trace` if the brush
    /// is hit earlier than anything before it.
    fn clip_sweep(&self, start: Vec3, end: Vec3, mins: Vec3, maxs: Vec3, trace: &mut Trace) {
        let mut enter_frac = -1.0_f32;
        let mut leave_frac = 1.0_f32;
        let mut gets_out = false;
        let mut starts_out = false;
        let mut lead_side = None;

        for side in &self.sides {
            let normal = side.normal;
            // corner of the box that touches the plane first
            let offset = Vec3::new(
                if normal.x < 0.0 { maxs.x } else { mins.x },
                if normal.y < 0.0 { maxs.y } else { mins.y },
                if normal.z < 0.0 { maxs.z } else { mins.z },
            );
            let dist = side.dist - offset.dot(normal);

            let d1 = start.dot(normal) - dist;
            let d2 = end.dot(normal) - dist;

            if d2 > 0.0 {
                gets_out = true;
            }
            if d1 > 0.0 {
                starts_out = true;
            }

            // entirely in front of this face misses the whole brush
            if d1 > 0.0 && (d2 >= SURFACE_CLIP_EPSILON || d2 >= d1) {
                return;
            }

            if d1 <= 0.0 && d2 <= 0.0 {
                continue;
            }

            if d1 > d2 {
                let f = ((d1 - SURFACE_CLIP_EPSILON) / (d1 - d2)).max(0.0);
                if f > enter_frac {
                    enter_frac = f;
                    lead_side = Some(side);
                }
            } else {
                let f = ((d1 + SURFACE_CLIP_EPSILON) / (d1 - d2)).min(1.0);
                if f < leave_frac {
                    leave_frac = f;
                }
            }
        }

        if !starts_out {
            trace.start_solid = true;
            if !gets_out {
                trace.all_solid = true;
                trace.fraction = 0.0;
                trace.contents = self.contents;
            }
            return;
        }

        if enter_frac < leave_frac && enter_frac > -1.0 && enter_frac < trace.fraction {
            if let Some(side) = lead_side {
                trace.fraction = enter_frac.max(0.0);
                trace.plane_normal = side.normal;
                trace.surface_flags = side.surface_flags;
                trace.contents = self.contents;
            }
        }
    }
}

/// A static world made only of convex brushes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrushWorld {
    brushes: Vec<Brush>,
}

impl BrushWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, brush: Brush) {
        self.brushes.push(brush);
    }

    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }
}

impl FromIterator<Brush> for BrushWorld {
    fn from_iter<I: IntoIterator<Item = Brush>>(iter: I) -> Self {
        Self {
            brushes: iter.into_iter().collect(),
        }
    }
}

impl CollisionWorld for BrushWorld {
    fn trace(
        &self,
        start: Vec3,
        mins: Vec3,
        maxs: Vec3,
        end: Vec3,
        _pass_entity: Option<EntityId>,
        mask: ContentFlags,
    ) -> Trace {
        let mut trace = Trace::missed(end);

        for brush in self.brushes.iter().filter(|b| b.contents.intersects(mask)) {
            brush.clip_sweep(start, end, mins, maxs, &mut trace);
            if trace.all_solid {
                break;
            }
        }

        if trace.hit_something() {
            trace.end_pos = start + trace.fraction * (end - start);
            trace.entity = Some(EntityId::WORLD);
        }
        trace
    }

    fn point_contents(&self, point: Vec3, _pass_entity: Option<EntityId>) -> ContentFlags {
        self.brushes
            .iter()
            .filter(|brush| brush.contains(point))
            .fold(ContentFlags::empty(), |contents, brush| {
                contents | brush.contents
            })
    }
}
