use glam::Vec3;

use crate::collision::SurfaceFlags;
use crate::player::MINS_Z;

use super::{BrushWorld, MapObject, SURFACE_CLIP_EPSILON};

/// Flat arena with one of each feature the movement code reacts to: stairs,
/// a walkable ramp, wading water, a swimming pool and two special pads.
/// Z is up and the floor top sits at zero.
pub struct TestingGround {
    objects: Vec<MapObject>,
}

impl Default for TestingGround {
    fn default() -> Self {
        Self::new()
    }
}

impl TestingGround {
    pub const GROUND_SIZE: f32 = 1024.0;
    pub const GROUND_Z: f32 = 0.0;
    pub const STEP_HEIGHT: f32 = 16.0;
    pub const STEP_DEPTH: f32 = 32.0;
    pub const STEP_COUNT: usize = 4;

    /// Origin z of a standing player resting on the floor.
    pub const STANDING_Z: f32 = Self::GROUND_Z - MINS_Z as f32 + SURFACE_CLIP_EPSILON;

    pub const STAIRS_MINS: Vec3 = Vec3::new(128.0, 256.0, 0.0);
    pub const STAIRS_MAXS: Vec3 = Vec3::new(512.0, 384.0, 64.0);
    pub const RAMP_MINS: Vec3 = Vec3::new(128.0, -384.0, 0.0);
    pub const RAMP_MAXS: Vec3 = Vec3::new(384.0, -256.0, 64.0);
    pub const SHALLOW_WATER_MINS: Vec3 = Vec3::new(256.0, 512.0, 0.0);
    pub const SHALLOW_WATER_MAXS: Vec3 = Vec3::new(384.0, 640.0, 16.0);
    pub const POOL_MINS: Vec3 = Vec3::new(-512.0, -512.0, 0.0);
    pub const POOL_MAXS: Vec3 = Vec3::new(-256.0, -256.0, 128.0);
    pub const SLICK_MINS: Vec3 = Vec3::new(-256.0, 256.0, 0.0);
    pub const SLICK_MAXS: Vec3 = Vec3::new(-128.0, 384.0, 8.0);
    pub const NO_DAMAGE_MINS: Vec3 = Vec3::new(-512.0, 256.0, 0.0);
    pub const NO_DAMAGE_MAXS: Vec3 = Vec3::new(-384.0, 384.0, 8.0);

    pub fn new() -> Self {
        let mut objects = Vec::new();

        objects.push(MapObject::ground(
            Vec3::new(0.0, 0.0, Self::GROUND_Z),
            Self::GROUND_SIZE,
            64.0,
        ));

        Self::add_stair_platforms(&mut objects);
        Self::add_ramp(&mut objects);
        Self::add_liquids(&mut objects);
        Self::add_surface_pads(&mut objects);

        Self { objects }
    }

    fn add_stair_platforms(objects: &mut Vec<MapObject>) {
        let start = Self::STAIRS_MINS;

        for i in 0..Self::STEP_COUNT {
            let mins = Vec3::new(
                start.x + Self::STEP_DEPTH * i as f32,
                start.y,
                start.z,
            );
            let maxs = Vec3::new(
                Self::STAIRS_MAXS.x,
                Self::STAIRS_MAXS.y,
                start.z + Self::STEP_HEIGHT * (i + 1) as f32,
            );
            objects.push(MapObject::static_box(mins, maxs));
        }
    }

    fn add_ramp(objects: &mut Vec<MapObject>) {
        objects.push(MapObject::ramp(Self::RAMP_MINS, Self::RAMP_MAXS));

        // landing at the top
        objects.push(MapObject::static_box(
            Vec3::new(Self::RAMP_MAXS.x, Self::RAMP_MINS.y, Self::GROUND_Z),
            Vec3::new(Self::RAMP_MAXS.x + 128.0, Self::RAMP_MAXS.y, Self::RAMP_MAXS.z),
        ));
    }

    fn add_liquids(objects: &mut Vec<MapObject>) {
        objects.push(MapObject::water(
            Self::SHALLOW_WATER_MINS,
            Self::SHALLOW_WATER_MAXS,
        ));
        objects.push(MapObject::water(Self::POOL_MINS, Self::POOL_MAXS));
    }

    fn add_surface_pads(objects: &mut Vec<MapObject>) {
        objects.push(
            MapObject::static_box(Self::SLICK_MINS, Self::SLICK_MAXS)
                .with_surface(SurfaceFlags::SLICK),
        );
        objects.push(
            MapObject::static_box(Self::NO_DAMAGE_MINS, Self::NO_DAMAGE_MAXS)
                .with_surface(SurfaceFlags::NODAMAGE),
        );
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn build_world(&self) -> BrushWorld {
        let world: BrushWorld = self.objects.iter().map(MapObject::to_brush).collect();
        log::debug!("built testing ground with {} brushes", world.len());
        world
    }

    /// Origin of a player standing at `(x, y)` on a surface of height `floor`.
    pub fn standing_origin(x: f32, y: f32, floor: f32) -> Vec3 {
        Vec3::new(x, y, floor - MINS_Z as f32 + SURFACE_CLIP_EPSILON)
    }

    /// Spread-out spots on open floor, clear of every feature.
    pub fn spawn_points(&self) -> Vec<Vec3> {
        [
            (0.0, 0.0),
            (-128.0, 0.0),
            (0.0, 128.0),
            (0.0, -128.0),
            (-128.0, -128.0),
            (-128.0, 128.0),
            (640.0, 0.0),
            (0.0, 768.0),
        ]
        .into_iter()
        .map(|(x, y)| Self::standing_origin(x, y, Self::GROUND_Z))
        .collect()
    }
}
