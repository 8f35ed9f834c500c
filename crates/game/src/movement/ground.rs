use glam::Vec3;

use crate::collision::{ContentFlags, SurfaceFlags, Trace};
use crate::event::EntityEvent;
use crate::player::{
    CROUCH_VIEWHEIGHT, DEAD_MAXS_Z, DEAD_VIEWHEIGHT, DEFAULT_VIEWHEIGHT, DUCKED_MAXS_Z, MINS_Z,
    PLAYER_HALF_WIDTH, PmFlags, PmType, STANDING_MAXS_Z, TIMER_LAND, VEHICLE_HALF_EXTENTS,
};

use super::Pmove;

impl Pmove<'_> {
    pub(super) fn ground_trace(&mut self) {
        let origin = self.ps.origin;
        let point = Vec3::new(origin.x, origin.y, origin.z - self.config.ground_trace_depth);
        let mut trace = self.trace(origin, point);
        self.frame.ground_trace = trace;

        if trace.all_solid {
            match self.correct_all_solid() {
                Some(corrected) => trace = corrected,
                None => return,
            }
        }

        // thrown off the ground
        if self.ps.velocity.z > 0.0
            && self.ps.velocity.dot(trace.plane_normal) > self.config.kickoff_speed
        {
            log::trace!("client {}: kickoff", self.ps.client_num);
            self.ps.ground_entity = None;
            self.frame.ground_plane = false;
            self.frame.walking = false;
            return;
        }

        // a miss has a zero normal and lands here too
        if trace.plane_normal.z < self.config.min_walk_normal {
            log::trace!("client {}: steep", self.ps.client_num);
            self.ps.ground_entity = None;
            self.frame.ground_plane = true;
            self.frame.walking = false;
            return;
        }

        self.frame.ground_plane = true;
        self.frame.walking = true;

        if self.ps.pm_flags.contains(PmFlags::TIME_WATERJUMP) {
            self.ps
                .pm_flags
                .remove(PmFlags::TIME_WATERJUMP | PmFlags::TIME_LAND);
            self.ps.pm_time = 0;
        }

        if self.ps.ground_entity.is_none() {
            log::trace!("client {}: land", self.ps.client_num);
            self.crash_land();

            // walking down a slope is not a landing
            if self.frame.previous_velocity.z < -self.config.hard_landing_speed {
                self.ps.pm_flags.insert(PmFlags::TIME_LAND);
                self.ps.pm_time = self.config.land_time;
            }
        }

        self.ps.ground_entity = trace.entity;
        self.add_touch(trace.entity);
    }

    /// Jitters the box around its origin looking for free space. At most
    /// 27 tries.
    fn correct_all_solid(&mut self) -> Option<Trace> {
        let origin = self.ps.origin;

        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let point = origin + Vec3::new(i as f32, j as f32, k as f32);
                    let spot = self.trace(point, point);
                    if !spot.all_solid {
                        let down = Vec3::new(
                            origin.x,
                            origin.y,
                            origin.z - self.config.ground_trace_depth,
                        );
                        let trace = self.trace(origin, down);
                        self.frame.ground_trace = trace;
                        return Some(trace);
                    }
                }
            }
        }

        log::warn!(
            "client {}: stuck in solid at {:?}",
            self.ps.client_num,
            origin
        );
        self.ps.ground_entity = None;
        self.frame.ground_plane = false;
        self.frame.walking = false;
        None
    }

    /// Reconstructs the impact speed of a landing and raises the matching
    /// fall or footstep event.
    fn crash_land(&mut self) {
        self.ps.legs_timer = TIMER_LAND;

        let dist = self.ps.origin.z - self.frame.previous_origin.z;
        let vel = self.frame.previous_velocity.z;
        let acc = -(self.ps.gravity as f32);

        // solve dist = vel*t + acc*t*t/2 for the time of impact
        let a = acc / 2.0;
        let b = vel;
        let c = -dist;

        let den = b * b - 4.0 * a * c;
        if den < 0.0 {
            return;
        }
        let t = (-b - den.sqrt()) / (2.0 * a);

        let mut delta = vel + t * acc;
        delta = delta * delta * 0.0001;

        if self.ps.is_ducked() {
            delta *= 2.0;
        }

        match self.water_level {
            3 => return,
            2 => delta *= 0.25,
            1 => delta *= 0.5,
            _ => {}
        }

        if delta < 1.0 {
            return;
        }

        let surface = self.frame.ground_trace.surface_flags;
        if !self.ps.in_vehicle() && !surface.contains(SurfaceFlags::NODAMAGE) {
            if delta > 60.0 {
                self.add_event(EntityEvent::FallFar);
            } else if delta > 40.0 {
                // pain grunt, silent when dead
                if self.ps.health > 0 {
                    self.add_event(EntityEvent::FallMedium);
                }
            } else if delta > 7.0 {
                self.add_event(EntityEvent::FallShort);
            } else if let Some(footstep) = self.footstep_for_surface() {
                self.add_event(footstep);
            }
        }

        self.ps.bob_cycle = 0;
    }

    pub(super) fn footstep_for_surface(&self) -> Option<EntityEvent> {
        let surface = self.frame.ground_trace.surface_flags;
        if surface.contains(SurfaceFlags::NOSTEPS) {
            None
        } else if surface.contains(SurfaceFlags::METALSTEPS) {
            Some(EntityEvent::FootstepMetal)
        } else if surface.contains(SurfaceFlags::FLESH) {
            Some(EntityEvent::FootstepFlesh)
        } else {
            Some(EntityEvent::Footstep)
        }
    }

    /// Samples feet, waist and eyes for liquid.
    pub(super) fn set_water_level(&mut self) {
        self.water_level = 0;
        self.water_type = ContentFlags::empty();

        let origin = self.ps.origin;
        let mut point = Vec3::new(origin.x, origin.y, origin.z + MINS_Z as f32 + 1.0);
        let contents = self.point_contents(point);
        if !contents.intersects(ContentFlags::MASK_WATER) {
            return;
        }

        let sample2 = self.ps.view_height - MINS_Z;
        let sample1 = sample2 / 2;

        self.water_type = contents;
        self.water_level = 1;

        point.z = origin.z + MINS_Z as f32 + sample1 as f32;
        if !self.point_contents(point).intersects(ContentFlags::MASK_WATER) {
            return;
        }
        self.water_level = 2;

        point.z = origin.z + MINS_Z as f32 + sample2 as f32;
        if self.point_contents(point).intersects(ContentFlags::MASK_WATER) {
            self.water_level = 3;
        }
    }

    /// Sets the bounding box and view height, standing up when there is room.
    pub(super) fn check_duck(&mut self) {
        self.mins = Vec3::new(-PLAYER_HALF_WIDTH, -PLAYER_HALF_WIDTH, MINS_Z as f32);
        self.maxs.x = PLAYER_HALF_WIDTH;
        self.maxs.y = PLAYER_HALF_WIDTH;

        if self.ps.pm_type == PmType::Dead {
            self.maxs.z = DEAD_MAXS_Z;
            self.ps.view_height = DEAD_VIEWHEIGHT;
            return;
        }

        if self.cmd.up_move() < 0 {
            if !self.ps.in_vehicle() {
                self.ps.pm_flags.insert(PmFlags::DUCKED);
            }
        } else if self.ps.is_ducked() {
            self.maxs.z = STANDING_MAXS_Z;
            let origin = self.ps.origin;
            if !self.trace(origin, origin).all_solid {
                self.ps.pm_flags.remove(PmFlags::DUCKED);
            }
        }

        if self.ps.is_ducked() {
            self.maxs.z = DUCKED_MAXS_Z;
            self.ps.view_height = CROUCH_VIEWHEIGHT;
        } else {
            self.maxs.z = STANDING_MAXS_Z;
            self.ps.view_height = DEFAULT_VIEWHEIGHT;
        }

        if self.ps.in_vehicle() {
            let [x, y, z] = VEHICLE_HALF_EXTENTS;
            self.mins = Vec3::new(-x, -y, -z);
            self.maxs = Vec3::new(x, y, z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::EntityId;
    use crate::map::{BrushWorld, TestingGround};
    use crate::movement::PmoveOptions;
    use crate::player::{PlayerState, PmoveConfig};
    use crate::simulation::{Buttons, UserCommand};
    use crate::weapon::WeaponTable;

    fn player_at(origin: Vec3) -> PlayerState {
        let mut state = PlayerState::new(0);
        state.origin = origin;
        state
    }

    fn pmove<'a>(
        state: &'a mut PlayerState,
        world: &'a BrushWorld,
        config: &'a PmoveConfig,
        weapons: &'a WeaponTable,
    ) -> Pmove<'a> {
        let command = UserCommand::new(state.command_time + 16, [0, 0], Buttons::empty());
        Pmove::new(state, command, world, config, weapons, PmoveOptions::default())
    }

    #[test]
    fn a_miss_keeps_an_empty_ground_plane() {
        let world = TestingGround::new().build_world();
        let (config, weapons) = (PmoveConfig::default(), WeaponTable::standard());
        let mut state = player_at(Vec3::new(0.0, 0.0, 200.0));
        state.ground_entity = Some(EntityId::WORLD);

        let mut pm = pmove(&mut state, &world, &config, &weapons);
        pm.ground_trace();

        assert_eq!(pm.frame.ground_trace.fraction, 1.0);
        assert_eq!(pm.frame.ground_trace.plane_normal, Vec3::ZERO);
        assert!(pm.frame.ground_plane);
        assert!(!pm.frame.walking);
        assert!(pm.ps.ground_entity.is_none());
    }

    #[test]
    fn slightly_buried_players_find_free_space_nearby() {
        let world = TestingGround::new().build_world();
        let (config, weapons) = (PmoveConfig::default(), WeaponTable::standard());
        // half a unit into the floor, clear once lifted by one
        let mut state = player_at(Vec3::new(0.0, 0.0, -MINS_Z as f32 - 0.5));

        let mut pm = pmove(&mut state, &world, &config, &weapons);
        let origin = pm.ps.origin;
        assert!(pm.trace(origin, origin).all_solid);
        assert!(pm.correct_all_solid().is_some());
    }

    #[test]
    fn deeply_buried_players_are_stuck() {
        let world = TestingGround::new().build_world();
        let (config, weapons) = (PmoveConfig::default(), WeaponTable::standard());
        let mut state = player_at(Vec3::ZERO);
        state.ground_entity = Some(EntityId::WORLD);

        let mut pm = pmove(&mut state, &world, &config, &weapons);
        pm.ground_trace();

        assert!(pm.frame.ground_trace.all_solid);
        assert!(!pm.frame.ground_plane);
        assert!(!pm.frame.walking);
        assert!(pm.ps.ground_entity.is_none());
    }
}
