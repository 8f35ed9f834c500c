use glam::Vec3;

use crate::collision::{ContentFlags, SurfaceFlags};
use crate::event::EntityEvent;
use crate::math::normalize_in_place;
use crate::player::{DEFAULT_VIEWHEIGHT, PmFlags};
use crate::simulation::Buttons;

use super::Pmove;
use super::physics::clip_velocity;

impl Pmove<'_> {
    pub(super) fn walk_move(&mut self) {
        let normal = self.frame.ground_trace.plane_normal;

        if self.water_level > 2 && self.frame.forward.dot(normal) > 0.0 {
            // begin swimming
            self.water_move();
            return;
        }

        if self.check_jump() {
            if self.water_level > 1 {
                self.water_move();
            } else {
                self.air_move();
            }
            return;
        }

        self.friction();

        let config = self.config;
        let forward_move = self.cmd.forward_move() as f32;
        let right_move = if self.ps.in_vehicle() {
            0.0
        } else {
            self.cmd.right_move() as f32
        };
        let scale = self.cmd_scale();

        // project the basis onto the ground plane
        self.frame.forward.z = 0.0;
        self.frame.right.z = 0.0;
        self.frame.forward = clip_velocity(self.frame.forward, normal, config.overclip);
        self.frame.right = clip_velocity(self.frame.right, normal, config.overclip);
        normalize_in_place(&mut self.frame.forward);
        normalize_in_place(&mut self.frame.right);

        let mut wish_dir = self.frame.forward * forward_move + self.frame.right * right_move;
        let mut wish_speed = normalize_in_place(&mut wish_dir) * scale;

        let speed = self.ps.speed as f32;
        if self.ps.is_ducked() && wish_speed > speed * config.duck_scale {
            wish_speed = speed * config.duck_scale;
            // a lowered base speed must not make crouching a crawl
            if wish_speed < config.duck_min_speed {
                wish_speed = config.duck_min_speed;
            }
            if wish_speed > speed {
                wish_speed = speed;
            }
        }

        // wading or walking on the bottom
        if self.water_level > 0 {
            let depth = self.water_level as f32 / 3.0;
            let water_scale = 1.0 - (1.0 - config.swim_scale) * depth;
            if wish_speed > speed * water_scale {
                wish_speed = speed * water_scale;
            }
        }

        let slick = self
            .frame
            .ground_trace
            .surface_flags
            .contains(SurfaceFlags::SLICK);
        let knockback = self.ps.pm_flags.contains(PmFlags::TIME_KNOCKBACK);
        let in_vehicle = self.ps.in_vehicle();

        let accelerate = if slick || knockback {
            config.air_accelerate
        } else if in_vehicle {
            config.vehicle_accelerate
        } else {
            config.accelerate
        };

        self.accelerate(wish_dir, wish_speed, accelerate);

        if slick || knockback || in_vehicle {
            self.ps.velocity.z -= self.ps.gravity as f32 * self.frame.frametime;
        }

        // keep speed constant going up or down a slope
        let vel = self.ps.velocity.length();
        self.ps.velocity = clip_velocity(self.ps.velocity, normal, config.overclip);
        normalize_in_place(&mut self.ps.velocity);
        self.ps.velocity *= vel;

        if self.ps.velocity.x == 0.0 && self.ps.velocity.y == 0.0 {
            return;
        }

        self.step_slide_move(false);
    }

    pub(super) fn air_move(&mut self) {
        self.friction();

        let (forward_move, right_move) = if self.ps.in_vehicle() {
            (0.0, 0.0)
        } else {
            (
                self.cmd.forward_move() as f32,
                self.cmd.right_move() as f32,
            )
        };
        let scale = self.cmd_scale();

        // project moves down to a flat plane
        self.frame.forward.z = 0.0;
        self.frame.right.z = 0.0;
        normalize_in_place(&mut self.frame.forward);
        normalize_in_place(&mut self.frame.right);

        let forward = self.frame.forward;
        let right = self.frame.right;
        let mut wish_dir = Vec3::new(
            forward.x * forward_move + right.x * right_move,
            forward.y * forward_move + right.y * right_move,
            0.0,
        );
        let wish_speed = normalize_in_place(&mut wish_dir) * scale;

        self.accelerate(wish_dir, wish_speed, self.config.air_accelerate);

        // steep planes still slide us even without a ground entity
        if self.frame.ground_plane {
            self.ps.velocity = clip_velocity(
                self.ps.velocity,
                self.frame.ground_trace.plane_normal,
                self.config.overclip,
            );
        }

        self.step_slide_move(true);
    }

    pub(super) fn water_move(&mut self) {
        if self.check_water_jump() {
            self.water_jump_move();
            return;
        }

        self.friction();

        let config = self.config;
        let scale = self.cmd_scale();

        let wish_velocity = if scale == 0.0 || self.ps.in_vehicle() {
            // sink towards the bottom
            let sink = if self.ps.in_vehicle() {
                config.vehicle_sink_speed
            } else {
                config.water_sink_speed
            };
            Vec3::new(0.0, 0.0, -sink)
        } else {
            let forward_move = self.cmd.forward_move() as f32;
            let right_move = self.cmd.right_move() as f32;
            let mut wish = self.frame.forward * scale * forward_move
                + self.frame.right * scale * right_move;
            wish.z += scale * self.cmd.up_move() as f32;
            wish
        };

        let mut wish_dir = wish_velocity;
        let mut wish_speed = normalize_in_place(&mut wish_dir);

        let limit = self.ps.speed as f32 * config.swim_scale;
        if wish_speed > limit {
            wish_speed = limit;
        }

        self.accelerate(wish_dir, wish_speed, config.water_accelerate);

        // make it easy to climb slopes underwater
        let normal = self.frame.ground_trace.plane_normal;
        if self.frame.ground_plane && self.ps.velocity.dot(normal) < 0.0 {
            let vel = self.ps.velocity.length();
            self.ps.velocity = clip_velocity(self.ps.velocity, normal, config.overclip);
            normalize_in_place(&mut self.ps.velocity);
            self.ps.velocity *= vel;
        }

        self.slide_move(false);
    }

    /// Flying out of the water onto a ledge.
    pub(super) fn water_jump_move(&mut self) {
        self.step_slide_move(true);

        self.ps.velocity.z -= self.ps.gravity as f32 * self.frame.frametime;
        if self.ps.velocity.z < 0.0 {
            // falling again
            self.ps.pm_flags.remove(PmFlags::ALL_TIMES);
            self.ps.pm_time = 0;
        }
    }

    /// Free flight with extra friction, ignoring collision.
    pub(super) fn noclip_move(&mut self) {
        let config = self.config;
        let frametime = self.frame.frametime;

        self.ps.view_height = DEFAULT_VIEWHEIGHT;

        let speed = self.ps.velocity.length();
        if speed < 1.0 {
            self.ps.velocity = Vec3::ZERO;
        } else {
            let friction = config.friction * config.noclip_friction_scale;
            let control = speed.max(config.stop_speed);
            let drop = control * friction * frametime;

            let new_speed = (speed - drop).max(0.0) / speed;
            self.ps.velocity *= new_speed;
        }

        let scale = self.cmd_scale();
        let forward_move = self.cmd.forward_move() as f32;
        let right_move = self.cmd.right_move() as f32;

        let mut wish_dir = self.frame.forward * forward_move + self.frame.right * right_move;
        wish_dir.z += self.cmd.up_move() as f32;
        let wish_speed = normalize_in_place(&mut wish_dir) * scale;

        self.accelerate(wish_dir, wish_speed, config.accelerate);

        self.ps.origin += frametime * self.ps.velocity;
    }

    pub(super) fn dead_move(&mut self) {
        if !self.frame.walking {
            return;
        }

        let forward = self.ps.velocity.length() - self.config.dead_deceleration;
        if forward <= 0.0 {
            self.ps.velocity = Vec3::ZERO;
        } else {
            normalize_in_place(&mut self.ps.velocity);
            self.ps.velocity *= forward;
        }
    }

    pub(super) fn check_jump(&mut self) -> bool {
        if self.ps.in_vehicle() {
            return false;
        }

        // no jumping until all buttons are up after a respawn
        if self.ps.pm_flags.contains(PmFlags::RESPAWNED) {
            return false;
        }

        if self.cmd.up_move() <= 0 {
            return false;
        }

        if self.ps.pm_flags.contains(PmFlags::JUMP_HELD) {
            self.cmd.buttons.remove(Buttons::JUMP);
            return false;
        }

        self.frame.ground_plane = false;
        self.frame.walking = false;
        self.ps.pm_flags.insert(PmFlags::JUMP_HELD);

        self.ps.ground_entity = None;
        self.ps.velocity.z = self.config.jump_velocity;
        self.add_event(EntityEvent::Jump);

        true
    }

    fn check_water_jump(&mut self) -> bool {
        if self.ps.pm_time != 0 || self.water_level != 2 {
            return false;
        }

        let mut flat_forward = Vec3::new(self.frame.forward.x, self.frame.forward.y, 0.0);
        normalize_in_place(&mut flat_forward);

        let mut spot = self.ps.origin + flat_forward * 30.0;
        spot.z += 4.0;
        if !self.point_contents(spot).contains(ContentFlags::SOLID) {
            return false;
        }

        spot.z += 16.0;
        let blocking = ContentFlags::SOLID | ContentFlags::PLAYERCLIP | ContentFlags::BODY;
        if self.point_contents(spot).intersects(blocking) {
            return false;
        }

        self.ps.velocity = self.frame.forward * self.config.water_jump_forward;
        self.ps.velocity.z = self.config.water_jump_up;

        self.ps.pm_flags.insert(PmFlags::TIME_WATERJUMP);
        self.ps.pm_time = self.config.water_jump_time;

        true
    }
}
