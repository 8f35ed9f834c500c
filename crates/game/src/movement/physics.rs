use glam::Vec3;

use crate::collision::SurfaceFlags;
use crate::player::PmFlags;
use crate::simulation::UserCommand;

use super::Pmove;

/// Slides `velocity` off a surface. An overbounce above one pushes it
/// slightly away from the plane.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let mut backoff = velocity.dot(normal);

    if backoff < 0.0 {
        backoff *= overbounce;
    } else {
        backoff /= overbounce;
    }

    velocity - normal * backoff
}

/// Scale that turns the command's stick values into a wish velocity of
/// `command_speed`, regardless of how many move buttons are held.
pub fn cmd_scale(cmd: &UserCommand, command_speed: f32) -> f32 {
    let forward = cmd.forward_move() as f32;
    let right = cmd.right_move() as f32;
    let total = (forward * forward + right * right).sqrt();

    if total == 0.0 {
        return 0.0;
    }
    command_speed * 127.0 / (127.0 * total)
}

impl Pmove<'_> {
    /// Ground friction while walking, plus water drag scaled by depth.
    pub(super) fn friction(&mut self) {
        let config = self.config;
        let frametime = self.frame.frametime;

        let mut horizontal = self.ps.velocity;
        if self.frame.walking {
            horizontal.z = 0.0;
        }

        let speed = horizontal.length();
        if speed < 1.0 {
            // z stays so players keep sinking underwater
            self.ps.velocity.x = 0.0;
            self.ps.velocity.y = 0.0;
            return;
        }

        let mut drop = 0.0;

        let slick = self
            .frame
            .ground_trace
            .surface_flags
            .contains(SurfaceFlags::SLICK);
        let knockback = self.ps.pm_flags.contains(PmFlags::TIME_KNOCKBACK);

        if self.water_level <= 1 && self.frame.walking && !slick && !knockback {
            if self.ps.in_vehicle() {
                if self.cmd.up_move() > 0 {
                    drop += config.vehicle_stop_speed
                        * config.vehicle_friction
                        * config.vehicle_brake_scale
                        * frametime;
                } else {
                    let control = speed.max(config.vehicle_stop_speed);
                    drop += control * config.vehicle_friction * frametime;
                }
            } else {
                let control = speed.max(config.stop_speed);
                drop += control * config.friction * frametime;
            }
        }

        if self.water_level > 0 {
            drop += speed * config.water_friction * self.water_level as f32 * frametime;
        }

        let new_speed = (speed - drop).max(0.0) / speed;
        self.ps.velocity *= new_speed;
    }

    pub(super) fn accelerate(&mut self, wish_dir: Vec3, wish_speed: f32, accel: f32) {
        let current_speed = self.ps.velocity.dot(wish_dir);
        let add_speed = wish_speed - current_speed;
        if add_speed <= 0.0 {
            return;
        }

        let accel_speed = (accel * self.frame.frametime * wish_speed).min(add_speed);
        self.ps.velocity += accel_speed * wish_dir;
    }

    pub(super) fn cmd_scale(&self) -> f32 {
        cmd_scale(&self.cmd, self.config.command_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Buttons;

    #[test]
    fn clip_removes_the_normal_component() {
        let clipped = clip_velocity(Vec3::new(100.0, 0.0, -50.0), Vec3::Z, 1.0);
        assert_eq!(clipped, Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn overbounce_pushes_off_the_plane() {
        let clipped = clip_velocity(Vec3::new(0.0, 0.0, -100.0), Vec3::Z, 1.001);
        assert!(clipped.z > 0.0);
        assert!((clipped.z - 0.1).abs() < 1e-3);
    }

    #[test]
    fn diagonal_input_is_not_faster() {
        let straight = UserCommand::new(0, [0, 0], Buttons::FORWARD);
        let diagonal = UserCommand::new(0, [0, 0], Buttons::FORWARD | Buttons::RIGHT);

        let straight_speed = cmd_scale(&straight, 320.0) * 127.0;
        let diagonal_speed =
            cmd_scale(&diagonal, 320.0) * (127.0f32 * 127.0 + 127.0 * 127.0).sqrt();

        assert!((straight_speed - 320.0).abs() < 1e-3);
        assert!((diagonal_speed - 320.0).abs() < 1e-3);
        assert_eq!(cmd_scale(&UserCommand::default(), 320.0), 0.0);
    }
}
