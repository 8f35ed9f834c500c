use crate::event::EntityEvent;
use crate::player::PmFlags;

use super::Pmove;

impl Pmove<'_> {
    /// Advances the bob cycle and raises a footstep, splash or swim event
    /// each time it crosses a half-cycle boundary.
    pub(super) fn footsteps(&mut self) {
        self.xy_speed = self.ps.horizontal_speed();

        if self.ps.ground_entity.is_none() {
            return;
        }

        if self.cmd.forward_move() == 0 && self.cmd.right_move() == 0 {
            if self.xy_speed < 5.0 {
                self.ps.bob_cycle = 0;
            }
            return;
        }

        // ducked characters bob faster
        let bob_move = if self.ps.is_ducked() { 0.5 } else { 0.4 };

        let old = self.ps.bob_cycle;
        self.ps.bob_cycle = ((old as f32 + bob_move * self.frame.msec as f32) as i32) & 255;

        if ((old + 64) ^ (self.ps.bob_cycle + 64)) & 128 == 0 {
            return;
        }

        let event = match self.water_level {
            0 => self.footstep_for_surface(),
            1 => Some(EntityEvent::FootSplash),
            2 => Some(EntityEvent::Swim),
            _ => None,
        };
        if let Some(event) = event {
            self.add_event(event);
        }
    }

    pub(super) fn water_events(&mut self) {
        let before = self.frame.previous_water_level;
        let after = self.water_level;

        if before == 0 && after != 0 {
            self.add_event(EntityEvent::WaterTouch);
        }
        if before != 0 && after == 0 {
            self.add_event(EntityEvent::WaterLeave);
        }
        if before != 3 && after == 3 {
            self.add_event(EntityEvent::WaterUnder);
        }
        if before == 3 && after != 3 {
            self.add_event(EntityEvent::WaterClear);
        }
    }

    pub(super) fn drop_timers(&mut self) {
        let msec = self.frame.msec;

        if self.ps.pm_time != 0 {
            if msec >= self.ps.pm_time {
                self.ps.pm_flags.remove(PmFlags::ALL_TIMES);
                self.ps.pm_time = 0;
            } else {
                self.ps.pm_time -= msec;
            }
        }

        if self.ps.legs_timer > 0 {
            self.ps.legs_timer = (self.ps.legs_timer - msec).max(0);
        }
        if self.ps.torso_timer > 0 {
            self.ps.torso_timer = (self.ps.torso_timer - msec).max(0);
        }
    }
}
