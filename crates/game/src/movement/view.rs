use crate::math::{PITCH, short_to_angle};
use crate::player::PmType;
use crate::simulation::Buttons;
use crate::weapon::Weapon;

use super::Pmove;

/// Furthest the pitch may go in 16-bit angle units, just short of straight
/// up or down.
const PITCH_LIMIT: i32 = 16000;

impl Pmove<'_> {
    pub(super) fn update_view_angles(&mut self) {
        // the physgun holds the view while rotating a grabbed object
        if self.cmd.held(Buttons::USE | Buttons::ATTACK) && self.ps.weapon == Weapon::Physgun {
            return;
        }

        if self.ps.pm_type.is_intermission() {
            return;
        }

        if self.ps.pm_type != PmType::Spectator && self.ps.health <= 0 {
            return;
        }

        let command = [self.cmd.angles[0], self.cmd.angles[1], 0];
        for (axis, &raw) in command.iter().enumerate() {
            let mut angle = raw.wrapping_add(self.ps.delta_angles[axis]) as i16;

            if axis == PITCH {
                if i32::from(angle) > PITCH_LIMIT {
                    self.ps.delta_angles[axis] = PITCH_LIMIT - raw;
                    angle = PITCH_LIMIT as i16;
                } else if i32::from(angle) < -PITCH_LIMIT {
                    self.ps.delta_angles[axis] = -PITCH_LIMIT - raw;
                    angle = -PITCH_LIMIT as i16;
                }
            }

            self.ps.view_angles[axis] = short_to_angle(angle);
        }
    }
}
