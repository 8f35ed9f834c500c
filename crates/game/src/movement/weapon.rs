use crate::event::EntityEvent;
use crate::player::{PmFlags, PmType, Team, WeaponState};
use crate::simulation::Buttons;
use crate::weapon::{INFINITE_AMMO, Weapon};

use super::Pmove;

impl Pmove<'_> {
    /// Counts down the refire timer and fires when attack is held.
    pub(super) fn weapon(&mut self) {
        if self.ps.pm_flags.contains(PmFlags::RESPAWNED) {
            return;
        }

        if self.ps.team == Team::Spectator || self.ps.pm_type == PmType::Spectator {
            return;
        }

        if self.ps.health <= 0 {
            self.ps.weapon = Weapon::None;
            return;
        }

        if self.ps.weapon_time > 0 {
            self.ps.weapon_time -= self.frame.msec;
        }
        if self.ps.weapon_time > 0 {
            return;
        }

        if !self.cmd.held(Buttons::ATTACK) {
            self.ps.weapon_time = 0;
            self.ps.weapon_state = WeaponState::Ready;
            return;
        }

        if self.ps.in_vehicle() {
            return;
        }

        let weapon = self.ps.weapon;

        // melee only fires when it actually connects
        if self.weapons.get(weapon).is_melee() && !self.melee_hit {
            self.ps.weapon_time = 0;
            self.ps.weapon_state = WeaponState::Ready;
            return;
        }

        self.ps.weapon_state = WeaponState::Firing;

        let client = self.ps.client_num;
        let has_ammo = match self.ammo.as_deref() {
            Some(ledger) => ledger.ammo(client, weapon) != 0,
            None => self.ps.ammo != 0,
        };
        if !has_ammo {
            self.add_event(EntityEvent::NoAmmo);
            self.ps.weapon_time += self.config.no_ammo_backoff;
            return;
        }

        let finite = !(self.ps.ammo == -1 || self.ps.ammo >= INFINITE_AMMO);
        if let Some(ledger) = self.ammo.as_deref_mut() {
            if finite && ledger.ammo(client, weapon) > 0 {
                ledger.add_ammo(client, weapon, -1);
            }
        }

        self.add_event(EntityEvent::FireWeapon);
        self.ps.weapon_time += self.weapons.fire_delay(weapon);
    }
}
