use crate::collision::CollisionWorld;
use crate::movement::{Pmove, PmoveOptions, PmoveResult};
use crate::simulation::UserCommand;
use crate::weapon::WeaponTable;

use super::{PlayerState, PmoveConfig};

/// Runs player movement with a fixed set of tunables and weapon data.
///
/// The same controller is used by the server and by client prediction; the
/// only differences between the two are the options passed per advance.
pub struct PlayerController {
    config: PmoveConfig,
    weapons: WeaponTable,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PmoveConfig::default())
    }
}

impl PlayerController {
    pub fn new(config: PmoveConfig) -> Self {
        Self::with_weapons(config, WeaponTable::standard())
    }

    pub fn with_weapons(config: PmoveConfig, weapons: WeaponTable) -> Self {
        Self { config, weapons }
    }

    pub fn config(&self) -> &PmoveConfig {
        &self.config
    }

    pub fn weapons(&self) -> &WeaponTable {
        &self.weapons
    }

    /// Advances `state` to `command.server_time` using the state's own ammo
    /// counter and the default player trace mask.
    pub fn advance(
        &self,
        state: &mut PlayerState,
        command: &UserCommand,
        world: &dyn CollisionWorld,
    ) -> PmoveResult {
        self.advance_with(state, command, world, PmoveOptions::default())
    }

    pub fn advance_with<'a>(
        &'a self,
        state: &'a mut PlayerState,
        command: &UserCommand,
        world: &'a dyn CollisionWorld,
        options: PmoveOptions<'a>,
    ) -> PmoveResult {
        Pmove::new(state, *command, world, &self.config, &self.weapons, options).run()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::collision::{ContentFlags, EntityId, Trace};
    use crate::event::EntityEvent;
    use crate::player::{PmFlags, PmType, WeaponState};
    use crate::simulation::Buttons;
    use crate::weapon::{AmmoInventory, AmmoLedger, Weapon};

    /// A world with nothing in it.
    struct Void;

    impl CollisionWorld for Void {
        fn trace(
            &self,
            _start: Vec3,
            _mins: Vec3,
            _maxs: Vec3,
            end: Vec3,
            _pass_entity: Option<EntityId>,
            _mask: ContentFlags,
        ) -> Trace {
            Trace::missed(end)
        }

        fn point_contents(&self, _point: Vec3, _pass_entity: Option<EntityId>) -> ContentFlags {
            ContentFlags::empty()
        }
    }

    fn command(time: i32, buttons: Buttons) -> UserCommand {
        UserCommand::new(time, [0, 0], buttons)
    }

    #[test]
    fn old_commands_are_ignored() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.command_time = 100;
        let before = state.clone();

        controller.advance(&mut state, &command(50, Buttons::FORWARD), &Void);
        assert_eq!(state, before);
    }

    #[test]
    fn long_gaps_are_capped() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);

        controller.advance(&mut state, &command(5000, Buttons::empty()), &Void);
        assert_eq!(state.command_time, 5000);
        // one second of free fall, not five
        assert!((state.velocity.z + 800.0).abs() < 1.0);
    }

    #[test]
    fn frame_counter_wraps() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.pmove_framecount = 63;

        controller.advance(&mut state, &command(16, Buttons::empty()), &Void);
        assert_eq!(state.pmove_framecount, 0);
    }

    #[test]
    fn freeze_only_sizes_the_box() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.pm_type = PmType::Freeze;
        state.velocity = Vec3::new(0.0, 0.0, -100.0);

        let result = controller.advance(&mut state, &command(50, Buttons::FORWARD), &Void);
        assert_eq!(state.origin, Vec3::ZERO);
        assert_eq!(result.maxs.z, 32.0);
    }

    #[test]
    fn noclip_flies_up() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.pm_type = PmType::Noclip;

        controller.advance(&mut state, &command(100, Buttons::FORWARD | Buttons::JUMP), &Void);
        assert!(state.origin.x > 0.0);
        assert!(state.origin.z > 0.0);
        assert!(state.velocity.z > 0.0);
    }

    #[test]
    fn dead_players_cannot_turn() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.health = 0;
        state.pm_type = PmType::Dead;

        let mut cmd = command(16, Buttons::empty());
        cmd.angles = [0, 8192];
        controller.advance(&mut state, &cmd, &Void);
        assert_eq!(state.view_angles, Vec3::ZERO);
    }

    #[test]
    fn pitch_is_clamped() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);

        let mut cmd = command(16, Buttons::empty());
        cmd.angles = [20000, 0];
        controller.advance(&mut state, &cmd, &Void);

        assert_eq!(state.delta_angles[0], 16000 - 20000);
        assert!((state.view_angles.x - 16000.0 * 360.0 / 65536.0).abs() < 1e-3);
    }

    #[test]
    fn physgun_holds_the_view() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.weapon = Weapon::Physgun;

        let mut cmd = command(16, Buttons::USE | Buttons::ATTACK);
        cmd.angles = [0, 8192];
        controller.advance(&mut state, &cmd, &Void);
        assert_eq!(state.view_angles, Vec3::ZERO);
    }

    #[test]
    fn firing_uses_the_weapon_delay() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.weapon = Weapon::Machinegun;
        state.ammo = 50;

        controller.advance(&mut state, &command(16, Buttons::ATTACK), &Void);

        assert_eq!(state.weapon_state, WeaponState::Firing);
        assert_eq!(state.weapon_time, 100);
        assert_eq!(
            state.events.latest().map(|r| r.event),
            Some(EntityEvent::FireWeapon)
        );
    }

    #[test]
    fn empty_client_ammo_backs_off() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.weapon = Weapon::Railgun;
        state.ammo = 0;

        controller.advance(&mut state, &command(16, Buttons::ATTACK), &Void);

        assert_eq!(state.weapon_time, 500);
        assert_eq!(
            state.events.latest().map(|r| r.event),
            Some(EntityEvent::NoAmmo)
        );
    }

    #[test]
    fn ledger_ammo_is_consumed() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(4);
        state.weapon = Weapon::Shotgun;
        state.ammo = 10;

        let mut inventory = AmmoInventory::new();
        inventory.set(4, Weapon::Shotgun, 10);

        let options = PmoveOptions {
            ammo: Some(&mut inventory),
            ..Default::default()
        };
        controller.advance_with(&mut state, &command(16, Buttons::ATTACK), &Void, options);

        assert_eq!(inventory.ammo(4, Weapon::Shotgun), 9);
        assert_eq!(state.weapon_time, 1000);
    }

    #[test]
    fn unlimited_ammo_is_not_consumed() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(4);
        state.weapon = Weapon::Shotgun;
        state.ammo = -1;

        let mut inventory = AmmoInventory::new();
        inventory.set(4, Weapon::Shotgun, 10);

        let options = PmoveOptions {
            ammo: Some(&mut inventory),
            ..Default::default()
        };
        controller.advance_with(&mut state, &command(16, Buttons::ATTACK), &Void, options);

        assert_eq!(inventory.ammo(4, Weapon::Shotgun), 10);
    }

    #[test]
    fn gauntlet_needs_a_hit() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.weapon = Weapon::Gauntlet;
        state.ammo = -1;

        controller.advance(&mut state, &command(16, Buttons::ATTACK), &Void);
        assert_eq!(state.weapon_state, WeaponState::Ready);
        assert_eq!(state.weapon_time, 0);

        let options = PmoveOptions {
            melee_hit: true,
            ..Default::default()
        };
        controller.advance_with(&mut state, &command(32, Buttons::ATTACK), &Void, options);
        assert_eq!(state.weapon_state, WeaponState::Firing);
        assert_eq!(state.weapon_time, 400);
    }

    #[test]
    fn respawned_players_hold_fire_until_release() {
        let controller = PlayerController::default();
        let mut state = PlayerState::spawn(0, Vec3::ZERO, 0);
        state.weapon = Weapon::Machinegun;
        state.ammo = 50;

        controller.advance(&mut state, &command(16, Buttons::ATTACK), &Void);
        assert!(state.pm_flags.contains(PmFlags::RESPAWNED));
        assert_eq!(state.weapon_time, 0);

        controller.advance(&mut state, &command(32, Buttons::empty()), &Void);
        assert!(!state.pm_flags.contains(PmFlags::RESPAWNED));
    }

    #[test]
    fn dead_players_drop_their_weapon() {
        let controller = PlayerController::default();
        let mut state = PlayerState::new(0);
        state.weapon = Weapon::RocketLauncher;
        state.health = -5;
        state.pm_type = PmType::Dead;

        controller.advance(&mut state, &command(16, Buttons::ATTACK), &Void);
        assert_eq!(state.weapon, Weapon::None);
    }
}
