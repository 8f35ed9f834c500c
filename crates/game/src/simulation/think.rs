use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, ContentFlags};
use crate::event::{EntityState, EventRecord};
use crate::movement::{PmoveOptions, PmoveResult};
use crate::player::{PlayerController, PlayerState, PmType, Team};
use crate::weapon::AmmoLedger;

use super::{Buttons, UserCommand};

const VEHICLE_SPEED: i32 = 900;
const VEHICLE_GRAVITY_SCALE: f32 = 0.4;
const SPECTATOR_SPEED: i32 = 900;
const NOCLIP_SPEED_SCALE: f32 = 2.5;

/// Server-wide movement settings applied to every player before a think.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkSettings {
    pub gravity: i32,
    pub speed: i32,
    /// How far ahead of the level clock a command may claim to be.
    pub max_lead_msec: i32,
    /// How far behind the level clock a command may fall before it is pulled
    /// forward.
    pub max_lag_msec: i32,
}

impl Default for ThinkSettings {
    fn default() -> Self {
        Self {
            gravity: 800,
            speed: 320,
            max_lead_msec: 200,
            max_lag_msec: 1000,
        }
    }
}

/// Per-client game flags that decide how movement is set up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSession {
    pub noclip: bool,
    pub bot: bool,
    /// Non-zero while the client drives a vehicle.
    pub vehicle: i32,
}

/// Everything a think borrows from the server besides the client itself.
pub struct ThinkContext<'a> {
    pub controller: &'a PlayerController,
    pub world: &'a dyn CollisionWorld,
    pub settings: &'a ThinkSettings,
    pub ammo: &'a mut dyn AmmoLedger,
    pub level_time: i32,
}

#[derive(Debug, Clone)]
pub struct ThinkOutcome {
    pub result: PmoveResult,
    /// Predictable events raised by this think, in order.
    pub events: Vec<EventRecord>,
    pub entity: EntityState,
}

/// Prepares the player for one command, runs movement and collects what the
/// rest of the server needs. Returns `None` when the command carries no new
/// time.
pub fn client_think(
    ctx: &mut ThinkContext<'_>,
    state: &mut PlayerState,
    session: &ClientSession,
    command: &UserCommand,
    melee_hit: bool,
) -> Option<ThinkOutcome> {
    let mut command = *command;
    let level_time = ctx.level_time;

    // don't let a client run ahead of or lag far behind the level
    if command.server_time > level_time + ctx.settings.max_lead_msec {
        command.server_time = level_time + ctx.settings.max_lead_msec;
    } else if command.server_time < level_time - ctx.settings.max_lag_msec {
        command.server_time = level_time - ctx.settings.max_lag_msec;
    }

    if command.server_time - state.command_time < 1 {
        return None;
    }

    let trace_mask;
    if state.team == Team::Spectator {
        state.pm_type = PmType::Spectator;
        state.speed = SPECTATOR_SPEED;
        trace_mask = ContentFlags::MASK_PLAYERSOLID.difference(ContentFlags::BODY);
    } else {
        if session.noclip {
            state.pm_type = PmType::Noclip;
        } else if state.health <= 0 {
            state.pm_type = PmType::Dead;
        } else if state.pm_type != PmType::Freeze {
            state.pm_type = PmType::Normal;
        }

        state.gravity = ctx.settings.gravity;
        state.vehicle = session.vehicle;
        if state.in_vehicle() {
            state.speed = VEHICLE_SPEED;
            state.gravity = (state.gravity as f32 * VEHICLE_GRAVITY_SCALE) as i32;
        } else {
            state.speed = ctx.settings.speed;
        }
        if state.pm_type == PmType::Noclip {
            state.speed = (state.speed as f32 * NOCLIP_SPEED_SCALE) as i32;
        }

        trace_mask = if state.pm_type == PmType::Dead {
            ContentFlags::MASK_PLAYERSOLID.difference(ContentFlags::BODY)
        } else if session.bot {
            ContentFlags::MASK_PLAYERSOLID | ContentFlags::BOTCLIP
        } else {
            ContentFlags::MASK_PLAYERSOLID
        };
    }

    let melee_hit = melee_hit
        && ctx.controller.weapons().get(state.weapon).is_melee()
        && command.held(Buttons::ATTACK)
        && state.weapon_time <= 0
        && state.pm_type != PmType::Dead;

    let old_sequence = state.events.sequence();
    let options = PmoveOptions {
        trace_mask,
        melee_hit,
        ammo: Some(&mut *ctx.ammo),
    };
    let result = ctx
        .controller
        .advance_with(state, &command, ctx.world, options);

    let events: Vec<EventRecord> = state.events.since(old_sequence).collect();
    if !events.is_empty() {
        log::trace!("client {}: {} events", state.client_num, events.len());
    }

    let entity = EntityState::from_player_state(state, true);
    state.ammo = ctx.ammo.ammo(state.client_num, state.weapon);

    Some(ThinkOutcome {
        result,
        events,
        entity,
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::event::EntityEvent;
    use crate::map::TestingGround;
    use crate::weapon::{AmmoInventory, Weapon};

    fn standing_player() -> PlayerState {
        let mut state = PlayerState::new(0);
        state.origin = TestingGround::standing_origin(0.0, 0.0, TestingGround::GROUND_Z);
        state
    }

    fn think(
        state: &mut PlayerState,
        session: &ClientSession,
        command: &UserCommand,
        level_time: i32,
        ammo: &mut AmmoInventory,
    ) -> Option<ThinkOutcome> {
        let controller = PlayerController::default();
        let world = TestingGround::new().build_world();
        let settings = ThinkSettings::default();
        let mut ctx = ThinkContext {
            controller: &controller,
            world: &world,
            settings: &settings,
            ammo,
            level_time,
        };
        client_think(&mut ctx, state, session, command, false)
    }

    #[test]
    fn commands_without_new_time_are_skipped() {
        let mut state = standing_player();
        state.command_time = 100;
        let mut ammo = AmmoInventory::new();

        let command = UserCommand::new(100, [0, 0], Buttons::FORWARD);
        assert!(think(&mut state, &ClientSession::default(), &command, 100, &mut ammo).is_none());
        assert_eq!(state.origin, TestingGround::standing_origin(0.0, 0.0, 0.0));
    }

    #[test]
    fn future_commands_are_clamped_to_the_lead() {
        let mut state = standing_player();
        let mut ammo = AmmoInventory::new();

        let command = UserCommand::new(5000, [0, 0], Buttons::empty());
        think(&mut state, &ClientSession::default(), &command, 0, &mut ammo);
        assert_eq!(state.command_time, 200);
    }

    #[test]
    fn vehicle_and_noclip_change_speed_and_gravity() {
        let mut ammo = AmmoInventory::new();

        let mut state = standing_player();
        let vehicle = ClientSession {
            vehicle: 1,
            ..Default::default()
        };
        think(&mut state, &vehicle, &UserCommand::new(16, [0, 0], Buttons::empty()), 16, &mut ammo);
        assert_eq!(state.speed, 900);
        assert_eq!(state.gravity, 320);

        let mut state = standing_player();
        let noclip = ClientSession {
            noclip: true,
            ..Default::default()
        };
        think(&mut state, &noclip, &UserCommand::new(16, [0, 0], Buttons::empty()), 16, &mut ammo);
        assert_eq!(state.pm_type, PmType::Noclip);
        assert_eq!(state.speed, 800);
    }

    #[test]
    fn spectators_fly() {
        let mut state = standing_player();
        state.team = Team::Spectator;
        let mut ammo = AmmoInventory::new();

        let outcome = think(
            &mut state,
            &ClientSession::default(),
            &UserCommand::new(50, [0, 0], Buttons::FORWARD),
            50,
            &mut ammo,
        )
        .unwrap();

        assert_eq!(state.pm_type, PmType::Spectator);
        assert_eq!(state.speed, 900);
        assert!(state.velocity.x > 0.0);
        assert_eq!(outcome.entity.kind, crate::event::EntityKind::Invisible);
    }

    #[test]
    fn firing_is_reported_and_ammo_synced() {
        let mut state = standing_player();
        state.weapon = Weapon::Machinegun;
        state.pm_flags = Default::default();
        let mut ammo = AmmoInventory::new();
        ammo.set(0, Weapon::Machinegun, 10);

        let outcome = think(
            &mut state,
            &ClientSession::default(),
            &UserCommand::new(16, [0, 0], Buttons::ATTACK),
            16,
            &mut ammo,
        )
        .unwrap();

        assert!(outcome
            .events
            .iter()
            .any(|record| record.event == EntityEvent::FireWeapon));
        assert_eq!(state.ammo, 9);
        assert_eq!(outcome.entity.pos.base, state.origin.round());
        assert_eq!(outcome.entity.pos.delta, state.velocity);
    }

    #[test]
    fn dead_players_get_the_dead_type() {
        let mut state = standing_player();
        state.health = 0;
        state.velocity = Vec3::new(100.0, 0.0, 0.0);
        let mut ammo = AmmoInventory::new();

        let outcome = think(
            &mut state,
            &ClientSession::default(),
            &UserCommand::new(16, [0, 0], Buttons::empty()),
            16,
            &mut ammo,
        )
        .unwrap();
        assert_eq!(state.pm_type, PmType::Dead);
        assert!(outcome
            .entity
            .eflags
            .contains(crate::event::EntityFlags::DEAD));
    }
}
