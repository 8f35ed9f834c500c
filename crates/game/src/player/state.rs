use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::EntityId;
use crate::event::{EntityFlags, PredictableEvents};
use crate::weapon::Weapon;

use super::config::{DEFAULT_VIEWHEIGHT, MAX_CLIENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PmType {
    #[default]
    Normal,
    /// Flies through walls.
    Noclip,
    /// Flies, still clipped against the world.
    Spectator,
    /// No acceleration or turning, but free falling.
    Dead,
    /// Stuck in place with no control.
    Freeze,
    /// No movement or status bar.
    Intermission,
    /// No movement.
    SpIntermission,
}

impl PmType {
    pub fn is_intermission(self) -> bool {
        matches!(self, Self::Intermission | Self::SpIntermission)
    }

    /// Dead and every later type drop all movement intent from the command.
    pub fn locks_movement(self) -> bool {
        matches!(
            self,
            Self::Dead | Self::Freeze | Self::Intermission | Self::SpIntermission
        )
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PmFlags: u32 {
        const DUCKED = 1;
        const JUMP_HELD = 2;
        const BACKWARDS_JUMP = 8;
        const BACKWARDS_RUN = 16;
        /// pm_time is time before rejump.
        const TIME_LAND = 32;
        /// pm_time is an air-accelerate only time.
        const TIME_KNOCKBACK = 64;
        /// pm_time is waterjump.
        const TIME_WATERJUMP = 256;
        /// Clear after attack and jump buttons come up.
        const RESPAWNED = 512;
        const USE_ITEM_HELD = 1024;
        const GRAPPLE_PULL = 2048;
        const FOLLOW = 4096;
        const SCOREBOARD = 8192;
    }
}

impl PmFlags {
    pub const ALL_TIMES: Self = Self::TIME_WATERJUMP
        .union(Self::TIME_LAND)
        .union(Self::TIME_KNOCKBACK);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Ready,
    Raising,
    Dropping,
    Firing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Free,
    Red,
    Blue,
    Spectator,
}

/// Everything movement reads and writes for one player.
///
/// Health, ammo, gravity, speed, vehicle and team are owned by game code
/// outside movement; movement only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub client_num: u16,
    /// Server time of the last executed command.
    pub command_time: i32,
    pub pm_type: PmType,
    pub pm_flags: PmFlags,
    pub pm_time: i32,
    pub pmove_framecount: u8,
    pub bob_cycle: i32,

    pub origin: Vec3,
    pub velocity: Vec3,
    pub gravity: i32,
    pub speed: i32,
    /// Added to command angles to get the view direction.
    pub delta_angles: [i32; 3],
    pub view_angles: Vec3,
    pub view_height: i32,
    pub ground_entity: Option<EntityId>,

    pub legs_timer: i32,
    pub torso_timer: i32,

    pub weapon: Weapon,
    pub weapon_state: WeaponState,
    pub weapon_time: i32,

    pub eflags: EntityFlags,
    pub events: PredictableEvents,

    pub health: i32,
    pub ammo: i32,
    pub vehicle: i32,
    pub team: Team,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            client_num: 0,
            command_time: 0,
            pm_type: PmType::Normal,
            pm_flags: PmFlags::empty(),
            pm_time: 0,
            pmove_framecount: 0,
            bob_cycle: 0,
            origin: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity: 800,
            speed: 320,
            delta_angles: [0; 3],
            view_angles: Vec3::ZERO,
            view_height: DEFAULT_VIEWHEIGHT,
            ground_entity: None,
            legs_timer: 0,
            torso_timer: 0,
            weapon: Weapon::None,
            weapon_state: WeaponState::Ready,
            weapon_time: 0,
            eflags: EntityFlags::empty(),
            events: PredictableEvents::new(),
            health: 100,
            ammo: 0,
            vehicle: 0,
            team: Team::Free,
        }
    }
}

impl PlayerState {
    pub fn new(client_num: u16) -> Self {
        assert!(
            (client_num as usize) < MAX_CLIENTS,
            "client number {client_num} out of range"
        );
        Self {
            client_num,
            ..Default::default()
        }
    }

    pub fn spawn(client_num: u16, origin: Vec3, command_time: i32) -> Self {
        let mut state = Self::new(client_num);
        state.origin = origin;
        state.command_time = command_time;
        state.pm_flags = PmFlags::RESPAWNED;
        state
    }

    pub fn entity_id(&self) -> EntityId {
        EntityId(self.client_num)
    }

    pub fn on_ground(&self) -> bool {
        self.ground_entity.is_some()
    }

    pub fn in_vehicle(&self) -> bool {
        self.vehicle != 0
    }

    pub fn is_ducked(&self) -> bool {
        self.pm_flags.contains(PmFlags::DUCKED)
    }

    pub fn horizontal_speed(&self) -> f32 {
        (self.velocity.x * self.velocity.x + self.velocity.y * self.velocity.y).sqrt()
    }

    /// Sets a delta so the next command's raw angles produce `angles`.
    pub fn set_view_angles(&mut self, angles: Vec3, command_angles: [i32; 2]) {
        let raw = [command_angles[0], command_angles[1], 0];
        for (axis, delta) in self.delta_angles.iter_mut().enumerate() {
            *delta = crate::math::angle_to_short(angles[axis]) - raw[axis];
        }
        self.view_angles = angles;
    }
}
