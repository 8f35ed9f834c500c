use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::collision::EntityId;
use crate::math::snap_vector;
use crate::player::{PlayerState, PmType};
use crate::trajectory::Trajectory;
use crate::weapon::Weapon;

/// Health at or below which a body is gibbed and stops being drawn.
pub const GIB_HEALTH: i32 = -40;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EntityFlags: u32 {
        const DEAD = 0x0000_0001;
        const TELEPORT_BIT = 0x0000_0004;
        const FIRING = 0x0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Player,
    Invisible,
}

/// The broadcast view of a player, as other clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub number: u16,
    pub kind: EntityKind,
    pub pos: Trajectory,
    pub apos: Trajectory,
    pub eflags: EntityFlags,
    /// Event code with sequence bits, plus its parameter.
    pub event: Option<(u16, i32)>,
    pub weapon: Weapon,
    pub ground_entity: Option<EntityId>,
    pub client_num: u16,
}

impl EntityState {
    /// Builds the entity view and advances the player's broadcast event
    /// cursor by at most one event.
    pub fn from_player_state(state: &mut PlayerState, snap: bool) -> Self {
        let hidden = matches!(state.pm_type, PmType::Intermission | PmType::Spectator)
            || state.health <= GIB_HEALTH;

        let base = if snap {
            snap_vector(state.origin)
        } else {
            state.origin
        };
        let angles = if snap {
            snap_vector(state.view_angles)
        } else {
            state.view_angles
        };

        let mut eflags = state.eflags;
        eflags.set(EntityFlags::DEAD, state.health <= 0);

        Self {
            number: state.client_num,
            kind: if hidden {
                EntityKind::Invisible
            } else {
                EntityKind::Player
            },
            pos: Trajectory::interpolate(base, state.velocity),
            apos: Trajectory::interpolate(angles, glam::Vec3::ZERO),
            eflags,
            event: state.events.next_entity_event(),
            weapon: state.weapon,
            ground_entity: state.ground_entity,
            client_num: state.client_num,
        }
    }
}
