mod config;
mod controller;
mod state;

pub use config::{
    CROUCH_VIEWHEIGHT, DEAD_MAXS_Z, DEAD_VIEWHEIGHT, DEFAULT_VIEWHEIGHT, DUCKED_MAXS_Z, MAX_CLIENTS,
    MAX_TOUCH, MINS_Z, PLAYER_HALF_WIDTH, PmoveConfig, STANDING_MAXS_Z, TIMER_LAND,
    VEHICLE_HALF_EXTENTS,
};
pub use controller::PlayerController;
pub use state::{PlayerState, PmFlags, PmType, Team, WeaponState};
