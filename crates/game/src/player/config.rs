pub const MAX_CLIENTS: usize = 64;

pub const MINS_Z: i32 = -24;
pub const DEFAULT_VIEWHEIGHT: i32 = 26;
pub const CROUCH_VIEWHEIGHT: i32 = 12;
pub const DEAD_VIEWHEIGHT: i32 = -16;

pub const PLAYER_HALF_WIDTH: f32 = 15.0;
pub const STANDING_MAXS_Z: f32 = 32.0;
pub const DUCKED_MAXS_Z: f32 = 16.0;
pub const DEAD_MAXS_Z: f32 = -8.0;
pub const VEHICLE_HALF_EXTENTS: [f32; 3] = [25.0, 25.0, 15.0];

pub const MAX_TOUCH: usize = 32;
pub const TIMER_LAND: i32 = 130;

/// Tunables for one movement run. Gravity and base speed live on the
/// player state because the server sets them per think.
#[derive(Debug, Clone)]
pub struct PmoveConfig {
    pub stop_speed: f32,
    pub duck_scale: f32,
    pub swim_scale: f32,

    pub accelerate: f32,
    pub air_accelerate: f32,
    pub water_accelerate: f32,

    pub friction: f32,
    pub water_friction: f32,
    pub noclip_friction_scale: f32,

    pub vehicle_stop_speed: f32,
    pub vehicle_accelerate: f32,
    pub vehicle_friction: f32,
    pub vehicle_brake_scale: f32,

    /// Wish speed the full-stick command scale produces.
    pub command_speed: f32,
    pub duck_min_speed: f32,

    pub jump_velocity: f32,
    pub water_jump_forward: f32,
    pub water_jump_up: f32,
    pub water_jump_time: i32,
    pub water_sink_speed: f32,
    pub vehicle_sink_speed: f32,

    pub step_size: f32,
    pub min_walk_normal: f32,
    pub overclip: f32,
    pub kickoff_speed: f32,
    pub ground_trace_depth: f32,

    pub land_time: i32,
    pub hard_landing_speed: f32,
    pub dead_deceleration: f32,
    pub no_ammo_backoff: i32,

    /// Longest gap a single advance covers.
    pub max_catchup_msec: i32,
    /// Longest single sub-step.
    pub max_step_msec: i32,
}

impl Default for PmoveConfig {
    fn default() -> Self {
        Self {
            stop_speed: 100.0,
            duck_scale: 0.25,
            swim_scale: 0.50,

            accelerate: 10.0,
            air_accelerate: 1.0,
            water_accelerate: 4.0,

            friction: 6.0,
            water_friction: 1.0,
            noclip_friction_scale: 1.5,

            vehicle_stop_speed: 100.0,
            vehicle_accelerate: 10.0 * 0.090,
            vehicle_friction: 10.0 * 0.090,
            vehicle_brake_scale: 16.0,

            command_speed: 320.0,
            duck_min_speed: 80.0,

            jump_velocity: 270.0,
            water_jump_forward: 200.0,
            water_jump_up: 350.0,
            water_jump_time: 2000,
            water_sink_speed: 30.0,
            vehicle_sink_speed: 2.0,

            step_size: 18.0,
            min_walk_normal: 0.7,
            overclip: 1.001,
            kickoff_speed: 10.0,
            ground_trace_depth: 0.25,

            land_time: 250,
            hard_landing_speed: 200.0,
            dead_deceleration: 20.0,
            no_ammo_backoff: 500,

            max_catchup_msec: 1000,
            max_step_msec: 33,
        }
    }
}
