//! The per-command player movement pipeline.
//!
//! A [`Pmove`] borrows everything one advance needs, chops the command's time
//! span into short sub-steps and runs the fixed phase order on each. Nothing
//! outside the borrowed state survives between calls, so the server and a
//! predicting client given the same inputs end in the same place.

mod events;
mod ground;
mod modes;
mod physics;
mod slide;
mod view;
mod weapon;

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags, EntityId, Trace};
use crate::event::{EntityEvent, EntityFlags};
use crate::math::angle_vectors;
use crate::player::{
    MAX_TOUCH, MINS_Z, PLAYER_HALF_WIDTH, PlayerState, PmFlags, PmType, PmoveConfig,
    STANDING_MAXS_Z,
};
use crate::simulation::{Buttons, UserCommand};
use crate::weapon::{AmmoLedger, WeaponTable};

pub use physics::{clip_velocity, cmd_scale};

/// Caller-supplied extras for one advance.
pub struct PmoveOptions<'a> {
    pub trace_mask: ContentFlags,
    /// Result of the caller's melee hit test for this command.
    pub melee_hit: bool,
    /// Authoritative ammo counts. Without one the state's own counter is used.
    pub ammo: Option<&'a mut dyn AmmoLedger>,
}

impl Default for PmoveOptions<'_> {
    fn default() -> Self {
        Self {
            trace_mask: ContentFlags::MASK_PLAYERSOLID,
            melee_hit: false,
            ammo: None,
        }
    }
}

/// Outputs of the last sub-step that are not part of the player state.
#[derive(Debug, Clone, PartialEq)]
pub struct PmoveResult {
    pub mins: Vec3,
    pub maxs: Vec3,
    pub water_level: u8,
    pub water_type: ContentFlags,
    pub touch_entities: Vec<EntityId>,
    pub xy_speed: f32,
    /// The working command as it stood after the final sub-step.
    pub command: UserCommand,
}

/// Scratch owned by a single sub-step.
#[derive(Debug, Clone, Copy, Default)]
struct FrameLocals {
    msec: i32,
    frametime: f32,

    forward: Vec3,
    right: Vec3,

    walking: bool,
    ground_plane: bool,
    ground_trace: Trace,

    previous_origin: Vec3,
    previous_velocity: Vec3,
    previous_water_level: u8,
}

pub(crate) struct Pmove<'a> {
    ps: &'a mut PlayerState,
    cmd: UserCommand,
    world: &'a dyn CollisionWorld,
    config: &'a PmoveConfig,
    weapons: &'a WeaponTable,
    ammo: Option<&'a mut dyn AmmoLedger>,
    trace_mask: ContentFlags,
    melee_hit: bool,

    mins: Vec3,
    maxs: Vec3,
    water_level: u8,
    water_type: ContentFlags,
    touch: Vec<EntityId>,
    xy_speed: f32,

    frame: FrameLocals,
}

impl<'a> Pmove<'a> {
    pub(crate) fn new(
        ps: &'a mut PlayerState,
        cmd: UserCommand,
        world: &'a dyn CollisionWorld,
        config: &'a PmoveConfig,
        weapons: &'a WeaponTable,
        options: PmoveOptions<'a>,
    ) -> Self {
        Self {
            ps,
            cmd,
            world,
            config,
            weapons,
            ammo: options.ammo,
            trace_mask: options.trace_mask,
            melee_hit: options.melee_hit,
            mins: Vec3::new(-PLAYER_HALF_WIDTH, -PLAYER_HALF_WIDTH, MINS_Z as f32),
            maxs: Vec3::new(PLAYER_HALF_WIDTH, PLAYER_HALF_WIDTH, STANDING_MAXS_Z),
            water_level: 0,
            water_type: ContentFlags::empty(),
            touch: Vec::with_capacity(MAX_TOUCH),
            xy_speed: 0.0,
            frame: FrameLocals::default(),
        }
    }

    /// Advances the player from its command time to the command's server time.
    pub(crate) fn run(mut self) -> PmoveResult {
        let final_time = self.cmd.server_time;

        if final_time < self.ps.command_time {
            log::warn!(
                "client {}: command at {} is older than {}",
                self.ps.client_num,
                final_time,
                self.ps.command_time
            );
            return self.finish();
        }

        if final_time > self.ps.command_time + self.config.max_catchup_msec {
            self.ps.command_time = final_time - self.config.max_catchup_msec;
        }

        self.ps.pmove_framecount = self.ps.pmove_framecount.wrapping_add(1) & 63;

        while self.ps.command_time != final_time {
            let msec = (final_time - self.ps.command_time).clamp(1, self.config.max_step_msec);
            self.cmd.server_time = self.ps.command_time + msec;
            self.single();

            if self.ps.pm_flags.contains(PmFlags::JUMP_HELD) {
                self.cmd.buttons.insert(Buttons::JUMP);
            }
        }

        self.finish()
    }

    fn finish(self) -> PmoveResult {
        PmoveResult {
            mins: self.mins,
            maxs: self.maxs,
            water_level: self.water_level,
            water_type: self.water_type,
            touch_entities: self.touch,
            xy_speed: self.xy_speed,
            command: self.cmd,
        }
    }

    fn single(&mut self) {
        self.touch.clear();
        self.water_type = ContentFlags::empty();
        self.water_level = 0;

        if self.ps.health <= 0 {
            self.trace_mask.remove(ContentFlags::BODY);
        }

        let firing = !self.ps.pm_flags.contains(PmFlags::RESPAWNED)
            && self.ps.pm_type != PmType::Intermission
            && self.cmd.held(Buttons::ATTACK)
            && self.ps.ammo != 0;
        self.ps.eflags.set(EntityFlags::FIRING, firing);

        if self.ps.health > 0 && !self.cmd.held(Buttons::ATTACK) {
            self.ps.pm_flags.remove(PmFlags::RESPAWNED);
        }

        self.frame = FrameLocals::default();
        self.frame.msec = (self.cmd.server_time - self.ps.command_time).clamp(1, 200);
        self.ps.command_time = self.cmd.server_time;
        self.frame.previous_origin = self.ps.origin;
        self.frame.previous_velocity = self.ps.velocity;
        self.frame.frametime = self.frame.msec as f32 * 0.001;

        self.update_view_angles();
        let (forward, right, _) = angle_vectors(self.ps.view_angles);
        self.frame.forward = forward;
        self.frame.right = right;

        if self.cmd.up_move() <= 0 {
            self.ps.pm_flags.remove(PmFlags::JUMP_HELD);
        }

        let forward_move = self.cmd.forward_move();
        if forward_move < 0 {
            self.ps.pm_flags.insert(PmFlags::BACKWARDS_RUN);
        } else if forward_move > 0 || self.cmd.right_move() != 0 {
            self.ps.pm_flags.remove(PmFlags::BACKWARDS_RUN);
        }

        if self.ps.pm_type.locks_movement() {
            self.cmd.buttons.remove(Buttons::MOVEMENT);
        }

        match self.ps.pm_type {
            PmType::Spectator => {
                self.check_duck();
                self.noclip_move();
                self.drop_timers();
                return;
            }
            PmType::Noclip => {
                self.noclip_move();
                self.drop_timers();
                self.weapon();
                self.check_duck();
                self.ground_trace();
                return;
            }
            PmType::Freeze => {
                self.check_duck();
                return;
            }
            PmType::Intermission | PmType::SpIntermission => return,
            PmType::Normal | PmType::Dead => {}
        }

        self.set_water_level();
        self.frame.previous_water_level = self.water_level;

        self.check_duck();
        self.ground_trace();

        if self.ps.pm_type == PmType::Dead {
            self.dead_move();
        }

        self.drop_timers();

        if self.ps.pm_flags.contains(PmFlags::TIME_WATERJUMP) {
            self.water_jump_move();
        } else if self.water_level > 1 {
            self.water_move();
        } else if self.frame.walking {
            self.walk_move();
        } else {
            self.air_move();
        }

        self.ground_trace();
        self.set_water_level();

        self.weapon();

        if !self.ps.in_vehicle() {
            self.footsteps();
        }

        self.water_events();
    }

    fn trace(&self, start: Vec3, end: Vec3) -> Trace {
        self.world.trace(
            start,
            self.mins,
            self.maxs,
            end,
            Some(self.ps.entity_id()),
            self.trace_mask,
        )
    }

    fn point_contents(&self, point: Vec3) -> ContentFlags {
        self.world.point_contents(point, Some(self.ps.entity_id()))
    }

    fn add_event(&mut self, event: EntityEvent) {
        log::trace!("client {}: {:?}", self.ps.client_num, event);
        self.ps.events.push(event, 0);
    }

    fn add_touch(&mut self, entity: Option<EntityId>) {
        let Some(entity) = entity else {
            return;
        };
        if entity.is_world() || self.touch.len() == MAX_TOUCH || self.touch.contains(&entity) {
            return;
        }
        self.touch.push(entity);
    }
}
