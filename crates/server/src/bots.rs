use clap::ValueEnum;
use glam::Vec3;

use pmove::math::angle_to_short;
use pmove::{Buttons, TestingGround, UserCommand};

/// Which part of the testing ground the bots exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Run in circles on open floor, hopping now and then.
    Patrol,
    /// Run up and down the staircase.
    Stairs,
    /// Wade back and forth through the shallow water.
    Water,
    /// A bit of everything.
    Mixed,
}

const TURN_DEGREES_PER_MSEC: f32 = 0.09;
const JUMP_PERIOD_MSEC: i32 = 1500;
const JUMP_HOLD_MSEC: i32 = 100;
const SHUTTLE_LEG_MSEC: i32 = 1200;
/// Spawn points close enough to the middle that a circling bot stays on
/// the floor.
const PATROL_SPAWNS: usize = 6;

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Circle,
    Shuttle { yaw: f32 },
}

#[derive(Debug, Clone)]
pub struct Bot {
    pub client: u16,
    pub spawn: Vec3,
    behavior: Behavior,
}

impl Bot {
    fn circle(client: u16, spawn: Vec3) -> Self {
        Self {
            client,
            spawn,
            behavior: Behavior::Circle,
        }
    }

    fn shuttle(client: u16, spawn: Vec3, yaw: f32) -> Self {
        Self {
            client,
            spawn,
            behavior: Behavior::Shuttle { yaw },
        }
    }

    /// The command this bot sends for server time `time`.
    pub fn command(&self, time: i32) -> UserCommand {
        match self.behavior {
            Behavior::Circle => {
                let yaw = angle_to_short(time as f32 * TURN_DEGREES_PER_MSEC);
                let mut buttons = Buttons::FORWARD;
                if time % JUMP_PERIOD_MSEC < JUMP_HOLD_MSEC {
                    buttons |= Buttons::JUMP;
                }
                UserCommand::new(time, [0, yaw], buttons)
            }
            Behavior::Shuttle { yaw } => {
                let leg = time / SHUTTLE_LEG_MSEC;
                let heading = if leg % 2 == 0 { yaw } else { yaw + 180.0 };
                UserCommand::new(time, [0, angle_to_short(heading)], Buttons::FORWARD)
            }
        }
    }
}

impl Scenario {
    pub fn bots(self, count: usize, ground: &TestingGround) -> Vec<Bot> {
        let spawns = ground.spawn_points();
        let stairs = TestingGround::standing_origin(
            TestingGround::STAIRS_MINS.x - 64.0,
            (TestingGround::STAIRS_MINS.y + TestingGround::STAIRS_MAXS.y) * 0.5,
            TestingGround::GROUND_Z,
        );
        let water = TestingGround::standing_origin(
            TestingGround::SHALLOW_WATER_MINS.x - 56.0,
            (TestingGround::SHALLOW_WATER_MINS.y + TestingGround::SHALLOW_WATER_MAXS.y) * 0.5,
            TestingGround::GROUND_Z,
        );

        (0..count)
            .map(|i| {
                let client = i as u16;
                let patrol = spawns[i % PATROL_SPAWNS.min(spawns.len())];
                let kind = match self {
                    Scenario::Mixed => [Scenario::Patrol, Scenario::Stairs, Scenario::Water][i % 3],
                    other => other,
                };
                match kind {
                    Scenario::Stairs => Bot::shuttle(client, stairs, 0.0),
                    Scenario::Water => Bot::shuttle(client, water, 0.0),
                    Scenario::Patrol | Scenario::Mixed => Bot::circle(client, patrol),
                }
            })
            .collect()
    }
}
