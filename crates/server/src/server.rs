use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Vec3;

use pmove::{
    BrushWorld, ClientPrediction, ClientSession, FixedTimestep, PlayerController, ServerSimulation,
    TestingGround,
};

use crate::bots::Bot;
use crate::config::ServerConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerStats {
    pub ticks: u64,
    pub commands: usize,
    pub events: usize,
    pub predicted_events: usize,
    pub snapshots: u64,
    pub prediction_misses: u64,
    pub max_prediction_error: f32,
}

/// Client-side view of one bot, fed the same commands the server gets and
/// corrected by periodic snapshots.
struct Mirror {
    client: u16,
    prediction: ClientPrediction,
}

pub struct GameServer {
    config: ServerConfig,
    sim: ServerSimulation<BrushWorld>,
    bots: Vec<Bot>,
    mirror: Option<Mirror>,
    timestep: FixedTimestep,
    stats: ServerStats,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let ground = TestingGround::new();
        let world = ground.build_world();
        log::info!(
            "testing ground ready: {} objects, {} brushes",
            ground.objects().len(),
            world.len()
        );

        let mut sim =
            ServerSimulation::new(world, PlayerController::default(), config.think.clone());
        let bots = config.scenario.bots(config.bots, &ground);

        let mut mirror = None;
        for bot in &bots {
            // the mirrored client plays as a human so both sides use the same trace mask
            let session = ClientSession {
                bot: bot.client != 0,
                ..Default::default()
            };
            let state = sim.connect(bot.client, bot.spawn, session).clone();
            if bot.client == 0 {
                mirror = Some(Mirror {
                    client: 0,
                    prediction: ClientPrediction::new(PlayerController::default(), state),
                });
            }
        }

        Ok(Self {
            timestep: FixedTimestep::new(config.tick_rate),
            stats: ServerStats::default(),
            config,
            sim,
            bots,
            mirror,
        })
    }

    pub fn stats(&self) -> ServerStats {
        self.stats
    }

    pub fn simulation(&self) -> &ServerSimulation<BrushWorld> {
        &self.sim
    }

    /// Runs for the configured duration, either as fast as possible or
    /// paced against the wall clock.
    pub fn run(&mut self) {
        let total = self.config.total_ticks();
        log::info!(
            "running {} ticks at {} Hz ({:?}, {} bots)",
            total,
            self.timestep.tick_rate(),
            self.config.scenario,
            self.bots.len()
        );

        if !self.config.realtime {
            while self.stats.ticks < total {
                self.tick();
            }
            return;
        }

        let mut last = Instant::now();
        while self.stats.ticks < total {
            let now = Instant::now();
            self.timestep.accumulate((now - last).as_secs_f32());
            last = now;

            while self.stats.ticks < total && self.timestep.consume_tick() {
                self.tick();
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn tick(&mut self) {
        let dt = self.timestep.dt_msec();
        let send_time = self.sim.level_time() + dt + self.config.command_lead_msec;

        for bot in &self.bots {
            let command = bot.command(send_time);
            self.sim.queue_command(bot.client, command);

            if let Some(mirror) = self.mirror.as_mut().filter(|m| m.client == bot.client) {
                mirror.prediction.push_command(command, self.sim.world());
                self.stats.predicted_events += mirror.prediction.take_events().len();
            }
        }

        self.stats.commands += self.sim.run_frame(dt);
        self.stats.ticks += 1;

        for event in self.sim.take_events() {
            log::debug!(
                "t={} client {}: {:?}",
                event.level_time,
                event.client,
                event.record.event
            );
            self.stats.events += 1;
        }

        if self.stats.ticks % self.config.snapshot_interval == 0 {
            self.send_snapshot();
        }
    }

    fn send_snapshot(&mut self) {
        self.stats.snapshots += 1;

        let Some(mirror) = self.mirror.as_mut() else {
            return;
        };
        let Some(slot) = self.sim.client(mirror.client) else {
            return;
        };

        let now = self.sim.level_time();
        mirror
            .prediction
            .apply_snapshot(slot.state.clone(), now, self.sim.world());

        let error = mirror.prediction.current_error(now);
        if error != Vec3::ZERO {
            self.stats.prediction_misses += 1;
            self.stats.max_prediction_error = self.stats.max_prediction_error.max(error.length());
            log::warn!("client {} mispredicted by {:.3}", mirror.client, error.length());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::Scenario;

    fn config(scenario: Scenario) -> ServerConfig {
        ServerConfig {
            duration_secs: 3.0,
            scenario,
            bots: 3,
            ..Default::default()
        }
    }

    #[test]
    fn bots_move_and_prediction_holds() {
        let mut server = GameServer::new(config(Scenario::Mixed)).unwrap();
        server.run();

        let stats = server.stats();
        assert_eq!(stats.ticks, 180);
        assert!(stats.commands >= 3 * 170);
        assert_eq!(stats.snapshots, 60);
        assert_eq!(stats.prediction_misses, 0);

        for bot in &server.bots {
            let slot = server.simulation().client(bot.client).unwrap();
            assert!((slot.state.origin - bot.spawn).length() > 32.0);
        }
    }

    #[test]
    fn stair_runners_step() {
        let mut server = GameServer::new(config(Scenario::Stairs)).unwrap();
        server.run();
        assert!(server.stats().events > 0);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = ServerConfig {
            tick_rate: 0,
            ..Default::default()
        };
        assert!(GameServer::new(bad).is_err());

        let bad = ServerConfig {
            command_lead_msec: 500,
            ..Default::default()
        };
        assert!(GameServer::new(bad).is_err());
    }
}
