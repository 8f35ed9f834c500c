use anyhow::{Result, bail};

use pmove::ThinkSettings;
use pmove::player::MAX_CLIENTS;

use crate::bots::Scenario;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub tick_rate: u32,
    pub duration_secs: f32,
    pub scenario: Scenario,
    pub bots: usize,
    pub think: ThinkSettings,
    /// How far ahead of the level clock bots stamp their commands, standing
    /// in for network latency.
    pub command_lead_msec: i32,
    /// Ticks between authoritative states sent to the prediction mirror.
    pub snapshot_interval: u64,
    pub realtime: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            duration_secs: 10.0,
            scenario: Scenario::Mixed,
            bots: 4,
            think: ThinkSettings::default(),
            command_lead_msec: 50,
            snapshot_interval: 3,
            realtime: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 || self.tick_rate > 1000 {
            bail!("tick rate must be between 1 and 1000, got {}", self.tick_rate);
        }
        if self.bots == 0 || self.bots > MAX_CLIENTS {
            bail!("bot count must be between 1 and {MAX_CLIENTS}, got {}", self.bots);
        }
        if self.command_lead_msec < 0 || self.command_lead_msec >= self.think.max_lead_msec {
            bail!(
                "command lead of {} ms is outside 0..{}",
                self.command_lead_msec,
                self.think.max_lead_msec
            );
        }
        if self.snapshot_interval == 0 {
            bail!("snapshot interval must be at least one tick");
        }
        Ok(())
    }

    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs.max(0.0) * self.tick_rate as f32) as u64
    }
}
