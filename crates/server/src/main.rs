mod bots;
mod config;
mod server;

use anyhow::{Result, ensure};
use clap::Parser;

use bots::Scenario;
use config::ServerConfig;
use pmove::ThinkSettings;
use server::GameServer;

#[derive(Parser)]
#[command(name = "pmove-server")]
#[command(about = "Headless movement server driven by scripted bots")]
struct Args {
    #[arg(short, long, default_value_t = 60)]
    tick_rate: u32,

    #[arg(short, long, default_value_t = 10.0, help = "Seconds of level time to simulate")]
    duration: f32,

    #[arg(short, long, value_enum, default_value_t = Scenario::Mixed)]
    scenario: Scenario,

    #[arg(short, long, default_value_t = 4)]
    bots: usize,

    #[arg(long, default_value_t = 800)]
    gravity: i32,

    #[arg(long, default_value_t = 320)]
    speed: i32,

    #[arg(long, default_value_t = 50, help = "Client clock lead over the server in ms")]
    lead: i32,

    #[arg(long, help = "Pace ticks against the wall clock")]
    realtime: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig {
        tick_rate: args.tick_rate,
        duration_secs: args.duration,
        scenario: args.scenario,
        bots: args.bots,
        think: ThinkSettings {
            gravity: args.gravity,
            speed: args.speed,
            ..Default::default()
        },
        command_lead_msec: args.lead,
        realtime: args.realtime,
        ..Default::default()
    };

    let mut server = GameServer::new(config)?;
    server.run();

    let stats = server.stats();
    log::info!(
        "{} ticks, {} commands, {} events ({} predicted), {} snapshots",
        stats.ticks,
        stats.commands,
        stats.events,
        stats.predicted_events,
        stats.snapshots
    );
    for slot in server.simulation().connected() {
        log::info!(
            "client {} at {:?} moving {:.1} u/s",
            slot.state.client_num,
            slot.state.origin,
            slot.state.horizontal_speed()
        );
    }

    ensure!(
        stats.prediction_misses == 0,
        "{} prediction misses, worst {:.3}",
        stats.prediction_misses,
        stats.max_prediction_error
    );
    Ok(())
}
