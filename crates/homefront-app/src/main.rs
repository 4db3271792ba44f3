use std::fs;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use homefront_app::cli::Cli;
use homefront_app::game_loop::spawn_game_loop;
use homefront_app::logging;
use homefront_app::state::LoopSettings;
use homefront_core::state::GameStateSnapshot;
use homefront_sim::engine::SimulationEngine;
use homefront_sim::map::GridMap;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let map = match &cli.layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading layout {}", path.display()))?;
            GridMap::parse(&text).with_context(|| format!("parsing layout {}", path.display()))?
        }
        None => GridMap::campaign(),
    };

    let config = cli.sim_config();
    info!(
        "starting seed={} tick_rate={} levels={}",
        config.seed,
        config.tick_rate,
        map.levels().len()
    );
    let mut engine = SimulationEngine::new(config, map);
    engine.start(cli.width, cli.height);

    let settings = LoopSettings {
        tick_duration: if cli.realtime {
            LoopSettings::realtime(config.tick_rate)
        } else {
            None
        },
        max_ticks: cli.ticks,
        autopilot: cli.autopilot,
        ..Default::default()
    };

    let observer: Option<Box<dyn FnMut(&GameStateSnapshot) + Send>> = if cli.trace {
        Some(Box::new(|snapshot| {
            if let Ok(line) = serde_json::to_string(snapshot) {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
        }))
    } else {
        None
    };

    let handle = spawn_game_loop(engine, settings, observer).context("spawning game loop")?;
    let last = handle
        .join()
        .ok_or_else(|| anyhow!("game loop produced no snapshot"))?;
    info!(
        "finished at tick {} with status {:?}, score {}",
        last.time.tick, last.status, last.hud.score
    );
    if !cli.trace {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    Ok(())
}
