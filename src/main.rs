//! Catch the Pac-Man entry point
//!
//! Headless driver: a ticker thread advances the simulation at a fixed
//! rate while the main thread turns stdin lines into requests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use clap::Parser;

use pac_catch::console::{self, Command, HELP};
use pac_catch::persistence::{load_high_scores, load_level};
use pac_catch::sim::{GamePhase, Simulation};
use pac_catch::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to settings JSON
    #[arg(long, default_value = "pac-catch.json")]
    settings: PathBuf,

    /// Directory with levels/, saves/ and highscores/ (overrides settings)
    #[arg(long)]
    asset_root: Option<PathBuf>,

    /// Skip the title screen and start this level
    #[arg(long)]
    level: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load(&args.settings)
        .with_context(|| format!("loading {}", args.settings.display()))?;
    if let Some(root) = args.asset_root {
        settings.asset_root = root;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();
    log::info!("Catch the Pac-Man starting...");

    let sim = Arc::new(Simulation::new(
        settings.arena(),
        settings.asset_paths(),
        load_high_scores,
    ));

    if let Some(level) = args.level {
        sim.request_load_level_number(level, load_level)
            .with_context(|| format!("starting level {level}"))?;
    }

    let running = Arc::new(AtomicBool::new(true));
    let ticker = {
        let sim = Arc::clone(&sim);
        let running = Arc::clone(&running);
        let interval = settings.tick_interval();
        thread::spawn(move || {
            let mut last_phase = sim.game_status().phase;
            while running.load(Ordering::Relaxed) {
                let report = sim.update();
                if report.phase != last_phase {
                    // Announce the end of a run without waiting for input
                    match report.phase {
                        GamePhase::GameOver | GamePhase::EnteringHighScore => {
                            println!("{}", console::render_status(&sim));
                        }
                        _ => {}
                    }
                    last_phase = report.phase;
                }
                thread::sleep(interval);
            }
        })
    };

    println!("{}", console::render_status(&sim));
    println!("{HELP}");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match console::execute(&sim, &command) {
            Ok(output) => println!("{output}"),
            Err(e) => println!("Error: {e}"),
        }
        io::stdout().flush().ok();
        if command == Command::Quit {
            break;
        }
    }

    running.store(false, Ordering::Relaxed);
    if ticker.join().is_err() {
        log::error!("Ticker thread panicked");
    }
    log::info!("Game finished.");
    Ok(())
}
