use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use game_shell::config::Config;
use game_shell::render::TextRenderer;
use game_shell::store::open_store;
use game_shell::twenty48::Twenty48;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use twenty48_core::input::SwipeDetector;

#[derive(Parser, Debug)]
struct Args {
    /// Path to TOML config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for tile placement (random when omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Keep the best score in memory only
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref())?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = open_store(&cfg.twenty48.store_path, args.ephemeral)?;
    if !args.ephemeral {
        info!("best score kept in {}", cfg.twenty48.store_path.display());
    }

    let mut game = Twenty48::start(
        store,
        TextRenderer::new(io::stdout()),
        rng,
        Duration::from_millis(cfg.twenty48.notify_delay_ms),
    )?;
    let swipe = SwipeDetector::new(cfg.input.swipe_threshold);
    game.run(io::stdin().lock(), &swipe)
}
