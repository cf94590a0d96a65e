use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use game_shell::config::Config;
use game_shell::guess::{self, Difficulty, GuessGame};
use game_shell::store::open_store;
use log::info;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
struct Args {
    /// Path to TOML config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Starting difficulty; overrides the config file
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Seed for the hidden number (random when omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Keep stats in memory only
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
    let store = open_store(&cfg.guess.store_path, args.ephemeral)?;
    let difficulty = args.difficulty.unwrap_or(cfg.guess.difficulty);
    info!("starting guess game on {difficulty}");

    let mut game = GuessGame::new(store, rng, difficulty)?;
    println!("Commands: a number guesses, new, easy/medium/hard, stats, history, clear, q");
    guess::run(&mut game, io::stdin().lock(), io::stdout())
}
