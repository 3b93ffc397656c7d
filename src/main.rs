//! Behula: an endless side-scrolling runner
//!
//! Parallax background layers, randomly spawned obstacles and a runner that
//! can jump or crouch. Hitting an obstacle ends the run; clearing one scores.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod chance;
mod collision;
mod config;
mod error;
mod game;
mod geometry;
mod hud;
mod obstacles;
mod player;
mod render;
mod scroller;
#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;
use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use assets::{TextureCache, ASSETS_DIR};
use config::RunnerConfig;
use game::{FrameInput, FrameOutcome, Game};
use hud::{FpsReadout, ScoreReadout};
use render::ScreenCanvas;

#[derive(Parser, Debug)]
#[command(name = "behula", version, about = "Endless side-scrolling runner")]
struct Args {
    /// RON file overriding the built-in tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for obstacle spawning and tile selection
    #[arg(long)]
    seed: Option<u64>,

    /// Directory sprite paths are resolved against
    #[arg(long, default_value = ASSETS_DIR)]
    assets: PathBuf,

    /// Draw hitbox outlines and the debug readout (always on in debug builds)
    #[arg(long)]
    hitboxes: bool,

    /// Print the effective config as RON and exit
    #[arg(long)]
    print_config: bool,
}

fn window_conf() -> Conf {
    let screen = RunnerConfig::default().screen;
    Conf {
        window_title: format!("Behula v{}", VERSION),
        window_width: screen.width as i32,
        window_height: screen.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn now() -> Duration {
    Duration::from_secs_f64(get_time())
}

fn sample_input() -> FrameInput {
    FrameInput {
        jump: is_key_pressed(KeyCode::W) || is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Up),
        crouch: is_key_pressed(KeyCode::S) || is_key_pressed(KeyCode::Down),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => RunnerConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    if args.print_config {
        println!("{}", config.to_ron().context("serializing config")?);
        return Ok(());
    }

    let seed = args.seed.or(config.seed).unwrap_or_else(::rand::random);
    log::info!("seed {} (pass --seed {} to replay this run)", seed, seed);

    let mut textures = TextureCache::with_dir(&args.assets);
    let mut game = Game::new(&config, &mut textures, ChaCha8Rng::seed_from_u64(seed), now())
        .with_context(|| format!("setting up scene from {}", args.assets.display()))?;
    log::info!(
        "{} textures loaded, player running on y = {}",
        textures.len(),
        game.player().position_y()
    );
    let debug = args.hitboxes || cfg!(debug_assertions);
    game.set_show_hitboxes(debug);

    let mut canvas = ScreenCanvas::default();
    let mut fps = FpsReadout::new();
    let mut score = ScoreReadout::new();

    loop {
        let frame_start = get_time();
        clear_background(BLACK);

        if is_key_pressed(KeyCode::Escape) {
            log::info!("quit: {}", game.summary());
            return Ok(());
        }

        if game.is_over() {
            // Hold the final score on screen until dismissed
            hud::draw_game_over(game.score());
            if is_key_pressed(KeyCode::Enter) {
                return Ok(());
            }
        } else {
            let outcome = game.advance(now(), sample_input(), &mut canvas);

            let frame_time = Duration::from_secs_f64((get_time() - frame_start).max(0.0));
            let fps_text = fps.update(now(), frame_time).to_owned();
            hud::draw_hud(&fps_text, score.update(game.score()));
            if debug {
                hud::draw_debug(&hud::debug_text(&game));
            }

            if outcome == FrameOutcome::GameOver {
                println!("Game over: {}", game.summary());
            }
        }

        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    if let Err(e) = env_logger::try_init() {
        eprintln!("Warning: logger already initialised: {}", e);
    }

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
