//! Concentration autoplay - headless game driver.
//!
//! Deals a board, lets the memory player clear it, and prints the result.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use concentration::autoplay::play_to_completion;
use concentration::board::Vec2;
use concentration::session::{MemoryStore, NavAction};
use concentration::{
    BoardSnapshot, GameContext, GameOverScreen, GridLayout, MatchArbiter, MatchConfig,
    MemoryPlayer, PlayReport, Scene, ScoreLabel, Session,
};

/// Play a game of concentration without a human.
#[derive(Parser, Debug)]
#[command(name = "autoplay", version, about)]
struct Cli {
    /// TOML match configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board columns (values below 1 are clamped)
    #[arg(long, allow_hyphen_values = true)]
    columns: Option<i32>,

    /// Board rows (values below 1 are clamped)
    #[arg(long, allow_hyphen_values = true)]
    rows: Option<i32>,

    /// Seed for dealing the board
    #[arg(long)]
    seed: Option<u64>,

    /// Seed for the player's exploration choices
    #[arg(long, default_value_t = 7)]
    player_seed: u64,

    /// Show every card for this long before play starts
    #[arg(long)]
    preview_ms: Option<u64>,

    /// Simulated frame length
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    /// Give up after this many frames
    #[arg(long, default_value_t = 100_000)]
    max_steps: u32,

    /// Print the report and final board as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    report: &'a PlayReport,
    scene: Scene,
    board: &'a BoardSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("loading match config from {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(ms) = cli.preview_ms {
        config.preview_ms = ms;
    }
    if cli.step_ms == 0 {
        bail!("--step-ms must be at least 1");
    }

    let session = Rc::new(RefCell::new(Session::new(MemoryStore::new())));
    let label = Rc::new(RefCell::new(ScoreLabel::new()));
    let layout = Rc::new(RefCell::new(GridLayout::new(Vec2::new(1280.0, 720.0))));

    let context = GameContext::new()
        .with_layout(Rc::clone(&layout))
        .with_audio(Rc::clone(&session))
        .with_score_display(Rc::clone(&label))
        .with_session(Rc::clone(&session));

    session.borrow_mut().navigate(NavAction::PlayGame);

    let mut arbiter = MatchArbiter::new(config, context);
    if cli.columns.is_some() || cli.rows.is_some() {
        let config = arbiter.config();
        let columns = cli.columns.unwrap_or(i32::from(config.columns));
        let rows = cli.rows.unwrap_or(i32::from(config.rows));
        arbiter.configure_board(columns, rows);
    }

    let dims = arbiter.dimensions();
    if arbiter.cards().is_empty() {
        bail!("a {}x{} board holds no pairs", dims.columns(), dims.rows());
    }
    info!(
        columns = dims.columns(),
        rows = dims.rows(),
        cell = ?layout.borrow().cell_size(),
        "starting autoplay"
    );

    let mut player = MemoryPlayer::new(cli.player_seed);
    let report = play_to_completion(
        &mut arbiter,
        &mut player,
        Duration::from_millis(cli.step_ms),
        cli.max_steps,
    );
    if !report.finished {
        warn!(steps = report.steps, "gave up before clearing the board");
    }

    let board = arbiter.snapshot();
    let scene = session.borrow().scene();

    if cli.json {
        let output = Output {
            report: &report,
            scene,
            board: &board,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Board:   {}x{} ({} pairs)", dims.columns(), dims.rows(), dims.pair_count());
    println!("Flips:   {}", report.flips);
    println!("Time:    {:.1}s", report.elapsed_ms as f64 / 1000.0);
    println!("{}", label.borrow().text());
    if scene == Scene::GameOver {
        let screen = GameOverScreen::from_session(&session.borrow());
        println!("{}", screen.final_score_text());
    } else {
        println!("Matched: {}/{}", board.matched_count() / 2, dims.pair_count());
    }

    Ok(())
}
