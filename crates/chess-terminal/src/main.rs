//! chess-terminal - play chess in the terminal.
//!
//! Exit status is 0 once a result has been printed, 1 for configuration or
//! engine failures, 2 for usage errors and 130 when the input is closed at a
//! prompt.

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use shakmaty::Color;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use chess_terminal::config::{Config, DEFAULT_CONFIG_PATH};
use chess_terminal::pgn::{self, GameRecord, PGN_DIR};
use chess_terminal::{OpponentMode, RenderMode, Session, SessionError, SessionOptions};
use uci_client::{UciClient, UciError};

/// Play chess in the terminal against a person or a UCI engine.
#[derive(Parser, Debug)]
#[command(name = "chess-terminal")]
#[command(about = "Play chess in the terminal")]
struct Cli {
    /// Side to play against the engine
    #[arg(short, long, value_enum, default_value = "white", ignore_case = true)]
    side: Side,

    /// Use another config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw the board without colors
    #[arg(short, long)]
    no_color: bool,

    /// Save the game as PGN
    #[arg(short, long)]
    pgn: bool,

    /// Engine thinking time per move in milliseconds
    #[arg(short, long, default_value = "2000")]
    time: u64,

    /// Keep black pieces lowercase on the colored board
    #[arg(short = 'S', long)]
    small: bool,

    /// Play against the engine (-o) or let it play itself (-oo)
    #[arg(short, long, action = ArgAction::Count)]
    opponent: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    #[value(alias = "w")]
    White,
    #[value(alias = "b")]
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

impl Cli {
    fn opponent_mode(&self) -> Option<OpponentMode> {
        OpponentMode::from_count(self.opponent, self.side.into())
    }

    fn render_mode(&self) -> RenderMode {
        if self.no_color {
            RenderMode::Plain
        } else {
            RenderMode::Colored {
                compact: self.small,
            }
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let Some(mode) = cli.opponent_mode() else {
        Cli::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                "--opponent can be given at most twice",
            )
            .exit();
    };

    match run(&cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(SessionError::Cancelled) = err.downcast_ref::<SessionError>() {
                println!("\nExited\n");
                return ExitCode::from(130);
            }
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, mode: OpponentMode) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_create(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    tracing::info!(?mode, config = %config.source.display(), "starting session");

    let engine = if mode.needs_engine() {
        Some(start_engine(&config)?)
    } else {
        None
    };

    let options = SessionOptions {
        mode,
        think_time: Duration::from_millis(cli.time),
        render_mode: cli.render_mode(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(options, &config.display, stdin.lock(), stdout.lock(), engine);
    let result = session.run()?;
    let (game, _, _) = session.into_parts();

    if cli.pgn {
        let record = GameRecord::new(&game, mode, result);
        match pgn::save_to_dir(Path::new(PGN_DIR), &record) {
            Ok(path) => println!("PGN saved to {}", path.display()),
            Err(e) => {
                tracing::warn!("Failed to save PGN: {}", e);
                eprintln!("Failed to save PGN: {}", e);
            }
        }
    }

    Ok(())
}

/// Spawns the configured engine and runs the handshake.
fn start_engine(config: &Config) -> anyhow::Result<UciClient> {
    let path = config.require_engine()?;

    println!("ENGINE");
    let mut client = UciClient::spawn(path)?;
    let id = client
        .init()
        .with_context(|| format!("Engine handshake failed for {}", path.display()))?;

    println!("\nEngine:");
    println!("{}", id.name);
    println!("{}", id.author);

    if !client.is_alive() {
        return Err(UciError::NotAlive.into());
    }
    Ok(client)
}
