#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tatooine Rescue in a terminal.

mod board_view;
mod input;
mod terminal;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use input::{PlayerCommand, HELP};
use tatooine_rescue_core::{CharacterKind, DiceFace};
use tatooine_rescue_system_session::{RollDelivery, Session, SessionConfig};
use tatooine_rescue_system_turn::Response;
use tatooine_rescue_world::query;
use terminal::{status_line, Terminal};
use tracing_subscriber::EnvFilter;

const SPIN_PREVIEWS: usize = 3;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "tatooine-rescue", version, about = "Dice-driven board game on Tatooine")]
struct Args {
    /// Session configuration file (TOML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Character to play: jedi, droid or clone.
    #[arg(long, default_value = "jedi")]
    character: CharacterKind,

    /// Seed for dice and events, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the board without ANSI colors.
    #[arg(long)]
    no_color: bool,
}

/// Entry point for the Tatooine Rescue command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut terminal = Terminal::new(config.message_log_capacity);
    let mut session = Session::new(config).context("invalid session configuration")?;

    println!("{}", query::welcome_banner(session.world()));
    describe_character(args.character);
    let _ = session.new_game(args.character, &mut terminal);
    redraw(&session, &terminal, !args.no_color);

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match line.parse::<PlayerCommand>() {
            Ok(PlayerCommand::Quit) => break,
            Ok(command) => play(command, &mut session, &mut terminal, !args.no_color)?,
            Err(error) => println!("{error}"),
        }
        prompt()?;
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    SessionConfig::from_toml_str(&contents)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn play(
    command: PlayerCommand,
    session: &mut Session,
    terminal: &mut Terminal,
    color: bool,
) -> Result<()> {
    let changed = match command {
        PlayerCommand::Roll => roll(session, terminal)?,
        PlayerCommand::Special => session.use_special_ability(terminal) == Response::Accepted,
        PlayerCommand::Select(coord) => {
            let response = session.select_tile(coord, terminal);
            if response == Response::Ignored {
                println!("{coord} is not a highlighted tile.");
            }
            response == Response::Accepted
        }
        PlayerCommand::NewGame(kind) => {
            terminal.reset();
            describe_character(kind);
            let _ = session.new_game(kind, terminal);
            true
        }
        PlayerCommand::Board => true,
        PlayerCommand::Status => {
            match terminal.hud().stats() {
                Some(stats) => println!("{}", status_line(stats)),
                None => println!("No character in play."),
            }
            false
        }
        PlayerCommand::Help => {
            println!("{HELP}");
            false
        }
        PlayerCommand::Quit => false,
    };

    // The terminal has no animation to wait for.
    session.advance(Duration::MAX, terminal);
    if changed {
        redraw(session, terminal, color);
    }
    Ok(())
}

fn roll(session: &mut Session, terminal: &mut Terminal) -> Result<bool> {
    if !session.can_roll() {
        println!("You cannot roll right now.");
        return Ok(false);
    }
    session.begin_roll()?;
    let previews: Vec<&str> = (0..SPIN_PREVIEWS)
        .filter_map(|_| session.spin())
        .map(DiceFace::symbol)
        .collect();
    println!("Rolling... {}", previews.join(" "));

    let delivery = session.settle_roll(terminal)?;
    println!("The die shows {}", delivery.face().symbol());
    Ok(matches!(delivery, RollDelivery::Delivered(_)))
}

fn describe_character(kind: CharacterKind) {
    println!(
        "You play the {} ({}).",
        kind.label(),
        kind.ability().description()
    );
}

fn redraw(session: &Session, terminal: &Terminal, color: bool) {
    println!(
        "{}",
        board_view::render(query::board(session.world()), terminal.hud(), color)
    );
    if let Some(stats) = terminal.hud().stats() {
        println!("{}", status_line(stats));
    }
}

fn prompt() -> Result<()> {
    print!("tatooine> ");
    io::stdout().flush().context("failed to flush stdout")
}
