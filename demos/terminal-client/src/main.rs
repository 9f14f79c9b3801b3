//! Terminal client for a minesync room.
//!
//! ```text
//! terminal-client http://localhost:8080/room/GameRoom --name Alice --color '#00ff00'
//! ```
//!
//! Commands, one per line: `r X Y` reveals a tile, `f X Y` flags one,
//! `m X Y` moves your cursor, `reset` starts a new game after it ended,
//! `quit` leaves. Tiles are numbered from 0 at the top left.

mod cli;
mod sink;

use clap::Parser;
use minesync::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::sink::TerminalSink;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Reveal(i64, i64),
    Flag(i64, i64),
    Move(i64, i64),
    Reset,
    Quit,
    Help,
}

const HELP: &str = "commands: r X Y | f X Y | m X Y | reset | quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Help);
    };
    let mut tile = || -> Result<(i64, i64), String> {
        let mut coord = |axis: &str| {
            words
                .next()
                .ok_or_else(|| format!("missing {axis}"))?
                .parse::<i64>()
                .map_err(|_| format!("{axis} must be a whole number"))
        };
        Ok((coord("X")?, coord("Y")?))
    };
    match verb {
        "r" | "reveal" => tile().map(|(x, y)| Command::Reveal(x, y)),
        "f" | "flag" => tile().map(|(x, y)| Command::Flag(x, y)),
        "m" | "move" => tile().map(|(x, y)| Command::Move(x, y)),
        "reset" => Ok(Command::Reset),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "h" | "help" | "?" => Ok(Command::Help),
        other => Err(format!("unknown command `{other}`")),
    }
}

/// Page coordinate of a tile's center; one tile is one character cell.
fn center(n: i64) -> f64 {
    n as f64 + 0.5
}

/// Feeds stdin commands into the client until `quit` or end of input.
async fn read_commands(input: InputHandle, quit: oneshot::Sender<()>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{HELP}");
    while let Ok(Some(line)) = lines.next_line().await {
        let delivered = match parse_command(&line) {
            Ok(Command::Reveal(x, y)) => input.click(center(x), center(y)),
            Ok(Command::Flag(x, y)) => input.context_click(center(x), center(y)),
            Ok(Command::Move(x, y)) => input.pointer_moved(center(x), center(y)),
            Ok(Command::Reset) => input.reset_clicked(),
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                eprintln!("{HELP}");
                true
            }
            Err(msg) => {
                eprintln!("{msg}; {HELP}");
                true
            }
        };
        if !delivered {
            break;
        }
    }
    if quit.send(()).is_err() {
        debug!("client already stopped");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    minesync::logging::init(&config.log_filter)?;

    let mut prefs = PreferencesFile::load(&cli.prefs)?;
    if cli.forget {
        prefs.clear_identity()?;
        eprintln!("forgot the saved identity in {}", prefs.path().display());
        return Ok(());
    }
    if let Some(volume) = cli.volume {
        prefs.set_volume(volume)?;
    }

    let provided = match (cli.name, cli.color) {
        (Some(name), Some(color)) => Some(Identity::new(name, color)?),
        (None, None) => None,
        _ => return Err("--name and --color must be given together".into()),
    };
    let identity = resolve_identity(&mut prefs, provided)?;

    let Some(page) = cli.page else {
        return Err("a room page address is required".into());
    };

    let mut client = Client::connect(&page, identity, TerminalSink::default(), config)
        .await?
        .with_volume(prefs.volume());
    let (quit_tx, quit_rx) = oneshot::channel();
    tokio::spawn(read_commands(client.input(), quit_tx));

    tokio::select! {
        result = client.run() => result?,
        _ = quit_rx => info!("leaving the room"),
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }
    Ok(())
}
