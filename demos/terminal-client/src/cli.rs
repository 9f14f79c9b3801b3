use std::path::PathBuf;

use clap::Parser;
use minesync::prelude::Url;

/// Command-line arguments for the terminal client.
#[derive(Parser, Debug)]
#[command(name = "minesync-terminal")]
#[command(about = "Play a shared minesweeper room from the terminal")]
pub struct Cli {
    /// Room page address, e.g. http://localhost:8080/room/GameRoom
    pub page: Option<Url>,

    /// Display name to register with (saved for next time)
    #[arg(short, long, env = "MINESYNC_NAME")]
    pub name: Option<String>,

    /// Cursor color, a CSS name or #rgb / #rrggbb (saved for next time)
    #[arg(short, long, env = "MINESYNC_COLOR")]
    pub color: Option<String>,

    /// Preferences file holding the saved identity and volume
    #[arg(long, env = "MINESYNC_PREFS", default_value = "minesync-prefs.json")]
    pub prefs: PathBuf,

    /// Optional JSON client config (timer periods, log filter)
    #[arg(long, env = "MINESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Explosion volume between 0 and 1 (saved for next time)
    #[arg(long)]
    pub volume: Option<f32>,

    /// Forget the saved identity and exit
    #[arg(long)]
    pub forget: bool,
}
