//! New command - print the opening position

use anyhow::{Context, Result};
use clap::Args;

use backgammon_core::{Color, Game, GameConfig, Snapshot};

#[derive(Args)]
pub struct NewArgs {
    /// Who rolls first
    #[arg(long, value_enum, default_value = "white")]
    pub first: Side,

    /// Output the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Side {
    White,
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

pub fn run(args: NewArgs) -> Result<()> {
    let config = GameConfig::default().with_starting_player(args.first.into());
    let game = Game::new(config).context("Failed to create game")?;
    let snapshot = game.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render(&snapshot));
    }

    Ok(())
}

/// Plain-text board listing, one line per occupied point
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for (i, &n) in snapshot.points.iter().enumerate() {
        if n == 0 {
            continue;
        }
        let owner = if n > 0 { "White" } else { "Black" };
        out.push_str(&format!("{:>3}: {} x{}\n", i + 1, owner, n.unsigned_abs()));
    }

    out.push_str(&format!(
        "bar: White {} / Black {}\n",
        snapshot.bar.white, snapshot.bar.black
    ));
    out.push_str(&format!(
        "off: White {} / Black {}\n",
        snapshot.born_off.white, snapshot.born_off.black
    ));
    out.push_str(&format!(
        "{:?} to play ({:?})\n",
        snapshot.current_player, snapshot.phase
    ));

    out
}
