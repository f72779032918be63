//! Check command - load and validate a setup file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use backgammon_core::{Color, Setup};

#[derive(Args)]
pub struct CheckArgs {
    /// Setup JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let setup = Setup::load(&args.file)?;
    let board = setup
        .to_board()
        .with_context(|| format!("Invalid position in {}", args.file.display()))?;

    tracing::info!("Loaded setup '{}' from {}", setup.name, args.file.display());

    println!("{}: ok", setup.name);
    println!("to move: {:?}", setup.to_move);
    for color in [Color::White, Color::Black] {
        println!(
            "{:?}: pips {}, bar {}, off {}",
            color,
            board.pip_count(color),
            board.bar(color),
            board.born_off(color)
        );
    }

    Ok(())
}
