use clap::{Parser, ValueEnum};
use sapper_core::*;
use std::io::{self, BufRead, Write};

use crate::command::Command;

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Play minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board to start from, individual sizes below take precedence
    #[arg(short, long, value_enum, default_value_t = Preset::Beginner)]
    preset: Preset,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Result<GameConfig> {
        let preset = self.preset.config();
        GameConfig::new(
            (
                self.width.unwrap_or(preset.size.0),
                self.height.unwrap_or(preset.size.1),
            ),
            self.mines.unwrap_or(preset.mines),
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.config()?;
    let generator = match args.seed {
        Some(seed) => RandomMineGenerator::new(seed),
        None => RandomMineGenerator::default(),
    };
    log::info!("seed: {}", generator.seed());

    let mut engine = BoardEngine::with_generator(config, generator);
    let mut out = io::stdout().lock();
    writeln!(out, "{}", command::HELP)?;
    render::write_board(&mut out, &engine)?;

    for line in io::stdin().lock().lines() {
        let command = match line?.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{}", command::HELP)?;
                continue;
            }
            _ => {}
        }

        match command::apply(&mut engine, command) {
            Ok(outcome) if outcome.has_update() => render::write_board(&mut out, &engine)?,
            Ok(_) => writeln!(out, "Nothing to do there")?,
            Err(err) => writeln!(out, "{err}")?,
        }
    }

    Ok(())
}
