use core::str::FromStr;
use sapper_core::{BoardEngine, Coord, Coord2, MineGenerator, MoveOutcome};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  r X Y   reveal a cell
  f X Y   toggle a flag
  c X Y   chord on an open number
  n       new game
  h       show this help
  q       quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    NewGame,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command, type h for help")]
    Empty,
    #[error("Unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("Expected two coordinates after {0:?}")]
    MissingCoords(String),
    #[error("Invalid coordinate {0:?}")]
    InvalidCoord(String),
    #[error("Unexpected input after the command: {0:?}")]
    TrailingInput(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name {
            "r" | "reveal" => Self::Reveal(parse_coords(name, &mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(name, &mut words)?),
            "c" | "chord" => Self::Chord(parse_coords(name, &mut words)?),
            "n" | "new" => Self::NewGame,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(
    name: &str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Coord2, CommandError> {
    let mut next_coord = || -> Result<Coord, CommandError> {
        let word = words
            .next()
            .ok_or_else(|| CommandError::MissingCoords(name.to_owned()))?;
        word.parse()
            .map_err(|_| CommandError::InvalidCoord(word.to_owned()))
    };
    let x = next_coord()?;
    let y = next_coord()?;
    Ok((x, y))
}

/// Runs a board command, `Help` and `Quit` are left to the caller.
pub fn apply<G: MineGenerator>(
    engine: &mut BoardEngine<G>,
    command: Command,
) -> sapper_core::Result<MoveOutcome> {
    match command {
        Command::Reveal(coords) => engine.reveal(coords),
        Command::Flag(coords) => engine.toggle_flag(coords),
        Command::Chord(coords) => engine.auto_expand(coords),
        Command::NewGame => {
            engine.reset(engine.config());
            Ok(MoveOutcome::Changed)
        }
        Command::Help | Command::Quit => Ok(MoveOutcome::NoChange),
    }
}
