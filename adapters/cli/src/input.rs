use std::{error::Error, fmt, num::ParseIntError, str::FromStr};

use tatooine_rescue_core::{BoardCoord, CharacterKind, UnknownCharacterKind};

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerCommand {
    /// Roll the action die.
    Roll,
    /// Invoke the character's special ability.
    Special,
    /// Pick a highlighted tile.
    Select(BoardCoord),
    /// Redraw the board.
    Board,
    /// Show character stats.
    Status,
    /// Start over with the provided archetype.
    NewGame(CharacterKind),
    /// List the commands.
    Help,
    /// Leave the game.
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  roll | r            roll the action die
  special | s         use your special ability
  select X Z | m X Z | X Z
                      pick a highlighted tile
  board | b           redraw the board
  status              show your stats
  new jedi|droid|clone start a new game
  help | ?            show this list
  quit | q            leave";

impl FromStr for PlayerCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(InputError::Empty);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "roll" | "r" => Self::Roll,
            "special" | "s" => Self::Special,
            "board" | "b" => Self::Board,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "select" | "m" => return parse_coord(&rest).map(Self::Select),
            "new" => {
                let name = rest.first().ok_or(InputError::MissingCharacter)?;
                return name
                    .parse()
                    .map(Self::NewGame)
                    .map_err(InputError::UnknownCharacter);
            }
            _ if head.chars().all(|c| c.is_ascii_digit()) => {
                let mut all = vec![head];
                all.extend(rest.iter().copied());
                return parse_coord(&all).map(Self::Select);
            }
            other => return Err(InputError::UnknownCommand(other.to_owned())),
        };

        if rest.is_empty() {
            Ok(command)
        } else {
            Err(InputError::UnexpectedArguments)
        }
    }
}

fn parse_coord(words: &[&str]) -> Result<BoardCoord, InputError> {
    match words {
        [x, z] => {
            let x = x.parse().map_err(InputError::InvalidCoordinate)?;
            let z = z.parse().map_err(InputError::InvalidCoordinate)?;
            Ok(BoardCoord::new(x, z))
        }
        _ => Err(InputError::MissingCoordinate),
    }
}

/// Errors that can occur while reading a command line.
#[derive(Debug)]
pub(crate) enum InputError {
    /// The line held no words.
    Empty,
    /// The first word is not a command.
    UnknownCommand(String),
    /// A command that takes no arguments received some.
    UnexpectedArguments,
    /// `select` was not followed by exactly two numbers.
    MissingCoordinate,
    /// A coordinate was not a non-negative integer.
    InvalidCoordinate(ParseIntError),
    /// `new` was not followed by an archetype.
    MissingCharacter,
    /// `new` named an unknown archetype.
    UnknownCharacter(UnknownCharacterKind),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "type a command, or `help`"),
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`"),
            Self::UnexpectedArguments => write!(f, "that command takes no arguments"),
            Self::MissingCoordinate => write!(f, "expected a tile as `X Z`"),
            Self::InvalidCoordinate(error) => write!(f, "invalid tile coordinate: {error}"),
            Self::MissingCharacter => write!(f, "expected jedi, droid or clone"),
            Self::UnknownCharacter(error) => write!(f, "{error}"),
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCoordinate(error) => Some(error),
            Self::UnknownCharacter(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_form() {
        assert_eq!("roll".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Roll));
        assert_eq!(" R ".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Roll));
        assert_eq!("s".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Special));
        assert_eq!(
            "select 2 5".parse::<PlayerCommand>().ok(),
            Some(PlayerCommand::Select(BoardCoord::new(2, 5)))
        );
        assert_eq!(
            "0 0".parse::<PlayerCommand>().ok(),
            Some(PlayerCommand::Select(BoardCoord::new(0, 0)))
        );
        assert_eq!(
            "new Droid".parse::<PlayerCommand>().ok(),
            Some(PlayerCommand::NewGame(CharacterKind::Droid))
        );
        assert_eq!("q".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Quit));
    }

    #[test]
    fn help_lists_every_alias() {
        for alias in ["roll | r", "special | s", "m X Z", "board | b", "help | ?", "quit | q"] {
            assert!(HELP.contains(alias), "help is missing `{alias}`");
        }
        assert_eq!(
            "m 3 4".parse::<PlayerCommand>().ok(),
            Some(PlayerCommand::Select(BoardCoord::new(3, 4)))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!("".parse::<PlayerCommand>(), Err(InputError::Empty)));
        assert!(matches!(
            "fly".parse::<PlayerCommand>(),
            Err(InputError::UnknownCommand(word)) if word == "fly"
        ));
        assert!(matches!(
            "roll twice".parse::<PlayerCommand>(),
            Err(InputError::UnexpectedArguments)
        ));
        assert!(matches!(
            "select 1".parse::<PlayerCommand>(),
            Err(InputError::MissingCoordinate)
        ));
        assert!(matches!(
            "select 1 -2".parse::<PlayerCommand>(),
            Err(InputError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            "new sith".parse::<PlayerCommand>(),
            Err(InputError::UnknownCharacter(_))
        ));
    }
}
