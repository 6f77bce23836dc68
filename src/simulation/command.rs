//! Input commands delivered to a simulation

use crate::game_of_life::CellId;
use std::str::FromStr;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Sending half of a simulation's input channel
pub type CommandSender = Sender<Command>;

/// One user action against the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Paint or erase a batch of cells
    SetCells { ids: Vec<CellId>, alive: bool },
    /// Flip one cell
    ToggleCell { id: CellId },
    /// Start if stopped, stop if running
    ToggleRun,
    Start,
    Stop,
    /// Stop and advance a single generation
    Step,
    /// Stop and kill every cell
    Clear,
    Faster,
    Slower,
    SetSpeed { index: usize },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument { command: String, expected: &'static str },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

fn parse_number(token: &str) -> Result<usize, ParseCommandError> {
    token
        .parse()
        .map_err(|_| ParseCommandError::InvalidNumber(token.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Parse a whitespace-separated command line, e.g. `step`, `speed 3`, `on 12 13 14`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let name = tokens.next().ok_or(ParseCommandError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        let missing = |expected| ParseCommandError::MissingArgument {
            command: name.to_string(),
            expected,
        };

        match name.to_ascii_lowercase().as_str() {
            "p" | "play" | "pause" => Ok(Command::ToggleRun),
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "s" | "step" => Ok(Command::Step),
            "c" | "clear" => Ok(Command::Clear),
            "+" | "faster" => Ok(Command::Faster),
            "-" | "slower" => Ok(Command::Slower),
            "q" | "quit" => Ok(Command::Quit),
            "speed" => {
                let index = args.first().ok_or_else(|| missing("a speed index"))?;
                Ok(Command::SetSpeed {
                    index: parse_number(index)?,
                })
            }
            "t" | "toggle" => {
                let id = args.first().ok_or_else(|| missing("a cell id"))?;
                Ok(Command::ToggleCell { id: parse_number(id)? })
            }
            "on" | "off" => {
                if args.is_empty() {
                    return Err(missing("one or more cell ids"));
                }
                let ids = args
                    .iter()
                    .map(|token| parse_number(token))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Command::SetCells {
                    ids,
                    alive: name.eq_ignore_ascii_case("on"),
                })
            }
            _ => Err(ParseCommandError::Unknown(name.to_string())),
        }
    }
}
