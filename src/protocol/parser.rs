//! Judge command parser.
//!
//! Turns one line of judge input into a [`Command`]. Coordinates are kept
//! raw; the engine wraps them onto the map once the dimensions are known.

use thiserror::Error;

/// Errors produced while parsing a judge line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,

    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}

/// A parsed judge-to-bot line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start of turn `n`; turn 0 carries the game settings.
    Turn(u32),

    /// A `key value` settings line. Keys are not validated here.
    Setting { key: String, value: i64 },

    /// End of the settings block; the bot must answer `go`.
    Ready,

    Water { row: i64, col: i64 },
    Food { row: i64, col: i64 },
    /// Food that was at this cell is gone.
    RemoveFood { row: i64, col: i64 },
    Unit { row: i64, col: i64, owner: u32 },
    Dead { row: i64, col: i64, owner: u32 },
    Hill { row: i64, col: i64, owner: u32 },

    /// End of the turn's updates; the bot must answer with its orders.
    Go,

    /// The game is over.
    End,
}

/// Parses a single line of judge input.
pub fn parse_line(line: &str) -> Result<Command, ProtocolError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Err(ProtocolError::Empty);
    };

    match head {
        "ready" => Ok(Command::Ready),
        "go" => Ok(Command::Go),
        "end" => Ok(Command::End),
        "turn" => {
            let [n] = expect_args::<1>(head, args, "a turn number")?;
            Ok(Command::Turn(parse_num(n)?))
        }
        "w" | "f" | "r" => {
            let [row, col] = expect_args::<2>(head, args, "<row> <col>")?;
            let (row, col) = (parse_num(row)?, parse_num(col)?);
            Ok(match head {
                "w" => Command::Water { row, col },
                "f" => Command::Food { row, col },
                _ => Command::RemoveFood { row, col },
            })
        }
        "a" | "d" | "h" => {
            let [row, col, owner] = expect_args::<3>(head, args, "<row> <col> <owner>")?;
            let (row, col, owner) = (parse_num(row)?, parse_num(col)?, parse_num(owner)?);
            Ok(match head {
                "a" => Command::Unit { row, col, owner },
                "d" => Command::Dead { row, col, owner },
                _ => Command::Hill { row, col, owner },
            })
        }
        // Anything else shaped like `key value` is a setting; the engine
        // decides which ones it knows.
        key if args.len() == 1 => Ok(Command::Setting {
            key: key.to_string(),
            value: parse_num(args[0])?,
        }),
        other => Err(ProtocolError::UnknownCommand(other.to_string())),
    }
}

/// Takes exactly `N` leading arguments; extra trailing tokens are ignored.
fn expect_args<'a, const N: usize>(
    command: &str,
    args: &[&'a str],
    expected: &'static str,
) -> Result<[&'a str; N], ProtocolError> {
    if args.len() < N {
        return Err(ProtocolError::MissingArgument {
            command: command.to_string(),
            expected,
        });
    }
    let mut out = [""; N];
    out.copy_from_slice(&args[..N]);
    Ok(out)
}

fn parse_num<T: std::str::FromStr>(token: &str) -> Result<T, ProtocolError> {
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_keywords() {
        assert_eq!(parse_line("ready"), Ok(Command::Ready));
        assert_eq!(parse_line("go"), Ok(Command::Go));
        assert_eq!(parse_line("end"), Ok(Command::End));
        assert_eq!(parse_line("  go  \r"), Ok(Command::Go));
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(parse_line(""), Err(ProtocolError::Empty));
        assert_eq!(parse_line(" \t "), Err(ProtocolError::Empty));
    }

    #[test]
    fn parse_turn_number() {
        assert_eq!(parse_line("turn 0"), Ok(Command::Turn(0)));
        assert_eq!(parse_line("turn 17"), Ok(Command::Turn(17)));
        assert!(matches!(
            parse_line("turn"),
            Err(ProtocolError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_line("turn x"),
            Err(ProtocolError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn parse_settings() {
        assert_eq!(
            parse_line("viewradius2 77"),
            Ok(Command::Setting {
                key: "viewradius2".to_string(),
                value: 77,
            })
        );
        assert_eq!(
            parse_line("player_seed -42"),
            Ok(Command::Setting {
                key: "player_seed".to_string(),
                value: -42,
            })
        );
    }

    #[test]
    fn parse_cell_updates() {
        assert_eq!(parse_line("w 3 4"), Ok(Command::Water { row: 3, col: 4 }));
        assert_eq!(parse_line("f 0 19"), Ok(Command::Food { row: 0, col: 19 }));
        assert_eq!(parse_line("r 7 1"), Ok(Command::RemoveFood { row: 7, col: 1 }));
    }

    #[test]
    fn parse_owned_updates() {
        assert_eq!(
            parse_line("a 5 6 0"),
            Ok(Command::Unit {
                row: 5,
                col: 6,
                owner: 0,
            })
        );
        assert_eq!(
            parse_line("d 1 2 3"),
            Ok(Command::Dead {
                row: 1,
                col: 2,
                owner: 3,
            })
        );
        assert_eq!(
            parse_line("h 9 9 1"),
            Ok(Command::Hill {
                row: 9,
                col: 9,
                owner: 1,
            })
        );
    }

    #[test]
    fn reject_malformed_updates() {
        assert!(matches!(
            parse_line("a 5 6"),
            Err(ProtocolError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_line("w 3 q"),
            Err(ProtocolError::InvalidNumber("q".to_string()))
        );
        assert_eq!(
            parse_line("a 1 1 -1"),
            Err(ProtocolError::InvalidNumber("-1".to_string()))
        );
    }

    #[test]
    fn reject_unknown_commands() {
        assert_eq!(
            parse_line("score 1 0"),
            Err(ProtocolError::UnknownCommand("score".to_string()))
        );
        assert_eq!(
            parse_line("hello"),
            Err(ProtocolError::UnknownCommand("hello".to_string()))
        );
    }
}
