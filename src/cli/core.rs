use std::io;

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::{CliError, SchoolError};

/// Environment variable that switches the shell to line-by-line stdin mode.
pub const SCRIPT_VAR: &str = "SEIVA_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if std::env::var_os(SCRIPT_VAR).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] SchoolError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<seiva_core::CoreError> for CommandError {
    fn from(err: seiva_core::CoreError) -> Self {
        CommandError::Core(err.into())
    }
}

impl From<seiva_config::ConfigError> for CommandError {
    fn from(err: seiva_config::ConfigError) -> Self {
        CommandError::Core(err.into())
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`.
pub(crate) fn parse_date_time(input: &str) -> Result<NaiveDateTime, CommandError> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "invalid date-time `{}` (use YYYY-MM-DDTHH:MM)",
                input
            ))
        })
}

/// Positive amount; a lone comma is read as the decimal separator.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let normalized = if input.contains(',') && !input.contains('.') {
        input.replace(',', ".")
    } else {
        input.to_string()
    };
    match normalized.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid amount `{}` (expected a positive number)",
            input
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_comma_decimals() {
        assert_eq!(parse_amount("5000").unwrap(), 5000.0);
        assert_eq!(parse_amount("1250,50").unwrap(), 1250.5);
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn date_times_accept_both_separators() {
        let a = parse_date_time("2024-11-05T14:00").unwrap();
        let b = parse_date_time("2024-11-05 14:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_date_time("05/11/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
