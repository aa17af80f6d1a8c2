use chrono::{DateTime, NaiveDate, Utc};

use seiva_core::{Clock, FixedClock};

use crate::errors::CliError;

/// Pins "today" to a fixed `YYYY-MM-DD` date, for demos and scripted runs.
pub const TODAY_VAR: &str = "SEIVA_TODAY";

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The system clock, or a frozen one when `SEIVA_TODAY` is set.
pub fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    match std::env::var(TODAY_VAR) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{TODAY_VAR}=`{raw}` is not a YYYY-MM-DD date"))
            })?;
            Ok(Box::new(FixedClock::on(date)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}
