use std::result::Result as StdResult;

use seiva_config::ConfigError as SettingsError;
use seiva_core::CoreError as ServiceCoreError;
use thiserror::Error;

/// Unified error type for core/storage/settings layers.
#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, SchoolError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SchoolError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for SchoolError {
    fn from(err: std::io::Error) -> Self {
        SchoolError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        SchoolError::StorageError(err.to_string())
    }
}

impl From<ServiceCoreError> for SchoolError {
    fn from(err: ServiceCoreError) -> Self {
        match err {
            ServiceCoreError::StudentNotFound(id) => SchoolError::StudentNotFound(id),
            ServiceCoreError::Storage(message) | ServiceCoreError::Serde(message) => {
                SchoolError::StorageError(message)
            }
            ServiceCoreError::Io(err) => SchoolError::StorageError(err.to_string()),
        }
    }
}

impl From<SettingsError> for SchoolError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Io(io) => SchoolError::StorageError(io.to_string()),
            SettingsError::Serde(message) => SchoolError::ConfigError(message),
            invalid @ (SettingsError::UnknownSetting(_) | SettingsError::InvalidValue { .. }) => {
                SchoolError::InvalidInput(invalid.to_string())
            }
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        CliError::from(SchoolError::from(err))
    }
}

impl From<ServiceCoreError> for CliError {
    fn from(err: ServiceCoreError) -> Self {
        CliError::from(SchoolError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_school_errors() {
        let err: SchoolError = ServiceCoreError::StudentNotFound("7".into()).into();
        assert!(matches!(err, SchoolError::StudentNotFound(ref id) if id == "7"));

        let err: SchoolError = ServiceCoreError::Serde("bad json".into()).into();
        assert_eq!(err.to_string(), "Persistence error: bad json");
    }

    #[test]
    fn settings_validation_becomes_invalid_input() {
        let err: SchoolError = SettingsError::UnknownSetting("x.y".into()).into();
        assert!(matches!(err, SchoolError::InvalidInput(_)));
        let cli: CliError = SettingsError::Serde("oops".into()).into();
        assert!(matches!(cli, CliError::Core(SchoolError::ConfigError(_))));
    }
}
