use anyhow::Error;
use phonefield_config::ConfigError;
use phonefield_core::{CoreError, FieldEventParseError};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_INVALID_PHONE: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn invalid_phone(value: impl Into<String>) -> Error {
    CliError::InvalidPhone(value.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
                CliError::InvalidPhone(_) => EXIT_INVALID_PHONE,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(core_exit_code(core_err));
        }
        if let Some(_parse_err) = cause.downcast_ref::<FieldEventParseError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::UnknownCountry(_) => EXIT_NOT_FOUND,
        CoreError::UnsupportedCountry(_)
        | CoreError::InvalidCountryIso(_)
        | CoreError::InvalidCallingCode(_)
        | CoreError::InvalidMask { .. }
        | CoreError::InvalidPattern { .. }
        | CoreError::DuplicateCountry(_)
        | CoreError::EmptyRuleTable => EXIT_INVALID_INPUT,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidDefaultCountry(_)
        | ConfigError::UnknownDefaultCountry(_)
        | ConfigError::InvalidRule { .. }
        | ConfigError::DuplicateRule(_)
        | ConfigError::EmptyRules
        | ConfigError::RuleTable(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
