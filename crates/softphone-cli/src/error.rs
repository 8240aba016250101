use anyhow::Error;
use softphone_config::ConfigError;
use softphone_core::CoreError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
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
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(core_exit_code(core_err));
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::CallNotFound(_) => EXIT_NOT_FOUND,
        CoreError::InvalidTransition { .. }
        | CoreError::HoldAlreadyOpen
        | CoreError::DoubleHoldClose
        | CoreError::ClockNotRunning
        | CoreError::NotAccepting(_)
        | CoreError::InvalidDialString(_)
        | CoreError::InvalidPresence => EXIT_INVALID_INPUT,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::MissingConfigFile(_) => EXIT_NOT_FOUND,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidPresence(_)
        | ConfigError::EmptyPhoneNumbers
        | ConfigError::InvalidPhoneNumber(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
