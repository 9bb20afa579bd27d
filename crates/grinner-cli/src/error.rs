use std::fmt;
use std::process::ExitCode;

use grinner_core::ConfigError;
use grinner_layout::{ApplyError, LayoutError};
use grinner_parser::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad command line (missing args, unknown flags).
    Usage = 1,
    /// Bad input: unreadable board or settings, bad key sizes, bad parameters.
    Input = 2,
    /// Failure while moving footprints or writing the board.
    Processing = 3,
}

#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Input,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Processing,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code as u8)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::input(err.to_string())
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        Self::input(err.to_string())
    }
}

impl From<ApplyError> for CliError {
    fn from(err: ApplyError) -> Self {
        Self::processing(err.to_string())
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Apply(err) => err.into(),
            other => Self::input(other.to_string()),
        }
    }
}
