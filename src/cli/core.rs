//! Error types and loop control shared by the shell and its command handlers.

use std::io;

use thiserror::Error;

use crate::core::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No plan is open. Use `plan open <id>` or `plan new` first.")]
    NoPlanOpen,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {usage}"))
    }
}

impl From<tabi_core::CoreError> for CommandError {
    fn from(err: tabi_core::CoreError) -> Self {
        CommandError::App(err.into())
    }
}

impl From<tabi_config::ConfigError> for CommandError {
    fn from(err: tabi_config::ConfigError) -> Self {
        CommandError::App(err.into())
    }
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<tabi_core::CoreError> for CliError {
    fn from(err: tabi_core::CoreError) -> Self {
        CliError::App(err.into())
    }
}

impl From<tabi_config::ConfigError> for CliError {
    fn from(err: tabi_config::ConfigError) -> Self {
        CliError::App(err.into())
    }
}
