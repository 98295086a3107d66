//! Error types for command execution and runtime configuration.

use chat_schema_core::{CallError, ParseError};
use thiserror::Error;

use crate::chat::ChatKind;

/// Errors that can occur while configuring or running commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration loaded but holds an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The message came from a chat the command does not accept.
    #[error("command `{command}`: invalid chat type (expected {expected}, got {found})")]
    ChatKindMismatch {
        command: String,
        expected: String,
        found: ChatKind,
    },

    /// Wrong number of text arguments for the command's parameters.
    #[error("command `{command}`: expected {expected} argument(s), got {found}")]
    ArityMismatch {
        command: String,
        expected: usize,
        found: usize,
    },

    /// A text argument failed to parse with its parameter descriptor.
    #[error("command `{command}`: argument {index}: {source}")]
    InvalidArgument {
        command: String,
        index: usize,
        #[source]
        source: ParseError,
    },

    /// A typed argument failed its parameter descriptor.
    #[error("command `{command}`: {source}")]
    Contract {
        command: String,
        #[source]
        source: CallError,
    },

    /// No registered command has this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command with this name is already registered.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;
