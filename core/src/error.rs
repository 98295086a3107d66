//! Error taxonomy for parsing and contract-checked calls.
//!
//! [`ParseError`] covers every way text can fail to become a value of a
//! descriptor's kind. [`CallError`] covers failures raised while executing a
//! function descriptor. `test` and `check` never produce errors: a kind or
//! arity mismatch is reported by returning `false`.

use thiserror::Error;

use crate::descriptor::Kind;
use crate::value::ValueKind;

/// Boxed error raised by a wrapped function body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to parse text with a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text cannot be converted to the descriptor's kind at all.
    #[error("`{input}` is not a valid {kind} literal")]
    InvalidLiteral { kind: Kind, input: String },
    /// The text converts, but the converted value fails a constraint.
    #[error("`{input}` does not satisfy {kind} constraint `{constraint}`")]
    ConstraintViolation {
        kind: Kind,
        input: String,
        constraint: String,
    },
    /// No candidate kind of the any descriptor accepts the text.
    #[error("`{input}` is not representable by any scalar kind")]
    NotRepresentable { input: String },
    /// Parsing is meaningless for this kind.
    #[error("{kind} accepts no value parsed from text (`{input}`)")]
    Unsupported { kind: Kind, input: String },
}

impl ParseError {
    /// Input text that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidLiteral { input, .. }
            | Self::ConstraintViolation { input, .. }
            | Self::NotRepresentable { input }
            | Self::Unsupported { input, .. } => input,
        }
    }
}

/// Failure raised by a function descriptor's executor.
#[derive(Debug, Error)]
pub enum CallError {
    /// A positional argument failed its parameter descriptor.
    ///
    /// `constraint` names the failing constraint when the kinds match.
    #[error(
        "invalid argument at index {index} (expected {expected}, got {found}){}",
        violates(.constraint)
    )]
    InvalidArgument {
        index: usize,
        expected: Kind,
        found: ValueKind,
        constraint: Option<String>,
    },
    /// The returned value failed the return descriptor.
    #[error(
        "invalid return value (expected {expected}, got {found}){}",
        violates(.constraint)
    )]
    InvalidReturn {
        expected: Kind,
        found: ValueKind,
        constraint: Option<String>,
    },
    /// The wrapped function itself failed.
    #[error("function body failed: {0}")]
    Failed(#[source] BoxError),
}

fn violates(constraint: &Option<String>) -> String {
    constraint
        .as_ref()
        .map(|c| format!(": violates `{c}`"))
        .unwrap_or_default()
}

impl CallError {
    /// Wraps an arbitrary error raised by a function body.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }
}
