//! Compiler Errors
//!
//! Every failure aborts the compilation unit that raised it; nothing is recovered
//! and no partial output is surfaced.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A child node has no lowering rule (for example a bare spread inside `{}`).
    #[error("getChildren: {kind} is not supported")]
    UnsupportedChild { kind: &'static str },

    /// `name={}` with nothing inside the braces.
    #[error("JSX attributes must only be assigned a non-empty expression (`{name}`)")]
    EmptyAttribute { name: String },

    /// Raised while decomposing a directive attribute.
    #[error("{message} (in `{directive}`)")]
    MalformedDirective { directive: String, message: String },

    /// Rejected configuration.
    #[error("invalid option `{option}`: {message}")]
    InvalidOption { option: &'static str, message: String },
}

impl CompileError {
    pub fn malformed_directive(directive: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::MalformedDirective {
            directive: directive.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
