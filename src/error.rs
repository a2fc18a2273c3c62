//! Error types shared by every stage of the pipeline.

use thiserror::Error;

use crate::history::{Method, ObjectKind};

/// Result type alias for history operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, ingesting or encoding histories.
///
/// Every error aborts the stage that raised it; no partial output is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// A line of some textual input could not be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// An object kind name was not recognised.
    #[error("unknown object kind: {0}")]
    UnknownObjectKind(String),

    /// A method was used with an object kind it does not belong to.
    #[error("method {method} is not an operation of {kind}")]
    MethodMismatch { kind: ObjectKind, method: Method },

    /// An operation's response does not come strictly after its invocation.
    #[error("operation {sequence} has an empty interval [{invocation}, {response})")]
    EmptyInterval {
        sequence: usize,
        invocation: i64,
        response: i64,
    },

    /// The raw log ended while some processes still had an open invocation.
    #[error("log ended with unmatched invocations for processes {processes:?}")]
    UnmatchedInvocations { processes: Vec<u64> },

    /// A token has no entry in the configured mapping table.
    #[error("operation {index}: token {token:?} has no mapping for {kind}")]
    UnknownToken {
        index: usize,
        token: String,
        kind: ObjectKind,
    },

    /// An implementation name has no configured object kind.
    #[error("unknown implementation: {0}")]
    UnknownImplementation(String),

    /// An object kind is referenced but has no mapping table.
    #[error("no method mapping configured for {0}")]
    MissingMapping(ObjectKind),

    /// A mapping table entry points at something that is not a method of its kind.
    #[error("mapping for {kind}: {token:?} -> {target:?} is not a valid method")]
    InvalidMapping {
        kind: ObjectKind,
        token: String,
        target: String,
    },

    /// Two methods of one kind would be written under the same checker name.
    #[error("{kind}: methods {first} and {second} are both named {name:?}")]
    AmbiguousName {
        kind: ObjectKind,
        name: String,
        first: Method,
        second: Method,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`crate::config::Config`].
    #[error("configuration error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }
}
