//! The canonical history data model.
//!
//! A [`History`] is a sequence of [`Operation`]s on one [`ObjectKind`]. It is the single
//! source of truth every checker format is projected from. Its text form is
//!
//! ```text
//! # stack
//! <process> <method> <value> <invocation> <response>
//! ```
//!
//! with `-1` ([`EMPTY_VALUE`]) standing for an absent value.

pub use self::canonical::History;
pub use self::operation::{Method, MethodClass, ObjectKind, Operation, EMPTY_VALUE};

pub(crate) use self::canonical::parse_int;

mod canonical;
mod operation;
