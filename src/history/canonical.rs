use std::fmt;
use std::slice;

use crate::error::{Error, Result};

use super::operation::{Method, ObjectKind, Operation};

/// An immutable, kind-tagged sequence of operations.
///
/// Built once by the generator or the ingest pipeline and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    kind: ObjectKind,
    operations: Vec<Operation>,
}

impl History {
    /// Builds a history, checking that every method belongs to `kind` and every
    /// interval is non-empty.
    pub fn new(kind: ObjectKind, operations: Vec<Operation>) -> Result<Self> {
        for (index, op) in operations.iter().enumerate() {
            if !op.method.belongs_to(kind) {
                return Err(Error::MethodMismatch {
                    kind,
                    method: op.method,
                });
            }
            if op.response <= op.invocation {
                return Err(Error::EmptyInterval {
                    sequence: index + 1,
                    invocation: op.invocation,
                    response: op.response,
                });
            }
        }
        Ok(History { kind, operations })
    }

    /// For callers that build operations from `kind`'s own vocabulary.
    pub(crate) fn assemble(kind: ObjectKind, operations: Vec<Operation>) -> Self {
        debug_assert!(operations
            .iter()
            .all(|op| op.method.belongs_to(kind) && op.response > op.invocation));
        History { kind, operations }
    }

    pub fn empty(kind: ObjectKind) -> Self {
        History {
            kind,
            operations: Vec::new(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Operation> {
        self.operations.iter()
    }

    /// Operations paired with their 1-based sequence number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Operation)> {
        self.operations.iter().enumerate().map(|(i, op)| (i + 1, op))
    }

    /// Parses the canonical text format.
    ///
    /// The first non-blank line must be `# <kind>`. Each operation line is either
    /// `<process> <method> <value> <invocation> <response>` or the older
    /// process-less `<method> <value> <invocation> <response>`, in which case the
    /// operation gets its own sequence number as process id.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let kind = match lines.next() {
            Some((line_no, header)) => match header.strip_prefix('#') {
                Some(name) => name
                    .trim()
                    .parse::<ObjectKind>()
                    .map_err(|e| Error::parse(line_no, e.to_string()))?,
                None => return Err(Error::parse(line_no, "missing `# <kind>` header")),
            },
            None => return Err(Error::parse(1, "empty history")),
        };

        let mut operations = Vec::new();
        for (line_no, line) in lines {
            if line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let (process_id, rest) = match tokens.len() {
                5 => (parse_int::<u64>(line_no, tokens[0])?, &tokens[1..]),
                4 => ((operations.len() + 1) as u64, &tokens[..]),
                n => {
                    let reason = format!("expected 4 or 5 fields, found {}", n);
                    return Err(Error::parse(line_no, reason));
                }
            };
            let method = Method::parse(kind, rest[0]).ok_or_else(|| {
                Error::parse(line_no, format!("{} is not a {} method", rest[0], kind))
            })?;
            operations.push(Operation::new(
                process_id,
                method,
                parse_int(line_no, rest[1])?,
                parse_int(line_no, rest[2])?,
                parse_int(line_no, rest[3])?,
            ));
        }

        History::new(kind, operations)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Operation;
    type IntoIter = slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "# {}", self.kind)?;
        for op in &self.operations {
            writeln!(
                f,
                "{} {} {} {} {}",
                op.process_id, op.method, op.value, op.invocation, op.response
            )?;
        }
        Ok(())
    }
}

pub(crate) fn parse_int<T: std::str::FromStr>(line: usize, token: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| Error::parse(line, format!("expected an integer, found {:?}", token)))
}
