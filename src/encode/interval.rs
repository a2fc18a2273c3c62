use std::fmt::Write;

use crate::error::{Error, Result};
use crate::history::{parse_int, History, Method, ObjectKind};

use super::vocabulary::Vocabulary;
use super::Encoder;

/// One line of the interval format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalRecord {
    pub start: i64,
    pub end: i64,
    pub sequence: usize,
    pub method: Method,
    pub value: i64,
    pub outcome: bool,
}

/// Projects a history onto `<start> <end> <seq> <method> <value> <true|false>` lines.
#[derive(Debug, Clone, Default)]
pub struct IntervalEncoder {
    vocabulary: Vocabulary,
}

impl IntervalEncoder {
    pub fn new(vocabulary: Vocabulary) -> Self {
        IntervalEncoder { vocabulary }
    }

    pub fn records(history: &History) -> Vec<IntervalRecord> {
        history
            .numbered()
            .map(|(sequence, op)| IntervalRecord {
                start: op.invocation,
                end: op.response,
                sequence,
                method: op.method,
                value: op.value,
                outcome: op.outcome(),
            })
            .collect()
    }

    /// Reads interval lines back, resolving names through this encoder's vocabulary.
    pub fn decode(&self, kind: ObjectKind, text: &str) -> Result<Vec<IntervalRecord>> {
        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 6 {
                return Err(Error::parse(
                    line_no,
                    format!("expected 6 fields, found {}", tokens.len()),
                ));
            }
            let method = self.vocabulary.method(kind, tokens[3]).ok_or_else(|| {
                Error::parse(line_no, format!("{:?} is not a {} method", tokens[3], kind))
            })?;
            let outcome = match tokens[5] {
                "true" => true,
                "false" => false,
                other => {
                    return Err(Error::parse(
                        line_no,
                        format!("expected true or false, found {:?}", other),
                    ))
                }
            };
            records.push(IntervalRecord {
                start: parse_int(line_no, tokens[0])?,
                end: parse_int(line_no, tokens[1])?,
                sequence: parse_int(line_no, tokens[2])?,
                method,
                value: parse_int(line_no, tokens[4])?,
                outcome,
            });
        }
        Ok(records)
    }
}

impl Encoder for IntervalEncoder {
    fn encode(&self, history: &History) -> String {
        let mut out = String::new();
        for record in IntervalEncoder::records(history) {
            let _ = writeln!(
                out,
                "{} {} {} {} {} {}",
                record.start,
                record.end,
                record.sequence,
                self.vocabulary.name(record.method),
                record.value,
                record.outcome
            );
        }
        out
    }
}
