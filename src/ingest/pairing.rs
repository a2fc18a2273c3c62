use std::collections::HashMap;
use std::fmt::Write;

use tracing::debug;

use crate::error::{Error, Result};
use crate::history::parse_int;

/// A completed operation in the driver's own vocabulary, before remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOperation {
    pub process_id: u64,
    pub token: String,
    pub value: Option<i64>,
    pub invocation: i64,
    pub response: i64,
}

/// What the payload field of a log line says.
#[derive(Debug, PartialEq, Eq)]
struct Observation<'a> {
    name: Option<&'a str>,
    value: Payload,
}

#[derive(Debug, PartialEq, Eq)]
enum Payload {
    None,
    Empty,
    Value(i64),
}

impl Payload {
    fn parse(line: usize, token: &str) -> Result<Payload> {
        match token {
            "" => Ok(Payload::None),
            "empty" => Ok(Payload::Empty),
            t => parse_int(line, t).map(Payload::Value),
        }
    }
}

fn observe(line: usize, token: &str) -> Result<Observation> {
    if let Some(open) = token.find('(') {
        let inner = token[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| Error::parse(line, format!("unbalanced parentheses in {:?}", token)))?;
        return Ok(Observation {
            name: Some(&token[..open]),
            value: Payload::parse(line, inner.trim())?,
        });
    }
    match token {
        "" => Ok(Observation {
            name: None,
            value: Payload::None,
        }),
        "empty" => Ok(Observation {
            name: None,
            value: Payload::Empty,
        }),
        t => match t.parse::<i64>() {
            Ok(v) => Ok(Observation {
                name: None,
                value: Payload::Value(v),
            }),
            Err(_) => Ok(Observation {
                name: Some(t),
                value: Payload::None,
            }),
        },
    }
}

fn process_of(line: usize, token: &str) -> Result<u64> {
    token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| Error::parse(line, format!("expected `[<process>]`, found {:?}", token)))
        .and_then(|t| parse_int(line, t))
}

/// Rebuilds operations from a log in which each process writes one line when it
/// invokes a method and one when the method returns.
///
/// Every event line ticks a logical clock; an operation spans the ticks of its two lines.
/// Lines are either `[p] <payload>` or `[p] <stamp> <payload>`, where the payload may be
/// absent on completions. The first event line fixes the layout for the whole log, and
/// driver stamps are checked but never read as values.
#[derive(Debug, Default)]
pub struct EventPairer {
    pending: HashMap<u64, RawOperation>,
    completed: Vec<RawOperation>,
    counter: i64,
    stamped: Option<bool>,
}

impl EventPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one log line. Blank lines and `#` comments do not tick the clock.
    pub fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        let mut tokens = line.split_whitespace();
        let process_id = match tokens.next() {
            Some(t) => process_of(line_no, t)?,
            None => return Ok(()),
        };
        let fields: Vec<&str> = tokens.collect();
        let last = self.payload(line_no, &fields)?;

        match self.pending.remove(&process_id) {
            Some(mut op) => {
                op.response = self.counter;
                match observe(line_no, last)?.value {
                    Payload::Value(v) => op.value = Some(v),
                    Payload::Empty => op.value = None,
                    Payload::None => {}
                }
                self.completed.push(op);
            }
            None => {
                let observation = observe(line_no, last)?;
                let token = observation.name.ok_or_else(|| {
                    let reason = format!("process {} invoked without a method", process_id);
                    Error::parse(line_no, reason)
                })?;
                let value = match observation.value {
                    Payload::Value(v) => Some(v),
                    Payload::Empty | Payload::None => None,
                };
                self.pending.insert(
                    process_id,
                    RawOperation {
                        process_id,
                        token: token.to_owned(),
                        value,
                        invocation: self.counter,
                        response: self.counter,
                    },
                );
            }
        }
        self.counter += 1;
        Ok(())
    }

    fn payload<'a>(&mut self, line_no: usize, fields: &[&'a str]) -> Result<&'a str> {
        // An invocation always names a method, so a leading integer followed by
        // another field can only be a stamp.
        let stamped = *self
            .stamped
            .get_or_insert_with(|| fields.len() >= 2 && fields[0].parse::<i64>().is_ok());
        match (stamped, fields) {
            (false, []) => Ok(""),
            (false, [payload]) => Ok(*payload),
            (true, [stamp]) => parse_int::<i64>(line_no, stamp).map(|_| ""),
            (true, [stamp, payload]) => parse_int::<i64>(line_no, stamp).map(|_| *payload),
            _ => Err(Error::parse(
                line_no,
                format!(
                    "expected `[<process>] {}<payload>`, found {} field(s)",
                    if stamped { "<stamp> " } else { "" },
                    fields.len() + 1
                ),
            )),
        }
    }

    /// Returns operations in completion order; fails if any invocation never returned.
    pub fn finish(self) -> Result<Vec<RawOperation>> {
        if !self.pending.is_empty() {
            let mut processes: Vec<u64> = self.pending.keys().copied().collect();
            processes.sort_unstable();
            return Err(Error::UnmatchedInvocations { processes });
        }
        debug!(
            operations = self.completed.len(),
            events = self.counter,
            stamped = self.stamped.unwrap_or(false),
            "paired raw log"
        );
        Ok(self.completed)
    }
}

/// Pairs a whole raw log.
pub fn pair_log(text: &str) -> Result<Vec<RawOperation>> {
    let mut pairer = EventPairer::new();
    for (i, line) in text.lines().enumerate() {
        pairer.feed(i + 1, line)?;
    }
    pairer.finish()
}

/// Writes operations back out as a raw log, one line per event in time order.
pub fn render_log(operations: &[RawOperation]) -> String {
    let mut events: Vec<(i64, String)> = Vec::with_capacity(operations.len() * 2);
    for op in operations {
        events.push((op.invocation, format!("[{}] {}", op.process_id, op.token)));
        let result = match op.value {
            Some(v) => v.to_string(),
            None => "empty".to_owned(),
        };
        events.push((op.response, format!("[{}] {}", op.process_id, result)));
    }
    events.sort_by_key(|(time, _)| *time);

    let mut out = String::new();
    for (_, line) in events {
        let _ = writeln!(out, "{}", line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_with_acknowledgement() {
        let ops = pair_log("[0] push(5)\n[0] push_ack(5)\n").unwrap();
        assert_eq!(
            ops,
            vec![RawOperation {
                process_id: 0,
                token: "push".to_owned(),
                value: Some(5),
                invocation: 0,
                response: 1,
            }]
        );
    }

    #[test]
    fn interleaved_processes() {
        let log = "\
# driver output
[1] 100 enq(7)
[2] 101 deq

[1] 102 ok
[2] 103 7
[1] 104 deq
[1] 105 empty
";
        let ops = pair_log(log).unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!((ops[0].process_id, ops[0].token.as_str()), (1, "enq"));
        assert_eq!((ops[0].value, ops[0].invocation, ops[0].response), (Some(7), 0, 2));
        assert_eq!((ops[1].process_id, ops[1].token.as_str()), (2, "deq"));
        assert_eq!((ops[1].value, ops[1].invocation, ops[1].response), (Some(7), 1, 3));
        assert_eq!((ops[2].value, ops[2].invocation, ops[2].response), (None, 4, 5));
    }

    #[test]
    fn stamp_only_completion_keeps_the_argument() {
        let ops = pair_log("[0] 10 push(5)\n[0] 11\n[1] 12 pop\n[1] 13 5\n").unwrap();
        assert_eq!((ops[0].token.as_str(), ops[0].value), ("push", Some(5)));
        assert_eq!((ops[0].invocation, ops[0].response), (0, 1));
        assert_eq!((ops[1].token.as_str(), ops[1].value), ("pop", Some(5)));
    }

    #[test]
    fn layout_is_fixed_by_the_first_event() {
        // Unstamped log: a second field is never a payload.
        assert!(matches!(
            pair_log("[0] push(5)\n[0] 11 ok\n"),
            Err(Error::Parse { line: 2, .. })
        ));
        // Stamped log: the first field must be a stamp.
        assert!(matches!(
            pair_log("[0] 10 push(5)\n[0] ok\n"),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            pair_log("[0] 10 push(5)\n[0] 11 5 6\n"),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn unmatched_invocations_are_reported() {
        match pair_log("[3] pop\n[1] push(1)\n[1] ok\n[0] peek\n") {
            Err(Error::UnmatchedInvocations { processes }) => assert_eq!(processes, vec![0, 3]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(pair_log("0 push(1)\n"), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(pair_log("[x] push(1)\n"), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(pair_log("[0] push(1\n"), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(pair_log("[0] 4\n"), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn pairing_is_idempotent() {
        let log = "[0] push(5)\n[1] pop\n[0] ok\n[2] peek\n[1] 5\n[2] empty\n[0] push(6)\n[0] 6\n";
        let first = pair_log(log).unwrap();
        let second = pair_log(&render_log(&first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(pair_log(&render_log(&second)).unwrap(), second);
    }
}
