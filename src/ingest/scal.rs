//! Import of SCAL `prodcon` operation logs.
//!
//! Each line describes one finished operation:
//!
//! ```text
//! <marker> <value> <invocation> <linearization> <response>
//! ```
//!
//! where the marker is an implementation symbol such as `+` or `-` and a value of
//! `0` means the operation found the object empty.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::history::parse_int;

use super::pairing::RawOperation;

/// Parses a SCAL log into raw operations, one process per line.
///
/// With `drop_empties` set, operations that returned nothing are discarded.
pub fn parse_scal_log(text: &str, drop_empties: bool) -> Result<Vec<RawOperation>> {
    let mut operations = Vec::new();
    let mut dropped = 0usize;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(Error::parse(
                line_no,
                format!("expected 5 fields, found {}", tokens.len()),
            ));
        }
        let value: i64 = parse_int(line_no, tokens[1])?;
        if value == 0 && drop_empties {
            dropped += 1;
            continue;
        }
        operations.push(RawOperation {
            process_id: operations.len() as u64,
            token: tokens[0].to_owned(),
            value: if value == 0 { None } else { Some(value) },
            invocation: parse_int(line_no, tokens[2])?,
            response: parse_int(line_no, tokens[4])?,
        });
    }

    if dropped > 0 {
        warn!(dropped, "dropped empty operations from SCAL log");
    }
    debug!(operations = operations.len(), "parsed SCAL log");
    Ok(operations)
}
