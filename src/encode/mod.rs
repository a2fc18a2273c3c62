//! Projections of a canonical history into checker input formats.
//!
//! Encoders never modify the [`History`] they read, so any number of them can run
//! over the same history. Three formats are supported:
//!
//! * [`IntervalEncoder`]: `<start> <end> <seq> <method> <value> <outcome>` per operation.
//! * [`TraceEncoder`] with [`BracketGrammar`]: a time-ordered trace of
//!   `[n] call ...` and `[n] return ...` lines.
//! * [`TraceEncoder`] with [`EdnGrammar`]: the same trace as EDN event maps.

use std::fmt;
use std::str::FromStr;

use crate::history::History;

pub use self::interval::{IntervalEncoder, IntervalRecord};
pub use self::trace::{
    events, BracketGrammar, CallEvent, EdnGrammar, Event, ReturnEvent, TimeStamped, TraceEncoder,
    TraceGrammar,
};
pub use self::vocabulary::Vocabulary;

mod interval;
mod trace;
mod vocabulary;

/// A pure projection of a history into text.
pub trait Encoder {
    fn encode(&self, history: &History) -> String;
}

/// The output formats known to the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Interval,
    Bracket,
    Edn,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Interval => "interval",
            Format::Bracket => "bracket",
            Format::Edn => "edn",
        }
    }

    /// Encodes with the given method vocabulary.
    pub fn encode(self, history: &History, vocabulary: Vocabulary) -> String {
        match self {
            Format::Interval => IntervalEncoder::new(vocabulary).encode(history),
            Format::Bracket => TraceEncoder::new(BracketGrammar, vocabulary).encode(history),
            Format::Edn => TraceEncoder::new(EdnGrammar, vocabulary).encode(history),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interval" => Ok(Format::Interval),
            "bracket" => Ok(Format::Bracket),
            "edn" => Ok(Format::Edn),
            other => Err(format!(
                "unknown format {:?}, expected interval, bracket or edn",
                other
            )),
        }
    }
}
