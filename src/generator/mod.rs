//! Synthesis of timed operation histories.
//!
//! The [`HistoryGenerator`] replays randomly chosen methods against a sequential
//! reference object ([`SequentialObject`]) and stamps each call with an interval
//! from an [`IntervalClock`]. Because every recorded value is what the reference
//! object returned, and the generation order is a legal sequential execution,
//! linearizable-mode output is linearizable by construction. Non-linearizable mode
//! starts with a short prefix that no order of the operations can explain.
//!
//! # Example
//! ```
//! use histgen::generator::{GeneratorConfig, HistoryGenerator, Mode};
//! use histgen::history::ObjectKind;
//!
//! let history = HistoryGenerator::seeded(ObjectKind::Stack, GeneratorConfig::default(), 7)
//!     .generate(Mode::NonLinearizable, 6);
//!
//! assert_eq!(history.len(), 6);
//! assert!(history.to_string().starts_with("# stack\n0 push -2 0 1\n"));
//! ```

pub use self::clock::IntervalClock;
pub use self::history_gen::{generate_batch, GeneratorConfig, HistoryGenerator, Mode};
pub use self::sequential::{
    Sequential, SequentialObject, SequentialPriorityQueue, SequentialQueue, SequentialStack,
};

mod clock;
mod history_gen;
mod sequential;
