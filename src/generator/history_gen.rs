use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::history::{History, Method, MethodClass, ObjectKind, Operation, EMPTY_VALUE};

use super::clock::IntervalClock;
use super::sequential::{Sequential, SequentialObject};

/// Occupancy at which the generator stops inserting.
const MAX_OBJECT_SIZE: usize = 100;

/// Length of the forced-violation prefix of a non-linearizable history.
const VIOLATION_PREFIX: usize = 4;

/// Tunables for history generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// How far an interval end may lie from its reference time.
    pub max_radius: i64,

    /// Largest gap between two successive reference times.
    pub max_time_delta: i64,

    /// Seed for reproducible runs. Drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_radius: 1000,
            max_time_delta: 10,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_time_delta < 1 {
            return Err(Error::InvalidConfig(format!(
                "max_time_delta must be at least 1, got {}",
                self.max_time_delta
            )));
        }
        if self.max_radius < 0 {
            return Err(Error::InvalidConfig(format!(
                "max_radius must not be negative, got {}",
                self.max_radius
            )));
        }
        Ok(())
    }

    /// The configured seed, or a fresh one. The seed is logged either way.
    pub fn resolve_seed(&self) -> u64 {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(seed, "history generator seed");
        seed
    }
}

/// Which kind of history to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Linearizable,
    NonLinearizable,
}

/// Drives a [`SequentialObject`] and an [`IntervalClock`] to produce one history.
///
/// A generator owns its clock, its object and its random source; the generation
/// order of operations is the linearization witness.
pub struct HistoryGenerator<R: Rng> {
    kind: ObjectKind,
    config: GeneratorConfig,
    rng: R,
    clock: IntervalClock,
    object: SequentialObject,
    operations: Vec<Operation>,
}

impl HistoryGenerator<StdRng> {
    pub fn seeded(kind: ObjectKind, config: GeneratorConfig, seed: u64) -> Self {
        HistoryGenerator::new(kind, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HistoryGenerator<R> {
    pub fn new(kind: ObjectKind, config: GeneratorConfig, rng: R) -> Self {
        HistoryGenerator {
            kind,
            config,
            rng,
            clock: IntervalClock::new(),
            object: SequentialObject::new(kind),
            operations: Vec::new(),
        }
    }

    pub fn generate(self, mode: Mode, n: usize) -> History {
        match mode {
            Mode::Linearizable => self.linearizable(n),
            Mode::NonLinearizable => self.non_linearizable(n),
        }
    }

    /// A history that is linearizable by construction: every value is read back
    /// from the sequential object in generation order.
    pub fn linearizable(mut self, n: usize) -> History {
        self.extend_linearizable(n);
        debug!(kind = %self.kind, operations = n, "generated linearizable history");
        self.finish()
    }

    /// A history that no linearization can explain.
    ///
    /// Fewer than four operations are peeks and removals of values nobody inserted.
    /// Otherwise two inserts are followed by two removals in an order the object
    /// can never produce, and the rest is generated linearizably from there.
    pub fn non_linearizable(mut self, n: usize) -> History {
        if n < VIOLATION_PREFIX {
            for i in 1..=n as i64 {
                let class = self.peek_or_remove();
                self.record(0, class, i, (i - 1, i));
            }
            self.clock = IntervalClock::starting_at(n as i64);
        } else {
            self.violation_prefix();
            self.extend_linearizable(n - VIOLATION_PREFIX);
        }
        debug!(kind = %self.kind, operations = n, "generated non-linearizable history");
        self.finish()
    }

    fn violation_prefix(&mut self) {
        let (first, second) = (-2, -1);
        let removal_order = match self.kind {
            ObjectKind::Queue => [second, first],
            ObjectKind::Stack | ObjectKind::PriorityQueue => [first, second],
        };

        let mut t = 0;
        for value in [first, second].iter().chain(removal_order.iter()) {
            let class = if t < 2 {
                MethodClass::Insert
            } else {
                MethodClass::Remove
            };
            self.object.apply(class, *value);
            self.record(0, class, *value, (t, t + 1));
            t += 1;
        }
        self.clock = IntervalClock::starting_at(t);
    }

    fn extend_linearizable(&mut self, n: usize) {
        let mut pool: Vec<i64> = match self.kind {
            ObjectKind::PriorityQueue => {
                let mut pool: Vec<i64> = (0..n as i64).collect();
                pool.shuffle(&mut self.rng);
                pool
            }
            ObjectKind::Stack | ObjectKind::Queue => Vec::new(),
        };

        for _ in 0..n {
            let t = self.clock.advance(&mut self.rng, self.config.max_time_delta);
            let interval = self
                .clock
                .interval_around(&mut self.rng, t, self.config.max_radius);
            let class = self.next_class();
            let argument = match class {
                MethodClass::Insert => pool.pop().unwrap_or(t),
                MethodClass::Peek | MethodClass::Remove => EMPTY_VALUE,
            };
            let value = self.object.apply(class, argument);
            self.record(t as u64, class, value, interval);
        }
    }

    /// Inserts when empty, never inserts when full, otherwise picks uniformly.
    fn next_class(&mut self) -> MethodClass {
        if self.object.is_empty() {
            MethodClass::Insert
        } else if self.object.len() >= MAX_OBJECT_SIZE {
            self.peek_or_remove()
        } else {
            match self.rng.gen_range(0..3) {
                0 => MethodClass::Insert,
                1 => MethodClass::Peek,
                _ => MethodClass::Remove,
            }
        }
    }

    fn peek_or_remove(&mut self) -> MethodClass {
        if self.rng.gen_bool(0.5) {
            MethodClass::Peek
        } else {
            MethodClass::Remove
        }
    }

    fn record(&mut self, process_id: u64, class: MethodClass, value: i64, interval: (i64, i64)) {
        let (invocation, response) = interval;
        self.operations.push(Operation::new(
            process_id,
            Method::of(self.kind, class),
            value,
            invocation,
            response,
        ));
    }

    fn finish(self) -> History {
        History::assemble(self.kind, self.operations)
    }
}

/// Generates one history per seed, in parallel. Runs share nothing.
pub fn generate_batch(
    kind: ObjectKind,
    mode: Mode,
    n: usize,
    config: &GeneratorConfig,
    seeds: &[u64],
) -> Vec<History> {
    info!(kind = %kind, ?mode, operations = n, runs = seeds.len(), "generating batch");
    seeds
        .par_iter()
        .map(|&seed| HistoryGenerator::seeded(kind, config.clone(), seed).generate(mode, n))
        .collect()
}
