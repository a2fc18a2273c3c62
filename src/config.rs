//! Configuration.
//!
//! Everything that the original tooling kept in a shared mapping file lives here:
//! generator tunables, which object kind each implementation under test is,
//! how each implementation's method tokens map to canonical methods, and what
//! each checker calls the canonical methods. Configuration is read from TOML and
//! validated as a whole when loaded, so a missing table is reported before any
//! history is touched.
//!
//! ```toml
//! [generator]
//! max_radius = 1000
//! max_time_delta = 10
//!
//! [implementations]
//! ms = "queue"
//!
//! [mappings.queue]
//! "+" = "enq"
//! "-" = "deq"
//!
//! [encoders.trace.queue]
//! enq = "offer"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encode::{Format, Vocabulary};
use crate::error::{Error, Result};
use crate::generator::GeneratorConfig;
use crate::history::ObjectKind;
use crate::ingest::MethodTable;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History generation tunables.
    pub generator: GeneratorConfig,

    /// Implementation name -> object kind.
    pub implementations: BTreeMap<String, ObjectKind>,

    /// Object kind name -> (implementation token -> canonical method name).
    /// Any spelling [`ObjectKind`] parses is accepted as a key.
    pub mappings: BTreeMap<String, BTreeMap<String, String>>,

    /// Per-checker method names.
    pub encoders: EncoderNames,
}

/// Object kind name -> (canonical method name -> checker name), per checker family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderNames {
    pub interval: BTreeMap<String, BTreeMap<String, String>>,
    pub trace: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks every table eagerly.
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;

        for (kind, table) in by_kind("mappings", &self.mappings)? {
            MethodTable::new(kind, table.iter())?;
        }
        for (implementation, kind) in &self.implementations {
            if table_for(&self.mappings, *kind).is_none() {
                debug!(%implementation, %kind, "implementation has no mapping table");
                return Err(Error::MissingMapping(*kind));
            }
        }
        let encoders = [
            ("encoders.interval", &self.encoders.interval),
            ("encoders.trace", &self.encoders.trace),
        ];
        for (section, names) in encoders.iter() {
            for (kind, table) in by_kind(section, names)? {
                Vocabulary::new(kind, table.iter())?;
            }
        }
        Ok(())
    }

    pub fn kind_of(&self, implementation: &str) -> Result<ObjectKind> {
        self.implementations
            .get(implementation)
            .copied()
            .ok_or_else(|| Error::UnknownImplementation(implementation.to_owned()))
    }

    /// The token table for an implementation under test.
    pub fn method_table(&self, implementation: &str) -> Result<MethodTable> {
        let kind = self.kind_of(implementation)?;
        let table = table_for(&self.mappings, kind).ok_or(Error::MissingMapping(kind))?;
        MethodTable::new(kind, table.iter())
    }

    /// The method names a checker format expects for `kind`.
    pub fn vocabulary(&self, format: Format, kind: ObjectKind) -> Result<Vocabulary> {
        let names = match format {
            Format::Interval => &self.encoders.interval,
            Format::Bracket | Format::Edn => &self.encoders.trace,
        };
        match table_for(names, kind) {
            Some(table) => Vocabulary::new(kind, table.iter()),
            None => Ok(Vocabulary::canonical()),
        }
    }
}

/// Parses every key of a kind-keyed section, rejecting two spellings of one kind.
fn by_kind<'a, T>(
    section: &str,
    tables: &'a BTreeMap<String, T>,
) -> Result<Vec<(ObjectKind, &'a T)>> {
    let mut parsed: Vec<(ObjectKind, &T)> = Vec::with_capacity(tables.len());
    for (name, table) in tables {
        let kind: ObjectKind = name.parse()?;
        if parsed.iter().any(|(seen, _)| *seen == kind) {
            return Err(Error::InvalidConfig(format!(
                "[{}] configures {} more than once",
                section, kind
            )));
        }
        parsed.push((kind, table));
    }
    Ok(parsed)
}

fn table_for<T>(tables: &BTreeMap<String, T>, kind: ObjectKind) -> Option<&T> {
    tables
        .iter()
        .find(|(name, _)| name.parse::<ObjectKind>().ok() == Some(kind))
        .map(|(_, table)| table)
}
