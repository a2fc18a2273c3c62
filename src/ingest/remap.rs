use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::history::{History, Method, ObjectKind, Operation, EMPTY_VALUE};

use super::pairing::RawOperation;

/// A validated token -> canonical method table for one object kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTable {
    kind: ObjectKind,
    methods: BTreeMap<String, Method>,
}

impl MethodTable {
    /// Builds a table, rejecting empty tables and targets outside `kind`'s vocabulary.
    pub fn new<I, K, V>(kind: ObjectKind, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut methods = BTreeMap::new();
        for (token, target) in entries {
            let token: String = token.into();
            let method = Method::parse(kind, target.as_ref()).ok_or_else(|| Error::InvalidMapping {
                kind,
                token: token.clone(),
                target: target.as_ref().to_owned(),
            })?;
            methods.insert(token, method);
        }
        if methods.is_empty() {
            return Err(Error::MissingMapping(kind));
        }
        Ok(MethodTable { kind, methods })
    }

    /// Maps every canonical method name of `kind` to itself.
    pub fn canonical(kind: ObjectKind) -> Self {
        let methods = kind
            .methods()
            .iter()
            .map(|m| (m.name().to_owned(), *m))
            .collect();
        MethodTable { kind, methods }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn get(&self, token: &str) -> Option<Method> {
        self.methods.get(token).copied()
    }
}

/// Rewrites raw operations into a canonical [`History`].
#[derive(Debug, Clone)]
pub struct Remapper {
    table: MethodTable,
}

impl Remapper {
    pub fn new(table: MethodTable) -> Self {
        Remapper { table }
    }

    /// Translates every token, substituting [`EMPTY_VALUE`] for missing values.
    /// The first unknown token aborts the whole history.
    pub fn remap(&self, raw: &[RawOperation]) -> Result<History> {
        let kind = self.table.kind();
        let operations = raw
            .iter()
            .enumerate()
            .map(|(index, op)| -> Result<Operation> {
                let method = self.table.get(&op.token).ok_or_else(|| Error::UnknownToken {
                    index: index + 1,
                    token: op.token.clone(),
                    kind,
                })?;
                Ok(Operation::new(
                    op.process_id,
                    method,
                    op.value.unwrap_or(EMPTY_VALUE),
                    op.invocation,
                    op.response,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(kind = %kind, operations = operations.len(), "remapped operations");
        History::new(kind, operations)
    }
}
