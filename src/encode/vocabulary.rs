use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::history::{Method, ObjectKind};

/// The names a particular checker uses for canonical methods.
///
/// Methods without an override keep their canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    names: HashMap<Method, String>,
}

impl Vocabulary {
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Builds overrides from `canonical name -> checker name` pairs for `kind`.
    ///
    /// Every method of `kind` must end up with a distinct name, counting the
    /// canonical names of methods left without an override.
    pub fn new<I, K, V>(kind: ObjectKind, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut names = HashMap::new();
        for (canonical, name) in entries {
            let name: String = name.into();
            let method = Method::parse(kind, canonical.as_ref()).ok_or_else(|| {
                Error::InvalidMapping {
                    kind,
                    token: canonical.as_ref().to_owned(),
                    target: name.clone(),
                }
            })?;
            names.insert(method, name);
        }
        let vocabulary = Vocabulary { names };

        let methods = kind.methods();
        for (i, first) in methods.iter().enumerate() {
            let name = vocabulary.name(*first);
            if let Some(second) = methods[i + 1..].iter().find(|m| vocabulary.name(**m) == name) {
                return Err(Error::AmbiguousName {
                    kind,
                    name: name.to_owned(),
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(vocabulary)
    }

    pub fn name(&self, method: Method) -> &str {
        self.names
            .get(&method)
            .map(String::as_str)
            .unwrap_or_else(|| method.name())
    }

    /// Inverse lookup for decoders.
    pub fn method(&self, kind: ObjectKind, name: &str) -> Option<Method> {
        kind.methods()
            .iter()
            .copied()
            .find(|m| self.name(*m) == name)
    }
}
