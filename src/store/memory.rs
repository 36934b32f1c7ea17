use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use super::{RuleStore, StoreError};
use crate::{Node, Rule};

/// In-process [`RuleStore`] backed by a sharded concurrent map.
///
/// Insert-if-absent goes through the map's entry API, so two concurrent
/// creates of the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: DashMap<String, Rule>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }
}

impl RuleStore for MemoryStore {
    fn find_by_name(&self, name: &str) -> Option<Rule> {
        self.rules.get(name).map(|r| r.value().clone())
    }

    fn find_by_names(&self, names: &[&str]) -> Vec<Rule> {
        let mut seen = Vec::with_capacity(names.len());
        names
            .iter()
            .filter(|name| {
                if seen.contains(*name) {
                    false
                } else {
                    seen.push(**name);
                    true
                }
            })
            .filter_map(|name| self.find_by_name(name))
            .collect()
    }

    fn find_all(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.rules.iter().map(|r| r.value().clone()).collect();
        rules.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        rules
    }

    fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.iter().map(|r| r.key().clone()).collect();
        names.sort_unstable();
        names
    }

    fn insert_if_absent(&self, rule: Rule) -> Result<Rule, StoreError> {
        match self.rules.entry(rule.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateName { name: rule.name }),
            Entry::Vacant(slot) => {
                info!(rule = %rule.name, "rule stored");
                slot.insert(rule.clone());
                Ok(rule)
            }
        }
    }

    fn update_by_name(&self, name: &str, ast: Node) -> Result<Rule, StoreError> {
        let mut entry = self
            .rules
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_owned(),
            })?;
        entry.ast = ast;
        info!(rule = name, "rule updated");
        Ok(entry.clone())
    }

    fn delete_by_name(&self, name: &str) -> Result<(), StoreError> {
        match self.rules.remove(name) {
            Some(_) => {
                info!(rule = name, "rule deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(feature = "binary-cache")]
impl MemoryStore {
    /// Serialize every stored rule into a checksummed binary snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(&self.find_all())
    }

    /// Rebuild a store from a snapshot produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes).map(Self::from_rules)
    }

    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
