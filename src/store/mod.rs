//! Keyed storage for named rules.
//!
//! [`RuleStore`] is the interface the rest of the crate needs from a
//! persistence layer. [`MemoryStore`] implements it in process.

mod memory;

use thiserror::Error;

use crate::{Node, Rule};

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a rule named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("rule '{name}' not found")]
    NotFound { name: String },

    #[error("rules not found: {}", missing.join(", "))]
    MissingRules { missing: Vec<String> },
}

/// Durable storage for [`Rule`]s keyed by name.
///
/// Implementations own name uniqueness: [`insert_if_absent`](Self::insert_if_absent)
/// must check and insert as one atomic step.
pub trait RuleStore: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<Rule>;

    /// Every stored rule whose name is in `names`, in no particular order.
    /// Absent names are skipped; callers compare counts to detect them.
    fn find_by_names(&self, names: &[&str]) -> Vec<Rule>;

    /// All stored rules, oldest first.
    fn find_all(&self) -> Vec<Rule>;

    /// Names of all stored rules, sorted.
    fn list_names(&self) -> Vec<String>;

    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateName`] if the name is taken.
    fn insert_if_absent(&self, rule: Rule) -> Result<Rule, StoreError>;

    /// Replace the tree of an existing rule, keeping its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no rule has this name.
    fn update_by_name(&self, name: &str, ast: Node) -> Result<Rule, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no rule has this name.
    fn delete_by_name(&self, name: &str) -> Result<(), StoreError>;
}
