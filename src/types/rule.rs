use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::Node;

/// A named, stored rule.
///
/// Persisted as `{name, ast, createdAt}`. The tree is only ever replaced
/// whole; see [`RuleStore::update_by_name`](crate::RuleStore::update_by_name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    pub ast: Node,
    pub created_at: DateTime<Utc>,
}

impl Rule {
    /// Create a rule stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, ast: Node) -> Self {
        Self {
            name: name.into(),
            ast,
            created_at: Utc::now(),
        }
    }
}
