use thiserror::Error;

use crate::parse::ParseError;
use crate::store::StoreError;
use crate::{CombineError, ConfigError, EvaluationError, ValidationError};

/// Unified error type covering every stage from rule text to storage.
///
/// Returned by [`RuleService`](crate::RuleService) operations and
/// [`Engine::compile_checked()`](crate::Engine::compile_checked). Match on the
/// variant to tell bad input ([`Parse`](Self::Parse),
/// [`Validation`](Self::Validation)) apart from storage conditions
/// ([`Store`](Self::Store)).
#[derive(Debug, Error)]
pub enum RuleTreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}

impl RuleTreeError {
    /// Whether the error was caused by the caller's rule text or tree.
    #[must_use]
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            RuleTreeError::Parse(_) | RuleTreeError::Validation(_) | RuleTreeError::Combine(_)
        )
    }

    /// Whether the error reports a missing rule.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RuleTreeError::Store(StoreError::NotFound { .. } | StoreError::MissingRules { .. })
        )
    }
}
