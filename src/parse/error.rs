use thiserror::Error;

/// Errors produced when turning rule text into a [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error: rule is empty")]
    Empty,

    #[error("parse error at offset {offset}: {message}")]
    Lexical { offset: usize, message: String },

    #[error("parse error: condition on '{attribute}' needs an operator and a value")]
    IncompleteCondition { attribute: String },

    #[error("parse error: unbalanced parentheses")]
    UnbalancedParens,

    #[error("parse error: '{operator}' is missing an operand")]
    MissingOperand { operator: String },

    #[error("parse error: invalid AST structure ({remaining} disconnected sub-trees)")]
    InvalidStructure { remaining: usize },

    #[error("parse error: rule nests deeper than {max} operator levels")]
    TooDeep { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::IncompleteCondition {
            attribute: "age".into(),
        };
        assert_eq!(
            err.to_string(),
            "parse error: condition on 'age' needs an operator and a value"
        );
    }

    #[test]
    fn invalid_structure_display() {
        let err = ParseError::InvalidStructure { remaining: 2 };
        assert_eq!(
            err.to_string(),
            "parse error: invalid AST structure (2 disconnected sub-trees)"
        );
    }
}
