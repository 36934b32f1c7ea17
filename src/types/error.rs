use thiserror::Error;

/// A tree that does not conform to the [`Schema`](super::Schema) or to the
/// AST shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },

    #[error("invalid comparison operator '{operator}' in condition '{condition}'")]
    UnknownOperator { operator: String, condition: String },

    #[error("invalid boolean operator '{operator}'")]
    UnknownBooleanOperator { operator: String },

    #[error("attribute '{attribute}' expects a number, got '{literal}'")]
    ExpectedNumber { attribute: String, literal: String },

    #[error("attribute '{attribute}' expects a non-empty string")]
    EmptyString { attribute: String },

    #[error("malformed condition '{condition}'")]
    MalformedCondition { condition: String },

    #[error("undefined function '{name}'")]
    UndefinedFunction { name: String },

    #[error("unknown node kind '{kind}'")]
    UnknownNodeKind { kind: String },

    #[error("operator node '{operator}' is missing a child")]
    MissingChild { operator: String },

    #[error("operand node '{condition}' must not have children")]
    OperandWithChildren { condition: String },

    #[error("tree is deeper than {max} operator levels")]
    TooDeep { max: usize },
}

/// Failure while evaluating a tree against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("missing data for attribute '{attribute}'")]
    MissingData { attribute: String },

    #[error("unknown attribute '{attribute}'")]
    UnknownAttribute { attribute: String },

    #[error("unknown operator '{operator}'")]
    UnknownOperator { operator: String },

    #[error("undefined function '{name}'")]
    UndefinedFunction { name: String },

    #[error("literal '{literal}' is not a valid number for attribute '{attribute}'")]
    InvalidNumber { attribute: String, literal: String },

    #[error("malformed condition '{condition}'")]
    MalformedCondition { condition: String },

    #[error("tree is deeper than {max} operator levels")]
    TooDeep { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("at least one rule is required to combine")]
    Empty,

    #[error("combined tree would be deeper than {max} operator levels")]
    TooDeep { max: usize },
}

/// Failure loading configuration such as a [`Schema`](super::Schema) file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_attribute_message() {
        let err = ValidationError::UnknownAttribute {
            attribute: "foo".into(),
        };
        assert_eq!(err.to_string(), "unknown attribute 'foo'");
    }

    #[test]
    fn expected_number_message() {
        let err = ValidationError::ExpectedNumber {
            attribute: "age".into(),
            literal: "old".into(),
        };
        assert_eq!(err.to_string(), "attribute 'age' expects a number, got 'old'");
    }

    #[test]
    fn unknown_operator_message() {
        let err = ValidationError::UnknownOperator {
            operator: "==".into(),
            condition: "age == 5".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid comparison operator '==' in condition 'age == 5'"
        );
    }

    #[test]
    fn missing_data_message() {
        let err = EvaluationError::MissingData {
            attribute: "salary".into(),
        };
        assert_eq!(err.to_string(), "missing data for attribute 'salary'");
    }

    #[test]
    fn undefined_function_message() {
        let err = EvaluationError::UndefinedFunction {
            name: "is_vip".into(),
        };
        assert_eq!(err.to_string(), "undefined function 'is_vip'");
    }

    #[test]
    fn combine_empty_message() {
        assert_eq!(
            CombineError::Empty.to_string(),
            "at least one rule is required to combine"
        );
    }
}
