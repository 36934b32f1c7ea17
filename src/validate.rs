use crate::types::parse_number;
use crate::{
    AttributeType, CompareOp, Condition, FunctionRegistry, Node, Schema, ValidationError,
};

/// Check that every operand of `node` conforms to `schema`.
///
/// Comparisons must name a known attribute, use one of `> < >= <= = !=`, and
/// carry a literal of the attribute's declared type (a finite number, or a
/// non-empty string). Calls must name a function present in `functions`.
/// Both sides of every operator are checked; the first failure is returned.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, left subtree first, or
/// [`ValidationError::TooDeep`] for a tree deeper than [`Node::MAX_DEPTH`].
pub fn validate(
    node: &Node,
    schema: &Schema,
    functions: &FunctionRegistry,
) -> Result<(), ValidationError> {
    validate_node(node, schema, functions, 0)
}

fn validate_node(
    node: &Node,
    schema: &Schema,
    functions: &FunctionRegistry,
    level: usize,
) -> Result<(), ValidationError> {
    match node {
        Node::Operand(condition) => validate_operand(condition, schema, functions),
        Node::Operator { left, right, .. } => {
            if level >= Node::MAX_DEPTH {
                return Err(ValidationError::TooDeep {
                    max: Node::MAX_DEPTH,
                });
            }
            let left = validate_node(left, schema, functions, level + 1);
            let right = validate_node(right, schema, functions, level + 1);
            left.and(right)
        }
    }
}

fn validate_operand(
    condition: &str,
    schema: &Schema,
    functions: &FunctionRegistry,
) -> Result<(), ValidationError> {
    let parsed = Condition::parse(condition).ok_or_else(|| ValidationError::MalformedCondition {
        condition: condition.to_owned(),
    })?;

    let (attribute, operator, literal) = match parsed {
        Condition::Call { name, .. } => {
            return if functions.contains(name) {
                Ok(())
            } else {
                Err(ValidationError::UndefinedFunction {
                    name: name.to_owned(),
                })
            };
        }
        Condition::Compare {
            attribute,
            operator,
            literal,
        } => (attribute, operator, literal),
    };

    let ty = schema
        .attribute_type(attribute)
        .ok_or_else(|| ValidationError::UnknownAttribute {
            attribute: attribute.to_owned(),
        })?;

    if operator.parse::<CompareOp>().is_err() {
        return Err(ValidationError::UnknownOperator {
            operator: operator.to_owned(),
            condition: condition.to_owned(),
        });
    }

    match ty {
        AttributeType::Number if parse_number(literal).is_none() => {
            Err(ValidationError::ExpectedNumber {
                attribute: attribute.to_owned(),
                literal: literal.to_owned(),
            })
        }
        AttributeType::String if literal.is_empty() => Err(ValidationError::EmptyString {
            attribute: attribute.to_owned(),
        }),
        AttributeType::Number | AttributeType::String => Ok(()),
    }
}
