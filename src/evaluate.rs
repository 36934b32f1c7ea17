use std::num::NonZeroUsize;
use std::thread;

use tracing::{debug, warn};

use crate::{
    BatchReport, BoolOp, CompareOp, Condition, EvaluationError, FunctionRegistry, Node, Record,
    RuleOutcome, Schema, Value,
};

/// Batches at or above this size are spread across worker threads.
const PARALLEL_THRESHOLD: usize = 64;

/// Evaluate a tree against a record.
///
/// Both children of every operator are evaluated, so an error anywhere in the
/// tree surfaces even when the other side already decides the result.
///
/// # Errors
///
/// Returns [`EvaluationError`] if an operand names an attribute unknown to
/// the schema or absent from the record, uses an unknown operator, carries an
/// unparseable number, or calls an unregistered function. Trees deeper than
/// [`Node::MAX_DEPTH`] fail with [`EvaluationError::TooDeep`].
pub fn evaluate(
    node: &Node,
    record: &Record,
    schema: &Schema,
    functions: &FunctionRegistry,
) -> Result<bool, EvaluationError> {
    eval_node(node, record, schema, functions, 0)
}

fn eval_node(
    node: &Node,
    record: &Record,
    schema: &Schema,
    functions: &FunctionRegistry,
    level: usize,
) -> Result<bool, EvaluationError> {
    match node {
        Node::Operand(condition) => eval_operand(condition, record, schema, functions),
        Node::Operator { op, left, right } => {
            if level >= Node::MAX_DEPTH {
                return Err(EvaluationError::TooDeep {
                    max: Node::MAX_DEPTH,
                });
            }
            let left = eval_node(left, record, schema, functions, level + 1)?;
            let right = eval_node(right, record, schema, functions, level + 1)?;
            Ok(match op {
                BoolOp::And => left && right,
                BoolOp::Or => left || right,
            })
        }
    }
}

fn eval_operand(
    condition: &str,
    record: &Record,
    schema: &Schema,
    functions: &FunctionRegistry,
) -> Result<bool, EvaluationError> {
    let parsed = Condition::parse(condition).ok_or_else(|| EvaluationError::MalformedCondition {
        condition: condition.to_owned(),
    })?;

    match parsed {
        Condition::Call { name, .. } => {
            let f = functions
                .get(name)
                .ok_or_else(|| EvaluationError::UndefinedFunction {
                    name: name.to_owned(),
                })?;
            Ok(f(record))
        }
        Condition::Compare {
            attribute,
            operator,
            literal,
        } => {
            let ty = schema
                .attribute_type(attribute)
                .ok_or_else(|| EvaluationError::UnknownAttribute {
                    attribute: attribute.to_owned(),
                })?;
            let actual = record
                .get(attribute)
                .ok_or_else(|| EvaluationError::MissingData {
                    attribute: attribute.to_owned(),
                })?;
            let op: CompareOp =
                operator
                    .parse()
                    .map_err(|()| EvaluationError::UnknownOperator {
                        operator: operator.to_owned(),
                    })?;
            let expected = Value::from_literal(ty, literal).ok_or_else(|| {
                EvaluationError::InvalidNumber {
                    attribute: attribute.to_owned(),
                    literal: literal.to_owned(),
                }
            })?;
            Ok(actual.compare(op, &expected))
        }
    }
}

/// Evaluate one record against many named trees.
///
/// A rule that fails to evaluate is recorded as not passed together with its
/// error message; the remaining rules still run. Large batches are split
/// across scoped worker threads, results keep input order.
pub fn evaluate_batch<'a, I>(
    rules: I,
    record: &Record,
    schema: &Schema,
    functions: &FunctionRegistry,
) -> BatchReport
where
    I: IntoIterator<Item = (&'a str, &'a Node)>,
{
    let rules: Vec<(&str, &Node)> = rules.into_iter().collect();
    let eval_one = |&(name, node): &(&str, &Node)| match evaluate(node, record, schema, functions)
    {
        Ok(passed) => RuleOutcome::passed(name, passed),
        Err(err) => {
            warn!(rule = name, error = %err, "rule evaluation failed");
            RuleOutcome::failed(name, err)
        }
    };

    let outcomes: Vec<RuleOutcome> = if rules.len() < PARALLEL_THRESHOLD {
        rules.iter().map(eval_one).collect()
    } else {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = rules.len().div_ceil(workers);
        debug!(rules = rules.len(), workers, "evaluating batch in parallel");
        thread::scope(|s| {
            let handles: Vec<_> = rules
                .chunks(chunk_size)
                .map(|chunk| s.spawn(move || chunk.iter().map(eval_one).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    };

    BatchReport::new(outcomes)
}
