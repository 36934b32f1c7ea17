mod error;
mod functions;
mod node;
mod record;
mod report;
mod rule;
mod schema;
mod value;

pub use error::{CombineError, ConfigError, EvaluationError, ValidationError};
pub use functions::{FunctionRegistry, RuleFn};
pub use node::{BoolOp, CompareOp, Condition, Node};
pub use record::Record;
pub use report::{BatchReport, RuleOutcome};
pub use rule::Rule;
pub use schema::{AttributeType, Schema, SchemaBuilder};
pub use value::Value;

pub(crate) use value::parse_number;
