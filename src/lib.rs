//! A boolean rule engine for eligibility conditions.
//!
//! Rule text such as `age > 30 AND department = "Sales"` is compiled into a
//! [`Node`] tree, checked against a [`Schema`], stored under a name, and later
//! evaluated against [`Record`]s. Several stored rules can be OR-combined into
//! a new one.
//!
//! ```
//! use ruletree::{compile, evaluate, AttributeType, FunctionRegistry, Record, Schema};
//!
//! let schema = Schema::builder()
//!     .attribute("age", AttributeType::Number)
//!     .attribute("department", AttributeType::String)
//!     .attribute("experience", AttributeType::Number)
//!     .build();
//! let functions = FunctionRegistry::new();
//!
//! let ast = compile(r#"(age > 30 AND department = "Sales") OR experience > 10"#).unwrap();
//! ruletree::validate(&ast, &schema, &functions).unwrap();
//!
//! let record = Record::new()
//!     .set("age", 25_i64)
//!     .set("department", "Sales")
//!     .set("experience", 15_i64);
//! assert!(evaluate(&ast, &record, &schema, &functions).unwrap());
//! ```

mod combine;
mod engine;
mod error;
mod evaluate;
pub mod parse;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod service;
pub mod store;
mod types;
mod validate;

pub use combine::{combine, combined_name, Combined};
pub use engine::{Engine, EngineBuilder};
pub use error::RuleTreeError;
pub use evaluate::{evaluate, evaluate_batch};
pub use parse::{compile, tokenize, ParseError};
pub use service::RuleService;
pub use store::{MemoryStore, RuleStore, StoreError};
pub use types::{
    AttributeType, BatchReport, BoolOp, CombineError, CompareOp, Condition, ConfigError,
    EvaluationError, FunctionRegistry, Node, Record, Rule, RuleFn, RuleOutcome, Schema,
    SchemaBuilder, ValidationError, Value,
};
pub use validate::validate;

#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
