use crate::combine::Combined;
use crate::error::RuleTreeError;
use crate::parse::ParseError;
use crate::{
    BatchReport, CombineError, EvaluationError, FunctionRegistry, Node, Record, Rule, Schema,
    ValidationError,
};

/// Builder for an [`Engine`].
///
/// # Example
///
/// ```
/// use ruletree::{AttributeType, EngineBuilder, Record, Schema, Value};
///
/// let engine = EngineBuilder::new()
///     .schema(
///         Schema::builder()
///             .attribute("age", AttributeType::Number)
///             .attribute("department", AttributeType::String)
///             .build(),
///     )
///     .function("is_sales", |r| r.get("department") == Some(&Value::from("Sales")))
///     .build();
///
/// let ast = engine.compile_checked(r#"age > 30 AND department = "Sales""#).unwrap();
/// let record = Record::new().set("age", 35_i64).set("department", "Sales");
/// assert!(engine.evaluate(&ast, &record).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct EngineBuilder {
    schema: Schema,
    functions: FunctionRegistry,
}

impl EngineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Register a single function callable as `name(...)` from rule text.
    #[must_use]
    pub fn function(
        mut self,
        name: &str,
        f: impl Fn(&Record) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.functions = self.functions.register(name, f);
        self
    }

    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            schema: self.schema,
            functions: self.functions,
        }
    }
}

/// Schema and function registry bundled with the compile, validate and
/// evaluate operations that need them.
///
/// An `Engine` is immutable and `Send + Sync`; wrap it in an `Arc` to share it
/// across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    schema: Schema,
    functions: FunctionRegistry,
}

impl Engine {
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Parse rule text without schema checks.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed text.
    pub fn compile(&self, rule: &str) -> Result<Node, ParseError> {
        crate::compile(rule)
    }

    /// Parse rule text and validate the result against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`RuleTreeError::Parse`] or [`RuleTreeError::Validation`].
    pub fn compile_checked(&self, rule: &str) -> Result<Node, RuleTreeError> {
        let node = self.compile(rule)?;
        self.validate(&node)?;
        Ok(node)
    }

    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in the tree.
    pub fn validate(&self, node: &Node) -> Result<(), ValidationError> {
        crate::validate(node, &self.schema, &self.functions)
    }

    /// # Errors
    ///
    /// Returns [`EvaluationError`] when the record or tree cannot be evaluated.
    pub fn evaluate(&self, node: &Node, record: &Record) -> Result<bool, EvaluationError> {
        crate::evaluate(node, record, &self.schema, &self.functions)
    }

    /// Evaluate every rule against `record`; see [`evaluate_batch`](crate::evaluate_batch).
    pub fn evaluate_batch<'a, I>(&self, rules: I, record: &Record) -> BatchReport
    where
        I: IntoIterator<Item = (&'a str, &'a Node)>,
    {
        crate::evaluate_batch(rules, record, &self.schema, &self.functions)
    }

    /// Evaluate stored rules in the order given.
    pub fn evaluate_rules(&self, rules: &[Rule], record: &Record) -> BatchReport {
        self.evaluate_batch(rules.iter().map(|r| (r.name.as_str(), &r.ast)), record)
    }

    /// OR-fold stored rules into a new tree; see [`combine`](crate::combine).
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::Empty`] for an empty slice, or
    /// [`CombineError::TooDeep`] if the fold exceeds [`Node::MAX_DEPTH`].
    pub fn combine(&self, rules: &[Rule]) -> Result<Combined, CombineError> {
        crate::combine(rules.iter().map(|r| (r.name.as_str(), &r.ast)))
    }
}
