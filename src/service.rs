use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::error::RuleTreeError;
use crate::store::{RuleStore, StoreError};
use crate::{BatchReport, Engine, Record, Rule};

/// Rule management operations over an [`Engine`] and a [`RuleStore`].
///
/// Every rule text is compiled and validated before it reaches the store,
/// so stored trees are always schema-conformant at the time they were written.
#[derive(Debug)]
pub struct RuleService<S> {
    engine: Engine,
    store: S,
}

impl<S: RuleStore> RuleService<S> {
    pub fn new(engine: Engine, store: S) -> Self {
        Self { engine, store }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compile, validate and store a new rule.
    ///
    /// # Errors
    ///
    /// Parse and validation failures, or [`StoreError::DuplicateName`].
    #[instrument(skip(self, rule_text))]
    pub fn create_rule(&self, name: &str, rule_text: &str) -> Result<Rule, RuleTreeError> {
        let ast = self.engine.compile_checked(rule_text).inspect_err(|e| {
            warn!(error = %e, "rejected rule text");
        })?;
        let rule = self.store.insert_if_absent(Rule::new(name, ast))?;
        info!(operands = rule.ast.operand_count(), "rule created");
        Ok(rule)
    }

    /// OR-combine stored rules, in the order named, into a new stored rule
    /// called `"Combined: A + B + ..."`.
    ///
    /// # Errors
    ///
    /// [`CombineError`](crate::CombineError) for no names or a result deeper
    /// than [`Node::MAX_DEPTH`](crate::Node::MAX_DEPTH),
    /// [`StoreError::MissingRules`] if any name is unknown, or
    /// [`StoreError::DuplicateName`] if the combination already exists.
    #[instrument(skip(self))]
    pub fn combine_rules(&self, names: &[&str]) -> Result<Rule, RuleTreeError> {
        let rules = self.resolve(names)?;
        let combined = self.engine.combine(&rules)?;
        let rule = self
            .store
            .insert_if_absent(Rule::new(combined.name, combined.ast))?;
        info!(rule = %rule.name, "combined rule created");
        Ok(rule)
    }

    /// Evaluate one stored rule.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] or an [`EvaluationError`](crate::EvaluationError).
    #[instrument(skip(self, record))]
    pub fn evaluate_rule(&self, name: &str, record: &Record) -> Result<bool, RuleTreeError> {
        let rule = self.get_rule(name)?;
        Ok(self.engine.evaluate(&rule.ast, record)?)
    }

    /// Evaluate every stored rule; eligible only if all pass.
    #[instrument(skip_all)]
    pub fn evaluate_all(&self, record: &Record) -> BatchReport {
        let rules = self.store.find_all();
        let report = self.engine.evaluate_rules(&rules, record);
        info!(
            rules = rules.len(),
            eligible = report.is_eligible(),
            "evaluated all rules"
        );
        report
    }

    /// Replace a stored rule's tree with one compiled from new text.
    ///
    /// # Errors
    ///
    /// Parse and validation failures, or [`StoreError::NotFound`].
    #[instrument(skip(self, rule_text))]
    pub fn modify_rule(&self, name: &str, rule_text: &str) -> Result<Rule, RuleTreeError> {
        let ast = self.engine.compile_checked(rule_text)?;
        Ok(self.store.update_by_name(name, ast)?)
    }

    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no rule has this name.
    pub fn get_rule(&self, name: &str) -> Result<Rule, RuleTreeError> {
        self.store.find_by_name(name).ok_or_else(|| {
            StoreError::NotFound {
                name: name.to_owned(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn list_rules(&self) -> Vec<String> {
        self.store.list_names()
    }

    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no rule has this name.
    #[instrument(skip(self))]
    pub fn delete_rule(&self, name: &str) -> Result<(), RuleTreeError> {
        Ok(self.store.delete_by_name(name)?)
    }

    /// Look up every name and return the rules in request order.
    fn resolve(&self, names: &[&str]) -> Result<Vec<Rule>, RuleTreeError> {
        let found: HashMap<String, Rule> = self
            .store
            .find_by_names(names)
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();

        let mut missing: Vec<String> = Vec::new();
        for name in names {
            if !found.contains_key(*name) && !missing.iter().any(|m| m == name) {
                missing.push((*name).to_owned());
            }
        }
        if !missing.is_empty() {
            return Err(StoreError::MissingRules { missing }.into());
        }

        Ok(names.iter().map(|n| found[*n].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{AttributeType, EngineBuilder, Schema};

    fn service() -> RuleService<MemoryStore> {
        let engine = EngineBuilder::new()
            .schema(
                Schema::builder()
                    .attribute("age", AttributeType::Number)
                    .attribute("department", AttributeType::String)
                    .build(),
            )
            .build();
        RuleService::new(engine, MemoryStore::new())
    }

    #[test]
    fn create_then_get() {
        let svc = service();
        svc.create_rule("adults", "age >= 18").unwrap();
        let rule = svc.get_rule("adults").unwrap();
        assert_eq!(rule.ast.to_string(), "age >= 18");
    }

    #[test]
    fn create_rejects_invalid_rule_without_storing() {
        let svc = service();
        let err = svc.create_rule("bad", "height > 3").unwrap_err();
        assert!(err.is_bad_input());
        assert!(svc.list_rules().is_empty());
    }

    #[test]
    fn resolve_preserves_request_order() {
        let svc = service();
        svc.create_rule("A", "age > 1").unwrap();
        svc.create_rule("B", "age > 2").unwrap();
        let rules = svc.resolve(&["B", "A"]).unwrap();
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn resolve_reports_missing_names() {
        let svc = service();
        svc.create_rule("A", "age > 1").unwrap();
        let err = svc.resolve(&["A", "X", "Y"]).unwrap_err();
        assert!(matches!(
            err,
            RuleTreeError::Store(StoreError::MissingRules { ref missing })
                if missing == &["X".to_owned(), "Y".to_owned()]
        ));
    }

    #[test]
    fn get_missing_is_not_found() {
        let err = service().get_rule("nope").unwrap_err();
        assert!(err.is_not_found());
    }
}
