use std::fmt;

use serde::Serialize;

/// Outcome of one rule inside a batch evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct RuleOutcome {
    rule_name: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl RuleOutcome {
    pub fn passed(rule_name: impl Into<String>, passed: bool) -> Self {
        Self {
            rule_name: rule_name.into(),
            passed,
            error: None,
        }
    }

    pub fn failed(rule_name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            rule_name: rule_name.into(),
            passed: false,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Whether the rule evaluated to `true`. Always `false` when
    /// [`error`](Self::error) is set.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "{} = error: {err}", self.rule_name),
            None => write!(f, "{} = {}", self.rule_name, self.passed),
        }
    }
}

/// Result of checking one record against many rules.
///
/// `is_eligible` is the conjunction of every outcome; a rule that failed to
/// evaluate counts as not passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct BatchReport {
    is_eligible: bool,
    results: Vec<RuleOutcome>,
}

impl BatchReport {
    pub(crate) fn new(results: Vec<RuleOutcome>) -> Self {
        let is_eligible = results.iter().all(RuleOutcome::is_passed);
        Self {
            is_eligible,
            results,
        }
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.is_eligible
    }

    /// Per-rule outcomes, in input order.
    #[must_use]
    pub fn results(&self) -> &[RuleOutcome] {
        &self.results
    }

    #[must_use]
    pub fn get(&self, rule_name: &str) -> Option<&RuleOutcome> {
        self.results.iter().find(|o| o.rule_name == rule_name)
    }

    /// Outcomes that carry an evaluation error.
    pub fn errors(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.results.iter().filter(|o| o.error.is_some())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eligible: {}", self.is_eligible)?;
        let parts: Vec<String> = self.results.iter().map(ToString::to_string).collect();
        write!(f, ", results: [{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_when_all_pass() {
        let report = BatchReport::new(vec![
            RuleOutcome::passed("r1", true),
            RuleOutcome::passed("r2", true),
        ]);
        assert!(report.is_eligible());
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn error_counts_as_not_passed() {
        let report = BatchReport::new(vec![
            RuleOutcome::passed("r1", true),
            RuleOutcome::failed("r2", "missing data for attribute 'salary'"),
        ]);
        assert!(!report.is_eligible());
        let r2 = report.get("r2").unwrap();
        assert!(!r2.is_passed());
        assert_eq!(r2.error(), Some("missing data for attribute 'salary'"));
    }

    #[test]
    fn empty_report_is_eligible() {
        assert!(BatchReport::new(Vec::new()).is_eligible());
    }

    #[test]
    fn display() {
        let report = BatchReport::new(vec![
            RuleOutcome::passed("r1", false),
            RuleOutcome::failed("r2", "boom"),
        ]);
        assert_eq!(
            report.to_string(),
            "eligible: false, results: [r1 = false, r2 = error: boom]"
        );
    }

    #[test]
    fn serializes_camel_case() {
        let report = BatchReport::new(vec![RuleOutcome::passed("r1", true)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isEligible"], true);
        assert_eq!(json["results"][0]["ruleName"], "r1");
        assert_eq!(json["results"][0]["passed"], true);
        assert!(json["results"][0].get("error").is_none());
    }
}
