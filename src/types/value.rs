use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::CompareOp;
use super::schema::AttributeType;

/// A value held in a [`Record`](super::Record) or produced from a rule literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Any numeric value. Integers are widened to `f64`.
    Number(f64),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Build a value of the given declared type from a literal taken out of a
    /// condition string. Returns `None` when a `number` literal does not parse
    /// to a finite number.
    #[must_use]
    pub fn from_literal(ty: AttributeType, literal: &str) -> Option<Value> {
        match ty {
            AttributeType::Number => parse_number(literal).map(Value::Number),
            AttributeType::String => Some(Value::String(literal.to_owned())),
        }
    }

    /// Compare this record value to a rule literal.
    ///
    /// Comparison is loose: the record value is coerced into the literal's
    /// type first (`"35"` equals `35`, `30` equals `"30"`). A value that cannot
    /// be coerced compares unequal and unordered, so every operator except
    /// `!=` yields `false`.
    #[must_use]
    pub fn compare(&self, op: CompareOp, literal: &Value) -> bool {
        let ord = self.loose_cmp(literal);
        match op {
            CompareOp::Eq => ord == Some(Ordering::Equal),
            CompareOp::Neq => ord != Some(Ordering::Equal),
            CompareOp::Gt => ord == Some(Ordering::Greater),
            CompareOp::Gte => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            CompareOp::Lt => ord == Some(Ordering::Less),
            CompareOp::Lte => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        }
    }

    fn loose_cmp(&self, literal: &Value) -> Option<Ordering> {
        match (self, literal) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::String(a), Value::Number(b)) => parse_number(a)?.partial_cmp(b),
            (Value::Number(a), Value::String(b)) => Some(a.to_string().as_str().cmp(b.as_str())),
        }
    }

    /// The [`AttributeType`] this value naturally belongs to.
    #[must_use]
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Value::Number(_) => AttributeType::Number,
            Value::String(_) => AttributeType::String,
        }
    }
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}
