use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Comparison operators permitted inside an operand condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Boolean connectives joining two sub-trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// A rule AST.
///
/// Operands are leaves holding the raw condition text (`age > 30`,
/// `department = "Sales"` or a call such as `is_manager(dept)`); operators own
/// exactly two children. Serialized form is `{kind, value, left, right}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredNode", try_from = "StoredNode")]
pub enum Node {
    Operand(String),
    Operator {
        op: BoolOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// An operand condition split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    /// `attribute operator literal`. The literal has one layer of matching
    /// quotes removed.
    Compare {
        attribute: &'a str,
        operator: &'a str,
        literal: &'a str,
    },
    /// `name(args)`. The argument text is opaque.
    Call { name: &'a str, args: &'a str },
}

impl FromStr for CompareOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Neq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Gte),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Lte),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl BoolOp {
    /// Match a rule-text keyword, case-insensitively.
    #[must_use]
    pub fn from_keyword(token: &str) -> Option<BoolOp> {
        if token.eq_ignore_ascii_case("AND") {
            Some(BoolOp::And)
        } else if token.eq_ignore_ascii_case("OR") {
            Some(BoolOp::Or)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// Deepest tree, in operator levels, that compiling, combining or loading
    /// will produce. Keeps every tree walk and the persisted JSON form well
    /// inside stack and nesting limits.
    pub const MAX_DEPTH: usize = 64;

    #[must_use]
    pub fn operand(condition: impl Into<String>) -> Node {
        Node::Operand(condition.into())
    }

    #[must_use]
    pub fn operator(op: BoolOp, left: Node, right: Node) -> Node {
        Node::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: Node) -> Node {
        Node::operator(BoolOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Node) -> Node {
        Node::operator(BoolOp::Or, self, other)
    }

    /// Number of operand leaves in the tree.
    #[must_use]
    pub fn operand_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Operand(_) => count += 1,
                Node::Operator { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        count
    }

    /// Operator levels on the longest root-to-leaf path. A lone operand has
    /// depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Operand(_) => max = max.max(depth),
                Node::Operator { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operand(condition) => write!(f, "{condition}"),
            Node::Operator { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

impl<'a> Condition<'a> {
    /// Split an operand condition. Returns `None` when the text has neither
    /// call shape nor at least three space-separated parts.
    #[must_use]
    pub fn parse(condition: &'a str) -> Option<Condition<'a>> {
        if let Some(call) = Self::parse_call(condition) {
            return Some(call);
        }
        let mut parts = condition.splitn(3, ' ');
        let attribute = parts.next().filter(|s| !s.is_empty())?;
        let operator = parts.next().filter(|s| !s.is_empty())?;
        let literal = parts.next()?;
        Some(Condition::Compare {
            attribute,
            operator,
            literal: strip_quotes(literal),
        })
    }

    fn parse_call(condition: &'a str) -> Option<Condition<'a>> {
        let (name, rest) = condition.split_once('(')?;
        let args = rest.strip_suffix(')')?;
        let is_ident = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        is_ident.then_some(Condition::Call { name, args })
    }
}

fn strip_quotes(literal: &str) -> &str {
    for quote in ['"', '\''] {
        if literal.len() >= 2 && literal.starts_with(quote) && literal.ends_with(quote) {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

// -- Persisted form ---------------------------------------------------------

/// Serde shape of a [`Node`]: `{kind, value, left, right}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNode {
    kind: String,
    value: String,
    #[serde(default)]
    left: Option<Box<StoredNode>>,
    #[serde(default)]
    right: Option<Box<StoredNode>>,
}

const KIND_OPERAND: &str = "operand";
const KIND_OPERATOR: &str = "operator";

impl From<Node> for StoredNode {
    fn from(node: Node) -> Self {
        match node {
            Node::Operand(condition) => StoredNode {
                kind: KIND_OPERAND.to_owned(),
                value: condition,
                left: None,
                right: None,
            },
            Node::Operator { op, left, right } => StoredNode {
                kind: KIND_OPERATOR.to_owned(),
                value: op.as_str().to_owned(),
                left: Some(Box::new(StoredNode::from(*left))),
                right: Some(Box::new(StoredNode::from(*right))),
            },
        }
    }
}

impl TryFrom<StoredNode> for Node {
    type Error = ValidationError;

    fn try_from(stored: StoredNode) -> Result<Self, Self::Error> {
        Node::from_stored(stored, 0)
    }
}

impl Node {
    /// `level` counts the operator nodes above `stored`.
    fn from_stored(stored: StoredNode, level: usize) -> Result<Node, ValidationError> {
        match stored.kind.as_str() {
            KIND_OPERAND => {
                if stored.left.is_some() || stored.right.is_some() {
                    return Err(ValidationError::OperandWithChildren {
                        condition: stored.value,
                    });
                }
                Ok(Node::Operand(stored.value))
            }
            KIND_OPERATOR => {
                let op = match stored.value.as_str() {
                    "AND" => BoolOp::And,
                    "OR" => BoolOp::Or,
                    _ => {
                        return Err(ValidationError::UnknownBooleanOperator {
                            operator: stored.value,
                        })
                    }
                };
                let (Some(left), Some(right)) = (stored.left, stored.right) else {
                    return Err(ValidationError::MissingChild {
                        operator: stored.value,
                    });
                };
                if level >= Node::MAX_DEPTH {
                    return Err(ValidationError::TooDeep {
                        max: Node::MAX_DEPTH,
                    });
                }
                Ok(Node::operator(
                    op,
                    Node::from_stored(*left, level + 1)?,
                    Node::from_stored(*right, level + 1)?,
                ))
            }
            _ => Err(ValidationError::UnknownNodeKind { kind: stored.kind }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_op_from_str() {
        let ops = [
            ("=", CompareOp::Eq),
            ("!=", CompareOp::Neq),
            (">", CompareOp::Gt),
            (">=", CompareOp::Gte),
            ("<", CompareOp::Lt),
            ("<=", CompareOp::Lte),
        ];
        for (sym, expected) in ops {
            assert_eq!(sym.parse::<CompareOp>(), Ok(expected), "failed for {sym}");
            assert_eq!(expected.to_string(), sym);
        }
        assert!("==".parse::<CompareOp>().is_err());
        assert!("=>".parse::<CompareOp>().is_err());
    }

    #[test]
    fn bool_op_keyword_is_case_insensitive() {
        assert_eq!(BoolOp::from_keyword("and"), Some(BoolOp::And));
        assert_eq!(BoolOp::from_keyword("Or"), Some(BoolOp::Or));
        assert_eq!(BoolOp::from_keyword("XOR"), None);
    }

    #[test]
    fn condition_compare_strips_one_quote_layer() {
        assert_eq!(
            Condition::parse("department = \"Sales\""),
            Some(Condition::Compare {
                attribute: "department",
                operator: "=",
                literal: "Sales",
            })
        );
        assert_eq!(
            Condition::parse("name = '\"x\"'"),
            Some(Condition::Compare {
                attribute: "name",
                operator: "=",
                literal: "\"x\"",
            })
        );
    }

    #[test]
    fn condition_literal_keeps_inner_spaces() {
        assert_eq!(
            Condition::parse("department = \"Sales Ops\""),
            Some(Condition::Compare {
                attribute: "department",
                operator: "=",
                literal: "Sales Ops",
            })
        );
    }

    #[test]
    fn condition_call() {
        assert_eq!(
            Condition::parse("is_manager(dept, 3)"),
            Some(Condition::Call {
                name: "is_manager",
                args: "dept, 3",
            })
        );
    }

    #[test]
    fn condition_malformed() {
        assert_eq!(Condition::parse("age >"), None);
        assert_eq!(Condition::parse(""), None);
    }

    #[test]
    fn display_parenthesizes_operators() {
        let node = Node::operand("age > 30").and(Node::operand("salary > 50000"));
        assert_eq!(node.to_string(), "(age > 30 AND salary > 50000)");
    }

    #[test]
    fn serialize_shape() {
        let node = Node::operand("age > 30").or(Node::operand("experience > 10"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "operator");
        assert_eq!(json["value"], "OR");
        assert_eq!(json["left"]["kind"], "operand");
        assert_eq!(json["left"]["value"], "age > 30");
        assert!(json["left"]["left"].is_null());
    }

    #[test]
    fn deserialize_accepts_missing_children_on_operand() {
        let node: Node = serde_json::from_str(r#"{"kind":"operand","value":"age > 30"}"#).unwrap();
        assert_eq!(node, Node::operand("age > 30"));
    }

    fn or_chain(operands: usize) -> Node {
        (1..operands).fold(Node::operand("age = 0"), |acc, i| {
            acc.or(Node::operand(format!("age = {i}")))
        })
    }

    #[test]
    fn depth_counts_operator_levels() {
        assert_eq!(Node::operand("age > 1").depth(), 0);
        assert_eq!(or_chain(2).depth(), 1);
        let balanced = or_chain(2).and(or_chain(2));
        assert_eq!(balanced.depth(), 2);
        assert_eq!(balanced.operand_count(), 4);
    }

    #[test]
    fn walks_long_chain_without_recursion() {
        let node = or_chain(1000);
        assert_eq!(node.depth(), 999);
        assert_eq!(node.operand_count(), 1000);
    }

    #[test]
    fn deserialize_accepts_max_depth() {
        let node = or_chain(Node::MAX_DEPTH + 1);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(serde_json::from_str::<Node>(&json).unwrap(), node);
    }

    #[test]
    fn deserialize_rejects_deeper_tree() {
        let json = serde_json::to_string(&or_chain(Node::MAX_DEPTH + 2)).unwrap();
        let err = serde_json::from_str::<Node>(&json).unwrap_err();
        assert!(err.to_string().contains("deeper than 64"), "{err}");
    }

    #[test]
    fn deserialize_rejects_unknown_kind() {
        let err = serde_json::from_str::<Node>(r#"{"kind":"leaf","value":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown node kind 'leaf'"));
    }

    #[test]
    fn deserialize_rejects_unknown_operator() {
        let json = r#"{"kind":"operator","value":"XOR",
            "left":{"kind":"operand","value":"a = 1"},
            "right":{"kind":"operand","value":"b = 2"}}"#;
        let err = serde_json::from_str::<Node>(json).unwrap_err();
        assert!(err.to_string().contains("'XOR'"));
    }

    #[test]
    fn deserialize_rejects_operator_without_children() {
        let err =
            serde_json::from_str::<Node>(r#"{"kind":"operator","value":"AND"}"#).unwrap_err();
        assert!(err.to_string().contains("missing a child"));
    }

    #[test]
    fn operand_count() {
        let node = Node::operand("a = 1")
            .and(Node::operand("b = 2"))
            .or(Node::operand("c = 3"));
        assert_eq!(node.operand_count(), 3);
    }
}
