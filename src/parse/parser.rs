use crate::{BoolOp, Node};

use super::ParseError;

/// Entries on the pending-operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Open,
    Op(BoolOp),
}

/// Build a tree from lexed tokens with a two-stack shift/reduce pass.
///
/// `AND` and `OR` share one precedence level and associate to the left;
/// parentheses are the only way to group differently. Trees deeper than
/// [`Node::MAX_DEPTH`] are rejected.
pub(crate) fn build(tokens: &[&str]) -> Result<Node, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut ops: Vec<Pending> = Vec::new();
    // Each built subtree travels with its depth.
    let mut nodes: Vec<(Node, usize)> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        match token {
            "(" => ops.push(Pending::Open),
            ")" => loop {
                match ops.pop() {
                    Some(Pending::Open) => break,
                    Some(Pending::Op(op)) => reduce(op, &mut nodes)?,
                    None => return Err(ParseError::UnbalancedParens),
                }
            },
            _ => {
                if let Some(op) = BoolOp::from_keyword(token) {
                    while let Some(&Pending::Op(top)) = ops.last() {
                        ops.pop();
                        reduce(top, &mut nodes)?;
                    }
                    ops.push(Pending::Op(op));
                } else if is_call(token) {
                    nodes.push((Node::operand(token), 0));
                } else {
                    nodes.push((condition(token, &tokens[i + 1..])?, 0));
                    i += 2;
                }
            }
        }
        i += 1;
    }

    while let Some(pending) = ops.pop() {
        match pending {
            Pending::Op(op) => reduce(op, &mut nodes)?,
            Pending::Open => return Err(ParseError::UnbalancedParens),
        }
    }

    match nodes.len() {
        1 => nodes
            .pop()
            .map(|(node, _)| node)
            .ok_or(ParseError::InvalidStructure { remaining: 0 }),
        remaining => Err(ParseError::InvalidStructure { remaining }),
    }
}

fn reduce(op: BoolOp, nodes: &mut Vec<(Node, usize)>) -> Result<(), ParseError> {
    let missing = || ParseError::MissingOperand {
        operator: op.to_string(),
    };
    let (right, right_depth) = nodes.pop().ok_or_else(missing)?;
    let (left, left_depth) = nodes.pop().ok_or_else(missing)?;
    let depth = left_depth.max(right_depth) + 1;
    if depth > Node::MAX_DEPTH {
        return Err(ParseError::TooDeep {
            max: Node::MAX_DEPTH,
        });
    }
    nodes.push((Node::operator(op, left, right), depth));
    Ok(())
}

/// `attribute operator value`, joined into one operand.
fn condition(attribute: &str, rest: &[&str]) -> Result<Node, ParseError> {
    match rest {
        [operator, value, ..] if !is_paren(operator) && !is_paren(value) => {
            Ok(Node::operand(format!("{attribute} {operator} {value}")))
        }
        _ => Err(ParseError::IncompleteCondition {
            attribute: attribute.to_owned(),
        }),
    }
}

fn is_paren(token: &str) -> bool {
    token == "(" || token == ")"
}

fn is_call(token: &str) -> bool {
    token.ends_with(')') && token.len() > 1 && token.contains('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> Node {
        Node::operand(s)
    }

    #[test]
    fn single_condition() {
        assert_eq!(build(&["age", ">", "30"]).unwrap(), leaf("age > 30"));
    }

    #[test]
    fn and_or_are_left_associative_without_precedence() {
        // a OR b AND c  =>  (a OR b) AND c
        let tokens = ["a", "=", "1", "OR", "b", "=", "2", "AND", "c", "=", "3"];
        let expected = leaf("a = 1").or(leaf("b = 2")).and(leaf("c = 3"));
        assert_eq!(build(&tokens).unwrap(), expected);
    }

    #[test]
    fn parentheses_group() {
        let tokens = [
            "a", "=", "1", "OR", "(", "b", "=", "2", "AND", "c", "=", "3", ")",
        ];
        let expected = leaf("a = 1").or(leaf("b = 2").and(leaf("c = 3")));
        assert_eq!(build(&tokens).unwrap(), expected);
    }

    #[test]
    fn lowercase_keywords_normalize() {
        let tokens = ["a", "=", "1", "and", "b", "=", "2"];
        assert_eq!(
            build(&tokens).unwrap(),
            leaf("a = 1").and(leaf("b = 2"))
        );
    }

    #[test]
    fn call_operand_consumes_one_token() {
        let tokens = ["is_vip(gold)", "OR", "age", ">", "60"];
        assert_eq!(
            build(&tokens).unwrap(),
            leaf("is_vip(gold)").or(leaf("age > 60"))
        );
    }

    #[test]
    fn incomplete_condition() {
        assert_eq!(
            build(&["age", ">"]).unwrap_err(),
            ParseError::IncompleteCondition {
                attribute: "age".into()
            }
        );
        assert_eq!(
            build(&["(", "age", ">", ")"]).unwrap_err(),
            ParseError::IncompleteCondition {
                attribute: "age".into()
            }
        );
    }

    #[test]
    fn unbalanced_parens() {
        assert_eq!(
            build(&["(", "a", "=", "1"]).unwrap_err(),
            ParseError::UnbalancedParens
        );
        assert_eq!(
            build(&["a", "=", "1", ")"]).unwrap_err(),
            ParseError::UnbalancedParens
        );
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(
            build(&["a", "=", "1", "AND"]).unwrap_err(),
            ParseError::MissingOperand {
                operator: "AND".into()
            }
        );
        assert_eq!(
            build(&["OR", "a", "=", "1"]).unwrap_err(),
            ParseError::MissingOperand {
                operator: "OR".into()
            }
        );
    }

    #[test]
    fn adjacent_conditions_are_disconnected() {
        assert_eq!(
            build(&["a", "=", "1", "b", "=", "2"]).unwrap_err(),
            ParseError::InvalidStructure { remaining: 2 }
        );
    }

    fn or_chain_tokens(operands: usize) -> Vec<&'static str> {
        let mut tokens = vec!["a", "=", "1"];
        for _ in 1..operands {
            tokens.extend(["OR", "a", "=", "1"]);
        }
        tokens
    }

    #[test]
    fn chain_at_depth_limit() {
        let node = build(&or_chain_tokens(Node::MAX_DEPTH + 1)).unwrap();
        assert_eq!(node.depth(), Node::MAX_DEPTH);
    }

    #[test]
    fn chain_past_depth_limit() {
        assert_eq!(
            build(&or_chain_tokens(Node::MAX_DEPTH + 2)).unwrap_err(),
            ParseError::TooDeep {
                max: Node::MAX_DEPTH
            }
        );
    }

    #[test]
    fn right_nested_groups_count_toward_depth() {
        // a OR (a OR (a OR ...))
        let levels = Node::MAX_DEPTH + 1;
        let mut tokens = vec![];
        for _ in 0..levels {
            tokens.extend(["a", "=", "1", "OR", "("]);
        }
        tokens.extend(["a", "=", "1"]);
        tokens.extend(std::iter::repeat(")").take(levels));
        assert_eq!(
            build(&tokens).unwrap_err(),
            ParseError::TooDeep {
                max: Node::MAX_DEPTH
            }
        );
    }

    #[test]
    fn parentheses_alone_add_no_depth() {
        let mut tokens = vec!["("; 200];
        tokens.extend(["a", "=", "1"]);
        tokens.extend(std::iter::repeat(")").take(200));
        assert_eq!(build(&tokens).unwrap(), leaf("a = 1"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(build(&[]).unwrap_err(), ParseError::Empty);
        assert_eq!(
            build(&["(", ")"]).unwrap_err(),
            ParseError::InvalidStructure { remaining: 0 }
        );
    }
}
