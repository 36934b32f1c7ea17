use crate::{BoolOp, CombineError, Node};

/// A tree synthesized from several rules, with its derived name.
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    pub name: String,
    pub ast: Node,
}

/// Derived name of a combined rule: `"Combined: A + B + ..."`.
#[must_use]
pub fn combined_name<S: AsRef<str>>(names: &[S]) -> String {
    let joined: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    format!("Combined: {}", joined.join(" + "))
}

/// OR-fold named trees into one, left to right.
///
/// The result is true exactly when at least one input is true. Trees are
/// cloned; the inputs stay untouched.
///
/// # Errors
///
/// Returns [`CombineError::Empty`] when `parts` is empty, or
/// [`CombineError::TooDeep`] when the folded tree would exceed
/// [`Node::MAX_DEPTH`].
pub fn combine<'a, I>(parts: I) -> Result<Combined, CombineError>
where
    I: IntoIterator<Item = (&'a str, &'a Node)>,
{
    let mut names = Vec::new();
    let mut acc: Option<(Node, usize)> = None;
    for (name, node) in parts {
        names.push(name);
        let depth = node.depth();
        acc = Some(match acc {
            None => (node.clone(), depth),
            Some((prev, prev_depth)) => {
                let depth = prev_depth.max(depth) + 1;
                if depth > Node::MAX_DEPTH {
                    return Err(CombineError::TooDeep {
                        max: Node::MAX_DEPTH,
                    });
                }
                (Node::operator(BoolOp::Or, prev, node.clone()), depth)
            }
        });
    }
    let (ast, _) = acc.ok_or(CombineError::Empty)?;
    Ok(Combined {
        name: combined_name(&names),
        ast,
    })
}
