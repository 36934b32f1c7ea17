mod error;
mod lexer;
mod parser;

use tracing::debug;

pub use error::ParseError;

use crate::Node;

/// Split rule text into tokens.
///
/// Whitespace separates tokens, parentheses are tokens of their own, quoted
/// literals stay whole with their delimiters, and a call such as
/// `is_vip(gold)` is a single token. Call arguments are plain text, so calls
/// cannot be nested.
///
/// # Errors
///
/// Returns [`ParseError::Lexical`] for an unterminated quote or call, or a
/// nested call such as `f(g(x))`.
pub fn tokenize(input: &str) -> Result<Vec<&str>, ParseError> {
    use winnow::Parser;
    lexer::tokens.parse(input).map_err(|e| ParseError::Lexical {
        offset: e.offset(),
        message: e.inner().to_string(),
    })
}

/// Compile rule text such as `age > 30 AND department = "Sales"` into a tree.
///
/// The tree is not checked against a schema; see
/// [`validate`](crate::validate).
///
/// # Errors
///
/// Returns [`ParseError`] if the text cannot be reduced to exactly one tree.
pub fn compile(input: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(input)?;
    let node = parser::build(&tokens)?;
    debug!(rule = input, ast = %node, "compiled rule");
    Ok(node)
}
