use winnow::combinator::{alt, cut_err, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::BoolOp;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

// -- Word pieces ------------------------------------------------------------

/// A quoted segment, delimiters included. Closes only on the quote that
/// opened it; an unterminated segment is a hard error.
fn quoted(input: &mut &str) -> ModalResult<()> {
    let open = one_of(['"', '\'']).parse_next(input)?;
    take_till(0.., open).void().parse_next(input)?;
    cut_err(open.void())
        .context(StrContext::Label("quoted literal"))
        .context(StrContext::Expected(StrContextValue::CharLiteral(open)))
        .parse_next(input)
}

fn bare<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | '\'')
    })
    .parse_next(input)
}

/// Arguments are flat text; a `(` inside them is a nested call and fails.
fn call_args(input: &mut &str) -> ModalResult<()> {
    '('.parse_next(input)?;
    take_till(0.., ['(', ')']).void().parse_next(input)?;
    cut_err(')'.void())
        .context(StrContext::Label("function call"))
        .context(StrContext::Expected(StrContextValue::Description(
            "`)` (calls cannot be nested)",
        )))
        .parse_next(input)
}

fn is_call_name(word: &str) -> bool {
    BoolOp::from_keyword(word).is_none()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A run of bare characters and quoted segments. A call name glued to `(`
/// swallows its argument list, so `is_vip(gold)` is one token.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let start = *input;
    let _: () = repeat(1.., alt((quoted, bare.void()))).parse_next(input)?;
    let head = &start[..start.len() - input.len()];
    if input.starts_with('(') && is_call_name(head) {
        call_args.parse_next(input)?;
    }
    Ok(&start[..start.len() - input.len()])
}

// -- Top level --------------------------------------------------------------

fn token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("(", ")", word)).parse_next(input)
}

pub(crate) fn tokens<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let tokens: Vec<&'i str> = repeat(0.., preceded(ws, token)).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(tokens)
}
