//! Comment-directive sub-grammar.
//!
//! Comment bodies are re-parsed here to recognize virtual elements and
//! the `ko-*` directive family:
//!
//! - `ko handler: expr` / `/ko [handler]` — virtual element start/end
//! - `ko-viewmodel: [typeof] Type` — child context declaration
//! - `ko-context: name [= expr]` — named context / context assignment
//! - `ko-import {A, B as C} from 'path'` — module import
//! - `ko-lint enable|disable[: key, ...]` — rule toggling
//!
//! A comment that does not open with one of these markers is an ordinary
//! comment and yields no directive. A comment that opens with a marker
//! but is malformed is a hard error: offsets in [`DirectiveError`] are
//! local to the comment body.

use winnow::{
    Parser,
    ascii::{multispace0, multispace1},
    combinator::{alt, cut_err, empty, eof, opt, peek, preceded, separated, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _},
    token::{literal, none_of, rest, take_till},
};

use crate::span::Span;

/// A slice of the comment body with its local span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sliced<'s> {
    pub text: &'s str,
    pub span: Span,
}

/// One `name [as alias]` clause of an import directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportClause<'s> {
    pub name: Sliced<'s>,
    pub alias: Option<Sliced<'s>>,
}

/// A recognized directive, before node construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive<'s> {
    VirtualStart { key: Sliced<'s>, expr: Sliced<'s> },
    EndMarker { key: Sliced<'s> },
    ChildContext { type_name: Sliced<'s>, is_type: bool },
    NamedContext { name: Sliced<'s> },
    ContextAssignment { name: Sliced<'s>, value: Sliced<'s> },
    Import { symbols: Vec<ImportClause<'s>>, module_path: Sliced<'s> },
    Lint { keys: Vec<Sliced<'s>>, enable: bool },
}

/// A malformed directive: expected constructs and the local failure
/// offset within the comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectiveError {
    pub expected: Vec<String>,
    pub offset: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<&'static str>>;

fn ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '$' | '.')
}

/// Parse an identifier (also covers dotted paths like `App.ViewModel`).
fn ident<'a>(input: &mut Input<'a>) -> IResult<'a, Sliced<'a>> {
    take_while_ident
        .with_span()
        .map(|(text, range)| Sliced {
            text,
            span: Span::new(range),
        })
        .parse_next(input)
}

fn take_while_ident<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    winnow::token::take_while(1.., ident_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '$'))
        })
        .parse_next(input)
}

/// Match a directive marker with a word-boundary check, so `ko-lintish`
/// never half-matches `ko-lint`.
fn marker<'a>(word: &'static str) -> impl Parser<Input<'a>, &'a str, ErrMode<ContextError<&'static str>>> {
    terminated(literal(word), peek(alt((none_of(ident_char).void(), eof.void()))))
}

/// The rest of the body, trimmed, with the span of the trimmed slice.
fn expression<'a>(input: &mut Input<'a>) -> IResult<'a, Sliced<'a>> {
    rest.with_span()
        .map(|(text, range): (&str, _)| {
            let trimmed = text.trim();
            let leading = text.len() - text.trim_start().len();
            let start = range.start + leading;
            Sliced {
                text: trimmed,
                span: Span::new(start..start + trimmed.len()),
            }
        })
        .parse_next(input)
}

/// `/ko [handler]` — also accepts `/ko-*` markers so directives like
/// `<!-- ko-viewmodel ... -->` can be closed symmetrically.
fn end_marker<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    let marker_name = preceded(
        '/',
        ident.verify(|s: &Sliced<'_>| s.text == "ko" || s.text.starts_with("ko-")),
    )
    .parse_next(input)?;
    let handler = opt(preceded(multispace1, ident)).parse_next(input)?;
    cut_err((multispace0, eof))
        .context("end of comment")
        .parse_next(input)?;

    Ok(Directive::EndMarker {
        key: handler.unwrap_or(marker_name),
    })
}

/// `ko handler: expr`
fn virtual_start<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    marker("ko").parse_next(input)?;
    let key = cut_err(preceded(multispace1, ident))
        .context("binding handler name")
        .parse_next(input)?;
    cut_err(preceded(multispace0, ':'))
        .context("':'")
        .parse_next(input)?;
    let expr = preceded(multispace0, expression).parse_next(input)?;

    Ok(Directive::VirtualStart { key, expr })
}

/// `ko-viewmodel: [typeof] Type`
fn viewmodel<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    marker("ko-viewmodel").parse_next(input)?;
    cut_err(preceded(multispace0, ':'))
        .context("':'")
        .parse_next(input)?;
    multispace0.parse_next(input)?;
    let value_ref = opt(terminated(marker("typeof"), multispace1))
        .parse_next(input)?
        .is_some();
    let type_name = cut_err(ident)
        .context("type name")
        .parse_next(input)?;
    cut_err((multispace0, eof))
        .context("end of comment")
        .parse_next(input)?;

    Ok(Directive::ChildContext {
        type_name,
        is_type: !value_ref,
    })
}

/// `ko-context: name [= expr]`
fn context<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    marker("ko-context").parse_next(input)?;
    cut_err(preceded(multispace0, ':'))
        .context("':'")
        .parse_next(input)?;
    let name = cut_err(preceded(multispace0, ident))
        .context("context name")
        .parse_next(input)?;

    let assigned = opt(preceded(multispace0, '=')).parse_next(input)?;
    if assigned.is_some() {
        let value = preceded(multispace0, expression).parse_next(input)?;
        Ok(Directive::ContextAssignment { name, value })
    } else {
        cut_err((multispace0, eof))
            .context("end of comment")
            .parse_next(input)?;
        Ok(Directive::NamedContext { name })
    }
}

/// `ko-import {A, B as C} from 'path'` or `ko-import A from 'path'`
fn import<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    marker("ko-import").parse_next(input)?;
    let symbols = cut_err(preceded(
        multispace1,
        alt((
            braced_symbols,
            ident.map(|name| vec![ImportClause { name, alias: None }]),
        )),
    ))
    .context("import symbols")
    .parse_next(input)?;
    cut_err(preceded(multispace0, marker("from")))
        .context("'from'")
        .parse_next(input)?;
    let module_path = cut_err(preceded(multispace1, module_string))
        .context("module path")
        .parse_next(input)?;
    cut_err((multispace0, eof))
        .context("end of comment")
        .parse_next(input)?;

    Ok(Directive::Import {
        symbols,
        module_path,
    })
}

fn braced_symbols<'a>(input: &mut Input<'a>) -> IResult<'a, Vec<ImportClause<'a>>> {
    preceded(
        '{',
        cut_err(terminated(
            separated(1.., import_symbol, ','),
            (multispace0, '}'),
        ))
        .context("import symbols"),
    )
    .parse_next(input)
}

fn import_symbol<'a>(input: &mut Input<'a>) -> IResult<'a, ImportClause<'a>> {
    let name = preceded(multispace0, ident).parse_next(input)?;
    let alias = opt(preceded((multispace1, marker("as"), multispace1), ident)).parse_next(input)?;
    multispace0.parse_next(input)?;

    Ok(ImportClause { name, alias })
}

/// A quoted module path; the span covers the quotes, the text does not.
fn module_string<'a>(input: &mut Input<'a>) -> IResult<'a, Sliced<'a>> {
    alt((
        preceded('\'', terminated(take_till(0.., '\''), '\'')),
        preceded('"', terminated(take_till(0.., '"'), '"')),
    ))
    .with_span()
    .map(|(text, range)| Sliced {
        text,
        span: Span::new(range),
    })
    .parse_next(input)
}

/// `ko-lint enable|disable[: key, ...]`
fn lint<'a>(input: &mut Input<'a>) -> IResult<'a, Directive<'a>> {
    marker("ko-lint").parse_next(input)?;
    let enable = cut_err(preceded(
        multispace1,
        alt((marker("enable").value(true), marker("disable").value(false))),
    ))
    .context("'enable' or 'disable'")
    .parse_next(input)?;
    let keys: Vec<Sliced<'a>> = opt(preceded(
        (multispace0, ':'),
        cut_err(separated(1.., preceded(multispace0, ident), ','))
            .context("rule key"),
    ))
    .parse_next(input)?
    .unwrap_or_default();
    cut_err((multispace0, eof))
        .context("end of comment")
        .parse_next(input)?;

    Ok(Directive::Lint { keys, enable })
}

fn directive<'a>(input: &mut Input<'a>) -> IResult<'a, Option<Directive<'a>>> {
    preceded(
        multispace0,
        alt((
            end_marker.map(Some),
            viewmodel.map(Some),
            context.map(Some),
            import.map(Some),
            lint.map(Some),
            virtual_start.map(Some),
            // Ordinary comment
            empty.value(None),
        )),
    )
    .parse_next(input)
}

/// Parse a comment body. `Ok(None)` means an ordinary comment.
pub(crate) fn parse(body: &str) -> Result<Option<Directive<'_>>, DirectiveError> {
    let mut input = LocatingSlice::new(body);
    match directive(&mut input) {
        Ok(result) => Ok(result),
        Err(err) => {
            let offset = input.current_token_start();
            let context_error = match err {
                ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
                ErrMode::Incomplete(_) => ContextError::new(),
            };
            let mut expected: Vec<String> = context_error
                .context()
                .map(|label| (*label).to_string())
                .collect();
            if expected.is_empty() {
                expected.push("directive".to_string());
            }
            Err(DirectiveError { expected, offset })
        }
    }
}
