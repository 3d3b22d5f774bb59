//! Token-stream grammar producing the flat node sequence.
//!
//! Elements are recognized by winnow productions over the positioned
//! token slice; comments are re-parsed by the
//! [`directive`](crate::directive) sub-grammar. Node construction goes
//! through the [`SyntaxFactory`] threaded via parser state.
//!
//! The grammar is fail-fast: the first failure is converted into a
//! [`RawParseError`] and no partial node sequence escapes.

use winnow::{
    Parser as _,
    combinator::{cut_err, opt, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{Stateful, Stream, TokenSlice},
    token::any,
};

use lintel_core::syntax_tree::{BindingData, ImportSymbol, NodeKind, SyntaxNode};

use crate::{
    builder::SyntaxFactory,
    directive::{self, Directive, DirectiveError},
    engine::RawParseError,
    line_index::LineIndex,
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Length of the `<!--` marker, used to translate directive offsets.
const COMMENT_OPEN_LEN: usize = 4;
/// Length of the `-->` marker.
const COMMENT_CLOSE_LEN: usize = 3;

#[derive(Debug, Clone)]
struct State<'e> {
    factory: &'e SyntaxFactory,
    lines: &'e LineIndex,
    track_ranges: bool,
}

type Tokens<'t, 's> = TokenSlice<'t, PositionedToken<'s>>;
type Input<'t, 's, 'e> = Stateful<Tokens<'t, 's>, State<'e>>;
type IResult<O> = ModalResult<O, ContextError<&'static str>>;

/// Build the node sequence from the lexed token stream.
pub(crate) fn build_tree<'s>(
    document: &'s str,
    tokens: &[PositionedToken<'s>],
    factory: &SyntaxFactory,
    lines: &LineIndex,
    track_ranges: bool,
) -> Result<Vec<SyntaxNode<'s>>, RawParseError> {
    let mut input = Stateful {
        input: TokenSlice::new(tokens),
        state: State {
            factory,
            lines,
            track_ranges,
        },
    };
    let mut nodes = Vec::new();

    while input.eof_offset() > 0 {
        let index = tokens.len() - input.eof_offset();
        let token = &tokens[index];
        match token.token {
            Token::Text(_) | Token::Declaration(_) => {
                let _ = input.next_token();
            }
            Token::Comment(body) => {
                let span = token.span;
                let _ = input.next_token();
                match directive::parse(body) {
                    Ok(Some(parsed)) => nodes.push(directive_node(parsed, span, &input.state)),
                    Ok(None) => {}
                    Err(error) => {
                        return Err(directive_failure(document, lines, track_ranges, span, error));
                    }
                }
            }
            Token::TagOpen => match open_element(&mut input) {
                Ok(node) => nodes.push(node),
                Err(err) => {
                    let remaining = input.eof_offset();
                    return Err(convert_error(
                        document,
                        lines,
                        track_ranges,
                        tokens,
                        remaining,
                        err,
                    ));
                }
            },
            Token::CloseTagOpen => match close_element(&mut input) {
                Ok(node) => nodes.push(node),
                Err(err) => {
                    let remaining = input.eof_offset();
                    return Err(convert_error(
                        document,
                        lines,
                        track_ranges,
                        tokens,
                        remaining,
                        err,
                    ));
                }
            },
            // The lexer only emits the remaining token kinds inside a
            // tag, after a TagOpen/CloseTagOpen the productions above
            // consume. Report rather than panic if that ever changes.
            other => {
                return Err(RawParseError {
                    expected: vec![
                        "'<'".to_string(),
                        "'</'".to_string(),
                        "comment".to_string(),
                        "text".to_string(),
                    ],
                    line: lines.position(token.span.start()).0,
                    loc: lines.raw_location(token.span, track_ranges),
                    text: document[token.span.start()..token.span.end()].to_string(),
                    token: other.name().to_string(),
                });
            }
        }
    }

    log::trace!("built {} syntax nodes", nodes.len());
    Ok(nodes)
}

/// `<name attr=value ...>` or `<name .../>`
fn open_element<'t, 's, 'e>(input: &mut Input<'t, 's, 'e>) -> IResult<SyntaxNode<'s>> {
    let open_span = any
        .verify_map(|t: &PositionedToken<'s>| matches!(t.token, Token::TagOpen).then_some(t.span))
        .parse_next(input)?;
    let (key, _) = cut_err(tag_name.context("tag name")).parse_next(input)?;
    let attributes: Vec<Option<BindingData<'s>>> = repeat(0.., attribute).parse_next(input)?;
    let (kind, close_span) = cut_err(
        any.verify_map(|t: &PositionedToken<'s>| match t.token {
            Token::TagClose => Some((NodeKind::Start, t.span)),
            Token::SelfClose => Some((NodeKind::Empty, t.span)),
            _ => None,
        })
        .context("attribute name")
        .context("'>'")
        .context("'/>'"),
    )
    .parse_next(input)?;

    let location = input
        .state
        .lines
        .location(open_span.union(close_span), input.state.track_ranges);
    let mut node = match kind {
        NodeKind::Start => input.state.factory.start_node(location, key),
        _ => input.state.factory.empty_node(location, key),
    };
    node.bindings = attributes.into_iter().flatten().collect();
    Ok(SyntaxNode::Element(node))
}

/// `</name>`
fn close_element<'t, 's, 'e>(input: &mut Input<'t, 's, 'e>) -> IResult<SyntaxNode<'s>> {
    let open_span = any
        .verify_map(|t: &PositionedToken<'s>| {
            matches!(t.token, Token::CloseTagOpen).then_some(t.span)
        })
        .parse_next(input)?;
    let (key, _) = cut_err(tag_name.context("tag name")).parse_next(input)?;
    let close_span = cut_err(
        any.verify_map(|t: &PositionedToken<'s>| {
            matches!(t.token, Token::TagClose).then_some(t.span)
        })
        .context("'>'"),
    )
    .parse_next(input)?;

    let location = input
        .state
        .lines
        .location(open_span.union(close_span), input.state.track_ranges);
    Ok(SyntaxNode::Element(
        input.state.factory.end_node(location, key),
    ))
}

/// One attribute; yields binding data when the name is a configured
/// binding attribute, `None` otherwise.
fn attribute<'t, 's, 'e>(input: &mut Input<'t, 's, 'e>) -> IResult<Option<BindingData<'s>>> {
    let (name, name_span) = tag_name.parse_next(input)?;
    let value = opt(preceded(
        any.verify_map(|t: &PositionedToken<'s>| matches!(t.token, Token::Equals).then_some(())),
        cut_err(
            any.verify_map(|t: &PositionedToken<'s>| match t.token {
                Token::Quoted(v) | Token::Unquoted(v) | Token::Name(v) => Some((v, t.span)),
                _ => None,
            })
            .context("attribute value"),
        ),
    ))
    .parse_next(input)?;

    if input.state.factory.is_binding_attribute(name) {
        let (data, span) = match value {
            Some((data, value_span)) => (data, name_span.union(value_span)),
            None => ("", name_span),
        };
        let location = input.state.lines.location(span, input.state.track_ranges);
        Ok(Some(input.state.factory.binding_data(location, data)))
    } else {
        Ok(None)
    }
}

fn tag_name<'t, 's, 'e>(input: &mut Input<'t, 's, 'e>) -> IResult<(&'s str, Span)> {
    any.verify_map(|t: &PositionedToken<'s>| match t.token {
        Token::Name(name) => Some((name, t.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Build a syntax node from a recognized comment directive.
fn directive_node<'s>(
    parsed: Directive<'s>,
    comment_span: Span,
    state: &State<'_>,
) -> SyntaxNode<'s> {
    let base = comment_span.start() + COMMENT_OPEN_LEN;
    let track = state.track_ranges;
    let comment_location = state.lines.location(comment_span, track);
    let locate = |span: Span| state.lines.location(span.offset(base), track);

    match parsed {
        Directive::VirtualStart { key, expr } => {
            let mut node = state.factory.start_node(comment_location, key.text);
            node.bindings
                .push(state.factory.binding_data(locate(expr.span), expr.text));
            SyntaxNode::Element(node)
        }
        Directive::EndMarker { key } => {
            SyntaxNode::Element(state.factory.end_node(comment_location, key.text))
        }
        Directive::ChildContext { type_name, is_type } => {
            let identifier = state.factory.ident(locate(type_name.span), type_name.text);
            let context_ref =
                state
                    .factory
                    .type_reference(locate(type_name.span), identifier, is_type);
            state.factory.child_context(comment_location, context_ref)
        }
        Directive::NamedContext { name } => {
            let identifier = state.factory.ident(locate(name.span), name.text);
            state.factory.named_context(comment_location, identifier)
        }
        Directive::ContextAssignment { name, value } => {
            let identifier = state.factory.ident(locate(name.span), name.text);
            let assigned = (!value.text.is_empty()).then_some(value.text);
            state
                .factory
                .context_assignment(comment_location, identifier, assigned)
        }
        Directive::Import {
            symbols,
            module_path,
        } => {
            let symbols = symbols
                .into_iter()
                .map(|clause| {
                    let name = state.factory.ident(locate(clause.name.span), clause.name.text);
                    let alias = match clause.alias {
                        Some(alias) => state.factory.ident(locate(alias.span), alias.text),
                        None => name.clone(),
                    };
                    ImportSymbol { name, alias }
                })
                .collect();
            let module_path = state
                .factory
                .ident(locate(module_path.span), module_path.text);
            state.factory.import(comment_location, symbols, module_path)
        }
        Directive::Lint { keys, enable } => {
            let keys = keys.into_iter().map(|key| key.text).collect();
            state.factory.diag(comment_location, keys, enable)
        }
    }
}

/// Convert a malformed-directive failure into a raw parse error, mapping
/// the body-local offset back into the document.
fn directive_failure(
    document: &str,
    lines: &LineIndex,
    track_ranges: bool,
    comment_span: Span,
    error: DirectiveError,
) -> RawParseError {
    let start = (comment_span.start() + COMMENT_OPEN_LEN + error.offset).min(document.len());
    let body_end = comment_span
        .end()
        .saturating_sub(COMMENT_CLOSE_LEN)
        .max(start);
    let span = Span::new(start..body_end);

    RawParseError {
        expected: error.expected,
        line: lines.position(span.start()).0,
        loc: lines.raw_location(span, track_ranges),
        text: document[span.start()..span.end()].to_string(),
        token: "COMMENT".to_string(),
    }
}

/// Convert a winnow failure over the token stream into a raw parse
/// error pointing at the offending token (or EOF).
fn convert_error(
    document: &str,
    lines: &LineIndex,
    track_ranges: bool,
    tokens: &[PositionedToken<'_>],
    remaining: usize,
    err: ErrMode<ContextError<&'static str>>,
) -> RawParseError {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };
    let mut expected: Vec<String> = context_error
        .context()
        .map(|label| (*label).to_string())
        .collect();
    if expected.is_empty() {
        expected.push("token".to_string());
    }

    let index = tokens.len() - remaining;
    match tokens.get(index) {
        Some(token) => RawParseError {
            expected,
            line: lines.position(token.span.start()).0,
            loc: lines.raw_location(token.span, track_ranges),
            text: document[token.span.start()..token.span.end()].to_string(),
            token: token.token.name().to_string(),
        },
        None => RawParseError {
            expected,
            line: lines.position(document.len()).0,
            loc: lines.raw_location(Span::new(document.len()..document.len()), track_ranges),
            text: String::new(),
            token: "EOF".to_string(),
        },
    }
}
