//! Lexical analyzer for markup documents.
//!
//! The lexer converts document text into a stream of [`Token`]s for the
//! grammar. It is modal: between tags it produces text, comments,
//! declarations, and tag-open markers; inside a tag it produces names,
//! `=`, attribute values, and tag-close markers, silently consuming the
//! whitespace that separates attributes.
//!
//! Lexing stops at the first error. The failure carries the expected
//! construct and a span so the caller can produce exactly one located
//! diagnostic.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _},
    token::{take_till, take_until, take_while},
};

use crate::{
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Context attached to lexer errors for unterminated constructs.
///
/// `start` is the offset of the opening marker, so the error span covers
/// from the construct's start to the failure position.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexContext {
    expected: &'static str,
    start: usize,
}

/// A lexical failure: what was expected and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexFailure {
    pub expected: Vec<String>,
    pub span: Span,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexContext>>;

fn name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

/// Parse a comment: `<!--` body `-->`. The token carries the body only.
///
/// Uses `cut_err` after the opening marker so a missing `-->` is a hard
/// error rather than a fallback to text.
fn comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();

    preceded(
        "<!--",
        cut_err(terminated(take_until(0.., "-->"), "-->")).context(LexContext {
            expected: "'-->'",
            start,
        }),
    )
    .map(Token::Comment)
    .parse_next(input)
}

/// Parse a `<!DOCTYPE ...>` declaration or `<?xml ...?>` processing
/// instruction. The grammar skips these; only the body is kept.
fn declaration<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();

    alt((
        preceded(
            "<?",
            cut_err(terminated(take_until(0.., "?>"), "?>")).context(LexContext {
                expected: "'?>'",
                start,
            }),
        ),
        preceded(
            "<!",
            cut_err(terminated(take_until(0.., ">"), ">")).context(LexContext {
                expected: "'>'",
                start,
            }),
        ),
    ))
    .map(Token::Declaration)
    .parse_next(input)
}

/// Parse character data up to the next `<`.
fn text<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_till(1.., '<').map(Token::Text).parse_next(input)
}

/// Parse a tag or attribute name.
fn name<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., name_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | ':'))
        })
        .map(Token::Name)
        .parse_next(input)
}

/// Parse a quoted attribute value with either quote style.
///
/// Commits after the opening quote: an unterminated value is a hard
/// error whose span runs from the quote to the failure position.
fn quoted_value<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();

    alt((
        preceded(
            '"',
            cut_err(terminated(take_till(0.., '"'), '"')).context(LexContext {
                expected: "closing '\"'",
                start,
            }),
        ),
        preceded(
            '\'',
            cut_err(terminated(take_till(0.., '\''), '\'')).context(LexContext {
                expected: "closing '''",
                start,
            }),
        ),
    ))
    .map(Token::Quoted)
    .parse_next(input)
}

/// Parse an unquoted attribute value.
fn unquoted_value<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '>' | '/' | '=' | '"' | '\'' | '<')
    })
    .map(Token::Unquoted)
    .parse_next(input)
}

/// Parse one token in markup mode (between tags).
fn markup_token<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        comment,     // Must come before declaration: both start with `<!`
        declaration, // Must come before tag_open
        "</".value(Token::CloseTagOpen),
        '<'.value(Token::TagOpen),
        text,
    ))
    .parse_next(input)
}

/// Parse one token in tag mode (between `<` and `>`).
fn tag_token<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        "/>".value(Token::SelfClose),
        '>'.value(Token::TagClose),
        '='.value(Token::Equals),
        quoted_value,
        name, // Must come before unquoted_value
        unquoted_value,
    ))
    .parse_next(input)
}

/// Consume attribute-separating whitespace in tag mode.
fn tag_whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    inside_tag: bool,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            inside_tag: false,
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) -> Result<(), LexFailure> {
        while !input.is_empty() {
            if self.inside_tag {
                // Cannot fail: matches zero or more characters
                let _ = tag_whitespace(&mut input);
                if input.is_empty() {
                    break;
                }
            }

            let start = input.current_token_start();
            let result = if self.inside_tag {
                tag_token(&mut input)
            } else {
                markup_token(&mut input)
            };

            match result {
                Ok(token) => {
                    let end = input.current_token_start();
                    match token {
                        Token::TagOpen | Token::CloseTagOpen => self.inside_tag = true,
                        Token::TagClose | Token::SelfClose => self.inside_tag = false,
                        _ => {}
                    }
                    self.tokens.push(PositionedToken::new(token, Span::new(start..end)));
                }
                Err(e) => {
                    let error_pos = input.current_token_start();
                    return Err(self.convert_err_mode(e, error_pos));
                }
            }
        }
        Ok(())
    }

    /// Convert an ErrMode and error position into a [`LexFailure`].
    ///
    /// Uses the `LexContext` attached to unterminated-construct errors
    /// when present; otherwise falls back to the token set of the
    /// current mode with a single-character span.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexContext>>,
        error_pos: usize,
    ) -> LexFailure {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexContext { expected, start }) = context_error.context().next() {
            return LexFailure {
                expected: vec![(*expected).to_string()],
                span: Span::new(*start..error_pos),
            };
        }

        let expected = if self.inside_tag {
            vec![
                "attribute name".to_string(),
                "'>'".to_string(),
                "'/>'".to_string(),
            ]
        } else {
            vec!["'<'".to_string(), "text".to_string()]
        };
        LexFailure {
            expected,
            span: Span::new(error_pos..error_pos.saturating_add(1)),
        }
    }
}

/// Tokenize a document, stopping at the first lexical error.
pub(crate) fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, LexFailure> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input)?;
    log::trace!("lexed {} tokens", lexer.tokens.len());
    Ok(lexer.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("tokenizes")
            .into_iter()
            .map(|p| p.token)
            .collect()
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            tokens("<div>"),
            vec![Token::TagOpen, Token::Name("div"), Token::TagClose]
        );
    }

    #[test]
    fn test_close_tag() {
        assert_eq!(
            tokens("</div>"),
            vec![Token::CloseTagOpen, Token::Name("div"), Token::TagClose]
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(
            tokens("<br/>"),
            vec![Token::TagOpen, Token::Name("br"), Token::SelfClose]
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            tokens("<input type=\"text\" disabled value=x>"),
            vec![
                Token::TagOpen,
                Token::Name("input"),
                Token::Name("type"),
                Token::Equals,
                Token::Quoted("text"),
                Token::Name("disabled"),
                Token::Name("value"),
                Token::Equals,
                Token::Name("x"),
                Token::TagClose,
            ]
        );
    }

    #[test]
    fn test_single_quoted_value() {
        assert_eq!(
            tokens("<div class='a b'>"),
            vec![
                Token::TagOpen,
                Token::Name("div"),
                Token::Name("class"),
                Token::Equals,
                Token::Quoted("a b"),
                Token::TagClose,
            ]
        );
    }

    #[test]
    fn test_text_between_tags() {
        assert_eq!(
            tokens("<b>bold > text</b>"),
            vec![
                Token::TagOpen,
                Token::Name("b"),
                Token::TagClose,
                Token::Text("bold > text"),
                Token::CloseTagOpen,
                Token::Name("b"),
                Token::TagClose,
            ]
        );
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            tokens("<!-- ko if: visible -->"),
            vec![Token::Comment(" ko if: visible ")]
        );
    }

    #[test]
    fn test_doctype_and_pi() {
        assert_eq!(
            tokens("<!DOCTYPE html>"),
            vec![Token::Declaration("DOCTYPE html")]
        );
        assert_eq!(
            tokens("<?xml version=\"1.0\"?>"),
            vec![Token::Declaration("xml version=\"1.0\"")]
        );
    }

    #[test]
    fn test_span_tracking() {
        let positioned = tokenize("<div id=\"a\">").expect("tokenizes");
        // `<` `div` `id` `=` `"a"` `>`
        assert_eq!(positioned[0].span, Span::new(0..1));
        assert_eq!(positioned[1].span, Span::new(1..4));
        assert_eq!(positioned[2].span, Span::new(5..7));
        assert_eq!(positioned[3].span, Span::new(7..8));
        assert_eq!(positioned[4].span, Span::new(8..11));
        assert_eq!(positioned[5].span, Span::new(11..12));
    }

    #[test]
    fn test_unterminated_quote_fails() {
        let failure = tokenize("<div class=\"oops>").expect_err("fails");
        assert_eq!(failure.expected, vec!["closing '\"'".to_string()]);
        // Span runs from the opening quote to the end of input
        assert_eq!(failure.span.start(), 11);
        assert_eq!(failure.span.end(), 17);
    }

    #[test]
    fn test_unterminated_comment_fails() {
        let failure = tokenize("<!-- never closed").expect_err("fails");
        assert_eq!(failure.expected, vec!["'-->'".to_string()]);
        assert_eq!(failure.span.start(), 0);
    }

    #[test]
    fn test_invalid_character_in_tag_fails() {
        let failure = tokenize("<div <>").expect_err("fails");
        assert!(failure.expected.contains(&"attribute name".to_string()));
        assert_eq!(failure.span.start(), 5);
    }

    #[test]
    fn test_unterminated_tag_is_lexically_fine() {
        // The grammar reports the missing `>`, not the lexer
        assert_eq!(tokens("<div"), vec![Token::TagOpen, Token::Name("div")]);
    }

    #[test]
    fn test_multiline_document() {
        let positioned = tokenize("<ul>\n  <li>one</li>\n</ul>").expect("tokenizes");
        assert_eq!(positioned[3].token, Token::Text("\n  "));
        assert_eq!(positioned[3].span, Span::new(4..7));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn tag_name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,12}".prop_filter("no trailing hyphen", |s| !s.ends_with('-'))
    }

    fn attribute_value_strategy() -> impl Strategy<Value = String> {
        // Anything except the quote character itself
        "[a-zA-Z0-9 .:/_-]{0,24}"
    }

    fn check_element_tokenizes(tag: &str, value: &str) -> Result<(), TestCaseError> {
        let source = format!("<{tag} data-bind=\"{value}\">inner</{tag}>");
        let result = tokenize(&source);

        let err = result.err();
        prop_assert!(err.is_none(), "failed to tokenize `{source}`: {err:?}");
        Ok(())
    }

    fn check_spans_cover_input(tag: &str, value: &str) -> Result<(), TestCaseError> {
        let source = format!("<{tag} id='{value}'/>");
        let tokens = tokenize(&source).map_err(|e| {
            TestCaseError::fail(format!("failed to tokenize `{source}`: {e:?}"))
        })?;

        for window in tokens.windows(2) {
            prop_assert!(window[0].span.end() <= window[1].span.start());
        }
        if let Some(last) = tokens.last() {
            prop_assert_eq!(last.span.end(), source.len());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn elements_tokenize(tag in tag_name_strategy(), value in attribute_value_strategy()) {
            check_element_tokenizes(&tag, &value)?;
        }

        #[test]
        fn spans_are_ordered_and_cover_input(
            tag in tag_name_strategy(),
            value in attribute_value_strategy(),
        ) {
            check_spans_cover_input(&tag, &value)?;
        }
    }
}
