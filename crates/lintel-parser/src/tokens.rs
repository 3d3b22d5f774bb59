//! Token definitions shared between the lexer and the grammar.

use std::fmt;

use crate::span::Span;

/// A lexical token of the markup dialect.
///
/// Tokens borrow their text from the source document. Quoted attribute
/// values carry the text between the quotes; comments carry the text
/// between `<!--` and `-->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'s> {
    /// `<`
    TagOpen,
    /// `</`
    CloseTagOpen,
    /// `>`
    TagClose,
    /// `/>`
    SelfClose,
    /// A tag or attribute name.
    Name(&'s str),
    /// `=`
    Equals,
    /// A quoted attribute value, quotes stripped.
    Quoted(&'s str),
    /// An unquoted attribute value.
    Unquoted(&'s str),
    /// A comment body.
    Comment(&'s str),
    /// A markup declaration (`<!DOCTYPE ...>`) or processing
    /// instruction (`<?xml ...?>`), skipped by the grammar.
    Declaration(&'s str),
    /// Character data between tags.
    Text(&'s str),
}

impl Token<'_> {
    /// The token name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Token::TagOpen => "'<'",
            Token::CloseTagOpen => "'</'",
            Token::TagClose => "'>'",
            Token::SelfClose => "'/>'",
            Token::Name(_) => "NAME",
            Token::Equals => "'='",
            Token::Quoted(_) => "VALUE",
            Token::Unquoted(_) => "VALUE",
            Token::Comment(_) => "COMMENT",
            Token::Declaration(_) => "DECLARATION",
            Token::Text(_) => "TEXT",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::TagOpen => write!(f, "<"),
            Token::CloseTagOpen => write!(f, "</"),
            Token::TagClose => write!(f, ">"),
            Token::SelfClose => write!(f, "/>"),
            Token::Name(name) => write!(f, "{name}"),
            Token::Equals => write!(f, "="),
            Token::Quoted(value) => write!(f, "\"{value}\""),
            Token::Unquoted(value) => write!(f, "{value}"),
            Token::Comment(body) => write!(f, "<!--{body}-->"),
            Token::Declaration(body) => write!(f, "{body}"),
            Token::Text(text) => write!(f, "{text}"),
        }
    }
}

/// A token together with the span it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'s> {
    pub token: Token<'s>,
    pub span: Span,
}

impl<'s> PositionedToken<'s> {
    pub fn new(token: Token<'s>, span: Span) -> Self {
        Self { token, span }
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

impl winnow::stream::Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.end()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}
