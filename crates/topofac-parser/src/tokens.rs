//! Token kinds of the bracket notation.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Tokens of a single input line.
///
/// Field text is only produced between a `【` and the matching `】`, so the
/// literals `的` and `连接` are ordinary characters inside a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// `【`
    DelimOpen,
    /// `】`
    DelimClose,
    /// `的`, separating datacenter and area
    Of,
    /// `连接`, separating the two endpoints
    Connector,
    /// Text between a `【` and a `】`
    Field(&'src str),
    /// Any other text outside brackets
    Text(&'src str),
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::DelimOpen => write!(f, "【"),
            Token::DelimClose => write!(f, "】"),
            Token::Of => write!(f, "的"),
            Token::Connector => write!(f, "连接"),
            Token::Field(text) | Token::Text(text) => write!(f, "{text}"),
        }
    }
}
