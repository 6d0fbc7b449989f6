//! Contextual lexer for single lines of bracket notation.
//!
//! Outside brackets the lexer recognizes `【`, `】`, the literals `的` and
//! `连接`, and free text. Directly after a `【` it reads field text up to
//! the next `】` (or `【`), so the literals are plain characters inside a
//! field. A `【` that is not closed before the end of the line or the next
//! `【` produces an `E001` warning; lexing never fails.

use winnow::{
    Parser as _,
    combinator::alt,
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, take_while},
};

use log::trace;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

fn is_reserved(c: char) -> bool {
    matches!(c, '【' | '】' | '的' | '连')
}

fn positioned<'a>(token: Token<'a>, range: std::ops::Range<usize>) -> PositionedToken<'a> {
    PositionedToken::new(token, Span::new(range))
}

/// Parse one token outside of brackets.
fn outside_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    alt((
        '【'.value(Token::DelimOpen),
        '】'.value(Token::DelimClose),
        literal("连接").value(Token::Connector),
        '的'.value(Token::Of),
        take_while(1.., |c: char| !is_reserved(c)).map(Token::Text),
        // A `连` that does not start `连接`
        '连'.take().map(Token::Text),
    ))
    .with_span()
    .map(|(token, range)| positioned(token, range))
    .parse_next(input)
}

/// Parse the text of a bracketed field.
fn field_text<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    take_while(1.., |c: char| c != '】' && c != '【')
        .map(Token::Field)
        .with_span()
        .map(|(token, range)| positioned(token, range))
        .parse_next(input)
}

fn delim_close<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    '】'.value(Token::DelimClose)
        .with_span()
        .map(|(token, range)| positioned(token, range))
        .parse_next(input)
}

/// Lexer that accumulates the tokens and warnings of one line.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    warnings: Vec<Diagnostic>,
    /// Byte offset of the line in the whole source
    offset: usize,
}

impl<'a> Lexer<'a> {
    fn new(offset: usize) -> Self {
        Self {
            tokens: Vec::new(),
            warnings: Vec::new(),
            offset,
        }
    }

    fn push(&mut self, mut token: PositionedToken<'a>) {
        token.span = token.span.shift(self.offset);
        self.tokens.push(token);
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match outside_token(&mut input) {
                Ok(token) => {
                    let open = (token.token == Token::DelimOpen).then_some(token.span);
                    self.push(token);
                    if let Some(open) = open {
                        self.bracket_body(&mut input, open);
                    }
                }
                Err(_) => {
                    // Every character is covered by `outside_token`; skip
                    // rather than loop forever should that ever change.
                    let _ = input.next_token();
                }
            }
        }
    }

    /// Lex what follows a `【`: an optional field and the closing `】`.
    fn bracket_body(&mut self, input: &mut Input<'a>, open: Span) {
        if let Ok(field) = field_text(input) {
            self.push(field);
        }

        match delim_close(input) {
            Ok(close) => self.push(close),
            Err(_) => {
                let end = input.current_token_start();
                let span = Span::new(open.start()..end).shift(self.offset);
                trace!(start = span.start(), end = span.end(); "Unterminated bracket");
                self.warnings.push(
                    Diagnostic::warning("unterminated bracket")
                        .with_code(ErrorCode::E001)
                        .with_label(span, "this `【` is never closed")
                        .with_help("add a closing `】`"),
                );
            }
        }
    }
}

/// Tokens and lexer warnings of one line.
#[derive(Debug)]
pub(crate) struct LexedLine<'a> {
    pub tokens: Vec<PositionedToken<'a>>,
    pub warnings: Vec<Diagnostic>,
}

/// Tokenize a single line that starts at byte `offset` of the source.
///
/// Token spans are relative to the whole source.
pub(crate) fn tokenize_line(line: &str, offset: usize) -> LexedLine<'_> {
    let mut lexer = Lexer::new(offset);
    lexer.tokenize(LocatingSlice::new(line));
    LexedLine {
        tokens: lexer.tokens,
        warnings: lexer.warnings,
    }
}
