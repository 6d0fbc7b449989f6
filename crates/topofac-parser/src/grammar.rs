//! Grammar of a connection statement over the token stream.
//!
//! ```text
//! field     = "【" FIELD "】"
//! endpoint  = field field "的" field field
//! statement = endpoint "连接" endpoint
//! ```
//!
//! The eight fields are, in order: source environment, datacenter, area and
//! device, then target environment, datacenter, area and device. Tokens must
//! be adjacent; any text between the slots breaks the statement. A line may
//! carry text before and after a statement, and the leftmost statement wins.

use std::fmt;

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode, ModalResult},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    span::Span,
    tokens::{PositionedToken, Token},
};

/// What the grammar expected when a statement failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expected {
    Open,
    Field,
    Close,
    Of,
    Connector,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Open => write!(f, "`【`"),
            Expected::Field => write!(f, "a non-empty field"),
            Expected::Close => write!(f, "`】`"),
            Expected::Of => write!(f, "`的`"),
            Expected::Connector => write!(f, "`连接`"),
        }
    }
}

type Input<'t, 'src> = TokenSlice<'t, PositionedToken<'src>>;
type IResult<O> = ModalResult<O, ContextError<Expected>>;

/// One side of a connection: a device and the three names it is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'src> {
    environment: &'src str,
    datacenter: &'src str,
    area: &'src str,
    device: &'src str,
    span: Span,
}

impl<'src> Endpoint<'src> {
    pub fn environment(&self) -> &'src str {
        self.environment
    }

    pub fn datacenter(&self) -> &'src str {
        self.datacenter
    }

    pub fn area(&self) -> &'src str {
        self.area
    }

    pub fn device(&self) -> &'src str {
        self.device
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A matched `source 连接 target` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'src> {
    source: Endpoint<'src>,
    target: Endpoint<'src>,
}

impl<'src> Statement<'src> {
    pub fn source(&self) -> &Endpoint<'src> {
        &self.source
    }

    pub fn target(&self) -> &Endpoint<'src> {
        &self.target
    }

    /// Returns the span from the first `【` to the last `】`.
    pub fn span(&self) -> Span {
        self.source.span.union(self.target.span)
    }
}

/// Location and cause of a failed match on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: Expected,
    /// The offending token, or an empty span at the end of the line
    pub at: Span,
    /// Span of the partial statement that matched before `at`
    pub partial: Option<Span>,
}

fn open(input: &mut Input<'_, '_>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| {
        (token.token == Token::DelimOpen).then_some(token.span)
    })
    .context(Expected::Open)
    .parse_next(input)
}

fn close(input: &mut Input<'_, '_>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| {
        (token.token == Token::DelimClose).then_some(token.span)
    })
    .context(Expected::Close)
    .parse_next(input)
}

fn of(input: &mut Input<'_, '_>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token == Token::Of)
        .void()
        .context(Expected::Of)
        .parse_next(input)
}

fn connector(input: &mut Input<'_, '_>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token == Token::Connector)
        .void()
        .context(Expected::Connector)
        .parse_next(input)
}

fn field_text<'src>(input: &mut Input<'_, 'src>) -> IResult<&'src str> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Field(text) => Some(text),
        _ => None,
    })
    .context(Expected::Field)
    .parse_next(input)
}

/// Parse `【text】`, returning the text and the span including brackets.
fn field<'src>(input: &mut Input<'_, 'src>) -> IResult<(&'src str, Span)> {
    (open, field_text, close)
        .map(|(start, text, end)| (text, start.union(end)))
        .parse_next(input)
}

fn endpoint<'src>(input: &mut Input<'_, 'src>) -> IResult<Endpoint<'src>> {
    (field, field, of, field, field)
        .map(
            |((environment, first), (datacenter, _), (), (area, _), (device, last))| Endpoint {
                environment,
                datacenter,
                area,
                device,
                span: first.union(last),
            },
        )
        .parse_next(input)
}

fn statement<'src>(input: &mut Input<'_, 'src>) -> IResult<Statement<'src>> {
    (endpoint, connector, endpoint)
        .map(|(source, (), target)| Statement { source, target })
        .parse_next(input)
}

fn expected_of(err: &ErrMode<ContextError<Expected>>) -> Option<Expected> {
    match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().copied(),
        ErrMode::Incomplete(_) => None,
    }
}

/// Find the leftmost statement in the tokens of one line.
///
/// On failure, reports where the attempt from the first `【` stopped; `line`
/// is used when the line has no `【` at all.
pub(crate) fn find_statement<'src>(
    tokens: &[PositionedToken<'src>],
    line: Span,
) -> Result<Statement<'src>, Mismatch> {
    let end_of_line = Span::new(line.end()..line.end());
    let mut first_failure: Option<Mismatch> = None;

    let starts = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.token == Token::DelimOpen)
        .map(|(idx, _)| idx);

    for start in starts {
        let window = &tokens[start..];
        let mut slice = TokenSlice::new(window);

        match statement.parse_next(&mut slice) {
            Ok(statement) => return Ok(statement),
            Err(err) if first_failure.is_none() => {
                let reached = start + window.len() - slice.eof_offset();
                let at = tokens.get(reached).map_or(end_of_line, |token| token.span);
                let partial = (reached > start)
                    .then(|| tokens[start].span.union(tokens[reached - 1].span));
                first_failure = Some(Mismatch {
                    expected: expected_of(&err).unwrap_or(Expected::Open),
                    at,
                    partial,
                });
            }
            Err(_) => {}
        }
    }

    Err(first_failure.unwrap_or(Mismatch {
        expected: Expected::Open,
        at: line,
        partial: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;

    const ROUND_TRIP: &str = "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";

    fn with_statement<R>(line: &str, check: impl FnOnce(Result<Statement<'_>, Mismatch>) -> R) -> R {
        let lexed = tokenize_line(line, 0);
        check(find_statement(&lexed.tokens, Span::new(0..line.len())))
    }

    fn mismatch(line: &str) -> Mismatch {
        with_statement(line, |result| result.unwrap_err())
    }

    #[test]
    fn test_statement_slots_in_order() {
        with_statement(ROUND_TRIP, |result| {
            let statement = result.unwrap();
            let (source, target) = (statement.source(), statement.target());

            assert_eq!(source.environment(), "生产网");
            assert_eq!(source.datacenter(), "亦庄");
            assert_eq!(source.area(), "核心区");
            assert_eq!(source.device(), "路由器1");
            assert_eq!(target.device(), "交换机1");
            assert_eq!(statement.span(), Span::new(0..ROUND_TRIP.len()));
        });
    }

    #[test]
    fn test_text_around_statement_is_ignored() {
        let line = format!("备注：{ROUND_TRIP}。");
        with_statement(&line, |result| {
            let statement = result.unwrap();
            assert_eq!(statement.source().device(), "路由器1");
            assert_eq!(statement.target().device(), "交换机1");
        });
    }

    #[test]
    fn test_leftmost_statement_wins() {
        let line = format!("【x】{ROUND_TRIP}");
        with_statement(&line, |result| {
            assert_eq!(result.unwrap().source().environment(), "生产网");
        });
    }

    #[test]
    fn test_missing_of_is_reported() {
        let line = "【生产网】【亦庄】【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
        let mismatch = mismatch(line);
        assert_eq!(mismatch.expected, Expected::Of);
        assert!(mismatch.partial.is_some());
    }

    #[test]
    fn test_whitespace_between_slots_breaks_statement() {
        let line = "【生产网】 【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
        with_statement(line, |result| assert!(result.is_err()));
    }

    #[test]
    fn test_truncated_statement_points_at_end_of_line() {
        let line = "【生产网】【亦庄】的【核心区】【路由器1】连接";
        let mismatch = mismatch(line);
        assert_eq!(mismatch.expected, Expected::Open);
        assert_eq!(mismatch.at, Span::new(line.len()..line.len()));
    }

    #[test]
    fn test_line_without_brackets() {
        let line = "路由器连接交换机";
        let mismatch = mismatch(line);
        assert_eq!(mismatch.at, Span::new(0..line.len()));
        assert!(mismatch.partial.is_none());
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let line = "【】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
        let mismatch = mismatch(line);
        assert_eq!(mismatch.expected, Expected::Field);
        assert_eq!(mismatch.at, Span::new(3..6));
    }
}
