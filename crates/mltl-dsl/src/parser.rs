#![allow(clippy::result_large_err)]

//! Parser for the MLTL surface syntax.
//!
//! ```text
//! expr     := unary (binop unary)*
//! binop    := '&' | '|' | 'U' interval | 'R' interval
//! unary    := '!' unary | 'F' interval unary | 'G' interval unary
//!           | '(' expr ')' | atom
//! atom     := [A-Za-z][A-Za-z0-9]*
//! interval := '[' digits ',' digits ']'
//! ```
//!
//! Every binary operator has the same precedence and associates to the left,
//! so `a | b & c` is `(a | b) & c`.
//!
//! `mltl.pest` splits the input into tokens. The tree is assembled from the
//! token pairs with an explicit stack of pending operators, so deeply nested
//! input costs heap, not native stack.

use std::iter::Peekable;

use pest::Parser;
use pest_derive::Parser;

use crate::ast::{Formula, Interval, Span};
use crate::errors::{named_source, source_span, ParseError, DEFAULT_SOURCE_NAME};

#[derive(Parser)]
#[grammar = "mltl.pest"]
struct MltlParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;
type Tokens<'a> = Peekable<std::vec::IntoIter<Pair<'a>>>;

/// Default nesting limit, see [`ParserConfig::max_nesting`].
pub const DEFAULT_MAX_NESTING: usize = 512;

const EXPECTED_OPERAND: &str = "an atom, '!', '(', 'F[..]' or 'G[..]'";

/// Parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of parentheses, prefix operators and binary operators
    /// inside one another. A run of the same connective (`a & b & c`) counts
    /// as one level however long it is. Input beyond this fails with
    /// [`ParseError::NestingTooDeep`].
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

/// Parse one MLTL formula.
pub fn parse(source: &str) -> Result<Formula, ParseError> {
    parse_with_config(source, &ParserConfig::default())
}

/// Parse one MLTL formula under explicit limits.
pub fn parse_with_config(source: &str, config: &ParserConfig) -> Result<Formula, ParseError> {
    let pairs = MltlParser::parse(Rule::formula, source).map_err(|e| {
        let at = match e.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((s, _)) => s,
        };
        unexpected_at(source, at, EXPECTED_OPERAND)
    })?;
    let tokens: Vec<Pair<'_>> = pairs
        .flat_map(|formula| formula.into_inner())
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .collect();

    let mut tokens = tokens.into_iter().peekable();
    let mut builder = TreeBuilder::new(source, config.max_nesting);
    while let Some(token) = tokens.next() {
        builder.push(token, &mut tokens)?;
    }
    builder.finish()
}

fn unexpected_at(source: &str, at: usize, expected: &str) -> ParseError {
    match source.get(at..).and_then(|rest| rest.chars().next()) {
        None => ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            span: source_span(Span::new(source.len(), source.len())),
            src: named_source(source, DEFAULT_SOURCE_NAME),
        },
        Some(found) => ParseError::UnexpectedChar {
            found,
            expected: expected.to_string(),
            span: source_span(Span::new(at, at + found.len_utf8())),
            src: named_source(source, DEFAULT_SOURCE_NAME),
        },
    }
}

fn start_of(pair: &Pair<'_>) -> usize {
    pair.as_span().start()
}

/// A finished subtree and its nesting level.
struct Node {
    formula: Formula,
    nesting: usize,
}

enum Prefix {
    Not,
    Eventually(Interval),
    Always(Interval),
}

impl Prefix {
    fn apply(self, sub: Formula) -> Formula {
        let sub = Box::new(sub);
        match self {
            Prefix::Not => Formula::Not(sub),
            Prefix::Eventually(iv) => Formula::Eventually(iv, sub),
            Prefix::Always(iv) => Formula::Always(iv, sub),
        }
    }
}

enum Connective {
    And,
    Or,
    Until(Interval),
    Release(Interval),
}

impl Connective {
    fn apply(self, lhs: Formula, rhs: Formula) -> Formula {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Connective::And => Formula::And(lhs, rhs),
            Connective::Or => Formula::Or(lhs, rhs),
            Connective::Until(iv) => Formula::Until(iv, lhs, rhs),
            Connective::Release(iv) => Formula::Release(iv, lhs, rhs),
        }
    }

    /// Whether `lhs` continues a run of this same connective.
    fn extends(&self, lhs: &Formula) -> bool {
        matches!(
            (self, lhs),
            (Connective::And, Formula::And(..)) | (Connective::Or, Formula::Or(..))
        )
    }
}

/// Operators still waiting for an operand.
enum Frame {
    Open { at: usize },
    Prefix(Prefix),
    Binary(Node, Connective),
}

struct TreeBuilder<'a> {
    source: &'a str,
    max_nesting: usize,
    stack: Vec<Frame>,
    /// `Open` and `Prefix` frames on the stack.
    pending: usize,
    /// Set while an operator (or the end of input) is expected.
    operand: Option<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, max_nesting: usize) -> Self {
        Self {
            source,
            max_nesting,
            stack: Vec::new(),
            pending: 0,
            operand: None,
        }
    }

    fn src(&self) -> miette::NamedSource<String> {
        named_source(self.source, DEFAULT_SOURCE_NAME)
    }

    fn char_width(&self, at: usize) -> usize {
        self.source
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8)
    }

    fn too_deep(&self, at: usize) -> ParseError {
        ParseError::NestingTooDeep {
            limit: self.max_nesting,
            span: source_span(Span::new(at, at + self.char_width(at))),
            src: self.src(),
        }
    }

    fn trailing(&self, at: usize) -> ParseError {
        ParseError::TrailingInput {
            rest: self.source[at..].trim_end().to_string(),
            span: source_span(Span::new(at, self.source.len())),
            src: self.src(),
        }
    }

    fn push(&mut self, token: Pair<'a>, rest: &mut Tokens<'a>) -> Result<(), ParseError> {
        if self.operand.is_some() {
            self.push_operator(token, rest)
        } else {
            self.push_operand(token, rest)
        }
    }

    fn push_operand(&mut self, token: Pair<'a>, rest: &mut Tokens<'a>) -> Result<(), ParseError> {
        let at = start_of(&token);
        match token.as_rule() {
            Rule::ident => match token.as_str() {
                "F" => {
                    let iv = self.interval_after('F', rest)?;
                    self.open(Frame::Prefix(Prefix::Eventually(iv)), at)
                }
                "G" => {
                    let iv = self.interval_after('G', rest)?;
                    self.open(Frame::Prefix(Prefix::Always(iv)), at)
                }
                name => {
                    let leaf = Node {
                        formula: Formula::Atom(name.to_string()),
                        nesting: 1,
                    };
                    self.reduce(leaf, at)
                }
            },
            Rule::not => self.open(Frame::Prefix(Prefix::Not), at),
            Rule::lparen => self.open(Frame::Open { at }, at),
            _ => Err(unexpected_at(self.source, at, EXPECTED_OPERAND)),
        }
    }

    fn push_operator(&mut self, token: Pair<'a>, rest: &mut Tokens<'a>) -> Result<(), ParseError> {
        let at = start_of(&token);
        let word = token.as_str();
        let connective = match token.as_rule() {
            Rule::and => Connective::And,
            Rule::or => Connective::Or,
            Rule::rparen => return self.close(at),
            Rule::ident if word == "U" => Connective::Until(self.interval_after('U', rest)?),
            Rule::ident if word == "R" => Connective::Release(self.interval_after('R', rest)?),
            Rule::ident if word.starts_with(|c: char| c == 'U' || c == 'R') => {
                let operator = if word.starts_with('U') { 'U' } else { 'R' };
                let next = at + 1;
                return Err(ParseError::MissingIntervalOpen {
                    operator,
                    span: source_span(Span::new(next, next + self.char_width(next))),
                    src: self.src(),
                });
            }
            _ => return Err(self.trailing(at)),
        };
        let Some(lhs) = self.operand.take() else {
            return Err(self.trailing(at));
        };
        self.stack.push(Frame::Binary(lhs, connective));
        Ok(())
    }

    /// Consume the window that must follow temporal operator `operator`.
    fn interval_after(&self, operator: char, rest: &mut Tokens<'a>) -> Result<Interval, ParseError> {
        if let Some(window) = rest.next_if(|p| p.as_rule() == Rule::interval) {
            return self.interval(&window);
        }
        let at = rest.peek().map_or(self.source.len(), start_of);
        Err(ParseError::MissingIntervalOpen {
            operator,
            span: source_span(Span::new(at, at + self.char_width(at))),
            src: self.src(),
        })
    }

    fn interval(&self, window: &Pair<'a>) -> Result<Interval, ParseError> {
        let span = Span::new(window.as_span().start(), window.as_span().end());
        let Some(body) = window
            .as_str()
            .strip_prefix('[')
            .and_then(|text| text.strip_suffix(']'))
        else {
            return Err(ParseError::UnterminatedInterval {
                span: source_span(span),
                src: self.src(),
            });
        };

        let malformed = || ParseError::MalformedInterval {
            body: body.to_string(),
            span: source_span(span),
            src: self.src(),
        };
        let mut parts = body.split(',');
        let (Some(lo), Some(hi), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let low = parse_bound(lo).ok_or_else(malformed)?;
        let high = parse_bound(hi).ok_or_else(malformed)?;
        if low > high {
            return Err(ParseError::InvertedInterval {
                low,
                high,
                span: source_span(span),
                src: self.src(),
            });
        }
        Ok(Interval::new(low, high))
    }

    fn open(&mut self, frame: Frame, at: usize) -> Result<(), ParseError> {
        if self.pending >= self.max_nesting {
            return Err(self.too_deep(at));
        }
        self.pending += 1;
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self, at: usize) -> Result<(), ParseError> {
        let Some(Frame::Open { .. }) = self.stack.last() else {
            return Err(self.trailing(at));
        };
        self.stack.pop();
        self.pending -= 1;
        let Some(inner) = self.operand.take() else {
            return Err(unexpected_at(self.source, at, EXPECTED_OPERAND));
        };
        self.reduce(inner, at)
    }

    /// Apply every pending prefix and binary operator that `node` completes.
    fn reduce(&mut self, mut node: Node, at: usize) -> Result<(), ParseError> {
        while let Some(frame) = self.stack.pop() {
            node = match frame {
                Frame::Open { at } => {
                    self.stack.push(Frame::Open { at });
                    break;
                }
                Frame::Prefix(prefix) => {
                    self.pending -= 1;
                    Node {
                        nesting: node.nesting + 1,
                        formula: prefix.apply(node.formula),
                    }
                }
                Frame::Binary(lhs, connective) => {
                    let nesting = if connective.extends(&lhs.formula) {
                        lhs.nesting.max(node.nesting + 1)
                    } else {
                        1 + lhs.nesting.max(node.nesting)
                    };
                    Node {
                        nesting,
                        formula: connective.apply(lhs.formula, node.formula),
                    }
                }
            };
            if node.nesting > self.max_nesting {
                return Err(self.too_deep(at));
            }
        }
        self.operand = Some(node);
        Ok(())
    }

    fn finish(mut self) -> Result<Formula, ParseError> {
        let Some(node) = self.operand.take() else {
            return Err(unexpected_at(self.source, self.source.len(), EXPECTED_OPERAND));
        };
        if let Some(Frame::Open { at }) = self.stack.pop() {
            return Err(ParseError::UnclosedParen {
                span: source_span(Span::new(at, at + 1)),
                src: self.src(),
            });
        }
        Ok(node.formula)
    }
}

/// Digits only; no sign, no empty bound, must fit in `u32`.
fn parse_bound(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok()
}
