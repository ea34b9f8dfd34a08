#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Span;

/// Name attached to the source snippet when the caller gives none.
pub const DEFAULT_SOURCE_NAME: &str = "formula";

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Missing closing parenthesis")]
    #[diagnostic(code(mltl::parse::unclosed_paren))]
    UnclosedParen {
        #[label("parenthesis opened here is never closed")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Expected '[' after temporal operator {operator}")]
    #[diagnostic(
        code(mltl::parse::missing_interval),
        help("temporal operators take a window, e.g. F[0,3] or U[1,4]")
    )]
    MissingIntervalOpen {
        operator: char,
        #[label("interval expected here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unclosed interval")]
    #[diagnostic(code(mltl::parse::unterminated_interval))]
    UnterminatedInterval {
        #[label("no matching ']'")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Malformed interval '[{body}]'")]
    #[diagnostic(
        code(mltl::parse::malformed_interval),
        help("an interval is two non-negative integers separated by a comma, e.g. [0,3]")
    )]
    MalformedInterval {
        body: String,
        #[label("expected low,high")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Interval lower bound {low} exceeds upper bound {high}")]
    #[diagnostic(code(mltl::parse::inverted_interval))]
    InvertedInterval {
        low: u32,
        high: u32,
        #[label("empty window")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unexpected character '{found}': expected {expected}")]
    #[diagnostic(code(mltl::parse::unexpected_char))]
    UnexpectedChar {
        found: char,
        expected: String,
        #[label("unexpected character")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unexpected end of input: expected {expected}")]
    #[diagnostic(code(mltl::parse::unexpected_end))]
    UnexpectedEnd {
        expected: String,
        #[label("input ends here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unexpected extra input: {rest}")]
    #[diagnostic(
        code(mltl::parse::trailing_input),
        help("join formulas with '&' or '|', or pass them as separate formulas")
    )]
    TrailingInput {
        rest: String,
        #[label("not part of the formula")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Formula nesting exceeds the limit of {limit}")]
    #[diagnostic(code(mltl::parse::nesting_too_deep))]
    NestingTooDeep {
        limit: usize,
        #[label("limit reached here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

pub(crate) fn named_source(source: &str, name: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(name, source.to_owned())
}

pub(crate) fn source_span(span: Span) -> miette::SourceSpan {
    (span.start, span.len()).into()
}

impl ParseError {
    /// Byte range of the offending input.
    pub fn span(&self) -> Span {
        let s = match self {
            ParseError::UnclosedParen { span, .. }
            | ParseError::MissingIntervalOpen { span, .. }
            | ParseError::UnterminatedInterval { span, .. }
            | ParseError::MalformedInterval { span, .. }
            | ParseError::InvertedInterval { span, .. }
            | ParseError::UnexpectedChar { span, .. }
            | ParseError::UnexpectedEnd { span, .. }
            | ParseError::TrailingInput { span, .. }
            | ParseError::NestingTooDeep { span, .. } => span,
        };
        Span::new(s.offset(), s.offset() + s.len())
    }

    /// Re-attach the source text under a new name (e.g. `formula[3]`) so
    /// miette renders the snippet with a meaningful label.
    pub fn with_source_context(mut self, source: &str, name: &str) -> Self {
        let fresh = named_source(source, name);
        match &mut self {
            ParseError::UnclosedParen { src, .. }
            | ParseError::MissingIntervalOpen { src, .. }
            | ParseError::UnterminatedInterval { src, .. }
            | ParseError::MalformedInterval { src, .. }
            | ParseError::InvertedInterval { src, .. }
            | ParseError::UnexpectedChar { src, .. }
            | ParseError::UnexpectedEnd { src, .. }
            | ParseError::TrailingInput { src, .. }
            | ParseError::NestingTooDeep { src, .. } => *src = fresh,
        }
        self
    }
}
