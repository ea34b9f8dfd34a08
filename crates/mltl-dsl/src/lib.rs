#![doc = include_str!("../README.md")]

//! MLTL surface syntax: the formula AST, its parser, and parse diagnostics.

pub mod ast;
pub mod errors;
pub mod parser;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;

pub use ast::{Formula, Interval, Span};
pub use errors::ParseError;
pub use parser::{parse, parse_with_config, ParserConfig, DEFAULT_MAX_NESTING};
