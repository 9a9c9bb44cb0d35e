//! Text-to-structure parser for the enzyme flat-file dialect
//!
//! This module provides the whole parsing pipeline below the section level:
//! - **logos** for the mode-switching lexer
//! - hand-written recursive productions over the token stream
//!
//! ## Architecture
//!
//! ```text
//! Entry Text
//!     ↓
//! Tokenizer (logos, mode stack) → Lexemes with positions
//!     ↓
//! Grammar production → typed Parsed value
//!     ↓
//! Field dispatch → builder calls
//! ```
//!
//! The tokenizer mirrors the nesting of the source text with a stack of
//! lexer modes: bracket pairs push a mode on open and pop it on close, so
//! the same characters mean different things inside `#...#`, `<...>`,
//! `{...}` and `(...)`. The grammar then only sees well-delimited spans.

pub mod ast;
pub mod errors;
pub mod grammar;
pub mod registry;

mod lexer;

pub use ast::*;
pub use errors::{ParseError, RecordError, SectionError};
pub use grammar::{Production, UnknownProduction, parse};
pub use lexer::{Lexeme, Token, Tokenizer, tokenize};
