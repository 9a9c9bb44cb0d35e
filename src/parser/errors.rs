//! Error types for the parsing pipeline.
//!
//! Three tiers, matching where a failure can be contained:
//! - [`SectionError`] - record boundaries in the line stream cannot be
//!   trusted; fatal for the whole input.
//! - [`RecordError`] - one record could not be parsed or built; the caller
//!   skips the record and continues with the next one.
//! - [`ParseError`] - one grammar production failed to match; contained by
//!   the record level.
//!
//! Lexical errors are not `Err` values. The tokenizer emits an inline error
//! token for an unrecognized character, logs it, skips one character and
//! continues.

use smol_str::SmolStr;
use text_size::TextSize;
use thiserror::Error;

/// Longest remainder snippet quoted in a [`ParseError`].
const SNIPPET_LEN: usize = 40;

/// A grammar production failed to match.
///
/// Matching is all-or-nothing per production. The error names the production
/// that was being tried and carries the byte offset and line where matching
/// stopped, plus a snippet of the unconsumed remainder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{production} did not match at line {line}, offset {offset:?}: '{remainder}'")]
pub struct ParseError {
    /// Name of the production that failed, in `Production` selector form.
    pub production: &'static str,
    /// Byte offset into the text handed to the production.
    pub offset: TextSize,
    /// 1-based line within that text; drivers rebase it onto the input file.
    pub line: usize,
    /// Truncated unconsumed remainder, for locating the problem.
    pub remainder: SmolStr,
}

impl ParseError {
    pub fn new(production: &'static str, offset: TextSize, line: usize, remainder: &str) -> Self {
        Self {
            production,
            offset,
            line,
            remainder: snippet(remainder),
        }
    }

    /// Replace the text-relative line number with an absolute input line.
    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// Truncate `text` to a quotable snippet.
fn snippet(text: &str) -> SmolStr {
    let end = text
        .char_indices()
        .map(|(i, _)| i)
        .chain([text.len()])
        .take_while(|&i| i <= SNIPPET_LEN)
        .last()
        .unwrap_or(0);
    if end < text.len() {
        SmolStr::from(format!("{}...", &text[..end]))
    } else {
        SmolStr::new(text)
    }
}

/// Record-boundary violations in the line stream.
///
/// Any of these ends the whole parse: once `ID`/`///` alternation is broken,
/// later record boundaries cannot be trusted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SectionError {
    /// A second `ID` line appeared while a record was still open.
    #[error("record begins at line {line} while the record from line {open_since} is still open")]
    UnbalancedBegin { line: usize, open_since: usize },

    /// A `///` line appeared with no open record.
    #[error("record terminator at line {line} without an open record")]
    UnbalancedEnd { line: usize },

    /// The input ended while a record was still open.
    #[error("input ended inside the record opened at line {open_since}")]
    UnterminatedRecord { open_since: usize },
}

impl SectionError {
    /// Input line the violation was detected on.
    pub fn line(&self) -> usize {
        match *self {
            Self::UnbalancedBegin { line, .. } | Self::UnbalancedEnd { line } => line,
            Self::UnterminatedRecord { open_since } => open_since,
        }
    }
}

/// Why one record could not be turned into domain records.
///
/// Recoverable at the stream level: the caller reports the record (with its
/// EC number when the header line was readable) and continues.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Heading not present in the information-field registry.
    #[error("unknown field heading '{heading}' at line {line}")]
    UnknownField { heading: SmolStr, line: usize },

    /// The record's first content line is not an `ID` header.
    #[error("record does not begin with an ID header (line {line})")]
    MissingHeader { line: usize },

    /// The record ended without a `///` terminator line.
    #[error("record ended without terminator")]
    Unterminated,

    /// The builder refused a construct.
    #[error("builder rejected record content: {0}")]
    Builder(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl RecordError {
    pub fn builder(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Builder(Box::new(err))
    }
}
