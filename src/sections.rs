//! Section splitter: groups the raw line stream into one buffer per enzyme
//! record, `ID` line through `///` line inclusive.
//!
//! This is a stream filter with no parsing logic. It runs lazily over any
//! line iterator, drops `*` comment lines, and checks only record-marker
//! balance. Boundary violations are fatal for the whole stream because the
//! record boundaries cannot be trusted afterwards; the iterator fuses on
//! the first error.

use crate::parser::errors::SectionError;

/// One input line with its 1-based position in the source stream.
///
/// Positions count every input line, including dropped comment lines, so
/// they match what an editor shows for the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// The lines of one enzyme record, `ID` through `///`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroup {
    pub lines: Vec<SourceLine>,
}

impl LineGroup {
    /// Source line number of the record's `ID` line.
    pub fn first_line(&self) -> usize {
        self.lines.first().map_or(0, |l| l.number)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceLine> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a LineGroup {
    type Item = &'a SourceLine;
    type IntoIter = std::slice::Iter<'a, SourceLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Splits a line stream into record groups.
///
/// Works on an unbounded stream: each call to `next` reads input only up
/// to the end of one record. The stream between records may contain blank
/// or stray lines; they are skipped.
pub fn split_sections<I>(lines: I) -> SectionSplitter<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    SectionSplitter {
        input: lines.into_iter(),
        line: 0,
        open: None,
        failed: false,
    }
}

pub struct SectionSplitter<I> {
    input: I,
    line: usize,
    open: Option<(usize, Vec<SourceLine>)>,
    failed: bool,
}

impl<I> Iterator for SectionSplitter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<LineGroup, SectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let Some(raw) = self.input.next() else {
                if let Some((open_since, _)) = self.open.take() {
                    self.failed = true;
                    return Some(Err(SectionError::UnterminatedRecord { open_since }));
                }
                return None;
            };
            self.line += 1;
            let number = self.line;
            let text = raw.as_ref().trim_end_matches(['\n', '\r']);

            if text.starts_with('*') {
                continue;
            }
            if text.starts_with("ID") {
                if let Some((open_since, _)) = self.open {
                    self.failed = true;
                    return Some(Err(SectionError::UnbalancedBegin {
                        line: number,
                        open_since,
                    }));
                }
                self.open = Some((
                    number,
                    vec![SourceLine {
                        number,
                        text: text.to_owned(),
                    }],
                ));
                continue;
            }
            if text.starts_with("///") {
                return match self.open.take() {
                    Some((_, mut lines)) => {
                        lines.push(SourceLine {
                            number,
                            text: text.to_owned(),
                        });
                        Some(Ok(LineGroup { lines }))
                    }
                    None => {
                        self.failed = true;
                        Some(Err(SectionError::UnbalancedEnd { line: number }))
                    }
                };
            }
            match &mut self.open {
                Some((_, lines)) => lines.push(SourceLine {
                    number,
                    text: text.to_owned(),
                }),
                None => {
                    if !text.trim().is_empty() {
                        tracing::trace!("skipping line {} outside any record", number);
                    }
                }
            }
        }
    }
}
