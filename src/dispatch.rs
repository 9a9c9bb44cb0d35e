//! Field dispatcher and record walker.
//!
//! [`dispatch`] is the heading-to-production table: it selects the grammar
//! production for one field heading, parses the entry body and forwards
//! the typed result to the matching builder method. The walker above it
//! drives one whole record: it reassembles tab-continued entry blocks from
//! the record's lines and dispatches them one by one, tracking the
//! `AwaitingId -> InHeader -> InFields -> Done` record states.
//!
//! Failure containment follows the error tiers: a failed entry fails its
//! record, a failed record is reported and skipped, only broken record
//! boundaries end the whole run.

use rayon::prelude::*;
use smol_str::SmolStr;

use crate::builder::{Enzyme, EnzymeBuilder, RecordAssembler};
use crate::parser::errors::{RecordError, SectionError};
use crate::parser::grammar::{self, Production};
use crate::parser::registry;
use crate::sections::{LineGroup, split_sections};

/// Parses one entry body and forwards the result to the builder.
///
/// The heading picks the production: specialized shapes for the fields
/// that have one, the generic field entry for every other known heading.
/// Line numbers in errors are relative to `body`; the walker rebases them.
pub fn dispatch<B: EnzymeBuilder>(
    heading: &str,
    body: &str,
    builder: &mut B,
) -> Result<B::Output, RecordError> {
    let Some(field) = registry::lookup(heading) else {
        return Err(RecordError::UnknownField {
            heading: SmolStr::new(heading),
            line: 1,
        });
    };
    let name = field.production.name();
    match field.production {
        Production::EnzymeBegin => {
            let header = grammar::run(body, name, grammar::enzyme_begin)?;
            builder.build_enzyme(header).map_err(RecordError::builder)
        }
        Production::ProteinEntry => {
            let entry = grammar::run(body, name, grammar::protein_entry)?;
            builder.build_protein(entry).map_err(RecordError::builder)
        }
        Production::ReferenceEntry => {
            let entry = grammar::run(body, name, grammar::reference_entry)?;
            builder.build_reference(entry).map_err(RecordError::builder)
        }
        Production::KiValue => {
            let entry = grammar::run(body, name, |cur| grammar::kinetic_entry(cur, "KI", name))?;
            builder.build_ki_value(entry).map_err(RecordError::builder)
        }
        Production::KmValue => {
            let entry = grammar::run(body, name, |cur| grammar::kinetic_entry(cur, "KM", name))?;
            builder.build_km_value(entry).map_err(RecordError::builder)
        }
        Production::TurnoverNumber => {
            let entry = grammar::run(body, name, |cur| grammar::kinetic_entry(cur, "TN", name))?;
            builder
                .build_turnover_number(entry)
                .map_err(RecordError::builder)
        }
        Production::NaturalSubstrateProduct => {
            let entry = grammar::run(body, name, |cur| {
                grammar::substrate_product_entry(cur, "NSP", name)
            })?;
            builder
                .build_natural_substrate_product(entry)
                .map_err(RecordError::builder)
        }
        Production::SubstrateProduct => {
            let entry = grammar::run(body, name, |cur| {
                grammar::substrate_product_entry(cur, "SP", name)
            })?;
            builder
                .build_substrate_product(entry)
                .map_err(RecordError::builder)
        }
        // The generic entry shape is the default for every other heading.
        _ => {
            let entry = grammar::run(body, "field_entry", grammar::field_entry)?;
            builder.build_field_entry(entry).map_err(RecordError::builder)
        }
    }
}

// ============================================================================
// RECORD WALKER
// ============================================================================

enum WalkState {
    AwaitingId,
    InHeader,
    InFields,
    Done,
}

/// One entry block under assembly: a heading line plus its continuations.
struct Block {
    heading: SmolStr,
    text: String,
    /// Absolute source line per line of `text`, for error rebasing.
    lines: Vec<usize>,
}

impl Block {
    fn new(heading: SmolStr, text: &str, number: usize) -> Self {
        Self {
            heading,
            text: text.to_owned(),
            lines: vec![number],
        }
    }

    fn push_line(&mut self, text: &str, number: usize) {
        self.text.push('\n');
        self.text.push_str(text);
        self.lines.push(number);
    }
}

/// Walks one record's lines, dispatching each reassembled entry block.
///
/// Entry blocks end at the next heading, a blank line, a section banner
/// line or the record terminator. Lines after the terminator are not read.
pub fn walk_record<B: EnzymeBuilder>(
    group: &LineGroup,
    builder: &mut B,
) -> Result<(), RecordError> {
    let mut state = WalkState::AwaitingId;
    let mut open: Option<Block> = None;

    for line in group {
        let text = line.text.as_str();
        let number = line.number;

        if let WalkState::AwaitingId = state {
            if text.trim().is_empty() {
                continue;
            }
            if text.starts_with("ID") {
                open = Some(Block::new(SmolStr::new_static("ID"), text, number));
                state = WalkState::InHeader;
                continue;
            }
            return Err(RecordError::MissingHeader { line: number });
        }

        if text.trim().is_empty() {
            flush(&mut open, builder)?;
            continue;
        }
        if text.starts_with("///") {
            flush(&mut open, builder)?;
            grammar::run(text, "enzyme_end", grammar::enzyme_end)
                .map_err(|e| RecordError::Parse(e.at_line(number)))?;
            state = WalkState::Done;
            break;
        }
        if let Some(heading) = heading_of(text) {
            flush(&mut open, builder)?;
            open = Some(Block::new(SmolStr::new(heading), text, number));
            state = WalkState::InFields;
            continue;
        }
        if is_banner(text) {
            flush(&mut open, builder)?;
            continue;
        }
        if text.starts_with([' ', '\t']) {
            if let Some(block) = &mut open {
                block.push_line(text, number);
                continue;
            }
        }
        return Err(RecordError::UnknownField {
            heading: first_word(text),
            line: number,
        });
    }

    match state {
        WalkState::Done => Ok(()),
        _ => Err(RecordError::Unterminated),
    }
}

/// Dispatches the block under assembly, if any, rebasing error lines onto
/// the source file.
fn flush<B: EnzymeBuilder>(open: &mut Option<Block>, builder: &mut B) -> Result<(), RecordError> {
    let Some(block) = open.take() else {
        return Ok(());
    };
    match dispatch(&block.heading, &block.text, builder) {
        Ok(_) => Ok(()),
        Err(err) => Err(relocate(err, &block.lines)),
    }
}

fn relocate(err: RecordError, lines: &[usize]) -> RecordError {
    let first = lines.first().copied().unwrap_or(0);
    match err {
        RecordError::Parse(e) => {
            let abs = e
                .line
                .checked_sub(1)
                .and_then(|i| lines.get(i))
                .copied()
                .unwrap_or(first);
            RecordError::Parse(e.at_line(abs))
        }
        RecordError::UnknownField { heading, .. } => RecordError::UnknownField {
            heading,
            line: first,
        },
        other => other,
    }
}

/// A field heading: 2-4 uppercase alphanumerics directly followed by a tab.
fn heading_of(text: &str) -> Option<&str> {
    let (prefix, _) = text.split_once('\t')?;
    let ok = (2..=4).contains(&prefix.len())
        && prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if ok { Some(prefix) } else { None }
}

/// A section banner line, e.g. `PROTEIN` or `KM_VALUE`: uppercase name on
/// a line of its own. The tokenizer skips these; the walker does too.
fn is_banner(text: &str) -> bool {
    text.len() >= 4
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn first_word(text: &str) -> SmolStr {
    SmolStr::new(text.split_whitespace().next().unwrap_or_default())
}

// ============================================================================
// FLAT-FILE DRIVERS
// ============================================================================

/// One record that could not be finished into a record value.
#[derive(Debug)]
pub struct RecordFailure {
    /// EC number text recovered from the raw `ID` line, when readable.
    pub ec: Option<SmolStr>,
    /// Source line of the record's `ID` line.
    pub line: usize,
    pub error: RecordError,
}

/// Outcome of a whole-file parse. Record order follows the input; failed
/// records are collected instead of aborting the run.
#[derive(Debug)]
pub struct ParsedFlatFile<R = Enzyme> {
    pub enzymes: Vec<R>,
    pub failures: Vec<RecordFailure>,
}

impl<R> Default for ParsedFlatFile<R> {
    fn default() -> Self {
        Self {
            enzymes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Parses a whole flat-file text sequentially, assembling with the bundled
/// [`RecordAssembler`].
///
/// Only broken record boundaries abort the run; each failed record becomes
/// a [`RecordFailure`] and parsing continues with the next one.
pub fn parse_flat_file(text: &str) -> Result<ParsedFlatFile, SectionError> {
    parse_flat_file_with(text, RecordAssembler::new)
}

/// [`parse_flat_file`] generalized over the builder: every record is built
/// with a fresh builder from `factory` and the finished values are
/// collected in input order.
pub fn parse_flat_file_with<B, F>(
    text: &str,
    factory: F,
) -> Result<ParsedFlatFile<B::Record>, SectionError>
where
    B: EnzymeBuilder,
    F: Fn() -> B,
{
    let mut out = ParsedFlatFile::default();
    for group in split_sections(text.lines()) {
        match parse_group(&group?, factory()) {
            Ok(record) => out.enzymes.push(record),
            Err(failure) => out.failures.push(failure),
        }
    }
    tracing::info!(
        "parsed {} records ({} failed)",
        out.enzymes.len(),
        out.failures.len()
    );
    Ok(out)
}

/// Parses a whole flat-file text with one worker per record, assembling
/// with the bundled [`RecordAssembler`].
///
/// Records are independent: every worker owns its tokenizer and assembler,
/// so no parser state is shared. Output order matches the sequential
/// driver.
pub fn par_parse_flat_file(text: &str) -> Result<ParsedFlatFile, SectionError> {
    par_parse_flat_file_with(text, RecordAssembler::new)
}

/// [`par_parse_flat_file`] generalized over the builder. The factory runs
/// once per record on the worker threads, so every record gets a builder
/// of its own.
pub fn par_parse_flat_file_with<B, F>(
    text: &str,
    factory: F,
) -> Result<ParsedFlatFile<B::Record>, SectionError>
where
    B: EnzymeBuilder,
    B::Record: Send,
    F: Fn() -> B + Sync,
{
    let groups: Vec<LineGroup> = split_sections(text.lines()).collect::<Result<_, _>>()?;
    let results: Vec<_> = groups
        .par_iter()
        .map(|group| parse_group(group, factory()))
        .collect();

    let mut out = ParsedFlatFile::default();
    for result in results {
        match result {
            Ok(record) => out.enzymes.push(record),
            Err(failure) => out.failures.push(failure),
        }
    }
    tracing::info!(
        "parsed {} records ({} failed)",
        out.enzymes.len(),
        out.failures.len()
    );
    Ok(out)
}

/// Runs one record group through a fresh builder.
fn parse_group<B: EnzymeBuilder>(
    group: &LineGroup,
    mut builder: B,
) -> Result<B::Record, RecordFailure> {
    walk_record(group, &mut builder)
        .and_then(|()| builder.finish().map_err(RecordError::builder))
        .map_err(|error| {
            let ec = record_ec(group);
            tracing::error!(
                "skipping record {} at line {}: {}",
                ec.as_deref().unwrap_or("?"),
                group.first_line(),
                error
            );
            RecordFailure {
                ec,
                line: group.first_line(),
                error,
            }
        })
}

/// EC number text from a record's raw `ID` line, for failure reporting.
fn record_ec(group: &LineGroup) -> Option<SmolStr> {
    let line = group.lines.first()?.text.as_str();
    let rest = line.strip_prefix("ID")?.trim_start_matches(['\t', ' ']);
    let ec = rest
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    if ec.is_empty() {
        None
    } else {
        Some(SmolStr::new(ec))
    }
}
