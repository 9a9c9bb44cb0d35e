//! # brenda-parser
//!
//! Core library for parsing the BRENDA enzyme flat-file format into typed
//! records.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! dispatch  → Heading-to-production table, record walker, file drivers
//!   ↓
//! builder   → Builder capability, record assembler, domain records
//!   ↓
//! sections  → Record boundary splitting over the raw line stream
//!   ↓
//! parser    → Logos mode-stack lexer, grammar productions, field registry
//!   ↓
//! base      → Primitives (string interning)
//! ```
//!
//! The short version: [`sections::split_sections`] cuts the line stream
//! into records, [`dispatch::walk_record`] reassembles each record's entry
//! blocks and [`dispatch::dispatch`] parses every block and feeds the
//! result to a [`builder::EnzymeBuilder`]. The one-call drivers
//! [`dispatch::parse_flat_file`] and [`dispatch::par_parse_flat_file`]
//! wire those together with the bundled [`builder::RecordAssembler`];
//! their `_with` variants accept any builder factory instead.

// ============================================================================
// MODULES (dependency order: base → parser → sections → builder → dispatch)
// ============================================================================

/// Foundation types: string interning
pub mod base;

/// Parser: Logos mode-stack lexer, grammar productions, field registry
pub mod parser;

/// Sections: record boundary splitting over the line stream
pub mod sections;

/// Builder: the builder capability and the bundled record assembler
pub mod builder;

/// Dispatch: heading-to-production mapping, record walker, file drivers
pub mod dispatch;

// Re-export commonly needed items
pub use builder::{
    AssemblyError, Enzyme, EnzymeBuilder, FieldRecord, Protein, RecordAssembler, Reference,
};
pub use dispatch::{
    ParsedFlatFile, RecordFailure, par_parse_flat_file, par_parse_flat_file_with, parse_flat_file,
    parse_flat_file_with, walk_record,
};
pub use parser::{ParseError, Parsed, Production, RecordError, SectionError, parse, tokenize};
pub use sections::{LineGroup, SourceLine, split_sections};

// Re-export foundation types
pub use base::{IStr, Interner};
