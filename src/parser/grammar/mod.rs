//! Grammar productions over the token stream.
//!
//! This module contains the production logic organized by family:
//! - `refs` - bracketed number lists, special values, free-text values
//! - `comment` - the textual sub-grammar inside `(...)` comment groups
//! - `entry` - whole-entry shapes from `ID` down to `RF`
//!
//! Every production is all-or-nothing: it either consumes its complete
//! input and returns a typed value, or reports a [`ParseError`] carrying
//! the position where matching stopped. Nothing is recovered or skipped
//! at this level; recovery policy belongs to the record walker.

mod comment;
mod cursor;
mod entry;
mod refs;

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

use self::cursor::Cursor;
use crate::parser::ast::Parsed;
use crate::parser::errors::ParseError;
use crate::parser::lexer::tokenize;

pub(crate) use entry::{
    enzyme_begin, enzyme_end, field_entry, kinetic_entry, protein_entry, reference_entry,
    substrate_product_entry,
};

/// Tokenizes a text and runs one production over it, requiring full
/// consumption. All grammar entry points go through here.
pub(crate) fn run<T>(
    text: &str,
    production: &'static str,
    f: impl FnOnce(&mut Cursor<'_>) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let lexemes = tokenize(text);
    let mut cur = Cursor::new(text, &lexemes);
    let value = f(&mut cur)?;
    cur.expect_end(production)?;
    Ok(value)
}

/// Selector for [`parse`]: every production the grammar exposes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    EcNumber,
    Protein,
    ProteinInformation,
    LiteratureCitation,
    Value,
    Special,
    CommentGroup,
    EnzymeBegin,
    EnzymeEnd,
    FieldEntry,
    KiValue,
    KmValue,
    TurnoverNumber,
    NaturalSubstrateProduct,
    SubstrateProduct,
    ProteinEntry,
    ReferenceEntry,
}

impl Production {
    pub fn name(self) -> &'static str {
        match self {
            Production::EcNumber => "ec_number",
            Production::Protein => "protein",
            Production::ProteinInformation => "protein_information",
            Production::LiteratureCitation => "literature_citation",
            Production::Value => "value",
            Production::Special => "special",
            Production::CommentGroup => "comment_group",
            Production::EnzymeBegin => "enzyme_begin",
            Production::EnzymeEnd => "enzyme_end",
            Production::FieldEntry => "field_entry",
            Production::KiValue => "ki_value",
            Production::KmValue => "km_value",
            Production::TurnoverNumber => "turnover_number",
            Production::NaturalSubstrateProduct => "natural_substrate_product",
            Production::SubstrateProduct => "substrate_product",
            Production::ProteinEntry => "protein_entry",
            Production::ReferenceEntry => "reference_entry",
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown production '{0}'")]
pub struct UnknownProduction(pub SmolStr);

impl FromStr for Production {
    type Err = UnknownProduction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ec_number" => Ok(Production::EcNumber),
            "protein" => Ok(Production::Protein),
            "protein_information" => Ok(Production::ProteinInformation),
            "literature_citation" => Ok(Production::LiteratureCitation),
            "value" => Ok(Production::Value),
            "special" => Ok(Production::Special),
            "comment_group" => Ok(Production::CommentGroup),
            "enzyme_begin" => Ok(Production::EnzymeBegin),
            "enzyme_end" => Ok(Production::EnzymeEnd),
            "field_entry" => Ok(Production::FieldEntry),
            "ki_value" => Ok(Production::KiValue),
            "km_value" => Ok(Production::KmValue),
            "turnover_number" => Ok(Production::TurnoverNumber),
            "natural_substrate_product" => Ok(Production::NaturalSubstrateProduct),
            "substrate_product" => Ok(Production::SubstrateProduct),
            "protein_entry" => Ok(Production::ProteinEntry),
            "reference_entry" => Ok(Production::ReferenceEntry),
            _ => Err(UnknownProduction(SmolStr::new(s))),
        }
    }
}

/// Runs one named production over a text and returns the typed result.
///
/// The text is tokenized from scratch, so any entry text taken from a
/// section can be fed in directly. The production must consume every
/// token; trailing input fails the parse.
pub fn parse(production: Production, text: &str) -> Result<Parsed, ParseError> {
    let name = production.name();
    match production {
        Production::EcNumber => run(text, name, refs::ec_number).map(Parsed::EcNumber),
        Production::Protein => run(text, name, refs::protein).map(Parsed::Protein),
        Production::ProteinInformation => {
            run(text, name, refs::protein_information).map(Parsed::ProteinInformation)
        }
        Production::LiteratureCitation => {
            run(text, name, refs::literature_citation).map(Parsed::LiteratureCitation)
        }
        Production::Value => run(text, name, refs::value).map(Parsed::Value),
        Production::Special => run(text, name, refs::special).map(Parsed::Special),
        Production::CommentGroup => run(text, name, |cur| {
            let (blobs, at) = refs::paren_group(cur, name)?;
            comment::comment_group(cur, &blobs, at)
        })
        .map(Parsed::CommentGroup),
        Production::EnzymeBegin => run(text, name, enzyme_begin).map(Parsed::EnzymeBegin),
        Production::EnzymeEnd => run(text, name, enzyme_end).map(|()| Parsed::EnzymeEnd),
        Production::FieldEntry => run(text, name, field_entry).map(Parsed::FieldEntry),
        Production::KiValue => {
            run(text, name, |cur| kinetic_entry(cur, "KI", name)).map(Parsed::Kinetic)
        }
        Production::KmValue => {
            run(text, name, |cur| kinetic_entry(cur, "KM", name)).map(Parsed::Kinetic)
        }
        Production::TurnoverNumber => {
            run(text, name, |cur| kinetic_entry(cur, "TN", name)).map(Parsed::Kinetic)
        }
        Production::NaturalSubstrateProduct => {
            run(text, name, |cur| substrate_product_entry(cur, "NSP", name))
                .map(Parsed::SubstrateProduct)
        }
        Production::SubstrateProduct => {
            run(text, name, |cur| substrate_product_entry(cur, "SP", name))
                .map(Parsed::SubstrateProduct)
        }
        Production::ProteinEntry => run(text, name, protein_entry).map(Parsed::ProteinEntry),
        Production::ReferenceEntry => run(text, name, reference_entry).map(Parsed::ReferenceEntry),
    }
}
