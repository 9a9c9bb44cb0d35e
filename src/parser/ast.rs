//! Typed results of grammar productions.
//!
//! All types here are plain values: constructed once per successful match,
//! owned by the caller, no back-references into the tokenizer or the record
//! buffer.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// EC NUMBERS
// ============================================================================

/// One component of an EC number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EcComponent {
    pub number: u32,
    /// Preliminary codes carry an `n` prefix, e.g. the `n1` in `1.1.1.n1`.
    pub preliminary: bool,
}

/// Enzyme Commission classification code: 1-4 dot-separated components,
/// where only the last may be `n`-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EcNumber {
    components: Vec<EcComponent>,
}

/// The text did not follow the `\d+(\.\d+){0,2}(\.(n)?\d+)?` shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid EC number '{0}'")]
pub struct InvalidEcNumber(pub SmolStr);

impl EcNumber {
    /// Parse the dotted text form. Rejects more than four components and an
    /// `n` prefix anywhere but the last component of a multi-part code.
    pub fn parse(text: &str) -> Option<EcNumber> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return None;
        }
        let last = parts.len() - 1;
        let mut components = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let (preliminary, digits) = match part.strip_prefix('n') {
                Some(rest) => (true, rest),
                None => (false, *part),
            };
            if preliminary && (i != last || i == 0) {
                return None;
            }
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let number = digits.parse().ok()?;
            components.push(EcComponent {
                number,
                preliminary,
            });
        }
        Some(EcNumber { components })
    }

    pub fn components(&self) -> &[EcComponent] {
        &self.components
    }

    /// True when the final component carries the preliminary `n` prefix.
    pub fn is_preliminary(&self) -> bool {
        self.components.last().is_some_and(|c| c.preliminary)
    }

    /// The chain of ancestor classes, shortest first, ending with `self`.
    /// `1.1.1.1` yields `1`, `1.1`, `1.1.1`, `1.1.1.1`; useful for callers
    /// that index enzymes by every classification level.
    pub fn classes(&self) -> Vec<EcNumber> {
        (1..=self.components.len())
            .map(|n| EcNumber {
                components: self.components[..n].to_vec(),
            })
            .collect()
    }
}

impl fmt::Display for EcNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if c.preliminary {
                f.write_str("n")?;
            }
            write!(f, "{}", c.number)?;
        }
        Ok(())
    }
}

impl FromStr for EcNumber {
    type Err = InvalidEcNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EcNumber::parse(s).ok_or_else(|| InvalidEcNumber(SmolStr::new(s)))
    }
}

// ============================================================================
// COMMENTS AND BRACKETED VALUES
// ============================================================================

/// One annotation inside a comment group: protein references, free-text
/// value tokens, citation references, each part optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comment {
    pub proteins: Vec<u32>,
    pub value: Vec<SmolStr>,
    pub citations: Vec<u32>,
}

impl Comment {
    /// A comment that parsed but carries no content.
    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty() && self.value.is_empty() && self.citations.is_empty()
    }
}

/// A parenthesized, `;`-separated sequence of [`Comment`]s.
///
/// `()` is a valid zero-element group; whether that means "no comment" is
/// the builder's call, the parser keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

/// Free text enclosed in `{...}`, kept as whitespace-split tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecialValue {
    pub tokens: Vec<SmolStr>,
}

impl SpecialValue {
    pub fn text(&self) -> String {
        join_tokens(&self.tokens)
    }
}

/// Join whitespace-split tokens back into display text.
pub fn join_tokens(tokens: &[SmolStr]) -> String {
    let mut out = String::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(tok);
    }
    out
}

// ============================================================================
// ENTRIES
// ============================================================================

/// A generic information-field entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldEntry {
    pub acronym: SmolStr,
    pub proteins: Vec<u32>,
    pub value: Vec<SmolStr>,
    pub comments: Option<CommentGroup>,
    pub citations: Vec<u32>,
}

impl FieldEntry {
    pub fn value_text(&self) -> String {
        join_tokens(&self.value)
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.as_ref().map_or(&[], |g| &g.comments)
    }
}

/// A `KI`, `KM` or `TN` entry: one protein, an optional numeric value, the
/// mandatory bracketed substance (inhibitor or substrate), then optional
/// comment and citations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KineticEntry {
    pub acronym: SmolStr,
    pub protein: u32,
    pub value: Vec<SmolStr>,
    pub special: SpecialValue,
    pub comments: Option<CommentGroup>,
    pub citations: Vec<u32>,
}

/// An `NSP` or `SP` entry. The bracketed reversibility marker comes *after*
/// the comment group in this field family; that ordering is part of the
/// dialect and is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubstrateProductEntry {
    pub acronym: SmolStr,
    pub proteins: Vec<u32>,
    pub value: Vec<SmolStr>,
    pub comments: Option<CommentGroup>,
    pub special: SpecialValue,
    pub citations: Vec<u32>,
}

/// Protein database the accession numbers of a `PR` entry point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Registry {
    SwissProt,
    UniProt,
}

impl Registry {
    /// Case-insensitive keyword match.
    pub fn from_keyword(word: &str) -> Option<Registry> {
        if word.eq_ignore_ascii_case("swissprot") {
            Some(Registry::SwissProt)
        } else if word.eq_ignore_ascii_case("uniprot") {
            Some(Registry::UniProt)
        } else {
            None
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registry::SwissProt => f.write_str("SwissProt"),
            Registry::UniProt => f.write_str("UniProt"),
        }
    }
}

/// A `PR` entry declaring one protein of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProteinEntry {
    pub protein: u32,
    /// Organism name as source tokens, at least two.
    pub organism: Vec<SmolStr>,
    /// Accession numbers, possibly several joined by `AND` in the source.
    pub accessions: Vec<SmolStr>,
    pub registry: Option<Registry>,
    pub comments: Option<CommentGroup>,
    pub citations: Vec<u32>,
}

impl ProteinEntry {
    pub fn organism_name(&self) -> String {
        join_tokens(&self.organism)
    }
}

/// An `RF` entry declaring one literature reference of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceEntry {
    pub reference: u32,
    /// The citation text as source tokens.
    pub value: Vec<SmolStr>,
    /// Content of the trailing `{Pubmed:...}` value, when present.
    pub pubmed: Option<SpecialValue>,
    /// Tokens of the trailing parenthesized reference type, when present.
    pub reference_type: Option<Vec<SmolStr>>,
}

impl ReferenceEntry {
    pub fn citation_text(&self) -> String {
        join_tokens(&self.value)
    }
}

/// The `ID` line opening an enzyme record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnzymeHeader {
    pub ec_number: EcNumber,
    pub comments: Option<CommentGroup>,
}

// ============================================================================
// TAGGED RESULTS
// ============================================================================

/// Result of running one production through the grammar entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parsed {
    EcNumber(EcNumber),
    Protein(u32),
    ProteinInformation(Vec<u32>),
    LiteratureCitation(Vec<u32>),
    Value(Vec<SmolStr>),
    Special(SpecialValue),
    CommentGroup(CommentGroup),
    EnzymeBegin(EnzymeHeader),
    EnzymeEnd,
    FieldEntry(FieldEntry),
    Kinetic(KineticEntry),
    SubstrateProduct(SubstrateProductEntry),
    ProteinEntry(ProteinEntry),
    ReferenceEntry(ReferenceEntry),
}
