//! Entry-level productions: one production per field family, each consuming
//! a complete entry text starting at its heading token.
//!
//! All of them share the same plan: scan the token stream into coarse
//! segments (content runs, bracket lists, paren groups), then check the
//! segment sequence against the field family's shape. Trailing position
//! decides meaning: the last paren group before a structural boundary is
//! the comment group, earlier ones are literal value text.

use smol_str::SmolStr;

use super::comment;
use super::cursor::Cursor;
use super::refs::{angle_list, curly_value, flatten_paren, paren_group, pound_list};
use crate::parser::ast::{
    CommentGroup, EcNumber, EnzymeHeader, FieldEntry, KineticEntry, ProteinEntry, ReferenceEntry,
    Registry, SpecialValue, SubstrateProductEntry,
};
use crate::parser::errors::ParseError;
use crate::parser::lexer::Token;

enum Segment {
    Content { text: SmolStr, at: usize },
    Proteins { numbers: Vec<u32>, at: usize },
    Citations { numbers: Vec<u32>, at: usize },
    Special { value: SpecialValue, at: usize },
    Paren { blobs: Vec<SmolStr>, at: usize },
    Accession { text: SmolStr, at: usize },
    And { at: usize },
}

impl Segment {
    fn at(&self) -> usize {
        match self {
            Segment::Content { at, .. }
            | Segment::Proteins { at, .. }
            | Segment::Citations { at, .. }
            | Segment::Special { at, .. }
            | Segment::Paren { at, .. }
            | Segment::Accession { at, .. }
            | Segment::And { at } => *at,
        }
    }
}

/// Scans the remaining tokens of an entry into segments. Consumes input to
/// the end or fails, so a successful scan implies full coverage.
fn scan(cur: &mut Cursor<'_>, production: &'static str) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();
    loop {
        let at = cur.pos();
        match cur.peek() {
            None => return Ok(segments),
            Some(Token::Content(text)) => {
                segments.push(Segment::Content {
                    text: text.clone(),
                    at,
                });
                cur.advance();
            }
            Some(Token::Pound) => {
                let numbers = pound_list(cur, production)?;
                segments.push(Segment::Proteins { numbers, at });
            }
            Some(Token::LeftAngle) => {
                let numbers = angle_list(cur, production)?;
                segments.push(Segment::Citations { numbers, at });
            }
            Some(Token::LeftCurly) => {
                let value = curly_value(cur, production)?;
                segments.push(Segment::Special { value, at });
            }
            Some(Token::LeftParen) => {
                let (blobs, at) = paren_group(cur, production)?;
                segments.push(Segment::Paren { blobs, at });
            }
            Some(Token::Accession(text)) => {
                segments.push(Segment::Accession {
                    text: text.clone(),
                    at,
                });
                cur.advance();
            }
            Some(Token::And) => {
                segments.push(Segment::And { at });
                cur.advance();
            }
            Some(_) => return Err(cur.error(production)),
        }
    }
}

/// Segment cursor with the shared extraction steps of the entry shapes.
struct Segments {
    segments: Vec<Segment>,
    next: usize,
}

impl Segments {
    fn new(segments: Vec<Segment>) -> Self {
        Self { segments, next: 0 }
    }

    fn peek(&self) -> Option<&Segment> {
        self.segments.get(self.next)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Segment> {
        self.segments.get(self.next + n)
    }

    fn bump(&mut self) -> Option<&Segment> {
        let seg = self.segments.get(self.next)?;
        self.next += 1;
        Some(seg)
    }

    fn error(&self, cur: &Cursor<'_>, production: &'static str) -> ParseError {
        let at = self.peek().map_or(usize::MAX, Segment::at);
        cur.error_at(at, production)
    }

    /// Remaining segments must be exhausted for the production to match.
    fn expect_done(&self, cur: &Cursor<'_>, production: &'static str) -> Result<(), ParseError> {
        if self.next >= self.segments.len() {
            Ok(())
        } else {
            Err(self.error(cur, production))
        }
    }

    fn has_special_ahead(&self) -> bool {
        self.segments[self.next..]
            .iter()
            .any(|seg| matches!(seg, Segment::Special { .. }))
    }

    /// Collects the value run: content tokens and paren groups flattened
    /// into literal tokens, stopping at any other segment kind. When
    /// `keep_last_paren` is set, a paren group that would end the run is
    /// left in place for the caller to read as the comment group.
    fn value_run(&mut self, keep_last_paren: bool) -> Vec<SmolStr> {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                Some(Segment::Content { .. }) => {
                    if let Some(Segment::Content { text, .. }) = self.bump() {
                        value.push(text.clone());
                    }
                }
                Some(Segment::Paren { .. }) => {
                    let run_continues = matches!(
                        self.peek_ahead(1),
                        Some(Segment::Content { .. }) | Some(Segment::Paren { .. })
                    );
                    if keep_last_paren && !run_continues {
                        return value;
                    }
                    if let Some(Segment::Paren { blobs, .. }) = self.bump() {
                        flatten_paren(&mut value, blobs.clone());
                    }
                }
                _ => return value,
            }
        }
    }

    /// Optional leading protein list of any arity.
    fn take_proteins(&mut self) -> Vec<u32> {
        if let Some(Segment::Proteins { .. }) = self.peek() {
            if let Some(Segment::Proteins { numbers, .. }) = self.bump() {
                return numbers.clone();
            }
        }
        Vec::new()
    }

    /// Mandatory protein list carrying exactly one number.
    fn take_single_protein(
        &mut self,
        cur: &Cursor<'_>,
        production: &'static str,
    ) -> Result<u32, ParseError> {
        match self.bump() {
            Some(Segment::Proteins { numbers, at }) => {
                if numbers.len() == 1 {
                    Ok(numbers[0])
                } else {
                    Err(cur.error_at(*at, production))
                }
            }
            _ => Err(self.error(cur, production)),
        }
    }

    fn take_comment(&mut self, cur: &Cursor<'_>) -> Result<Option<CommentGroup>, ParseError> {
        if let Some(Segment::Paren { .. }) = self.peek() {
            if let Some(Segment::Paren { blobs, at }) = self.bump() {
                return comment::comment_group(cur, blobs, *at).map(Some);
            }
        }
        Ok(None)
    }

    /// Mandatory `{...}` slot carrying at least one text token.
    fn take_special(
        &mut self,
        cur: &Cursor<'_>,
        production: &'static str,
    ) -> Result<SpecialValue, ParseError> {
        match self.peek() {
            Some(Segment::Special { .. }) => match self.bump() {
                Some(Segment::Special { value, at }) => {
                    if value.tokens.is_empty() {
                        Err(cur.error_at(*at, production))
                    } else {
                        Ok(value.clone())
                    }
                }
                _ => Err(self.error(cur, production)),
            },
            _ => Err(self.error(cur, production)),
        }
    }

    /// Optional `{...}` slot, empty interior allowed.
    fn take_marker(&mut self) -> Option<SpecialValue> {
        if let Some(Segment::Special { .. }) = self.peek() {
            if let Some(Segment::Special { value, .. }) = self.bump() {
                return Some(value.clone());
            }
        }
        None
    }

    fn take_citations(&mut self) -> Vec<u32> {
        if let Some(Segment::Citations { .. }) = self.peek() {
            if let Some(Segment::Citations { numbers, .. }) = self.bump() {
                return numbers.clone();
            }
        }
        Vec::new()
    }
}

// ============================================================================
// RECORD DELIMITERS
// ============================================================================

/// `ID\t` + EC number + optional comment group.
pub(crate) fn enzyme_begin(cur: &mut Cursor<'_>) -> Result<EnzymeHeader, ParseError> {
    const P: &str = "enzyme_begin";
    match cur.peek() {
        Some(Token::EnzymeStart) => {
            cur.advance();
        }
        _ => return Err(cur.error(P)),
    }
    let ec_number = match cur.peek() {
        Some(Token::EcNumber(text)) => match EcNumber::parse(text) {
            Some(ec) => {
                cur.advance();
                ec
            }
            None => return Err(cur.error(P)),
        },
        _ => return Err(cur.error(P)),
    };
    let mut segs = Segments::new(scan(cur, P)?);
    let comments = segs.take_comment(cur)?;
    segs.expect_done(cur, P)?;
    Ok(EnzymeHeader {
        ec_number,
        comments,
    })
}

/// `///` alone.
pub(crate) fn enzyme_end(cur: &mut Cursor<'_>) -> Result<(), ParseError> {
    const P: &str = "enzyme_end";
    match cur.peek() {
        Some(Token::End) => {
            cur.advance();
            Ok(())
        }
        _ => Err(cur.error(P)),
    }
}

// ============================================================================
// FIELD FAMILIES
// ============================================================================

/// The generic shape shared by most information fields: acronym, optional
/// protein list, value, optional comment group, optional citation list.
pub(crate) fn field_entry(cur: &mut Cursor<'_>) -> Result<FieldEntry, ParseError> {
    const P: &str = "field_entry";
    let acronym = match cur.peek() {
        Some(Token::Entry(acronym)) => acronym.clone(),
        _ => return Err(cur.error(P)),
    };
    cur.advance();
    let mut segs = Segments::new(scan(cur, P)?);

    let proteins = segs.take_proteins();
    let value = segs.value_run(true);
    let comments = segs.take_comment(cur)?;
    let citations = segs.take_citations();
    segs.expect_done(cur, P)?;

    Ok(FieldEntry {
        acronym,
        proteins,
        value,
        comments,
        citations,
    })
}

/// `KI`, `KM` and `TN` share one shape: exactly one protein, an optional
/// numeric value, the mandatory `{...}` substance, optional comment and
/// citations.
pub(crate) fn kinetic_entry(
    cur: &mut Cursor<'_>,
    acronym: &'static str,
    production: &'static str,
) -> Result<KineticEntry, ParseError> {
    expect_heading(cur, acronym, production)?;
    let mut segs = Segments::new(scan(cur, production)?);

    let protein = segs.take_single_protein(cur, production)?;
    let value = segs.value_run(false);
    let special = segs.take_special(cur, production)?;
    let comments = segs.take_comment(cur)?;
    let citations = segs.take_citations();
    segs.expect_done(cur, production)?;

    Ok(KineticEntry {
        acronym: SmolStr::new_static(acronym),
        protein,
        value,
        special,
        comments,
        citations,
    })
}

/// `NSP` and `SP`: optional protein list, reaction equation, optional
/// comment group, then the mandatory reversibility marker after it.
pub(crate) fn substrate_product_entry(
    cur: &mut Cursor<'_>,
    acronym: &'static str,
    production: &'static str,
) -> Result<SubstrateProductEntry, ParseError> {
    expect_heading(cur, acronym, production)?;
    let mut segs = Segments::new(scan(cur, production)?);

    let proteins = segs.take_proteins();
    let value = segs.value_run(true);
    let comments = segs.take_comment(cur)?;
    let special = segs.take_special(cur, production)?;
    let citations = segs.take_citations();
    segs.expect_done(cur, production)?;

    Ok(SubstrateProductEntry {
        acronym: SmolStr::new_static(acronym),
        proteins,
        value,
        comments,
        special,
        citations,
    })
}

/// `PR`: one protein number, organism name of at least two tokens, optional
/// accessions joined by `AND`, optional registry keyword, optional comment
/// and citations.
pub(crate) fn protein_entry(cur: &mut Cursor<'_>) -> Result<ProteinEntry, ParseError> {
    const P: &str = "protein_entry";
    match cur.peek() {
        Some(Token::ProteinEntryStart) => {
            cur.advance();
        }
        _ => return Err(cur.error(P)),
    }
    let mut segs = Segments::new(scan(cur, P)?);

    let protein = segs.take_single_protein(cur, P)?;

    let mut organism = Vec::new();
    while let Some(Segment::Content { .. }) = segs.peek() {
        if let Some(Segment::Content { text, .. }) = segs.bump() {
            organism.push(text.clone());
        }
    }
    if organism.len() < 2 {
        return Err(segs.error(cur, P));
    }

    let mut accessions = Vec::new();
    if let Some(Segment::Accession { .. }) = segs.peek() {
        if let Some(Segment::Accession { text, .. }) = segs.bump() {
            accessions.push(text.clone());
        }
        while let Some(Segment::And { .. }) = segs.peek() {
            segs.bump();
            match segs.bump() {
                Some(Segment::Accession { text, .. }) => accessions.push(text.clone()),
                _ => return Err(segs.error(cur, P)),
            }
        }
    }

    // The organism run swallows a bare registry keyword; only one separated
    // from it by an accession survives into this slot.
    let registry = match segs.peek() {
        Some(Segment::Content { text, .. }) => match Registry::from_keyword(text) {
            Some(registry) => {
                segs.bump();
                Some(registry)
            }
            None => return Err(segs.error(cur, P)),
        },
        _ => None,
    };

    let comments = segs.take_comment(cur)?;
    let citations = segs.take_citations();
    segs.expect_done(cur, P)?;

    Ok(ProteinEntry {
        protein,
        organism,
        accessions,
        registry,
        comments,
        citations,
    })
}

/// `RF`: one citation number, citation text, optional `{Pubmed:...}`,
/// optional trailing parenthesized reference type.
pub(crate) fn reference_entry(cur: &mut Cursor<'_>) -> Result<ReferenceEntry, ParseError> {
    const P: &str = "reference_entry";
    match cur.peek() {
        Some(Token::ReferenceEntryStart) => {
            cur.advance();
        }
        _ => return Err(cur.error(P)),
    }
    let mut segs = Segments::new(scan(cur, P)?);

    let reference = match segs.bump() {
        Some(Segment::Citations { numbers, at }) => {
            if numbers.len() == 1 {
                numbers[0]
            } else {
                return Err(cur.error_at(*at, P));
            }
        }
        _ => return Err(segs.error(cur, P)),
    };

    // The Pubmed marker splits the tail: before it everything is citation
    // text, after it only the reference type may follow. Without it a
    // final paren group reads as the reference type.
    let value = segs.value_run(!segs.has_special_ahead());
    let pubmed;
    let mut reference_type = None;
    match segs.peek() {
        Some(Segment::Special { .. }) => {
            pubmed = segs.take_marker();
            if let Some(Segment::Paren { .. }) = segs.peek() {
                if let Some(Segment::Paren { blobs, .. }) = segs.bump() {
                    reference_type = Some(blobs.clone());
                }
            }
        }
        Some(Segment::Paren { .. }) => {
            pubmed = None;
            if let Some(Segment::Paren { blobs, .. }) = segs.bump() {
                reference_type = Some(blobs.clone());
            }
        }
        _ => pubmed = None,
    }
    if value.is_empty() {
        return Err(segs.error(cur, P));
    }
    segs.expect_done(cur, P)?;

    Ok(ReferenceEntry {
        reference,
        value,
        pubmed,
        reference_type,
    })
}

fn expect_heading(
    cur: &mut Cursor<'_>,
    acronym: &str,
    production: &'static str,
) -> Result<(), ParseError> {
    match cur.peek() {
        Some(Token::Entry(found)) if found.as_str() == acronym => {
            cur.advance();
            Ok(())
        }
        _ => Err(cur.error(production)),
    }
}
