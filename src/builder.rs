//! Builder capability and the record assembler.
//!
//! The parsing core is polymorphic over anything implementing
//! [`EnzymeBuilder`]: the dispatcher parses an entry and hands the typed
//! result to the builder method named for the field family. The core never
//! aggregates records itself.
//!
//! [`RecordAssembler`] is the batteries-included implementation: it folds
//! the entries of one record into an [`Enzyme`] value, interning organism
//! names and rejecting duplicate protein and reference numbers.

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::base::{IStr, Interner};
use crate::parser::ast::{
    CommentGroup, EcNumber, EnzymeHeader, FieldEntry, KineticEntry, ProteinEntry, ReferenceEntry,
    Registry, SubstrateProductEntry,
};

/// Capability the dispatcher drives. One method per construct kind; each
/// returns the builder's own output value or its own error. `finish`
/// consumes the builder once its record is walked and yields the builder's
/// record-level value.
///
/// An implementation that cannot fail can use [`std::convert::Infallible`]
/// as its error type.
pub trait EnzymeBuilder {
    type Output;
    type Record;
    type Error: std::error::Error + Send + Sync + 'static;

    fn build_enzyme(&mut self, header: EnzymeHeader) -> Result<Self::Output, Self::Error>;
    fn build_field_entry(&mut self, entry: FieldEntry) -> Result<Self::Output, Self::Error>;
    fn build_protein(&mut self, entry: ProteinEntry) -> Result<Self::Output, Self::Error>;
    fn build_reference(&mut self, entry: ReferenceEntry) -> Result<Self::Output, Self::Error>;
    fn build_ki_value(&mut self, entry: KineticEntry) -> Result<Self::Output, Self::Error>;
    fn build_km_value(&mut self, entry: KineticEntry) -> Result<Self::Output, Self::Error>;
    fn build_turnover_number(&mut self, entry: KineticEntry) -> Result<Self::Output, Self::Error>;
    fn build_natural_substrate_product(
        &mut self,
        entry: SubstrateProductEntry,
    ) -> Result<Self::Output, Self::Error>;
    fn build_substrate_product(
        &mut self,
        entry: SubstrateProductEntry,
    ) -> Result<Self::Output, Self::Error>;

    fn finish(self) -> Result<Self::Record, Self::Error>;
}

// ============================================================================
// DOMAIN RECORDS
// ============================================================================

/// A protein declared by a `PR` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Protein {
    pub number: u32,
    /// Interned organism name; equal names share one allocation.
    pub organism: IStr,
    pub accessions: Vec<SmolStr>,
    pub registry: Option<Registry>,
    pub comments: Option<CommentGroup>,
    pub citations: Vec<u32>,
}

/// A literature reference declared by an `RF` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    pub number: u32,
    pub citation: String,
    pub pubmed: Option<String>,
    pub reference_type: Option<String>,
}

/// One parsed entry of an information field, tagged by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldRecord {
    Generic(FieldEntry),
    Kinetic(KineticEntry),
    SubstrateProduct(SubstrateProductEntry),
}

impl FieldRecord {
    pub fn proteins(&self) -> &[u32] {
        match self {
            FieldRecord::Generic(e) => &e.proteins,
            FieldRecord::Kinetic(e) => std::slice::from_ref(&e.protein),
            FieldRecord::SubstrateProduct(e) => &e.proteins,
        }
    }

    pub fn citations(&self) -> &[u32] {
        match self {
            FieldRecord::Generic(e) => &e.citations,
            FieldRecord::Kinetic(e) => &e.citations,
            FieldRecord::SubstrateProduct(e) => &e.citations,
        }
    }
}

/// One complete enzyme record.
///
/// Maps keep source order: field groups in first-seen order, proteins and
/// references by their declared numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enzyme {
    pub ec_number: EcNumber,
    pub header_comments: Option<CommentGroup>,
    pub proteins: IndexMap<u32, Protein>,
    pub references: IndexMap<u32, Reference>,
    pub fields: IndexMap<SmolStr, Vec<FieldRecord>>,
}

impl Enzyme {
    pub fn protein(&self, number: u32) -> Option<&Protein> {
        self.proteins.get(&number)
    }

    pub fn reference(&self, number: u32) -> Option<&Reference> {
        self.references.get(&number)
    }

    /// Entries of one field, in source order. Empty when the field is absent.
    pub fn field(&self, acronym: &str) -> &[FieldRecord] {
        self.fields.get(acronym).map_or(&[], Vec::as_slice)
    }
}

// ============================================================================
// RECORD ASSEMBLER
// ============================================================================

/// What the assembler rejects beyond grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("duplicate protein number {number}")]
    DuplicateProtein { number: u32 },

    #[error("duplicate reference number {number}")]
    DuplicateReference { number: u32 },

    #[error("second ID header in one record")]
    DuplicateHeader,

    #[error("record has no ID header")]
    MissingHeader,
}

/// Folds the entries of one record into an [`Enzyme`].
///
/// One assembler per record; concurrent records each own their assembler,
/// so no state is shared between workers. Organism names are interned with
/// record scope.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    interner: Interner,
    header: Option<EnzymeHeader>,
    proteins: IndexMap<u32, Protein>,
    references: IndexMap<u32, Reference>,
    fields: IndexMap<SmolStr, Vec<FieldRecord>>,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_field(&mut self, acronym: SmolStr, record: FieldRecord) {
        self.fields.entry(acronym).or_default().push(record);
    }
}

impl EnzymeBuilder for RecordAssembler {
    type Output = ();
    type Record = Enzyme;
    type Error = AssemblyError;

    fn build_enzyme(&mut self, header: EnzymeHeader) -> Result<(), AssemblyError> {
        if self.header.is_some() {
            return Err(AssemblyError::DuplicateHeader);
        }
        self.header = Some(header);
        Ok(())
    }

    fn build_field_entry(&mut self, entry: FieldEntry) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::Generic(entry));
        Ok(())
    }

    fn build_protein(&mut self, entry: ProteinEntry) -> Result<(), AssemblyError> {
        let number = entry.protein;
        if self.proteins.contains_key(&number) {
            return Err(AssemblyError::DuplicateProtein { number });
        }
        let organism = self.interner.intern_string(entry.organism_name());
        self.proteins.insert(
            number,
            Protein {
                number,
                organism,
                accessions: entry.accessions,
                registry: entry.registry,
                comments: entry.comments,
                citations: entry.citations,
            },
        );
        Ok(())
    }

    fn build_reference(&mut self, entry: ReferenceEntry) -> Result<(), AssemblyError> {
        let number = entry.reference;
        if self.references.contains_key(&number) {
            return Err(AssemblyError::DuplicateReference { number });
        }
        let citation = entry.citation_text();
        self.references.insert(
            number,
            Reference {
                number,
                citation,
                pubmed: entry.pubmed.map(|p| p.text()),
                reference_type: entry
                    .reference_type
                    .as_deref()
                    .map(crate::parser::ast::join_tokens),
            },
        );
        Ok(())
    }

    fn build_ki_value(&mut self, entry: KineticEntry) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::Kinetic(entry));
        Ok(())
    }

    fn build_km_value(&mut self, entry: KineticEntry) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::Kinetic(entry));
        Ok(())
    }

    fn build_turnover_number(&mut self, entry: KineticEntry) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::Kinetic(entry));
        Ok(())
    }

    fn build_natural_substrate_product(
        &mut self,
        entry: SubstrateProductEntry,
    ) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::SubstrateProduct(entry));
        Ok(())
    }

    fn build_substrate_product(
        &mut self,
        entry: SubstrateProductEntry,
    ) -> Result<(), AssemblyError> {
        self.push_field(entry.acronym.clone(), FieldRecord::SubstrateProduct(entry));
        Ok(())
    }

    /// Finishes the record. Fails when no `ID` header was built.
    fn finish(self) -> Result<Enzyme, AssemblyError> {
        let header = self.header.ok_or(AssemblyError::MissingHeader)?;
        Ok(Enzyme {
            ec_number: header.ec_number,
            header_comments: header.comments,
            proteins: self.proteins,
            references: self.references,
            fields: self.fields,
        })
    }
}
