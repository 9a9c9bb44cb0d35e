//! Tests for the entry-shaped productions: the generic field shape and the
//! specialized shapes for kinetic values, substrate-product pairs, protein
//! declarations and literature references.

use brenda::parser::{
    FieldEntry, KineticEntry, ProteinEntry, ReferenceEntry, Registry, SubstrateProductEntry,
};
use brenda::{Parsed, Production, parse};
use rstest::rstest;

fn field_entry(input: &str) -> FieldEntry {
    match parse(Production::FieldEntry, input) {
        Ok(Parsed::FieldEntry(entry)) => entry,
        other => panic!("field entry should parse {input:?}, got {other:?}"),
    }
}

fn kinetic(production: Production, input: &str) -> KineticEntry {
    match parse(production, input) {
        Ok(Parsed::Kinetic(entry)) => entry,
        other => panic!("{production} should parse {input:?}, got {other:?}"),
    }
}

fn substrate_product(production: Production, input: &str) -> SubstrateProductEntry {
    match parse(production, input) {
        Ok(Parsed::SubstrateProduct(entry)) => entry,
        other => panic!("{production} should parse {input:?}, got {other:?}"),
    }
}

fn protein(input: &str) -> ProteinEntry {
    match parse(Production::ProteinEntry, input) {
        Ok(Parsed::ProteinEntry(entry)) => entry,
        other => panic!("protein entry should parse {input:?}, got {other:?}"),
    }
}

fn reference(input: &str) -> ReferenceEntry {
    match parse(Production::ReferenceEntry, input) {
        Ok(Parsed::ReferenceEntry(entry)) => entry,
        other => panic!("reference entry should parse {input:?}, got {other:?}"),
    }
}

// =============================================================================
// Generic field entries
// =============================================================================

#[test]
fn minimal_field_entry() {
    let entry = field_entry("SN\talcohol:NAD+ oxidoreductase");
    assert_eq!(entry.acronym, "SN");
    assert!(entry.proteins.is_empty());
    assert_eq!(entry.value_text(), "alcohol:NAD+ oxidoreductase");
    assert!(entry.comments.is_none());
    assert!(entry.citations.is_empty());
}

#[test]
fn full_field_entry() {
    let entry = field_entry("AC\t#1,2# steel wool (#1# weak effect <3>) <3,4>");
    assert_eq!(entry.proteins, [1, 2]);
    assert_eq!(entry.value, ["steel", "wool"]);
    assert_eq!(entry.comments().len(), 1);
    assert_eq!(entry.comments()[0].value, ["weak", "effect"]);
    assert_eq!(entry.citations, [3, 4]);
}

#[test]
fn parens_inside_the_value_are_literal_text() {
    let entry = field_entry("CF\t#1# FAD (FADH2 in the reduced form) required <2>");
    assert_eq!(
        entry.value,
        ["FAD", "(", "FADH2", "in", "the", "reduced", "form", ")", "required"]
    );
    assert!(entry.comments.is_none());
}

#[test]
fn trailing_paren_group_is_the_comment() {
    let entry = field_entry("CF\t#1# FAD (#1# tightly bound <2>) <2>");
    assert_eq!(entry.value, ["FAD"]);
    assert_eq!(entry.comments().len(), 1);
    assert_eq!(entry.comments()[0].proteins, [1]);
}

// =============================================================================
// Kinetic values: KI, KM, TN
// =============================================================================

#[test]
fn ki_value_entry() {
    let entry = kinetic(Production::KiValue, "KI\t#12# 0.0000001 {korormicin} <13>");
    assert_eq!(entry.acronym, "KI");
    assert_eq!(entry.protein, 12);
    assert_eq!(entry.value, ["0.0000001"]);
    assert_eq!(entry.special.text(), "korormicin");
    assert!(entry.comments.is_none());
    assert_eq!(entry.citations, [13]);
}

#[test]
fn km_value_with_comment() {
    let entry = kinetic(
        Production::KmValue,
        "KM\t#2# 0.115 {2-oxoglutarate} (#2# pH 7.4, 25°C <4>) <4>",
    );
    assert_eq!(entry.protein, 2);
    assert_eq!(entry.special.text(), "2-oxoglutarate");
    let comments = entry.comments.expect("the trailing group is a comment");
    assert_eq!(comments.comments.len(), 1);
}

#[test]
fn turnover_number_without_a_numeric_value() {
    let entry = kinetic(Production::TurnoverNumber, "TN\t#1# {ethanol} <1>");
    assert!(entry.value.is_empty());
    assert_eq!(entry.special.text(), "ethanol");
}

#[test]
fn ki_value_without_citations() {
    let entry = kinetic(Production::KiValue, "KI\t#1# 0.033 {ADP}");
    assert_eq!(entry.protein, 1);
    assert_eq!(entry.value, ["0.033"]);
    assert_eq!(entry.special.text(), "ADP");
    assert!(entry.citations.is_empty());
}

#[rstest]
#[case(Production::KmValue, "KM\t#2# 0.115 <4>")] // no substance
#[case(Production::KmValue, "KM\t#1,2# 0.1 {x} <4>")] // two proteins
#[case(Production::KmValue, "KI\t#1# 0.1 {x}")] // wrong heading
#[case(Production::KiValue, "KI\t0.1 {x}")] // no protein
fn malformed_kinetic_entries(#[case] production: Production, #[case] input: &str) {
    assert!(
        parse(production, input).is_err(),
        "{production} should reject {input:?}"
    );
}

// =============================================================================
// Substrate-product pairs: SP, NSP
// =============================================================================

#[test]
fn substrate_product_entry() {
    let entry = substrate_product(
        Production::SubstrateProduct,
        "SP\t#1# ethanol + NAD+ = acetaldehyde + NADH {r} <1>",
    );
    assert_eq!(entry.acronym, "SP");
    assert_eq!(entry.proteins, [1]);
    assert_eq!(
        entry.value,
        ["ethanol", "+", "NAD+", "=", "acetaldehyde", "+", "NADH"]
    );
    assert!(entry.comments.is_none());
    assert_eq!(entry.special.text(), "r");
    assert_eq!(entry.citations, [1]);
}

#[test]
fn reversibility_marker_comes_after_the_comment() {
    let entry = substrate_product(
        Production::NaturalSubstrateProduct,
        "NSP\t#1# L-arginine + H2O = L-ornithine + urea (#1# first step <2>) {ir} <2>",
    );
    assert_eq!(entry.comments.as_ref().map(|g| g.comments.len()), Some(1));
    assert_eq!(entry.special.text(), "ir");
}

#[test]
fn substrate_product_requires_the_marker() {
    assert!(parse(Production::SubstrateProduct, "SP\t#1# ethanol = acetaldehyde <1>").is_err());
}

// =============================================================================
// Protein entries
// =============================================================================

#[test]
fn protein_with_accession_and_registry() {
    let entry = protein("PR\t#2# Pseudomonas sp. Q4AE87 SwissProt <6>");
    assert_eq!(entry.protein, 2);
    assert_eq!(entry.organism_name(), "Pseudomonas sp.");
    assert_eq!(entry.accessions, ["Q4AE87"]);
    assert_eq!(entry.registry, Some(Registry::SwissProt));
    assert_eq!(entry.citations, [6]);
}

#[test]
fn accession_pairs_joined_by_and() {
    let entry = protein("PR\t#5# Homo sapiens P07327 AND P28469 UniProt <3>");
    assert_eq!(entry.accessions, ["P07327", "P28469"]);
    assert_eq!(entry.registry, Some(Registry::UniProt));
}

#[test]
fn plain_protein_declaration() {
    let entry = protein("PR\t#1# Bos taurus <1>");
    assert_eq!(entry.organism, ["Bos", "taurus"]);
    assert!(entry.accessions.is_empty());
    assert_eq!(entry.registry, None);
}

#[test]
fn strain_designations_belong_to_the_organism() {
    let entry = protein("PR\t#3# Saccharomyces cerevisiae ATCC 26602 <2>");
    assert_eq!(entry.organism_name(), "Saccharomyces cerevisiae ATCC 26602");
}

#[test]
fn protein_comment_group() {
    let entry = protein("PR\t#4# Rattus norvegicus (#4# isozyme ADH1 <5>) <5>");
    let comments = entry.comments.expect("comment group");
    assert_eq!(comments.comments[0].value, ["isozyme", "ADH1"]);
}

#[rstest]
#[case("PR\t#1# Unknown <1>")] // one-word organism
#[case("PR\t#1,2# Bos taurus <1>")] // two protein numbers
#[case("PR\t#1# Bos taurus P00327 liver <1>")] // junk after the accession
fn malformed_protein_entries(#[case] input: &str) {
    assert!(
        parse(Production::ProteinEntry, input).is_err(),
        "protein entry should reject {input:?}"
    );
}

// =============================================================================
// Reference entries
// =============================================================================

#[test]
fn reference_with_pubmed_and_type() {
    let entry = reference(
        "RF\t<1> Theorell, H.: Crystalline liver alcohol dehydrogenase. \
         Nature 12 (1975) 44-48. {Pubmed:14918434} (review)",
    );
    assert_eq!(entry.reference, 1);
    assert_eq!(
        entry.citation_text(),
        "Theorell, H.: Crystalline liver alcohol dehydrogenase. Nature 12 ( 1975 ) 44-48."
    );
    assert_eq!(entry.pubmed.expect("pubmed marker").text(), "Pubmed:14918434");
    assert_eq!(entry.reference_type.expect("reference type"), ["review"]);
}

#[test]
fn trailing_paren_group_is_the_reference_type() {
    let entry = reference("RF\t<2> Sund, H.: Alcohol dehydrogenases. Enzymes 7 (1963) 25-83. (review)");
    assert!(entry.pubmed.is_none());
    assert!(entry.citation_text().ends_with("( 1963 ) 25-83."));
    assert_eq!(entry.reference_type.expect("reference type"), ["review"]);
}

#[test]
fn plain_reference() {
    let entry = reference("RF\t<2> Sund, H.: Alcohol dehydrogenases. Enzymes 7 (1963) 25-83.");
    assert!(entry.pubmed.is_none());
    assert!(entry.reference_type.is_none());
}

#[test]
fn empty_pubmed_marker_is_kept() {
    let entry = reference("RF\t<3> Jornvall, H.: The primary structure of yeast ADH. {} (review)");
    assert_eq!(entry.pubmed.expect("pubmed marker").text(), "");
    assert_eq!(entry.reference_type.expect("reference type"), ["review"]);
}

#[rstest]
#[case("RF\t<1,2> shared citation text")] // two reference numbers
#[case("RF\t<1> {Pubmed:1}")] // no citation text
fn malformed_reference_entries(#[case] input: &str) {
    assert!(
        parse(Production::ReferenceEntry, input).is_err(),
        "reference entry should reject {input:?}"
    );
}

// =============================================================================
// Record delimiters
// =============================================================================

#[test]
fn enzyme_begin_without_comment() {
    match parse(Production::EnzymeBegin, "ID\t1.1.1.1") {
        Ok(Parsed::EnzymeBegin(header)) => {
            assert_eq!(header.ec_number.to_string(), "1.1.1.1");
            assert!(header.comments.is_none());
        }
        other => panic!("expected a header, got {other:?}"),
    }
}

#[test]
fn enzyme_begin_with_transfer_note() {
    match parse(Production::EnzymeBegin, "ID\t1.1.1.109 (transferred to EC 1.3.1.28)") {
        Ok(Parsed::EnzymeBegin(header)) => {
            assert_eq!(header.ec_number.to_string(), "1.1.1.109");
            let comments = header.comments.expect("transfer note");
            assert_eq!(
                comments.comments[0].value,
                ["transferred", "to", "EC", "1.3.1.28"]
            );
        }
        other => panic!("expected a header, got {other:?}"),
    }
}

#[test]
fn enzyme_begin_accepts_preliminary_codes() {
    match parse(Production::EnzymeBegin, "ID\t1.1.1.n5") {
        Ok(Parsed::EnzymeBegin(header)) => assert!(header.ec_number.is_preliminary()),
        other => panic!("expected a header, got {other:?}"),
    }
}

#[test]
fn enzyme_begin_rejects_malformed_codes() {
    assert!(parse(Production::EnzymeBegin, "ID\t1.1.1.1.1").is_err());
}

#[test]
fn enzyme_end_matches_the_terminator_alone() {
    assert!(matches!(parse(Production::EnzymeEnd, "///"), Ok(Parsed::EnzymeEnd)));
    assert!(parse(Production::EnzymeEnd, "/// trailing").is_err());
}
