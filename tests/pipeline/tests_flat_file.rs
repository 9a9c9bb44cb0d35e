//! Whole-file driver tests over the shared fixture: assembled record
//! contents, failure collection, parallel/sequential agreement and disk
//! round-trips.

use std::fs;

use brenda::parser::Registry;
use brenda::{
    FieldRecord, ParsedFlatFile, SectionError, par_parse_flat_file, par_parse_flat_file_with,
    parse_flat_file, parse_flat_file_with,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

use crate::helpers::builders::CallLog;
use crate::helpers::source_fixtures::{
    ALCOHOL_DEHYDROGENASE_FILE, DOUBLE_BEGIN_FILE, MIXED_OUTCOMES_FILE, UNTERMINATED_FILE,
};

/// Shared parse of the full fixture, done once for every assertion on it.
static COMPLETE: Lazy<ParsedFlatFile> =
    Lazy::new(|| parse_flat_file(ALCOHOL_DEHYDROGENASE_FILE).expect("intact record boundaries"));

#[test]
fn parses_every_record() {
    assert_eq!(COMPLETE.enzymes.len(), 2);
    assert!(COMPLETE.failures.is_empty());
}

#[test]
fn headers_are_assembled() {
    let adh = &COMPLETE.enzymes[0];
    assert_eq!(adh.ec_number.to_string(), "1.1.1.1");
    assert!(adh.header_comments.is_none());

    let transferred = &COMPLETE.enzymes[1];
    assert_eq!(transferred.ec_number.to_string(), "1.1.1.109");
    let note = transferred.header_comments.as_ref().expect("transfer note");
    assert_eq!(
        note.comments[0].value,
        ["transferred", "to", "EC", "1.3.1.28"]
    );
    assert!(transferred.proteins.is_empty());
}

#[test]
fn proteins_are_assembled() {
    let adh = &COMPLETE.enzymes[0];
    assert_eq!(adh.proteins.len(), 2);

    let bovine = adh.protein(1).expect("protein #1");
    assert_eq!(bovine.organism.as_ref(), "Bos taurus");
    assert_eq!(bovine.accessions, ["P00327"]);
    assert_eq!(bovine.registry, Some(Registry::SwissProt));
    assert_eq!(bovine.citations, [1]);

    let yeast = adh.protein(2).expect("protein #2");
    assert_eq!(yeast.organism.as_ref(), "Saccharomyces cerevisiae");
    assert_eq!(yeast.accessions, ["P00330", "P00331"]);
    assert_eq!(yeast.registry, Some(Registry::UniProt));
}

#[test]
fn references_are_assembled() {
    let adh = &COMPLETE.enzymes[0];

    let theorell = adh.reference(1).expect("reference <1>");
    assert!(theorell.citation.starts_with("Theorell, H.:"));
    assert_eq!(theorell.pubmed.as_deref(), Some("Pubmed:14918434"));
    assert_eq!(theorell.reference_type.as_deref(), Some("review"));

    let sund = adh.reference(2).expect("reference <2>");
    assert!(sund.pubmed.is_none());
    assert!(sund.reference_type.is_none());
}

#[test]
fn field_groups_keep_source_order() {
    let adh = &COMPLETE.enzymes[0];
    let headings: Vec<&str> = adh.fields.keys().map(|k| k.as_str()).collect();
    assert_eq!(headings, ["RN", "SN", "SP", "NSP", "KM", "TN", "ST"]);
    assert!(adh.field("CF").is_empty());
}

#[test]
fn kinetic_entries_are_typed() {
    let adh = &COMPLETE.enzymes[0];
    let km = adh.field("KM");
    assert_eq!(km.len(), 2);

    let FieldRecord::Kinetic(first) = &km[0] else {
        panic!("KM entries carry the kinetic shape, got {:?}", km[0]);
    };
    assert_eq!(first.protein, 1);
    assert_eq!(first.value, ["0.715"]);
    assert_eq!(first.special.text(), "ethanol");

    let comments = first.comments.as_ref().expect("measurement conditions");
    assert_eq!(comments.comments.len(), 2);
    assert_eq!(comments.comments[0].value, ["at", "pH", "7.0,", "25°C"]);
    assert_eq!(comments.comments[1].value, ["cosubstrate", "NAD+"]);

    let FieldRecord::Kinetic(second) = &km[1] else {
        panic!("KM entries carry the kinetic shape, got {:?}", km[1]);
    };
    assert_eq!(second.protein, 2);
    assert_eq!(second.value, ["17"]);
}

#[test]
fn substrate_product_entries_are_typed() {
    let adh = &COMPLETE.enzymes[0];

    let FieldRecord::SubstrateProduct(sp) = &adh.field("SP")[0] else {
        panic!("SP entries carry the substrate-product shape");
    };
    assert_eq!(sp.proteins, [1, 2]);
    assert_eq!(sp.special.text(), "r");
    assert!(sp.comments.is_none());
    assert_eq!(sp.citations, [1, 2]);

    let FieldRecord::SubstrateProduct(nsp) = &adh.field("NSP")[0] else {
        panic!("NSP entries carry the substrate-product shape");
    };
    assert_eq!(nsp.special.text(), "ir");
    let comments = nsp.comments.as_ref().expect("pathway note");
    assert_eq!(
        comments.comments[0].value,
        ["key", "step", "in", "liver", "detoxification"]
    );
}

#[test]
fn generic_entries_keep_their_heading() {
    let adh = &COMPLETE.enzymes[0];
    let FieldRecord::Generic(rn) = &adh.field("RN")[0] else {
        panic!("RN entries carry the generic shape");
    };
    assert_eq!(rn.value_text(), "alcohol dehydrogenase");

    let FieldRecord::Generic(st) = &adh.field("ST")[0] else {
        panic!("ST entries carry the generic shape");
    };
    assert_eq!(st.proteins, [1]);
    assert_eq!(st.value, ["liver"]);
}

// =============================================================================
// Failure collection
// =============================================================================

#[test]
fn failed_records_are_collected_not_fatal() {
    let out = parse_flat_file(MIXED_OUTCOMES_FILE).expect("intact record boundaries");

    let parsed: Vec<String> = out.enzymes.iter().map(|e| e.ec_number.to_string()).collect();
    assert_eq!(parsed, ["1.1.1.1", "4.6.1.1"]);

    assert_eq!(out.failures.len(), 2);

    let unknown = &out.failures[0];
    assert_eq!(unknown.ec.as_deref(), Some("2.2.2.2"));
    assert_eq!(unknown.line, 5);
    match &unknown.error {
        brenda::RecordError::UnknownField { heading, line } => {
            assert_eq!(heading, "xy");
            assert_eq!(*line, 6);
        }
        other => panic!("expected an unknown-field error, got {other:?}"),
    }

    let malformed = &out.failures[1];
    assert_eq!(malformed.ec.as_deref(), Some("3.3.3.3"));
    assert_eq!(malformed.line, 8);
    match &malformed.error {
        brenda::RecordError::Parse(e) => {
            assert_eq!(e.production, "km_value");
            assert_eq!(e.line, 10, "error lines are rebased onto the input file");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn boundary_violations_abort_the_parse() {
    assert_eq!(
        parse_flat_file(DOUBLE_BEGIN_FILE).err(),
        Some(SectionError::UnbalancedBegin {
            line: 2,
            open_since: 1
        })
    );
    assert_eq!(
        par_parse_flat_file(UNTERMINATED_FILE).err(),
        Some(SectionError::UnterminatedRecord { open_since: 1 })
    );
}

// =============================================================================
// Parallel driver
// =============================================================================

#[test]
fn parallel_parse_matches_sequential() {
    let par = par_parse_flat_file(ALCOHOL_DEHYDROGENASE_FILE).expect("intact record boundaries");
    assert_eq!(par.enzymes, COMPLETE.enzymes);
    assert!(par.failures.is_empty());
}

#[test]
fn parallel_parse_collects_the_same_failures() {
    let seq = parse_flat_file(MIXED_OUTCOMES_FILE).expect("intact record boundaries");
    let par = par_parse_flat_file(MIXED_OUTCOMES_FILE).expect("intact record boundaries");

    assert_eq!(par.enzymes, seq.enzymes);
    assert_eq!(par.failures.len(), seq.failures.len());
    for (p, s) in par.failures.iter().zip(&seq.failures) {
        assert_eq!(p.ec, s.ec);
        assert_eq!(p.line, s.line);
        assert_eq!(p.error.to_string(), s.error.to_string());
    }
}

// =============================================================================
// Custom builders
// =============================================================================

#[test]
fn drivers_run_any_builder_factory() {
    let seq = parse_flat_file_with(ALCOHOL_DEHYDROGENASE_FILE, CallLog::default)
        .expect("intact record boundaries");
    assert!(seq.failures.is_empty());
    assert_eq!(seq.enzymes.len(), 2);
    assert_eq!(seq.enzymes[0][0], "enzyme 1.1.1.1");
    assert_eq!(seq.enzymes[1], ["enzyme 1.1.1.109"]);

    let par = par_parse_flat_file_with(ALCOHOL_DEHYDROGENASE_FILE, CallLog::default)
        .expect("intact record boundaries");
    assert_eq!(par.enzymes, seq.enzymes);
}

#[test]
fn custom_builders_keep_the_failure_policy() {
    let out = parse_flat_file_with(MIXED_OUTCOMES_FILE, CallLog::default)
        .expect("intact record boundaries");
    assert_eq!(out.enzymes.len(), 2);
    assert_eq!(out.enzymes[1][0], "enzyme 4.6.1.1");

    let failed: Vec<_> = out.failures.iter().map(|f| f.ec.as_deref()).collect();
    assert_eq!(failed, [Some("2.2.2.2"), Some("3.3.3.3")]);
}

// =============================================================================
// Disk round-trip
// =============================================================================

#[test]
fn parses_a_file_read_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("adh.txt");
    fs::write(&path, ALCOHOL_DEHYDROGENASE_FILE).expect("write fixture");

    let text = fs::read_to_string(&path).expect("read fixture back");
    let out = parse_flat_file(&text).expect("intact record boundaries");
    assert_eq!(out.enzymes, COMPLETE.enzymes);
}

#[cfg(feature = "serde")]
#[test]
fn enzymes_round_trip_through_json() {
    let adh = &COMPLETE.enzymes[0];
    let json = serde_json::to_string(adh).expect("serialize");
    let back: brenda::Enzyme = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(&back, adh);
}
