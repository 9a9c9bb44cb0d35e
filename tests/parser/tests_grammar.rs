//! Grammar tests for the leaf productions: number lists, values, special
//! values, comment groups, and the production selector itself.

use brenda::{Parsed, Production, parse};
use rstest::rstest;

/// Run a production and unwrap, with the input quoted on failure.
fn parse_ok(production: Production, input: &str) -> Parsed {
    parse(production, input)
        .unwrap_or_else(|e| panic!("{production} should match {input:?}: {e}"))
}

// =============================================================================
// EC numbers
// =============================================================================

#[rstest]
#[case("1")]
#[case("1.1")]
#[case("1.1.1")]
#[case("1.1.1.1")]
#[case("1.1.1.n1")]
#[case("7.2.4.n12")]
fn ec_numbers_round_trip(#[case] input: &str) {
    match parse_ok(Production::EcNumber, input) {
        Parsed::EcNumber(ec) => assert_eq!(ec.to_string(), input),
        other => panic!("expected an EC number, got {other:?}"),
    }
}

#[rstest]
#[case("1.1.1.1.1")]
#[case("n1")]
#[case("1.x")]
#[case("1..1")]
fn malformed_ec_numbers_are_rejected(#[case] input: &str) {
    assert!(
        parse(Production::EcNumber, input).is_err(),
        "{input:?} should not parse as an EC number"
    );
}

// =============================================================================
// Bracketed number lists
// =============================================================================

#[test]
fn protein_takes_exactly_one_number() {
    match parse_ok(Production::Protein, "#13#") {
        Parsed::Protein(n) => assert_eq!(n, 13),
        other => panic!("expected a protein number, got {other:?}"),
    }
    assert!(parse(Production::Protein, "#1,2#").is_err());
    assert!(parse(Production::Protein, "##").is_err());
}

#[test]
fn protein_information_spans_continuation_lines() {
    match parse_ok(Production::ProteinInformation, "#1,2,3,\n\t4,5,6#") {
        Parsed::ProteinInformation(numbers) => assert_eq!(numbers, [1, 2, 3, 4, 5, 6]),
        other => panic!("expected protein numbers, got {other:?}"),
    }
}

#[test]
fn empty_bracket_lists_are_rejected() {
    assert!(parse(Production::ProteinInformation, "# ,,#").is_err());
    assert!(parse(Production::LiteratureCitation, "<>").is_err());
    assert!(parse(Production::Special, "{}").is_err());
}

#[test]
fn literature_citation_accepts_mixed_separators() {
    match parse_ok(Production::LiteratureCitation, "<1, 2,3>") {
        Parsed::LiteratureCitation(numbers) => assert_eq!(numbers, [1, 2, 3]),
        other => panic!("expected citation numbers, got {other:?}"),
    }
}

#[test]
fn special_value_keeps_interior_tokens() {
    match parse_ok(Production::Special, "{more = ?}") {
        Parsed::Special(value) => {
            assert_eq!(value.tokens, ["more", "=", "?"]);
            assert_eq!(value.text(), "more = ?");
        }
        other => panic!("expected a special value, got {other:?}"),
    }
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn value_flattens_parenthesized_runs() {
    match parse_ok(Production::Value, "at (pH 4.5), 30°C") {
        Parsed::Value(tokens) => {
            assert_eq!(tokens, ["at", "(", "pH", "4.5", ")", ",", "30°C"]);
        }
        other => panic!("expected a value, got {other:?}"),
    }
}

#[test]
fn value_may_be_empty() {
    match parse_ok(Production::Value, "") {
        Parsed::Value(tokens) => assert!(tokens.is_empty()),
        other => panic!("expected a value, got {other:?}"),
    }
}

// =============================================================================
// Comment groups
// =============================================================================

fn comment_group(input: &str) -> brenda::parser::CommentGroup {
    match parse_ok(Production::CommentGroup, input) {
        Parsed::CommentGroup(group) => group,
        other => panic!("expected a comment group, got {other:?}"),
    }
}

#[test]
fn single_comment_with_proteins_and_citation() {
    let group = comment_group("(#11# at pH 4.5, 30°C <100>)");
    assert_eq!(group.comments.len(), 1);
    let comment = &group.comments[0];
    assert_eq!(comment.proteins, [11]);
    assert_eq!(comment.value, ["at", "pH", "4.5,", "30°C"]);
    assert_eq!(comment.citations, [100]);
}

#[test]
fn semicolons_split_sub_comments() {
    let group = comment_group("(#11# at pH 4.5 <100>; #12# at pH 5.5 <101>)");
    assert_eq!(group.comments.len(), 2);
    assert_eq!(group.comments[0].proteins, [11]);
    assert_eq!(group.comments[0].citations, [100]);
    assert_eq!(group.comments[1].proteins, [12]);
    assert_eq!(group.comments[1].value, ["at", "pH", "5.5"]);
    assert_eq!(group.comments[1].citations, [101]);
}

#[test]
fn semicolon_inside_nested_parens_does_not_split() {
    let group = comment_group("(#5# stable (4°C; 30 min) <9>)");
    assert_eq!(group.comments.len(), 1);
    let comment = &group.comments[0];
    assert_eq!(comment.proteins, [5]);
    assert_eq!(comment.value, ["stable", "(", "4°C", ";", "30", "min", ")"]);
    assert_eq!(comment.citations, [9]);
}

#[test]
fn empty_group_has_no_comments() {
    assert!(comment_group("()").comments.is_empty());
}

#[test]
fn stray_brackets_inside_a_comment_are_rejected() {
    assert!(parse(Production::CommentGroup, "(a } b)").is_err());
}

// =============================================================================
// Matching discipline
// =============================================================================

#[test]
fn productions_must_consume_the_whole_text() {
    let err = parse(Production::Protein, "#1# extra").unwrap_err();
    assert_eq!(err.production, "protein");
}

#[test]
fn errors_locate_the_failing_token() {
    let err = parse(Production::KmValue, "KM\t#1,2# 0.1 {x}").unwrap_err();
    assert_eq!(err.production, "km_value");
    assert_eq!(err.line, 1);
    assert_eq!(u32::from(err.offset), 3);
}

// =============================================================================
// Production selector
// =============================================================================

#[rstest]
#[case("ec_number")]
#[case("protein")]
#[case("protein_information")]
#[case("literature_citation")]
#[case("value")]
#[case("special")]
#[case("comment_group")]
#[case("enzyme_begin")]
#[case("enzyme_end")]
#[case("field_entry")]
#[case("ki_value")]
#[case("km_value")]
#[case("turnover_number")]
#[case("natural_substrate_product")]
#[case("substrate_product")]
#[case("protein_entry")]
#[case("reference_entry")]
fn production_names_round_trip(#[case] name: &str) {
    let production: Production = name.parse().unwrap();
    assert_eq!(production.to_string(), name);
}

#[test]
fn unknown_production_names_are_rejected() {
    let err = "bogus".parse::<Production>().unwrap_err();
    assert!(err.to_string().contains("bogus"), "got: {err}");
}
