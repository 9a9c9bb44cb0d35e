//! Field registry: every heading acronym of the dialect, its section name
//! as spelled in the flat file, and the production that parses its entries.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::parser::grammar::Production;

/// One registered field family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub acronym: &'static str,
    pub full_name: &'static str,
    pub production: Production,
}

const fn field(
    acronym: &'static str,
    full_name: &'static str,
    production: Production,
) -> Field {
    Field {
        acronym,
        full_name,
        production,
    }
}

/// All field headings of the dialect.
pub const FIELDS: &[Field] = &[
    field("AC", "ACTIVATING_COMPOUND", Production::FieldEntry),
    field("AP", "APPLICATION", Production::FieldEntry),
    field("CF", "COFACTOR", Production::FieldEntry),
    field("CL", "CLONED", Production::FieldEntry),
    field("CR", "CRYSTALLIZATION", Production::FieldEntry),
    field("EN", "ENGINEERING", Production::FieldEntry),
    field("GI", "GENERAL_INFORMATION", Production::FieldEntry),
    field("GS", "GENERAL_STABILITY", Production::FieldEntry),
    field("IC50", "IC50_VALUE", Production::FieldEntry),
    field("ID", "ID", Production::EnzymeBegin),
    field("IN", "INHIBITORS", Production::FieldEntry),
    field("KI", "KI_VALUE", Production::KiValue),
    field("KM", "KM_VALUE", Production::KmValue),
    field("LO", "LOCALIZATION", Production::FieldEntry),
    field("ME", "METALS_IONS", Production::FieldEntry),
    field("MW", "MOLECULAR_WEIGHT", Production::FieldEntry),
    field(
        "NSP",
        "NATURAL_SUBSTRATE_PRODUCT",
        Production::NaturalSubstrateProduct,
    ),
    field("OS", "OXIDATION_STABILITY", Production::FieldEntry),
    field("OSS", "ORGANIC_SOLVENT_STABILITY", Production::FieldEntry),
    field("PHO", "PH_OPTIMUM", Production::FieldEntry),
    field("PHR", "PH_RANGE", Production::FieldEntry),
    field("PHS", "PH_STABILITY", Production::FieldEntry),
    field("PI", "PI_VALUE", Production::FieldEntry),
    field("PM", "POSTTRANSLATIONAL_MODIFICATION", Production::FieldEntry),
    field("PR", "PROTEIN", Production::ProteinEntry),
    field("PU", "PURIFICATION", Production::FieldEntry),
    field("RE", "REACTION", Production::FieldEntry),
    field("REN", "RENATURED", Production::FieldEntry),
    field("RF", "REFERENCE", Production::ReferenceEntry),
    field("RN", "RECOMMENDED_NAME", Production::FieldEntry),
    field("RT", "REACTION_TYPE", Production::FieldEntry),
    field("SA", "SPECIFIC_ACTIVITY", Production::FieldEntry),
    field("SN", "SYSTEMATIC_NAME", Production::FieldEntry),
    field("SP", "SUBSTRATE_PRODUCT", Production::SubstrateProduct),
    field("SS", "STORAGE_STABILITY", Production::FieldEntry),
    field("ST", "SOURCE_TISSUE", Production::FieldEntry),
    field("SU", "SUBUNITS", Production::FieldEntry),
    field("SY", "SYNONYMS", Production::FieldEntry),
    field("TN", "TURNOVER_NUMBER", Production::TurnoverNumber),
    field("TO", "TEMPERATURE_OPTIMUM", Production::FieldEntry),
    field("TR", "TEMPERATURE_RANGE", Production::FieldEntry),
    field("TS", "TEMPERATURE_STABILITY", Production::FieldEntry),
];

/// Acronym lookup table, built once on first access.
static BY_ACRONYM: LazyLock<FxHashMap<&'static str, &'static Field>> =
    LazyLock::new(|| FIELDS.iter().map(|f| (f.acronym, f)).collect());

pub fn lookup(acronym: &str) -> Option<&'static Field> {
    BY_ACRONYM.get(acronym).copied()
}

pub fn is_known(acronym: &str) -> bool {
    BY_ACRONYM.contains_key(acronym)
}

pub fn full_name(acronym: &str) -> Option<&'static str> {
    lookup(acronym).map(|f| f.full_name)
}

/// The production that parses one entry of the given field.
pub fn production_for(acronym: &str) -> Option<Production> {
    lookup(acronym).map(|f| f.production)
}
