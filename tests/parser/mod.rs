//! Tokenizer and grammar tests
//!
//! - Mode-stack tokenization of bracketed constructs
//! - Leaf productions and comment-group parsing
//! - Entry-shaped productions, one per field family

pub mod tests_entries;
pub mod tests_grammar;
