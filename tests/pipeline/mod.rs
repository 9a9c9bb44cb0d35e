//! Record pipeline tests
//!
//! - Section splitting of the raw line stream
//! - Record walking and per-heading dispatch into a builder
//! - Whole-file drivers, sequential and parallel

pub mod tests_flat_file;
