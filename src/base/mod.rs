//! Foundation types shared across the crate.
//!
//! This module provides:
//! - [`Interner`], [`IStr`] - string interning for repeated labels
//!   (organism names in particular)
//!
//! This module has NO dependencies on other crate modules.

mod intern;

pub use intern::{IStr, Interner};
