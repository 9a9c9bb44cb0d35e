//! String interner for shared, deduplicated text.
//!
//! Uses `Arc<str>` so an interned handle is cheap to clone (reference count
//! increment instead of allocation) and may cross worker threads together
//! with the record that holds it. The interner deduplicates strings so
//! identical strings share one allocation.

use std::collections::HashSet;
use std::sync::Arc;

/// An interned string, cheap to clone.
pub type IStr = Arc<str>;

/// String interner that deduplicates strings.
///
/// A record assembler keeps one of these so that every occurrence of the
/// same organism name (or any other repeated label) within its record shares
/// a single allocation. Interning the same string twice returns the same
/// `Arc`.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning a cheap-to-clone handle.
    ///
    /// If the string was already interned, returns the existing `Arc`.
    /// Otherwise, creates a new `Arc` and stores it.
    pub fn intern(&mut self, s: &str) -> IStr {
        if let Some(existing) = self.strings.get(s) {
            Arc::clone(existing)
        } else {
            let arc: Arc<str> = Arc::from(s);
            self.strings.insert(Arc::clone(&arc));
            arc
        }
    }

    /// Intern an owned string, avoiding a copy when it is new.
    pub fn intern_string(&mut self, s: String) -> IStr {
        if let Some(existing) = self.strings.get(s.as_str()) {
            Arc::clone(existing)
        } else {
            let arc: Arc<str> = Arc::from(s);
            self.strings.insert(Arc::clone(&arc));
            arc
        }
    }

    /// Get an interned string if it exists, without creating it.
    pub fn get(&self, s: &str) -> Option<IStr> {
        self.strings.get(s).cloned()
    }

    /// Number of unique strings interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if no strings have been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Clear all interned strings.
    pub fn clear(&mut self) {
        self.strings.clear();
    }
}
