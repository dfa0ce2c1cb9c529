//! Shared, append-only candidate store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::core::fuzzy::matches_query;
use crate::search::source::SourceName;

/// One searchable line of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: SourceName,
    /// 1-based line number within the source.
    pub line_no: usize,
    pub text: String,
}

impl Candidate {
    pub fn new(source: SourceName, line_no: usize, text: impl Into<String>) -> Self {
        Self {
            source,
            line_no,
            text: text.into(),
        }
    }

    /// `relative_path:line_no:text`
    pub fn to_line(&self) -> String {
        format!(
            "{}:{}:{}",
            self.source.relative_path(),
            self.line_no,
            self.text
        )
    }
}

/// Cheap to clone; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    items: Arc<RwLock<Vec<Candidate>>>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, candidate: Candidate) {
        self.write_items().push(candidate);
    }

    pub fn extend<I>(&self, candidates: I)
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.write_items().extend(candidates);
    }

    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    /// Calls `f(index, candidate)` for each candidate accepted by `query`, in
    /// insertion order, as the scan reaches it. Returning `false` from `f`
    /// stops the scan.
    pub fn each_by_filter<F>(&self, query: &str, mut f: F)
    where
        F: FnMut(usize, &Candidate) -> bool,
    {
        let items = self.read_items();
        for (index, candidate) in items.iter().enumerate() {
            if matches_query(query, &candidate.text) && !f(index, candidate) {
                break;
            }
        }
    }

    fn read_items(&self) -> RwLockReadGuard<'_, Vec<Candidate>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Candidate>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}
