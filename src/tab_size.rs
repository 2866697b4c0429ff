use crate::document::{Document, DocumentId};
use crate::str_utils;
use std::collections::HashMap;

pub const INFERENCE_LINE_LIMIT: usize = 50;

// Leading space runs shorter than this say nothing about the indent width.
const MIN_SPACE_RUN: usize = 2;

/// Which lines feed tab-size inference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InferenceScope {
    /// The first `n` lines, or the whole document when it is shorter.
    LeadingLines(usize),
    /// Every line of the document.
    WholeDocument,
}

impl Default for InferenceScope {
    fn default() -> InferenceScope {
        InferenceScope::LeadingLines(INFERENCE_LINE_LIMIT)
    }
}

impl InferenceScope {
    fn line_bound(&self, line_count: usize) -> usize {
        match self {
            InferenceScope::LeadingLines(limit) => std::cmp::min(*limit, line_count),
            InferenceScope::WholeDocument => line_count,
        }
    }
}

pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }

    a
}

/// Folds the leading space runs of the examined lines with `gcd`.
/// Returns 0 when no line starts with at least two spaces.
pub fn infer_tab_size(document: &dyn Document, scope: InferenceScope) -> usize {
    let line_bound = scope.line_bound(document.line_count());
    (0..line_bound)
        .map(|idx| str_utils::leading_space_count(document.line_at(idx).content))
        .filter(|run| *run >= MIN_SPACE_RUN)
        .fold(0, gcd)
}

/// A tab size reported by the host always wins over inference.
pub fn resolve_tab_size(
    document: &dyn Document,
    host_hint: Option<usize>,
    scope: InferenceScope,
) -> usize {
    match host_hint {
        Some(tab_size) => tab_size,
        None => infer_tab_size(document, scope),
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedTabSize {
    version: u64,
    scope: InferenceScope,
    tab_size: usize,
}

/// Inferred tab sizes per document, dropped as soon as the document version moves.
#[derive(Debug, Default)]
pub struct TabSizeCache {
    entries: HashMap<DocumentId, CachedTabSize>,
}

impl TabSizeCache {
    pub fn new() -> TabSizeCache {
        TabSizeCache::default()
    }

    pub fn tab_size(&mut self, document: &dyn Document, scope: InferenceScope) -> usize {
        let version = document.version();
        if let Some(cached) = self.entries.get(&document.id()) {
            if cached.version == version && cached.scope == scope {
                return cached.tab_size;
            }
        }

        let tab_size = infer_tab_size(document, scope);
        self.entries.insert(
            document.id(),
            CachedTabSize {
                version,
                scope,
                tab_size,
            },
        );

        tab_size
    }

    pub fn forget(&mut self, id: DocumentId) {
        self.entries.remove(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
