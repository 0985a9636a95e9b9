//! The symbol catalogue.
//!
//! [`SymbolCatalog`] aggregates the declarations of every ingested file into
//! one list kept sorted by declaration id. Ingestion is keyed by file: a
//! file is accepted at most once, even when two refreshes race to ingest it.
//!
//! # Thread Safety
//!
//! All state lives behind one [`parking_lot::RwLock`]. Ingestion takes the
//! write lock for the whole check-and-append, so concurrent ingestion of the
//! same file cannot double-insert. Queries take the read lock and hand out
//! [`Arc`] clones.

use std::sync::Arc;

use cg_core::{fx_hash_set, Declaration, FileKey, FxHashSet};
use parking_lot::RwLock;
use tracing::debug;

/// One catalogue entry.
#[derive(Debug, Clone)]
struct Entry {
    file: FileKey,
    ordinal: usize,
    declaration: Arc<Declaration>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    entries: Vec<Entry>,
    ingested: FxHashSet<FileKey>,
}

/// Sorted collection of declarations from many files, deduplicated by file.
///
/// # Examples
///
/// ```
/// use cg_catalog::SymbolCatalog;
/// use cg_core::FileKey;
///
/// let catalog = SymbolCatalog::new();
/// let file = FileKey::new("typings/app_modules.core.d.ts");
/// let declarations = cg_dts_parser::parse(
///     "namespace CG.Core {\n    export declare const VERSION: string;\n}",
/// );
///
/// assert_eq!(catalog.ingest(&file, declarations.clone()), Some(1));
/// assert_eq!(catalog.ingest(&file, declarations), None);
/// assert_eq!(catalog.suggest("VER").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SymbolCatalog {
    inner: RwLock<CatalogInner>,
}

impl SymbolCatalog {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file's declarations unless the file was already ingested.
    ///
    /// Every declaration of a new file is kept, overloads and symbols that
    /// share an id included. Returns the number of declarations added, or
    /// `None` if the file had been ingested before.
    pub fn ingest(&self, file: &FileKey, declarations: Vec<Declaration>) -> Option<usize> {
        let mut inner = self.inner.write();
        if !inner.ingested.insert(file.clone()) {
            debug!(file = %file, "file already ingested");
            return None;
        }

        let added = declarations.len();
        inner
            .entries
            .extend(declarations.into_iter().enumerate().map(|(ordinal, declaration)| Entry {
                file: file.clone(),
                ordinal,
                declaration: Arc::new(declaration),
            }));

        inner.entries.sort_by(|a, b| {
            a.declaration
                .id()
                .cmp(b.declaration.id())
                .then_with(|| a.file.cmp(&b.file))
                .then(a.ordinal.cmp(&b.ordinal))
        });
        debug!(
            file = %file,
            added,
            total = inner.entries.len(),
            "ingested declarations"
        );
        Some(added)
    }

    /// Returns `true` if `file` has been ingested.
    #[must_use]
    pub fn contains_file(&self, file: &FileKey) -> bool {
        self.inner.read().ingested.contains(file)
    }

    /// Declarations whose short name starts with `prefix`, in id order.
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<Arc<Declaration>> {
        self.collect(|decl| decl.short_name().starts_with(prefix))
    }

    /// First declaration, in id order, with exactly this short name.
    #[must_use]
    pub fn find_by_short_name(&self, name: &str) -> Option<Arc<Declaration>> {
        self.find(|decl| decl.short_name() == name)
    }

    /// First declaration, in id order, with exactly this qualified name.
    #[must_use]
    pub fn find_by_qualified_name(&self, name: &str) -> Option<Arc<Declaration>> {
        self.find(|decl| decl.qualified_name() == name)
    }

    /// Declarations parsed from the same file as `declaration`, itself
    /// included, in source order.
    ///
    /// Empty if `declaration` is not a catalogue entry.
    #[must_use]
    pub fn siblings(&self, declaration: &Declaration) -> Vec<Arc<Declaration>> {
        let inner = self.inner.read();
        let Some(owner) = inner
            .entries
            .iter()
            .find(|entry| std::ptr::eq(entry.declaration.as_ref(), declaration))
        else {
            return Vec::new();
        };

        let mut siblings: Vec<&Entry> = inner
            .entries
            .iter()
            .filter(|entry| entry.file == owner.file)
            .collect();
        siblings.sort_by_key(|entry| entry.ordinal);
        siblings
            .into_iter()
            .map(|entry| Arc::clone(&entry.declaration))
            .collect()
    }

    /// Every declaration, in id order.
    #[must_use]
    pub fn declarations(&self) -> Vec<Arc<Declaration>> {
        self.collect(|_| true)
    }

    /// Ingested files, sorted.
    #[must_use]
    pub fn files(&self) -> Vec<FileKey> {
        let mut files: Vec<_> = self.inner.read().ingested.iter().cloned().collect();
        files.sort();
        files
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Returns `true` if no declarations have been ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Number of ingested files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.inner.read().ingested.len()
    }

    /// Forgets every file and declaration.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.ingested = fx_hash_set();
    }

    fn collect(&self, mut keep: impl FnMut(&Declaration) -> bool) -> Vec<Arc<Declaration>> {
        self.inner
            .read()
            .entries
            .iter()
            .filter(|entry| keep(&entry.declaration))
            .map(|entry| Arc::clone(&entry.declaration))
            .collect()
    }

    fn find(&self, mut matches: impl FnMut(&Declaration) -> bool) -> Option<Arc<Declaration>> {
        self.inner
            .read()
            .entries
            .iter()
            .find(|entry| matches(&entry.declaration))
            .map(|entry| Arc::clone(&entry.declaration))
    }
}
