//! Declaration file sources.
//!
//! The catalogue never touches the filesystem directly. A
//! [`DeclarationSource`] lists the declaration files it knows about and
//! supplies their text on demand.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use cg_core::{DiscoveryConfig, FileKey};
use parking_lot::RwLock;

use crate::error::CatalogError;
use crate::walker::DeclarationFileWalker;

/// Supplies declaration files to the advisor.
pub trait DeclarationSource: Send + Sync {
    /// Lists available declaration files, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`CatalogError`] if discovery as a whole fails.
    fn discover(&self) -> Result<Vec<FileKey>, CatalogError>;

    /// Returns the full text of one declaration file.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`CatalogError::Read`] if the file can't be read.
    fn read(&self, file: &FileKey) -> Result<String, CatalogError>;
}

/// Declaration files found on disk under a workspace root.
///
/// # Examples
///
/// ```no_run
/// use cg_catalog::{DeclarationSource, FsDeclarationSource};
/// use cg_core::DiscoveryConfig;
///
/// let source = FsDeclarationSource::new(&DiscoveryConfig::default())?;
/// for file in source.discover()? {
///     let text = source.read(&file)?;
///     println!("{file}: {} bytes", text.len());
/// }
/// # Ok::<(), cg_catalog::CatalogError>(())
/// ```
#[derive(Debug)]
pub struct FsDeclarationSource {
    walker: DeclarationFileWalker,
}

impl FsDeclarationSource {
    /// Creates a source from discovery settings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] for a missing root or a zero file
    /// cap, and [`CatalogError::Glob`] for an invalid pattern.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, CatalogError> {
        if config.max_files == 0 {
            return Err(CatalogError::config("max_files must be positive"));
        }
        let walker = DeclarationFileWalker::new(&config.root, &config.pattern)?
            .with_skip_dirs(config.skip_dirs.as_slice())
            .with_follow_links(config.follow_links)
            .with_gitignore(config.respect_gitignore)
            .with_max_files(config.max_files);
        Ok(Self { walker })
    }

    /// Absolute path of a discovered file.
    #[must_use]
    pub fn path_of(&self, file: &FileKey) -> Utf8PathBuf {
        self.walker.root().join(file.as_str())
    }
}

impl DeclarationSource for FsDeclarationSource {
    fn discover(&self) -> Result<Vec<FileKey>, CatalogError> {
        let paths = self.walker.collect_paths()?;
        Ok(paths.iter().map(|path| FileKey::from(path.as_path())).collect())
    }

    fn read(&self, file: &FileKey) -> Result<String, CatalogError> {
        let path = self.path_of(file);
        std::fs::read_to_string(&path).map_err(|source| CatalogError::read(path, source))
    }
}

/// Declaration files held in memory, keyed by name.
///
/// Useful for embedding the advisor where files arrive from an editor
/// buffer rather than the disk.
///
/// # Examples
///
/// ```
/// use cg_catalog::{DeclarationSource, MemorySource};
///
/// let source = MemorySource::new();
/// source.insert("core.d.ts", "namespace CG.Core {\n}\n");
/// assert_eq!(source.discover()?.len(), 1);
/// # Ok::<(), cg_catalog::CatalogError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<BTreeMap<FileKey, String>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&self, key: impl Into<FileKey>, text: impl Into<String>) {
        self.files.write().insert(key.into(), text.into());
    }
}

impl DeclarationSource for MemorySource {
    fn discover(&self) -> Result<Vec<FileKey>, CatalogError> {
        Ok(self.files.read().keys().cloned().collect())
    }

    fn read(&self, file: &FileKey) -> Result<String, CatalogError> {
        self.files.read().get(file).cloned().ok_or_else(|| {
            CatalogError::read(
                file.as_str(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory source"),
            )
        })
    }
}
