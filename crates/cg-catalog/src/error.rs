//! Error types for the cg-catalog crate.
//!
//! This module provides the [`CatalogError`] type for errors that can occur
//! while discovering and reading declaration files.

use camino::Utf8PathBuf;

/// Errors that can occur while refreshing the catalogue.
///
/// # Error Recovery Strategy
///
/// - **Walker errors** ([`CatalogError::Walk`]): fatal, the refresh stops
/// - **File read errors** ([`CatalogError::Read`]): logged, the file is
///   skipped and may be retried by the next refresh
/// - **Glob and configuration errors**: fatal, reported before any walking
///
/// Parsing itself never fails.
///
/// # Examples
///
/// ```
/// use cg_catalog::CatalogError;
/// use std::io;
///
/// let err = CatalogError::read(
///     "typings/app_modules.core.d.ts",
///     io::Error::new(io::ErrorKind::NotFound, "gone"),
/// );
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to walk the workspace.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a declaration file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The discovery pattern is not a valid glob.
    #[error("invalid discovery pattern: {0}")]
    Glob(#[from] globset::Error),

    /// Invalid discovery configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl CatalogError {
    /// Creates a new [`CatalogError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`CatalogError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if the refresh can continue past this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Returns `true` if the refresh must stop.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } => Some(path),
            Self::Walk(_) | Self::Glob(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_catalog_error_read() {
        let err = CatalogError::read(
            "typings/a_modules.x.d.ts",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert_eq!(
            err.path().map(|p| p.as_str()),
            Some("typings/a_modules.x.d.ts")
        );
        assert!(err.to_string().contains("typings/a_modules.x.d.ts"));
    }

    #[test]
    fn test_catalog_error_glob() {
        let glob_err = globset::Glob::new("typings/[").map(|_| ());
        let err = glob_err.map_err(CatalogError::from);
        let err = match err {
            Err(err) => err,
            Ok(()) => panic!("unterminated class should not compile"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().starts_with("invalid discovery pattern"));
    }

    #[test]
    fn test_catalog_error_config() {
        let err = CatalogError::config("root does not exist");
        assert!(err.is_fatal());
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "invalid configuration: root does not exist");
    }

    #[test]
    fn test_catalog_error_non_utf8() {
        use std::path::PathBuf;
        let err = CatalogError::NonUtf8Path(PathBuf::from("bad"));
        assert!(err.is_fatal());
        assert!(err.path().is_none());
    }
}
