//! Configuration errors.

use camino::Utf8PathBuf;

/// Why a [`Config`](crate::Config) could not be loaded or was rejected.
///
/// # Examples
///
/// ```
/// use cg_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingRoot(Utf8PathBuf::from("/workspace"));
/// assert_eq!(error.to_string(), "workspace root does not exist: /workspace");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The discovery root does not exist.
    #[error("workspace root does not exist: {0}")]
    MissingRoot(Utf8PathBuf),

    /// The discovery root exists but is a file.
    #[error("workspace root is not a directory: {0}")]
    RootNotDirectory(Utf8PathBuf),

    /// An option holds a value the tool cannot work with.
    #[error("invalid option '{option}': {reason}")]
    InvalidOption {
        /// Dotted option path, e.g. `discovery.max_files`.
        option: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for a [`Config`](crate::Config).
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The configuration file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidOption`].
    #[inline]
    #[must_use]
    pub const fn invalid_option(option: &'static str, reason: &'static str) -> Self {
        Self::InvalidOption { option, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("discovery.max_files", "must be positive");
        assert_eq!(
            error.to_string(),
            "invalid option 'discovery.max_files': must be positive"
        );
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::Parse {
            path: Utf8PathBuf::from("cg-autoimport.json"),
            source,
        };
        assert!(error.to_string().starts_with("failed to parse cg-autoimport.json: "));
        assert!(std::error::Error::source(&error).is_some());
    }
}
