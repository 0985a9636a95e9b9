//! Configuration structures for the cg-autoimport tool.
//!
//! - [`DiscoveryConfig`] - where declaration files live and how to find them
//! - [`AdvisorConfig`] - how completions and code fixes are produced
//! - [`Config`] - root configuration combining both
//!
//! All configuration types implement [`Default`] with the values the
//! editor extension shipped with, and every field is optional when loading
//! from JSON.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::ConfigError;

/// Default glob for ambient declaration files, relative to the workspace root.
pub const DEFAULT_PATTERN: &str = "typings/*_modules.*.d.ts";

/// Default cap on the number of discovered declaration files.
pub const DEFAULT_MAX_FILES: usize = 1000;

/// TypeScript diagnostic codes for "Cannot find name" (2304) and
/// "Cannot find name. Did you mean ...?" (2552).
pub const DEFAULT_UNRESOLVED_CODES: [u32; 2] = [2304, 2552];

/// Configuration for declaration file discovery.
///
/// # Examples
///
/// ```
/// use cg_core::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default();
/// assert_eq!(config.pattern, "typings/*_modules.*.d.ts");
/// assert_eq!(config.max_files, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Workspace root that `pattern` is relative to.
    pub root: Utf8PathBuf,

    /// Workspace-relative glob selecting declaration files.
    pub pattern: String,

    /// Maximum number of files returned by one discovery pass.
    pub max_files: usize,

    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,

    /// Whether `.gitignore` rules hide declaration files.
    ///
    /// Generated typings are often git-ignored, so this is off by default.
    pub respect_gitignore: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_owned(),
            max_files: DEFAULT_MAX_FILES,
            skip_dirs: vec!["node_modules".to_owned(), ".git".to_owned()],
            follow_links: false,
            respect_gitignore: false,
        }
    }
}

/// Configuration for the completion/import advisor.
///
/// # Examples
///
/// ```
/// use cg_core::AdvisorConfig;
///
/// let config = AdvisorConfig::default();
/// assert!(config.is_unresolved_code(2304));
/// assert!(!config.is_unresolved_code(2322));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Diagnostic codes that mark an identifier as unresolved.
    pub unresolved_codes: SmallVec<[u32; 4]>,

    /// Diagnostic source the codes must come from.
    pub diagnostic_source: String,

    /// Prefix prepended to a completion label to build its sort text.
    pub sort_prefix: String,

    /// Title of the offered code fix.
    pub fix_title: String,
}

impl AdvisorConfig {
    /// Returns `true` if `code` is one of the configured unresolved-identifier codes.
    #[inline]
    #[must_use]
    pub fn is_unresolved_code(&self, code: u32) -> bool {
        self.unresolved_codes.contains(&code)
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            unresolved_codes: smallvec![DEFAULT_UNRESOLVED_CODES[0], DEFAULT_UNRESOLVED_CODES[1]],
            diagnostic_source: "ts".to_owned(),
            sort_prefix: "_".to_owned(),
            fix_title: "Auto Import".to_owned(),
        }
    }
}

/// Root configuration for cg-autoimport.
///
/// # Examples
///
/// ```
/// use cg_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"discovery": {"max_files": 10}}"#)?;
/// assert_eq!(config.discovery.max_files, 10);
/// assert_eq!(config.advisor.fix_title, "Auto Import");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Declaration file discovery settings.
    pub discovery: DiscoveryConfig,

    /// Completion and code-fix settings.
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON, or any error
    /// from [`validate`](Self::validate).
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_std_path()).map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an empty pattern, a zero
    /// file cap, or an empty code list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.pattern.trim().is_empty() {
            return Err(ConfigError::invalid_option("discovery.pattern", "must not be empty"));
        }
        if self.discovery.max_files == 0 {
            return Err(ConfigError::invalid_option("discovery.max_files", "must be positive"));
        }
        if self.advisor.unresolved_codes.is_empty() {
            return Err(ConfigError::invalid_option(
                "advisor.unresolved_codes",
                "must list at least one diagnostic code",
            ));
        }
        Ok(())
    }

    /// Checks that the discovery root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRoot`] or [`ConfigError::RootNotDirectory`].
    pub fn validate_root(&self) -> Result<(), ConfigError> {
        let root = &self.discovery.root;
        if !root.exists() {
            return Err(ConfigError::MissingRoot(root.clone()));
        }
        if !root.is_dir() {
            return Err(ConfigError::RootNotDirectory(root.clone()));
        }
        Ok(())
    }
}
