//! Declaration file identifiers.

use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Identifies one ambient declaration file.
///
/// The catalogue ingests each file at most once, keyed by this value.
/// Filesystem sources use the workspace-relative path with `/` separators.
///
/// # Examples
///
/// ```
/// use cg_core::FileKey;
/// use camino::Utf8Path;
///
/// let key = FileKey::from(Utf8Path::new("typings/app_modules.core.d.ts"));
/// assert_eq!(key.as_str(), "typings/app_modules.core.d.ts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileKey(String);

impl FileKey {
    /// Creates a file key from any string-like identifier.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Utf8Path> for FileKey {
    fn from(path: &Utf8Path) -> Self {
        Self(path.as_str().replace('\\', "/"))
    }
}

impl From<&str> for FileKey {
    #[inline]
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl AsRef<str> for FileKey {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
