//! Discovery of ambient declaration files.
//!
//! [`DeclarationFileWalker`] walks a workspace with the `ignore` crate and
//! keeps the files whose workspace-relative path matches a glob such as
//! `typings/*_modules.*.d.ts`.
//!
//! # Examples
//!
//! ```ignore
//! use cg_catalog::DeclarationFileWalker;
//! use camino::Utf8Path;
//!
//! let walker = DeclarationFileWalker::new(Utf8Path::new("."), "typings/*_modules.*.d.ts")?;
//! for path in walker.collect_paths()? {
//!     println!("found {path}");
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

use crate::error::CatalogError;

/// Directories never descended into, in addition to configured ones.
const SKIP_DIRECTORIES: &[&str] = &["node_modules", ".git"];

/// Walks a workspace for declaration files matching a glob.
///
/// Paths are matched relative to the root with `/` separators, and `*`
/// never crosses a separator, so `typings/*.d.ts` only matches direct
/// children of `typings`.
#[derive(Debug)]
pub struct DeclarationFileWalker {
    /// The workspace root.
    root: Utf8PathBuf,
    /// Compiled discovery pattern.
    matcher: GlobMatcher,
    /// Maximum depth implied by the pattern, if bounded.
    max_depth: Option<usize>,
    /// Additional directories to skip.
    skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    follow_links: bool,
    /// Whether `.gitignore` rules apply.
    respect_gitignore: bool,
    /// Cap on the number of returned paths.
    max_files: usize,
}

impl DeclarationFileWalker {
    /// Creates a walker for `root` matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the root doesn't exist or isn't a
    /// directory, and [`CatalogError::Glob`] if the pattern is invalid.
    pub fn new(root: &Utf8Path, pattern: &str) -> Result<Self, CatalogError> {
        if !root.exists() {
            return Err(CatalogError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(CatalogError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();
        let max_depth = (!pattern.contains("**")).then(|| pattern.split('/').count());

        Ok(Self {
            root: root.to_owned(),
            matcher,
            max_depth,
            skip_dirs: Vec::new(),
            follow_links: false,
            respect_gitignore: false,
            max_files: usize::MAX,
        })
    }

    /// Adds directory names to skip during traversal.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configures whether `.gitignore` rules hide files.
    #[must_use]
    pub const fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Caps the number of returned paths.
    #[must_use]
    pub const fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Collects matching paths, relative to the root, sorted and capped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Walk`] if traversal fails and
    /// [`CatalogError::NonUtf8Path`] for a non-UTF-8 path.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, CatalogError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| CatalogError::NonUtf8Path(path.to_owned()))?;
            let relative = utf8_path.strip_prefix(&self.root).unwrap_or(utf8_path);

            if self.should_skip_path(relative) || !self.matches(relative) {
                continue;
            }
            paths.push(relative.to_owned());
        }

        paths.sort();
        paths.truncate(self.max_files);
        Ok(paths)
    }

    /// Returns `true` if a workspace-relative path matches the pattern.
    #[must_use]
    pub fn matches(&self, relative: &Utf8Path) -> bool {
        self.matcher.is_match(relative.as_str().replace('\\', "/"))
    }

    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(true)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth)
            .require_git(false)
            .build()
    }

    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        path.components().any(|component| {
            let name = component.as_str();
            SKIP_DIRECTORIES.contains(&name) || self.skip_dirs.iter().any(|dir| dir == name)
        })
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
