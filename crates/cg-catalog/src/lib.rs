//! Symbol catalogue and import advisor for ambient declaration files.
//!
//! This crate turns a workspace's generated `*_modules.*.d.ts` typings into
//! editor answers: completion proposals for a prefix, and an `Auto Import`
//! fix for an unresolved identifier.
//!
//! # Overview
//!
//! - [`DeclarationSource`]: where declaration files come from, either the
//!   disk ([`FsDeclarationSource`], built on [`DeclarationFileWalker`]) or
//!   memory ([`MemorySource`])
//! - [`SymbolCatalog`]: declarations of every ingested file, sorted by id,
//!   ingested at most once per file
//! - [`ImportAdvisor`]: refreshes the catalogue in parallel and answers
//!   completion and code-fix queries
//! - [`resolve_import_insertion_point`]: where an `import X = CG.X;` line goes
//!
//! # Example
//!
//! ```no_run
//! use cg_catalog::{FsDeclarationSource, ImportAdvisor};
//! use cg_core::Config;
//!
//! let config = Config::default();
//! let source = FsDeclarationSource::new(&config.discovery)?;
//! let advisor = ImportAdvisor::with_config(config.advisor);
//!
//! let report = advisor.refresh(&source)?;
//! println!("{} declarations", report.stats.declarations);
//!
//! for proposal in advisor.completions("Wid", Some("let w = Wid")) {
//!     println!("{} {}", proposal.label, proposal.detail);
//! }
//! # Ok::<(), cg_catalog::CatalogError>(())
//! ```
//!
//! # Streaming API
//!
//! ```ignore
//! let (tx, mut rx) = mpsc::channel(256);
//! let worker = advisor.clone();
//! tokio::task::spawn_blocking(move || worker.refresh_streaming(source.as_ref(), tx));
//!
//! while let Some(update) = rx.recv().await {
//!     match update {
//!         RefreshUpdate::FilesDiscovered(count) => println!("Found {count} files"),
//!         RefreshUpdate::FileIngested { file, .. } => println!("Ingested {file}"),
//!         RefreshUpdate::FileError { file, error } => println!("{file}: {error}"),
//!         RefreshUpdate::Complete(stats) => println!("{} declarations", stats.declarations),
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod advisor;
mod catalog;
mod error;
mod import;
mod source;
mod stats;
mod walker;

pub use advisor::{
    CodeFix, CompletionKind, CompletionProposal, Diagnostic, ImportAdvisor, RefreshReport,
    RefreshUpdate,
};
pub use catalog::SymbolCatalog;
pub use error::CatalogError;
pub use import::{import_statement, resolve_import_insertion_point, ImportEdit};
pub use source::{DeclarationSource, FsDeclarationSource, MemorySource};
pub use stats::{RefreshStats, StatsSnapshot};
pub use walker::DeclarationFileWalker;
