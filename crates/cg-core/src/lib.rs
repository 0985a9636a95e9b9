//! Core types, errors, and configuration for the cg-autoimport tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Declaration`], the parsed form of one ambient declaration, together
//!   with the [`DeclarationBuilder`] the parser accumulates lines into
//! - Derived identifiers (short name, qualified name, display markup,
//!   auto-insert text, reconstructed file content)
//! - Editor coordinates ([`Position`], [`TextRange`]) and file identity ([`FileKey`])
//! - Configuration structures and the [`ConfigError`] type
//! - An `FxHashSet` alias (faster than std)
//!
//! # Examples
//!
//! ```
//! use cg_core::{DeclarationBuilder, DeclarationKind};
//!
//! let mut builder = DeclarationBuilder::new(
//!     "CG.Foo",
//!     DeclarationKind::Class,
//!     "Bar<T>",
//!     "    }",
//!     false,
//! );
//! builder.push_line("    export declare class Bar<T> extends Baz {");
//! builder.push_line("    }");
//! let decl = builder.finish(String::new());
//!
//! assert_eq!(decl.short_name(), "Bar");
//! assert_eq!(decl.qualified_name(), "CG.Foo.Bar");
//! assert!(decl.has_generics());
//! assert_eq!(decl.autocomplete_label(), "Bar<T>");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{AdvisorConfig, Config, DiscoveryConfig};
pub use error::ConfigError;
pub use hash::{fx_hash_set, FxHashSet};
pub use types::{
    Declaration, DeclarationBuilder, DeclarationKind, FileKey, Position, TextRange,
};
