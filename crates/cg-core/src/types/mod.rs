//! Domain types for cg-autoimport.
//!
//! # Module Organization
//!
//! - [`declaration`] - Parsed declarations and the builder that accumulates them
//! - [`kind`] - Declaration kinds
//! - [`file`] - Declaration file identifiers
//! - [`location`] - Editor positions and ranges
//!
//! All public types are re-exported at the crate root:
//!
//! ```
//! use cg_core::{Declaration, DeclarationKind, FileKey, Position, TextRange};
//! ```

mod declaration;
mod file;
mod kind;
mod location;
mod markup;

pub use declaration::{Declaration, DeclarationBuilder};
pub use file::FileKey;
pub use kind::DeclarationKind;
pub use location::{Position, TextRange};
