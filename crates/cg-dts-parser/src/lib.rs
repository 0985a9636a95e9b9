//! Line-scanner parser for ambient TypeScript declaration files.
//!
//! Turns the text of a `.d.ts` style file into a sorted list of
//! [`Declaration`](cg_core::Declaration)s without a TypeScript front end:
//!
//! - A line scanner state machine tracks the current namespace and the
//!   declaration being accumulated, recognizing openers from a declarative
//!   table (`export interface`, `export declare class`, ...)
//! - A second pass over the raw text picks up grouped `export { ... }`
//!   re-exports and assigns each to its nearest enclosing namespace
//!
//! Parsing never fails. Unrecognized lines become comment text or
//! declaration source, and a declaration left open at end of input is
//! emitted as-is.
//!
//! # Examples
//!
//! ```
//! use cg_core::DeclarationKind;
//! use cg_dts_parser::DtsParser;
//!
//! let source = "\
//! declare namespace CG.Foo {
//!     export declare class Bar<T> extends Baz {
//!     }
//!     export declare function doIt(x: number, y: string): void;
//! }
//! ";
//!
//! let declarations = DtsParser::new().parse(source);
//! assert_eq!(declarations.len(), 2);
//!
//! let class = &declarations[0];
//! assert_eq!(class.kind(), DeclarationKind::Class);
//! assert_eq!(class.qualified_name(), "CG.Foo.Bar");
//!
//! let function = &declarations[1];
//! assert_eq!(function.insert_text(), "CG.Foo.doIt(x,y)");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod matcher;
mod parser;
mod reexport;
mod scanner;

pub use matcher::{Opener, Terminator, OPENERS};
pub use parser::{parse, DtsParser};
pub use scanner::{LineScanner, ScanState};
