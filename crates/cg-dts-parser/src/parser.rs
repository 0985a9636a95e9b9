//! Parser entry point.

use cg_core::Declaration;
use tracing::debug;

use crate::reexport;
use crate::scanner::LineScanner;

/// Parser for ambient declaration files.
///
/// Stateless: every [`parse`](Self::parse) call is independent, so one
/// parser can be shared freely across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct DtsParser;

impl DtsParser {
    /// Creates a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses declaration file text into declarations sorted by id.
    ///
    /// Line endings are normalized first. The sort is stable, so
    /// declarations sharing an id keep their source order.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Declaration> {
        let normalized = text.replace('\r', "");

        let mut scanner = LineScanner::new();
        for line in normalized.split('\n') {
            scanner.feed(line);
        }
        let mut declarations = scanner.finish();
        let scanned = declarations.len();

        declarations.extend(reexport::parse_reexports(&normalized));
        declarations.sort_by(|a, b| a.id().cmp(b.id()));

        debug!(
            declarations = declarations.len(),
            reexports = declarations.len() - scanned,
            "parsed declaration file"
        );
        declarations
    }
}

/// Parses `text` with a default [`DtsParser`].
#[must_use]
pub fn parse(text: &str) -> Vec<Declaration> {
    DtsParser::new().parse(text)
}
