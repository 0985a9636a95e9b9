//! Editor positions and ranges.
//!
//! Both types use the editor convention: `line` and `character` are
//! 0-indexed, and `character` counts Unicode scalar values within the line.

use serde::{Deserialize, Serialize};

/// A position within a text document.
///
/// # Examples
///
/// ```
/// use cg_core::Position;
///
/// let pos = Position::new(2, 0);
/// assert_eq!(pos.line, 2);
/// assert!(Position::new(1, 5) < pos);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,

    /// Character offset within the line (0-indexed).
    pub character: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range `[start, end)` within a text document.
///
/// # Examples
///
/// ```
/// use cg_core::{Position, TextRange};
///
/// let range = TextRange::on_line(4, 10, 17);
/// assert!(range.is_single_line());
/// assert_eq!(range.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Inclusive start position.
    pub start: Position,

    /// Exclusive end position.
    pub end: Position,
}

impl TextRange {
    /// Creates a new range.
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a range spanning `start..end` characters on one line.
    #[inline]
    #[must_use]
    pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Returns `true` if the range starts and ends on the same line.
    #[inline]
    #[must_use]
    pub const fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Number of characters covered by a single-line range; 0 otherwise.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        if self.is_single_line() {
            self.end.character.saturating_sub(self.start.character)
        } else {
            0
        }
    }

    /// Returns `true` if a single-line range covers no characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
