//! Declarative table of declaration openers.
//!
//! Each [`Opener`] pairs a literal keyword with the [`Terminator`] rule that
//! ends its signature and the closer text that ends its body. The scanner
//! tries them in table order and takes the first match.

use cg_core::{DeclarationBuilder, DeclarationKind};

/// How the signature following an opener keyword ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Earliest of ` extends `, ` implements ` or ` {` outside a generic
    /// list, else end of line. Never single-line.
    Clause,
    /// First `;` (single-line), else first `:` (type continues on later
    /// lines), else end of line.
    Statement,
    /// First `;` (single-line), else end of line.
    Signature,
    /// First ` {`, else end of line. Never single-line.
    Body,
}

impl Terminator {
    /// Returns the signature length within `rest` and whether the whole
    /// declaration fits on this line.
    #[must_use]
    pub fn locate(self, rest: &str) -> (usize, bool) {
        match self {
            Self::Clause => {
                let end = [" extends ", " implements ", " {"]
                    .into_iter()
                    .filter_map(|needle| find_outside_generics(rest, needle))
                    .min()
                    .unwrap_or(rest.len());
                (end, false)
            }
            Self::Statement => match (rest.find(';'), rest.find(':')) {
                (Some(end), _) => (end, true),
                (None, Some(end)) => (end, false),
                (None, None) => (rest.len(), false),
            },
            Self::Signature => rest.find(';').map_or((rest.len(), false), |end| (end, true)),
            Self::Body => (rest.find(" {").unwrap_or(rest.len()), false),
        }
    }
}

fn find_outside_generics(text: &str, needle: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[index..].starts_with(needle) => return Some(index),
            _ => {}
        }
    }
    None
}

/// One row of the opener table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opener {
    /// Literal text that opens the declaration.
    pub keyword: &'static str,
    /// Kind of declaration it opens.
    pub kind: DeclarationKind,
    /// Signature terminator rule.
    pub terminator: Terminator,
    /// Text appended to the opening line's indentation to form the end marker.
    pub closer: &'static str,
}

/// Openers in the order they are tried.
pub const OPENERS: [Opener; 6] = [
    Opener {
        keyword: "export interface ",
        kind: DeclarationKind::Interface,
        terminator: Terminator::Clause,
        closer: "}",
    },
    Opener {
        keyword: "export declare class ",
        kind: DeclarationKind::Class,
        terminator: Terminator::Clause,
        closer: "}",
    },
    Opener {
        keyword: "export declare const ",
        kind: DeclarationKind::Const,
        terminator: Terminator::Statement,
        closer: "};",
    },
    Opener {
        keyword: "export declare var ",
        kind: DeclarationKind::Var,
        terminator: Terminator::Statement,
        closer: "};",
    },
    Opener {
        keyword: "export declare function ",
        kind: DeclarationKind::Function,
        terminator: Terminator::Signature,
        closer: "}",
    },
    Opener {
        keyword: "export declare enum ",
        kind: DeclarationKind::Enum,
        terminator: Terminator::Body,
        closer: "}",
    },
];

impl Opener {
    /// Opens a declaration if `line` contains this opener's keyword and a
    /// non-empty signature follows it.
    #[must_use]
    pub fn open(&self, namespace: &str, line: &str) -> Option<DeclarationBuilder> {
        let at = line.find(self.keyword)?;
        let rest = &line[at + self.keyword.len()..];
        let (end, single_line) = self.terminator.locate(rest);
        let signature = rest[..end].trim();
        if signature.is_empty() {
            return None;
        }

        let end_marker = format!("{}{}", &line[..at], self.closer);
        Some(DeclarationBuilder::new(
            namespace,
            self.kind,
            signature,
            end_marker,
            single_line,
        ))
    }
}

/// Tries every opener in table order against `line`.
pub(crate) fn match_opener(namespace: &str, line: &str) -> Option<DeclarationBuilder> {
    OPENERS.iter().find_map(|opener| opener.open(namespace, line))
}
