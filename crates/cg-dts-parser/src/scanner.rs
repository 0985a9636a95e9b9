//! The line scanner state machine.

use cg_core::{Declaration, DeclarationBuilder, DeclarationKind};
use tracing::trace;

use crate::matcher;

/// Trimmed-line prefixes that are never namespace or declaration lines.
const SKIPPED_PREFIXES: [&str; 2] = ["import {", "private "];

/// Marker that opens a namespace block.
const NAMESPACE_MARKER: &str = "namespace ";

/// Words allowed before [`NAMESPACE_MARKER`] on a namespace line.
const NAMESPACE_MODIFIERS: [&str; 2] = ["export", "declare"];

/// Indentation prepended to collected comment lines.
const COMMENT_INDENT: &str = "    ";

/// Where the scanner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No namespace seen yet.
    Idle,
    /// Inside a namespace, between declarations.
    InNamespace,
    /// Accumulating a declaration of the given kind.
    InDeclaration(DeclarationKind),
}

/// Line-at-a-time declaration scanner.
///
/// Feed it lines with [`feed`](Self::feed) and collect the finished
/// declarations with [`finish`](Self::finish). Results are in closing
/// order; [`DtsParser`](crate::DtsParser) sorts them.
///
/// # Examples
///
/// ```
/// use cg_core::DeclarationKind;
/// use cg_dts_parser::{LineScanner, ScanState};
///
/// let mut scanner = LineScanner::new();
/// scanner.feed("declare namespace CG.Foo {");
/// assert_eq!(scanner.state(), ScanState::InNamespace);
///
/// scanner.feed("    export declare class Bar {");
/// assert_eq!(scanner.state(), ScanState::InDeclaration(DeclarationKind::Class));
///
/// scanner.feed("    }");
/// assert_eq!(scanner.state(), ScanState::InNamespace);
///
/// let declarations = scanner.finish();
/// assert_eq!(declarations[0].short_name(), "Bar");
/// ```
#[derive(Debug, Default)]
pub struct LineScanner {
    namespace: Option<String>,
    open: Option<DeclarationBuilder>,
    pending_comment: String,
    finished: Vec<Declaration>,
}

impl LineScanner {
    /// Creates a scanner in the [`ScanState::Idle`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        match (&self.namespace, &self.open) {
            (_, Some(open)) => ScanState::InDeclaration(open.kind()),
            (Some(_), None) => ScanState::InNamespace,
            (None, None) => ScanState::Idle,
        }
    }

    /// The namespace declarations are currently attributed to.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Processes one line (without its line terminator).
    pub fn feed(&mut self, line: &str) {
        let trimmed = line.trim();
        if SKIPPED_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
        {
            return;
        }

        if let Some((name, remainder)) = namespace_line(line) {
            trace!(namespace = name, "entering namespace");
            self.namespace = Some(name.to_owned());
            if let Some(remainder) = remainder {
                self.declaration_line(remainder);
            }
            return;
        }

        if self.namespace.is_some() {
            self.declaration_line(line);
        } else {
            self.append_comment(line);
        }
    }

    /// Ends input, emitting any declaration still open.
    #[must_use]
    pub fn finish(mut self) -> Vec<Declaration> {
        if self.open.is_some() {
            trace!("emitting unterminated declaration at end of input");
            self.close();
        }
        self.finished
    }

    fn declaration_line(&mut self, line: &str) {
        let trimmed = line.trim();
        let opened = self
            .namespace
            .as_deref()
            .and_then(|namespace| matcher::match_opener(namespace, line));

        if let Some(builder) = opened {
            if self.open.is_some() {
                self.close();
            }
            self.open = Some(builder);
        } else if self
            .open
            .as_ref()
            .is_some_and(|open| open.end_marker() == line)
            || (self.open.is_none() && trimmed == "}")
        {
            if let Some(open) = self.open.as_mut() {
                open.push_line(line);
                self.close();
            }
            self.pending_comment.clear();
            return;
        } else {
            if self.open.as_ref().is_some_and(DeclarationBuilder::is_single_line)
                && is_comment_line(trimmed)
            {
                self.close();
            }
            if self.open.is_none() {
                self.append_comment(line);
            }
        }

        if let Some(open) = self.open.as_mut() {
            open.push_line(line);
            if open.is_single_line() {
                self.close();
            }
        }
    }

    fn close(&mut self) {
        if let Some(open) = self.open.take() {
            let comment = std::mem::take(&mut self.pending_comment);
            self.finished.push(open.finish(comment));
        }
    }

    fn append_comment(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.pending_comment.push('\n');
        self.pending_comment.push_str(COMMENT_INDENT);
        self.pending_comment.push_str(line);
    }
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Splits a namespace-opening line into the namespace name and any text
/// after its opening brace.
///
/// Only `export`/`declare` may precede the marker, so prose that merely
/// mentions a namespace is not mistaken for one.
fn namespace_line(line: &str) -> Option<(&str, Option<&str>)> {
    let at = line.find(NAMESPACE_MARKER)?;
    let modifiers_only = line[..at]
        .split_whitespace()
        .all(|word| NAMESPACE_MODIFIERS.contains(&word));
    if !modifiers_only {
        return None;
    }

    let after = &line[at + NAMESPACE_MARKER.len()..];
    let name_end = after.find(' ').unwrap_or(after.len());
    let name = after[..name_end].trim_end_matches('{').trim();
    if name.is_empty() {
        return None;
    }

    let remainder = after
        .find('{')
        .map(|brace| &after[brace + 1..])
        .filter(|rest| !rest.trim().is_empty());
    Some((name, remainder))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Declaration> {
        let mut scanner = LineScanner::new();
        for line in text.lines() {
            scanner.feed(line);
        }
        scanner.finish()
    }

    #[test]
    fn test_namespace_line_variants() {
        assert_eq!(namespace_line("namespace CG.Foo {"), Some(("CG.Foo", None)));
        assert_eq!(
            namespace_line("declare namespace CG.Foo {"),
            Some(("CG.Foo", None))
        );
        assert_eq!(namespace_line("namespace CG.Bar{"), Some(("CG.Bar", None)));
        assert_eq!(
            namespace_line("namespace CG.Foo { export declare var x: number; }"),
            Some(("CG.Foo", Some(" export declare var x: number; }")))
        );
    }

    #[test]
    fn test_namespace_mentioned_in_prose_is_ignored() {
        assert_eq!(namespace_line("    /** Helpers for the namespace below */"), None);
        assert_eq!(namespace_line("namespace "), None);
    }

    #[test]
    fn test_state_transitions() {
        let mut scanner = LineScanner::new();
        assert_eq!(scanner.state(), ScanState::Idle);

        scanner.feed("namespace CG.Foo {");
        assert_eq!(scanner.state(), ScanState::InNamespace);
        assert_eq!(scanner.namespace(), Some("CG.Foo"));

        scanner.feed("    export declare function wait(");
        assert_eq!(
            scanner.state(),
            ScanState::InDeclaration(DeclarationKind::Function)
        );

        scanner.feed("        ms: number): void;");
        assert_eq!(scanner.state(), ScanState::InNamespace);
    }

    #[test]
    fn test_new_opener_closes_previous_declaration() {
        let declarations = scan(
            "namespace CG.Foo {\n    export declare enum Open {\n        A = 0,\n    export declare var next: number;\n}",
        );
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].short_name(), "Open");
        assert_eq!(
            declarations[0].source(),
            "        export declare enum Open {\n            A = 0,\n"
        );
        assert_eq!(declarations[1].short_name(), "next");
    }

    #[test]
    fn test_skipped_lines_do_not_reach_source() {
        let declarations = scan(
            "namespace CG.Foo {\n    export declare class Bar {\n        private secret;\n        run(): void;\n    }\n}",
        );
        assert_eq!(declarations.len(), 1);
        assert_eq!(
            declarations[0].source(),
            "        export declare class Bar {\n            run(): void;\n        }\n"
        );
    }

    #[test]
    fn test_comment_before_first_namespace_is_attached() {
        let declarations = scan("// generated\nnamespace CG.Foo {\n    export declare var x: number;\n}");
        assert_eq!(declarations[0].preceding_comment(), "\n    // generated");
    }

    #[test]
    fn test_closing_brace_discards_pending_comment() {
        let declarations = scan(
            "namespace CG.A {\n    // stray\n}\nnamespace CG.B {\n    export declare var y: string;\n}",
        );
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].namespace(), "CG.B");
        assert_eq!(declarations[0].preceding_comment(), "");
    }

    #[test]
    fn test_unterminated_declaration_is_emitted() {
        let declarations = scan("namespace CG.Foo {\n    /** Doc. */\n    export interface IOpen {\n        a: number;");
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].short_name(), "IOpen");
        assert_eq!(declarations[0].preceding_comment(), "\n        /** Doc. */");
    }

    #[test]
    fn test_lines_outside_namespace_never_open_declarations() {
        let declarations = scan("export declare class Loose {\n}");
        assert!(declarations.is_empty());
    }
}
