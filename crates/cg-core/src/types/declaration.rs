//! Parsed declarations and the builder that accumulates them.
//!
//! The parser opens a [`DeclarationBuilder`] when it recognizes a declaration
//! opener, pushes source lines into it until the declaration closes, and then
//! [`finish`](DeclarationBuilder::finish)es it into an immutable
//! [`Declaration`]. Names are derived once at that point; display markup and
//! reconstructed file content are computed lazily and cached.

use std::borrow::Cow;
use std::sync::OnceLock;

use serde::Serialize;

use super::kind::DeclarationKind;
use super::markup;

/// Indentation prepended to every accumulated source line.
const SOURCE_INDENT: &str = "    ";

/// An in-progress declaration.
///
/// # Examples
///
/// ```
/// use cg_core::{DeclarationBuilder, DeclarationKind};
///
/// let mut builder = DeclarationBuilder::new(
///     "CG.Foo",
///     DeclarationKind::Function,
///     "doIt(",
///     "    }",
///     false,
/// );
/// builder.push_line("    export declare function doIt(");
/// assert!(!builder.is_single_line());
///
/// builder.push_line("        x: number): void;");
/// assert!(builder.is_single_line());
/// assert_eq!(builder.raw_signature(), "doIt(x: number): void");
/// ```
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    namespace: String,
    kind: DeclarationKind,
    raw_signature: String,
    end_marker: String,
    single_line: bool,
    source: String,
}

impl DeclarationBuilder {
    /// Opens a declaration recognized on a line of `namespace`.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        kind: DeclarationKind,
        raw_signature: impl Into<String>,
        end_marker: impl Into<String>,
        single_line: bool,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            kind,
            raw_signature: raw_signature.into(),
            end_marker: end_marker.into(),
            single_line,
            source: String::new(),
        }
    }

    /// Appends one raw line to the accumulated source.
    ///
    /// For a multi-line function, the first line containing `;` while the
    /// accumulated parentheses balance completes the signature: it is
    /// re-derived from the flattened source and the builder becomes
    /// single-line.
    pub fn push_line(&mut self, line: &str) {
        self.source.push_str(SOURCE_INDENT);
        self.source.push_str(line);
        self.source.push('\n');

        if self.kind == DeclarationKind::Function
            && !self.single_line
            && line.contains(';')
            && parens_balanced(&self.source)
        {
            self.raw_signature = markup::flatten_function_signature(&self.source);
            self.single_line = true;
        }
    }

    /// Replaces the accumulated source with pre-rendered text.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Returns `true` once the whole signature has been captured.
    #[inline]
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        self.single_line
    }

    /// The exact line text that closes this declaration.
    #[inline]
    #[must_use]
    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// The declaration kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    /// The namespace the declaration was opened in.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The current raw signature.
    #[inline]
    #[must_use]
    pub fn raw_signature(&self) -> &str {
        &self.raw_signature
    }

    /// Closes the declaration, attaching the comment block collected before it.
    #[must_use]
    pub fn finish(self, preceding_comment: impl Into<String>) -> Declaration {
        let (short_name, has_generics) =
            markup::derive_short_name(self.kind, &self.raw_signature);
        let qualified_name = format!("{}.{short_name}", self.namespace);
        let id = if self.kind.is_standalone() {
            self.namespace.clone()
        } else {
            qualified_name.clone()
        };

        Declaration {
            namespace: self.namespace,
            kind: self.kind,
            raw_signature: self.raw_signature,
            end_marker: self.end_marker,
            single_line: self.single_line,
            short_name,
            qualified_name,
            has_generics,
            source: self.source,
            preceding_comment: preceding_comment.into(),
            id,
            markup: OnceLock::new(),
            standalone_content: OnceLock::new(),
        }
    }
}

fn parens_balanced(source: &str) -> bool {
    let open = source.matches('(').count();
    let close = source.matches(')').count();
    open == close
}

/// One parsed symbol.
///
/// Immutable once finished, except for derived text that is computed on
/// first access and cached.
///
/// Invariants:
///
/// - `short_name` is never empty for a non-empty signature
/// - `qualified_name == namespace + "." + short_name`
/// - `id` is the namespace for standalone kinds, the qualified name
///   otherwise, optionally prefixed by an ordinal (see [`with_ordinal`](Self::with_ordinal))
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    namespace: String,
    kind: DeclarationKind,
    raw_signature: String,
    end_marker: String,
    single_line: bool,
    short_name: String,
    qualified_name: String,
    has_generics: bool,
    source: String,
    preceding_comment: String,
    id: String,

    #[serde(skip)]
    markup: OnceLock<String>,

    #[serde(skip)]
    standalone_content: OnceLock<String>,
}

impl Declaration {
    /// Prefixes the id with `zzz<index>_` so entries of one re-export group
    /// keep their source order under lexical sorting.
    #[must_use]
    pub fn with_ordinal(mut self, index: usize) -> Self {
        self.id = format!("zzz{index}_{}", self.id);
        self
    }

    /// Dotted namespace path the declaration lives in.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The declaration kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    /// Signature text following the opener keyword.
    #[inline]
    #[must_use]
    pub fn raw_signature(&self) -> &str {
        &self.raw_signature
    }

    /// The line text that closed (or would close) the declaration.
    #[inline]
    #[must_use]
    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// Whether the whole signature was captured on one (logical) line.
    #[inline]
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        self.single_line
    }

    /// The bare identifier, e.g. `Bar`.
    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// `namespace.short_name`, e.g. `CG.Foo.Bar`.
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Whether a class or interface signature carries a generic list.
    #[inline]
    #[must_use]
    pub fn has_generics(&self) -> bool {
        self.has_generics
    }

    /// Accumulated source lines, each indented and newline-terminated.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Comment and filler text collected before the declaration.
    #[inline]
    #[must_use]
    pub fn preceding_comment(&self) -> &str {
        &self.preceding_comment
    }

    /// Stable sort and dedupe key.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title: the id without a leading `CG.`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.id.strip_prefix("CG.").unwrap_or(&self.id)
    }

    /// `namespace.raw_signature`.
    #[must_use]
    pub fn qualified_signature(&self) -> String {
        format!("{}.{}", self.namespace, self.raw_signature)
    }

    /// Completion label: the short name, with `<T>` when generic.
    #[must_use]
    pub fn autocomplete_label(&self) -> Cow<'_, str> {
        if self.has_generics {
            Cow::Owned(format!("{}<T>", self.short_name))
        } else {
            Cow::Borrowed(&self.short_name)
        }
    }

    /// Completion detail text, `(<kind>) <qualified name>`.
    #[must_use]
    pub fn detail(&self) -> String {
        format!("({}) {}", self.kind.label(), self.qualified_name)
    }

    /// Text inserted when the completion is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use cg_core::{DeclarationBuilder, DeclarationKind};
    ///
    /// let decl = DeclarationBuilder::new(
    ///     "CG.Foo",
    ///     DeclarationKind::Function,
    ///     "doIt(x: number, y: string): void",
    ///     "}",
    ///     true,
    /// )
    /// .finish("");
    /// assert_eq!(decl.insert_text(), "CG.Foo.doIt(x,y)");
    /// ```
    #[must_use]
    pub fn insert_text(&self) -> Cow<'_, str> {
        match self.kind {
            DeclarationKind::Class
            | DeclarationKind::Interface
            | DeclarationKind::Enum
            | DeclarationKind::Const
            | DeclarationKind::Var => Cow::Borrowed(&self.short_name),
            DeclarationKind::Function => {
                Cow::Owned(markup::function_insert_text(&self.qualified_signature()))
            }
            DeclarationKind::ReExport => Cow::Borrowed(&self.qualified_name),
        }
    }

    /// HTML-ish annotated form of the qualified signature.
    pub fn display_markup(&self) -> &str {
        self.markup
            .get_or_init(|| markup::display_markup(self.kind, &self.qualified_signature()))
    }

    /// Reconstructed file content for this declaration.
    ///
    /// Standalone kinds render on their own and ignore `siblings`. Other
    /// kinds render every non-standalone sibling of the same namespace
    /// inside one `namespace` block; pass the declarations parsed alongside
    /// this one (including itself).
    pub fn file_content<'a>(
        &'a self,
        siblings: impl IntoIterator<Item = &'a Declaration>,
    ) -> Cow<'a, str> {
        if self.kind.is_standalone() {
            return Cow::Borrowed(self.standalone_content.get_or_init(|| {
                format!(
                    "{}namespace {} {{\n\n{}\n\n}}",
                    self.comment_block(),
                    self.namespace,
                    self.source
                )
            }));
        }

        let mut body = String::new();
        for sibling in siblings {
            if sibling.namespace == self.namespace && !sibling.kind.is_standalone() {
                body.push('\n');
                body.push_str(&sibling.comment_block());
                body.push_str(&sibling.source);
            }
        }
        Cow::Owned(format!("namespace {} {{\n\n{body}\n\n}}", self.namespace))
    }

    /// 1-based line of this declaration's source inside its reconstructed
    /// file content, or 0 when it cannot be located (always 0 for
    /// standalone kinds).
    pub fn line_number<'a>(&'a self, siblings: impl IntoIterator<Item = &'a Declaration>) -> usize {
        if self.kind.is_standalone() || self.source.is_empty() {
            return 0;
        }
        let content = self.file_content(siblings);
        content
            .find(self.source.as_str())
            .map_or(0, |at| content[..at].matches('\n').count() + 1)
    }

    fn comment_block(&self) -> Cow<'_, str> {
        if self.preceding_comment.is_empty() {
            Cow::Borrowed("")
        } else {
            Cow::Owned(format!("{}\n", self.preceding_comment))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(kind: DeclarationKind, signature: &str, lines: &[&str]) -> Declaration {
        let mut builder = DeclarationBuilder::new("CG.Foo", kind, signature, "    }", true);
        for line in lines {
            builder.push_line(line);
        }
        builder.finish("")
    }

    #[test]
    fn test_qualified_name_is_namespace_dot_short_name() {
        for kind in DeclarationKind::ALL {
            let decl = finished(kind, "Thing: number", &[]);
            assert_eq!(
                decl.qualified_name(),
                format!("{}.{}", decl.namespace(), decl.short_name())
            );
            assert!(!decl.short_name().is_empty());
        }
    }

    #[test]
    fn test_id_for_standalone_and_other_kinds() {
        let class = finished(DeclarationKind::Class, "Bar", &[]);
        assert_eq!(class.id(), "CG.Foo");
        assert_eq!(class.title(), "Foo");

        let constant = finished(DeclarationKind::Const, "LIMIT: number", &[]);
        assert_eq!(constant.id(), "CG.Foo.LIMIT");
        assert_eq!(constant.title(), "Foo.LIMIT");

        let ordered = constant.with_ordinal(3);
        assert_eq!(ordered.id(), "zzz3_CG.Foo.LIMIT");
    }

    #[test]
    fn test_push_line_indents_source() {
        let decl = finished(DeclarationKind::Enum, "Color", &["    export declare enum Color {", "    }"]);
        assert_eq!(
            decl.source(),
            "        export declare enum Color {\n        }\n"
        );
    }

    #[test]
    fn test_multi_line_function_waits_for_balanced_parens() {
        let mut builder =
            DeclarationBuilder::new("CG.Foo", DeclarationKind::Function, "wait(", "    }", false);
        builder.push_line("    export declare function wait(");
        builder.push_line("        cb: (err: Error) => void;");
        assert!(!builder.is_single_line());

        builder.push_line("    ): void;");
        assert!(builder.is_single_line());

        let decl = builder.finish("");
        assert_eq!(decl.short_name(), "wait");
        assert_eq!(decl.raw_signature(), "wait(cb: (err: Error) => void;): void");
    }

    #[test]
    fn test_autocomplete_label_and_detail() {
        let generic = finished(DeclarationKind::Interface, "IList<T>", &[]);
        assert_eq!(generic.autocomplete_label(), "IList<T>");
        assert_eq!(generic.detail(), "(interface) CG.Foo.IList");

        let plain = finished(DeclarationKind::Var, "count: number", &[]);
        assert_eq!(plain.autocomplete_label(), "count");
        assert_eq!(plain.insert_text(), "count");
    }

    #[test]
    fn test_re_export_insert_text_is_qualified() {
        let decl = finished(DeclarationKind::ReExport, "Baz", &[]);
        assert_eq!(decl.insert_text(), "CG.Foo.Baz");
    }

    #[test]
    fn test_standalone_file_content() {
        let mut builder =
            DeclarationBuilder::new("CG.Foo", DeclarationKind::Class, "Bar", "    }", false);
        builder.push_line("    export declare class Bar {");
        builder.push_line("    }");
        let decl = builder.finish("\n    /** A bar. */");

        assert_eq!(
            decl.file_content(std::iter::empty()),
            "\n    /** A bar. */\nnamespace CG.Foo {\n\n        export declare class Bar {\n        }\n\n\n}"
        );
        assert_eq!(decl.line_number(std::iter::empty()), 0);
    }

    #[test]
    fn test_shared_file_content_and_line_number() {
        let first = finished(
            DeclarationKind::Const,
            "A: number",
            &["    export declare const A: number;"],
        );
        let second = finished(
            DeclarationKind::Var,
            "b: string",
            &["    export declare var b: string;"],
        );
        let class = finished(DeclarationKind::Class, "Skipped", &["    export declare class Skipped {"]);
        let siblings = [first.clone(), second.clone(), class];

        let content = second.file_content(&siblings);
        assert_eq!(
            content,
            "namespace CG.Foo {\n\n\n        export declare const A: number;\n\n        export declare var b: string;\n\n\n}"
        );
        assert_eq!(first.line_number(&siblings), 4);
        assert_eq!(second.line_number(&siblings), 6);
    }

    #[test]
    fn test_display_markup_is_cached() {
        let decl = finished(DeclarationKind::Class, "Bar<T>", &[]);
        let first = decl.display_markup();
        let second = decl.display_markup();
        assert!(std::ptr::eq(first, second));
        assert!(first.contains("genericType"));
    }
}
