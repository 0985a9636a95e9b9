//! Completion and import advisor.
//!
//! [`ImportAdvisor`] owns the [`SymbolCatalog`], keeps it populated from a
//! [`DeclarationSource`], and answers the two editor questions: which
//! symbols complete a prefix, and how to fix an unresolved identifier.
//!
//! # Refreshing
//!
//! ```text
//! DeclarationSource::discover()
//!     │
//!     ├── already ingested ──► skipped
//!     │
//!     └── read + parse (rayon) ──► SymbolCatalog::ingest
//! ```
//!
//! A file that fails to read is reported and left un-ingested, so the next
//! refresh retries it.

use std::sync::Arc;

use cg_core::{AdvisorConfig, Declaration, DeclarationKind, FileKey, Position, TextRange};
use cg_dts_parser::DtsParser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::SymbolCatalog;
use crate::error::CatalogError;
use crate::import::{resolve_import_insertion_point, ImportEdit};
use crate::source::DeclarationSource;
use crate::stats::{RefreshStats, StatsSnapshot};

/// Editor completion item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// A class.
    Class,
    /// A constant.
    Constant,
    /// A function.
    Function,
    /// An interface.
    Interface,
    /// An enum.
    Enum,
    /// Anything else (variables, re-exports).
    Value,
}

impl From<DeclarationKind> for CompletionKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Class => Self::Class,
            DeclarationKind::Const => Self::Constant,
            DeclarationKind::Function => Self::Function,
            DeclarationKind::Interface => Self::Interface,
            DeclarationKind::Enum => Self::Enum,
            DeclarationKind::Var | DeclarationKind::ReExport => Self::Value,
        }
    }
}

/// One completion item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionProposal {
    /// Short name, with `<T>` for generic declarations.
    pub label: String,
    /// `(<kind>) <qualified name>`.
    pub detail: String,
    /// Text inserted on accept.
    pub insert_text: String,
    /// Key the editor sorts by.
    pub sort_text: String,
    /// The qualified name.
    pub documentation: String,
    /// Item kind.
    pub kind: CompletionKind,
    /// Import to add alongside the completion, when one is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_edit: Option<ImportEdit>,
}

/// A diagnostic reported by the language service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Range the diagnostic covers.
    pub range: TextRange,
    /// Numeric diagnostic code.
    pub code: u32,
    /// Reporter, `ts` for the TypeScript service.
    pub source: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(range: TextRange, code: u32, source: impl Into<String>) -> Self {
        Self {
            range,
            code,
            source: source.into(),
        }
    }
}

/// A quick fix adding a missing import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFix {
    /// Title shown in the editor.
    pub title: String,
    /// The import to insert.
    pub edit: ImportEdit,
    /// Whether the editor should prefer this fix.
    pub is_preferred: bool,
    /// The diagnostic the fix resolves.
    pub diagnostic: Diagnostic,
}

/// Outcome of [`ImportAdvisor::refresh`].
#[derive(Debug)]
pub struct RefreshReport {
    /// Counters for this refresh.
    pub stats: StatsSnapshot,
    /// Files that could not be read.
    pub errors: Vec<(FileKey, CatalogError)>,
}

/// Progress of [`ImportAdvisor::refresh_streaming`].
#[derive(Debug)]
pub enum RefreshUpdate {
    /// Number of declaration files the source reported. Sent first.
    FilesDiscovered(usize),
    /// A file was parsed and added to the catalogue.
    FileIngested {
        /// The file.
        file: FileKey,
        /// Declarations added from it.
        declarations: usize,
    },
    /// A file could not be read.
    FileError {
        /// The file.
        file: FileKey,
        /// Why it failed.
        error: CatalogError,
    },
    /// All files processed. Sent last.
    Complete(StatsSnapshot),
}

/// Completion and code-fix provider backed by a [`SymbolCatalog`].
///
/// Clones share the catalogue and statistics, so a clone can refresh on a
/// blocking thread while another serves queries.
///
/// # Examples
///
/// ```
/// use cg_catalog::{ImportAdvisor, MemorySource};
///
/// let source = MemorySource::new();
/// source.insert(
///     "typings/app_modules.core.d.ts",
///     "namespace CG.Core {\n    export declare function render(target: string): void;\n}\n",
/// );
///
/// let advisor = ImportAdvisor::new();
/// advisor.refresh(&source)?;
///
/// let proposals = advisor.completions("ren", Some("render"));
/// assert_eq!(proposals[0].insert_text, "CG.Core.render(target)");
/// assert_eq!(proposals[0].additional_edit.as_ref().map(|e| e.text.as_str()),
///     Some("import render = CG.Core.render;\n\n"));
/// # Ok::<(), cg_catalog::CatalogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ImportAdvisor {
    catalog: Arc<SymbolCatalog>,
    stats: Arc<RefreshStats>,
    config: AdvisorConfig,
    parser: DtsParser,
}

impl Default for ImportAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportAdvisor {
    /// Creates an advisor with default settings and an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AdvisorConfig::default())
    }

    /// Creates an advisor with the given settings.
    #[must_use]
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self {
            catalog: Arc::new(SymbolCatalog::new()),
            stats: Arc::new(RefreshStats::new()),
            config,
            parser: DtsParser::new(),
        }
    }

    /// Ingests every declaration file of `source` not yet in the catalogue.
    ///
    /// Files are read and parsed in parallel, then ingested in key order.
    ///
    /// # Errors
    ///
    /// Returns an error only if discovery fails. Per-file read failures are
    /// collected into the report.
    pub fn refresh(&self, source: &dyn DeclarationSource) -> Result<RefreshReport, CatalogError> {
        info!("Starting catalogue refresh");
        self.stats.reset();

        let pending = self.pending_files(source)?;
        let parser = self.parser;
        let parsed: Vec<(FileKey, Result<Vec<Declaration>, CatalogError>)> = pending
            .into_par_iter()
            .map(|file| {
                let result = source.read(&file).map(|text| parser.parse(&text));
                (file, result)
            })
            .collect();

        let mut errors = Vec::new();
        for (file, result) in parsed {
            match result {
                Ok(declarations) => {
                    if let Some(added) = self.catalog.ingest(&file, declarations) {
                        self.stats.record_ingested(added as u64);
                        debug!(file = %file, declarations = added, "Ingested file");
                    } else {
                        self.stats.increment_skipped();
                    }
                }
                Err(e) => {
                    self.stats.increment_errors();
                    warn!(file = %file, error = %e, "Failed to read declaration file");
                    errors.push((file, e));
                }
            }
        }

        let stats = self.stats.snapshot();
        info!(
            discovered = stats.discovered,
            ingested = stats.ingested,
            skipped = stats.skipped,
            declarations = stats.declarations,
            errors = stats.errors,
            "Catalogue refresh completed"
        );
        Ok(RefreshReport { stats, errors })
    }

    /// Like [`refresh`](Self::refresh), reporting progress over `tx`.
    ///
    /// Sends [`RefreshUpdate::FilesDiscovered`] first, one ingested or error
    /// update per pending file, and [`RefreshUpdate::Complete`] last. If the
    /// receiver is dropped the refresh stops early and still returns `Ok`.
    ///
    /// Blocks; run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns an error only if discovery fails.
    #[allow(clippy::needless_pass_by_value)] // Sender is cloned per rayon worker
    pub fn refresh_streaming(
        &self,
        source: &dyn DeclarationSource,
        tx: mpsc::Sender<RefreshUpdate>,
    ) -> Result<(), CatalogError> {
        info!("Starting streaming catalogue refresh");
        self.stats.reset();

        let pending = self.pending_files(source)?;
        let discovered = usize::try_from(self.stats.snapshot().discovered).unwrap_or(usize::MAX);
        if tx
            .blocking_send(RefreshUpdate::FilesDiscovered(discovered))
            .is_err()
        {
            return Ok(());
        }

        let parser = self.parser;
        pending.par_iter().for_each_init(
            || tx.clone(),
            |sender, file| {
                let update = match source.read(file) {
                    Ok(text) => {
                        let Some(added) = self.catalog.ingest(file, parser.parse(&text)) else {
                            self.stats.increment_skipped();
                            return;
                        };
                        self.stats.record_ingested(added as u64);
                        RefreshUpdate::FileIngested {
                            file: file.clone(),
                            declarations: added,
                        }
                    }
                    Err(e) => {
                        self.stats.increment_errors();
                        warn!(file = %file, error = %e, "Failed to read declaration file");
                        RefreshUpdate::FileError {
                            file: file.clone(),
                            error: e,
                        }
                    }
                };
                let _ = sender.blocking_send(update);
            },
        );

        let stats = self.stats.snapshot();
        info!(
            ingested = stats.ingested,
            declarations = stats.declarations,
            errors = stats.errors,
            "Streaming catalogue refresh completed"
        );
        let _ = tx.blocking_send(RefreshUpdate::Complete(stats));
        Ok(())
    }

    /// Completion proposals for symbols whose short name starts with `prefix`.
    ///
    /// With a `document`, each proposal carries the import edit it needs,
    /// if any.
    #[must_use]
    pub fn completions(&self, prefix: &str, document: Option<&str>) -> Vec<CompletionProposal> {
        self.catalog
            .suggest(prefix)
            .iter()
            .map(|decl| self.proposal(decl, document))
            .collect()
    }

    /// Completion proposals for the identifier at `position` in `document`.
    ///
    /// The whole word around the cursor is the prefix. Nothing is proposed
    /// for a member access (word preceded by `.`).
    #[must_use]
    pub fn completions_at(&self, document: &str, position: Position) -> Vec<CompletionProposal> {
        let Some(line) = line_at(document, position.line) else {
            return Vec::new();
        };
        let chars: Vec<char> = line.chars().collect();
        let cursor = (position.character as usize).min(chars.len());

        let mut start = cursor;
        while start > 0 && is_word_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = cursor;
        while end < chars.len() && is_word_char(chars[end]) {
            end += 1;
        }

        if start > 0 && chars[start - 1] == '.' {
            debug!(line = position.line, "Member access, no completions");
            return Vec::new();
        }

        let word: String = chars[start..end].iter().collect();
        self.completions(&word, Some(document))
    }

    /// Import fixes for an unresolved identifier covering `range`.
    ///
    /// A fix is offered when the range spans one line, its text is exactly
    /// some symbol's short name not touching another identifier character,
    /// and `diagnostics` holds an unresolved-identifier diagnostic at that
    /// exact range.
    #[must_use]
    pub fn code_fixes(
        &self,
        document: &str,
        range: TextRange,
        diagnostics: &[Diagnostic],
    ) -> Vec<CodeFix> {
        if !range.is_single_line() || range.is_empty() {
            return Vec::new();
        }
        let Some(line) = line_at(document, range.start.line) else {
            return Vec::new();
        };
        let chars: Vec<char> = line.chars().collect();
        let (start, end) = (range.start.character as usize, range.end.character as usize);
        if end > chars.len() {
            return Vec::new();
        }

        let before = start.checked_sub(1).and_then(|at| chars.get(at));
        let after = chars.get(end);
        if [before, after]
            .into_iter()
            .flatten()
            .any(|c| is_name_continuation(*c))
        {
            return Vec::new();
        }

        let name: String = chars[start..end].iter().collect();
        let Some(decl) = self.catalog.find_by_short_name(&name) else {
            return Vec::new();
        };
        let Some(diagnostic) = diagnostics.iter().find(|d| {
            self.config.is_unresolved_code(d.code)
                && d.source == self.config.diagnostic_source
                && d.range == range
        }) else {
            return Vec::new();
        };
        let Some(edit) = resolve_import_insertion_point(document, &decl) else {
            return Vec::new();
        };

        debug!(symbol = %decl.qualified_name(), "Offering import fix");
        vec![CodeFix {
            title: self.config.fix_title.clone(),
            edit,
            is_preferred: true,
            diagnostic: diagnostic.clone(),
        }]
    }

    /// The import edit `document` needs for the symbol named `name`.
    ///
    /// `None` when no symbol has that short name or it is already imported.
    #[must_use]
    pub fn import_edit_for(&self, document: &str, name: &str) -> Option<ImportEdit> {
        let decl = self.catalog.find_by_short_name(name)?;
        resolve_import_insertion_point(document, &decl)
    }

    /// The shared catalogue.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// Counters of the latest refresh.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Advisor settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Empties the catalogue so the next refresh ingests everything again.
    pub fn reset(&self) {
        self.catalog.reset();
        self.stats.reset();
    }

    /// Discovers files and filters out the ingested ones.
    fn pending_files(&self, source: &dyn DeclarationSource) -> Result<Vec<FileKey>, CatalogError> {
        let files = source.discover()?;
        self.stats.add_discovered(files.len() as u64);
        info!(count = files.len(), "Discovered declaration files");

        let (pending, ingested): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| !self.catalog.contains_file(file));
        self.stats.add_skipped(ingested.len() as u64);
        Ok(pending)
    }

    fn proposal(&self, decl: &Declaration, document: Option<&str>) -> CompletionProposal {
        let label = decl.autocomplete_label().into_owned();
        CompletionProposal {
            sort_text: format!("{}{label}", self.config.sort_prefix),
            detail: decl.detail(),
            insert_text: decl.insert_text().into_owned(),
            documentation: decl.qualified_name().to_owned(),
            kind: decl.kind().into(),
            additional_edit: document.and_then(|doc| resolve_import_insertion_point(doc, decl)),
            label,
        }
    }
}

fn line_at(document: &str, line: u32) -> Option<&str> {
    document
        .split('\n')
        .nth(line as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_name_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    const CORE: &str = "\
namespace CG.Core {
    export declare class Widget<T> extends Base {
    }
    export declare const VERSION: string;
    export declare function render(target: string, depth: number): void;
}
";

    const UI: &str = "\
namespace CG.Ui {
    export declare var theme: string;
    export interface IView {
    }
}
";

    fn source() -> MemorySource {
        let source = MemorySource::new();
        source.insert("typings/app_modules.core.d.ts", CORE);
        source.insert("typings/app_modules.ui.d.ts", UI);
        source
    }

    fn advisor() -> ImportAdvisor {
        let advisor = ImportAdvisor::new();
        advisor.refresh(&source()).unwrap();
        advisor
    }

    fn unresolved(line: u32, start: u32, end: u32) -> Diagnostic {
        Diagnostic::new(TextRange::on_line(line, start, end), 2304, "ts")
    }

    #[test]
    fn test_refresh_ingests_each_file_once() {
        let advisor = ImportAdvisor::new();
        let source = source();

        let report = advisor.refresh(&source).unwrap();
        assert_eq!(report.stats.discovered, 2);
        assert_eq!(report.stats.ingested, 2);
        assert_eq!(report.stats.declarations, 5);
        assert!(report.errors.is_empty());

        let again = advisor.refresh(&source).unwrap();
        assert_eq!(again.stats.ingested, 0);
        assert_eq!(again.stats.skipped, 2);
        assert_eq!(advisor.catalog().len(), 5);
    }

    #[test]
    fn test_refresh_picks_up_new_files() {
        let advisor = ImportAdvisor::new();
        let source = source();
        advisor.refresh(&source).unwrap();

        source.insert(
            "typings/app_modules.extra.d.ts",
            "namespace CG.Extra {\n    export declare const EXTRA: number;\n}\n",
        );
        let report = advisor.refresh(&source).unwrap();
        assert_eq!(report.stats.ingested, 1);
        assert!(advisor.catalog().find_by_short_name("EXTRA").is_some());
    }

    #[test]
    fn test_declaration_count_matches_catalogue() {
        let source = source();
        source.insert(
            "typings/app_modules.events.d.ts",
            "namespace CG.Events {\n    export declare function on(name: string): void;\n    export declare function on(name: string, cb: (e: Event) => void): void;\n}\n",
        );
        let advisor = ImportAdvisor::new();
        let report = advisor.refresh(&source).unwrap();

        assert_eq!(report.stats.declarations, 7);
        assert_eq!(advisor.catalog().len(), 7);

        let inserts: Vec<String> = advisor
            .completions("on", None)
            .into_iter()
            .map(|proposal| proposal.insert_text)
            .collect();
        assert_eq!(inserts, vec!["CG.Events.on(name)", "CG.Events.on(name,cb)"]);
    }

    #[test]
    fn test_proposal_fields() {
        let advisor = advisor();
        let proposals = advisor.completions("Wid", None);
        assert_eq!(proposals.len(), 1);

        let widget = &proposals[0];
        assert_eq!(widget.label, "Widget<T>");
        assert_eq!(widget.detail, "(class) CG.Core.Widget");
        assert_eq!(widget.insert_text, "Widget");
        assert_eq!(widget.sort_text, "_Widget<T>");
        assert_eq!(widget.documentation, "CG.Core.Widget");
        assert_eq!(widget.kind, CompletionKind::Class);
        assert!(widget.additional_edit.is_none());

        let render = &advisor.completions("render", None)[0];
        assert_eq!(render.insert_text, "CG.Core.render(target,depth)");
        assert_eq!(render.kind, CompletionKind::Function);
    }

    #[test]
    fn test_completion_kinds() {
        assert_eq!(CompletionKind::from(DeclarationKind::Const), CompletionKind::Constant);
        assert_eq!(CompletionKind::from(DeclarationKind::Var), CompletionKind::Value);
        assert_eq!(CompletionKind::from(DeclarationKind::ReExport), CompletionKind::Value);
        assert_eq!(CompletionKind::from(DeclarationKind::Interface), CompletionKind::Interface);
    }

    #[test]
    fn test_completions_carry_import_edit() {
        let advisor = advisor();
        let document = "import VERSION = CG.Core.VERSION;\nconsole.log(the);\n";

        let theme = &advisor.completions("the", Some(document))[0];
        let edit = theme.additional_edit.as_ref().unwrap();
        assert_eq!(edit.position, Position::new(1, 0));
        assert_eq!(edit.text, "import theme = CG.Ui.theme;\n");

        let version = &advisor.completions("VERSION", Some(document))[0];
        assert!(version.additional_edit.is_none());
    }

    #[test]
    fn test_completions_at_cursor() {
        let advisor = advisor();
        let document = "let a = the\nlet b = x.the\n";

        let proposals = advisor.completions_at(document, Position::new(0, 11));
        let labels: Vec<&str> = proposals.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["theme"]);

        assert!(advisor.completions_at(document, Position::new(1, 13)).is_empty());
        assert!(advisor.completions_at(document, Position::new(9, 0)).is_empty());
    }

    #[test]
    fn test_completions_at_uses_whole_word() {
        let advisor = advisor();
        let proposals = advisor.completions_at("rend(", Position::new(0, 2));
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].label, "render");
    }

    #[test]
    fn test_code_fix_for_unresolved_identifier() {
        let advisor = advisor();
        let document = "import IView = CG.Ui.IView;\n\nlet v = VERSION;\n";
        let range = TextRange::on_line(2, 8, 15);

        let fixes = advisor.code_fixes(document, range, &[unresolved(2, 8, 15)]);
        assert_eq!(fixes.len(), 1);
        let fix = &fixes[0];
        assert_eq!(fix.title, "Auto Import");
        assert!(fix.is_preferred);
        assert_eq!(fix.edit.position, Position::new(1, 0));
        assert_eq!(fix.edit.text, "import VERSION = CG.Core.VERSION;\n");
        assert_eq!(fix.diagnostic.code, 2304);
        insta::assert_json_snapshot!(fix, @r#"
        {
          "title": "Auto Import",
          "edit": {
            "position": {
              "line": 1,
              "character": 0
            },
            "text": "import VERSION = CG.Core.VERSION;\n"
          },
          "is_preferred": true,
          "diagnostic": {
            "range": {
              "start": {
                "line": 2,
                "character": 8
              },
              "end": {
                "line": 2,
                "character": 15
              }
            },
            "code": 2304,
            "source": "ts"
          }
        }
        "#);
    }

    #[test]
    fn test_code_fix_requires_matching_diagnostic() {
        let advisor = advisor();
        let document = "let v = VERSION;\n";
        let range = TextRange::on_line(0, 8, 15);

        assert!(advisor.code_fixes(document, range, &[]).is_empty());
        let wrong_code = Diagnostic::new(range, 2339, "ts");
        assert!(advisor.code_fixes(document, range, &[wrong_code]).is_empty());
        let wrong_source = Diagnostic::new(range, 2552, "eslint");
        assert!(advisor.code_fixes(document, range, &[wrong_source]).is_empty());
        let other_range = unresolved(0, 4, 5);
        assert!(advisor.code_fixes(document, range, &[other_range]).is_empty());

        let did_you_mean = Diagnostic::new(range, 2552, "ts");
        assert_eq!(advisor.code_fixes(document, range, &[did_you_mean]).len(), 1);
    }

    #[test]
    fn test_code_fix_rejects_partial_identifiers() {
        let advisor = advisor();

        let member = "let v = x.VERSION;\n";
        let range = TextRange::on_line(0, 10, 17);
        assert!(advisor.code_fixes(member, range, &[unresolved(0, 10, 17)]).is_empty());

        let longer = "let v = VERSIONS;\n";
        let range = TextRange::on_line(0, 8, 15);
        assert!(advisor.code_fixes(longer, range, &[unresolved(0, 8, 15)]).is_empty());

        let unknown = "let v = Missing;\n";
        assert!(advisor.code_fixes(unknown, range, &[unresolved(0, 8, 15)]).is_empty());
    }

    #[test]
    fn test_code_fix_skips_imported_symbols() {
        let advisor = advisor();
        let document = "import VERSION = CG.Core.VERSION;\nlet v = VERSION;\n";
        let range = TextRange::on_line(1, 8, 15);
        assert!(advisor.code_fixes(document, range, &[unresolved(1, 8, 15)]).is_empty());
    }

    #[test]
    fn test_code_fix_rejects_multi_line_range() {
        let advisor = advisor();
        let range = TextRange::new(Position::new(0, 8), Position::new(1, 2));
        let diagnostic = Diagnostic::new(range, 2304, "ts");
        assert!(advisor.code_fixes("let v = VERSION;\nx\n", range, &[diagnostic]).is_empty());
    }

    #[test]
    fn test_import_edit_for() {
        let advisor = advisor();
        let edit = advisor.import_edit_for("", "IView").unwrap();
        assert_eq!(edit.text, "import IView = CG.Ui.IView;\n\n");
        assert!(advisor.import_edit_for("", "Nothing").is_none());
    }

    #[test]
    fn test_read_errors_are_reported_and_retried() {
        struct Flaky;

        impl DeclarationSource for Flaky {
            fn discover(&self) -> Result<Vec<FileKey>, CatalogError> {
                Ok(vec![FileKey::new("typings/broken_modules.x.d.ts")])
            }

            fn read(&self, file: &FileKey) -> Result<String, CatalogError> {
                Err(CatalogError::read(
                    file.as_str(),
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                ))
            }
        }

        let advisor = ImportAdvisor::new();
        let report = advisor.refresh(&Flaky).unwrap();
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].1.is_recoverable());
        assert!(!advisor.catalog().contains_file(&FileKey::new("typings/broken_modules.x.d.ts")));

        let again = advisor.refresh(&Flaky).unwrap();
        assert_eq!(again.stats.errors, 1);
    }

    #[test]
    fn test_reset_forgets_catalogue() {
        let advisor = advisor();
        advisor.reset();
        assert!(advisor.catalog().is_empty());
        assert_eq!(advisor.stats(), StatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_refresh_streaming() {
        let advisor = ImportAdvisor::new();
        let source: Arc<dyn DeclarationSource> = Arc::new(source());
        let (tx, mut rx) = mpsc::channel(16);

        let worker = advisor.clone();
        let handle =
            tokio::task::spawn_blocking(move || worker.refresh_streaming(source.as_ref(), tx));

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }
        handle.await.unwrap().unwrap();

        assert!(matches!(updates.first(), Some(RefreshUpdate::FilesDiscovered(2))));
        let ingested: usize = updates
            .iter()
            .filter_map(|update| match update {
                RefreshUpdate::FileIngested { declarations, .. } => Some(*declarations),
                _ => None,
            })
            .sum();
        assert_eq!(ingested, 5);
        assert!(matches!(
            updates.last(),
            Some(RefreshUpdate::Complete(stats)) if stats.ingested == 2
        ));
        assert_eq!(advisor.catalog().len(), 5);
    }

    #[test]
    fn test_proposals_serialize() {
        let advisor = advisor();
        let proposal = &advisor.completions("VERSION", None)[0];
        let json = serde_json::to_value(proposal).unwrap();
        assert_eq!(json["kind"], "constant");
        assert_eq!(json["detail"], "(const) CG.Core.VERSION");
        assert!(json.get("additional_edit").is_none());
    }
}
