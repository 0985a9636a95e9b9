//! Import statement placement.
//!
//! Imports take the form `import <short> = <qualified>;`. A new one goes
//! directly after the leading run of import statements of a document, or at
//! the very top (followed by a blank line) when the document has none.

use std::sync::LazyLock;

use cg_core::{Declaration, Position};
use regex::Regex;
use serde::Serialize;

#[allow(clippy::expect_used)]
static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^import\s.+\s(from|=)\s.+").expect("import statement pattern is valid")
});

/// Text to insert into a document, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdit {
    /// Insertion point; always at the start of a line.
    pub position: Position,
    /// The import statement, newline terminated.
    pub text: String,
}

/// The import statement for `declaration`, without a line break.
///
/// ```
/// let decl = cg_dts_parser::parse("namespace CG.Core {\n    export declare var x: number;\n}").remove(0);
/// assert_eq!(cg_catalog::import_statement(&decl), "import x = CG.Core.x;");
/// ```
#[must_use]
pub fn import_statement(declaration: &Declaration) -> String {
    format!(
        "import {} = {};",
        declaration.short_name(),
        declaration.qualified_name()
    )
}

/// Computes where the import for `declaration` belongs in `document`.
///
/// Returns `None` when a matching import already exists anywhere in the
/// document. Otherwise the edit is placed after the last import of the
/// leading run of imports; blank lines inside that run are allowed.
#[must_use]
pub fn resolve_import_insertion_point(
    document: &str,
    declaration: &Declaration,
) -> Option<ImportEdit> {
    let existing = existing_import_pattern(declaration);

    let mut insert_line = 0;
    let mut past_imports = false;
    for (index, line) in document.split('\n').map(str::trim).enumerate() {
        let is_import = IMPORT_STATEMENT.is_match(line);
        if is_import && existing.as_ref().is_some_and(|re| re.is_match(line)) {
            return None;
        }
        if !line.is_empty() && !is_import {
            past_imports = true;
        } else if is_import && !past_imports {
            insert_line = index + 1;
        }
    }

    let mut text = import_statement(declaration);
    text.push('\n');
    if insert_line == 0 {
        text.push('\n');
    }

    Some(ImportEdit {
        position: Position::new(u32::try_from(insert_line).unwrap_or(u32::MAX), 0),
        text,
    })
}

/// Matches an existing import of exactly this declaration.
fn existing_import_pattern(declaration: &Declaration) -> Option<Regex> {
    Regex::new(&format!(
        r"^import\s+{}\s*=\s*{}\s*(;)?$",
        regex::escape(declaration.short_name()),
        regex::escape(declaration.qualified_name()),
    ))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol_c() -> Declaration {
        cg_dts_parser::parse("namespace CG {\n    export declare const C: number;\n}").remove(0)
    }

    #[test]
    fn test_insert_after_leading_imports() {
        let document = "import A = CG.A;\nimport B = CG.B;\nlet x = new A();\n";
        let edit = resolve_import_insertion_point(document, &symbol_c()).unwrap();
        assert_eq!(edit.position, Position::new(2, 0));
        assert_eq!(edit.text, "import C = CG.C;\n");
    }

    #[test]
    fn test_insert_at_top_without_imports() {
        let document = "let x = 1;\n";
        let edit = resolve_import_insertion_point(document, &symbol_c()).unwrap();
        assert_eq!(edit.position, Position::new(0, 0));
        assert_eq!(edit.text, "import C = CG.C;\n\n");
    }

    #[test]
    fn test_already_imported() {
        let document = "import A = CG.A;\n  import C = CG.C;\nC.toString();\n";
        assert!(resolve_import_insertion_point(document, &symbol_c()).is_none());

        let without_semicolon = "import C = CG.C\n";
        assert!(resolve_import_insertion_point(without_semicolon, &symbol_c()).is_none());
    }

    #[test]
    fn test_imports_after_code_do_not_move_the_point() {
        let document = "import A = CG.A;\n\nconst a = 1;\nimport B = CG.B;\n";
        let edit = resolve_import_insertion_point(document, &symbol_c()).unwrap();
        assert_eq!(edit.position.line, 1);
    }

    #[test]
    fn test_module_imports_count_as_imports() {
        let document = "import { thing } from './thing';\nthing();\n";
        let edit = resolve_import_insertion_point(document, &symbol_c()).unwrap();
        assert_eq!(edit.position.line, 1);
    }

    #[test]
    fn test_similar_names_are_not_treated_as_imported() {
        let document = "import Cx = CG.Cx;\n";
        let edit = resolve_import_insertion_point(document, &symbol_c()).unwrap();
        assert_eq!(edit.position.line, 1);
    }

    #[test]
    fn test_empty_document() {
        let edit = resolve_import_insertion_point("", &symbol_c()).unwrap();
        assert_eq!(edit.position.line, 0);
        assert!(edit.text.ends_with("\n\n"));
    }
}
