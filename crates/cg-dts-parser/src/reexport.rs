//! Grouped `export { ... }` detection over the raw file text.

use std::sync::LazyLock;

use cg_core::{Declaration, DeclarationBuilder, DeclarationKind};
use regex::Regex;
use smallvec::SmallVec;

#[allow(clippy::expect_used)]
static NAMESPACE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"namespace\s+([\w.]+)\s+\{").expect("namespace pattern is valid")
});

#[allow(clippy::expect_used)]
static EXPORT_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+\{([\s\S]+?)\}").expect("export group pattern is valid")
});

#[allow(clippy::expect_used)]
static EXPORT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\s+as\s+(\w+))?$").expect("export entry pattern is valid")
});

/// One `name` or `name as alias` entry of a group.
struct Entry<'t> {
    text: &'t str,
    exported: &'t str,
}

/// Finds every re-export group in `text` and returns one
/// [`DeclarationKind::ReExport`] declaration per entry.
///
/// Groups that do not follow any namespace opening are ignored.
pub(crate) fn parse_reexports(text: &str) -> Vec<Declaration> {
    let namespaces: Vec<(usize, &str)> = NAMESPACE_OPEN
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .collect();

    let mut declarations = Vec::new();
    for group in EXPORT_GROUP.captures_iter(text) {
        let (Some(whole), Some(list)) = (group.get(0), group.get(1)) else {
            continue;
        };
        let Some(namespace) = owning_namespace(&namespaces, whole.start()) else {
            continue;
        };

        let entries: SmallVec<[Entry<'_>; 8]> = list
            .as_str()
            .split(',')
            .map(str::trim)
            .filter_map(|text| {
                let caps = EXPORT_ENTRY.captures(text)?;
                let exported = caps.get(2).or_else(|| caps.get(1))?.as_str();
                Some(Entry { text, exported })
            })
            .collect();

        render_group(namespace, &entries, &mut declarations);
    }
    declarations
}

/// Nearest namespace opened before `offset`.
fn owning_namespace<'t>(namespaces: &[(usize, &'t str)], offset: usize) -> Option<&'t str> {
    namespaces
        .iter()
        .rev()
        .find(|(start, _)| *start < offset)
        .map(|(_, name)| *name)
}

fn render_group(namespace: &str, entries: &[Entry<'_>], out: &mut Vec<Declaration>) {
    let builder = |entry: &Entry<'_>| {
        DeclarationBuilder::new(namespace, DeclarationKind::ReExport, entry.exported, "", true)
    };

    match entries {
        [] => {}
        [only] => {
            let source = format!("    export {{ {} }}", only.text);
            out.push(builder(only).with_source(source).finish(""));
        }
        _ => {
            let last = entries.len() - 1;
            for (index, entry) in entries.iter().enumerate() {
                let mut source = String::new();
                if index == 0 {
                    source.push_str("    export {\n");
                }
                source.push_str("        ");
                source.push_str(entry.text);
                source.push(',');
                if index == last {
                    source.push_str("\n    }");
                }
                out.push(
                    builder(entry)
                        .with_source(source)
                        .finish("")
                        .with_ordinal(index),
                );
            }
        }
    }
}
