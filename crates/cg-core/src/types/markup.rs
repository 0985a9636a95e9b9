//! Text derivations over declaration signatures.
//!
//! Everything here is a pure function of a [`DeclarationKind`] and a
//! signature string, so results can be computed lazily and cached on the
//! finished [`Declaration`](super::Declaration).

use std::sync::LazyLock;

use regex::Regex;

use super::kind::DeclarationKind;

/// Opening bracket of a synthetic highlighting tag, before escaping.
const TAG_OPEN: char = '\u{E000}';

/// Closing bracket of a synthetic highlighting tag, before escaping.
const TAG_CLOSE: char = '\u{E001}';

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("invalid pattern ", $re)));
    };
}

pattern!(CLASS_NAME, r"([^<>\s]+)(<[^<>]+>)?(\s+extends\s+[^{]+)?");
pattern!(FUNCTION_NAME, r"([^(]+)\(");
pattern!(VALUE_NAME, r"^([^:\s]+):");
pattern!(GENERIC_LIST, r"(<[^<>]*>)");
pattern!(EXTENDS_CLAUSE, r"(\sextends\s[^,:<>]+)");
pattern!(PARAMETER_LIST, r"(\(.*\))");
pattern!(WHITESPACE_RUN, r"\s+");

/// Derives `(short_name, has_generics)` from a raw signature.
///
/// Falls back to the trimmed signature when no kind-specific rule matches,
/// so the short name is only empty for an empty signature.
pub(crate) fn derive_short_name(kind: DeclarationKind, raw_signature: &str) -> (String, bool) {
    let derived = match kind {
        DeclarationKind::Class | DeclarationKind::Interface => {
            CLASS_NAME.captures(raw_signature).map(|caps| {
                let has_generics = caps.get(2).is_some();
                (caps[1].to_owned(), has_generics)
            })
        }
        DeclarationKind::Function => FUNCTION_NAME
            .captures(raw_signature)
            .map(|caps| (caps[1].trim().to_owned(), false)),
        DeclarationKind::Const | DeclarationKind::Var => VALUE_NAME
            .captures(raw_signature)
            .map(|caps| (caps[1].to_owned(), false)),
        DeclarationKind::Enum | DeclarationKind::ReExport => None,
    };

    match derived {
        Some((name, has_generics)) if !name.is_empty() => (name, has_generics),
        _ => (raw_signature.trim().to_owned(), false),
    }
}

/// Flattens an accumulated multi-line function source into a signature.
///
/// Line breaks and tabs are dropped, the text after `function ` is kept,
/// whitespace runs collapse to one space and the closing `;` is removed.
pub(crate) fn flatten_function_signature(source: &str) -> String {
    let flat: String = source
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let after_keyword = flat
        .find("function ")
        .map_or(flat.as_str(), |at| &flat[at + "function ".len()..]);
    let collapsed = WHITESPACE_RUN.replace_all(after_keyword.trim(), " ");
    let collapsed = collapsed.replace("( ", "(").replace(" )", ")");
    match collapsed.rfind(';') {
        Some(end) => collapsed[..end].trim_end().to_owned(),
        None => collapsed,
    }
}

/// Auto-insert text for a function: the qualified signature with every
/// parameter and return type annotation removed, e.g. `CG.Foo.doIt(x,y)`.
///
/// Parameters are split at commas outside any bracket pair, so callback,
/// union and object-literal types are dropped whole.
pub(crate) fn function_insert_text(qualified_signature: &str) -> String {
    let signature = qualified_signature.trim();
    let Some(open) = signature.find('(') else {
        return parameter_name(signature).to_owned();
    };
    let callee = signature[..open].trim_end();
    let rest = &signature[open + 1..];

    let mut end = rest.len();
    let mut bounds = Vec::new();
    for_each_top_level(rest, |index, c| match c {
        ')' => {
            end = index;
            false
        }
        ',' => {
            bounds.push(index);
            true
        }
        _ => true,
    });
    bounds.push(end);

    let mut from = 0;
    let names: Vec<&str> = bounds
        .into_iter()
        .map(|to| {
            let parameter = &rest[from..to];
            from = to + 1;
            parameter_name(parameter)
        })
        .filter(|name| !name.is_empty())
        .collect();
    format!("{callee}({})", names.join(","))
}

/// The part of `name?: Type` before its annotation, without the `?`.
fn parameter_name(parameter: &str) -> &str {
    let mut colon = parameter.len();
    for_each_top_level(parameter, |index, c| {
        if c == ':' {
            colon = index;
            false
        } else {
            true
        }
    });
    parameter[..colon].trim().trim_end_matches('?').trim_end()
}

/// Feeds every char of `text` outside all `()`, `<>`, `{}` and `[]` pairs to
/// `visit` until it returns `false`. An unmatched closer is visited too. The
/// `>` of an arrow is not a bracket.
fn for_each_top_level(text: &str, mut visit: impl FnMut(usize, char) -> bool) {
    let mut depth = 0usize;
    let mut previous = '\0';
    for (index, c) in text.char_indices() {
        let closer = matches!(c, ')' | '}' | ']') || (c == '>' && previous != '=');
        previous = c;
        if matches!(c, '(' | '<' | '{' | '[') {
            depth += 1;
        } else if closer && depth > 0 {
            depth -= 1;
        } else if depth == 0 && !visit(index, c) {
            return;
        }
    }
}

/// Builds the HTML-ish display form of a qualified signature.
///
/// Generic lists, `extends` clauses and parameter lists are wrapped in
/// highlighting spans, the signature's own angle brackets are escaped, and
/// every `:` annotation up to the next `,` (or `)`) becomes a `paramType` span.
pub(crate) fn display_markup(kind: DeclarationKind, qualified_signature: &str) -> String {
    let generic_span = format!(
        "{TAG_OPEN}span class=\"genericType\"{TAG_CLOSE}$1{TAG_OPEN}/span{TAG_CLOSE}"
    );
    let param_span =
        format!("{TAG_OPEN}span class=\"paramType\"{TAG_CLOSE}$1{TAG_OPEN}/span{TAG_CLOSE}");

    let tagged = match kind {
        DeclarationKind::Class | DeclarationKind::Interface => {
            let text = GENERIC_LIST.replace_all(qualified_signature, generic_span.as_str());
            EXTENDS_CLAUSE
                .replace_all(&text, param_span.as_str())
                .into_owned()
        }
        DeclarationKind::Function => PARAMETER_LIST
            .replace_all(qualified_signature, generic_span.as_str())
            .into_owned(),
        _ => qualified_signature.to_owned(),
    };

    let escaped = tagged
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace(TAG_OPEN, "<")
        .replace(TAG_CLOSE, ">");

    wrap_annotations(escaped)
}

fn wrap_annotations(mut markup: String) -> String {
    let mut index = 0;
    while let Some(offset) = markup[index..].find(':') {
        index += offset;
        let rest = &markup[index..];
        let end = rest.find(',').or_else(|| rest.find(')')).map(|e| index + e);
        let segment = match end {
            Some(end) => &markup[index..end],
            None => &markup[index..],
        };
        let replacement = format!("<span class=\"paramType\">{segment}</span>");
        let tail = end.map_or("", |end| &markup[end..]);
        markup = format!("{}{replacement}{tail}", &markup[..index]);

        if end.is_none() {
            break;
        }
        index += replacement.len();
    }
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_class_name_with_generics() {
        let (name, generics) = derive_short_name(DeclarationKind::Class, "Bar<T> extends Baz");
        assert_eq!(name, "Bar");
        assert!(generics);

        let (name, generics) = derive_short_name(DeclarationKind::Interface, "IPlain");
        assert_eq!(name, "IPlain");
        assert!(!generics);
    }

    #[test]
    fn test_derive_function_and_value_names() {
        let (name, _) = derive_short_name(DeclarationKind::Function, "doIt(x: number): void");
        assert_eq!(name, "doIt");

        let (name, _) = derive_short_name(DeclarationKind::Const, "VERSION: string");
        assert_eq!(name, "VERSION");
    }

    #[test]
    fn test_derive_falls_back_to_signature() {
        let (name, _) = derive_short_name(DeclarationKind::Enum, "Color");
        assert_eq!(name, "Color");

        let (name, _) = derive_short_name(DeclarationKind::Var, "loose");
        assert_eq!(name, "loose");
    }

    #[test]
    fn test_flatten_multi_line_function() {
        let source = "    export declare function doIt(\n        x: number,\n\t    y: string\n    ): void;\n";
        assert_eq!(
            flatten_function_signature(source),
            "doIt(x: number, y: string): void"
        );
    }

    #[test]
    fn test_function_insert_text_strips_annotations() {
        assert_eq!(
            function_insert_text("CG.Foo.doIt(x: number, y: string): void"),
            "CG.Foo.doIt(x,y)"
        );
        assert_eq!(
            function_insert_text("CG.Foo.load(id?: string, opts: Array<Option>): Promise<void>"),
            "CG.Foo.load(id,opts)"
        );
        assert_eq!(function_insert_text("CG.Foo.now(): Date"), "CG.Foo.now()");
    }

    #[test]
    fn test_function_insert_text_drops_compound_types() {
        assert_eq!(
            function_insert_text("CG.Foo.on(name: string, cb: (e: Event) => void): void"),
            "CG.Foo.on(name,cb)"
        );
        assert_eq!(
            function_insert_text("CG.Foo.pick(v: string | number, w: number): void"),
            "CG.Foo.pick(v,w)"
        );
        assert_eq!(
            function_insert_text("CG.Foo.opt(o: { a: number; b: Map<string, number> }): void"),
            "CG.Foo.opt(o)"
        );
        assert_eq!(
            function_insert_text("CG.Foo.all(...items: Array<[string, number]>): () => void"),
            "CG.Foo.all(...items)"
        );
    }

    #[test]
    fn test_display_markup_class() {
        insta::assert_snapshot!(
            display_markup(DeclarationKind::Class, "CG.Foo.Bar<T> extends Baz"),
            @r#"CG.Foo.Bar<span class="genericType">&lt;T&gt;</span><span class="paramType"> extends Baz</span>"#
        );
    }

    #[test]
    fn test_display_markup_function_parameters() {
        insta::assert_snapshot!(
            display_markup(DeclarationKind::Function, "CG.Foo.doIt(x: number, y: string): void"),
            @r#"CG.Foo.doIt<span class="genericType">(x<span class="paramType">: number</span>, y<span class="paramType">: string</span>)</span><span class="paramType">: void</span>"#
        );
    }

    #[test]
    fn test_display_markup_escapes_plain_kinds() {
        assert_eq!(
            display_markup(DeclarationKind::Var, "CG.Foo.map<K>"),
            "CG.Foo.map&lt;K&gt;"
        );
    }
}
