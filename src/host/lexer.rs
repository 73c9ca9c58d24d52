//! Shallow highlighter for programming languages.
//!
//! Finds comments, doc comments, string literals, keywords, and the names
//! introduced by declaration keywords (`fn foo`, `let bar`). Everything else
//! is left unclassified. This is a highlighter, not a parser: nested block
//! comments, heredocs and the like are not understood.

use crate::checker::category::{
    Categories, Category, COMMENT, DOC, FUNCTION_NAME, KEYWORD, STRING, VARIABLE_NAME,
};
use crate::host::{SourceLang, StyledSpan};

struct Syntax {
    line_comments: &'static [&'static str],
    doc_line_comments: &'static [&'static str],
    block_comment: Option<(&'static str, &'static str)>,
    doc_block_open: Option<&'static str>,
    quotes: &'static [u8],
    /// Quotes whose literals may span lines.
    multiline_quotes: &'static [u8],
    triple_quoted_docs: bool,
    rust_char_literals: bool,
    function_keywords: &'static [&'static str],
    variable_keywords: &'static [&'static str],
    keywords: &'static [&'static str],
}

const RUST: Syntax = Syntax {
    line_comments: &["//"],
    doc_line_comments: &["///", "//!"],
    block_comment: Some(("/*", "*/")),
    doc_block_open: Some("/**"),
    quotes: b"\"'",
    multiline_quotes: b"\"",
    triple_quoted_docs: false,
    rust_char_literals: true,
    function_keywords: &["fn"],
    variable_keywords: &["let", "mut", "const", "static"],
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ],
};

const JAVASCRIPT: Syntax = Syntax {
    line_comments: &["//"],
    doc_line_comments: &[],
    block_comment: Some(("/*", "*/")),
    doc_block_open: Some("/**"),
    quotes: b"\"'`",
    multiline_quotes: b"`",
    triple_quoted_docs: false,
    rust_char_literals: false,
    function_keywords: &["function"],
    variable_keywords: &["let", "const", "var"],
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
        "function", "if", "import", "in", "instanceof", "interface", "let", "new", "null",
        "return", "static", "super", "switch", "this", "throw", "true", "try", "type", "typeof",
        "undefined", "var", "void", "while", "yield",
    ],
};

const PYTHON: Syntax = Syntax {
    line_comments: &["#"],
    doc_line_comments: &[],
    block_comment: None,
    doc_block_open: None,
    quotes: b"\"'",
    multiline_quotes: b"",
    triple_quoted_docs: true,
    rust_char_literals: false,
    function_keywords: &["def"],
    variable_keywords: &["global", "nonlocal"],
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return", "True",
        "try", "while", "with", "yield",
    ],
};

const GO: Syntax = Syntax {
    line_comments: &["//"],
    doc_line_comments: &[],
    block_comment: Some(("/*", "*/")),
    doc_block_open: None,
    quotes: b"\"'`",
    multiline_quotes: b"`",
    triple_quoted_docs: false,
    rust_char_literals: false,
    function_keywords: &["func"],
    variable_keywords: &["var", "const"],
    keywords: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ],
};

const C_FAMILY: Syntax = Syntax {
    line_comments: &["//"],
    doc_line_comments: &["///"],
    block_comment: Some(("/*", "*/")),
    doc_block_open: Some("/**"),
    quotes: b"\"'",
    multiline_quotes: b"",
    triple_quoted_docs: false,
    rust_char_literals: false,
    function_keywords: &[],
    variable_keywords: &["auto", "var"],
    keywords: &[
        "abstract", "auto", "bool", "break", "case", "catch", "char", "class", "const",
        "continue", "default", "delete", "do", "double", "else", "enum", "extends", "extern",
        "false", "final", "float", "for", "if", "implements", "import", "int", "long",
        "namespace", "new", "null", "nullptr", "package", "private", "protected", "public",
        "return", "short", "signed", "sizeof", "static", "struct", "switch", "template", "this",
        "throw", "true", "try", "typedef", "union", "unsigned", "using", "var", "virtual",
        "void", "volatile", "while",
    ],
};

const GENERIC: Syntax = Syntax {
    line_comments: &["//", "#"],
    doc_line_comments: &[],
    block_comment: Some(("/*", "*/")),
    doc_block_open: None,
    quotes: b"\"'",
    multiline_quotes: b"",
    triple_quoted_docs: false,
    rust_char_literals: false,
    function_keywords: &[],
    variable_keywords: &[],
    keywords: &[],
};

fn syntax_for(lang: SourceLang) -> &'static Syntax {
    match lang {
        SourceLang::Rust => &RUST,
        SourceLang::JavaScript | SourceLang::TypeScript | SourceLang::Jsx | SourceLang::Tsx => {
            &JAVASCRIPT
        }
        SourceLang::Python => &PYTHON,
        SourceLang::Go => &GO,
        SourceLang::Java | SourceLang::C | SourceLang::Cpp => &C_FAMILY,
        SourceLang::Other => &GENERIC,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Expect {
    Nothing,
    FunctionName,
    VariableName,
}

/// Classify `text` written in `lang`.
pub fn classify(text: &str, lang: SourceLang) -> Vec<StyledSpan> {
    let syntax = syntax_for(lang);
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut expect = Expect::Nothing;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        let b = bytes[i];

        if let Some(end) = comment_end(syntax, bytes, i) {
            let category = if is_doc_comment(syntax, rest) { DOC } else { COMMENT };
            push(&mut spans, i..end, category);
            i = end;
            continue;
        }

        if syntax.triple_quoted_docs && (rest.starts_with(b"\"\"\"") || rest.starts_with(b"'''")) {
            let end = find_from(bytes, i + 3, &rest[..3]).map_or(bytes.len(), |p| p + 3);
            push(&mut spans, i..end, DOC);
            i = end;
            continue;
        }

        if syntax.quotes.contains(&b) {
            if b == b'\'' && syntax.rust_char_literals && !is_char_literal(rest) {
                // A lifetime or loop label.
                i += 1;
                continue;
            }
            let end = string_end(bytes, i, syntax.multiline_quotes.contains(&b));
            push(&mut spans, i..end, STRING);
            expect = Expect::Nothing;
            i = end;
            continue;
        }

        if is_ident_start(b) {
            let end = i + bytes[i..].iter().take_while(|&&c| is_ident_byte(c)).count();
            let word = &text[i..end];
            if syntax.keywords.contains(&word) {
                push(&mut spans, i..end, KEYWORD);
                if syntax.function_keywords.contains(&word) {
                    expect = Expect::FunctionName;
                } else if syntax.variable_keywords.contains(&word) {
                    expect = Expect::VariableName;
                } else {
                    expect = Expect::Nothing;
                }
            } else {
                match expect {
                    Expect::FunctionName => push(&mut spans, i..end, FUNCTION_NAME),
                    Expect::VariableName => push(&mut spans, i..end, VARIABLE_NAME),
                    Expect::Nothing => {}
                }
                expect = Expect::Nothing;
            }
            i = end;
            continue;
        }

        if b.is_ascii_digit() {
            i += bytes[i..]
                .iter()
                .take_while(|&&c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.')
                .count();
            expect = Expect::Nothing;
            continue;
        }

        if !b.is_ascii_whitespace() {
            expect = Expect::Nothing;
        }
        i += 1;
    }

    spans
}

fn push(spans: &mut Vec<StyledSpan>, range: std::ops::Range<usize>, category: Category) {
    spans.push(StyledSpan::new(range, Categories::One(category)));
}

/// End of a comment starting at `i`, if one does.
fn comment_end(syntax: &Syntax, bytes: &[u8], i: usize) -> Option<usize> {
    let rest = &bytes[i..];
    if syntax
        .line_comments
        .iter()
        .any(|open| rest.starts_with(open.as_bytes()))
    {
        return Some(line_end(bytes, i));
    }
    let (open, close) = syntax.block_comment?;
    if rest.starts_with(open.as_bytes()) {
        let end = find_from(bytes, i + open.len(), close.as_bytes())
            .map_or(bytes.len(), |p| p + close.len());
        return Some(end);
    }
    None
}

fn is_doc_comment(syntax: &Syntax, rest: &[u8]) -> bool {
    if syntax
        .doc_line_comments
        .iter()
        .any(|open| rest.starts_with(open.as_bytes()))
    {
        // `////` is a plain comment.
        return rest.get(3) != Some(&b'/');
    }
    match syntax.doc_block_open {
        Some(open) => rest.starts_with(open.as_bytes()) && !rest.starts_with(b"/**/"),
        None => false,
    }
}

fn is_char_literal(rest: &[u8]) -> bool {
    match rest.get(1) {
        Some(b'\\') => true,
        Some(&lead) => rest.get(1 + utf8_width(lead)) == Some(&b'\''),
        None => false,
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

fn string_end(bytes: &[u8], start: usize, multiline: bool) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if !multiline => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn line_end(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| i + p)
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorized<'a>(text: &'a str, spans: &[StyledSpan]) -> Vec<(&'a str, String)> {
        spans
            .iter()
            .map(|s| {
                let name = s.categories.iter().next().unwrap().to_string();
                (&text[s.range.clone()], name)
            })
            .collect()
    }

    #[test]
    fn test_rust_comments_strings_and_names() {
        let text = "/// Entry point\nfn main() {\n    // say hi\n    let mut greeting = \"hi there\";\n    println!(\"{}\", greeting);\n}\n";
        let spans = classify(text, SourceLang::Rust);
        let found = categorized(text, &spans);

        assert!(found.contains(&("/// Entry point", "doc".to_string())));
        assert!(found.contains(&("main", "function-name".to_string())));
        assert!(found.contains(&("// say hi", "comment".to_string())));
        assert!(found.contains(&("greeting", "variable-name".to_string())));
        assert!(found.contains(&("\"hi there\"", "string".to_string())));
        assert!(!found.iter().any(|(t, _)| *t == "println"));
    }

    #[test]
    fn test_rust_lifetimes_are_not_strings() {
        let text = "fn get<'a>(s: &'a str) -> char { 'x' }";
        let spans = classify(text, SourceLang::Rust);
        let strings: Vec<_> = categorized(text, &spans)
            .into_iter()
            .filter(|(_, c)| c == "string")
            .collect();
        assert_eq!(strings, vec![("'x'", "string".to_string())]);
    }

    #[test]
    fn test_block_comments_span_lines() {
        let text = "int x; /* first\nsecond */ int y;";
        let spans = classify(text, SourceLang::C);
        let found = categorized(text, &spans);
        assert!(found.contains(&("/* first\nsecond */", "comment".to_string())));
    }

    #[test]
    fn test_python_docstrings_and_comments() {
        let text = "def greet(name):\n    \"\"\"Say hello.\"\"\"\n    # loud\n    return 'hi ' + name\n";
        let spans = classify(text, SourceLang::Python);
        let found = categorized(text, &spans);
        assert!(found.contains(&("greet", "function-name".to_string())));
        assert!(found.contains(&("\"\"\"Say hello.\"\"\"", "doc".to_string())));
        assert!(found.contains(&("# loud", "comment".to_string())));
        assert!(found.contains(&("'hi '", "string".to_string())));
    }

    #[test]
    fn test_template_literals_span_lines() {
        let text = "const msg = `one\ntwo`;";
        let spans = classify(text, SourceLang::JavaScript);
        let found = categorized(text, &spans);
        assert!(found.contains(&("msg", "variable-name".to_string())));
        assert!(found.contains(&("`one\ntwo`", "string".to_string())));
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let text = "x = 'open\ny = 1";
        let spans = classify(text, SourceLang::Python);
        let found = categorized(text, &spans);
        assert!(found.contains(&("'open", "string".to_string())));
    }
}
