use std::path::Path;

/// Broad flavour of a document, used for text the host left unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Prose,
    Source,
}

/// Language mode of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    PlainText,
    Markdown,
    Html,
    Vue,
    Source(SourceLang),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLang {
    Rust,
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Python,
    Go,
    Java,
    C,
    Cpp,
    Other,
}

impl Mode {
    /// Detect the mode from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "mdx" | "markdown" => Mode::Markdown,
            "html" | "htm" | "xhtml" => Mode::Html,
            "vue" => Mode::Vue,
            "txt" | "text" | "" => Mode::PlainText,
            "rs" => Mode::Source(SourceLang::Rust),
            "js" | "mjs" | "cjs" => Mode::Source(SourceLang::JavaScript),
            "ts" | "mts" | "cts" => Mode::Source(SourceLang::TypeScript),
            "jsx" => Mode::Source(SourceLang::Jsx),
            "tsx" => Mode::Source(SourceLang::Tsx),
            "py" | "pyw" => Mode::Source(SourceLang::Python),
            "go" => Mode::Source(SourceLang::Go),
            "java" => Mode::Source(SourceLang::Java),
            "c" | "h" => Mode::Source(SourceLang::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Mode::Source(SourceLang::Cpp),
            _ => Mode::Source(SourceLang::Other),
        }
    }

    /// Name used to key mode predicates and the ignore list in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Mode::PlainText => "text",
            Mode::Markdown => "markdown",
            Mode::Html => "html",
            Mode::Vue => "vue",
            Mode::Source(lang) => match lang {
                SourceLang::Rust => "rust",
                SourceLang::JavaScript => "javascript",
                SourceLang::TypeScript => "typescript",
                SourceLang::Jsx => "jsx",
                SourceLang::Tsx => "tsx",
                SourceLang::Python => "python",
                SourceLang::Go => "go",
                SourceLang::Java => "java",
                SourceLang::C => "c",
                SourceLang::Cpp => "cpp",
                SourceLang::Other => "source",
            },
        }
    }

    pub fn kind(self) -> DocumentKind {
        match self {
            Mode::PlainText | Mode::Markdown | Mode::Html => DocumentKind::Prose,
            Mode::Vue | Mode::Source(_) => DocumentKind::Source,
        }
    }

    /// Modes that mix markup tags into their text.
    pub fn is_markup_template(self) -> bool {
        matches!(
            self,
            Mode::Html | Mode::Vue | Mode::Source(SourceLang::Jsx) | Mode::Source(SourceLang::Tsx)
        )
    }

    /// Lightweight outline markup (headings, links, references).
    pub fn is_outline(self) -> bool {
        matches!(self, Mode::Markdown)
    }
}
