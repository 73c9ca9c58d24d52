use super::{lexer, markdown, markup, Buffer, BufferId, Mode, StyledSpan};
use crate::checker::category::Categories;
use crate::{Finding, VerdictKind};
use anyhow::{Context, Result};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// In-memory buffer with a shallow highlighter.
///
/// Categories are computed lazily on the first `refontify` and cached until
/// the text changes.
#[derive(Debug)]
pub struct Document {
    id: BufferId,
    path: Option<PathBuf>,
    text: String,
    mode: Mode,
    spans: Vec<StyledSpan>,
    fontified: bool,
    visible: bool,
    viewport: Option<Range<usize>>,
    findings: Vec<Finding>,
}

impl Document {
    pub fn new(text: impl Into<String>, mode: Mode) -> Self {
        Self {
            id: BufferId::next(),
            path: None,
            text: text.into(),
            mode,
            spans: Vec::new(),
            fontified: false,
            visible: true,
            viewport: None,
            findings: Vec::new(),
        }
    }

    /// Read a file, picking the mode from its extension.
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let mut doc = Self::new(text, Mode::from_path(path));
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn with_viewport(mut self, viewport: Range<usize>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Swap the whole text. Cached categories and findings are dropped.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.spans.clear();
        self.fontified = false;
        self.findings.clear();
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// First typo starting at or after `from`.
    pub fn next_typo(&self, from: usize) -> Option<&Finding> {
        self.findings
            .iter()
            .find(|f| f.kind == VerdictKind::Typo && f.start >= from)
    }

    /// 1-based line and column of byte offset `pos`. Columns count chars.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let before = &self.text[..pos.min(self.text.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// The line containing byte offset `pos`, without its terminator.
    pub fn line_text(&self, pos: usize) -> &str {
        let pos = pos.min(self.text.len());
        let start = self.text[..pos].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[pos..].find('\n').map_or(self.text.len(), |i| pos + i);
        self.text[start..end].trim_end_matches('\r')
    }

    fn classify(&self) -> Vec<StyledSpan> {
        match self.mode {
            Mode::PlainText => Vec::new(),
            Mode::Markdown => markdown::classify(&self.text),
            Mode::Html | Mode::Vue => markup::classify(&self.text),
            Mode::Source(lang) => lexer::classify(&self.text, lang),
        }
    }
}

impl Buffer for Document {
    fn id(&self) -> BufferId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn categories_at(&self, pos: usize) -> Categories {
        let idx = self.spans.partition_point(|span| span.range.end <= pos);
        match self.spans.get(idx) {
            Some(span) if span.range.start <= pos => span.categories.clone(),
            _ => Categories::Absent,
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn viewport(&self) -> Option<Range<usize>> {
        self.viewport.clone()
    }

    fn refontify(&mut self, _range: Range<usize>) {
        if !self.fontified {
            self.spans = self.classify();
            self.fontified = true;
        }
    }

    fn record_findings(&mut self, range: Range<usize>, findings: Vec<Finding>) {
        self.findings
            .retain(|f| f.end <= range.start || f.start >= range.end);
        self.findings.extend(findings);
        self.findings.sort_by_key(|f| f.start);
    }
}
