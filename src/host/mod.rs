//! Host-side services the checker consumes: buffer text, viewport,
//! visibility, lexical categories and word boundaries.
//!
//! An editor integration implements [`Buffer`] over its own buffers. The
//! crate ships [`Document`], an in-memory buffer with a shallow highlighter,
//! which the batch walker uses.

pub mod document;
pub mod lexer;
pub mod markdown;
pub mod markup;
pub mod mode;

pub use document::Document;
pub use mode::{DocumentKind, Mode, SourceLang};

use crate::checker::category::Categories;
use crate::{Finding, Token};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A byte range of a buffer carrying the same categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub categories: Categories,
}

impl StyledSpan {
    pub fn new(range: Range<usize>, categories: Categories) -> Self {
        Self { range, categories }
    }
}

/// Read-mostly view of an editor buffer.
pub trait Buffer {
    fn id(&self) -> BufferId;

    fn text(&self) -> &str;

    fn mode(&self) -> Mode;

    /// Lexical categories at byte offset `pos`.
    fn categories_at(&self, pos: usize) -> Categories;

    /// Whether the buffer is shown anywhere.
    fn is_visible(&self) -> bool {
        true
    }

    /// Byte range currently on screen, if the host tracks one.
    fn viewport(&self) -> Option<Range<usize>> {
        None
    }

    /// Recompute categories for `range` before it is scanned.
    fn refontify(&mut self, range: Range<usize>);

    /// Replace the findings recorded inside `range`.
    fn record_findings(&mut self, range: Range<usize>, findings: Vec<Finding>);

    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Candidate words overlapping `range`, in document order.
    fn words(&self, range: Range<usize>) -> Vec<Token<'_>> {
        words_in(self.text(), range)
    }
}

/// Word-boundary lookup over `text`.
///
/// Uses Unicode word boundaries, so `snake_case`, `camelCase` and `don't`
/// stay whole. Segments without a letter are skipped and a word cut by either
/// end of `range` is widened to its full extent.
pub fn words_in(text: &str, range: Range<usize>) -> Vec<Token<'_>> {
    let mut end = char_floor(text, range.end.min(text.len()));
    let mut start = char_floor(text, range.start.min(end));

    while let Some(ch) = text[..start].chars().next_back() {
        if !is_word_char(ch) {
            break;
        }
        start -= ch.len_utf8();
    }
    while let Some(ch) = text[end..].chars().next() {
        if !is_word_char(ch) {
            break;
        }
        end += ch.len_utf8();
    }

    text[start..end]
        .split_word_bound_indices()
        .filter(|(_, word)| word.chars().any(char::is_alphabetic))
        .map(|(offset, word)| Token::new(word, start + offset))
        .collect()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn char_floor(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
