//! Word predicates plugged into the acceptance pipeline.
//!
//! Each predicate says which pipeline stage it belongs to through its
//! [`PredicateSource`]: mode predicates replace the category filter for their
//! language, detectors veto markup noise, user predicates have the final say.

use super::category::{
    Categories, ATTRIBUTE, CODE, COMMENT, DOC, FRONT_MATTER, HTML, STRING, TAG, URL,
};
use crate::host::Mode;
use crate::Token;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateSource {
    /// Registered for one language mode.
    Mode,
    /// Extra detector for markup or outline modes.
    Detector,
    /// Supplied by the user; decides the final verdict.
    User,
}

/// Everything a predicate may look at for one candidate word.
#[derive(Debug, Clone)]
pub struct WordContext<'a> {
    /// Full buffer text.
    pub text: &'a str,
    pub token: Token<'a>,
    pub mode: Mode,
    pub categories: &'a Categories,
}

impl<'a> WordContext<'a> {
    /// Text between the start of the token's line and the token.
    pub fn line_prefix(&self) -> &'a str {
        let before = &self.text[..self.token.start];
        let start = before.rfind('\n').map_or(0, |i| i + 1);
        &before[start..]
    }

    /// The whole line holding the token.
    pub fn line(&self) -> &'a str {
        let start = self.token.start - self.line_prefix().len();
        let end = self.text[self.token.start..]
            .find('\n')
            .map_or(self.text.len(), |i| self.token.start + i);
        &self.text[start..end]
    }
}

pub trait WordPredicate {
    fn name(&self) -> &str;

    fn source(&self) -> PredicateSource;

    fn applies_to(&self, mode: Mode) -> bool;

    /// `false` rejects the word.
    fn accept(&self, ctx: &WordContext<'_>) -> bool;
}

type ContextFn = dyn Fn(&WordContext<'_>) -> bool;

/// A predicate bound to one language mode, keyed by [`Mode::name`].
pub struct ModePredicate {
    mode: String,
    check: Box<ContextFn>,
}

impl ModePredicate {
    pub fn new<F>(mode: impl Into<String>, check: F) -> Self
    where
        F: Fn(&WordContext<'_>) -> bool + 'static,
    {
        Self {
            mode: mode.into(),
            check: Box::new(check),
        }
    }

    /// Markdown: skip code, raw HTML, bare URLs and front matter.
    pub fn markdown() -> Self {
        Self::new("markdown", |ctx| {
            ![CODE, HTML, URL, FRONT_MATTER]
                .iter()
                .any(|c| ctx.categories.contains(c))
        })
    }

    /// TypeScript: only comments, doc comments and strings.
    pub fn typescript() -> Self {
        Self::new("typescript", |ctx| {
            [COMMENT, DOC, STRING].iter().any(|c| ctx.categories.contains(c))
        })
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::markdown(), Self::typescript()]
    }
}

impl WordPredicate for ModePredicate {
    fn name(&self) -> &str {
        &self.mode
    }

    fn source(&self) -> PredicateSource {
        PredicateSource::Mode
    }

    fn applies_to(&self, mode: Mode) -> bool {
        mode.name() == self.mode
    }

    fn accept(&self, ctx: &WordContext<'_>) -> bool {
        (self.check)(ctx)
    }
}

/// Attributes whose values are identifiers or URLs rather than prose.
const NON_PROSE_ATTRIBUTES: &[&str] = &[
    "class", "classname", "id", "href", "src", "style", "key", "ref", "for", "name", "type",
];

/// Rejects tag names, attribute names and machine-readable attribute values
/// in markup and template modes.
#[derive(Debug, Default)]
pub struct MarkupDetector;

impl MarkupDetector {
    /// Where inside an open tag the token sits, judging from the line prefix.
    fn tag_position(prefix: &str) -> Option<TagPosition> {
        let bytes = prefix.as_bytes();
        let open = (0..bytes.len()).rev().find(|&i| {
            bytes[i] == b'<'
                && bytes
                    .get(i + 1)
                    .map_or(true, |&c| c.is_ascii_alphabetic() || c == b'/')
        })?;
        let inside = &prefix[open + 1..];
        if inside.contains('>') {
            return None;
        }

        let inside = inside.strip_prefix('/').unwrap_or(inside);
        if inside.is_empty() {
            return Some(TagPosition::Name);
        }

        let mut quote: Option<char> = None;
        let mut attribute = String::new();
        let mut current = String::new();
        for ch in inside.chars() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                None if ch == '=' => attribute = std::mem::take(&mut current),
                None if ch.is_whitespace() => current.clear(),
                None => current.push(ch),
            }
        }

        match quote {
            Some(_) => Some(TagPosition::Value(attribute.to_lowercase())),
            None => Some(TagPosition::Attribute),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TagPosition {
    Name,
    Attribute,
    Value(String),
}

impl WordPredicate for MarkupDetector {
    fn name(&self) -> &str {
        "markup"
    }

    fn source(&self) -> PredicateSource {
        PredicateSource::Detector
    }

    fn applies_to(&self, mode: Mode) -> bool {
        mode.is_markup_template()
    }

    fn accept(&self, ctx: &WordContext<'_>) -> bool {
        if ctx.categories.contains(&COMMENT) || ctx.categories.contains(&DOC) {
            return true;
        }
        if ctx.categories.contains(&TAG) || ctx.categories.contains(&ATTRIBUTE) {
            return false;
        }
        match Self::tag_position(ctx.line_prefix()) {
            None => true,
            Some(TagPosition::Name) | Some(TagPosition::Attribute) => false,
            Some(TagPosition::Value(attribute)) => {
                let attribute = attribute.trim_start_matches([':', '@']);
                !NON_PROSE_ATTRIBUTES.contains(&attribute)
            }
        }
    }
}

lazy_static! {
    static ref REFERENCE_DEFINITION: Regex = Regex::new(r"^ {0,3}\[[^\]]+\]:").unwrap();
    static ref ATTRIBUTE_BLOCK: Regex = Regex::new(r"\{[#.:][^}]*$").unwrap();
    static ref WIKI_TARGET: Regex = Regex::new(r"\[\[[^\]|]*$").unwrap();
}

/// Rejects link plumbing in outline markup: reference definitions,
/// `{#id .class}` attribute blocks and `[[wiki]]` targets.
#[derive(Debug, Default)]
pub struct OutlineDetector;

impl WordPredicate for OutlineDetector {
    fn name(&self) -> &str {
        "outline"
    }

    fn source(&self) -> PredicateSource {
        PredicateSource::Detector
    }

    fn applies_to(&self, mode: Mode) -> bool {
        mode.is_outline()
    }

    fn accept(&self, ctx: &WordContext<'_>) -> bool {
        let prefix = ctx.line_prefix();
        !(REFERENCE_DEFINITION.is_match(ctx.line())
            || ATTRIBUTE_BLOCK.is_match(prefix)
            || WIKI_TARGET.is_match(prefix))
    }
}

/// The user's ignore patterns and personal dictionary.
#[derive(Debug, Default)]
pub struct UserVeto {
    ignore_patterns: Vec<Regex>,
    personal_words: HashSet<String>,
}

impl UserVeto {
    pub fn new(patterns: &[String], personal_words: impl IntoIterator<Item = String>) -> Self {
        let mut ignore_patterns = Vec::new();
        for pattern in patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => log::warn!("Invalid ignore pattern '{}': {}", pattern, e),
            }
        }

        Self {
            ignore_patterns,
            personal_words: personal_words
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Build from patterns plus the personal dictionary at `path`, if present.
    pub fn load(patterns: &[String], path: Option<&Path>) -> Result<Self> {
        let mut words = Vec::new();
        if let Some(path) = path.filter(|p| p.exists()) {
            let content = fs::read_to_string(path).with_context(|| {
                format!("Failed to read personal dictionary: {}", path.display())
            })?;
            words.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|w| !w.is_empty() && !w.starts_with('#'))
                    .map(String::from),
            );
            log::debug!("loaded {} personal words from {}", words.len(), path.display());
        }
        Ok(Self::new(patterns, words))
    }

    pub fn should_ignore(&self, word: &str) -> bool {
        word.chars().count() < 2
            || word.chars().all(|c| c.is_ascii_digit())
            || self.personal_words.contains(&word.to_lowercase())
            || self.ignore_patterns.iter().any(|re| re.is_match(word))
    }
}

impl WordPredicate for UserVeto {
    fn name(&self) -> &str {
        "user-veto"
    }

    fn source(&self) -> PredicateSource {
        PredicateSource::User
    }

    fn applies_to(&self, _mode: Mode) -> bool {
        true
    }

    fn accept(&self, ctx: &WordContext<'_>) -> bool {
        !self.should_ignore(ctx.token.text)
    }
}

/// A user predicate over the raw word.
pub struct ExtraPredicate<F> {
    name: String,
    check: F,
}

impl<F: Fn(&str) -> bool> ExtraPredicate<F> {
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F: Fn(&str) -> bool> WordPredicate for ExtraPredicate<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> PredicateSource {
        PredicateSource::User
    }

    fn applies_to(&self, _mode: Mode) -> bool {
        true
    }

    fn accept(&self, ctx: &WordContext<'_>) -> bool {
        (self.check)(ctx.token.text)
    }
}
