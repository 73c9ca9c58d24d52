//! The per-word decision: should this token be sent to the backend, and is
//! it a typo?
//!
//! Stages run cheapest first and stop at the first decisive answer:
//!
//! 1. bounds and minimum length
//! 2. the language mode's own predicate
//! 3. markup and outline detectors
//! 4. the category filter, unless a mode predicate already ran
//! 5. compound identifiers with several retained sub-words go to the
//!    backend as one space separated request
//! 6. the apostrophe rule
//! 7. user predicates

use super::category::CategoryFilter;
use super::predicate::{
    MarkupDetector, ModePredicate, OutlineDetector, PredicateSource, UserVeto, WordContext,
    WordPredicate,
};
use super::splitter::{self, DEFAULT_MAX_RUNS, DEFAULT_MIN_SUB_WORD_LENGTH};
use crate::backend::Backend;
use crate::host::{Buffer, Mode};
use crate::{Config, Token};
use anyhow::Result;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct AcceptanceSettings {
    pub min_word_length: usize,
    pub min_sub_word_length: usize,
    pub max_sub_words: usize,
    pub extra_detectors: bool,
    /// Re-ask the backend about words right after an apostrophe.
    pub apostrophe_fix: bool,
    /// Mode names whose registered predicate is skipped.
    pub ignored_mode_predicates: HashSet<String>,
}

impl Default for AcceptanceSettings {
    fn default() -> Self {
        Self {
            min_word_length: 2,
            min_sub_word_length: DEFAULT_MIN_SUB_WORD_LENGTH,
            max_sub_words: DEFAULT_MAX_RUNS,
            extra_detectors: true,
            apostrophe_fix: true,
            ignored_mode_predicates: HashSet::from(["typescript".to_string()]),
        }
    }
}

pub struct WordAcceptance {
    settings: AcceptanceSettings,
    categories: CategoryFilter,
    predicates: Vec<Box<dyn WordPredicate>>,
    backend: Rc<dyn Backend>,
}

impl WordAcceptance {
    /// Pipeline with the built-in mode predicates and detectors registered.
    pub fn new(
        settings: AcceptanceSettings,
        categories: CategoryFilter,
        backend: Rc<dyn Backend>,
    ) -> Self {
        let mut predicates: Vec<Box<dyn WordPredicate>> = Vec::new();
        for predicate in ModePredicate::builtin() {
            predicates.push(Box::new(predicate));
        }
        predicates.push(Box::new(MarkupDetector));
        predicates.push(Box::new(OutlineDetector));

        Self {
            settings,
            categories,
            predicates,
            backend,
        }
    }

    pub fn from_config(config: &Config, backend: Rc<dyn Backend>) -> Result<Self> {
        let veto = UserVeto::load(&config.ignore_patterns, config.personal_dictionary.as_deref())?;
        Ok(Self::new(config.acceptance(), config.category_filter(), backend).with_predicate(veto))
    }

    pub fn with_predicate(mut self, predicate: impl WordPredicate + 'static) -> Self {
        self.push_predicate(Box::new(predicate));
        self
    }

    pub fn push_predicate(&mut self, predicate: Box<dyn WordPredicate>) {
        self.predicates.push(predicate);
    }

    pub fn backend(&self) -> &Rc<dyn Backend> {
        &self.backend
    }

    pub fn settings(&self) -> &AcceptanceSettings {
        &self.settings
    }

    /// Whether `token` should be reported to the region check as a
    /// candidate typo. Compound identifiers are fully decided here.
    pub fn should_check<B: Buffer + ?Sized>(&self, buffer: &B, token: &Token<'_>) -> bool {
        let text = buffer.text();
        if text.get(token.start..token.end) != Some(token.text) {
            return false;
        }
        if token.text.chars().count() < self.settings.min_word_length {
            return false;
        }

        let mode = buffer.mode();
        let categories = buffer.categories_at(token.start);
        let ctx = WordContext {
            text,
            token: *token,
            mode,
            categories: &categories,
        };

        let mut mode_applied = false;
        if !self.settings.ignored_mode_predicates.contains(mode.name()) {
            for predicate in self.stage(PredicateSource::Mode, mode) {
                mode_applied = true;
                if !predicate.accept(&ctx) {
                    log::trace!("{:?} rejected by {} mode predicate", token.text, predicate.name());
                    return false;
                }
            }
        }

        if self.settings.extra_detectors && (mode.is_markup_template() || mode.is_outline()) {
            for predicate in self.stage(PredicateSource::Detector, mode) {
                if !predicate.accept(&ctx) {
                    log::trace!("{:?} rejected by {} detector", token.text, predicate.name());
                    return false;
                }
            }
        }

        let checkable = self.categories.is_checkable(&categories, mode.kind());
        if !mode_applied && !checkable {
            return false;
        }

        if !is_contraction(token.text) {
            let sub_words = splitter::split_with_limit(token.text, self.settings.max_sub_words);
            let kept = splitter::retained(&sub_words, self.settings.min_sub_word_length);
            // With one sub-word or none, the region check looks at the whole token.
            if kept.len() > 1 {
                return self.backend.has_typo(&kept.join(" "));
            }
        }

        if self.settings.apostrophe_fix
            && follows_apostrophe(text, token.start)
            && checkable
            && !self.backend.has_typo(token.text)
        {
            return false;
        }

        self.stage(PredicateSource::User, mode)
            .all(|predicate| predicate.accept(&ctx))
    }

    fn stage(
        &self,
        source: PredicateSource,
        mode: Mode,
    ) -> impl Iterator<Item = &dyn WordPredicate> + '_ {
        self.predicates
            .iter()
            .filter(move |p| p.source() == source && p.applies_to(mode))
            .map(|p| p.as_ref())
    }
}

/// Letters with apostrophes only inside, like `don't` or `l’heure`.
fn is_contraction(word: &str) -> bool {
    let is_apostrophe = |c: char| c == '\'' || c == '’';
    word.contains(is_apostrophe)
        && !word.starts_with(is_apostrophe)
        && !word.ends_with(is_apostrophe)
        && word.chars().all(|c| c.is_alphabetic() || is_apostrophe(c))
}

fn follows_apostrophe(text: &str, pos: usize) -> bool {
    matches!(text[..pos].chars().next_back(), Some('\'') | Some('’'))
}
