use super::pipeline::WordAcceptance;
use super::ReportFilter;
use crate::host::Buffer;
use crate::{Finding, Token, VerdictKind};
use std::ops::Range;

/// The host's "check this region" primitive.
pub trait RegionCheck<B: Buffer + ?Sized> {
    fn check_region(&mut self, buffer: &B, range: Range<usize>) -> Vec<Finding>;
}

/// Checks every word of a region: acceptance pipeline, doublon check, then a
/// single-word backend lookup.
pub struct RegionSpeller {
    acceptance: WordAcceptance,
    report: ReportFilter,
}

impl RegionSpeller {
    pub fn new(acceptance: WordAcceptance, report: ReportFilter) -> Self {
        Self { acceptance, report }
    }

    pub fn acceptance(&self) -> &WordAcceptance {
        &self.acceptance
    }
}

impl<B: Buffer + ?Sized> RegionCheck<B> for RegionSpeller {
    fn check_region(&mut self, buffer: &B, range: Range<usize>) -> Vec<Finding> {
        let text = buffer.text();
        let mut findings = Vec::new();
        let mut previous: Option<Token<'_>> = None;

        for token in buffer.words(range) {
            let before = previous.replace(token);
            if !self.acceptance.should_check(buffer, &token) {
                continue;
            }

            if before.is_some_and(|prev| is_doublon(text, &prev, &token)) {
                if self.report.admits(VerdictKind::Doublon) {
                    findings.push(Finding::doublon(&token));
                }
                continue;
            }

            if let Some(verdict) = self.acceptance.backend().first_typo(token.text) {
                findings.push(Finding::typo(&token, verdict.suggestions));
            }
        }

        log::debug!("region check found {} verdicts", findings.len());
        findings
    }
}

/// `word word` with nothing but whitespace between the two.
fn is_doublon(text: &str, prev: &Token<'_>, token: &Token<'_>) -> bool {
    let gap = &text[prev.end..token.start];
    !gap.is_empty()
        && gap.chars().all(char::is_whitespace)
        && prev.text.to_lowercase() == token.text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, WordListBackend};
    use crate::checker::category::CategoryFilter;
    use crate::checker::pipeline::AcceptanceSettings;
    use crate::host::Document;
    use crate::host::Mode;
    use std::rc::Rc;

    fn speller(words: &[&str], report: ReportFilter) -> RegionSpeller {
        let backend: Rc<dyn Backend> =
            Rc::new(WordListBackend::from_words(words.iter().copied(), 3).unwrap());
        let acceptance =
            WordAcceptance::new(AcceptanceSettings::default(), CategoryFilter::default(), backend);
        RegionSpeller::new(acceptance, report)
    }

    fn check(speller: &mut RegionSpeller, text: &str) -> Vec<Finding> {
        let mut doc = Document::new(text, Mode::PlainText);
        doc.refontify(0..doc.len());
        speller.check_region(&doc, 0..doc.len())
    }

    #[test]
    fn test_typos_with_suggestions() {
        let mut speller = speller(&["the", "cat", "sat", "help", "hello"], ReportFilter::default());
        let findings = check(&mut speller, "the cat sat on the helo");

        let words: Vec<_> = findings.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["on", "helo"]);
        assert_eq!(findings[1].start, 19);
        assert_eq!(findings[1].kind, VerdictKind::Typo);
        assert!(findings[1].suggestions.contains(&"hello".to_string()));
    }

    #[test]
    fn test_doublons_follow_report_filter() {
        let text = "the the cat\nthe\ncat";
        let mut quiet = speller(&["the", "cat"], ReportFilter::default());
        assert!(check(&mut quiet, text).is_empty());

        let mut loud = speller(&["the", "cat"], ReportFilter { report_doublons: true });
        let findings = check(&mut loud, text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, VerdictKind::Doublon);
        assert_eq!(findings[0].start, 4);
    }

    #[test]
    fn test_doublon_needs_whitespace_gap() {
        let mut speller = speller(&["the", "cat"], ReportFilter { report_doublons: true });
        assert!(check(&mut speller, "the, the cat").is_empty());
    }
}
