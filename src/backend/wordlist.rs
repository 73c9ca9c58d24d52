use crate::backend::{suggestions, Backend, BackendKind, Verdict};
use crate::error::BackendResult;
use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, Streamer};
use std::fs;
use std::path::Path;

/// Offline backend backed by an FST set of lowercase words.
pub struct WordListBackend {
    set: Set<Vec<u8>>,
    max_suggestions: usize,
}

impl WordListBackend {
    pub fn from_words<I, S>(words: I, max_suggestions: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .collect();
        words.sort();
        words.dedup();

        let set = Set::from_iter(words).context("Failed to build word list")?;
        Ok(Self {
            set,
            max_suggestions,
        })
    }

    /// Load a plain text word file, one word per line.
    pub fn load(path: &Path, max_suggestions: usize) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {}", path.display()))?;
        let backend = Self::from_words(content.lines(), max_suggestions)?;
        log::debug!(
            "loaded {} words from {}",
            backend.set.len(),
            path.display()
        );
        Ok(backend)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.to_lowercase())
    }

    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                results.push(word.to_string());
            }
        }

        results
    }
}

impl Backend for WordListBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::WordList
    }

    fn is_available(&self) -> bool {
        !self.is_empty()
    }

    fn check(&self, text: &str) -> BackendResult<Vec<Verdict>> {
        let verdicts = text
            .split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|word| !word.is_empty())
            .map(|word| {
                if self.contains(word) {
                    Verdict::correct(word)
                } else {
                    let lower = word.to_lowercase();
                    Verdict::typo(word, suggestions::generate(&lower, self, self.max_suggestions))
                }
            })
            .collect();
        Ok(verdicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_and_contains() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "Hello\nworld\n# comment\n\ntest\n").unwrap();

        let backend = WordListBackend::load(&path, 3).unwrap();
        assert_eq!(backend.len(), 3);
        assert!(backend.contains("hello"));
        assert!(backend.contains("HELLO"));
        assert!(!backend.contains("comment"));
    }

    #[test]
    fn test_check_line() {
        let backend = WordListBackend::from_words(["correct", "variable", "hello"], 3).unwrap();
        let verdicts = backend.check("correc Variable").unwrap();
        assert_eq!(verdicts.len(), 2);
        assert!(verdicts[0].is_typo);
        assert_eq!(verdicts[0].suggestions, vec!["correct"]);
        assert!(!verdicts[1].is_typo);
        assert!(backend.has_typo("hello correc"));
        assert!(!backend.has_typo("hello, Variable."));
    }

    #[test]
    fn test_prefix_search() {
        let backend = WordListBackend::from_words(["parse", "parser", "print"], 3).unwrap();
        assert_eq!(backend.words_with_prefix("par"), vec!["parse", "parser"]);
    }

    #[test]
    fn test_empty_list_is_unavailable() {
        let backend = WordListBackend::from_words(Vec::<String>::new(), 3).unwrap();
        assert!(!backend.is_available());
    }
}
