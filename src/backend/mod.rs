pub mod process;
pub mod suggestions;
pub mod wordlist;

use crate::error::BackendResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

pub use process::ProcessBackend;
pub use wordlist::WordListBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Aspell,
    Hunspell,
    /// In-process word list, no external program.
    WordList,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aspell" => Ok(BackendKind::Aspell),
            "hunspell" => Ok(BackendKind::Hunspell),
            "wordlist" | "word-list" => Ok(BackendKind::WordList),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Aspell => write!(f, "aspell"),
            BackendKind::Hunspell => write!(f, "hunspell"),
            BackendKind::WordList => write!(f, "wordlist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    /// Dictionary / locale, e.g. `en_US`.
    pub language: String,
    /// Executable to run instead of `aspell` / `hunspell`.
    pub program: Option<String>,
    pub extra_args: Vec<String>,
    /// Word file for the `wordlist` backend, one word per line.
    pub word_list: Option<PathBuf>,
    pub max_suggestions: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            language: "en_US".to_string(),
            program: None,
            extra_args: Vec::new(),
            word_list: None,
            max_suggestions: 5,
        }
    }
}

/// Per-word answer from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub word: String,
    pub is_typo: bool,
    pub suggestions: Vec<String>,
}

impl Verdict {
    pub fn correct(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_typo: false,
            suggestions: Vec::new(),
        }
    }

    pub fn typo(word: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            word: word.into(),
            is_typo: true,
            suggestions,
        }
    }
}

/// A spell-checking engine that judges a line of space separated words.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Whether the engine can be reached at all. Checking stays silent when
    /// it cannot.
    fn is_available(&self) -> bool;

    fn check(&self, text: &str) -> BackendResult<Vec<Verdict>>;

    /// First typo verdict for `text`. Errors count as "no typo".
    fn first_typo(&self, text: &str) -> Option<Verdict> {
        match self.check(text) {
            Ok(verdicts) => verdicts.into_iter().find(|v| v.is_typo),
            Err(e) => {
                log::debug!("{} backend failed on {:?}: {}", self.kind(), text, e);
                None
            }
        }
    }

    fn has_typo(&self, text: &str) -> bool {
        self.first_typo(text).is_some()
    }
}

/// Build the backend selected by `settings`.
pub fn open(settings: &BackendSettings) -> Result<Rc<dyn Backend>> {
    let backend: Rc<dyn Backend> = match settings.kind {
        BackendKind::Aspell | BackendKind::Hunspell => Rc::new(ProcessBackend::new(settings)),
        BackendKind::WordList => {
            let path = settings
                .word_list
                .as_ref()
                .context("The wordlist backend needs a word list file (--word-list)")?;
            Rc::new(WordListBackend::load(path, settings.max_suggestions)?)
        }
    };
    Ok(backend)
}

/// Parse the ispell `-a` protocol spoken by both aspell and hunspell.
///
/// `*`, `+` and `-` lines are correct words; `&`, `?` and `#` lines are
/// misspellings. The version banner and blank lines carry nothing and any
/// other line is ignored.
pub fn parse_ispell_output(output: &str) -> Vec<Verdict> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with("@(#)"))
        .filter_map(|line| {
            let verdict = parse_ispell_line(line);
            if verdict.is_none() {
                log::debug!("ignoring malformed backend line {:?}", line);
            }
            verdict
        })
        .collect()
}

fn parse_ispell_line(line: &str) -> Option<Verdict> {
    let (marker, rest) = line.split_at(line.chars().next()?.len_utf8());
    match marker {
        "*" | "+" | "-" => Some(Verdict::correct(rest.trim())),
        "&" | "?" => {
            let (head, tail) = rest.split_once(':')?;
            let word = head.split_whitespace().next()?;
            let suggestions = tail
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            Some(Verdict::typo(word, suggestions))
        }
        "#" => {
            let word = rest.split_whitespace().next()?;
            Some(Verdict::typo(word, Vec::new()))
        }
        _ => None,
    }
}
