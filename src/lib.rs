pub mod backend;
pub mod batch;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;

pub use batch::Batch;
pub use checker::pipeline::WordAcceptance;
pub use checker::region::RegionSpeller;
pub use checker::scheduler::{CheckOutcome, ScanMode, Scheduler};
pub use config::Config;
pub use host::{Buffer, Document};

use serde::Serialize;
use std::path::PathBuf;

/// A word as found by the host's word-boundary lookup, borrowed from the
/// buffer snapshot it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, start: usize) -> Self {
        Self {
            text,
            start,
            end: start + text.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictKind {
    Typo,
    Doublon,
}

/// A verdict recorded on a buffer by a region check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub start: usize,
    pub end: usize,
    pub word: String,
    pub kind: VerdictKind,
    pub suggestions: Vec<String>,
}

impl Finding {
    pub fn typo(token: &Token<'_>, suggestions: Vec<String>) -> Self {
        Self {
            start: token.start,
            end: token.end,
            word: token.text.to_string(),
            kind: VerdictKind::Typo,
            suggestions,
        }
    }

    pub fn doublon(token: &Token<'_>) -> Self {
        Self {
            start: token.start,
            end: token.end,
            word: token.text.to_string(),
            kind: VerdictKind::Doublon,
            suggestions: Vec::new(),
        }
    }
}

/// One typo reported by the batch walker.
#[derive(Debug, Clone, Serialize)]
pub struct TypoReport {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub word: String,
    pub position: usize,
    pub context: String,
    pub suggestions: Vec<String>,
}
