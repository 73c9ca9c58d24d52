//! Batch checking of files and directory trees.

use crate::checker::region::RegionSpeller;
use crate::checker::scheduler::{CheckOutcome, ScanMode, Scheduler};
use crate::host::{Buffer, Document};
use crate::{backend::Backend, Config, TypoReport, WordAcceptance};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

/// Receives the typos of each checked file.
pub trait ReportSink {
    fn report(&mut self, path: &Path, typos: &[TypoReport]);
}

impl ReportSink for Vec<TypoReport> {
    fn report(&mut self, _path: &Path, typos: &[TypoReport]) {
        self.extend_from_slice(typos);
    }
}

pub struct Batch<S> {
    scheduler: Scheduler,
    speller: RegionSpeller,
    include: Regex,
    exclude: Regex,
    excluded_dirs: HashSet<String>,
    full_path: bool,
    sink: S,
    files_checked: usize,
}

impl<S: ReportSink> Batch<S> {
    pub fn from_config(config: &Config, backend: Rc<dyn Backend>, sink: S) -> Result<Self> {
        let include = Regex::new(&config.include_pattern)
            .with_context(|| format!("Invalid include pattern: {}", config.include_pattern))?;
        let exclude = Regex::new(&config.exclude_pattern)
            .with_context(|| format!("Invalid exclude pattern: {}", config.exclude_pattern))?;
        let acceptance = WordAcceptance::from_config(config, Rc::clone(&backend))?;

        Ok(Self {
            scheduler: Scheduler::new(config.scheduler_settings(), backend),
            speller: RegionSpeller::new(acceptance, config.report_filter()),
            include,
            exclude,
            excluded_dirs: config.excluded_dirs.iter().cloned().collect(),
            full_path: false,
            sink,
            files_checked: 0,
        })
    }

    /// Report canonical absolute paths instead of the paths as given.
    pub fn full_path(mut self, full_path: bool) -> Self {
        self.full_path = full_path;
        self
    }

    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Check one file in Normal mode. Returns whether a typo was found.
    pub fn check_file(&mut self, path: &Path) -> bool {
        let mut doc = match Document::open(path) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("{:#}", e);
                return false;
            }
        };

        self.scheduler.set_mode(doc.id(), ScanMode::Normal);
        let outcome = self.scheduler.maybe_check(&mut doc, &mut self.speller);
        self.scheduler.forget(doc.id());
        self.files_checked += 1;

        if let CheckOutcome::Skipped(reason) = outcome {
            log::info!("{}: skipped, {}", path.display(), reason);
            return false;
        }

        let shown = self.display_path(path);
        let mut typos = Vec::new();
        let mut cursor = 0;
        while let Some(finding) = doc.next_typo(cursor) {
            let (line, column) = doc.line_col(finding.start);
            typos.push(TypoReport {
                path: shown.clone(),
                line,
                column,
                word: finding.word.clone(),
                position: finding.start,
                context: doc.line_text(finding.start).trim().to_string(),
                suggestions: finding.suggestions.clone(),
            });
            cursor = finding.end.max(finding.start + 1);
        }

        self.sink.report(&shown, &typos);
        !typos.is_empty()
    }

    /// Check every matching file under `dir`. Returns whether any file had a
    /// typo.
    pub fn check_directory(&mut self, dir: &Path) -> bool {
        let mut found = false;
        for path in self.collect_files(dir) {
            found |= self.check_file(&path);
        }
        found
    }

    /// Files under `dir` selected by the include and exclude patterns.
    /// Excluded and symlinked directories are not entered.
    pub fn collect_files(&self, dir: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self
                        .excluded_dirs
                        .contains(entry.file_name().to_string_lossy().as_ref())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };
            // Symlinked files are checked, symlinked directories are not walked.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if self.include.is_match(&name) && !self.exclude.is_match(&name) {
                files.push(entry.into_path());
            }
        }
        files
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        if !self.full_path {
            return path.to_path_buf();
        }
        dunce::canonicalize(path).unwrap_or_else(|e| {
            log::debug!("cannot canonicalize {}: {}", path.display(), e);
            path.to_path_buf()
        })
    }
}
