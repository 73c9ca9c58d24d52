pub mod output;

use crate::batch::ReportSink;
use crate::TypoReport;
use indicatif::{ProgressBar, ProgressStyle};
use output::OutputFormat;
use std::path::Path;

/// Prints typos as files are checked. JSON output is held back and printed
/// as one document by [`ConsoleSink::finish`].
pub struct ConsoleSink {
    format: OutputFormat,
    colored: bool,
    progress: Option<ProgressBar>,
    typos: Vec<TypoReport>,
    files_with_typos: usize,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self {
            format,
            colored,
            progress: None,
            typos: Vec::new(),
            files_with_typos: 0,
        }
    }

    /// Show a spinner while walking directories. Text output only.
    pub fn with_spinner(mut self) -> Self {
        if self.format == OutputFormat::Text {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            self.progress = Some(pb);
        }
        self
    }

    pub fn total_typos(&self) -> usize {
        self.typos.len()
    }

    pub fn files_with_typos(&self) -> usize {
        self.files_with_typos
    }

    /// Clear the spinner and print the summary or the JSON document.
    pub fn finish(&mut self, files_checked: usize) -> anyhow::Result<()> {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        match self.format {
            OutputFormat::Text => output::print_check_summary(
                self.typos.len(),
                self.files_with_typos,
                files_checked,
                self.colored,
            ),
            OutputFormat::Json => output::print_json_report(files_checked, &self.typos)?,
        }
        Ok(())
    }
}

impl ReportSink for ConsoleSink {
    fn report(&mut self, path: &Path, typos: &[TypoReport]) {
        if let Some(pb) = &self.progress {
            pb.set_message(path.display().to_string());
            pb.tick();
        }
        if typos.is_empty() {
            return;
        }

        self.files_with_typos += 1;
        self.typos.extend_from_slice(typos);
        if self.format == OutputFormat::Text {
            let colored = self.colored;
            match &self.progress {
                Some(pb) => pb.suspend(|| output::print_typos(path, typos, colored)),
                None => output::print_typos(path, typos, colored),
            }
        }
    }
}
