use crate::backend::{BackendKind, BackendSettings};
use crate::checker::category::{default_checkable_categories, CategoryFilter, PlainTextPolicy};
use crate::checker::pipeline::AcceptanceSettings;
use crate::checker::scheduler::{ScanMode, SchedulerSettings};
use crate::checker::ReportFilter;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LOCAL_CONFIG_FILE: &str = ".idspell.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendSettings,
    pub personal_dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,

    /// Categories spell-checked everywhere.
    pub categories: Vec<String>,
    /// Extra categories added by the user on top of `categories`.
    pub extra_categories: Vec<String>,
    pub plain_text: PlainTextPolicy,

    pub min_word_length: usize,
    pub min_sub_word_length: usize,
    pub max_sub_words: usize,

    pub check_interval_ms: u64,
    pub max_document_size: usize,
    pub max_viewport_size: usize,
    pub scan_mode: ScanMode,

    pub include_pattern: String,
    pub exclude_pattern: String,
    pub excluded_dirs: Vec<String>,

    pub ignored_mode_predicates: Vec<String>,
    pub extra_detectors: bool,
    pub apostrophe_fix: bool,
    pub report_doublons: bool,
}

impl Default for Config {
    fn default() -> Self {
        let acceptance = AcceptanceSettings::default();
        let scheduler = SchedulerSettings::default();
        Self {
            backend: BackendSettings::default(),
            personal_dictionary: None,
            ignore_patterns: vec![
                r"^[A-Z0-9_]{2,}$".to_string(),      // ALL_CAPS
                r"https?://\S+".to_string(),         // URLs
                r"^[a-fA-F0-9]{32,}$".to_string(),   // Hashes
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(), // Emails
            ],
            categories: default_checkable_categories(),
            extra_categories: Vec::new(),
            plain_text: PlainTextPolicy::default(),
            min_word_length: acceptance.min_word_length,
            min_sub_word_length: acceptance.min_sub_word_length,
            max_sub_words: acceptance.max_sub_words,
            check_interval_ms: scheduler.min_interval.as_millis() as u64,
            max_document_size: scheduler.max_document_size,
            max_viewport_size: scheduler.max_viewport_size,
            scan_mode: scheduler.default_mode,
            include_pattern:
                r"\.(rs|c|h|cc|cpp|hpp|hh|cxx|go|java|js|mjs|cjs|jsx|ts|mts|cts|tsx|py|pyw|md|mdx|markdown|txt|html|htm|vue)$"
                    .to_string(),
            exclude_pattern: r"^\.#|\.min\.(js|css)$|~$".to_string(),
            excluded_dirs: [
                ".git", ".svn", ".hg", "node_modules", "target", "dist", "build", "vendor",
                "__pycache__",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            ignored_mode_predicates: acceptance.ignored_mode_predicates.into_iter().collect(),
            extra_detectors: acceptance.extra_detectors,
            apostrophe_fix: acceptance.apostrophe_fix,
            report_doublons: false,
        }
    }
}

/// A config file as written by the user: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    backend: Option<BackendFile>,
    personal_dictionary: Option<PathBuf>,
    ignore_patterns: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    extra_categories: Option<Vec<String>>,
    plain_text: Option<PlainTextPolicy>,
    min_word_length: Option<usize>,
    min_sub_word_length: Option<usize>,
    max_sub_words: Option<usize>,
    check_interval_ms: Option<u64>,
    max_document_size: Option<usize>,
    max_viewport_size: Option<usize>,
    scan_mode: Option<ScanMode>,
    include_pattern: Option<String>,
    exclude_pattern: Option<String>,
    excluded_dirs: Option<Vec<String>>,
    ignored_mode_predicates: Option<Vec<String>>,
    extra_detectors: Option<bool>,
    apostrophe_fix: Option<bool>,
    report_doublons: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BackendFile {
    kind: Option<BackendKind>,
    language: Option<String>,
    program: Option<String>,
    extra_args: Option<Vec<String>>,
    word_list: Option<PathBuf>,
    max_suggestions: Option<usize>,
}

/// Values given on the command line. They win over every file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub language: Option<String>,
    pub word_list: Option<PathBuf>,
    pub personal_dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub report_doublons: bool,
}

macro_rules! merge_fields {
    ($target:expr, $source:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $source.$field {
                $target.$field = value;
            }
        )+
    };
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::debug!("loading global config {}", global_path.display());
                config.merge(Self::read_file(&global_path)?);
            }
        }

        // An explicit --config replaces the local lookup
        match &overrides.config_file {
            Some(path) => config.merge(Self::read_file(path)?),
            None => {
                let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_path.exists() {
                    log::debug!("loading local config {}", local_path.display());
                    config.merge(Self::read_file(&local_path)?);
                }
            }
        }

        config.apply(overrides);

        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Self::default_personal_dict_path();
        }

        Ok(config)
    }

    /// Parse a config file on its own, over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::read_file(path)?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(backend) = file.backend {
            merge_fields!(
                self.backend,
                backend,
                kind,
                language,
                extra_args,
                max_suggestions,
            );
            if backend.program.is_some() {
                self.backend.program = backend.program;
            }
            if backend.word_list.is_some() {
                self.backend.word_list = backend.word_list;
            }
        }
        if file.personal_dictionary.is_some() {
            self.personal_dictionary = file.personal_dictionary;
        }
        merge_fields!(
            self,
            file,
            ignore_patterns,
            categories,
            extra_categories,
            plain_text,
            min_word_length,
            min_sub_word_length,
            max_sub_words,
            check_interval_ms,
            max_document_size,
            max_viewport_size,
            scan_mode,
            include_pattern,
            exclude_pattern,
            excluded_dirs,
            ignored_mode_predicates,
            extra_detectors,
            apostrophe_fix,
            report_doublons,
        );
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(kind) = overrides.backend {
            self.backend.kind = kind;
        }
        if let Some(language) = overrides.language {
            self.backend.language = language;
        }
        if overrides.word_list.is_some() {
            self.backend.word_list = overrides.word_list;
        }
        if overrides.personal_dictionary.is_some() {
            self.personal_dictionary = overrides.personal_dictionary;
        }
        self.ignore_patterns.extend(overrides.ignore_patterns);
        if overrides.report_doublons {
            self.report_doublons = true;
        }
    }

    pub fn acceptance(&self) -> AcceptanceSettings {
        AcceptanceSettings {
            min_word_length: self.min_word_length,
            min_sub_word_length: self.min_sub_word_length,
            max_sub_words: self.max_sub_words,
            extra_detectors: self.extra_detectors,
            apostrophe_fix: self.apostrophe_fix,
            ignored_mode_predicates: self.ignored_mode_predicates.iter().cloned().collect(),
        }
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::new(
            self.categories.iter().cloned(),
            self.extra_categories.iter().cloned(),
            self.plain_text,
        )
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            min_interval: Duration::from_millis(self.check_interval_ms),
            max_document_size: self.max_document_size,
            max_viewport_size: self.max_viewport_size,
            default_mode: self.scan_mode,
        }
    }

    pub fn report_filter(&self) -> ReportFilter {
        ReportFilter {
            report_doublons: self.report_doublons,
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "idspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "idspell").map(|dirs| dirs.config_dir().join("personal.txt"))
    }
}
