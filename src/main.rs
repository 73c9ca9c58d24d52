use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use idspell::backend::{self, BackendKind};
use idspell::cli::output::OutputFormat;
use idspell::cli::ConsoleSink;
use idspell::config::Overrides;
use idspell::{Batch, Config};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "idspell")]
#[command(version, about = "Spell-check comments, strings and identifiers", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Exit with code 1 if a typo is found
    #[arg(short, long)]
    kill_on_typo: bool,

    /// Report canonical absolute paths
    #[arg(long)]
    full_path: bool,

    /// Spell-checking backend (aspell, hunspell, wordlist)
    #[arg(short, long, env = "IDSPELL_BACKEND")]
    backend: Option<BackendKind>,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Word file for the wordlist backend, one word per line
    #[arg(long, value_name = "FILE")]
    word_list: Option<PathBuf>,

    /// Config file to use instead of ./.idspell.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Also report repeated words ("the the")
    #[arg(long)]
    report_doublons: bool,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "idspell", &mut io::stdout());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No paths specified. Use --help for usage information.");
    }

    let config = Config::load(Overrides {
        config_file: cli.config.clone(),
        backend: cli.backend,
        language: cli.language.clone(),
        word_list: cli.word_list.clone(),
        personal_dictionary: cli.personal_dict.clone(),
        ignore_patterns: cli.ignore_pattern.clone(),
        report_doublons: cli.report_doublons,
    })?;

    let backend = backend::open(&config.backend)?;
    if !backend.is_available() {
        log::warn!(
            "{} backend is not available, nothing will be checked",
            backend.kind()
        );
    }

    let colored = !cli.no_color;
    let mut sink = ConsoleSink::new(cli.format, colored);
    if cli.paths.iter().any(|p| p.is_dir()) {
        sink = sink.with_spinner();
    }

    let mut batch = Batch::from_config(&config, backend, sink)?.full_path(cli.full_path);
    let mut typo_found = false;
    for path in &cli.paths {
        if path.is_dir() {
            typo_found |= batch.check_directory(path);
        } else if path.exists() {
            typo_found |= batch.check_file(path);
        } else {
            log::warn!("File not found: {}", path.display());
        }
    }

    let files_checked = batch.files_checked();
    let mut sink = batch.into_sink();
    sink.finish(files_checked)?;

    if typo_found && cli.kill_on_typo {
        std::process::exit(1);
    }

    Ok(())
}
