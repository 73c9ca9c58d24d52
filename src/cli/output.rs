use crate::TypoReport;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_typos: usize,
    typos: &'a [TypoReport],
}

/// Print the typos of one file as text.
pub fn print_typos(file_path: &Path, typos: &[TypoReport], colored_output: bool) {
    if typos.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for typo in typos {
        let line_info = format!("{}:{}", typo.line, typo.column);

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                typo.word.red().bold(),
                format_context(&typo.context, &typo.word, colored_output)
            );

            if !typo.suggestions.is_empty() {
                let suggestions = typo
                    .suggestions
                    .iter()
                    .map(|s| s.green().to_string())
                    .collect::<Vec<_>>()
                    .join(&", ".dimmed().to_string());
                println!("    {} {}", "→".dimmed(), suggestions);
            }
        } else {
            println!("  {} {} {}", line_info, typo.word, typo.context);

            if !typo.suggestions.is_empty() {
                println!("    → {}", typo.suggestions.join(", "));
            }
        }
    }
}

/// One JSON document for the whole run.
pub fn print_json_report(files_checked: usize, typos: &[TypoReport]) -> serde_json::Result<()> {
    let output = JsonOutput {
        files_checked,
        total_typos: typos.len(),
        typos,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn format_context(context: &str, word: &str, colored: bool) -> String {
    if colored {
        context.replace(word, &word.red().bold().to_string())
    } else {
        context.to_string()
    }
}

pub fn print_check_summary(
    total_typos: usize,
    files_with_typos: usize,
    files_checked: usize,
    colored: bool,
) {
    println!();
    if total_typos == 0 {
        let message = format!(
            "✓ No typos found in {} {}",
            files_checked,
            plural(files_checked, "file", "files")
        );
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
        return;
    }

    let typo_word = plural(total_typos, "typo", "typos");
    let file_word = plural(files_with_typos, "file", "files");
    if colored {
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total_typos.to_string().red().bold(),
            typo_word,
            files_with_typos,
            file_word
        );
    } else {
        println!(
            "✗ {} {} found in {} {}",
            total_typos, typo_word, files_with_typos, file_word
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_context() {
        assert_eq!(format_context("a helo b", "helo", false), "a helo b");
        assert_eq!(plural(1, "file", "files"), "file");
        assert_eq!(plural(0, "file", "files"), "files");
    }
}
