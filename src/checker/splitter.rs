//! Identifier splitting.
//!
//! A token is cut into runs of one character class, then every
//! upper-to-lower boundary is corrected so the last capital of an upper run
//! starts the following word: `"PDFL" "oader"` becomes `"PDF" "Loader"` and
//! `"W" "ord"` becomes `"Word"`. Classification is ASCII-only; every other
//! character (accented letters included) falls into [`CharClass::Other`].

/// Upper bound on the number of runs a single token is cut into.
pub const DEFAULT_MAX_RUNS: usize = 64;

/// Minimum length of a sub-word worth sending to a backend.
pub const DEFAULT_MIN_SUB_WORD_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        match ch {
            'a'..='z' => Self::Lower,
            'A'..='Z' => Self::Upper,
            '0'..='9' => Self::Digit,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    class: CharClass,
    start: usize,
    end: usize,
}

/// Split `word` into sub-words using the default run cap.
pub fn split(word: &str) -> Vec<&str> {
    split_with_limit(word, DEFAULT_MAX_RUNS)
}

/// Split `word` into at most `max_runs` class-homogeneous sub-words.
///
/// Characters that would open a run past the cap are dropped, so a
/// pathological token is truncated instead of rejected.
pub fn split_with_limit(word: &str, max_runs: usize) -> Vec<&str> {
    let mut runs: Vec<Run> = Vec::new();

    for (idx, ch) in word.char_indices() {
        let class = CharClass::of(ch);
        let end = idx + ch.len_utf8();
        let full = runs.len() >= max_runs;
        match runs.last_mut() {
            Some(run) if run.class == class => run.end = end,
            _ if full => break,
            _ => runs.push(Run {
                class,
                start: idx,
                end,
            }),
        }
    }

    // Upper letters are single bytes, so moving one across is a one byte shift.
    for i in 1..runs.len() {
        let (left, right) = (runs[i - 1], runs[i]);
        if left.class == CharClass::Upper
            && right.class == CharClass::Lower
            && left.end > left.start
        {
            runs[i - 1].end -= 1;
            runs[i].start -= 1;
        }
    }

    runs.into_iter()
        .filter(|run| run.end > run.start)
        .map(|run| &word[run.start..run.end])
        .collect()
}

/// Returns the sub-word when it is worth a backend lookup, `""` otherwise.
///
/// Short sub-words and anything carrying digits or punctuation are dropped.
pub fn handle_sub_word(sub_word: &str, min_length: usize) -> &str {
    if sub_word.len() < min_length || !sub_word.bytes().all(|b| b.is_ascii_alphabetic()) {
        ""
    } else {
        sub_word
    }
}

/// The sub-words that survive [`handle_sub_word`], in order.
pub fn retained<'a>(sub_words: &[&'a str], min_length: usize) -> Vec<&'a str> {
    sub_words
        .iter()
        .map(|&sub| handle_sub_word(sub, min_length))
        .filter(|sub| !sub.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acronym_boundaries() {
        assert_eq!(split("PDFLoader"), vec!["PDF", "Loader"]);
        assert_eq!(split("myHTMLParser"), vec!["my", "HTML", "Parser"]);
        assert_eq!(split("simpleWord"), vec!["simple", "Word"]);
        assert_eq!(split("ID3Tag"), vec!["ID", "3", "Tag"]);
    }

    #[test]
    fn test_pascal_and_snake_case() {
        assert_eq!(split("HelloWorld"), vec!["Hello", "World"]);
        assert_eq!(split("Hello"), vec!["Hello"]);
        assert_eq!(split("snake_case_name"), vec!["snake", "_", "case", "_", "name"]);
        assert_eq!(split("MAX_SIZE"), vec!["MAX", "_", "SIZE"]);
    }

    #[test]
    fn test_single_class_is_unchanged() {
        for word in ["lowercase", "UPPER", "12345", "--->"] {
            assert_eq!(split(word), vec![word]);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(split("").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_other() {
        assert_eq!(CharClass::of('é'), CharClass::Other);
        assert_eq!(split("caféMenu"), vec!["caf", "é", "Menu"]);
    }

    #[test]
    fn test_run_cap_truncates() {
        let word = "aB".repeat(100);
        let parts = split_with_limit(&word, 4);
        assert_eq!(parts, vec!["a", "Ba", "B"]);

        let parts = split(&word);
        assert!(parts.len() <= DEFAULT_MAX_RUNS);
        assert!(split_with_limit("abc", 0).is_empty());
    }

    #[test]
    fn test_handle_sub_word() {
        assert_eq!(handle_sub_word("ab", 3), "");
        assert_eq!(handle_sub_word("abc", 3), "abc");
        assert_eq!(handle_sub_word("ab3", 3), "");
        assert_eq!(handle_sub_word("_", 3), "");
    }

    #[test]
    fn test_retained() {
        let parts = split("myHTMLParser");
        assert_eq!(retained(&parts, 3), vec!["HTML", "Parser"]);

        let parts = split("ID3Tag");
        assert_eq!(retained(&parts, 3), vec!["Tag"]);
    }

    #[test]
    fn test_retained_around_accents() {
        assert_eq!(retained(&split("résumée"), 3), vec!["sum"]);
        assert!(retained(&split("naïv"), 3).is_empty());
    }
}
