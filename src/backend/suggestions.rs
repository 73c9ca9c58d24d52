use crate::backend::wordlist::WordListBackend;

/// Suggest replacements for a lowercase `word`, closest first.
///
/// Candidates share the first two letters of the word, then single edits
/// (deletions, adjacent swaps) are tried for words whose start is wrong.
pub fn generate(word: &str, dictionary: &WordListBackend, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 || word.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, String)> = Vec::new();

    let prefix: String = word.chars().take(2).collect();
    for candidate in dictionary.words_with_prefix(&prefix) {
        let distance = edit_distance(word, &candidate);
        if distance <= 2 {
            ranked.push((distance, candidate));
        }
    }

    for candidate in single_edits(word) {
        if dictionary.contains(&candidate) && !ranked.iter().any(|(_, w)| *w == candidate) {
            ranked.push((1, candidate));
        }
    }

    ranked.sort();
    ranked
        .into_iter()
        .map(|(_, w)| w)
        .take(max_suggestions)
        .collect()
}

/// Levenshtein distance over chars, one row at a time.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b.len()]
}

fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::with_capacity(chars.len() * 2);

    for i in 0..chars.len() {
        let mut deleted = chars.clone();
        deleted.remove(i);
        edits.push(deleted.into_iter().collect());
    }

    for i in 1..chars.len() {
        let mut swapped = chars.clone();
        swapped.swap(i - 1, i);
        edits.push(swapped.into_iter().collect());
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("hello", "hello"), 0);
        assert_eq!(edit_distance("helle", "hello"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_generate_ranks_by_distance() {
        let dict =
            WordListBackend::from_words(["hello", "help", "hull", "world", "ehllo"], 5).unwrap();
        let suggestions = generate("helle", &dict, 5);
        assert_eq!(suggestions[0], "hello");
        assert!(suggestions.contains(&"help".to_string()));
        assert!(!suggestions.contains(&"world".to_string()));
    }

    #[test]
    fn test_generate_catches_wrong_start() {
        let dict = WordListBackend::from_words(["hello"], 5).unwrap();
        assert_eq!(generate("ehllo", &dict, 5), vec!["hello"]);
    }
}
