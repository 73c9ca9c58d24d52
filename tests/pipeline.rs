use idspell::backend::{Backend, WordListBackend};
use idspell::checker::category::CategoryFilter;
use idspell::checker::pipeline::AcceptanceSettings;
use idspell::checker::ReportFilter;
use idspell::checker::scheduler::SchedulerSettings;
use idspell::host::{Mode, SourceLang};
use idspell::{
    Buffer, CheckOutcome, Document, RegionSpeller, ScanMode, Scheduler, VerdictKind,
    WordAcceptance,
};
use std::rc::Rc;

const WORDS: &[&str] = &[
    "fn", "main", "let", "greeting", "say", "hello", "world", "println", "correct", "variable",
];

fn setup() -> (Scheduler, RegionSpeller) {
    let backend: Rc<dyn Backend> = Rc::new(WordListBackend::from_words(WORDS, 5).unwrap());
    let acceptance = WordAcceptance::new(
        AcceptanceSettings::default(),
        CategoryFilter::default(),
        Rc::clone(&backend),
    );
    (
        Scheduler::new(SchedulerSettings::default(), backend),
        RegionSpeller::new(acceptance, ReportFilter::default()),
    )
}

#[test]
fn comment_and_string_typos_are_reported_in_order() {
    let text = "fn main() {\n    // say helle\n    let greeting = \"worlde\";\n    println!(\"{}\", greeting);\n}\n";
    let mut doc = Document::new(text, Mode::Source(SourceLang::Rust));
    let (mut scheduler, mut speller) = setup();

    let outcome = scheduler.maybe_check(&mut doc, &mut speller);
    assert_eq!(
        outcome,
        CheckOutcome::Checked {
            mode: ScanMode::Normal,
            range: 0..text.len(),
            findings: 2,
        }
    );

    let typos: Vec<_> = doc
        .findings()
        .iter()
        .filter(|f| f.kind == VerdictKind::Typo)
        .map(|f| (f.word.as_str(), f.start))
        .collect();
    assert_eq!(
        typos,
        vec![
            ("helle", text.find("helle").unwrap()),
            ("worlde", text.find("worlde").unwrap()),
        ]
    );

    let first = doc.next_typo(0).unwrap();
    assert_eq!(first.word, "helle");
    assert!(first.suggestions.contains(&"hello".to_string()));
    let second = doc.next_typo(first.end).unwrap();
    assert_eq!(second.word, "worlde");
    assert!(doc.next_typo(second.end).is_none());
}

#[test]
fn misspelled_compound_identifier_is_flagged() {
    let text = "let correcVariable = 1;\nlet correctVariable = 2;\n";
    let mut doc = Document::new(text, Mode::Source(SourceLang::Rust));
    let (mut scheduler, mut speller) = setup();

    assert!(scheduler.maybe_check(&mut doc, &mut speller).is_checked());

    let words: Vec<_> = doc.findings().iter().map(|f| f.word.as_str()).collect();
    assert_eq!(words, vec!["correcVariable"]);
}

#[test]
fn second_check_within_interval_is_debounced() {
    let mut doc = Document::new("// helle", Mode::Source(SourceLang::Rust));
    let (mut scheduler, mut speller) = setup();

    assert!(scheduler.maybe_check(&mut doc, &mut speller).is_checked());
    assert!(!scheduler.maybe_check(&mut doc, &mut speller).is_checked());
    assert_eq!(doc.findings().len(), 1);
}

#[test]
fn markdown_code_and_links_are_skipped() {
    let text = "# Say hello\n\nSay helle to the `wrold` at <https://wrold.example>.\n\n```\nlet wrold = 1;\n```\n";
    let mut doc = Document::new(text, Mode::Markdown);
    let (mut scheduler, mut speller) = setup();

    assert!(scheduler.maybe_check(&mut doc, &mut speller).is_checked());

    let words: Vec<_> = doc.findings().iter().map(|f| f.word.as_str()).collect();
    assert_eq!(words, vec!["helle", "to", "the", "at"]);
}

#[test]
fn fast_mode_only_checks_the_viewport() {
    let text = "// helle\n// wrold\n";
    let viewport = text.find("wrold").unwrap()..text.len();
    let mut doc = Document::new(text, Mode::Source(SourceLang::Rust)).with_viewport(viewport);
    let (mut scheduler, mut speller) = setup();

    scheduler.set_mode(doc.id(), ScanMode::Fast);
    assert!(scheduler.maybe_check(&mut doc, &mut speller).is_checked());

    let words: Vec<_> = doc.findings().iter().map(|f| f.word.as_str()).collect();
    assert_eq!(words, vec!["wrold"]);
}

#[test]
fn accented_words_are_checked_whole() {
    let backend: Rc<dyn Backend> =
        Rc::new(WordListBackend::from_words(["my", "résumé", "sum"], 5).unwrap());
    let acceptance = WordAcceptance::new(
        AcceptanceSettings::default(),
        CategoryFilter::default(),
        Rc::clone(&backend),
    );
    let mut scheduler = Scheduler::new(SchedulerSettings::default(), backend);
    let mut speller = RegionSpeller::new(acceptance, ReportFilter::default());
    let text = "// my résumée naïv\n// my résumé\n";
    let mut doc = Document::new(text, Mode::Source(SourceLang::Rust));

    assert!(scheduler.maybe_check(&mut doc, &mut speller).is_checked());

    let words: Vec<_> = doc.findings().iter().map(|f| f.word.as_str()).collect();
    assert_eq!(words, vec!["résumée", "naïv"]);
}
