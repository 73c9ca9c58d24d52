use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const WORDS: &str = "fn\nmain\nsay\nhello\nworld\nlet\ngreeting\nall\nfine\n";

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("words.txt"), WORDS).unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/main.rs"),
        "fn main() {\n    // say helle\n    let greeting = \"world\";\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "All fine\n").unwrap();
    dir
}

fn idspell(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("idspell").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("IDSPELL_BACKEND")
        .args(["--backend", "wordlist", "--word-list", "words.txt", "--no-color"]);
    cmd
}

#[test]
fn reports_typos_and_exits_zero_by_default() {
    let dir = fixture();
    idspell(&dir)
        .arg("src")
        .assert()
        .success()
        .stdout(predicate::str::contains("2:12 helle"))
        .stdout(predicate::str::contains("1 typo found in 1 file"));
}

#[test]
fn kill_on_typo_sets_exit_code() {
    let dir = fixture();
    idspell(&dir).args(["-k", "src/main.rs"]).assert().code(1);
    idspell(&dir).args(["-k", "README.md"]).assert().success();
}

#[test]
fn json_output() {
    let dir = fixture();
    let output = idspell(&dir)
        .args(["--format", "json", "."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_checked"], 3);
    assert_eq!(report["total_typos"], 1);
    assert_eq!(report["typos"][0]["word"], "helle");
    assert_eq!(report["typos"][0]["line"], 2);
}

#[test]
fn local_config_is_picked_up() {
    let dir = fixture();
    fs::write(dir.path().join(".idspell.toml"), "ignore_patterns = [\"^hel\"]\n").unwrap();
    idspell(&dir)
        .args(["-k", "src/main.rs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No typos found"));
}

#[test]
fn wordlist_backend_needs_a_word_list() {
    let dir = fixture();
    Command::cargo_bin("idspell")
        .unwrap()
        .current_dir(dir.path())
        .args(["--backend", "wordlist", "README.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("word list"));
}

#[test]
fn completion_script() {
    Command::cargo_bin("idspell")
        .unwrap()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("idspell"));
}
