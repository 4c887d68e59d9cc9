use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the binary against a store inside `dir` with no bundled corpus.
fn scripture(dir: &Path, args: &[&str]) -> Output {
    let store = dir.join("data").join("scripture.db");
    let asset = dir.join("assets").join("kjv.db");
    Command::new(env!("CARGO_BIN_EXE_scripture"))
        .arg("--store")
        .arg(&store)
        .arg("--asset")
        .arg(&asset)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scripture")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_source(path: &Path) {
    let conn = rusqlite::Connection::open(path).expect("failed to create source");
    conn.execute_batch(
        "CREATE TABLE web_books (id INTEGER, name TEXT);
         CREATE TABLE web_verses (id INTEGER, book_id INTEGER, chapter INTEGER, verse INTEGER, text TEXT);
         INSERT INTO web_books VALUES (1, 'Genesis');
         INSERT INTO web_verses VALUES (1, 1, 1, 1, 'In the beginning, God created the heavens and the earth.');
         INSERT INTO web_verses VALUES (2, 1, 1, 2, 'The earth was formless and empty.');",
    )
    .expect("failed to populate source");
}

// ---------------------------------------------------------------------------
// Status and lifecycle
// ---------------------------------------------------------------------------

#[test]
fn status_reports_ready_after_fallback_seed() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["--json", "status"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "READY");
    assert_eq!(report["book_count"], 66);
    assert!(
        report["diagnostic"]
            .as_str()
            .unwrap()
            .starts_with("Using built-in fallback data.")
    );
    assert!(dir.path().join("data").join("scripture.db").exists());
}

#[test]
fn seed_then_import_replaces_verses() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("web.db");
    write_source(&source);

    let seeded = scripture(dir.path(), &["--json", "seed"]);
    assert!(seeded.status.success(), "stderr: {}", stderr(&seeded));
    let seeded: serde_json::Value = serde_json::from_str(&stdout(&seeded)).unwrap();
    assert_eq!(seeded["degraded"], true);

    let imported = scripture(
        dir.path(),
        &["--json", "import", "--source", source.to_str().unwrap()],
    );
    assert!(imported.status.success(), "stderr: {}", stderr(&imported));
    let imported: serde_json::Value = serde_json::from_str(&stdout(&imported)).unwrap();
    assert_eq!(imported["degraded"], false);
    assert_eq!(imported["verses_imported"], 2);
    assert_eq!(imported["schema"]["translation_tag"], "web");
}

#[test]
fn detect_lists_source_tables() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("web.db");
    write_source(&source);

    let output = scripture(dir.path(), &["detect", "--source", source.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Strategy: prefixed"), "{text}");
    assert!(text.contains("web_books"));
    assert!(text.contains("web_verses (2 rows)"));
}

#[test]
fn detect_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.db");
    let output = scripture(dir.path(), &["detect", "--source", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("error: Failed to open source"));
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[test]
fn verse_prints_seeded_text() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["verse", "John", "3", "16"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("John 3:16 For God so loved the world"));
}

#[test]
fn missing_verse_is_marked_placeholder() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["verse", "Obadiah", "1", "4"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with("[placeholder]"));
}

#[test]
fn ref_resolves_aliases() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["--json", "ref", "1 Corinthians 10:13"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let verses: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(verses[0]["book_name"], "I Corinthians");
}

#[test]
fn ref_rejects_malformed_input() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["ref", "John three sixteen"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error:"));
}

#[test]
fn ref_rejects_chapter_outside_book() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["ref", "Jude 2:1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("has no chapter 2"), "{}", stderr(&output));
}

#[test]
fn short_search_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["--json", "search", "a"]);
    assert!(output.status.success());
    let verses: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(verses.as_array().unwrap().len(), 0);
}

#[test]
fn search_respects_limit() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["--json", "search", "LORD", "--limit", "2"]);
    assert!(output.status.success());
    let verses: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(verses.as_array().unwrap().len(), 2);
}

#[test]
fn books_lists_full_catalog() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["--json", "books"]);
    assert!(output.status.success());
    let books: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 66);
    assert_eq!(books[65]["name"], "Revelation");
}

#[test]
fn chapters_accepts_name_or_id() {
    let dir = TempDir::new().unwrap();
    let by_name = scripture(dir.path(), &["chapters", "Genesis"]);
    let by_id = scripture(dir.path(), &["chapters", "1"]);
    assert_eq!(stdout(&by_name).trim(), "50");
    assert_eq!(stdout(&by_id).trim(), "50");

    let unknown = scripture(dir.path(), &["chapters", "Hezekiah"]);
    assert!(!unknown.status.success());
}

#[test]
fn emergency_rejects_unknown_category() {
    let dir = TempDir::new().unwrap();
    let output = scripture(dir.path(), &["emergency", "boredom"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown emergency category"));

    let ok = scripture(dir.path(), &["emergency", "Anxiety"]);
    assert!(ok.status.success(), "stderr: {}", stderr(&ok));
    assert!(!stdout(&ok).trim().is_empty());
}

#[test]
fn daily_and_random_print_a_verse() {
    let dir = TempDir::new().unwrap();
    for command in ["daily", "random"] {
        let output = scripture(dir.path(), &[command]);
        assert!(output.status.success(), "{command}: {}", stderr(&output));
        assert!(!stdout(&output).contains("[placeholder]"));
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_file_sets_store_location() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("custom").join("store.db");
    let config = dir.path().join("scripture.yaml");
    let yaml = format!(
        r#"version: "1.0"
asset:
  bundled_path: {asset}
  local_path: {local}
store_path: {store}
import:
  batch_size: 50
"#,
        asset = dir.path().join("missing.db").display(),
        local = dir.path().join("custom").join("source.db").display(),
        store = store.display(),
    );
    fs::write(&config, yaml).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_scripture"))
        .arg("--config")
        .arg(&config)
        .arg("status")
        .output()
        .expect("failed to run scripture");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Status: READY"));
    assert!(store.exists());
}

#[test]
fn unreadable_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_scripture"))
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .arg("status")
        .output()
        .expect("failed to run scripture");
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("error: Failed to load config"));
}
