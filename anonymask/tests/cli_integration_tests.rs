// anonymask/tests/cli_integration_tests.rs
//! Command-line integration tests for the `anonymask` binary.
//!
//! Each test runs the real executable with `assert_cmd`, feeding input on
//! stdin or through temporary files, and checks stdout, stderr and the exit
//! status. Tagger output is written to temporary JSON files the same way a
//! separate tagging step would produce it.

use anyhow::Result;
use assert_cmd::Command;
#[allow(unused_imports)]
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use test_log::test;

use strip_ansi_escapes::strip as strip_ansi_escapes_fn;

const RECORD: &str = "Mary Lee ate pasta. She met Anna.";

fn run_anonymask_command(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("anonymask").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("ANONYMASK_CONFIG");
    cmd.args(args);
    cmd.write_stdin(input.as_bytes());
    cmd.assert()
}

fn strip_ansi(s: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes_fn(s)).to_string()
}

/// Writes `contents` to `name` inside `dir` and returns the path as a string.
fn write_file(dir: &TempDir, name: &str, contents: &str) -> Result<String> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path.to_string_lossy().to_string())
}

fn source_flag(name: &str, path: &str) -> String {
    format!("{}={}", name, path)
}

#[test]
fn test_mask_with_single_source_from_stdin() -> Result<()> {
    let dir = TempDir::new()?;
    let spacy = write_file(
        &dir,
        "spacy.json",
        r#"[{"start": 0, "end": 4, "label": "PERSON"},
            {"start": 5, "end": 8, "label": "PERSON"},
            {"start": 28, "end": 32, "label": "PERSON"}]"#,
    )?;
    let source = source_flag("spacy", &spacy);

    run_anonymask_command(RECORD, &["mask", "--source", &source])
        .success()
        .stdout("[Name] ate pasta. She met [Name].\n");
    Ok(())
}

#[test]
fn test_two_sources_require_a_policy() -> Result<()> {
    let dir = TempDir::new()?;
    let a = write_file(&dir, "a.json", r#"[{"start": 28, "end": 32, "label": "PERSON"}]"#)?;
    let b = write_file(&dir, "b.json", r#"[{"word": "Anna", "label": "PER"}]"#)?;
    let (a, b) = (source_flag("a", &a), source_flag("b", &b));

    run_anonymask_command(RECORD, &["mask", "-s", &a, "-s", &b])
        .failure()
        .stderr(predicate::str::contains("combination policy"));

    run_anonymask_command(RECORD, &["mask", "-s", &a, "-s", &b, "--policy", "intersection"])
        .success()
        .stdout("Mary Lee ate pasta. She met [Name].\n");
    Ok(())
}

#[test]
fn test_union_of_span_and_token_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let spans = write_file(&dir, "spans.json", r#"[{"start": 28, "end": 32, "label": "PERSON"}]"#)?;
    let tokens = write_file(
        &dir,
        "tokens.json",
        r#"[{"word": "Mary", "label": "PERSON"}, {"word": "Lee", "label": "PERSON"}]"#,
    )?;
    let (a, b) = (source_flag("spacy", &spans), source_flag("nltk", &tokens));

    run_anonymask_command(RECORD, &["mask", "-s", &a, "-s", &b, "-p", "union"])
        .success()
        .stdout("[Name] ate pasta. She met [Name].\n");
    Ok(())
}

#[test]
fn test_categories_and_file_output() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_file(&dir, "note.txt", "NRIC S1234567A, phone 91008100.\n")?;
    let output = dir.path().join("masked.txt");
    let output_str = output.to_string_lossy().to_string();

    run_anonymask_command("", &["mask", "-i", &input, "-o", &output_str, "--category", "nric,3"])
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Masked output written to").and(predicate::str::contains("masked.txt")));

    assert_eq!(fs::read_to_string(&output)?, "NRIC [NRIC], phone [PHONE].\n");
    Ok(())
}

#[test]
fn test_custom_pattern_flag() {
    run_anonymask_command("Room 12 and room 7", &["mask", "--pattern", r"room \d+=>[ROOM]"])
        .success()
        .stdout("[ROOM] and [ROOM]\n");
}

#[test]
fn test_invalid_custom_pattern_fails_before_masking() {
    run_anonymask_command("anything", &["mask", "--pattern", "(open=>x"])
        .failure()
        .stderr(predicate::str::contains("Custom pattern #0"))
        .stdout("");
}

#[test]
fn test_unknown_category_fails() {
    run_anonymask_command("anything", &["mask", "--category", "email"])
        .failure()
        .stderr(predicate::str::contains("Unknown category 'email'"));
}

#[test]
fn test_config_file_supplies_policy_and_categories() -> Result<()> {
    let mut config = NamedTempFile::new()?;
    writeln!(config, "policy: union\ncategories: [phone]\nname_labels: [PATIENT]")?;
    let config_path = config.path().to_string_lossy().to_string();

    let dir = TempDir::new()?;
    let a = write_file(&dir, "a.json", r#"[{"start": 0, "end": 4, "label": "PATIENT"}]"#)?;
    let b = write_file(&dir, "b.json", r#"[{"start": 0, "end": 4, "label": "PERSON"}]"#)?;
    let (a, b) = (source_flag("a", &a), source_flag("b", &b));

    // PERSON is not a name label under this config, so only source "a" counts.
    run_anonymask_command("Anna 91008100", &["mask", "--config", &config_path, "-s", &a, "-s", &b])
        .success()
        .stdout("[Name] [PHONE]\n");
    Ok(())
}

#[test]
fn test_summary_goes_to_stderr_without_pii() -> Result<()> {
    let dir = TempDir::new()?;
    let spacy = write_file(&dir, "spacy.json", r#"[{"start": 28, "end": 32, "label": "PERSON"}]"#)?;
    let source = source_flag("spacy", &spacy);

    let assert = run_anonymask_command(RECORD, &["mask", "-s", &source, "--summary"]).success();
    let output = assert.get_output();
    let stdout = strip_ansi(&output.stdout);
    let stderr = strip_ansi(&output.stderr);

    assert_eq!(stdout, "Mary Lee ate pasta. She met [Name].\n");
    assert!(stderr.contains("Replacement Summary:"), "stderr was: {}", stderr);
    assert!(stderr.contains("name: 1 occurrence(s)"), "stderr was: {}", stderr);
    assert!(!stderr.contains("Anna"));
    Ok(())
}

#[test]
fn test_quiet_suppresses_summary() -> Result<()> {
    run_anonymask_command("91008100", &["--quiet", "mask", "-c", "phone", "--summary"])
        .success()
        .stdout("[PHONE]\n")
        .stderr("");
    Ok(())
}

#[test]
fn test_warns_when_nothing_is_selected() {
    let assert = run_anonymask_command("Anna 91008100", &["mask"]).success().stdout("Anna 91008100\n");
    let stderr = strip_ansi(&assert.get_output().stderr);
    assert!(stderr.starts_with("Warning: No sources, categories or patterns"), "stderr was: {}", stderr);

    run_anonymask_command("Anna 91008100", &["--quiet", "highlight"])
        .success()
        .stderr("");
}

#[test]
fn test_whitespace_input_is_passed_through() {
    run_anonymask_command("   ", &["mask", "-c", "1,2,3,4,5,6,7,8,9"])
        .success()
        .stdout("   \n");
}

#[test]
fn test_highlight_markup() -> Result<()> {
    let dir = TempDir::new()?;
    let spacy = write_file(&dir, "spacy.json", r#"[{"start": 0, "end": 4, "label": "PERSON"}]"#)?;
    let source = source_flag("spacy", &spacy);

    run_anonymask_command("Anna 91008100", &["highlight", "-s", &source, "-c", "phone", "--markup"])
        .success()
        .stdout(
            "Highlighted:\n\
             <mark data-kind=\"name\" style=\"color:red\">Anna</mark> \
             <mark data-kind=\"phone\" style=\"color:deepskyblue\">91008100</mark>\n\
             \n\
             Masked:\n\
             [Name] [PHONE]\n",
        );
    Ok(())
}

#[test]
fn test_highlight_plain_when_not_a_terminal() {
    run_anonymask_command("tel 91008100", &["highlight", "-c", "phone"])
        .success()
        .stdout("Highlighted:\ntel 91008100\n\nMasked:\ntel [PHONE]\n");
}

#[test]
fn test_highlight_json() -> Result<()> {
    let assert = run_anonymask_command("tel 91008100", &["highlight", "-c", "phone", "--json"]).success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["masked"], "tel [PHONE]");
    assert_eq!(value["segments"][1]["text"], "91008100");
    assert_eq!(value["segments"][1]["marker"]["color"], "deepskyblue");
    assert!(value["segments"][0]["marker"].is_null());
    Ok(())
}

#[test]
fn test_categories_command_lists_catalogue() {
    run_anonymask_command("", &["categories"])
        .success()
        .stdout(predicate::str::contains("case_number"))
        .stdout(predicate::str::contains("Patient Class:[Class]"));
}

#[test]
fn test_malformed_span_reports_source() -> Result<()> {
    let dir = TempDir::new()?;
    let bad = write_file(&dir, "bad.json", r#"[{"start": 0, "end": 400, "label": "PERSON"}]"#)?;
    let source = source_flag("flair", &bad);

    run_anonymask_command("Anna", &["mask", "-s", &source])
        .failure()
        .stderr(predicate::str::contains("flair"));
    Ok(())
}
