//! Configuration integration tests.
//!
//! Each test builds a small project tree, runs the binary inside it and
//! checks the dictionary settings it ended up with, either through
//! `info --json` or through what a `scan` actually does.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Command running from inside `dir`.
fn cmd_in(dir: &Path) -> Command {
    let mut cmd = cmd();
    cmd.args(["-C", dir.to_str().unwrap()]);
    cmd
}

fn parse_success(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

/// Resolved config section of `info --json` run from `dir`.
fn settings(dir: &Path) -> Value {
    let output = cmd_in(dir)
        .args(["info", "--json"])
        .output()
        .expect("failed to run command");
    parse_success(&output)["config"].clone()
}

/// `scan <args> --json` run from `dir`.
fn scan_json(dir: &Path, args: &[&str]) -> Value {
    let output = cmd_in(dir)
        .arg("--json")
        .arg("scan")
        .args(args)
        .output()
        .expect("failed to run command");
    parse_success(&output)
}

fn write_dict(dir: &Path, lang: &str, entries: &Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{lang}_words.json")),
        entries.to_string(),
    )
    .unwrap();
}

fn words(report: &Value) -> Vec<&str> {
    report["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["word"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Where settings come from
// =============================================================================

#[test]
fn bare_directory_gets_dictionary_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = settings(tmp.path());

    assert!(config["config_file"].is_null());
    assert_eq!(config["dict_dir"], "public/dict");
    assert_eq!(config["languages"], json!(["uk", "en", "es"]));
    assert_eq!(config["default_language"], "uk");
    assert_eq!(config["short_max_len"], 2);
}

#[test]
fn project_config_found_from_nested_directory() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("tools").join("scripts");
    fs::create_dir_all(&deep).unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"assets/dict\"\ndefault_language = \"en\"\n",
    )
    .unwrap();

    let config = settings(&deep);
    assert_eq!(config["dict_dir"], "assets/dict");
    assert_eq!(config["default_language"], "en");
    let reported = config["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".dict-hygiene.toml"), "{reported}");
}

#[test]
fn dotfile_and_plain_name_both_apply() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"hidden\"\nshort_max_len = 3\n",
    )
    .unwrap();
    fs::write(tmp.path().join("dict-hygiene.toml"), "dict_dir = \"visible\"\n").unwrap();

    let config = settings(tmp.path());
    assert_eq!(config["dict_dir"], "visible");
    assert_eq!(config["short_max_len"], 3);
}

#[test]
fn polyglot_supplies_keys_the_tool_file_leaves_out() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("polyglot.toml"),
        "dict_dir = \"shared\"\nlanguages = [\"en\", \"pl\"]\n",
    )
    .unwrap();
    fs::write(tmp.path().join(".dict-hygiene.toml"), "dict_dir = \"mine\"\n").unwrap();

    let config = settings(tmp.path());
    assert_eq!(config["dict_dir"], "mine");
    assert_eq!(config["languages"], json!(["en", "pl"]));
}

#[test]
fn every_format_is_read() {
    let cases = [
        (".dict-hygiene.toml", "default_language = \"es\"\n"),
        (".dict-hygiene.yaml", "default_language: es\n"),
        (".dict-hygiene.yml", "default_language: es\n"),
        (".dict-hygiene.json", r#"{"default_language": "es"}"#),
    ];
    for (name, contents) in cases {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(name), contents).unwrap();
        assert_eq!(settings(tmp.path())["default_language"], "es", "{name}");
    }
}

#[test]
fn yaml_beats_toml_in_the_same_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "short_max_len = 3\ndefault_language = \"en\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join(".dict-hygiene.yaml"), "short_max_len: 5\n").unwrap();

    let config = settings(tmp.path());
    assert_eq!(config["short_max_len"], 5);
    assert_eq!(config["default_language"], "en");
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn nearest_directory_shadows_outer_one() {
    let tmp = TempDir::new().unwrap();
    let inner = tmp.path().join("inner");
    fs::create_dir_all(&inner).unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"outer\"\nshort_max_len = 4\n",
    )
    .unwrap();
    fs::write(inner.join(".dict-hygiene.toml"), "dict_dir = \"inner\"\n").unwrap();

    let config = settings(&inner);
    assert_eq!(config["dict_dir"], "inner");
    // The outer file is not merged at all.
    assert_eq!(config["short_max_len"], 2);
}

#[test]
fn explicit_file_layers_over_discovered_one() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"project\"\ndefault_language = \"en\"\n",
    )
    .unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, "default_language = \"es\"\n").unwrap();

    let output = cmd_in(tmp.path())
        .args(["--config", explicit.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    let config = &parse_success(&output)["config"];

    assert_eq!(config["default_language"], "es");
    assert_eq!(config["dict_dir"], "project");
    assert!(config["config_file"].as_str().unwrap().ends_with("ci.toml"));
}

#[test]
fn environment_beats_config_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "short_max_len = 3\ndefault_language = \"en\"\n",
    )
    .unwrap();

    let output = cmd_in(tmp.path())
        .env("DICT_HYGIENE_SHORT_MAX_LEN", "4")
        .env("DICT_HYGIENE_DEFAULT_LANGUAGE", "es")
        .args(["info", "--json"])
        .output()
        .expect("failed to run command");
    let config = &parse_success(&output)["config"];

    assert_eq!(config["short_max_len"], 4);
    assert_eq!(config["default_language"], "es");
}

#[test]
fn dict_dir_flag_beats_environment_and_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dict-hygiene.toml"), "dict_dir = \"from/file\"\n").unwrap();

    let output = cmd_in(tmp.path())
        .env("DICT_HYGIENE_DICT_DIR", "from/env")
        .args(["--dict-dir", "from/flag", "info", "--json"])
        .output()
        .expect("failed to run command");

    assert_eq!(parse_success(&output)["config"]["dict_dir"], "from/flag");
}

// =============================================================================
// Repository boundary
// =============================================================================

#[test]
fn search_stops_at_git_directory() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(tmp.path().join(".dict-hygiene.toml"), "dict_dir = \"outside\"\n").unwrap();

    let config = settings(&src);
    assert_eq!(config["dict_dir"], "public/dict");
    assert!(config["config_file"].is_null());
}

#[test]
fn config_next_to_git_directory_applies() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join("dict-hygiene.toml"), "languages = [\"en\"]\n").unwrap();

    let config = settings(&src);
    assert_eq!(config["languages"], json!(["en"]));
}

// =============================================================================
// Settings reaching the analyzers
// =============================================================================

#[test]
fn scan_reads_configured_dict_dir_and_default_language() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"words\"\ndefault_language = \"en\"\n",
    )
    .unwrap();
    write_dict(
        &tmp.path().join("words"),
        "en",
        &json!([{"word": "NASA", "freq": 5}, {"word": "moon", "freq": 9}]),
    );

    let report = scan_json(tmp.path(), &["case"]);
    assert_eq!(report["language"], "en");
    assert_eq!(report["total_scanned"], 2);
    assert_eq!(words(&report), ["NASA"]);
}

#[test]
fn configured_short_max_len_widens_short_scan() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"d\"\ndefault_language = \"en\"\nshort_max_len = 3\n",
    )
    .unwrap();
    write_dict(
        &tmp.path().join("d"),
        "en",
        &json!([
            {"word": "a", "freq": 1},
            {"word": "abc", "freq": 3},
            {"word": "abcd", "freq": 4}
        ]),
    );

    let report = scan_json(tmp.path(), &["short"]);
    assert_eq!(words(&report), ["abc", "a"]);
}

#[test]
fn languages_outside_the_list_are_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        "dict_dir = \"d\"\nlanguages = [\"en\"]\ndefault_language = \"en\"\n",
    )
    .unwrap();
    write_dict(&tmp.path().join("d"), "uk", &json!([{"word": "так", "freq": 1}]));

    cmd_in(tmp.path())
        .args(["scan", "case", "--lang", "uk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported language"));
}

#[test]
fn custom_alphabet_drives_non_linguistic_scan() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dict-hygiene.toml"),
        r#"
dict_dir = "d"
languages = ["pl"]
default_language = "pl"

[alphabets]
pl = "aąbcćdeęfghijklłmnńoóprsśtuwyzźż"
"#,
    )
    .unwrap();
    write_dict(
        &tmp.path().join("d"),
        "pl",
        &json!([{"word": "żółw", "freq": 10}, {"word": "quiz", "freq": 5}]),
    );

    let report = scan_json(tmp.path(), &["non-linguistic"]);
    assert_eq!(words(&report), ["quiz"]);
    assert_eq!(report["items"][0]["non_linguistic_chars"], "q");
}

// =============================================================================
// Broken config
// =============================================================================

#[test]
fn malformed_file_in_any_format_fails() {
    let cases = [
        (".dict-hygiene.toml", "dict_dir = [[["),
        (".dict-hygiene.yaml", "dict_dir:\n  - a\n b:\n[broken"),
        (".dict-hygiene.json", "{dict_dir: nope}"),
    ];
    for (name, contents) in cases {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(name), contents).unwrap();
        cmd_in(tmp.path())
            .arg("info")
            .assert()
            .failure()
            .stderr(predicate::str::contains("configuration"));
    }
}

#[test]
fn wrongly_typed_value_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dict-hygiene.toml"), "short_max_len = \"two\"\n").unwrap();

    cmd_in(tmp.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn unrelated_keys_are_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("polyglot.toml"),
        "dict_dir = \"shared\"\nformatter = \"other-tool\"\n[other_tool]\nwidth = 80\n",
    )
    .unwrap();

    assert_eq!(settings(tmp.path())["dict_dir"], "shared");
}
