use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[allow(deprecated)]
fn get_fireprofile_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("fireprofile")
}

fn write_config(dir: &Path, rules: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("config.json");
    let rules: Vec<_> = rules
        .iter()
        .map(|(pattern, profile)| serde_json::json!({"pattern": pattern, "profileId": profile}))
        .collect();
    let config = serde_json::json!({
        "profiles": [
            {"id": "P1", "name": "Personal", "command": ["firefox", "-P", "personal", "%u"]},
            {"id": "P2", "name": "Work", "command": ["firefox", "-P", "work"]}
        ],
        "rules": rules
    });
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn fireprofile(config: &Path) -> Command {
    let mut cmd = Command::new(get_fireprofile_bin());
    cmd.env("FIREPROFILE_CONFIG", config);
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::new(get_fireprofile_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Open URLs in the right Firefox profile"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--config-file"));
}

#[test]
fn test_exact_rule_beats_wildcard() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[("*.example.com", "P1"), ("mail.example.com", "P2")]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://mail.example.com/inbox");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("firefox -P work"))
        .stdout(predicate::str::contains("mail.example.com/inbox"));
}

#[test]
fn test_wildcard_rule_substitutes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[("*.example.com", "P1")]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://deep.sub.example.com/");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("firefox -P personal"))
        .stdout(predicate::str::contains("%u").not());
}

#[test]
fn test_invalid_url_fails_without_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("not a url");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"))
        .stderr(predicate::str::contains("Open it with which profile").not());
}

#[test]
fn test_no_match_cancelled_at_selector() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://anything.com").write_stdin("q\n");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No rule for"))
        .stderr(predicate::str::contains("nothing was opened"));
}

#[test]
fn test_no_match_end_of_input_cancels() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://anything.com");

    cmd.assert().failure();
}

#[test]
fn test_remembered_choice_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://new.com/").write_stdin("2\ny\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("firefox -P work"))
        .stdout(predicate::str::contains("https://new.com/"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(
        saved["rules"],
        serde_json::json!([{"pattern": "new.com", "profileId": "P2"}])
    );

    // Second run resolves from the saved rule without prompting
    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://new.com/other");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("firefox -P work"))
        .stdout(predicate::str::contains("https://new.com/other"));
}

#[test]
fn test_choice_not_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://new.com/").write_stdin("1\nn\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("firefox -P personal"))
        .stdout(predicate::str::contains("https://new.com/"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["rules"], serde_json::json!([]));
}

#[test]
fn test_malformed_config_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{\"profiles\": [").unwrap();

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://example.com");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"))
        .stderr(predicate::str::contains("config.json"));

    assert_eq!(fs::read_to_string(&config).unwrap(), "{\"profiles\": [");
}

#[test]
fn test_no_profiles_configured() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.json");

    let mut cmd = fireprofile(&config);
    cmd.arg("--dry-run").arg("https://example.com");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_launch_failure_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let document = serde_json::json!({
        "profiles": [{"id": "p", "name": "Broken", "command": ["/nonexistent/fireprofile-browser"]}],
        "rules": [{"pattern": "example.com", "profileId": "p"}]
    });
    fs::write(&config, document.to_string()).unwrap();

    let mut cmd = fireprofile(&config);
    cmd.arg("https://example.com");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch"))
        .stderr(predicate::str::contains("os error"));
}

#[test]
fn test_config_conflicts_with_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[]);

    let mut cmd = fireprofile(&config);
    cmd.arg("--config").arg("https://example.com");

    cmd.assert().failure();
}
