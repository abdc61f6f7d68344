//! CLI command integration tests.
//! Each test uses a temp directory via BLISS_DATA_DIR and runs offline.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bliss_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bliss").unwrap();
    cmd.env("BLISS_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd.arg("--offline");
    cmd
}

fn stdout_of(dir: &TempDir, args: &[&str]) -> String {
    let output = bliss_cmd(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "bliss {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn today_is_stable_within_a_day() {
    let dir = TempDir::new().unwrap();
    let first = stdout_of(&dir, &["today"]);
    let second = stdout_of(&dir, &["today"]);
    assert!(first.contains('—'));
    assert_eq!(first, second);
}

#[test]
fn today_counts_one_read() {
    let dir = TempDir::new().unwrap();
    stdout_of(&dir, &["today"]);
    stdout_of(&dir, &["today"]);
    bliss_cmd(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("quotes read:   1"))
        .stdout(predicate::str::contains("days active:   1"));
}

#[test]
fn random_by_source() {
    let dir = TempDir::new().unwrap();
    for _ in 0..3 {
        bliss_cmd(&dir)
            .args(["random", "--source", "buddha"])
            .assert()
            .success()
            .stdout(predicate::str::contains("— Buddha"));
    }
}

#[test]
fn random_unknown_category_still_answers() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["random", "--category", "nonexistent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("—"));
}

#[test]
fn random_remote_offline_reports_fallback() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["random", "--remote"])
        .assert()
        .success()
        .stderr(predicate::str::contains("offline"));
}

#[test]
fn favorite_twice_keeps_one() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["favorite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quote has been shown"));

    stdout_of(&dir, &["today"]);
    bliss_cmd(&dir)
        .arg("favorite")
        .assert()
        .success()
        .stdout(predicate::str::contains("added to favorites"));
    bliss_cmd(&dir)
        .arg("favorite")
        .assert()
        .success()
        .stdout(predicate::str::contains("already in favorites"));

    let listing = stdout_of(&dir, &["favorites"]);
    assert_eq!(listing.lines().filter(|l| l.contains("added ")).count(), 1);
}

#[test]
fn reflect_and_list() {
    let dir = TempDir::new().unwrap();
    stdout_of(&dir, &["today"]);
    bliss_cmd(&dir)
        .args(["reflect", "a quiet morning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reflection saved on"));
    bliss_cmd(&dir)
        .arg("reflections")
        .assert()
        .success()
        .stdout(predicate::str::contains("a quiet morning"));
    bliss_cmd(&dir)
        .args(["reflect", "   "])
        .assert()
        .failure();
}

#[test]
fn theme_persists() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .arg("theme")
        .assert()
        .success()
        .stdout("theme-ocean\n");
    bliss_cmd(&dir)
        .args(["theme", "forest"])
        .assert()
        .success()
        .stdout("theme-forest\n");
    bliss_cmd(&dir)
        .arg("theme")
        .assert()
        .success()
        .stdout("theme-forest\n");
    bliss_cmd(&dir).args(["theme", "neon"]).assert().failure();
}

#[test]
fn prefs_merge() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["prefs", "--font-size", "large", "--notifications", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fontSize\": \"large\""))
        .stdout(predicate::str::contains("\"notifications\": false"))
        .stdout(predicate::str::contains("\"theme\": \"theme-ocean\""));
}

#[test]
fn export_import_roundtrip() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let file = source.path().join("export.json");

    stdout_of(&source, &["today"]);
    stdout_of(&source, &["favorite"]);
    stdout_of(&source, &["reflect", "carried over"]);
    stdout_of(&source, &["theme", "cosmic"]);
    bliss_cmd(&source)
        .arg("export")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 reflections and 1 favorites"));

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(exported["version"], "1.0");
    assert!(exported["dailyQuote"]["quote"]["isDaily"].as_bool().unwrap());

    bliss_cmd(&target).arg("import").arg(&file).assert().success();
    assert_eq!(stdout_of(&target, &["theme"]), "theme-cosmic\n");
    assert!(stdout_of(&target, &["reflections"]).contains("carried over"));
    assert_eq!(
        stdout_of(&target, &["today"]),
        stdout_of(&source, &["today"])
    );
}

#[test]
fn import_bad_file_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.json");
    std::fs::write(&file, "not json").unwrap();
    bliss_cmd(&dir)
        .arg("import")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid export"));
}

#[test]
fn clear_resets_state() {
    let dir = TempDir::new().unwrap();
    stdout_of(&dir, &["theme", "sunset"]);
    bliss_cmd(&dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("all data cleared"));
    assert_eq!(stdout_of(&dir, &["theme"]), "theme-ocean\n");
}

#[test]
fn search_finds_passages() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["search", "DANCE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alan Watts"));
    bliss_cmd(&dir)
        .args(["search", "zzzz-nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no passages found)"));
}

#[test]
fn collection_from_config_file_degrades() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "collection = \"{}\"\n",
            dir.path().join("missing.json").display()
        ),
    )
    .unwrap();
    bliss_cmd(&dir)
        .arg("collection")
        .assert()
        .success()
        .stdout(predicate::str::contains("degraded:   true"));
}

#[test]
fn bundled_collection_is_not_degraded() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .arg("collection")
        .assert()
        .success()
        .stdout(predicate::str::contains("degraded:   false"))
        .stdout(predicate::str::contains("Buddha"));
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "offline = maybe").unwrap();
    bliss_cmd(&dir)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn offline_authors_use_fallback_list() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .arg("authors")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rumi"))
        .stderr(predicate::str::contains("offline list"));
}

#[test]
fn offline_tagged_uses_fallback_list() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["tagged", "present"])
        .assert()
        .success()
        .stdout(predicate::str::contains("— Thích Nhất Hạnh"))
        .stdout(predicate::str::contains("— Bill Keane"))
        .stdout(predicate::str::contains("Rumi").not())
        .stderr(predicate::str::contains("offline list"));

    bliss_cmd(&dir)
        .args(["tagged", "no-such-tag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no quotes found)"));

    bliss_cmd(&dir).arg("tagged").assert().failure();
}

#[test]
fn storage_reports_usage() {
    let dir = TempDir::new().unwrap();
    stdout_of(&dir, &["today"]);
    bliss_cmd(&dir)
        .arg("storage")
        .assert()
        .success()
        .stdout(predicate::str::contains("available:  true"));
}

#[test]
fn greet_needs_no_storage() {
    let dir = TempDir::new().unwrap();
    bliss_cmd(&dir)
        .args(["greet", "--name", "Sam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Good"))
        .stdout(predicate::str::contains("Sam"));
}
