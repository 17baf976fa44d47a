use assert_cmd::Command;
use predicates::prelude::*;

fn coursedeck() -> Command {
    Command::cargo_bin("coursedeck").expect("binary exists")
}

#[test]
fn help_displays_usage() {
    coursedeck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn courses_lists_bookmarked_only() {
    coursedeck()
        .args(["courses", "--bookmarked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3D Design Illustration"))
        .stdout(predicate::str::contains("Intro to UI/UX Design"))
        .stdout(predicate::str::contains("Digital Entrepreneurship").not());
}

#[test]
fn courses_rejects_unknown_category() {
    coursedeck()
        .args(["courses", "--category", "astronomy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category 'astronomy'"));
}

#[test]
fn explicit_config_is_layered_in() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("extra.toml");
    std::fs::write(&path, "[defaults]\nseed_bookmarks = false\n").expect("write config");

    coursedeck()
        .args(["courses", "--bookmarked", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No courses match."));
}

#[test]
fn completions_are_generated() {
    coursedeck()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coursedeck"));
}
