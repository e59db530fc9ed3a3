mod common;

use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{feed, nufetch_cmd};

#[test]
fn test_fetch_downloads_resolved_packages() {
    let home = TempDir::new().unwrap();
    let feed = feed();
    let out = TempDir::new().unwrap();

    nufetch_cmd(home.path())
        .args(["fetch", "A", "--source"])
        .arg(feed.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("2 downloaded"));

    assert_eq!(
        fs::read_to_string(out.path().join("a.1.1.0.nupkg")).unwrap(),
        "A 1.1.0"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("b.1.0.0.nupkg")).unwrap(),
        "B 1.0.0"
    );
}

#[test]
fn test_fetch_skips_existing_unless_forced() {
    let home = TempDir::new().unwrap();
    let feed = feed();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("b.1.0.0.nupkg"), "stale").unwrap();

    nufetch_cmd(home.path())
        .args(["fetch", "A", "--source"])
        .arg(feed.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 up-to-date"));
    assert_eq!(
        fs::read_to_string(out.path().join("b.1.0.0.nupkg")).unwrap(),
        "stale"
    );

    nufetch_cmd(home.path())
        .args(["fetch", "A", "--force", "--source"])
        .arg(feed.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(out.path().join("b.1.0.0.nupkg")).unwrap(),
        "B 1.0.0"
    );
}

#[test]
fn test_fetch_failure_writes_nothing_for_unresolvable_roots() {
    let home = TempDir::new().unwrap();
    let feed = feed();
    let out = TempDir::new().unwrap();

    nufetch_cmd(home.path())
        .args(["fetch", "Pinned", "--source"])
        .arg(feed.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure();

    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_fetch_rejects_zero_jobs() {
    let home = TempDir::new().unwrap();

    nufetch_cmd(home.path())
        .args(["fetch", "A", "--jobs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs"));
}
