//! Command-line behaviour of the `cellar` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir(&src, tmp.path());
    tmp
}

fn copy_dir(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn cellar(site: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cellar").unwrap();
    cmd.arg("--source")
        .arg(site)
        .arg("--temp-dir")
        .arg(site.join(".cellar-temp"));
    cmd
}

#[test]
fn check_lists_entries_and_succeeds() {
    let site = fixture_site();
    cellar(site.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("News (3 entries)"))
        .stdout(predicate::str::contains("Harvest Fest"))
        .stdout(predicate::str::contains("Stories (2 entries)"))
        .stdout(predicate::str::contains(
            "==> Content is valid: 3 news, 2 stories (1 draft)",
        ));
}

#[test]
fn check_writes_nothing() {
    let site = fixture_site();
    cellar(site.path()).arg("check").assert().success();
    assert!(!site.path().join(".cellar-temp").exists());
}

#[test]
fn scan_writes_manifest() {
    let site = fixture_site();
    cellar(site.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("001 Spring Release [pinned]"));

    let manifest = site.path().join(".cellar-temp/manifest.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(json["stories"]["entries"][0]["id"], "founders");
    assert_eq!(json["news"]["entries"][1]["data"]["date"], "2024-09-20");
    assert_eq!(json["site"]["hours"]["note"], "Closed Thanksgiving & Christmas");
    assert_eq!(
        json["site"]["address"]["full"],
        "1500 W. Main St, Vermillion, SD 57069"
    );
}

#[test]
fn invalid_document_fails_with_file_and_field() {
    let site = fixture_site();
    fs::write(
        site.path().join("src/content/news/bad-date.mdx"),
        "---\ntitle: Bad\ndescription: d\ndate: sometime soon\n---\n",
    )
    .unwrap();

    cellar(site.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad-date.mdx"))
        .stderr(predicate::str::contains("date:"))
        .stderr(predicate::str::contains("sometime soon"));
}

#[test]
fn invalid_config_fails() {
    let site = fixture_site();
    fs::write(site.path().join("config.toml"), "[content]\ndir = \"\"\n").unwrap();

    cellar(site.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("content.dir"));
}

#[test]
fn empty_project_is_valid() {
    let site = TempDir::new().unwrap();
    cellar(site.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("News (empty)"))
        .stdout(predicate::str::contains("0 news, 0 stories"));
}

#[test]
fn gen_config_prints_stock_config() {
    Command::cargo_bin("cellar")
        .unwrap()
        .arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[content]"))
        .stdout(predicate::str::contains("pattern = \"**/*.mdx\""));
}
