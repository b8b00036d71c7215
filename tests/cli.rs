//! Binary-level tests: exit codes and console output.

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use common::project;
use predicates::prelude::*;
use std::path::Path;

/// Bundler that copies its stdin descriptor to the output path, failing for `fail_on`.
fn write_config(root: &Path, outputs: &[&str], fail_on: Option<&str>) {
    let script = match fail_on {
        Some(name) => format!(
            "case \"$0\" in */{name}) printf \"E: %s\\n\" broken >&2; exit 2;; esac; cat > \"$0\""
        ),
        None => "cat > \"$0\"".to_string(),
    };

    let mut text = format!(
        "[bundler]\ncommand = [\"sh\", \"-c\", {}]\ntimeout_secs = 30\n",
        toml_string(&script)
    );
    for output in outputs {
        text.push_str(&format!("\n[[bundle]]\noutput = \"{output}\"\n"));
    }
    std::fs::write(root.join("release.toml"), text).unwrap();
}

fn toml_string(s: &str) -> String {
    format!("'{s}'")
}

fn dist_release(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dist_release").unwrap();
    cmd.arg("--root").arg(root).env_remove("RUST_LOG");
    cmd
}

#[test]
fn successful_run_exits_zero() {
    let dir = project("1.2.3");
    write_config(dir.path(), &["index.js", "cli.js"], None);

    dist_release(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(" Building packages "))
        .stdout(predicate::str::contains("index.js"))
        .stdout(predicate::str::contains(" DONE ").count(2))
        .stdout(predicate::str::contains("FAIL").not());

    let built = std::fs::read_to_string(dir.path().join("dist/index.js")).unwrap();
    assert!(built.contains("\"output\":\"index.js\""));
    assert!(dir.path().join("dist/package.json").exists());
}

#[test]
fn progress_line_fills_default_width() {
    let dir = project("1.2.3");
    write_config(dir.path(), &["index.js"], None);

    let output = dist_release(dir.path()).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout
        .lines()
        .find(|l| l.starts_with("index.js"))
        .unwrap();
    assert_eq!(line.chars().count(), 80);
    assert!(line.ends_with(" DONE "));
}

#[test]
fn failing_bundle_exits_nonzero_and_skips_finalize() {
    let dir = project("1.2.3");
    write_config(dir.path(), &["index.js", "cli.js"], Some("cli.js"));

    dist_release(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(" DONE ").count(1))
        .stdout(predicate::str::contains(" FAIL "))
        .stderr(predicate::str::contains("E: broken").count(1));

    assert!(dir.path().join("dist/index.js").exists());
    assert!(!dir.path().join("dist/package.json").exists());
}

#[test]
fn missing_config_is_reported_once() {
    let dir = project("1.2.3");

    dist_release(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("release.toml").count(1));
}

#[test]
fn dist_dir_override() {
    let dir = project("1.2.3");
    write_config(dir.path(), &["index.js"], None);

    dist_release(dir.path())
        .args(["--dist-dir", "build"])
        .assert()
        .success();

    assert!(dir.path().join("build/index.js").exists());
    assert!(dir.path().join("build/package.json").exists());
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn relative_root_builds_inside_project() {
    let dir = project("1.2.3");
    write_config(dir.path(), &["index.js", "bin/prettier.js"], None);
    let parent = dir.path().parent().unwrap();
    let name = dir.path().file_name().unwrap();

    let mut cmd = Command::cargo_bin("dist_release").unwrap();
    cmd.current_dir(parent)
        .arg("--root")
        .arg(name)
        .env_remove("RUST_LOG")
        .assert()
        .success();

    assert!(dir.path().join("dist/index.js").is_file());
    assert!(dir.path().join("dist/bin/prettier.js").is_file());
    assert!(dir.path().join("dist/package.json").is_file());
    assert!(!dir.path().join(name).exists());
}
