//! Integration tests for the `tick` CLI.
//!
//! Each test points `tick` at a temp data directory with `-D`, runs it as a
//! subprocess, and checks stdout and/or the files it leaves behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `tick` binary.
fn tick_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tick");
    path
}

fn run_tick(dir: &Path, args: &[&str]) -> Output {
    Command::new(tick_bin())
        .arg("-D")
        .arg(dir)
        .args(args)
        .env("COLORFGBG", "15;0")
        .env_remove("TICKLIST_DIR")
        .output()
        .expect("failed to run tick")
}

/// Run and return stdout, asserting success
fn tick(dir: &Path, args: &[&str]) -> String {
    let out = run_tick(dir, args);
    assert!(
        out.status.success(),
        "tick {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

/// A data directory with seeding disabled
fn empty_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[storage]\nseed_samples = false\n",
    )
    .unwrap();
    tmp
}

#[test]
fn first_run_seeds_samples() {
    let tmp = TempDir::new().unwrap();
    let out = tick(tmp.path(), &["list"]);
    assert!(out.contains("[x] Complete online JavaScript course"));
    assert!(out.contains("[ ] Jog around the park 3x"));
    assert!(out.contains("5 items left"));
    // the seed is written on first load
    assert!(tmp.path().join("tasks").exists());
}

#[test]
fn add_toggle_list() {
    let tmp = empty_dir();
    assert_eq!(tick(tmp.path(), &["list"]).trim(), "no tasks");

    assert_eq!(tick(tmp.path(), &["add", "Buy", "milk"]).trim(), "added 1: Buy milk");
    tick(tmp.path(), &["add", "Walk dog"]);
    assert_eq!(tick(tmp.path(), &["toggle", "1"]).trim(), "completed: Buy milk");

    let out = tick(tmp.path(), &["list", "--filter", "active"]);
    assert!(out.contains("  2 [ ] Walk dog"));
    assert!(!out.contains("Buy milk"));
    assert!(out.contains("1 item left"));
}

#[test]
fn tasks_file_is_a_json_array() {
    let tmp = empty_dir();
    tick(tmp.path(), &["add", "one"]);
    let raw = fs::read_to_string(tmp.path().join("tasks")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let tasks = value.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["content"], "one");
    assert_eq!(tasks[0]["checked"], false);
    assert!(tasks[0]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn rm_clear_and_mv() {
    let tmp = empty_dir();
    for text in ["a", "b", "c", "d"] {
        tick(tmp.path(), &["add", text]);
    }
    assert_eq!(tick(tmp.path(), &["mv", "1", "3"]).trim(), "moved to 3: a");
    assert_eq!(tick(tmp.path(), &["rm", "1"]).trim(), "deleted: b");

    tick(tmp.path(), &["toggle", "1"]);
    tick(tmp.path(), &["toggle", "2"]);
    assert_eq!(tick(tmp.path(), &["clear"]).trim(), "cleared 2 completed tasks");

    let out = tick(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let tasks = value["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["content"], "d");
}

#[test]
fn unknown_task_fails() {
    let tmp = empty_dir();
    let out = run_tick(tmp.path(), &["toggle", "7"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no task matches"));
}

#[test]
fn theme_commands() {
    let tmp = empty_dir();
    assert_eq!(tick(tmp.path(), &["theme"]).trim(), "auto (dark)");
    // auto flips to the opposite of what the terminal shows
    assert_eq!(tick(tmp.path(), &["theme", "cycle"]).trim(), "light");
    assert_eq!(
        fs::read_to_string(tmp.path().join("color-theme")).unwrap(),
        "light"
    );
    assert_eq!(tick(tmp.path(), &["theme", "set", "dark"]).trim(), "dark");

    let out = run_tick(tmp.path(), &["theme", "set", "sepia"]);
    assert!(!out.status.success());
}

#[test]
fn malformed_tasks_are_recovered() {
    let tmp = empty_dir();
    fs::write(tmp.path().join("tasks"), "{oops").unwrap();

    let out = run_tick(tmp.path(), &["list"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unreadable"));

    let log = tick(tmp.path(), &["recovery"]);
    assert!(log.contains("{oops"));
    assert_eq!(tick(tmp.path(), &["recovery", "prune", "--all"]).trim(), "pruned 1 entry");
    assert_eq!(tick(tmp.path(), &["recovery"]).trim(), "no recovery entries");
}

#[test]
fn non_utf8_tasks_file_is_kept() {
    let tmp = empty_dir();
    let bytes: &[u8] = b"[{\"id\":\"a\",\"content\":\"caf\xE9 run\",\"checked\":false}]";
    fs::write(tmp.path().join("tasks"), bytes).unwrap();

    let out = run_tick(tmp.path(), &["list"]);
    assert!(out.status.success());
    assert_eq!(fs::read(tmp.path().join("tasks")).unwrap(), bytes);
    assert!(tick(tmp.path(), &["recovery"]).contains("caf\u{FFFD} run"));
}

#[test]
fn init_writes_config() {
    let tmp = TempDir::new().unwrap();
    let out = tick(tmp.path(), &["init"]);
    assert!(out.starts_with("wrote "));
    assert!(tmp.path().join("config.toml").exists());

    assert!(!run_tick(tmp.path(), &["init"]).status.success());
    tick(tmp.path(), &["init", "--force"]);
}

#[test]
fn bad_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[storage\n").unwrap();
    let out = run_tick(tmp.path(), &["list"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("error:"));
}
