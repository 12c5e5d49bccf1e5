//! CLI end-to-end tests.
//!
//! Each test runs the built binary against a throwaway HOME so the config and
//! the shared status file never touch the real user's.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

struct Sandbox {
    _root: TempDir,
    home: PathBuf,
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let path = root.path().canonicalize().expect("canonical tempdir");
        let home = path.join("home");
        fs::create_dir_all(&home).expect("create home");
        Self {
            _root: root,
            home,
            root: path,
        }
    }

    fn project(&self, name: &str) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).expect("create project");
        dir
    }

    /// `worktimer -y <dir> args...` with colour left to its own detection.
    fn command(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_worktimer"));
        cmd.arg("-y")
            .arg(dir)
            .args(args)
            .env("HOME", &self.home)
            .env("TZ", "UTC")
            .env_remove("NO_COLOR")
            .env_remove("CLICOLOR_FORCE")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("WORKTIMER_ENV")
            .env_remove("WORKTIMER_LOG");
        cmd
    }

    /// Run with `NO_COLOR` set and return (stdout, stderr, code).
    fn run(&self, dir: &Path, args: &[&str]) -> (String, String, i32) {
        let output = self
            .command(dir, args)
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute CLI command");

        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn ok(&self, dir: &Path, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(dir, args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        stdout
    }

    fn fails(&self, dir: &Path, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(dir, args);
        assert_eq!(code, 1, "{args:?} unexpectedly exited with {code}");
        stderr
    }
}

#[test]
fn fresh_install_checks_fresh() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    assert_eq!(sb.ok(&dir, &["check"]).trim(), "FRESH");
    assert_eq!(sb.ok(&dir, &["status"]), "");
}

#[test]
fn timer_lifecycle() {
    let sb = Sandbox::new();
    let dir = sb.project("site");

    sb.ok(&dir, &["go", "write", "spec"]);
    assert_eq!(sb.ok(&dir, &["check"]).trim(), "RUNNING");

    sb.ok(&dir, &["pause"]);
    assert_eq!(sb.ok(&dir, &["check"]).trim(), "PAUSED");
    let status = sb.ok(&dir, &["status"]);
    assert!(status.starts_with("site - 00:00:"), "{status}");
    assert!(status.trim_end().ends_with("(PAUSED)"), "{status}");

    sb.ok(&dir, &["continue"]);
    sb.ok(&dir, &["stop"]);
    assert_eq!(sb.ok(&dir, &["check"]).trim(), "STOPPED");
    sb.ok(&dir, &["stop"]);

    let tasks: serde_json::Value =
        serde_json::from_str(&sb.ok(&dir, &["--json", "task"])).expect("json");
    assert_eq!(tasks[0]["task"], "write spec");

    let log = fs::read_to_string(dir.join(".timer")).expect("log written");
    assert_eq!(log.lines().count(), 4);
}

#[test]
fn subdirectory_uses_project_log() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    sb.ok(&dir, &["go", "build"]);

    let nested = dir.join("src").join("bin");
    fs::create_dir_all(&nested).expect("nested");
    sb.ok(&nested, &["pause"]);
    assert!(!nested.join(".timer").exists());
    assert_eq!(sb.ok(&dir, &["check"]).trim(), "PAUSED");
}

#[test]
fn blank_task_is_rejected() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    let stderr = sb.fails(&dir, &["go", "   "]);
    assert!(stderr.contains("You need to specify a task"), "{stderr}");

    let stderr = sb.fails(&dir, &["go", "a,b"]);
    assert!(stderr.contains("Task name contains invalid characters"), "{stderr}");
}

#[test]
fn misuse_reports_state_errors() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    let stderr = sb.fails(&dir, &["pause"]);
    assert!(stderr.contains("The timer is not running"), "{stderr}");

    sb.ok(&dir, &["go", "one"]);
    let stderr = sb.fails(&dir, &["go", "two"]);
    assert!(stderr.contains("The timer is already running"), "{stderr}");
}

#[test]
fn paused_timer_blocks_other_project() {
    let sb = Sandbox::new();
    let a = sb.project("alpha");
    let b = sb.project("beta");

    sb.ok(&a, &["go", "alpha work"]);
    sb.ok(&a, &["pause"]);
    let stderr = sb.fails(&b, &["go", "beta work"]);
    assert!(stderr.contains("another is in operation"), "{stderr}");
    assert!(stderr.contains("alpha"), "{stderr}");

    sb.ok(&a, &["stop"]);
    sb.ok(&b, &["go", "beta work"]);
}

#[test]
fn reports_from_existing_log() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    fs::write(
        dir.join(".timer"),
        "2024-03-05 09:00:00.000 +0000,2024-03-05 09:00:00.000 +0000,null,write spec\n\
         2024-03-05 09:00:00.000 +0000,2024-03-05 09:00:00.000 +0000,2024-03-05 09:15:30.000 +0000,write spec\n\
         2024-03-06 10:00:00.000 +0000,2024-03-06 10:10:00.000 +0000,null\n",
    )
    .expect("write log");

    let tasks: serde_json::Value =
        serde_json::from_str(&sb.ok(&dir, &["--json", "task"])).expect("json");
    assert_eq!(tasks[0]["task"], "<No Task>");
    assert_eq!(tasks[0]["seconds"], 600);
    assert_eq!(tasks[1]["task"], "write spec");
    assert_eq!(tasks[1]["seconds"], 930);

    let text = sb.ok(&dir, &["task", "2024-03-01", "2024-03-31"]);
    assert!(text.contains("00:15:30"), "{text}");

    let summary: serde_json::Value = serde_json::from_str(&sb.ok(
        &dir,
        &["--json", "summary", "2024-03-06"],
    ))
    .expect("json");
    assert_eq!(summary.as_array().map(Vec::len), Some(1));
    assert_eq!(summary[0]["hours"], "0.16");
}

#[test]
fn reports_on_missing_log_are_empty() {
    let sb = Sandbox::new();
    let dir = sb.project("empty");
    assert_eq!(sb.ok(&dir, &["summary"]), "");
    assert_eq!(sb.ok(&dir, &["detail"]), "");
    assert_eq!(sb.ok(&dir, &["task"]), "");
    assert!(!dir.join(".timer").exists());
}

#[test]
fn bad_date_ranges_fail() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    let stderr = sb.fails(&dir, &["summary", "2024-03-06", "2024-03-05"]);
    assert!(stderr.contains("Start/End dates are wrong way round"), "{stderr}");

    let stderr = sb.fails(&dir, &["detail", "yesterday"]);
    assert!(stderr.contains("yyyy-MM-dd"), "{stderr}");
}

#[test]
fn corrupt_log_is_reported() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    fs::write(dir.join(".timer"), "garbage\n").expect("write log");
    let stderr = sb.fails(&dir, &["go", "x"]);
    assert!(stderr.contains("something wrong with the log file"), "{stderr}");
}

#[test]
fn config_set_and_get() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    assert_eq!(sb.ok(&dir, &["config", "get", "log_file"]).trim(), ".timer");

    sb.ok(&dir, &["config", "set", "log_file", ".worklog"]);
    assert_eq!(sb.ok(&dir, &["config", "get", "log_file"]).trim(), ".worklog");

    sb.ok(&dir, &["go", "renamed"]);
    assert!(dir.join(".worklog").exists());
    assert!(!dir.join(".timer").exists());

    let path = sb.ok(&dir, &["config", "path"]);
    assert!(path.trim().starts_with(sb.home.to_str().expect("utf-8 home")));

    let stderr = sb.fails(&dir, &["config", "get", "nope"]);
    assert!(stderr.contains("Unknown configuration key"), "{stderr}");
}

#[test]
fn piped_reports_carry_no_colour_codes() {
    let sb = Sandbox::new();
    let dir = sb.project("site");
    sb.ok(&dir, &["go", "x"]);
    sb.ok(&dir, &["stop"]);

    for report in ["summary", "detail", "task"] {
        let output = sb
            .command(&dir, &[report])
            .output()
            .expect("Failed to execute CLI command");
        assert!(output.status.success(), "{report} failed");
        assert!(!output.stdout.is_empty(), "{report} printed nothing");
        assert!(
            !output.stdout.contains(&0x1b),
            "{report} wrote escape codes: {:?}",
            String::from_utf8_lossy(&output.stdout)
        );
    }
}

#[test]
fn reports_read_projects_with_commas_in_their_path() {
    let sb = Sandbox::new();
    let dir = sb.project("clients,2024");
    fs::write(
        dir.join(".timer"),
        "2024-03-05 09:00:00.000 +0000,2024-03-05 09:00:00.000 +0000,2024-03-05 09:15:30.000 +0000,write spec\n",
    )
    .expect("write log");

    let tasks: serde_json::Value =
        serde_json::from_str(&sb.ok(&dir, &["--json", "task"])).expect("json");
    assert_eq!(tasks[0]["seconds"], 930);
    assert!(sb.ok(&dir, &["summary"]).contains("00:15:30"));

    sb.fails(&dir, &["go", "x"]);
}

#[test]
fn reset_frees_a_stale_paused_slot() {
    let sb = Sandbox::new();
    let gone = sb.project("gone");
    let here = sb.project("here");

    sb.ok(&gone, &["go", "old"]);
    sb.ok(&gone, &["pause"]);
    let stderr = sb.fails(&here, &["reset"]);
    assert!(stderr.contains("another is in operation"), "{stderr}");

    fs::remove_dir_all(&gone).expect("remove project");
    sb.ok(&here, &["reset"]);
    assert_eq!(sb.ok(&here, &["check"]).trim(), "FRESH");
    sb.ok(&here, &["go", "new"]);
}
