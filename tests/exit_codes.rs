use std::fs;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run_menu(home: &TempDir, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_raven-menu");
    Command::new(exe)
        .args(args)
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("RAVEN_LOG_FILE")
        .stdin(Stdio::null())
        .output()
        .expect("run raven-menu")
}

#[test]
fn without_terminal_exits_one_and_leaves_terminal_alone() {
    let home = TempDir::new().unwrap();
    let out = run_menu(&home, &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("This program requires a terminal interface."));
    // No alternate-screen or cursor sequences were emitted.
    assert!(!out.stdout.contains(&0x1b));
    assert!(!out.stderr.contains(&0x1b));
}

#[test]
fn list_prints_builtin_catalog() {
    let home = TempDir::new().unwrap();
    let out = run_menu(&home, &["--list"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("System Status"));
    assert!(stdout.contains("[built-in] quit"));
    assert_eq!(stdout.lines().count(), 18);
}

#[test]
fn check_accepts_builtin_catalog() {
    let home = TempDir::new().unwrap();
    let out = run_menu(&home, &["--check"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("ok"));
}

#[test]
fn check_rejects_duplicate_titles() {
    let home = TempDir::new().unwrap();
    let menu = home.path().join("menu.yaml");
    fs::write(
        &menu,
        "items:\n  - title: Logs\n    cmd: tail -n 50 /var/log/syslog\n  - title: Logs\n    builtin: quit\n",
    )
    .unwrap();
    let out = run_menu(&home, &["--check", "--menu", menu.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Duplicate titles: Logs"));
}

#[test]
fn missing_catalog_file_exits_one() {
    let home = TempDir::new().unwrap();
    let out = run_menu(&home, &["--list", "--menu", "this-file-does-not-exist-123456.toml"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn list_uses_catalog_from_config() {
    let home = TempDir::new().unwrap();
    let menu = home.path().join("menu.toml");
    fs::write(
        &menu,
        "[[items]]\ntitle = \"Uptime\"\ncmd = \"uptime\"\n\n[[items]]\ntitle = \"Exit\"\nbuiltin = \"quit\"\n",
    )
    .unwrap();
    let raven = home.path().join(".raven");
    fs::create_dir_all(&raven).unwrap();
    fs::write(
        raven.join("config.toml"),
        format!("menu = {:?}\n", menu.to_str().unwrap()),
    )
    .unwrap();

    let out = run_menu(&home, &["--list"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("Uptime"));
    assert!(!stdout.contains("System Status"));
}
