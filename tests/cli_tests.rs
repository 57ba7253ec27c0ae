use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated config file so the user's settings never leak in.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("resume-refiner").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.toml"));
    cmd
}

#[test]
fn help_lists_flags() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--target-role"))
        .stdout(predicate::str::contains("--export-latex"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn silent_requires_json() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--silent")
        .assert()
        .code(1)
        // Silent mode reports errors on stdout for scripts.
        .stdout(predicate::str::contains("--silent can only be used with --json"));
}

#[test]
fn blank_resume_fails_without_contacting_service() {
    let dir = TempDir::new().unwrap();
    let resume = dir.path().join("resume.txt");
    std::fs::write(&resume, "  \n\t\n").unwrap();

    // Port 9 is discard; nothing is listening, so any request would fail differently.
    cmd(&dir)
        .args(["--text", "--base-url", "http://127.0.0.1:9", "--resume"])
        .arg(&resume)
        .assert()
        .failure()
        .stderr(predicate::str::contains("please provide resume content first"));
}

#[test]
fn silent_json_prints_error_on_stdout() {
    let dir = TempDir::new().unwrap();
    let resume = dir.path().join("resume.txt");
    std::fs::write(&resume, "").unwrap();

    cmd(&dir)
        .args(["--silent", "--json", "--resume"])
        .arg(&resume)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("please provide resume content first"));
}

#[test]
fn sample_conflicts_with_resume() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--text", "--sample", "--resume", "cv.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_resume_is_reported() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--json", "--resume"])
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("read resume"));
}

#[cfg(unix)]
#[test]
fn malformed_default_config_warns_and_falls_back() {
    let home = TempDir::new().unwrap();
    // Linux reads $XDG_CONFIG_HOME, macOS reads ~/Library/Application Support.
    for base in [
        home.path().join(".config"),
        home.path().join("Library").join("Application Support"),
    ] {
        let dir = base.join("resume-refiner");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "theme = \"solarized\"\n").unwrap();
    }
    let resume = home.path().join("resume.txt");
    std::fs::write(&resume, " ").unwrap();

    Command::cargo_bin("resume-refiner")
        .unwrap()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .args(["--text", "--resume"])
        .arg(&resume)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ignoring unreadable config"))
        // Defaults were used, so the run got as far as validating the input.
        .stderr(predicate::str::contains("please provide resume content first"));
}
