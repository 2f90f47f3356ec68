//! Tests for error handling and global flags.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    t.cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("build")
            .and(predicate::str::contains("keygen"))
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    t.cmd()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown-command"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "secreg");
}

#[test]
fn test_invalid_dir() {
    let t = Test::new();

    let output = t.cmd().args(["--dir", "missing-dir", "build"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "not a directory");
}

#[test]
fn test_verbose_emits_debug() {
    let t = Test::with_files(&[("secrets.yaml", "a: 1\n")]);

    let output = t.cmd().args(["-v", "build", "-d"]).output().unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "discovered sources");
}

#[test]
fn test_log_env_overrides_verbosity() {
    let t = Test::with_files(&[("secrets.yaml", "a: 1\n")]);

    let output = t
        .cmd()
        .env("SECREG_LOG", "off")
        .args(["build", "-d"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_invalid_config_file() {
    let t = Test::with_files(&[(".secreg.toml", "[registry\n")]);

    let output = t.build(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
}

#[test]
fn test_completions() {
    let t = Test::new();

    for shell in ["bash", "zsh", "fish", "powershell"] {
        let output = t.cmd().args(["completions", shell]).output().unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "secreg");
    }
}
