//! Tests for `secreg show`.

use crate::support::*;

fn built() -> Test {
    let t = Test::with_files(&[("secrets.yaml", SECRETS_YAML)]);
    assert_success(&t.build_with_env(&[], &[("api_key", "xyz")]));
    t
}

#[test]
fn test_show_decrypts_registry() {
    let t = built();

    let output = t.show(&[]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        "db: {'host': 'localhost', 'port': 5432}\napi_key: xyz\n"
    );
}

#[test]
fn test_show_single_key() {
    let t = built();

    let output = t.show(&["api_key"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "xyz\n");
}

#[test]
fn test_show_json() {
    let t = built();

    let output = t.show(&["--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["db"]["port"], 5432);
    assert_eq!(value["api_key"], "xyz");
}

#[test]
fn test_show_missing_key() {
    let t = built();

    let output = t.show(&["nope"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "secret not found: nope");
}

#[test]
fn test_show_plaintext_registry() {
    let t = Test::with_files(&[("secrets.yaml", "a: 1\n")]);
    assert_success(&t.build(&["-d"]));

    let output = t.show(&["-d"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "a: 1\n");
}

#[test]
fn test_show_with_wrong_key_fails() {
    let t = built();
    assert_success(&t.keygen(&["-k", "other.txt"]));

    let output = t.show(&["-k", "other.txt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert_not_leaked(&output, "localhost");
}

#[test]
fn test_show_tampered_registry_fails() {
    let t = built();
    let mut bytes = t.read_bytes("secrets_registry.log");
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    std::fs::write(t.path("secrets_registry.log"), bytes).unwrap();

    let output = t.show(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}

#[test]
fn test_show_before_build() {
    let t = Test::new();

    let output = t.show(&["-d"]);
    assert_failure(&output);
    assert_stdout_contains(&output, "secreg build");
}
