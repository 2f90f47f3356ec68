//! Tests for `secreg keygen`.

use crate::support::*;

#[test]
fn test_keygen_writes_default_key() {
    let t = Test::new();

    let output = t.keygen(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "xchacha20poly1305");
    assert_stdout_contains(&output, "fingerprint");

    let key = t.read("encryption_key.txt");
    assert_eq!(key.trim().len(), 44);
}

#[test]
fn test_keygen_age() {
    let t = Test::new();

    assert_success(&t.keygen(&["--cipher", "age", "-k", "age.key"]));
    assert!(t.read("age.key").starts_with("AGE-SECRET-KEY-1"));
}

#[test]
fn test_keygen_refuses_overwrite() {
    let t = Test::new();
    assert_success(&t.keygen(&[]));
    let first = t.read("encryption_key.txt");

    let output = t.keygen(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.read("encryption_key.txt"), first);

    assert_success(&t.keygen(&["--force"]));
    assert_ne!(t.read("encryption_key.txt"), first);
}

#[test]
fn test_age_key_used_by_build() {
    let t = Test::with_files(&[("secrets.yaml", "token: abc\n")]);
    assert_success(&t.keygen(&["--cipher", "age"]));

    assert_success(&t.build(&[]));
    let artifact = t.read("secrets_registry.log");
    assert!(artifact.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));

    let output = t.show(&["token"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "abc\n");
}

#[cfg(unix)]
#[test]
fn test_key_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    assert_success(&t.keygen(&[]));
    let mode = std::fs::metadata(t.path("encryption_key.txt"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
