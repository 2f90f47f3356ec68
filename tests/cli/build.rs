//! Tests for `secreg build`.

use crate::support::*;

#[test]
fn test_build_encrypts_by_default() {
    let t = Test::with_files(&[("secrets.yaml", SECRETS_YAML)]);

    let output = t.build_with_env(&[], &[("api_key", "xyz")]);
    assert_success(&output);
    assert_stdout_contains(&output, "Encryption key generated");
    assert_not_leaked(&output, "xyz");

    assert!(t.exists("encryption_key.txt"));
    let artifact = t.read_bytes("secrets_registry.log");
    assert!(!String::from_utf8_lossy(&artifact).contains("localhost"));
}

#[test]
fn test_no_subcommand_runs_build() {
    let t = Test::with_files(&[("secrets.yaml", "token: abc\n")]);

    let output = t.cmd().output().unwrap();
    assert_success(&output);
    assert!(t.exists("secrets_registry.log"));
}

#[test]
fn test_second_build_reuses_key() {
    let t = Test::with_files(&[("secrets.yaml", "token: abc\n")]);

    assert_success(&t.build(&[]));
    let key = t.read("encryption_key.txt");

    let output = t.build(&[]);
    assert_success(&output);
    assert!(!stdout(&output).contains("Encryption key generated"));
    assert_eq!(t.read("encryption_key.txt"), key);
}

#[test]
fn test_disable_encryption_writes_plain_lines() {
    let t = Test::with_files(&[("secrets.yaml", SECRETS_YAML)]);

    let output = t.build_with_env(&["-d"], &[("api_key", "xyz")]);
    assert_success(&output);
    assert_stderr_contains(&output, "NOT recommended");
    assert!(!t.exists("encryption_key.txt"));

    assert_eq!(
        t.read("secrets_registry.log"),
        "db: {'host': 'localhost', 'port': 5432}\napi_key: xyz\n"
    );
}

#[test]
fn test_all_formats_merge_in_name_order() {
    let t = Test::with_files(&[
        ("keys.json", KEYS_JSON),
        ("secrets.ini", SECRETS_INI),
        ("secrets.toml", SECRETS_TOML),
        ("config.yaml", UNRELATED_YAML),
    ]);

    let output = t.build(&["-d"]);
    assert_success(&output);

    assert_eq!(
        t.read("secrets_registry.log"),
        "service_token: tok-123\n\
         smtp: {'user': 'mailer', 'password': 'p@ss:word'}\n\
         legacy: old-value\n\
         cache: {'url': 'redis://localhost:6379'}\n"
    );
}

#[test]
fn test_file_type_restricts_scan() {
    let t = Test::with_files(&[("keys.json", KEYS_JSON), ("secrets.ini", SECRETS_INI)]);

    assert_success(&t.build(&["-d", "-t", ".ini"]));
    assert!(t.read("secrets_registry.log").starts_with("smtp:"));
}

#[test]
fn test_file_type_needs_dot() {
    let t = Test::with_files(&[("secrets.ini", SECRETS_INI)]);

    let output = t.build(&["-t", "ini"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "should start with a dot");
}

#[test]
fn test_custom_output_and_key_paths() {
    let t = Test::with_files(&[("secrets.yaml", "a: 1\n")]);

    let output = t.build(&["-o", "out/reg.bin", "-k", "k/key.txt"]);
    // the output directory must exist
    assert_failure(&output);

    std::fs::create_dir(t.path("out")).unwrap();
    assert_success(&t.build(&["-o", "out/reg.bin", "-k", "k/key.txt"]));
    assert!(t.exists("out/reg.bin"));
    assert!(t.exists("k/key.txt"));
}

#[test]
fn test_dir_flag_scans_other_directory() {
    let project = Test::with_files(&[("secrets.yaml", "a: 1\n")]);
    let elsewhere = Test::new();

    let output = elsewhere
        .cmd()
        .args(["--dir", project.dir.path().to_str().unwrap(), "build", "-d"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(project.read("secrets_registry.log"), "a: 1\n");
    assert!(!elsewhere.exists("secrets_registry.log"));
}

#[test]
fn test_gitignore_updated_in_git_repo() {
    let t = Test::with_files(&[("secrets.yaml", "a: 1\n")]).git();

    assert_success(&t.build(&[]));
    assert_success(&t.build(&[]));

    assert_eq!(
        t.read(".gitignore"),
        "secrets_registry.log\nload_config_process.log\nencryption_key.txt\n"
    );
}

#[test]
fn test_process_log_records_decisions() {
    let t = Test::with_files(&[("secrets.yaml", SECRETS_YAML)]);

    assert_success(&t.build_with_env(&[], &[("api_key", "hunter2")]));

    let log = t.read("load_config_process.log");
    assert!(log.contains("Added secret 'db' from 'secrets.yaml'"));
    assert!(log.contains("Added secret 'api_key' from environment variables"));
    assert!(!log.contains("hunter2"));
}

#[test]
fn test_config_file_disables_logging_and_encryption() {
    let t = Test::with_files(&[
        ("secrets.yaml", "a: 1\n"),
        (
            ".secreg.toml",
            "[registry]\nencrypt = false\noutput = \"reg.txt\"\n\n[logging]\nenabled = false\n",
        ),
    ]);

    assert_success(&t.build(&[]));
    assert_eq!(t.read("reg.txt"), "a: 1\n");
    assert!(!t.exists("load_config_process.log"));
}

#[test]
fn test_broken_source_aborts_without_writing() {
    let t = Test::with_files(&[("secrets.yaml", "a: [1, 2\n")]);

    let output = t.build(&["-d"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse");
    assert!(!t.exists("secrets_registry.log"));
}
