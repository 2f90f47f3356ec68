//! Test fixtures.

/// YAML source with a nested mapping and a value left to the environment.
pub const SECRETS_YAML: &str = "\
db:
  host: localhost
  port: 5432
api_key: null
";

/// JSON source overriding and revoking keys.
pub const KEYS_JSON: &str = r#"{"service_token": "tok-123", "legacy": null}"#;

/// INI source with one section.
pub const SECRETS_INI: &str = "\
[smtp]
user = mailer
password = p@ss:word
";

/// TOML source.
pub const SECRETS_TOML: &str = "\
legacy = \"old-value\"

[cache]
url = \"redis://localhost:6379\"
";

/// A file that matches no keyword and must be ignored.
pub const UNRELATED_YAML: &str = "ignored: true\n";
