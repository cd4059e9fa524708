use javelin_config::{
    ConfigError, DefaultNullability, EnhancementMode, JavelinConfig, ReportLevel,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn loads_full_enhancement_table() {
    let text = r#"
[enhancement]
mode = "enabled"
jsr305 = "strict"
jsr305_migration = "warn"

[enhancement.jsr305_user]
"com.example.MyNonNull" = "ignore"

[enhancement.fallback]
covariant = "not_null"
invariant = "flexible"

[logging]
level = "debug"
json = true
"#;

    let config = JavelinConfig::load_from_str(text).expect("config should parse");
    let enhancement = &config.enhancement;
    assert_eq!(enhancement.mode, EnhancementMode::Enabled);
    assert_eq!(enhancement.jsr305, ReportLevel::Strict);
    assert_eq!(enhancement.jsr305_migration, Some(ReportLevel::Warn));
    assert_eq!(
        enhancement.jsr305_user.get("com.example.MyNonNull"),
        Some(&ReportLevel::Ignore)
    );
    assert!(!enhancement.jsr305_user.contains_key("com.example.Other"));
    assert_eq!(enhancement.fallback.covariant, DefaultNullability::NotNull);
    assert_eq!(enhancement.fallback.invariant, DefaultNullability::Flexible);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn empty_file_yields_defaults() {
    let config = JavelinConfig::load_from_str("").expect("config should parse");
    assert_eq!(config, JavelinConfig::default());
}

#[test]
fn partial_fallback_table_keeps_other_default() {
    let text = r#"
[enhancement.fallback]
invariant = "not_null"
"#;
    let config = JavelinConfig::load_from_str(text).expect("config should parse");
    assert_eq!(config.enhancement.fallback.covariant, DefaultNullability::Flexible);
    assert_eq!(config.enhancement.fallback.invariant, DefaultNullability::NotNull);
}

#[test]
fn load_from_path_reads_file() {
    let mut file = NamedTempFile::new().expect("tempfile");
    writeln!(file, "[enhancement]\nmode = \"disabled\"").expect("write");

    let config = JavelinConfig::load_from_path(file.path()).expect("config should load");
    assert!(!config.enhancement.is_enabled());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = JavelinConfig::load_from_path(dir.path().join("javelin.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}

#[test]
fn invalid_report_level_is_a_toml_error() {
    let err = JavelinConfig::load_from_str("[enhancement]\njsr305 = \"loud\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}
