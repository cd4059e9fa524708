use javelin_config::{ConfigValidationError, ConfigWarning, JavelinConfig};
use pretty_assertions::assert_eq;

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[enhancement]
jsr350 = "strict"

[enhancement.fallback]
covarient = "nullable"
"#;

    let (_config, diagnostics) =
        JavelinConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.unknown_keys,
        vec!["enhancement.fallback.covarient", "enhancement.jsr350", "typo"]
    );
    assert!(diagnostics.is_ok());
}

#[test]
fn unqualified_user_annotation_is_an_error() {
    let text = r#"
[enhancement.jsr305_user]
"Nonnull" = "strict"
"#;

    let (_config, diagnostics) =
        JavelinConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.errors,
        vec![ConfigValidationError::UserAnnotationNotQualified {
            toml_path: "enhancement.jsr305_user.Nonnull".to_owned(),
            key: "Nonnull".to_owned(),
        }]
    );
    assert!(!diagnostics.is_ok());
}

#[test]
fn jsr305_levels_are_flagged_when_disabled() {
    let text = r#"
[enhancement]
mode = "disabled"
jsr305_migration = "strict"

[enhancement.jsr305_user]
"com.example.MyNonNull" = "strict"
"#;

    let (_config, diagnostics) =
        JavelinConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.warnings,
        vec![
            ConfigWarning::Jsr305IgnoredWhileDisabled {
                toml_path: "enhancement.jsr305_user".to_owned(),
            },
            ConfigWarning::Jsr305IgnoredWhileDisabled {
                toml_path: "enhancement.jsr305_migration".to_owned(),
            },
        ]
    );
}

#[test]
fn invalid_logging_level_is_a_warning() {
    let text = r#"
[logging]
level = "warn,javelin=foo"
"#;

    let (_config, diagnostics) =
        JavelinConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert!(matches!(
        diagnostics.warnings.as_slice(),
        [ConfigWarning::LoggingLevelInvalid { .. }]
    ));
}

#[test]
fn clean_config_has_no_diagnostics() {
    let text = r#"
[enhancement]
jsr305 = "strict"
"#;
    let (_config, diagnostics) =
        JavelinConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert!(diagnostics.is_empty());
}
