use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{JavelinConfig, LoggingConfig};

impl JavelinConfig {
    /// Validate semantic invariants, reporting as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_enhancement(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_enhancement(config: &JavelinConfig, out: &mut ValidationDiagnostics) {
    let enhancement = &config.enhancement;

    for key in enhancement.jsr305_user.keys() {
        if !is_qualified_name(key) {
            out.errors.push(ConfigValidationError::UserAnnotationNotQualified {
                toml_path: format!("enhancement.jsr305_user.{key}"),
                key: key.clone(),
            });
        }
    }

    if !enhancement.is_enabled() {
        if !enhancement.jsr305_user.is_empty() {
            out.warnings.push(ConfigWarning::Jsr305IgnoredWhileDisabled {
                toml_path: "enhancement.jsr305_user".to_owned(),
            });
        }
        if enhancement.jsr305_migration.is_some() {
            out.warnings.push(ConfigWarning::Jsr305IgnoredWhileDisabled {
                toml_path: "enhancement.jsr305_migration".to_owned(),
            });
        }
    }
}

fn validate_logging(config: &JavelinConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

/// Whether `name` looks like a qualified Java class name (`pkg.Name`, at least one dot).
pub fn is_qualified_name(name: &str) -> bool {
    let mut segments = 0;
    for segment in name.split('.') {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_alphabetic() || first == '_' || first == '$') {
            return false;
        }
        if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}
