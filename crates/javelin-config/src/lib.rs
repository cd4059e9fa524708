use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use thiserror::Error;
use tracing_subscriber::prelude::*;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{
    ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics,
};
pub use schema::json_schema;
pub use validation::is_qualified_name;

/// How strongly JSR-305 style annotations are honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportLevel {
    /// Annotations are not read at all.
    Ignore,
    /// Annotations are read but only produce warnings; the enhanced type is unaffected.
    #[default]
    Warn,
    /// Annotations decide the enhanced type.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementMode {
    #[default]
    Enabled,
    /// Every nullability annotation is ignored and only the fallback defaults apply.
    Disabled,
}

/// Nullability used when nothing else decides a type position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefaultNullability {
    NotNull,
    Nullable,
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct FallbackConfig {
    /// Fallback for covariant positions (return types and fields).
    #[serde(default = "FallbackConfig::default_covariant")]
    pub covariant: DefaultNullability,

    /// Fallback for invariant positions (value parameters and receivers).
    #[serde(default = "FallbackConfig::default_invariant")]
    pub invariant: DefaultNullability,
}

impl FallbackConfig {
    fn default_covariant() -> DefaultNullability {
        DefaultNullability::Flexible
    }

    fn default_invariant() -> DefaultNullability {
        DefaultNullability::Nullable
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            covariant: Self::default_covariant(),
            invariant: Self::default_invariant(),
        }
    }
}

/// Qualifier resolution settings for the signature enhancement pass.
///
/// ```toml
/// [enhancement]
/// mode = "enabled"
/// jsr305 = "strict"
/// jsr305_migration = "warn"
///
/// [enhancement.jsr305_user]
/// "com.example.MyNonNull" = "ignore"
///
/// [enhancement.fallback]
/// covariant = "flexible"
/// invariant = "nullable"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct EnhancementConfig {
    #[serde(default)]
    pub mode: EnhancementMode,

    /// Global report level for JSR-305 annotations.
    #[serde(default)]
    pub jsr305: ReportLevel,

    /// Report level for annotations marked `@UnderMigration`, overriding the status they
    /// declare themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsr305_migration: Option<ReportLevel>,

    /// Per-annotation report levels, keyed by the annotation's qualified name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub jsr305_user: BTreeMap<String, ReportLevel>,

    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl EnhancementConfig {
    pub fn disabled() -> Self {
        Self {
            mode: EnhancementMode::Disabled,
            ..Self::default()
        }
    }

    /// All JSR-305 annotations decide types.
    pub fn strict() -> Self {
        Self {
            jsr305: ReportLevel::Strict,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == EnhancementMode::Enabled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Either a simple level (`info`, `debug`, ...) or an `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level, with `RUST_LOG` merged in when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                let config_directives = Self::normalize_level_directives(&self.level);
                tracing_subscriber::EnvFilter::try_new(format!("{config_directives},{env_directives}"))
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

/// Top-level `javelin.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct JavelinConfig {
    #[serde(default)]
    pub enhancement: EnhancementConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` repeats a snippet of the input; the message alone is enough.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl JavelinConfig {
    /// Load a config file from TOML. Unknown keys are logged and otherwise ignored.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<JavelinConfig>(text)?;
        for key in &unknown_keys {
            tracing::warn!(target: "javelin.config", key = %key, "ignoring unknown config key");
        }
        Ok(config)
    }

    /// Load a config file and return diagnostics (unknown keys and semantic validation).
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<JavelinConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call multiple times; only the first call has any effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!(target: "javelin.config", "global tracing subscriber already installed");
        }
    });
}
