use {
    crate::{Error, Result},
    serde::Deserialize,
    tracing_subscriber::EnvFilter,
};

const DEFAULT_LEVEL: &str = "info";

/// `[logging]` section.
///
/// ```toml
/// [logging]
/// format = "json"
/// level = "info,mvc_core=debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Output layout of the fmt layer. Defaults to the full human-readable layout.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directives applied when `RUST_LOG` is not set. Defaults to `info`.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Rejects `level` strings that are not valid filter directives.
    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|err| Error::config(format!("invalid log level '{}': {err}", self.level)))
    }

    /// `RUST_LOG` when set, otherwise the configured `level`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}
