//! Crate configuration: where the application is mounted, how views are
//! named and how logs are written.
//!
//! ```toml
//! [mvc]
//! context_path = "/sample"
//! view_suffix = ".html"
//!
//! [logging]
//! format = "compact"
//! level = "{{ LOG_LEVEL }}"
//! ```
//!
//! Every section is optional. `{{ VAR }}` placeholders are filled from the
//! process environment before the TOML is parsed, whichever loader is used:
//!
//! - `Config::from_rust_env` reads `config/$RUST_ENV.toml`
//! - `Config::from_toml_file` reads `config/{env}.toml`
//! - `Config::from_toml` and `str::parse` take the TOML text directly
//!
//! The `with_*` builders cover the same settings for programmatic setups.
mod logging;
mod mvc;

pub use logging::*;
pub use mvc::*;

use {
    crate::{Error, Result, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr},
    tracing_subscriber::{Layer, Registry, prelude::*},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mvc: MvcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads `config/{RUST_ENV}.toml`. Fails when `RUST_ENV` is unset.
    pub fn from_rust_env() -> Result<Self> {
        let env = env::var("RUST_ENV")?;
        Self::from_toml_file(env)
    }

    /// Loads `config/{env}.toml` relative to the working directory.
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Self> {
        let path = format!("config/{}.toml", env.as_ref());
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        text.parse()
    }

    pub fn with_context_path<S: AsRef<str>>(mut self, path: S) -> Self {
        self.mvc.context_path = path.as_ref().into();
        self
    }

    pub fn with_view_suffix<S: AsRef<str>>(mut self, suffix: S) -> Self {
        self.mvc.view_suffix = Some(suffix.as_ref().into());
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    pub fn with_log_level<S: AsRef<str>>(mut self, level: S) -> Self {
        self.logging.level = level.as_ref().into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.mvc.validate()?;
        self.logging.validate()
    }

    /// Installs the global tracing subscriber described by `[logging]`.
    ///
    /// Call it once, early. A second call leaves the first subscriber in place.
    pub fn setup_tracing(&self) {
        let fmt = tracing_subscriber::fmt::layer();
        let layer: Box<dyn Layer<Registry> + Send + Sync> = match self.logging.format {
            LogFormat::Json => fmt.json().boxed(),
            LogFormat::Default => fmt.boxed(),
            LogFormat::Compact => fmt.compact().boxed(),
            LogFormat::Pretty => fmt.pretty().boxed(),
        };

        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(self.logging.env_filter())
            .try_init();
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(&replace_handlebars_with_env(s))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_env_placeholders_are_substituted() {
        unsafe {
            env::set_var("MVC_TEST_CONTEXT", "/sample");
        }

        let config: Config = r#"
[mvc]
context_path = "{{ MVC_TEST_CONTEXT }}"
view_suffix = ".html"

[logging]
format = "json"
level = "debug"
        "#
        .parse()
        .expect("config parses");

        assert_eq!(config.mvc.context_path, "/sample");
        assert_eq!(config.mvc.view_suffix.as_deref(), Some(".html"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");

        unsafe {
            env::remove_var("MVC_TEST_CONTEXT");
        }
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = "this is not valid toml".parse::<Config>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("").expect("empty config parses");
        assert_eq!(config.mvc.context_path, "");
        assert!(config.mvc.view_suffix.is_none());
        assert_eq!(config.logging.format, LogFormat::Default);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_match_toml() {
        let built = Config::default()
            .with_context_path("/shop")
            .with_view_suffix(".ftl")
            .with_log_format(LogFormat::Compact)
            .with_log_level("warn");

        let parsed = Config::from_toml(
            r#"
[mvc]
context_path = "/shop"
view_suffix = ".ftl"

[logging]
format = "compact"
level = "warn"
            "#,
        )
        .expect("config parses");

        assert_eq!(built.mvc.context_path, parsed.mvc.context_path);
        assert_eq!(built.mvc.view_suffix, parsed.mvc.view_suffix);
        assert_eq!(built.logging.format, parsed.logging.format);
        assert_eq!(built.logging.level, parsed.logging.level);
    }

    #[test]
    fn test_validate_context_path() {
        assert!(Config::default().with_context_path("/sample").validate().is_ok());
        assert!(Config::default().with_context_path("").validate().is_ok());

        let err = Config::default()
            .with_context_path("sample")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = Config::default()
            .with_context_path("/sample/")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("/sample/"));
    }

    #[test]
    fn test_from_toml_file() {
        let config = Config::from_toml_file("test").expect("config/test.toml loads");
        assert_eq!(config.mvc.context_path, "/sample");

        let err = Config::from_toml_file("does-not-exist").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
