//! Loader for `befriend` configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. the embedded defaults ([`DEFAULT_CONFIG_YAML`]),
//! 2. an optional YAML file passed with `--config`,
//! 3. inline YAML snippets (tests),
//! 4. `BEFRIEND__SECTION__KEY` environment variables.
//!
//! After merging, `${VAR}` placeholders are expanded from the environment. The
//! defaults point every credential at its `TWITTER_*` variable, so a bare
//! environment is enough to run.
use befriend_common::observability::{LogConfig, LogFormat};
use befriend_http::OAuth1Credentials;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_YAML: &str = r#"
twitter:
  consumer_key: "${TWITTER_CONSUMER_KEY}"
  consumer_secret: "${TWITTER_CONSUMER_SECRET}"
  access_token: "${TWITTER_ACCESS_TOKEN}"
  access_secret: "${TWITTER_ACCESS_SECRET}"
  api_url: "https://api.twitter.com"
  timeout_secs: 15
search:
  lang: "en"
logging:
  format: "text"
  stderr: false
  filter: "info"
"#;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("missing Twitter credential: set {0}")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BefriendConfig {
    pub twitter: TwitterSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Clone, Deserialize)]
pub struct TwitterSettings {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs", deserialize_with = "deserialize_u64_lenient")]
    pub timeout_secs: u64,
}

impl fmt::Debug for TwitterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterSettings")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TwitterSettings {
    pub fn credentials(&self) -> OAuth1Credentials {
        OAuth1Credentials {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            access_token: self.access_token.clone(),
            access_secret: self.access_secret.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Each credential paired with the variable that normally supplies it.
    fn credential_fields(&self) -> [(&str, &'static str); 4] {
        [
            (self.consumer_key.as_str(), "TWITTER_CONSUMER_KEY"),
            (self.consumer_secret.as_str(), "TWITTER_CONSUMER_SECRET"),
            (self.access_token.as_str(), "TWITTER_ACCESS_TOKEN"),
            (self.access_secret.as_str(), "TWITTER_ACCESS_SECRET"),
        ]
    }
}

fn default_api_url() -> String {
    "https://api.twitter.com".into()
}

fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Language filter for tweet search.
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { lang: default_lang() }
    }
}

fn default_lang() -> String {
    "en".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: false,
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".into()
}

impl LoggingSettings {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

// Environment overrides always arrive as strings; YAML scalars arrive typed.
fn deserialize_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(num) => num
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, got {num}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid integer {s:?}: {e}"))),
        other => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            _ => Err(D::Error::custom(format!("invalid boolean {s:?}"))),
        },
        other => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Empty and still-unexpanded credentials are reported by variable name.
fn validate(config: &BefriendConfig) -> Result<(), ConfigLoadError> {
    for (value, env_var) in config.twitter.credential_fields() {
        let value = value.trim();
        if value.is_empty() || value.contains("${") {
            return Err(ConfigLoadError::MissingCredential(env_var));
        }
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BefriendConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl Default for BefriendConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BefriendConfigLoader {
    /// Start from the embedded defaults.
    ///
    /// ```
    /// use befriend_config::{BefriendConfigLoader, ConfigLoadError};
    ///
    /// let err = BefriendConfigLoader::new()
    ///     .with_yaml_str("twitter:\n  consumer_key: ''")
    ///     .load()
    ///     .unwrap_err();
    ///
    /// assert!(matches!(err, ConfigLoadError::MissingCredential("TWITTER_CONSUMER_KEY")));
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_CONFIG_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a YAML file. A path that does not exist is skipped.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).format(FileFormat::Yaml).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use befriend_config::BefriendConfigLoader;
    ///
    /// let cfg = BefriendConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// twitter:
    ///   consumer_key: "ck"
    ///   consumer_secret: "cs"
    ///   access_token: "at"
    ///   access_secret: "as"
    /// search:
    ///   lang: "de"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.search.lang, "de");
    /// assert_eq!(cfg.twitter.timeout_secs, 15);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge the sources, apply `BEFRIEND__` overrides, expand `${VAR}` placeholders and
    /// validate the credentials.
    pub fn load(self) -> Result<BefriendConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("BEFRIEND").separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BefriendConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;
        Ok(typed)
    }
}
