//! Aura configuration: defaults, optional `config/aura.toml`, then `AURA_*` environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | AURA_CONFIG | config/aura | Config file path (extension optional). |
//! | AURA_HOST / AURA_PORT | 127.0.0.1 / 8000 | Bind address. |
//! | AURA_TEMPLATE | trauma_informed | baseline \| forecast \| trauma_informed |
//! | AURA_LLM_MODE | live | live \| mock |
//! | AURA_MODEL | gemini-1.5-flash | Gemini model id. |
//! | AURA_API_BASE | https://generativelanguage.googleapis.com/v1beta | Provider base URL. |
//! | AURA_REQUEST_TIMEOUT_SECS | 60 | Per-attempt upstream timeout. |
//! | AURA_MAX_ATTEMPTS | 3 | Upstream attempts, first one included. |
//! | AURA_RETRY_BASE_DELAY_MS | 200 | First backoff delay; doubles per retry. |
//! | AURA_CORS_ORIGINS | http://localhost:3000 | Comma-separated CORS allow-list. |
//! | GEMINI_API_KEY | (none) | Provider credential. Never serialized or logged. |

use std::fmt;
use std::path::Path;

use config::{ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};

use crate::prompts::PromptTemplate;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const DEFAULT_CONFIG_NAME: &str = "config/aura";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Which gateway backs the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    /// Gemini over HTTPS.
    #[default]
    Live,
    /// Canned reply, no network. Development and tests only.
    Mock,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuraConfig {
    pub host: String,
    pub port: u16,
    /// Active prompt variant.
    pub template: PromptTemplate,
    pub llm_mode: LlmMode,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub cors_origins: Vec<String>,
    /// From `GEMINI_API_KEY` only; blank counts as absent.
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            template: PromptTemplate::default(),
            llm_mode: LlmMode::default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            gemini_api_key: None,
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for AuraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuraConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("template", &self.template)
            .field("llm_mode", &self.llm_mode)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("cors_origins", &self.cors_origins)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AuraConfig {
    /// Load config from file and environment. Precedence: `AURA_*` env > `AURA_CONFIG` file
    /// (default `config/aura`, optional) > defaults. The credential comes from `GEMINI_API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AURA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_NAME.to_string());
        let mut config = Self::build(File::with_name(&path).required(false), true)?;
        config.gemini_api_key = api_key_from_env();
        Ok(config)
    }

    /// Load from one config file plus defaults; environment is ignored and no credential is set.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path), false)
    }

    fn build(file: File<FileSourceFile, FileFormat>, with_env: bool) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("template", PromptTemplate::default().as_str())?
            .set_default("llm_mode", "live")?
            .set_default("model", DEFAULT_MODEL)?
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("max_attempts", DEFAULT_MAX_ATTEMPTS as i64)?
            .set_default("retry_base_delay_ms", DEFAULT_RETRY_BASE_DELAY_MS as i64)?
            .set_default("cors_origins", vec![DEFAULT_CORS_ORIGIN])?
            .add_source(file);

        let builder = if with_env {
            builder.add_source(
                Environment::with_prefix("AURA")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
        } else {
            builder
        };

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Message("max_attempts must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Message("request_timeout_secs must be positive".into()));
        }
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Message("api_base must not be empty".into()));
        }
        Ok(())
    }

    /// Set the credential explicitly (tests, embedding). Blank keys are treated as absent.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = normalize_key(key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read `GEMINI_API_KEY`; unset or blank yields `None`.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().and_then(normalize_key)
}

fn normalize_key(key: String) -> Option<String> {
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aura.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let (_dir, path) = write_config("");
        let config = AuraConfig::from_file(&path).unwrap();
        let defaults = AuraConfig::default();
        assert_eq!(config.host, defaults.host);
        assert_eq!(config.port, 8000);
        assert_eq!(config.template, PromptTemplate::TraumaInformed);
        assert_eq!(config.llm_mode, LlmMode::Live);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert!(!config.has_api_key());
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
port = 9100
template = "forecast"
llm_mode = "mock"
max_attempts = 5
cors_origins = ["https://aura.example.app", "http://localhost:3000"]
"#,
        );
        let config = AuraConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.template, PromptTemplate::Forecast);
        assert_eq!(config.llm_mode, LlmMode::Mock);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn unknown_template_is_rejected() {
        let (_dir, path) = write_config(r#"template = "limerick""#);
        assert!(AuraConfig::from_file(&path).is_err());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let (_dir, path) = write_config("max_attempts = 0");
        let err = AuraConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn blank_key_counts_as_absent() {
        assert!(!AuraConfig::default().with_api_key("   ").has_api_key());
        let config = AuraConfig::default().with_api_key("  AIza-test  ");
        assert_eq!(config.gemini_api_key.as_deref(), Some("AIza-test"));
    }

    #[test]
    fn debug_and_serialize_hide_the_key() {
        let config = AuraConfig::default().with_api_key("AIza-very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("very-secret"));
        assert!(!json.contains("gemini_api_key"));
    }
}
