use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_HINT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HINT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for an OpenAI-compatible chat endpoint.
#[derive(Clone, Debug)]
pub struct HintConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Runtime configuration, read from `VOCAB_*` environment variables.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// `None` disables the chat provider; hints then show fallback text.
    pub hint: Option<HintConfig>,
    pub hint_timeout: Duration,
    /// `None` means results are not reported anywhere.
    pub result_url: Option<Url>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hint: None,
            hint_timeout: DEFAULT_HINT_TIMEOUT,
            result_url: None,
            catalog_path: None,
        }
    }
}

impl GameConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL or timeout variable is set but malformed,
    /// or the timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL or timeout value is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let hint = get("VOCAB_HINT_API_KEY").map(|api_key| HintConfig {
            base_url: get("VOCAB_HINT_BASE_URL").unwrap_or_else(|| DEFAULT_HINT_BASE_URL.into()),
            api_key,
            model: get("VOCAB_HINT_MODEL").unwrap_or_else(|| DEFAULT_HINT_MODEL.into()),
        });
        if let Some(config) = &hint {
            Url::parse(&config.base_url).map_err(|_| ConfigError::InvalidUrl {
                var: "VOCAB_HINT_BASE_URL",
                raw: config.base_url.clone(),
            })?;
        }

        let hint_timeout = match get("VOCAB_HINT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidNumber {
                    var: "VOCAB_HINT_TIMEOUT_SECS",
                    raw,
                })?,
            None => DEFAULT_HINT_TIMEOUT,
        };

        let result_url = get("VOCAB_RESULT_URL")
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl {
                    var: "VOCAB_RESULT_URL",
                    raw,
                })
            })
            .transpose()?;

        Ok(Self {
            hint,
            hint_timeout,
            result_url,
            catalog_path: get("VOCAB_CATALOG").map(PathBuf::from),
        })
    }
}
