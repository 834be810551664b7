//! Process settings and operational constants.
//!
//! The configuration surface is deliberately small: two required environment
//! variables ([`TELEGRAM_TOKEN_VAR`] and [`GEMINI_API_KEY_VAR`]), loaded from
//! a `.env` file when one is present and from the process environment
//! otherwise. Everything else is a compile-time constant.

use std::time::Duration;

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Path of the knowledge artifact, resolved against the working directory.
/// The file is provisioned out of band; a missing file is not fatal.
pub const KNOWLEDGE_PATH: &str = "conhecimento_marica.json";

/// Gemini model used for every completion call.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Upper bound on one completion round-trip, including connect time.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of messages answered concurrently. Messages beyond the
/// limit wait for a permit instead of piling up unbounded remote calls.
pub const MAX_IN_FLIGHT_REPLIES: usize = 16;

/// Directory receiving rotated JSON log files.
pub const LOGS_DIR: &str = "logs";

/// Required startup credentials.
#[derive(Clone)]
pub struct Settings {
    /// Telegram bot access token.
    pub telegram_token: String,
    /// Gemini API key sent as the `x-goog-api-key` header.
    pub gemini_api_key: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_token", &"[REDACTED]")
            .field("gemini_api_key", &"[REDACTED]")
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or blank variable; startup
    /// must abort in that case rather than limp along without credentials.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_resolver(|key| std::env::var(key).ok())
    }

    /// Load settings through a custom variable resolver.
    ///
    /// Lets tests exercise the validation logic without mutating the real
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or blank variable.
    pub fn from_resolver(resolve: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            telegram_token: require(&resolve, TELEGRAM_TOKEN_VAR)?,
            gemini_api_key: require(&resolve, GEMINI_API_KEY_VAR)?,
        })
    }
}

fn require(resolve: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    resolve(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing required environment variable: {key}"))
}
