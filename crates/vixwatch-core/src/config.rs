//! Configuration management for vixwatch
//!
//! Values start from the defaults below, are optionally replaced by a config
//! file (any format the `config` crate understands), and are finally overridden
//! by the environment variables the deployment sets (`UPPER_THRESHOLD`,
//! `ALERT_EMAIL`, `RESEND_API_KEY`, ...).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default upper threshold
pub const DEFAULT_UPPER_THRESHOLD: f64 = 30.0;

/// Default lower threshold
pub const DEFAULT_LOWER_THRESHOLD: f64 = 10.0;

/// Yahoo Finance base URL
pub const YAHOO_FINANCE_URL: &str = "https://query1.finance.yahoo.com";

/// Resend API base URL
pub const RESEND_API_URL: &str = "https://api.resend.com";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Threshold and recipient configuration
    pub alert: AlertConfig,

    /// Quote provider configuration
    pub quote: QuoteConfig,

    /// Email provider configuration
    pub email: EmailConfig,

    /// Runtime mode and display settings
    pub runtime: RuntimeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
        }
    }
}

/// What to do when the recipient or the email credential is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEmailPolicy {
    /// Fail the check before fetching the quote
    #[default]
    Strict,
    /// Evaluate the quote and skip the email step
    Lenient,
}

impl std::str::FromStr for MissingEmailPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(Error::config(format!(
                "EMAIL_POLICY must be 'strict' or 'lenient', got '{other}'"
            ))),
        }
    }
}

/// Threshold and recipient configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Alert when the value is at or above this
    pub upper_threshold: f64,
    /// Alert when the value is at or below this
    pub lower_threshold: f64,
    /// Recipient address
    pub alert_email: Option<String>,
    /// Handling of missing email settings
    pub missing_email_policy: MissingEmailPolicy,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            upper_threshold: DEFAULT_UPPER_THRESHOLD,
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
            alert_email: None,
            missing_email_policy: MissingEmailPolicy::default(),
        }
    }
}

/// Quote provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Base URL of the chart API
    pub base_url: String,
    /// Instrument symbol
    pub symbol: String,
    /// User-Agent header sent with the request
    pub user_agent: String,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_FINANCE_URL.to_string(),
            symbol: "^VIX".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Email provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Base URL of the email API
    pub api_url: String,
    /// Provider secret key
    pub api_key: Option<String>,
    /// Sender identity
    pub from: String,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: RESEND_API_URL.to_string(),
            api_key: None,
            from: "VIX Alert <onboarding@resend.dev>".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Runtime mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Failure responses omit the error chain
    #[default]
    Production,
    /// Failure responses carry the error chain in `stack`
    Development,
}

/// Runtime mode and display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime mode
    pub mode: RuntimeMode,
    /// Fixed UTC offset used for human-readable timestamps (Asia/Tokyo by default)
    pub utc_offset_hours: i32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Production,
            utc_offset_hours: 9,
        }
    }
}

impl RuntimeConfig {
    /// Whether failure responses should include the error chain
    pub fn is_development(&self) -> bool {
        self.mode == RuntimeMode::Development
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, `.env`, and the process environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!(path = %dotenv.display(), "Loaded .env file");
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.warn_on_inverted_thresholds();

        Ok(config)
    }

    /// Read a config file; missing sections fall back to defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .build()?
            .try_deserialize::<Self>()?;

        config.check_file_values()
    }

    /// Apply environment-style overrides from `lookup`
    ///
    /// Thresholds that are present but not numeric keep their current value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        self.alert.upper_threshold =
            parse_threshold("UPPER_THRESHOLD", var("UPPER_THRESHOLD"), self.alert.upper_threshold);
        self.alert.lower_threshold =
            parse_threshold("LOWER_THRESHOLD", var("LOWER_THRESHOLD"), self.alert.lower_threshold);

        if let Some(email) = var("ALERT_EMAIL") {
            self.alert.alert_email = Some(email.trim().to_string());
        }
        if let Some(policy) = var("EMAIL_POLICY") {
            self.alert.missing_email_policy = policy.parse()?;
        }

        if let Some(key) = var("RESEND_API_KEY") {
            self.email.api_key = Some(key);
        }
        if let Some(from) = var("ALERT_FROM") {
            self.email.from = from;
        }
        if let Some(url) = var("RESEND_API_URL") {
            self.email.api_url = url;
        }

        if let Some(url) = var("QUOTE_API_URL") {
            self.quote.base_url = url;
        }
        if let Some(secs) = var("QUOTE_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::config("QUOTE_TIMEOUT_SECS must be a whole number of seconds")
            })?;
            if secs == 0 {
                return Err(Error::config("QUOTE_TIMEOUT_SECS must be greater than zero"));
            }
            self.quote.timeout = Duration::from_secs(secs);
        }

        let mode = var("VIXWATCH_ENV").or_else(|| var("NODE_ENV"));
        if let Some(mode) = mode {
            self.runtime.mode = if mode.trim().eq_ignore_ascii_case("development") {
                RuntimeMode::Development
            } else {
                RuntimeMode::Production
            };
        }

        if let Some(port) = var("VIXWATCH_HTTP_PORT") {
            self.server.http_port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::config("VIXWATCH_HTTP_PORT must be a valid port number"))?;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.logging.format = format;
        }

        // Empty strings count as absent for the email settings
        self.alert.alert_email = self.alert.alert_email.take().filter(|v| !v.is_empty());
        self.email.api_key = self.email.api_key.take().filter(|v| !v.is_empty());

        Ok(())
    }

    /// Copy of this configuration with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.email.api_key.is_some() {
            config.email.api_key = Some("********".to_string());
        }
        config
    }

    // TOML accepts nan and inf, which would never compare as breached
    fn check_file_values(mut self) -> Result<Self> {
        self.alert.upper_threshold = finite_or_default(
            "alert.upper_threshold",
            self.alert.upper_threshold,
            DEFAULT_UPPER_THRESHOLD,
        );
        self.alert.lower_threshold = finite_or_default(
            "alert.lower_threshold",
            self.alert.lower_threshold,
            DEFAULT_LOWER_THRESHOLD,
        );

        if self.quote.timeout.is_zero() {
            return Err(Error::config("quote.timeout must be greater than zero"));
        }

        Ok(self)
    }

    fn warn_on_inverted_thresholds(&self) {
        if self.alert.upper_threshold <= self.alert.lower_threshold {
            warn!(
                upper = self.alert.upper_threshold,
                lower = self.alert.lower_threshold,
                "Upper threshold is not above lower threshold; HIGH takes precedence on overlap"
            );
        }
    }
}

fn finite_or_default(key: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(key, value, fallback = default, "Non-finite threshold, using default");
        default
    }
}

fn parse_threshold(key: &str, raw: Option<String>, current: f64) -> f64 {
    let Some(raw) = raw else {
        return current;
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(key, raw = %raw, fallback = current, "Non-numeric threshold, using fallback");
            current
        }
    }
}
