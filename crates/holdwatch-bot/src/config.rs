//! Application configuration.

use crate::error::{AppError, AppResult};
use holdwatch_core::{AccountingMode, HoldDuration};
use holdwatch_exchange::{FuturesClientConfig, DEFAULT_REST_URL};
use holdwatch_notify::{HEADER_RESERVE, TELEGRAM_MAX_MESSAGE_LEN};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_ENV_VAR: &str = "HOLDWATCH_CONFIG";

/// Binance REST settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Orders fetched per symbol when reconstructing open time. Binance caps this at 1000.
    #[serde(default = "default_order_history_limit")]
    pub order_history_limit: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_rest_url() -> String {
    DEFAULT_REST_URL.to_string()
}

fn default_recv_window_ms() -> u64 {
    5_000
}

fn default_order_history_limit() -> u32 {
    1_000
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            recv_window_ms: default_recv_window_ms(),
            order_history_limit: default_order_history_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ExchangeConfig {
    pub fn client_config(&self) -> FuturesClientConfig {
        FuturesClientConfig {
            rest_url: self.rest_url.clone(),
            recv_window_ms: self.recv_window_ms,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Accounting mode as configured. `Auto` asks the exchange at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingSetting {
    NetBalance,
    SideTagged,
    #[default]
    Auto,
}

impl AccountingSetting {
    /// The fixed mode, or `None` for `Auto`.
    pub fn fixed(&self) -> Option<AccountingMode> {
        match self {
            Self::NetBalance => Some(AccountingMode::NetBalance),
            Self::SideTagged => Some(AccountingMode::SideTagged),
            Self::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountingConfig {
    #[serde(default)]
    pub mode: AccountingSetting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Path of the limits JSON document.
    #[serde(default = "default_limits_file")]
    pub file: String,
    /// Check interval used until one is stored.
    #[serde(default = "default_check_interval")]
    pub default_check_interval: String,
}

fn default_limits_file() -> String {
    "limits.json".to_string()
}

fn default_check_interval() -> String {
    holdwatch_persistence::DEFAULT_CHECK_INTERVAL.to_string()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            file: default_limits_file(),
            default_check_interval: default_check_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Alert destination. Learned from the first incoming message when unset.
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
    #[serde(default = "default_typing_interval_secs")]
    pub typing_interval_secs: u64,
}

fn default_max_message_len() -> usize {
    TELEGRAM_MAX_MESSAGE_LEN
}

fn default_typing_interval_secs() -> u64 {
    3
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            chat_id: None,
            max_message_len: default_max_message_len(),
            typing_interval_secs: default_typing_interval_secs(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Prometheus metrics port. 0 disables the endpoint.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info,holdwatch=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub accounting: AccountingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Config path: explicit argument > `HOLDWATCH_CONFIG` > default.
    pub fn resolve_path(cli: Option<String>) -> String {
        cli.or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load `path`, or defaults when it does not exist.
    ///
    /// Returns whether the file was found so the caller can log it once
    /// logging is up.
    pub fn load(path: &str) -> AppResult<(Self, bool)> {
        if Path::new(path).exists() {
            Ok((Self::from_file(path)?, true))
        } else {
            let config = Self::default();
            config.validate()?;
            Ok((config, false))
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.exchange.order_history_limit == 0 {
            return Err(AppError::Config(
                "exchange.order_history_limit must be greater than zero".to_string(),
            ));
        }
        if self.telegram.max_message_len <= HEADER_RESERVE {
            return Err(AppError::Config(format!(
                "telegram.max_message_len must exceed {HEADER_RESERVE}"
            )));
        }
        HoldDuration::parse(&self.limits.default_check_interval).map_err(|e| {
            AppError::Config(format!("limits.default_check_interval: {e}"))
        })?;
        Ok(())
    }

    pub fn default_check_interval(&self) -> HoldDuration {
        HoldDuration::parse(&self.limits.default_check_interval)
            .unwrap_or(HoldDuration::FIVE_MINUTES)
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_secs(self.telegram.typing_interval_secs.max(1))
    }
}

/// Credentials read from the environment (and `.env`), never from TOML.
#[derive(Clone)]
pub struct Secrets {
    pub telegram_token: String,
    pub binance_api_key: String,
    pub binance_secret_key: String,
}

impl Secrets {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let require = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} is not set")))
        };
        Ok(Self {
            telegram_token: require("TELEGRAM_BOT_TOKEN")?,
            binance_api_key: require("BINANCE_API_KEY")?,
            binance_secret_key: require("BINANCE_SECRET_KEY")?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.binance_api_key.chars().take(6).collect();
        f.debug_struct("Secrets")
            .field("telegram_token", &"<redacted>")
            .field("binance_api_key", &format!("{prefix}…"))
            .field("binance_secret_key", &"<redacted>")
            .finish()
    }
}
