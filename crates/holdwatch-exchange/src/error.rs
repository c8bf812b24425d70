//! Exchange error types.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The venue rejected the request with its own error code.
    #[error("Binance API error {code} (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    /// Non-success HTTP status without a parseable error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Coarse classification of an [`ExchangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials, signature, IP whitelist or permissions.
    Authorization,
    /// Worth retrying later: network, rate limits, venue overload.
    Transient,
    Other,
}

impl ErrorKind {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "auth",
            Self::Transient => "transient",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AUTH_CODES: [i64; 4] = [-2015, -2014, -1022, -2010];
const TRANSIENT_CODES: [i64; 4] = [-1001, -1003, -1007, -1021];

/// Error body returned by the venue: `{"code":-2015,"msg":"..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

impl ExchangeError {
    /// Build an error from a non-success response.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api) => Self::Api {
                status,
                code: api.code,
                message: api.msg,
            },
            Err(_) => Self::Http {
                status,
                body: body.to_string(),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { code, status, .. } => {
                if AUTH_CODES.contains(code) {
                    ErrorKind::Authorization
                } else if TRANSIENT_CODES.contains(code) {
                    ErrorKind::Transient
                } else {
                    classify_status(*status)
                }
            }
            Self::Http { status, .. } => classify_status(*status),
            Self::Network(_) | Self::Timeout(_) => ErrorKind::Transient,
            Self::Decode(_) | Self::Config(_) => ErrorKind::Other,
        }
    }

    pub fn is_authorization(&self) -> bool {
        self.kind() == ErrorKind::Authorization
    }

    /// Diagnostic shown to the user in chat.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { code: -2015, message, .. } | Self::Api { code: -2014, message, .. } => {
                format!(
                    "❌ API authorization failed ({}):\n\n\
                     Possible causes:\n\
                     1. Wrong API key or secret key\n\
                     2. This IP is not on the key's whitelist\n\
                     3. The key cannot read Futures data\n\n\
                     What to check:\n\
                     • API key and secret key are correct\n\
                     • IP whitelist is off or contains this host\n\
                     • 'Enable Reading' is on for Futures\n\
                     • The key is a Futures key, not a Spot-only key\n\n\
                     Binance says: {message}",
                    self.code_label()
                )
            }
            Self::Api { code: -1022, message, .. } => format!(
                "❌ Signature error ({}):\n\nWrong secret key or malformed request signature.\n\nBinance says: {message}",
                self.code_label()
            ),
            Self::Api { code: -2010, message, .. } => format!(
                "❌ Permission denied ({}):\n\nThe API key lacks the permissions this operation needs.\n\nBinance says: {message}",
                self.code_label()
            ),
            _ if self.kind() == ErrorKind::Transient => format!(
                "⏳ Binance is temporarily unavailable, try again shortly.\n\n{self}"
            ),
            Self::Api { code, message, .. } => {
                format!("❌ Binance API error (code {code}):\n\n{message}")
            }
            _ => format!("❌ Failed to fetch data from Binance: {self}"),
        }
    }

    fn code_label(&self) -> String {
        match self {
            Self::Api { code, .. } => format!("code {code}"),
            _ => "no code".to_string(),
        }
    }
}

fn classify_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::Authorization,
        418 | 429 => ErrorKind::Transient,
        s if s >= 500 => ErrorKind::Transient,
        _ => ErrorKind::Other,
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
