//! Request signing for Binance signed endpoints.
//!
//! Security notes:
//! - The secret key lives in a `Zeroizing` buffer and is wiped on drop.
//! - `Debug` never prints the secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{ExchangeError, ExchangeResult};

type HmacSha256 = Hmac<Sha256>;

/// API key pair for signed requests.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: Zeroizing<String>,
}

impl Credentials {
    /// Both parts are trimmed; empty values are rejected.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> ExchangeResult<Self> {
        let api_key = api_key.into().trim().to_string();
        let secret_key = Zeroizing::new(secret_key.into().trim().to_string());
        if api_key.is_empty() || secret_key.is_empty() {
            return Err(ExchangeError::Config(
                "API key and secret key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            secret_key,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Hex-encoded HMAC-SHA256 of `query` keyed by the secret.
    pub fn sign(&self, query: &str) -> ExchangeResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Config(format!("Invalid secret key: {e}")))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example request from the Binance signed-endpoint documentation.
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_QUERY: &str = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

    #[test]
    fn test_sign_matches_documented_example() {
        let creds = Credentials::new("key", DOC_SECRET).unwrap();
        assert_eq!(
            creds.sign(DOC_QUERY).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("key", "   ").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("my-key", "super-secret").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("my-key"));
        assert!(!debug.contains("super-secret"));
    }
}
