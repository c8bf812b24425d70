//! The notifier seam.

use async_trait::async_trait;
use std::fmt;

use crate::error::NotifyResult;

/// Destination chat, as the transport's numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatTarget(pub i64);

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the transport should interpret message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Delivers pre-rendered text, chunking it to the transport's own limit.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat: ChatTarget, text: &str, format: TextFormat) -> NotifyResult<()>;

    /// Best-effort "typing…" indicator.
    async fn typing(&self, chat: ChatTarget) -> NotifyResult<()>;
}
