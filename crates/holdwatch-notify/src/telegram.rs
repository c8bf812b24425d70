//! Telegram implementation of [`Notifier`].

use async_trait::async_trait;
use holdwatch_telemetry::Metrics;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use tracing::{debug, error};

use crate::chunk::split_message;
use crate::error::{NotifyError, NotifyResult};
use crate::notifier::{ChatTarget, Notifier, TextFormat};

/// Telegram's per-message limit, in UTF-16 code units.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

const PART_DELAY: Duration = Duration::from_millis(100);

/// Sends through the Telegram Bot API, splitting long text into parts.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    max_len: usize,
}

impl TelegramNotifier {
    pub fn with_max_len(bot: Bot, max_len: usize) -> Self {
        Self { bot, max_len }
    }

    async fn send_part(&self, chat: ChatId, text: String, format: TextFormat) -> NotifyResult<()> {
        let request = self.bot.send_message(chat, text);
        let request = match format {
            TextFormat::Html => request.parse_mode(ParseMode::Html),
            TextFormat::Plain => request,
        };
        let sent = request.await?;
        debug!(chat_id = chat.0, message_id = sent.id.0, "Telegram message sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat: ChatTarget, text: &str, format: TextFormat) -> NotifyResult<()> {
        let parts = split_message(text, self.max_len);
        let total = parts.len();
        if total > 1 {
            debug!(chat_id = chat.0, parts = total, "Message split into parts");
        }

        for (index, part) in parts.into_iter().enumerate() {
            if let Err(e) = self.send_part(ChatId(chat.0), part, format).await {
                Metrics::notification_failed();
                error!(chat_id = chat.0, part = index + 1, total, error = %e, "Failed to send Telegram message");
                return Err(if total > 1 {
                    NotifyError::Part {
                        part: index + 1,
                        total,
                        reason: e.to_string(),
                    }
                } else {
                    e
                });
            }
            if index + 1 < total {
                tokio::time::sleep(PART_DELAY).await;
            }
        }

        Metrics::notification_sent();
        Ok(())
    }

    async fn typing(&self, chat: ChatTarget) -> NotifyResult<()> {
        self.bot
            .send_chat_action(ChatId(chat.0), ChatAction::Typing)
            .await?;
        Ok(())
    }
}
