//! Chat notifications for holdwatch.
//!
//! - [`Notifier`]: the delivery seam used by the bot and the checker
//! - [`split_message`]: chunking under a transport size limit
//! - [`TelegramNotifier`]: Telegram Bot API implementation
//! - [`TypingHeartbeat`]: cancellable "typing…" indicator

pub mod chunk;
pub mod error;
pub mod heartbeat;
pub mod notifier;
pub mod telegram;

pub use chunk::{split_message, HEADER_RESERVE};
pub use error::{NotifyError, NotifyResult};
pub use heartbeat::TypingHeartbeat;
pub use notifier::{ChatTarget, Notifier, TextFormat};
pub use telegram::{TelegramNotifier, TELEGRAM_MAX_MESSAGE_LEN};
