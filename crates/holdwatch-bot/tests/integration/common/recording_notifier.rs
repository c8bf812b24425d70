//! Notifier that records everything it is asked to send.

use async_trait::async_trait;
use holdwatch_notify::{ChatTarget, Notifier, NotifyResult, TextFormat};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub chat: ChatTarget,
    pub text: String,
    pub format: TextFormat,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
    typing: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Option<Sent> {
        self.sent.lock().last().cloned()
    }

    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, chat: ChatTarget, text: &str, format: TextFormat) -> NotifyResult<()> {
        self.sent.lock().push(Sent {
            chat,
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn typing(&self, _chat: ChatTarget) -> NotifyResult<()> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
