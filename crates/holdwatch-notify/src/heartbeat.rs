//! Cancellable "typing…" indicator.
//!
//! Telegram hides the indicator after about five seconds, so long-running
//! replies re-send it periodically until the reply is ready.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::notifier::{ChatTarget, Notifier};

/// Background typing ping. Stops on [`stop`](Self::stop) or drop.
pub struct TypingHeartbeat {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl TypingHeartbeat {
    /// Send a typing action now and then every `period`.
    pub fn start(notifier: Arc<dyn Notifier>, chat: ChatTarget, period: Duration) -> Self {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = notifier.typing(chat).await {
                            debug!(chat_id = chat.0, error = %e, "Typing action failed");
                        }
                    }
                }
            }
        });

        Self { token, handle }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TypingHeartbeat {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotifyError, NotifyResult};
    use crate::notifier::TextFormat;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNotifier {
        typing: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn send(&self, _: ChatTarget, _: &str, _: TextFormat) -> NotifyResult<()> {
            Ok(())
        }

        async fn typing(&self, _: ChatTarget) -> NotifyResult<()> {
            self.typing.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NotifyError::Delivery("offline".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_pings_immediately_and_repeats() {
        let notifier = Arc::new(CountingNotifier::default());
        let heartbeat =
            TypingHeartbeat::start(notifier.clone(), ChatTarget(1), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(70)).await;
        heartbeat.stop();
        assert!(notifier.typing.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_stop_halts_pings() {
        let notifier = Arc::new(CountingNotifier::default());
        let heartbeat =
            TypingHeartbeat::start(notifier.clone(), ChatTarget(1), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(25)).await;
        heartbeat.stop();
        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(heartbeat.is_finished());

        let seen = notifier.typing.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(notifier.typing.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_heartbeat() {
        let notifier = Arc::new(CountingNotifier {
            fail: true,
            ..Default::default()
        });
        let heartbeat =
            TypingHeartbeat::start(notifier.clone(), ChatTarget(1), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(45)).await;
        assert!(!heartbeat.is_finished());
        drop(heartbeat);
        assert!(notifier.typing.load(Ordering::SeqCst) >= 2);
    }
}
