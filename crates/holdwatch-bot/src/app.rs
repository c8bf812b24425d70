//! Application wiring and chat command handling.

use holdwatch_exchange::{Credentials, ExchangeGateway, FuturesClient};
use holdwatch_notify::{ChatTarget, Notifier, TelegramNotifier, TextFormat, TypingHeartbeat};
use holdwatch_persistence::{JsonLimitStore, LimitStore};
use holdwatch_telemetry::serve_metrics;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::checker::LimitChecker;
use crate::command::{Command, MENU};
use crate::config::{AppConfig, Secrets};
use crate::error::AppResult;
use crate::render;
use crate::service::{resolve_mode, PositionsService};

/// Turns chat messages into replies.
///
/// Every failure becomes a reply or a log line; nothing here returns an
/// error to the message loop.
#[derive(Clone)]
pub struct CommandHandler {
    service: Arc<PositionsService>,
    store: Arc<dyn LimitStore>,
    notifier: Arc<dyn Notifier>,
    chat_tx: Arc<watch::Sender<Option<ChatTarget>>>,
    interval_tx: Arc<watch::Sender<Duration>>,
    typing_interval: Duration,
}

impl CommandHandler {
    pub fn new(
        service: Arc<PositionsService>,
        store: Arc<dyn LimitStore>,
        notifier: Arc<dyn Notifier>,
        chat_tx: Arc<watch::Sender<Option<ChatTarget>>>,
        interval_tx: Arc<watch::Sender<Duration>>,
        typing_interval: Duration,
    ) -> Self {
        Self {
            service,
            store,
            notifier,
            chat_tx,
            interval_tx,
            typing_interval,
        }
    }

    /// Handle one incoming message and send the reply, if any.
    pub async fn handle(&self, chat: ChatTarget, text: &str) {
        self.remember_chat(chat);

        let Some(reply) = self.reply_to(chat, text).await else {
            return;
        };
        if let Err(e) = self.notifier.send(chat, &reply, TextFormat::Plain).await {
            error!(chat_id = chat.0, error = %e, "Failed to send reply");
        }
    }

    /// The reply for `text`, or `None` when it is not a command.
    pub async fn reply_to(&self, chat: ChatTarget, text: &str) -> Option<String> {
        self.reply_at(chat, text, crate::now_ms()).await
    }

    /// Like [`Self::reply_to`], with every age measured against `now_ms`.
    pub async fn reply_at(&self, chat: ChatTarget, text: &str, now_ms: u64) -> Option<String> {
        let command = Command::parse(text)?;
        info!(chat_id = chat.0, ?command, "Received command");

        let reply = match command {
            Command::Start | Command::Help => render::HELP.to_string(),
            Command::Positions => self.positions(chat, now_ms).await,
            Command::AddLimit { coin, time } => match self.store.upsert(&coin, &time) {
                Ok(outcome) => {
                    info!(coin = %coin, time = %time, ?outcome, "Saved limit");
                    render::limit_saved(&coin, &time, outcome)
                }
                Err(e) if e.is_invalid_input() => {
                    warn!(coin = %coin, time = %time, error = %e, "Rejected limit");
                    render::invalid_limit(&e)
                }
                Err(e) => {
                    error!(coin = %coin, error = %e, "Failed to save limit");
                    render::store_failed(&e)
                }
            },
            Command::RemoveLimit { coin } => match self.store.remove(&coin) {
                Ok(removed) => render::limit_removed(&coin, removed),
                Err(e) => {
                    warn!(coin = %coin, error = %e, "Failed to remove limit");
                    render::store_failed(&e)
                }
            },
            Command::Limits => render::limits_list(&self.store.load()),
            Command::SetCheckInterval { interval: None } => {
                render::check_interval_current(&self.store.load().check_interval)
            }
            Command::SetCheckInterval {
                interval: Some(text),
            } => match self.store.set_check_interval(&text) {
                Ok(interval) => {
                    self.interval_tx.send_replace(interval.as_std());
                    info!(%interval, "Check interval updated");
                    render::check_interval_updated(&text, interval)
                }
                Err(e) if e.is_invalid_input() => render::invalid_interval(&e),
                Err(e) => {
                    error!(error = %e, "Failed to save check interval");
                    render::store_failed(&e)
                }
            },
            Command::Usage(topic) => render::usage(topic).to_string(),
            Command::Unknown(name) => {
                debug!(command = %name, "Unknown command");
                render::unknown_command(&name)
            }
        };
        Some(reply)
    }

    async fn positions(&self, chat: ChatTarget, now_ms: u64) -> String {
        let heartbeat = TypingHeartbeat::start(self.notifier.clone(), chat, self.typing_interval);
        let rules = self.store.load().rules_by_asset();
        let result = self.service.reports(&rules, now_ms).await;
        heartbeat.stop();

        match result {
            Ok(views) => render::positions_report(&views, now_ms),
            Err(e) => {
                if e.is_authorization() {
                    error!(error = %e, "Exchange rejected the API credentials");
                } else {
                    warn!(error = %e, "Failed to fetch positions");
                }
                e.user_message()
            }
        }
    }

    /// Publish the first chat seen as the alert destination.
    fn remember_chat(&self, chat: ChatTarget) {
        let learned = self.chat_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(chat);
                true
            } else {
                false
            }
        });
        if learned {
            info!(chat_id = chat.0, "Alerts will go to this chat");
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    secrets: Secrets,
}

impl Application {
    pub fn new(config: AppConfig, secrets: Secrets) -> Self {
        Self { config, secrets }
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        let config = self.config;

        let credentials = Credentials::new(
            &self.secrets.binance_api_key,
            &self.secrets.binance_secret_key,
        )?;
        let client = FuturesClient::new(config.exchange.client_config(), credentials)?;
        let gateway: Arc<dyn ExchangeGateway> = Arc::new(client);

        let bot = Bot::new(&self.secrets.telegram_token);
        let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::with_max_len(
            bot.clone(),
            config.telegram.max_message_len,
        ));

        let store = JsonLimitStore::new(&config.limits.file);
        let initial_interval = if store.path().exists() {
            store.load().check_interval()
        } else {
            config.default_check_interval()
        };
        let store: Arc<dyn LimitStore> = Arc::new(store);

        let mode = resolve_mode(gateway.as_ref(), config.accounting.mode.fixed()).await;
        let service = Arc::new(PositionsService::new(
            gateway,
            mode,
            config.exchange.order_history_limit,
        ));

        let (chat_tx, chat_rx) = watch::channel(config.telegram.chat_id.map(ChatTarget));
        let (interval_tx, interval_rx) = watch::channel(initial_interval.as_std());
        let cancel = CancellationToken::new();

        let metrics_port = config.telemetry.metrics_port;
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(metrics_port).await {
                error!(error = %e, "Metrics server failed");
            }
        });

        let checker = LimitChecker::new(
            service.clone(),
            store.clone(),
            notifier.clone(),
            chat_rx,
            interval_rx,
            cancel.clone(),
        );
        let checker_handle = tokio::spawn(checker.run());

        let handler = CommandHandler::new(
            service,
            store,
            notifier,
            Arc::new(chat_tx),
            Arc::new(interval_tx),
            config.typing_interval(),
        );

        if let Err(e) = register_commands(&bot).await {
            warn!(error = %e, "Failed to register bot commands");
        }

        info!(%mode, interval = %initial_interval, "Holdwatch running");
        teloxide::repl(bot, move |msg: Message| {
            let handler = handler.clone();
            async move {
                if let Some(text) = msg.text() {
                    handler.handle(ChatTarget(msg.chat.id.0), text).await;
                }
                respond(())
            }
        })
        .await;

        info!("Shutting down");
        cancel.cancel();
        if let Err(e) = checker_handle.await {
            warn!(error = %e, "Limit checker task ended abnormally");
        }
        Ok(())
    }
}

async fn register_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = MENU
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect();
    bot.set_my_commands(commands).await?;
    debug!("Registered bot commands");
    Ok(())
}
