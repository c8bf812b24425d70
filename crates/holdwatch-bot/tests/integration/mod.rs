//! Integration tests for holdwatch-bot.
//!
//! These tests drive the bot through in-memory doubles:
//! - Command handling end to end
//! - Periodic limit checks and alerts

pub mod common;
