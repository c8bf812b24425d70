//! Chat message rendering.

use holdwatch_core::{HoldDuration, PositionSnapshot};
use holdwatch_persistence::{LimitsDocument, Upserted};
use holdwatch_position::LimitStatus;
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::command::UsageTopic;
use crate::service::PositionView;

const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

pub const HELP: &str = "👋 Holdwatch tracks how long your Binance futures positions stay open.\n\n\
Commands:\n\
/positions (/ps) - open positions with age and limits\n\
/add_limit (/l) COIN TIME - set a holding limit, e.g. /l LSK 12h\n\
/remove_limit (/rl) COIN - remove a holding limit\n\
/limits (/ls) - list holding limits\n\
/set_check_interval [TIME] - show or change the check interval\n\
/help - this message\n\n\
Time units: s, m, h, d (fractions allowed: 1.5d)";

pub const NO_POSITIONS: &str = "📭 No open futures positions.";

const ADD_LIMIT_USAGE: &str = "Usage: /add_limit COIN TIME\n\n\
Examples:\n\
/l LSK 12h\n\
/l BTC 30m\n\
/l ETH 1d";

const REMOVE_LIMIT_USAGE: &str = "Usage: /remove_limit COIN\n\nExample: /rl LSK";

/// `"Xh Ym"`, truncating seconds.
pub fn format_age(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{hours}h {minutes}m")
}

/// Human reading of a limit: minutes below an hour, hours below a day,
/// days beyond.
pub fn human_duration(duration: HoldDuration) -> String {
    let minutes = duration.as_minutes_f64();
    if minutes < 60.0 {
        format!("{minutes:.0} min")
    } else if minutes < 1440.0 {
        format!("{:.1} h", minutes / 60.0)
    } else {
        format!("{:.1} d", minutes / 1440.0)
    }
}

pub fn unknown_command(name: &str) -> String {
    format!("❓ Unknown command /{name}\n\n{HELP}")
}

pub fn usage(topic: UsageTopic) -> &'static str {
    match topic {
        UsageTopic::AddLimit => ADD_LIMIT_USAGE,
        UsageTopic::RemoveLimit => REMOVE_LIMIT_USAGE,
    }
}

pub fn invalid_limit(error: &impl std::fmt::Display) -> String {
    format!("❌ Invalid limit: {error}\n\n{ADD_LIMIT_USAGE}")
}

pub fn limit_saved(coin: &str, time: &str, outcome: Upserted) -> String {
    let coin = coin.trim().to_ascii_uppercase();
    let minutes = outcome.duration().as_minutes_f64();
    match outcome {
        Upserted::Added(_) => format!(
            "✅ Limit added:\n\nCoin: {coin}\nTime: {time} ({minutes:.0} minutes)"
        ),
        Upserted::Updated(_) => {
            format!("✅ Limit for {coin} updated: {time} ({minutes:.0} minutes)")
        }
    }
}

pub fn limit_removed(coin: &str, removed: bool) -> String {
    let coin = coin.trim().to_ascii_uppercase();
    if removed {
        format!("🗑 Limit for {coin} removed.")
    } else {
        format!("ℹ️ No limit set for {coin}.")
    }
}

pub fn limits_list(doc: &LimitsDocument) -> String {
    let mut out = String::new();
    if doc.is_empty() {
        out.push_str("📋 No holding limits set.\n\nAdd one with /add_limit COIN TIME, e.g. /l LSK 12h");
    } else {
        out.push_str("📋 Holding limits:\n\n");
        for (i, limit) in doc.limits.iter().enumerate() {
            let shown = match limit.duration() {
                Ok(duration) => format!("{} ({})", limit.time, human_duration(duration)),
                Err(_) => format!("{} (invalid)", limit.time),
            };
            let _ = writeln!(out, "{}. {} - {}", i + 1, limit.coin, shown);
        }
        out.truncate(out.trim_end().len());
    }
    let _ = write!(out, "\n\n⏱ Check interval: {}", doc.check_interval);
    out
}

pub fn check_interval_current(current: &str) -> String {
    format!(
        "⏱ Current check interval: {current}\n\n\
         Usage: /set_check_interval TIME\n\
         Examples: /set_check_interval 5m, /set_check_interval 1h"
    )
}

pub fn check_interval_updated(text: &str, interval: HoldDuration) -> String {
    format!(
        "✅ Check interval updated: {} ({:.0} minutes)\n\nApplies from the next check.",
        text.trim(),
        interval.as_minutes_f64()
    )
}

pub fn invalid_interval(error: &impl std::fmt::Display) -> String {
    format!("❌ Invalid interval: {error}\n\nExamples: 30s, 5m, 1h")
}

pub fn store_failed(error: &impl std::fmt::Display) -> String {
    format!("❌ Could not update limits: {error}")
}

fn pnl_text(snapshot: &PositionSnapshot) -> String {
    if snapshot.unrealized_pnl() == Decimal::ZERO {
        "0.00".to_string()
    } else {
        snapshot.unrealized_pnl.trim().to_string()
    }
}

/// Plain-text positions report.
pub fn positions_report(views: &[PositionView], now_ms: u64) -> String {
    if views.is_empty() {
        return NO_POSITIONS.to_string();
    }

    let mut out = String::from("📊 Open futures positions:\n\n");
    for (i, view) in views.iter().enumerate() {
        let snapshot = &view.snapshot;
        let _ = writeln!(out, "{}. {} {}", i + 1, snapshot.symbol, view.direction);
        let _ = writeln!(out, "   Size: {}", snapshot.position_amt);
        let _ = writeln!(out, "   Entry price: {}", snapshot.entry_price);
        let _ = writeln!(out, "   PnL: {}", pnl_text(snapshot));
        let _ = writeln!(out, "   Filled orders: {}", view.fill_count);
        let _ = writeln!(out, "   Opened: {} ago", format_age(view.age_ms(now_ms)));

        if let Some((rule, status)) = &view.limit {
            match status {
                LimitStatus::Exceeded { overshoot_ms } => {
                    let _ = writeln!(
                        out,
                        "   ⚠️ Limit {} exceeded by {}",
                        rule.limit,
                        format_age(*overshoot_ms)
                    );
                }
                LimitStatus::Within { remaining_ms } => {
                    let _ = writeln!(
                        out,
                        "   ⏱ Limit {}: {} left",
                        rule.limit,
                        format_age(*remaining_ms)
                    );
                }
            }
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

/// HTML alert for positions over their limit. Views without an exceeded
/// limit are ignored.
pub fn limit_alert(views: &[PositionView], now_ms: u64) -> String {
    let mut out = String::from("⚠️ <b>WARNING: positions exceeded their holding limits!</b>\n\n");
    for view in views.iter().filter(|v| v.is_exceeded()) {
        let Some((rule, status)) = &view.limit else {
            continue;
        };
        let snapshot = &view.snapshot;
        let _ = writeln!(
            out,
            "🔴 <b>{} {}</b>",
            escape_html(&snapshot.symbol),
            view.direction
        );
        let _ = writeln!(out, "   Size: {}", escape_html(&snapshot.position_amt));
        let _ = writeln!(out, "   Entry price: {}", escape_html(&snapshot.entry_price));
        let _ = writeln!(out, "   PnL: {}", escape_html(&pnl_text(snapshot)));
        let _ = writeln!(
            out,
            "   Age: {} (limit: {})",
            format_age(view.age_ms(now_ms)),
            rule.limit
        );
        let _ = writeln!(out, "   ⚠️ Over by: {}\n", format_age(status.magnitude_ms()));
    }
    out.push_str("💡 <i>Consider closing these positions.</i>");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdwatch_core::{Direction, LimitRule, PositionSide};

    const HOUR: u64 = MS_PER_HOUR;

    fn view(symbol: &str, pnl: &str, opened_at_ms: u64, limit: Option<(&str, LimitStatus)>) -> PositionView {
        PositionView {
            snapshot: PositionSnapshot {
                symbol: symbol.into(),
                position_amt: "-150".into(),
                entry_price: "1.2345".into(),
                unrealized_pnl: pnl.into(),
                position_side: PositionSide::Both,
            },
            direction: Direction::Short,
            opened_at_ms,
            fill_count: 3,
            limit: limit.map(|(text, status)| {
                (LimitRule::new("LSK", HoldDuration::parse(text).unwrap()), status)
            }),
        }
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(0), "0h 0m");
        assert_eq!(format_age(59_999), "0h 0m");
        assert_eq!(format_age(13 * HOUR + 5 * MS_PER_MINUTE + 30_000), "13h 5m");
        assert_eq!(format_age(50 * HOUR), "50h 0m");
    }

    #[test]
    fn test_human_duration() {
        let d = |s: &str| HoldDuration::parse(s).unwrap();
        assert_eq!(human_duration(d("30m")), "30 min");
        assert_eq!(human_duration(d("12h")), "12.0 h");
        assert_eq!(human_duration(d("90m")), "1.5 h");
        assert_eq!(human_duration(d("1.5d")), "1.5 d");
    }

    #[test]
    fn test_positions_report() {
        let now = 20 * HOUR;
        let report = positions_report(
            &[
                view("LSKUSDT", "-12.5", 7 * HOUR, Some(("12h", LimitStatus::Exceeded { overshoot_ms: HOUR }))),
                view("ETHUSDT", "0.00000000", 18 * HOUR, Some(("1d", LimitStatus::Within { remaining_ms: 22 * HOUR }))),
                view("BTCUSDT", "", now, None),
            ],
            now,
        );
        assert!(report.starts_with("📊 Open futures positions:"));
        assert!(report.contains("1. LSKUSDT SHORT"));
        assert!(report.contains("   PnL: -12.5"));
        assert!(report.contains("   Opened: 13h 0m ago"));
        assert!(report.contains("⚠️ Limit 12h exceeded by 1h 0m"));
        assert!(report.contains("2. ETHUSDT SHORT"));
        assert!(report.contains("⏱ Limit 1d: 22h 0m left"));
        assert!(report.contains("3. BTCUSDT SHORT"));
        assert_eq!(report.matches("PnL: 0.00").count(), 2);
        assert!(report.contains("Filled orders: 3"));
        assert!(!report.ends_with('\n'));
    }

    #[test]
    fn test_empty_positions() {
        assert_eq!(positions_report(&[], 0), NO_POSITIONS);
    }

    #[test]
    fn test_limit_alert_only_lists_exceeded() {
        let now = 20 * HOUR;
        let alert = limit_alert(
            &[
                view("LSK<USDT", "1", 7 * HOUR, Some(("12h", LimitStatus::Exceeded { overshoot_ms: HOUR }))),
                view("ETHUSDT", "1", 18 * HOUR, Some(("1d", LimitStatus::Within { remaining_ms: 22 * HOUR }))),
            ],
            now,
        );
        assert!(alert.starts_with("⚠️ <b>WARNING"));
        assert!(alert.contains("🔴 <b>LSK&lt;USDT SHORT</b>"));
        assert!(alert.contains("Age: 13h 0m (limit: 12h)"));
        assert!(alert.contains("Over by: 1h 0m"));
        assert!(!alert.contains("ETHUSDT"));
        assert!(alert.ends_with("<i>Consider closing these positions.</i>"));
    }

    #[test]
    fn test_limits_list() {
        let mut doc = LimitsDocument::default();
        assert!(limits_list(&doc).contains("No holding limits set"));

        doc.upsert("lsk", "12h").unwrap();
        doc.upsert("BTC", "30m").unwrap();
        doc.set_check_interval("10m").unwrap();
        let text = limits_list(&doc);
        assert!(text.contains("1. LSK - 12h (12.0 h)"));
        assert!(text.contains("2. BTC - 30m (30 min)"));
        assert!(text.ends_with("⏱ Check interval: 10m"));
    }

    #[test]
    fn test_limit_replies() {
        let d = HoldDuration::parse("12h").unwrap();
        assert!(limit_saved("lsk", "12h", Upserted::Added(d)).contains("Coin: LSK\nTime: 12h (720 minutes)"));
        assert!(limit_saved("lsk", "12h", Upserted::Updated(d)).contains("LSK updated"));
        assert!(limit_removed("lsk", true).contains("LSK removed"));
        assert!(limit_removed("lsk", false).contains("No limit set for LSK"));
        assert!(unknown_command("foo").contains("/foo"));
        assert!(usage(UsageTopic::AddLimit).contains("/l LSK 12h"));
    }
}
