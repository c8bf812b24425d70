//! Symbol helpers.

/// Quote assets stripped from a futures symbol to find its base asset.
/// Checked in order; the first matching suffix wins.
pub const QUOTE_SUFFIXES: [&str; 6] = ["USDT", "BUSD", "USDC", "BTC", "ETH", "BNB"];

/// Base asset of a symbol, uppercased (`lskusdt` -> `LSK`).
///
/// Symbols that consist only of a quote asset, or carry no known quote
/// suffix, are returned whole.
pub fn base_asset(symbol: &str) -> String {
    let upper = symbol.trim().to_ascii_uppercase();
    QUOTE_SUFFIXES
        .iter()
        .find_map(|suffix| {
            upper
                .strip_suffix(suffix)
                .filter(|base| !base.is_empty())
                .map(str::to_string)
        })
        .unwrap_or(upper)
}
