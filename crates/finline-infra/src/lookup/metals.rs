//! Precious metal spot prices.
//!
//! Gold and platinum spot quotes come from the Stooq CSV quote endpoint
//! (one header line, one data line per symbol).

use finline_types::error::LookupError;

use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位貴金屬行情助理, 根據提供的現貨報價資料, \
    以繁體中文說明目前金價或鉑金價格與當日走勢。";

const STOOQ_QUOTE_URL: &str = "https://stooq.com/q/l/";

/// Spot gold in USD per ounce.
pub(crate) const GOLD_SYMBOL: &str = "xauusd";

/// Spot platinum in USD per ounce.
pub(crate) const PLATINUM_SYMBOL: &str = "xptusd";

/// Fetch a one-line spot digest for a Stooq symbol.
pub(crate) async fn fetch_spot(
    http: &reqwest::Client,
    symbol: &str,
) -> Result<String, LookupError> {
    let response = http
        .get(STOOQ_QUOTE_URL)
        .query(&[("s", symbol), ("f", "sd2t2ohlcv"), ("h", ""), ("e", "csv")])
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;
    let body = read_body(response).await?;
    digest_csv(&body)
}

/// Digest Stooq's `Symbol,Date,Time,Open,High,Low,Close,Volume` CSV.
pub(crate) fn digest_csv(csv: &str) -> Result<String, LookupError> {
    let line = csv
        .lines()
        .nth(1)
        .ok_or_else(|| LookupError::Payload("quote line missing".to_string()))?;

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 7 {
        return Err(LookupError::Payload(format!("unexpected quote line: {line}")));
    }
    let symbol = fields[0];
    // Stooq reports "N/D" across the board for unknown symbols.
    if fields[6] == "N/D" {
        return Err(LookupError::NoData(symbol.to_string()));
    }

    Ok(format!(
        "{symbol} {date} {time}: 開盤 {open} 最高 {high} 最低 {low} 收盤 {close} (美元/盎司)",
        date = fields[1],
        time = fields[2],
        open = fields[3],
        high = fields[4],
        low = fields[5],
        close = fields[6],
    ))
}
