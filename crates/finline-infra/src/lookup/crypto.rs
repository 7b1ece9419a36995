//! Cryptocurrency price lookups via the CoinGecko simple-price API.
//!
//! Coin ids are CoinGecko ids (`bitcoin`, `dogecoin`, ...), which is also
//! what the `cb:`/`$:` message prefixes carry.

use serde_json::Value;

use finline_types::error::LookupError;

use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位加密貨幣行情助理, 根據提供的報價資料, \
    以繁體中文說明目前幣價 (美元與新台幣) 與 24 小時漲跌幅。";

const COINGECKO_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Fetch a price digest for a CoinGecko coin id.
pub(crate) async fn fetch_price(
    http: &reqwest::Client,
    coin_id: &str,
) -> Result<String, LookupError> {
    let response = http
        .get(COINGECKO_PRICE_URL)
        .query(&[
            ("ids", coin_id),
            ("vs_currencies", "usd,twd"),
            ("include_24hr_change", "true"),
        ])
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;
    let body = read_body(response).await?;
    let value: Value =
        serde_json::from_str(&body).map_err(|e| LookupError::Payload(e.to_string()))?;
    digest_price(&value, coin_id)
}

/// Digest CoinGecko's `{coin_id: {usd, twd, usd_24h_change}}` payload.
pub(crate) fn digest_price(value: &Value, coin_id: &str) -> Result<String, LookupError> {
    let entry = &value[coin_id];
    if entry.is_null() {
        // Unknown ids come back as an empty object.
        return Err(LookupError::NoData(coin_id.to_string()));
    }

    let usd = entry["usd"]
        .as_f64()
        .ok_or_else(|| LookupError::Payload(format!("usd price missing for {coin_id}")))?;
    let twd = entry["twd"].as_f64();
    let change = entry["usd_24h_change"].as_f64();

    let mut digest = format!("{coin_id}: {usd} USD");
    if let Some(twd) = twd {
        digest.push_str(&format!(" / {twd:.0} TWD"));
    }
    if let Some(change) = change {
        digest.push_str(&format!(", 24h {change:+.2}%"));
    }
    Ok(digest)
}
