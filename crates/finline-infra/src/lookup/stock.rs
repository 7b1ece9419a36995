//! Stock quote lookups.
//!
//! Domestic codes (and the 大盤 index sentinel) go to the TWSE real-time
//! quote API; foreign tickers (and the 美盤 sentinel) go to the Yahoo
//! Finance chart API. Both produce a compact text digest for the
//! summarization prompt.

use serde_json::Value;

use finline_types::error::LookupError;

use super::names::StockNameTable;
use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位專業的證券分析師, 根據提供的即時行情資料, \
    以繁體中文簡潔說明目前價格與漲跌情況, 並提醒投資有風險。";

const TWSE_QUOTE_URL: &str = "https://mis.twse.com.tw/stock/api/getStockInfo.jsp";
const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// TWSE exchange channel for the weighted index (大盤).
const TAIEX_CHANNEL: &str = "tse_t00.tw";

/// Yahoo symbol for the S&P 500 (美盤).
const SP500_SYMBOL: &str = "^GSPC";

/// Where a quote request is routed.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum QuoteTarget {
    /// TWSE channel string(s), e.g. `tse_2330.tw|otc_2330.tw`.
    Twse(String),
    /// Yahoo chart symbol, e.g. `AAPL` or `^GSPC`.
    Yahoo(String),
}

/// Map a symbol (or market sentinel) onto its upstream source.
pub(crate) fn resolve_target(symbol: &str) -> QuoteTarget {
    if symbol == "大盤" {
        QuoteTarget::Twse(TAIEX_CHANNEL.to_string())
    } else if symbol == "美盤" {
        QuoteTarget::Yahoo(SP500_SYMBOL.to_string())
    } else if symbol.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        // Listed or OTC is unknown up front; ask for both channels.
        QuoteTarget::Twse(format!("tse_{symbol}.tw|otc_{symbol}.tw"))
    } else {
        QuoteTarget::Yahoo(symbol.to_uppercase())
    }
}

/// Fetch a quote digest for a code, ticker, or market sentinel.
pub(crate) async fn fetch_quote(
    http: &reqwest::Client,
    symbol: &str,
    names: &StockNameTable,
) -> Result<String, LookupError> {
    match resolve_target(symbol) {
        QuoteTarget::Twse(channel) => {
            let response = http
                .get(TWSE_QUOTE_URL)
                .query(&[("ex_ch", channel.as_str()), ("json", "1"), ("delay", "0")])
                .send()
                .await
                .map_err(|e| LookupError::Request(e.to_string()))?;
            let body = read_body(response).await?;
            let value: Value = serde_json::from_str(&body)
                .map_err(|e| LookupError::Payload(e.to_string()))?;
            let mut digest = digest_twse(&value, symbol)?;
            if let Some(name) = names.name_of(symbol) {
                digest = format!("{symbol} {name}\n{digest}");
            }
            Ok(digest)
        }
        QuoteTarget::Yahoo(yahoo_symbol) => {
            let url = format!("{YAHOO_CHART_URL}/{yahoo_symbol}");
            let response = http
                .get(&url)
                .query(&[("interval", "1d"), ("range", "5d")])
                .send()
                .await
                .map_err(|e| LookupError::Request(e.to_string()))?;
            let body = read_body(response).await?;
            let value: Value = serde_json::from_str(&body)
                .map_err(|e| LookupError::Payload(e.to_string()))?;
            digest_yahoo(&value, &yahoo_symbol)
        }
    }
}

/// Digest the TWSE quote payload (`msgArray` entries) into prompt text.
pub(crate) fn digest_twse(value: &Value, symbol: &str) -> Result<String, LookupError> {
    let entries = value["msgArray"]
        .as_array()
        .ok_or_else(|| LookupError::Payload("msgArray missing".to_string()))?;

    let mut lines = Vec::new();
    for entry in entries {
        let name = entry["n"].as_str().unwrap_or_default();
        let last = entry["z"].as_str().unwrap_or("-");
        let prev_close = entry["y"].as_str().unwrap_or("-");
        let open = entry["o"].as_str().unwrap_or("-");
        let high = entry["h"].as_str().unwrap_or("-");
        let low = entry["l"].as_str().unwrap_or("-");
        let time = entry["t"].as_str().unwrap_or("-");
        if name.is_empty() {
            continue;
        }
        lines.push(format!(
            "{name}: 成交 {last} 開盤 {open} 最高 {high} 最低 {low} 昨收 {prev_close} (時間 {time})"
        ));
    }

    if lines.is_empty() {
        return Err(LookupError::NoData(symbol.to_string()));
    }
    Ok(lines.join("\n"))
}

/// Digest the Yahoo chart payload (`chart.result[0].meta`) into prompt text.
pub(crate) fn digest_yahoo(value: &Value, symbol: &str) -> Result<String, LookupError> {
    let meta = &value["chart"]["result"][0]["meta"];
    if meta.is_null() {
        // Yahoo reports unknown symbols under chart.error.
        if let Some(desc) = value["chart"]["error"]["description"].as_str() {
            return Err(LookupError::Payload(desc.to_string()));
        }
        return Err(LookupError::NoData(symbol.to_string()));
    }

    let price = meta["regularMarketPrice"]
        .as_f64()
        .ok_or_else(|| LookupError::NoData(symbol.to_string()))?;
    let prev_close = meta["chartPreviousClose"].as_f64().unwrap_or(price);
    let currency = meta["currency"].as_str().unwrap_or("");
    let change = price - prev_close;
    let change_pct = if prev_close != 0.0 {
        change / prev_close * 100.0
    } else {
        0.0
    };

    Ok(format!(
        "{symbol}: 現價 {price:.2} {currency}, 前收 {prev_close:.2}, 漲跌 {change:+.2} ({change_pct:+.2}%)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_route_to_their_market() {
        assert_eq!(
            resolve_target("大盤"),
            QuoteTarget::Twse("tse_t00.tw".to_string())
        );
        assert_eq!(
            resolve_target("美盤"),
            QuoteTarget::Yahoo("^GSPC".to_string())
        );
    }

    #[test]
    fn numeric_codes_query_both_twse_channels() {
        assert_eq!(
            resolve_target("2330"),
            QuoteTarget::Twse("tse_2330.tw|otc_2330.tw".to_string())
        );
    }

    #[test]
    fn tickers_route_to_yahoo_uppercased() {
        assert_eq!(resolve_target("aapl"), QuoteTarget::Yahoo("AAPL".to_string()));
    }

    #[test]
    fn twse_digest_formats_entries() {
        let value: Value = serde_json::from_str(
            r#"{"msgArray":[{"n":"台積電","z":"580.00","y":"575.00","o":"578.00","h":"582.00","l":"577.00","t":"13:30:00"}]}"#,
        )
        .unwrap();
        let digest = digest_twse(&value, "2330").unwrap();
        assert!(digest.contains("台積電"));
        assert!(digest.contains("成交 580.00"));
        assert!(digest.contains("昨收 575.00"));
    }

    #[test]
    fn twse_digest_empty_array_is_no_data() {
        let value: Value = serde_json::from_str(r#"{"msgArray":[]}"#).unwrap();
        assert!(matches!(
            digest_twse(&value, "9999"),
            Err(LookupError::NoData(code)) if code == "9999"
        ));
    }

    #[test]
    fn yahoo_digest_computes_change() {
        let value: Value = serde_json::from_str(
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":195.5,"chartPreviousClose":190.0,"currency":"USD"}}]}}"#,
        )
        .unwrap();
        let digest = digest_yahoo(&value, "AAPL").unwrap();
        assert!(digest.contains("現價 195.50 USD"));
        assert!(digest.contains("+5.50"));
        assert!(digest.contains("+2.89%"));
    }

    #[test]
    fn yahoo_digest_surfaces_error_description() {
        let value: Value = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            digest_yahoo(&value, "ZZZZZ"),
            Err(LookupError::Payload(desc)) if desc.contains("delisted")
        ));
    }
}
