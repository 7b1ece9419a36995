//! Exchange-rate lookups.
//!
//! Rates come from the Bank of Taiwan daily CSV; the row for the requested
//! currency is passed (with the header) to the summarization prompt, which
//! phrases buy/sell rates without this module hard-coding the column layout.

use finline_types::error::LookupError;

use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位外匯行情助理, 根據台灣銀行牌告匯率資料, \
    以繁體中文說明目前的現金與即期買賣匯率, 金額以新台幣計。";

const BOT_RATES_URL: &str = "https://rate.bot.com.tw/xrt/flcsv/0/day";

/// Fetch the rate digest for an ISO currency code (e.g. `JPY`, `USD`).
pub(crate) async fn fetch_rate(
    http: &reqwest::Client,
    code: &str,
) -> Result<String, LookupError> {
    let response = http
        .get(BOT_RATES_URL)
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;
    let body = read_body(response).await?;
    extract_rate_lines(&body, code)
}

/// Pull the header line and the row for `code` out of the daily CSV.
pub(crate) fn extract_rate_lines(csv: &str, code: &str) -> Result<String, LookupError> {
    let mut lines = csv.lines();
    let header = lines
        .next()
        .ok_or_else(|| LookupError::Payload("empty rate sheet".to_string()))?;

    let row = lines
        .find(|line| {
            line.split(',')
                .next()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(code))
        })
        .ok_or_else(|| LookupError::NoData(code.to_string()))?;

    Ok(format!("{header}\n{row}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "幣別,匯率,現金買入,現金賣出,即期買入,即期賣出\n\
                          USD,本行,31.205,31.875,31.555,31.655\n\
                          JPY,本行,0.2031,0.2157,0.2094,0.2134\n";

    #[test]
    fn extracts_requested_row_with_header() {
        let digest = extract_rate_lines(SAMPLE, "JPY").unwrap();
        assert!(digest.starts_with("幣別"));
        assert!(digest.contains("JPY"));
        assert!(!digest.contains("USD"));
    }

    #[test]
    fn code_match_is_case_insensitive() {
        assert!(extract_rate_lines(SAMPLE, "usd").is_ok());
    }

    #[test]
    fn unknown_code_is_no_data() {
        assert!(matches!(
            extract_rate_lines(SAMPLE, "EUR"),
            Err(LookupError::NoData(code)) if code == "EUR"
        ));
    }

    #[test]
    fn empty_sheet_is_payload_error() {
        assert!(matches!(
            extract_rate_lines("", "USD"),
            Err(LookupError::Payload(_))
        ));
    }
}
