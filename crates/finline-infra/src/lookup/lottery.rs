//! Lottery result lookups.
//!
//! Taiwan Lottery publishes the latest draws on its result page; there is
//! no stable public JSON API. The page is fetched, stripped to visible
//! text, truncated, and handed to the prompt together with the user's
//! question -- the model extracts the game the user asked about.

use finline_types::error::LookupError;

use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位台灣彩券開獎資訊助理, 根據提供的開獎頁面內容, \
    以繁體中文回答使用者詢問的彩種最新開獎號碼與日期; 找不到該彩種時請直接說明。";

const LOTTERY_RESULT_URL: &str = "https://www.taiwanlottery.com/lotto/result/recent";

/// Cap on page text sent to the prompt.
const MAX_PAGE_CHARS: usize = 4000;

/// Fetch the latest-results page and pair it with the user's question.
pub(crate) async fn fetch_results(
    http: &reqwest::Client,
    question: &str,
) -> Result<String, LookupError> {
    let response = http
        .get(LOTTERY_RESULT_URL)
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;
    let html = read_body(response).await?;

    let text = truncate_chars(&strip_tags(&html), MAX_PAGE_CHARS);
    if text.trim().is_empty() {
        return Err(LookupError::Payload("result page had no text".to_string()));
    }

    Ok(format!("問題: {question}\n開獎頁面內容:\n{text}"))
}

/// Drop markup, scripts, and styles; collapse the remaining whitespace.
pub(crate) fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 4);
    let mut chars = html.char_indices();
    let mut skip_until: Option<&str> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(end_tag) = skip_until {
            if starts_with_ignore_case(html, i, end_tag) {
                skip_until = None;
                // The end tag is ASCII; consume its remaining characters.
                for _ in 1..end_tag.len() {
                    chars.next();
                }
            }
            continue;
        }
        if c == '<' {
            if starts_with_ignore_case(html, i, "<script") {
                skip_until = Some("</script>");
            } else if starts_with_ignore_case(html, i, "<style") {
                skip_until = Some("</style>");
            } else {
                // Consume until the closing '>'.
                for (_, tc) in chars.by_ref() {
                    if tc == '>' {
                        break;
                    }
                }
                text.push(' ');
            }
            continue;
        }
        text.push(c);
    }

    // Collapse whitespace runs.
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starts_with_ignore_case(html: &str, at: usize, prefix: &str) -> bool {
    html.get(at..at + prefix.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(prefix))
}

/// Truncate on a character boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
