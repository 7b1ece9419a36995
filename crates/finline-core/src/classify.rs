//! Ordered intent classification for inbound messages.
//!
//! [`classify`] is a pure function from message text to an [`Intent`] tag.
//! Rules are kept as an explicit ordered table evaluated first-match-wins,
//! so the priority between overlapping patterns (a lottery keyword inside a
//! sentence, a ticker that is also an English word) stays visible and
//! testable in one place.
//!
//! Pattern rules are anchored at the start of the message and require a word
//! boundary after the match; they do not need to consume the whole message.

use std::sync::LazyLock;

use regex::Regex;

use finline_types::intent::{Intent, Market, Metal};

/// Lottery game names; a message containing any of them anywhere is a
/// lottery query regardless of what else it matches.
const LOTTERY_KEYWORDS: &[&str] = &[
    "威力彩", "大樂透", "539", "雙贏彩", "3星彩", "三星彩", "4星彩", "四星彩",
    "38樂合彩", "39樂合彩", "49樂合彩", "運彩",
];

const DOMESTIC_INDEX_PREFIXES: &[&str] = &["大盤", "台股"];
const FOREIGN_INDEX_PREFIXES: &[&str] = &["美盤", "美股"];
const GOLD_PREFIXES: &[&str] = &["金價", "金", "黃金", "gold"];
const PLATINUM_PREFIXES: &[&str] = &["鉑", "鉑金", "platinum", "白金"];
const YEN_PREFIXES: &[&str] = &["日幣", "日元", "jpy", "換日幣"];
const DOLLAR_PREFIXES: &[&str] = &["美金", "usd", "美元", "換美金"];

/// Domestic stock code: 4-5 digits, optionally one letter (e.g. 2330, 00878,
/// 1101B), followed by a word boundary.
static DOMESTIC_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,5}[A-Za-z]?\b").expect("valid stock-code pattern"));

/// Foreign ticker: 1-5 letters followed by a word boundary.
static FOREIGN_TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{1,5}\b").expect("valid ticker pattern"));

type Rule = fn(&str) -> Option<Intent>;

/// The rule table. Order is the priority; the first rule to produce an
/// intent wins.
const RULES: &[Rule] = &[
    lottery,
    index_quote,
    metal_price,
    currency_conversion,
    prefixed_lookup,
    domestic_stock_code,
    foreign_ticker,
    named_crypto,
    persona_enter,
    persona_exit,
];

/// Classify one message into an [`Intent`].
pub fn classify(message: &str) -> Intent {
    RULES
        .iter()
        .find_map(|rule| rule(message))
        .unwrap_or(Intent::Fallback)
}

fn starts_with_any(message: &str, prefixes: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    prefixes
        .iter()
        .any(|prefix| lowered.starts_with(&prefix.to_lowercase()))
}

fn lottery(message: &str) -> Option<Intent> {
    LOTTERY_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
        .then_some(Intent::Lottery)
}

fn index_quote(message: &str) -> Option<Intent> {
    if starts_with_any(message, DOMESTIC_INDEX_PREFIXES) {
        Some(Intent::IndexQuote(Market::Domestic))
    } else if starts_with_any(message, FOREIGN_INDEX_PREFIXES) {
        Some(Intent::IndexQuote(Market::Foreign))
    } else {
        None
    }
}

fn metal_price(message: &str) -> Option<Intent> {
    if starts_with_any(message, GOLD_PREFIXES) {
        Some(Intent::MetalPrice(Metal::Gold))
    } else if starts_with_any(message, PLATINUM_PREFIXES) {
        Some(Intent::MetalPrice(Metal::Platinum))
    } else {
        None
    }
}

fn currency_conversion(message: &str) -> Option<Intent> {
    if starts_with_any(message, YEN_PREFIXES) {
        Some(Intent::CurrencyConversion("JPY"))
    } else if starts_with_any(message, DOLLAR_PREFIXES) {
        Some(Intent::CurrencyConversion("USD"))
    } else {
        None
    }
}

/// Literal prefix tags carrying a free-form query: `104:` (job search),
/// `pt:` (part-time search), `cb:` and `$:` (crypto lookup). The remainder
/// of the message is the argument, trimmed.
fn prefixed_lookup(message: &str) -> Option<Intent> {
    if let Some(rest) = message.strip_prefix("104:") {
        Some(Intent::JobSearch(rest.trim().to_string()))
    } else if let Some(rest) = message.strip_prefix("pt:") {
        Some(Intent::PartTimeSearch(rest.trim().to_string()))
    } else if let Some(rest) = message.strip_prefix("cb:") {
        Some(Intent::CryptoPrice(rest.trim().to_string()))
    } else if let Some(rest) = message.strip_prefix("$:") {
        Some(Intent::CryptoPrice(rest.trim().to_string()))
    } else {
        None
    }
}

fn domestic_stock_code(message: &str) -> Option<Intent> {
    DOMESTIC_CODE
        .find(message)
        .map(|m| Intent::DomesticStock(m.as_str().to_string()))
}

fn foreign_ticker(message: &str) -> Option<Intent> {
    FOREIGN_TICKER
        .find(message)
        .map(|m| Intent::ForeignStock(m.as_str().to_string()))
}

fn named_crypto(message: &str) -> Option<Intent> {
    if message.starts_with("比特幣") {
        Some(Intent::CryptoPrice("bitcoin".to_string()))
    } else if message.starts_with("狗狗幣") {
        Some(Intent::CryptoPrice("dogecoin".to_string()))
    } else {
        None
    }
}

fn persona_enter(message: &str) -> Option<Intent> {
    message.starts_with("老婆").then_some(Intent::EnterPersona)
}

fn persona_exit(message: &str) -> Option<Intent> {
    message.starts_with("離婚").then_some(Intent::ExitPersona)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lottery_keyword_wins_anywhere_in_message() {
        assert_eq!(classify("今天威力彩開幾號?"), Intent::Lottery);
        assert_eq!(classify("539"), Intent::Lottery);
        // A lottery keyword embedded mid-sentence still wins over the
        // ticker rule the leading letters would otherwise match.
        assert_eq!(classify("hi 運彩賠率?"), Intent::Lottery);
    }

    #[test]
    fn index_prefixes_select_market() {
        assert_eq!(classify("大盤如何"), Intent::IndexQuote(Market::Domestic));
        assert_eq!(classify("台股走勢"), Intent::IndexQuote(Market::Domestic));
        assert_eq!(classify("美盤"), Intent::IndexQuote(Market::Foreign));
        assert_eq!(classify("美股現在如何"), Intent::IndexQuote(Market::Foreign));
    }

    #[test]
    fn metal_prefixes_are_case_insensitive() {
        assert_eq!(classify("金價多少"), Intent::MetalPrice(Metal::Gold));
        assert_eq!(classify("黃金"), Intent::MetalPrice(Metal::Gold));
        assert_eq!(classify("Gold price?"), Intent::MetalPrice(Metal::Gold));
        assert_eq!(classify("鉑金行情"), Intent::MetalPrice(Metal::Platinum));
        assert_eq!(classify("Platinum"), Intent::MetalPrice(Metal::Platinum));
        assert_eq!(classify("白金"), Intent::MetalPrice(Metal::Platinum));
    }

    #[test]
    fn currency_prefixes_map_to_codes() {
        assert_eq!(classify("日幣匯率"), Intent::CurrencyConversion("JPY"));
        assert_eq!(classify("JPY"), Intent::CurrencyConversion("JPY"));
        assert_eq!(classify("換日幣"), Intent::CurrencyConversion("JPY"));
        assert_eq!(classify("美金匯率"), Intent::CurrencyConversion("USD"));
        assert_eq!(classify("usd to twd"), Intent::CurrencyConversion("USD"));
        assert_eq!(classify("換美金"), Intent::CurrencyConversion("USD"));
    }

    #[test]
    fn prefixed_lookups_trim_their_argument() {
        assert_eq!(
            classify("104:後端工程師"),
            Intent::JobSearch("後端工程師".to_string())
        );
        assert_eq!(
            classify("pt: 週末兼職 "),
            Intent::PartTimeSearch("週末兼職".to_string())
        );
        assert_eq!(
            classify("cb: bitcoin"),
            Intent::CryptoPrice("bitcoin".to_string())
        );
        assert_eq!(
            classify("$:ethereum"),
            Intent::CryptoPrice("ethereum".to_string())
        );
    }

    #[test]
    fn domestic_stock_codes_match_with_boundary() {
        assert_eq!(classify("2330"), Intent::DomesticStock("2330".to_string()));
        assert_eq!(
            classify("2330 現在多少"),
            Intent::DomesticStock("2330".to_string())
        );
        assert_eq!(classify("00878"), Intent::DomesticStock("00878".to_string()));
        assert_eq!(classify("1101B"), Intent::DomesticStock("1101B".to_string()));
        // Six digits is not a stock code.
        assert_eq!(classify("123456"), Intent::Fallback);
        // Three digits is not a stock code either (and not 539).
        assert_eq!(classify("123"), Intent::Fallback);
    }

    #[test]
    fn foreign_tickers_match_short_leading_words() {
        assert_eq!(classify("AAPL"), Intent::ForeignStock("AAPL".to_string()));
        assert_eq!(
            classify("tsla price?"),
            Intent::ForeignStock("tsla".to_string())
        );
        // More than five leading letters falls through to conversation.
        assert_eq!(classify("thinking about stocks"), Intent::Fallback);
    }

    #[test]
    fn named_crypto_triggers() {
        assert_eq!(classify("比特幣"), Intent::CryptoPrice("bitcoin".to_string()));
        assert_eq!(
            classify("狗狗幣漲了嗎"),
            Intent::CryptoPrice("dogecoin".to_string())
        );
    }

    #[test]
    fn persona_triggers_are_exact_prefixes() {
        assert_eq!(classify("老婆早安"), Intent::EnterPersona);
        assert_eq!(classify("離婚吧"), Intent::ExitPersona);
        // Not at the start of the message: no trigger.
        assert_eq!(classify("我家老婆說"), Intent::Fallback);
    }

    #[test]
    fn everything_else_falls_back() {
        assert_eq!(classify("今天天氣如何?"), Intent::Fallback);
        assert_eq!(classify(""), Intent::Fallback);
    }

    #[test]
    fn ordering_gold_beats_ticker() {
        // "gold" is 4 letters and would match the ticker rule, but the
        // metal rule sits earlier in the table.
        assert_eq!(classify("gold"), Intent::MetalPrice(Metal::Gold));
    }

    #[test]
    fn ordering_prefix_tag_beats_ticker() {
        // "pt" alone would be a ticker; "pt:" is a part-time search tag.
        assert_eq!(classify("pt"), Intent::ForeignStock("pt".to_string()));
        assert_eq!(classify("pt:"), Intent::PartTimeSearch(String::new()));
    }

    #[test]
    fn ordering_lottery_beats_stock_code() {
        // Starts with a valid stock code, but the lottery keyword later in
        // the message takes priority.
        assert_eq!(classify("2330 威力彩"), Intent::Lottery);
    }
}
