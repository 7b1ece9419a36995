//! Intent tags produced by the message classifier.
//!
//! An [`Intent`] is the classified category of a user message; the
//! dispatcher maps each tag to exactly one handler call. Tags carry the
//! parameters extracted during classification (stock code, query text,
//! coin id) so dispatch never re-parses the message.

use std::fmt;

/// Market selector for index quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Domestic,
    Foreign,
}

impl Market {
    /// Sentinel string the stock-quote handler expects for a whole-market query.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Market::Domestic => "大盤",
            Market::Foreign => "美盤",
        }
    }
}

/// Precious metal selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Platinum,
}

/// The classified category of one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Lottery-result query; the handler receives the raw message.
    Lottery,
    /// Whole-market index quote (domestic or foreign).
    IndexQuote(Market),
    /// Spot price for a precious metal.
    MetalPrice(Metal),
    /// Exchange-rate query for an ISO currency code.
    CurrencyConversion(&'static str),
    /// Full-time job search with the trimmed query text.
    JobSearch(String),
    /// Part-time job search with the trimmed query text.
    PartTimeSearch(String),
    /// Cryptocurrency price for a coin id.
    CryptoPrice(String),
    /// Quote for a domestic stock code (4-5 digits, optional letter).
    DomesticStock(String),
    /// Quote for a foreign ticker (1-5 letters).
    ForeignStock(String),
    /// Activate the companion persona for this chat.
    EnterPersona,
    /// Deactivate the companion persona for this chat.
    ExitPersona,
    /// No specialized rule matched; answer conversationally.
    Fallback,
}

impl Intent {
    /// Short tag for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Intent::Lottery => "lottery",
            Intent::IndexQuote(_) => "index_quote",
            Intent::MetalPrice(_) => "metal_price",
            Intent::CurrencyConversion(_) => "currency",
            Intent::JobSearch(_) => "job_search",
            Intent::PartTimeSearch(_) => "part_time_search",
            Intent::CryptoPrice(_) => "crypto_price",
            Intent::DomesticStock(_) => "domestic_stock",
            Intent::ForeignStock(_) => "foreign_stock",
            Intent::EnterPersona => "enter_persona",
            Intent::ExitPersona => "exit_persona",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
