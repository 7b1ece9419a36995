//! Market-data lookup suite.
//!
//! One submodule per data source, one [`MarketDataSuite`] implementing the
//! [`MarketData`] trait over all of them. Every lookup follows the same
//! shape: fetch a compact data digest from the upstream source, then ask
//! the completion provider to phrase the answer -- structured parsing of
//! the sources beyond what the prompt needs is deliberately out of scope.

pub mod crypto;
pub mod currency;
pub mod jobs;
pub mod lottery;
pub mod metals;
pub mod names;
pub mod stock;

use std::time::Duration;

use finline_core::dispatch::{LlmProvider, MarketData};
use finline_types::error::LookupError;
use finline_types::llm::{CompletionRequest, Message, MessageRole};

use self::names::StockNameTable;

/// Output budget for lookup summaries.
const SUMMARY_MAX_TOKENS: u32 = 2000;

/// Lookup summaries stay factual; sampling runs cooler than chat.
const SUMMARY_TEMPERATURE: f64 = 0.7;

/// All market-data lookups behind one implementation.
///
/// Holds a single reqwest client (constructed once, reused for the process
/// lifetime) and the completion provider used to phrase replies.
pub struct MarketDataSuite<L> {
    http: reqwest::Client,
    llm: L,
    names: StockNameTable,
}

impl<L: LlmProvider> MarketDataSuite<L> {
    pub fn new(llm: L, names: StockNameTable) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; finline/0.1)")
            .build()
            .expect("failed to create reqwest client");

        Self { http, llm, names }
    }

    /// Phrase a fetched data digest as a reply, in the persona of the
    /// given system prompt.
    async fn summarize(&self, system: &str, content: String) -> Result<String, LookupError> {
        let request = CompletionRequest {
            // Empty model: the provider substitutes its configured default.
            model: String::new(),
            messages: vec![Message::new(MessageRole::User, content)],
            system: Some(system.to_string()),
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: Some(SUMMARY_TEMPERATURE),
        };

        self.llm
            .complete(&request)
            .await
            .map(|response| response.content)
            .map_err(|e| LookupError::Completion(e.to_string()))
    }
}

impl<L: LlmProvider> MarketData for MarketDataSuite<L> {
    async fn stock_quote(&self, symbol: &str) -> Result<String, LookupError> {
        let digest = stock::fetch_quote(&self.http, symbol, &self.names).await?;
        self.summarize(stock::SYSTEM_PROMPT, digest).await
    }

    async fn gold_price(&self) -> Result<String, LookupError> {
        let digest = metals::fetch_spot(&self.http, metals::GOLD_SYMBOL).await?;
        self.summarize(metals::SYSTEM_PROMPT, digest).await
    }

    async fn platinum_price(&self) -> Result<String, LookupError> {
        let digest = metals::fetch_spot(&self.http, metals::PLATINUM_SYMBOL).await?;
        self.summarize(metals::SYSTEM_PROMPT, digest).await
    }

    async fn currency_rate(&self, code: &str) -> Result<String, LookupError> {
        let digest = currency::fetch_rate(&self.http, code).await?;
        self.summarize(currency::SYSTEM_PROMPT, digest).await
    }

    async fn lottery_digest(&self, raw: &str) -> Result<String, LookupError> {
        let digest = lottery::fetch_results(&self.http, raw).await?;
        self.summarize(lottery::SYSTEM_PROMPT, digest).await
    }

    async fn job_search(&self, query: &str) -> Result<String, LookupError> {
        let digest = jobs::fetch_jobs(&self.http, query, jobs::JobMode::FullTime).await?;
        self.summarize(jobs::SYSTEM_PROMPT, digest).await
    }

    async fn part_time_search(&self, query: &str) -> Result<String, LookupError> {
        let digest = jobs::fetch_jobs(&self.http, query, jobs::JobMode::PartTime).await?;
        self.summarize(jobs::SYSTEM_PROMPT, digest).await
    }

    async fn crypto_price(&self, coin_id: &str) -> Result<String, LookupError> {
        let digest = crypto::fetch_price(&self.http, coin_id).await?;
        self.summarize(crypto::SYSTEM_PROMPT, digest).await
    }
}

/// Read a response body, mapping transport and HTTP-status failures onto
/// [`LookupError`]. Shared by the submodule fetchers.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, LookupError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LookupError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .text()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))
}
