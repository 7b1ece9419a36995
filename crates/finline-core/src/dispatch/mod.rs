//! Intent dispatch: maps a classified message onto exactly one collaborator
//! call and keeps the conversation history continuous.
//!
//! Collaborator traits use native async fn in traits (RPITIT, Rust 2024
//! edition); concrete implementations live in finline-infra. The dispatcher
//! is generic over the traits (same shape as a service generic over its
//! repositories) so tests can drop in plain mock structs.

pub mod responder;

use std::sync::Arc;

use tracing::{debug, warn};

use finline_types::chat::{Persona, Turn};
use finline_types::error::LookupError;
use finline_types::intent::{Intent, Metal};
use finline_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

use crate::classify::classify;
use crate::conversation::{ConversationStore, MAX_HISTORY_LEN};
use crate::dispatch::responder::{completion_error_text, respond};

/// Fixed reply used whenever a handler produces empty or blank text.
pub const APOLOGY_REPLY: &str = "抱歉，目前無法提供回應，請稍後再試。";

/// Name the persona handler greets the user by.
const PERSONA_ADDRESSEE: &str = "主人";

/// Trait for completion-service backends.
pub trait LlmProvider: Send + Sync {
    /// Service name used in user-visible error strings (e.g. "GROQ API").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

// Shared providers are passed around as Arc; forward the trait through it
// so generics can be satisfied by either an owned or a shared provider.
impl<T: LlmProvider> LlmProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send {
        (**self).complete(request)
    }
}

/// Trait for the external market-data lookups. Each method returns finished
/// reply text; how the data is fetched and summarized is the implementation's
/// business.
pub trait MarketData: Send + Sync {
    /// Quote for a stock code, ticker, or whole-market sentinel (大盤/美盤).
    fn stock_quote(
        &self,
        symbol: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Current gold price digest.
    fn gold_price(&self)
        -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Current platinum price digest.
    fn platinum_price(
        &self,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Exchange-rate digest for an ISO currency code.
    fn currency_rate(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Lottery-result digest; receives the raw user message.
    fn lottery_digest(
        &self,
        raw: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Full-time job search.
    fn job_search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Part-time job search.
    fn part_time_search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;

    /// Cryptocurrency price digest for a coin id.
    fn crypto_price(
        &self,
        coin_id: &str,
    ) -> impl std::future::Future<Output = Result<String, LookupError>> + Send;
}

/// Trait for the companion persona responder.
pub trait PersonaReplies: Send + Sync {
    /// A persona-voiced reply addressed to `name`.
    fn persona_reply(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

/// Routes classified messages to collaborators and updates the store.
pub struct Dispatcher<M, P, L> {
    store: Arc<ConversationStore>,
    market: M,
    persona: P,
    llm: L,
}

impl<M, P, L> Dispatcher<M, P, L>
where
    M: MarketData,
    P: PersonaReplies,
    L: LlmProvider,
{
    pub fn new(store: Arc<ConversationStore>, market: M, persona: P, llm: L) -> Self {
        Self {
            store,
            market,
            persona,
            llm,
        }
    }

    /// Access the conversation store.
    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Handle one inbound message for a chat and produce the reply text.
    ///
    /// Handler failures never propagate: they are replaced with an inline
    /// error string naming the failure. Blank replies are replaced with the
    /// fixed apology. Whatever branch produced the reply, the user message
    /// and the final reply are appended to history as two new turns, so
    /// conversational context also carries specialized-handler output.
    pub async fn handle_message(&self, chat_id: &str, text: &str) -> String {
        self.store.ensure(chat_id);

        let intent = classify(text);
        debug!(chat_id, intent = intent.tag(), "dispatching message");

        let reply = self.produce_reply(chat_id, text, &intent).await;

        let reply = if reply.trim().is_empty() {
            warn!(chat_id, intent = intent.tag(), "empty reply, substituting apology");
            APOLOGY_REPLY.to_string()
        } else {
            reply
        };

        self.store.append_turn(chat_id, MessageRole::User, text);
        self.store.append_turn(chat_id, MessageRole::Assistant, &reply);

        reply
    }

    async fn produce_reply(&self, chat_id: &str, text: &str, intent: &Intent) -> String {
        match intent {
            Intent::Lottery => self.lookup(self.market.lottery_digest(text)).await,
            Intent::IndexQuote(market) => {
                self.lookup(self.market.stock_quote(market.sentinel())).await
            }
            Intent::MetalPrice(Metal::Gold) => self.lookup(self.market.gold_price()).await,
            Intent::MetalPrice(Metal::Platinum) => {
                self.lookup(self.market.platinum_price()).await
            }
            Intent::CurrencyConversion(code) => {
                self.lookup(self.market.currency_rate(code)).await
            }
            Intent::JobSearch(query) => self.lookup(self.market.job_search(query)).await,
            Intent::PartTimeSearch(query) => {
                self.lookup(self.market.part_time_search(query)).await
            }
            Intent::CryptoPrice(coin_id) => {
                self.lookup(self.market.crypto_price(coin_id)).await
            }
            Intent::DomesticStock(code) => self.lookup(self.market.stock_quote(code)).await,
            Intent::ForeignStock(ticker) => self.lookup(self.market.stock_quote(ticker)).await,
            Intent::EnterPersona => {
                self.store.set_persona(chat_id, Persona::Companion);
                self.persona_reply().await
            }
            Intent::ExitPersona => {
                self.store.set_persona(chat_id, Persona::Base);
                // Resuming normal mode answers from the full capped history,
                // not just the window.
                let mut turns = self.store.history(chat_id);
                turns.push(Turn::new(MessageRole::User, text));
                respond(&self.llm, turns).await
            }
            Intent::Fallback => {
                if self.store.persona(chat_id) == Persona::Companion {
                    self.persona_reply().await
                } else {
                    let mut turns = self.store.recent(chat_id, MAX_HISTORY_LEN);
                    turns.push(Turn::new(MessageRole::User, text));
                    respond(&self.llm, turns).await
                }
            }
        }
    }

    async fn lookup(
        &self,
        fut: impl std::future::Future<Output = Result<String, LookupError>>,
    ) -> String {
        match fut.await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "lookup handler failed");
                format!("資料查詢發生錯誤: {err}")
            }
        }
    }

    async fn persona_reply(&self) -> String {
        match self.persona.persona_reply(PERSONA_ADDRESSEE).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "persona handler failed");
                completion_error_text(self.llm.name(), &err)
            }
        }
    }
}
