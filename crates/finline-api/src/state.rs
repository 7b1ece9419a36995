//! Application state wiring all services together.
//!
//! The dispatcher is generic over its collaborator traits; AppState pins it
//! to the concrete infra implementations. Every external client (Groq,
//! lookup suite, LINE) is constructed once here and shared for the process
//! lifetime.

use std::sync::Arc;

use secrecy::SecretString;

use finline_core::conversation::ConversationStore;
use finline_core::dispatch::Dispatcher;
use finline_infra::config::Config;
use finline_infra::line::LineClient;
use finline_infra::llm::GroqProvider;
use finline_infra::lookup::MarketDataSuite;
use finline_infra::lookup::names::StockNameTable;
use finline_infra::persona::CompanionPersona;

/// Concrete dispatcher type with the generics pinned to infra implementations.
pub type ConcreteDispatcher = Dispatcher<
    MarketDataSuite<Arc<GroqProvider>>,
    CompanionPersona<Arc<GroqProvider>>,
    Arc<GroqProvider>,
>;

/// Shared application state for the webhook handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
    pub line: Arc<LineClient>,
    pub channel_secret: SecretString,
}

impl AppState {
    /// Wire services from configuration.
    pub fn init(config: Config) -> Self {
        let groq = Arc::new(GroqProvider::new(&config.groq_api_key));

        let names = StockNameTable::load(&config.stock_names_path);
        tracing::info!(known_codes = names.len(), "stock name table loaded");

        let market = MarketDataSuite::new(Arc::clone(&groq), names);
        let persona = CompanionPersona::new(Arc::clone(&groq));
        let store = Arc::new(ConversationStore::new());
        let dispatcher = Dispatcher::new(store, market, persona, groq);

        let line = LineClient::new(config.line_base_url, config.channel_access_token);

        Self {
            dispatcher: Arc::new(dispatcher),
            line: Arc::new(line),
            channel_secret: config.channel_secret,
        }
    }
}
