//! Conversational fallback: turn a history window into a completion call.
//!
//! The instruction suffix is appended to the most recent user message in
//! the outgoing request only; stored turns stay raw.

use tracing::warn;

use finline_types::chat::Turn;
use finline_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::dispatch::LlmProvider;

/// Instruction appended to the latest user message before it is sent.
pub const REPLY_LANGUAGE_SUFFIX: &str = ", 請以繁體中文回答我問題";

/// Output token budget for one reply.
const MAX_REPLY_TOKENS: u32 = 2000;

/// Sampling temperature for conversational replies.
const REPLY_TEMPERATURE: f64 = 1.2;

/// Answer conversationally from the given turns.
///
/// Provider failures are not propagated; the reply becomes an error string
/// naming the service, and the caller stores/sends it like any other reply.
pub async fn respond<L: LlmProvider>(llm: &L, turns: Vec<Turn>) -> String {
    let mut messages: Vec<Message> = turns
        .into_iter()
        .map(|turn| Message {
            role: turn.role,
            content: turn.content,
        })
        .collect();

    if let Some(last_user) = messages
        .iter_mut()
        .rev()
        .find(|m| m.role == MessageRole::User)
    {
        last_user.content.push_str(REPLY_LANGUAGE_SUFFIX);
    }

    let request = CompletionRequest {
        // Empty model: the provider substitutes its configured default.
        model: String::new(),
        messages,
        system: None,
        max_tokens: MAX_REPLY_TOKENS,
        temperature: Some(REPLY_TEMPERATURE),
    };

    match llm.complete(&request).await {
        Ok(response) => response.content,
        Err(err) => {
            warn!(provider = llm.name(), error = %err, "completion call failed");
            completion_error_text(llm.name(), &err)
        }
    }
}

/// User-visible error string for a failed completion call.
pub fn completion_error_text(provider_name: &str, err: &LlmError) -> String {
    format!("{provider_name} 發生錯誤: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use finline_types::llm::{CompletionResponse, Usage};

    struct CapturingLlm {
        requests: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    impl LlmProvider for CapturingLlm {
        fn name(&self) -> &str {
            "GROQ API"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(LlmError::AuthenticationFailed);
            }
            Ok(CompletionResponse {
                id: "cmpl-1".to_string(),
                content: "好的".to_string(),
                model: "m".to_string(),
                usage: Usage::default(),
            })
        }
    }

    fn llm(fail: bool) -> CapturingLlm {
        CapturingLlm {
            requests: Mutex::new(Vec::new()),
            fail,
        }
    }

    #[tokio::test]
    async fn suffix_lands_on_latest_user_message_only() {
        let provider = llm(false);
        let turns = vec![
            Turn::new(MessageRole::User, "第一句"),
            Turn::new(MessageRole::Assistant, "回覆"),
            Turn::new(MessageRole::User, "第二句"),
        ];
        respond(&provider, turns).await;

        let requests = provider.requests.lock().unwrap();
        let messages = &requests[0].messages;
        assert_eq!(messages[0].content, "第一句");
        assert_eq!(messages[1].content, "回覆");
        assert_eq!(messages[2].content, format!("第二句{REPLY_LANGUAGE_SUFFIX}"));
    }

    #[tokio::test]
    async fn request_carries_fixed_sampling_parameters() {
        let provider = llm(false);
        respond(&provider, vec![Turn::new(MessageRole::User, "hi")]).await;

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, MAX_REPLY_TOKENS);
        assert_eq!(requests[0].temperature, Some(REPLY_TEMPERATURE));
        assert!(requests[0].model.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_text() {
        let provider = llm(true);
        let reply = respond(&provider, vec![Turn::new(MessageRole::User, "hi")]).await;
        assert_eq!(reply, "GROQ API 發生錯誤: authentication failed");
    }

    #[tokio::test]
    async fn no_user_turn_sends_unmodified_window() {
        let provider = llm(false);
        let turns = vec![Turn::new(MessageRole::Assistant, "獨白")];
        respond(&provider, turns).await;
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages[0].content, "獨白");
    }
}
