//! Companion persona responder.
//!
//! Answers in the companion voice through the completion provider. The
//! dispatcher activates this for every fallback message while a chat is in
//! companion mode, and for the greeting when the mode is entered.

use finline_core::dispatch::{LlmProvider, PersonaReplies};
use finline_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

const PERSONA_SYSTEM_PROMPT: &str = "你是一位溫柔體貼的老婆, 用撒嬌親暱的語氣和對方聊天, \
    稱呼對方時使用對方提供的稱謂, 以繁體中文回覆, 內容保持簡短溫暖。";

/// Replies feel warmer with livelier sampling.
const PERSONA_TEMPERATURE: f64 = 1.2;

const PERSONA_MAX_TOKENS: u32 = 2000;

/// Completion-backed companion persona.
pub struct CompanionPersona<L> {
    llm: L,
}

impl<L: LlmProvider> CompanionPersona<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }
}

impl<L: LlmProvider> PersonaReplies for CompanionPersona<L> {
    async fn persona_reply(&self, name: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            // Empty model: the provider substitutes its configured default.
            model: String::new(),
            messages: vec![Message::new(
                MessageRole::User,
                format!("請跟{name}說說話"),
            )],
            system: Some(PERSONA_SYSTEM_PROMPT.to_string()),
            max_tokens: PERSONA_MAX_TOKENS,
            temperature: Some(PERSONA_TEMPERATURE),
        };

        self.llm.complete(&request).await.map(|r| r.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use finline_types::llm::{CompletionResponse, Usage};

    struct CapturingLlm {
        requests: Mutex<Vec<CompletionRequest>>,
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
            Ok(CompletionResponse {
                id: "cmpl-1".to_string(),
                content: "主人~今天辛苦了".to_string(),
                model: "m".to_string(),
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn addresses_the_given_name() {
        let llm = CapturingLlm {
            requests: Mutex::new(Vec::new()),
        };
        let persona = CompanionPersona::new(llm);
        let reply = persona.persona_reply("主人").await.unwrap();
        assert_eq!(reply, "主人~今天辛苦了");

        let requests = persona.llm.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("主人"));
        assert!(requests[0].system.as_deref().unwrap().contains("老婆"));
        assert_eq!(requests[0].temperature, Some(PERSONA_TEMPERATURE));
    }
}
