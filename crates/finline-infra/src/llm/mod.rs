//! Groq completion provider.
//!
//! Groq speaks the OpenAI chat-completions protocol, so the provider is a
//! thin adapter over [`async_openai`] pointed at the Groq base URL. Only
//! non-streaming completions are used; replies go back through the LINE
//! reply API in one piece anyway.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};

use finline_core::dispatch::LlmProvider;
use finline_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage,
};

/// Groq's OpenAI-compatible endpoint.
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama3-groq-8b-8192-tool-use-preview";

/// Groq LLM provider.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct GroqProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GroqProvider {
    /// Create a provider with the default model.
    pub fn new(api_key: &SecretString) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(GROQ_BASE_URL);

        Self {
            client: Client::with_config(config),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the completion model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The configured default model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    },
                ),
                MessageRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    },
                ),
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessage {
                            content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                                msg.content.clone(),
                            )),
                            refusal: None,
                            name: None,
                            audio: None,
                            tool_calls: None,
                            function_call: None,
                        },
                    )
                }
            };
            messages.push(oai_msg);
        }

        // Use the model from the request if set, otherwise the configured default.
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

/// Map an [`OpenAIError`] onto the provider-agnostic [`LlmError`].
fn map_openai_error(err: OpenAIError) -> LlmError {
    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Invalid API Key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

impl LlmProvider for GroqProvider {
    // The name feeds user-visible error strings ("GROQ API 發生錯誤: ...").
    fn name(&self) -> &str {
        "GROQ API"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        // OTel GenAI semantic-convention fields.
        tracing::debug!(
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = "groq",
            gen_ai.request.model = %response.model,
            gen_ai.response.id = %response.id,
            gen_ai.usage.input_tokens = usage.input_tokens,
            gen_ai.usage.output_tokens = usage.output_tokens,
            "completion finished"
        );

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use finline_types::llm::Message;

    fn make_provider() -> GroqProvider {
        GroqProvider::new(&SecretString::from("gsk-test-key-not-real"))
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "GROQ API");
    }

    #[test]
    fn test_default_model() {
        assert_eq!(make_provider().model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_with_model_override() {
        let provider = make_provider().with_model("llama-3.3-70b-versatile");
        assert_eq!(provider.model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_build_request_uses_default_model_when_empty() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::new(MessageRole::User, "你好")],
            system: None,
            max_tokens: 2000,
            temperature: Some(1.2),
        };
        let oai = provider.build_request(&request);
        assert_eq!(oai.model, DEFAULT_MODEL);
        assert_eq!(oai.messages.len(), 1);
        assert_eq!(oai.max_completion_tokens, Some(2000));
    }

    #[test]
    fn test_build_request_maps_roles_and_system() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: "explicit-model".to_string(),
            messages: vec![
                Message::new(MessageRole::User, "問題"),
                Message::new(MessageRole::Assistant, "回答"),
            ],
            system: Some("你是助理".to_string()),
            max_tokens: 100,
            temperature: None,
        };
        let oai = provider.build_request(&request);
        assert_eq!(oai.model, "explicit-model");
        // System prompt leads, then the conversation in order.
        assert_eq!(oai.messages.len(), 3);
        assert!(matches!(
            oai.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            oai.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert!(matches!(
            oai.messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert_eq!(oai.temperature, None);
    }

    #[test]
    fn test_invalid_argument_maps_to_invalid_request() {
        let err = map_openai_error(OpenAIError::InvalidArgument("bad".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(msg) if msg == "bad"));
    }
}
