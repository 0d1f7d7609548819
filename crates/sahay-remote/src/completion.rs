//! AI completion client.
//!
//! Sends a prompt to a chat completion endpoint and returns the reply text.
//! Any transport or payload failure resolves in-band to the localized
//! "could not reach the assistant" notice so the conversation flow always
//! completes; nothing is raised past this boundary.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use sahay_core::config::AssistantConfig;
use sahay_core::types::Language;

use crate::error::LookupError;

/// Port for the AI completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt` with an answer in `language`.
    ///
    /// Implementations should resolve failures to an in-band fallback text
    /// rather than returning an error; the error type exists so test doubles
    /// can simulate a misbehaving backend.
    async fn complete(&self, prompt: &str, language: Language) -> Result<String, LookupError>;
}

/// HTTP implementation against a Cohere-style chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl HttpCompletionClient {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// The full message sent to the model: an instruction naming the reply
    /// language and asking for a concise but complete answer, then the
    /// user's prompt.
    fn build_message(prompt: &str, language: Language) -> String {
        format!(
            "Answer in {}. Keep the answer to one or two sentences, but make it complete.\n\n{}",
            language.display_name(),
            prompt
        )
    }

    async fn request(&self, message: &str) -> Result<String, LookupError> {
        let body = ChatRequest {
            message,
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        parsed
            .text
            .ok_or_else(|| LookupError::Malformed("reply field `text` missing".to_string()))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str, language: Language) -> Result<String, LookupError> {
        match self.request(&Self::build_message(prompt, language)).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "Completion backend unreachable, using fallback notice");
                Ok(language.unreachable_notice().to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sahay_core::config::AssistantConfig;

    fn client_with_endpoint(endpoint: &str) -> HttpCompletionClient {
        HttpCompletionClient::new(&AssistantConfig {
            endpoint: endpoint.to_string(),
            ..AssistantConfig::default()
        })
    }

    // ---- Message building ----

    #[test]
    fn test_message_names_the_language() {
        let msg = HttpCompletionClient::build_message("what is a fever?", Language::Tamil);
        assert!(msg.contains("Answer in Tamil."));
        assert!(msg.ends_with("what is a fever?"));
    }

    #[test]
    fn test_message_asks_for_concise_answer() {
        let msg = HttpCompletionClient::build_message("hi", Language::English);
        assert!(msg.contains("one or two sentences"));
    }

    // ---- Wire shapes ----

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            message: "hello",
            model: "command-r-plus",
            temperature: 0.7,
            max_tokens: 300,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "hello");
        assert_eq!(json["model"], "command-r-plus");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn test_response_with_text_field() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"text": "rest well"}"#).unwrap();
        assert_eq!(parsed.text.as_deref(), Some("rest well"));
    }

    #[test]
    fn test_response_without_text_field() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(parsed.text.is_none());
    }

    // ---- Fallback on failure ----

    #[tokio::test]
    async fn test_unreachable_endpoint_resolves_to_fallback_notice() {
        // Nothing listens on the discard port; the request fails fast and
        // the client must resolve in-band instead of erroring.
        let client = client_with_endpoint("http://127.0.0.1:9/v1/chat");
        let reply = client.complete("hello", Language::Hindi).await.unwrap();
        assert_eq!(reply, Language::Hindi.unreachable_notice());
    }

    #[tokio::test]
    async fn test_fallback_notice_follows_selected_language() {
        let client = client_with_endpoint("http://127.0.0.1:9/v1/chat");
        let reply = client.complete("hello", Language::English).await.unwrap();
        assert_eq!(reply, Language::English.unreachable_notice());
    }
}
