use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent_service::error::ProviderError;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub thinking_enabled: bool,
}

/// The remote text-completion capability. One call, no retries.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Thinking {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
    thinking: Thinking,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the GLM chat-completions API (OpenAI-compatible wire format).
#[derive(Clone)]
pub struct GlmClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl GlmClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {}", api_key.trim()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for GlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system_prompt,
                },
                Message {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            thinking: Thinking {
                kind: if request.thinking_enabled {
                    "enabled"
                } else {
                    "disabled"
                },
            },
            stream: false,
        };

        debug!(
            model = %request.model,
            system = %request.system_prompt,
            user = %request.user_prompt,
            "Sending completion request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response>".to_string());
            return Err(ProviderError::Status { status, body });
        }

        let response_text = resp.text().await?;
        let content = first_choice_content(&response_text)?;
        debug!(model = %request.model, reply = %content, "Received completion reply");
        Ok(content)
    }
}

fn first_choice_content(response_text: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(response_text)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| {
            ProviderError::MalformedResponse("first choice has no content".to_string())
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionBody {
            model: "glm-5",
            messages: vec![
                Message {
                    role: "system",
                    content: "sys",
                },
                Message {
                    role: "user",
                    content: "hi",
                },
            ],
            max_tokens: 4096,
            temperature: 0.5,
            thinking: Thinking { kind: "disabled" },
            stream: false,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "glm-5",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 4096,
                "temperature": 0.5,
                "thinking": {"type": "disabled"},
                "stream": false
            })
        );
    }

    #[test]
    fn test_first_choice_content() {
        let text = json!({
            "id": "abc",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Here is your plan"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        })
        .to_string();
        assert_eq!(first_choice_content(&text).unwrap(), "Here is your plan");
    }

    #[test]
    fn test_malformed_provider_bodies() {
        assert!(matches!(
            first_choice_content("not json"),
            Err(ProviderError::MalformedResponse(_))
        ));
        assert!(matches!(
            first_choice_content(r#"{"choices": []}"#),
            Err(ProviderError::MalformedResponse(_))
        ));
        assert!(matches!(
            first_choice_content(r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GlmClient::new(
            "https://api.z.ai/api/paas/v4/",
            " key ",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.z.ai/api/paas/v4/chat/completions"
        );
        assert_eq!(client.auth_header, "Bearer key");
    }
}
