//! Vision completion client
//!
//! ## Stack
//! - `async-openai` for the chat completion call
//! - works with any OpenAI-compatible endpoint via `api_base`

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerateError;
use crate::models::NodeId;

/// Fixed instruction sent with every image.
pub const ALT_TEXT_INSTRUCTION: &str = "Generate concise, descriptive alt text for this image. The alt text should be brief but descriptive (under 125 characters), describe what the image shows, and be written in a natural way.";

/// Used when a failed response carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate alt text";

/// One image to describe
#[derive(Debug, Clone, Copy)]
pub struct DescribeRequest<'a> {
    pub node_id: &'a NodeId,
    pub url: &'a str,
}

/// Anything that turns an image URL into a description.
///
/// The credential is passed per call: it is read from settings at the start
/// of each operation.
#[async_trait]
pub trait DescriptionClient: Send + Sync {
    async fn describe(
        &self,
        request: &DescribeRequest<'_>,
        api_key: &str,
    ) -> Result<String, GenerateError>;
}

/// Direct OpenAI-compatible vision client
pub struct OpenAiVisionClient {
    api_base_url: String,
    model_name: String,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            model_name: config.model_name.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn build_request(
        &self,
        url: &str,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, OpenAIError> {
        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: ALT_TEXT_INSTRUCTION.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: url.to_string(),
                        detail: Some(ImageDetail::Auto),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .max_tokens(self.max_tokens)
            .build()
    }
}

#[async_trait]
impl DescriptionClient for OpenAiVisionClient {
    async fn describe(
        &self,
        request: &DescribeRequest<'_>,
        api_key: &str,
    ) -> Result<String, GenerateError> {
        debug!("Calling vision API, model: {}", self.model_name);

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base_url);
        let client = Client::with_config(openai_config);

        let chat_request = self
            .build_request(request.url)
            .map_err(|e| GenerateError::InvalidRequest(e.to_string()))?;

        let response = client.chat().create(chat_request).await.map_err(|e| {
            warn!("Vision API call failed for {}: {}", request.url, e);
            match e {
                OpenAIError::ApiError(api) => GenerateError::Api {
                    status: None,
                    message: non_empty_or_generic(api.message),
                },
                // non-JSON error body, e.g. a proxy's HTML error page
                OpenAIError::JSONDeserialize(..) => GenerateError::Api {
                    status: None,
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                },
                OpenAIError::InvalidArgument(msg) => GenerateError::InvalidRequest(msg),
                other => GenerateError::transport(&self.api_base_url, other),
            }
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerateError::EmptyCompletion {
                url: request.url.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"error": {"message": ...}}` (OpenAI) and `{"error": "..."}`
/// (relay server).
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let message = match error {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(_) => error.get("message")?.as_str()?.to_string(),
        _ => return None,
    };
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

fn non_empty_or_generic(message: String) -> String {
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::stub_server::serve_once;

    #[test]
    fn error_message_from_openai_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Incorrect API key provided")
        );
    }

    #[test]
    fn error_message_from_relay_body() {
        let body = r#"{"error":"Invalid or missing API key"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Invalid or missing API key")
        );
    }

    #[test]
    fn unparseable_body_has_no_message() {
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"error":{}}"#), None);
        assert_eq!(non_empty_or_generic(String::new()), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn request_carries_image_and_token_limit() {
        let client = OpenAiVisionClient::new(&Config::default());
        let request = client.build_request("https://cdn/a.png").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 300);
        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["text"], ALT_TEXT_INSTRUCTION);
        assert_eq!(content[1]["image_url"]["url"], "https://cdn/a.png");
        assert_eq!(content[1]["image_url"]["detail"], "auto");
    }

    fn client_for_base(base: &str) -> OpenAiVisionClient {
        OpenAiVisionClient::new(&Config {
            api_base_url: format!("{}/v1", base),
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn api_error_body_message_is_surfaced() {
        let base = serve_once(
            "401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#,
        )
        .await;
        let node = NodeId::new("n1");
        let request = DescribeRequest { node_id: &node, url: "https://cdn/a.png" };

        let err = client_for_base(&base).describe(&request, "sk-bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key provided");
    }

    #[tokio::test]
    async fn non_json_error_body_uses_generic_message() {
        let base = serve_once("400 Bad Request", "<html>502 Bad Gateway</html>").await;
        let node = NodeId::new("n1");
        let request = DescribeRequest { node_id: &node, url: "https://cdn/a.png" };

        let err = client_for_base(&base).describe(&request, "sk-test").await.unwrap_err();
        assert!(matches!(err, GenerateError::Api { .. }));
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }
}
