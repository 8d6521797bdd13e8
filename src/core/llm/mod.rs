//! Quotation request: one chat completion against an OpenAI-compatible endpoint.
//!
//! The embedded system prompt asks the model for the dual-marker format that
//! [`crate::core::quotation::split_dual_response`] understands.

mod error;
mod stream;

use async_openai::Client;
use futures::StreamExt;
use serde_json::{Value, json};

use crate::core::config::Config;

pub use error::{ChatError, classify_message, map_api_error};
pub use stream::TokenUsage;

use stream::{ContentBuffer, delta_content, error_message, message_content, parse_usage};

const SYSTEM_PROMPT: &str = include_str!("../../../config/quotation-prompt.md");

/// Callback for each streamed content chunk (text only).
pub type OnContentChunk = Box<dyn Fn(&str) + Send>;

/// What the user asked for, plus optional customer data for the prompt.
#[derive(Debug, Clone, Default)]
pub struct QuotationRequest {
    pub query: String,
    pub customer_name: Option<String>,
    pub customer_location: Option<String>,
}

/// Full model reply.
#[derive(Debug, Clone)]
pub struct QuotationReply {
    pub content: String,
    pub usage: TokenUsage,
    /// Content hit the size limit and was cut.
    pub truncated: bool,
}

impl QuotationRequest {
    fn user_message(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.customer_name.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("Cliente: {}", name.trim()));
        }
        if let Some(loc) = self
            .customer_location
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            parts.push(format!("Ubicación de entrega: {}", loc.trim()));
        }
        if parts.is_empty() {
            return self.query.trim().to_string();
        }
        format!("{}\n\n{}", parts.join("\n"), self.query.trim())
    }

    fn messages(&self) -> Vec<Value> {
        vec![
            json!({"role": "system", "content": SYSTEM_PROMPT}),
            json!({"role": "user", "content": self.user_message()}),
        ]
    }
}

fn finish(buffer: ContentBuffer, usage: TokenUsage) -> Result<QuotationReply, ChatError> {
    if buffer.content.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    if buffer.truncated {
        log::warn!("response exceeded the content limit and was truncated");
    }
    log::debug!(
        "quotation reply: {} bytes, {} tokens",
        buffer.content.len(),
        usage.total_tokens
    );
    Ok(QuotationReply {
        content: buffer.content,
        usage,
        truncated: buffer.truncated,
    })
}

/// Ask the model for a quotation.
///
/// With `stream` set, chunks are forwarded to `on_content_chunk` as they arrive;
/// otherwise the whole reply is fetched at once and passed to the callback in one piece.
pub async fn request_quotation(
    config: &Config,
    model: &str,
    request: &QuotationRequest,
    stream: bool,
    on_content_chunk: Option<OnContentChunk>,
) -> Result<QuotationReply, ChatError> {
    let openai_config = config
        .llm()
        .map_err(|e| ChatError::ApiAuth(e.to_string()))?;
    let client = Client::with_config(openai_config.clone());
    let chat_api = client.chat();
    log::info!("requesting quotation from {} (stream: {})", model, stream);

    if !stream {
        let response: Value = chat_api
            .create_byot(json!({
                "model": model,
                "messages": request.messages(),
            }))
            .await
            .map_err(map_api_error)?;
        if let Some(msg) = error_message(&response) {
            return Err(classify_message(msg));
        }
        let mut buffer = ContentBuffer::default();
        if let Some(content) = message_content(&response) {
            buffer.push(content);
        }
        if let Some(cb) = on_content_chunk.as_deref() {
            cb(&buffer.content);
        }
        return finish(buffer, parse_usage(&response).unwrap_or_default());
    }

    let mut chunks = chat_api
        .create_stream_byot::<_, Value>(json!({
            "model": model,
            "messages": request.messages(),
            "stream": true,
        }))
        .await
        .map_err(map_api_error)?;

    let mut buffer = ContentBuffer::default();
    let mut usage = TokenUsage::default();
    while let Some(chunk_result) = chunks.next().await {
        let chunk = chunk_result.map_err(map_api_error)?;
        if let Some(msg) = error_message(&chunk) {
            return Err(classify_message(msg));
        }
        if let Some(u) = parse_usage(&chunk) {
            usage = u;
        }
        if let Some(content) = delta_content(&chunk) {
            if !buffer.push(content) {
                break;
            }
            if let Some(cb) = on_content_chunk.as_deref() {
                cb(content);
            }
        }
    }
    finish(buffer, usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_without_customer_is_the_query() {
        let req = QuotationRequest {
            query: "  50 sacos de cemento  ".into(),
            ..Default::default()
        };
        assert_eq!(req.user_message(), "50 sacos de cemento");
    }

    #[test]
    fn user_message_prefixes_customer_data() {
        let req = QuotationRequest {
            query: "varilla 3/8".into(),
            customer_name: Some("Constructora Norte".into()),
            customer_location: Some(" ".into()),
        };
        assert_eq!(req.user_message(), "Cliente: Constructora Norte\n\nvarilla 3/8");
    }

    #[test]
    fn system_prompt_asks_for_markers() {
        let messages = QuotationRequest::default().messages();
        assert_eq!(messages[0]["role"], "system");
        let prompt = messages[0]["content"].as_str().unwrap();
        assert!(prompt.contains("INTERNAL_QUOTATION_START"));
        assert!(prompt.contains("CUSTOMER_QUOTATION_END"));
    }

    #[test]
    fn blank_reply_is_an_error() {
        let buffer = ContentBuffer {
            content: " \n".into(),
            truncated: false,
        };
        assert!(matches!(
            finish(buffer, TokenUsage::default()),
            Err(ChatError::EmptyResponse)
        ));
    }
}
