//! Response reading: content deltas, size limit, token usage.

use serde_json::Value;

/// Max content size (2MB) to prevent unbounded memory growth from malformed streams.
pub(super) const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// Token usage reported by the API (final streaming chunk or the full response).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Parse token usage from a chunk's or response's `usage` field.
pub(crate) fn parse_usage(chunk: &Value) -> Option<TokenUsage> {
    let usage = chunk.get("usage").filter(|u| u.is_object())?;
    Some(TokenUsage {
        prompt_tokens: usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        completion_tokens: usage
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
        total_tokens: usage.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
    })
}

/// Text delta of the first choice in a streaming chunk.
pub(super) fn delta_content(chunk: &Value) -> Option<&str> {
    chunk
        .get("choices")?
        .as_array()?
        .first()?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Message text of the first choice in a non-streaming response.
pub(super) fn message_content(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
}

/// `error.message` of an error chunk, if the chunk is one.
pub(super) fn error_message(chunk: &Value) -> Option<&str> {
    let err = chunk.get("error")?;
    Some(
        err.get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error"),
    )
}

/// Accumulates streamed text up to [`MAX_CONTENT_BYTES`].
#[derive(Debug, Default)]
pub(super) struct ContentBuffer {
    pub(super) content: String,
    pub(super) truncated: bool,
}

impl ContentBuffer {
    /// Append a chunk. Returns false once the limit is reached; the chunk is then dropped.
    pub(super) fn push(&mut self, chunk: &str) -> bool {
        if self.content.len() + chunk.len() > MAX_CONTENT_BYTES {
            self.truncated = true;
            return false;
        }
        self.content.push_str(chunk);
        true
    }
}
