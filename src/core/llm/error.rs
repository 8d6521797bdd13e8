//! Quotation request error types.

/// Errors from a quotation request.
#[derive(Debug)]
pub enum ChatError {
    ApiAuth(String),
    /// 429 or exhausted quota. Retrying later may succeed.
    RateLimited(String),
    ApiMessage(String),
    /// The model finished without producing any text.
    EmptyResponse,
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ChatError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ChatError::RateLimited(_))
    }
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ApiAuth(msg) => write!(f, "{}", msg),
            ChatError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ChatError::ApiMessage(msg) => write!(f, "API error: {}", msg),
            ChatError::EmptyResponse => write!(f, "The model returned an empty response"),
            ChatError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Other(e) => e.source(),
            _ => None,
        }
    }
}

fn looks_rate_limited(s: &str) -> bool {
    let lower = s.to_lowercase();
    s.contains("429")
        || lower.contains("rate limit")
        || lower.contains("rate-limit")
        || lower.contains("quota")
}

/// `"message":"..."` from a JSON error body embedded in an error string.
fn json_message(s: &str) -> Option<&str> {
    if !s.contains("\"error\"") && !s.contains("\"message\"") {
        return None;
    }
    let (_, rest) = s.split_once("\"message\":\"")?;
    let (msg, _) = rest.split_once('"')?;
    Some(msg)
}

/// Classify an error message from an error chunk or response body.
pub fn classify_message(msg: &str) -> ChatError {
    if looks_rate_limited(msg) {
        ChatError::RateLimited(msg.to_string())
    } else {
        ChatError::ApiMessage(msg.to_string())
    }
}

/// Map async-openai or API errors into ChatError.
pub fn map_api_error<E>(e: E) -> ChatError
where
    E: std::fmt::Display + Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    let s = e.to_string();
    let lower = s.to_lowercase();
    if (s.contains("401") && (lower.contains("cookie auth") || lower.contains("unauthorized")))
        || lower.contains("invalid api key")
    {
        return ChatError::ApiAuth(
            "API error (401): authentication failed. Check OPENROUTER_API_KEY in .env.".to_string(),
        );
    }
    if looks_rate_limited(&s) {
        let msg = json_message(&s).unwrap_or(&s);
        return ChatError::RateLimited(msg.to_string());
    }
    if let Some(msg) = json_message(&s) {
        return ChatError::ApiMessage(msg.to_string());
    }
    ChatError::Other(e.into())
}
