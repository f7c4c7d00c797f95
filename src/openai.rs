//! OpenAI client configuration and error classification.

use crate::error::{Result, ScriptQaError};
use async_openai::error::{ApiError, OpenAIError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with the default timeout.
///
/// The API key is read from `OPENAI_API_KEY` by the client config.
pub fn create_client(api_base: Option<&str>) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    api_base: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScriptQaError::Network(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Map a provider error onto a typed error so callers can tell
/// authentication, quota, rate limiting and transport failures apart.
pub fn classify_error(context: &str, err: OpenAIError) -> ScriptQaError {
    match err {
        OpenAIError::ApiError(api) => classify_api_error(context, &api),
        OpenAIError::Reqwest(e) => ScriptQaError::Network(format!("{}: {}", context, e)),
        other => ScriptQaError::OpenAI(format!("{}: {}", context, other)),
    }
}

fn classify_api_error(context: &str, api: &ApiError) -> ScriptQaError {
    let code = api.code.as_deref().unwrap_or_default();
    let kind = api.r#type.as_deref().unwrap_or_default();
    let message = format!("{}: {}", context, api.message);

    match (code, kind) {
        ("invalid_api_key", _) | (_, "authentication_error") => {
            ScriptQaError::Authentication(message)
        }
        ("insufficient_quota", _) | (_, "insufficient_quota") => {
            ScriptQaError::QuotaExceeded(message)
        }
        ("rate_limit_exceeded", _) | (_, "rate_limit_error") => {
            ScriptQaError::RateLimited(message)
        }
        _ => ScriptQaError::OpenAI(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: Option<&str>, kind: Option<&str>) -> OpenAIError {
        let api: ApiError = serde_json::from_value(serde_json::json!({
            "message": "boom",
            "type": kind,
            "param": null,
            "code": code,
        }))
        .unwrap();
        OpenAIError::ApiError(api)
    }

    #[test]
    fn test_classify_authentication() {
        let err = classify_error("Embedding API error", api_error(Some("invalid_api_key"), None));
        assert!(matches!(err, ScriptQaError::Authentication(_)));
        assert!(err.to_string().contains("Embedding API error: boom"));
    }

    #[test]
    fn test_classify_quota_and_rate_limit() {
        let err = classify_error("x", api_error(None, Some("insufficient_quota")));
        assert!(matches!(err, ScriptQaError::QuotaExceeded(_)));

        let err = classify_error("x", api_error(Some("rate_limit_exceeded"), Some("requests")));
        assert!(matches!(err, ScriptQaError::RateLimited(_)));
    }

    #[test]
    fn test_classify_other_api_error() {
        let err = classify_error("x", api_error(Some("model_not_found"), None));
        assert!(matches!(err, ScriptQaError::OpenAI(_)));

        let err = classify_error("x", OpenAIError::InvalidArgument("bad".to_string()));
        assert!(matches!(err, ScriptQaError::OpenAI(_)));
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(None).is_ok());
        assert!(create_client(Some("http://localhost:8080/v1")).is_ok());
    }
}
