//! Provider error types and HTTP status classification.
//!
//! `ProviderError` itself is defined in `interviewer-core` so the
//! generation gate can downcast it; the helpers here map transport and
//! HTTP failures onto it.

pub use interviewer_core::error::ProviderError;

/// Classify a failure to send the request at all.
pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Turn a non-success HTTP response into a `ProviderError`.
///
/// `extract_message` pulls the human-readable message out of the
/// backend's JSON error body; the raw body is used when it returns `None`.
pub(crate) async fn status_error(
    response: reqwest::Response,
    model: &str,
    extract_message: fn(&str) -> Option<String>,
) -> ProviderError {
    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return ProviderError::RateLimited {
            retry_after_ms: retry_after,
        };
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or(body);
    match status {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError { status, message },
    }
}

/// Error raised when a success response cannot be decoded.
pub(crate) fn parse_error(e: reqwest::Error) -> ProviderError {
    ProviderError::ApiError {
        status: 0,
        message: format!("failed to parse response: {e}"),
    }
}
