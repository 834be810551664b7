//! Completion gateway abstraction.
//!
//! Defines the [`CompletionProvider`] trait, the explicit [`Completion`]
//! outcome consumed by the pipeline, and the [`GatewayError`] taxonomy for
//! transport-level failures.
//!
//! One provider is implemented: [`gemini::GeminiProvider`], speaking the
//! Google Gemini `generateContent` API.

use async_trait::async_trait;
use regex::Regex;

pub mod gemini;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Outcome of one completion exchange.
///
/// Service-side refusals are data, not errors: the reply dispatch branches
/// on an explicit tag instead of unwinding through an error chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The service produced at least one non-empty text segment.
    Answer(String),
    /// The service declined to answer (safety filtering or similar).
    Blocked {
        /// Machine-readable reason reported by the service. Logged for the
        /// operator, never shown to the user.
        feedback: String,
    },
    /// The service returned no usable content and no block signal.
    Empty,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by completion providers.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport failure.
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match expected schema.
    #[error("completion response parse error: {0}")]
    Parse(String),
    /// Upstream service responded with an error status.
    #[error("completion service returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized, size-capped response body.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `GatewayError::Request` on transport failure,
/// `GatewayError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GatewayError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    // Upstream error bodies occasionally echo request metadata; scrub
    // anything that looks like a Google API key before it reaches the logs.
    let mut sanitized = collapsed;
    if let Ok(regex) = Regex::new(r"AIza[0-9A-Za-z_\-]{16,}") {
        sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Remote completion service interface.
///
/// Implementations must be `Send + Sync`; the pipeline holds one behind an
/// `Arc<dyn CompletionProvider>` so tests can substitute a scripted stub.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one single-turn generation exchange for a composed prompt.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport, HTTP, or schema failure.
    /// Service-side refusals are not errors; they arrive as
    /// [`Completion::Blocked`] or [`Completion::Empty`].
    async fn complete(&self, prompt: &str) -> Result<Completion, GatewayError>;
}
