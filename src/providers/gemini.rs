//! Google Gemini provider implementation using the `generateContent` API.

use serde::{Deserialize, Serialize};

use super::{check_http_response, Completion, CompletionProvider, GatewayError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Finish reason reported for a normally completed candidate; anything else
/// on a textless candidate is treated as a refusal.
const FINISH_REASON_STOP: &str = "STOP";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Gemini `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns. Always exactly one user turn here, so grounding
    /// context never persists between questions.
    pub contents: Vec<GeminiContent>,
    /// Persona instruction applied service-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
}

/// A content entry: optional role plus text parts.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct GeminiContent {
    /// "user" or "model"; omitted for the system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content segments.
    pub parts: Vec<GeminiPart>,
}

/// One request text segment.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct GeminiPart {
    /// The text payload.
    pub text: String,
}

/// Gemini `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates; absent entirely when the prompt is blocked.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Prompt-level feedback; carries the block reason on refusal.
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

/// One generated candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Candidate content; may be absent when generation was cut short.
    pub content: Option<GeminiResponseContent>,
    /// Why generation stopped (e.g. "STOP", "SAFETY", "MAX_TOKENS").
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiResponseContent {
    /// Content segments.
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

/// One response segment; non-text segments deserialize with `text: None`.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiResponsePart {
    /// Text payload, when the segment carries text.
    pub text: Option<String>,
}

/// Prompt-level safety feedback.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    /// Machine-readable block reason (e.g. "SAFETY").
    pub block_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Google Gemini `generateContent` provider.
#[derive(Clone)]
pub struct GeminiProvider {
    model: String,
    api_key: String,
    system_instruction: String,
    /// API base URL; overridable so tests can point at a local stub server.
    #[doc(hidden)]
    pub base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance.
    ///
    /// The system instruction is fixed here, once, and rides along with
    /// every request; it is never re-stated inside composed prompts.
    pub fn new(api_key: String, model: String, system_instruction: String) -> Self {
        Self {
            model,
            api_key,
            system_instruction,
            base_url: GEMINI_API_BASE.to_owned(),
            client: reqwest::Client::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a single-turn Gemini request for a composed prompt.
#[doc(hidden)]
pub fn build_request(system_instruction: &str, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_owned()),
            parts: vec![GeminiPart {
                text: prompt.to_owned(),
            }],
        }],
        system_instruction: Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: system_instruction.to_owned(),
            }],
        }),
    }
}

/// Interpret a Gemini response body as an explicit [`Completion`].
///
/// A result is usable only when some candidate carries at least one
/// non-empty text segment. Otherwise a prompt-level block reason, or a
/// candidate finish reason other than normal stop, maps to
/// [`Completion::Blocked`]; anything else maps to [`Completion::Empty`].
///
/// # Errors
///
/// Returns `GatewayError::Parse` if the body cannot be deserialized.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<Completion, GatewayError> {
    let resp: GeminiResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Parse(e.to_string()))?;

    let text: String = resp
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect();
    if !text.trim().is_empty() {
        return Ok(Completion::Answer(text));
    }

    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Ok(Completion::Blocked { feedback: reason });
    }

    let refused = resp
        .candidates
        .iter()
        .filter_map(|candidate| candidate.finish_reason.as_deref())
        .find(|reason| *reason != FINISH_REASON_STOP);
    if let Some(reason) = refused {
        return Ok(Completion::Blocked {
            feedback: reason.to_owned(),
        });
    }

    Ok(Completion::Empty)
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, GatewayError> {
        let api_request = build_request(&self.system_instruction, prompt);
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }
}
