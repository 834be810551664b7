//! Knowledge store: the local corpus grounding every answer.
//!
//! The corpus is a single JSON artifact read once at startup and never
//! written back. A missing or malformed artifact degrades to an empty
//! corpus so the bot still starts and answers with a "no local
//! information" context instead of aborting.

use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

/// Context text injected into prompts when no local knowledge is available.
pub const EMPTY_CORPUS_TEXT: &str = "Nenhuma informação local encontrada.";

/// Immutable in-memory knowledge corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    corpus: Value,
}

impl KnowledgeBase {
    /// An explicit empty-but-valid corpus.
    pub fn empty() -> Self {
        Self { corpus: Value::Null }
    }

    /// Build a corpus directly from a parsed JSON value.
    pub fn from_value(corpus: Value) -> Self {
        Self { corpus }
    }

    /// Load the corpus from a JSON artifact.
    ///
    /// Never fails: a missing file or unparsable content yields the empty
    /// corpus with a diagnostic, since startup must proceed regardless.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "knowledge artifact not readable, starting with empty corpus"
                );
                return Self::empty();
            }
        };

        // Tolerate a UTF-8 byte-order mark without corrupting the first key.
        let content = raw.trim_start_matches('\u{feff}');

        match serde_json::from_str(content) {
            Ok(corpus) => {
                info!(path = %path.display(), "knowledge artifact loaded");
                Self { corpus }
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "knowledge artifact is not valid JSON, starting with empty corpus"
                );
                Self::empty()
            }
        }
    }

    /// Whether the corpus carries no local information.
    pub fn is_empty(&self) -> bool {
        match &self.corpus {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(text) => text.trim().is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Render the corpus as the context text embedded in every prompt.
    ///
    /// Deterministic and lossless: the same corpus always yields the same
    /// bytes, every value appears in the output, and non-ASCII text is
    /// preserved as-is. A top-level string artifact is rendered verbatim;
    /// any other shape pretty-prints as JSON. An empty corpus yields
    /// [`EMPTY_CORPUS_TEXT`].
    pub fn serialize(&self) -> String {
        if self.is_empty() {
            return EMPTY_CORPUS_TEXT.to_owned();
        }
        match &self.corpus {
            Value::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other)
                .unwrap_or_else(|_| EMPTY_CORPUS_TEXT.to_owned()),
        }
    }
}
