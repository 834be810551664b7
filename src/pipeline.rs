//! Per-message answer pipeline and the shared context it runs against.
//!
//! Each incoming question is handled independently and statelessly:
//! serialize the corpus, compose the grounding prompt, run one timed
//! completion exchange, branch on the explicit outcome, and hand back
//! exactly one reply string. No failure escapes: every path ends in a
//! user-visible reply, and nothing is retried; the user's next message is
//! the retry mechanism.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::config::{Settings, COMPLETION_TIMEOUT, MAX_IN_FLIGHT_REPLIES};
use crate::knowledge::KnowledgeBase;
use crate::prompt;
use crate::providers::{Completion, CompletionProvider};
use crate::sanitize::sanitize_reply;

/// Reply sent when the service declines to answer or returns nothing usable.
pub const NO_ANSWER_REPLY: &str =
    "Não consegui gerar uma resposta para isso. Tente perguntar de outra forma.";

/// Reply sent when the exchange fails outright (transport, timeout, schema).
pub const GENERIC_ERROR_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Tente novamente.";

/// Immutable per-process context, built once at startup and shared by every
/// handler invocation. Everything here is read-only, so handlers need no
/// locking.
#[derive(Clone)]
pub struct AppContext {
    /// Startup credentials.
    pub settings: Arc<Settings>,
    /// Read-only knowledge corpus.
    pub knowledge: Arc<KnowledgeBase>,
    /// Completion gateway.
    pub provider: Arc<dyn CompletionProvider>,
    /// Upper bound on one completion round-trip.
    pub completion_timeout: Duration,
    /// Caps how many completions may be in flight at once.
    pub limiter: Arc<Semaphore>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("knowledge_empty", &self.knowledge.is_empty())
            .field("completion_timeout", &self.completion_timeout)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Assemble the context with the default operational limits.
    pub fn new(
        settings: Settings,
        knowledge: KnowledgeBase,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            knowledge: Arc::new(knowledge),
            provider,
            completion_timeout: COMPLETION_TIMEOUT,
            limiter: Arc::new(Semaphore::new(MAX_IN_FLIGHT_REPLIES)),
        }
    }
}

/// Answer one user question, always yielding exactly one reply string.
pub async fn respond(ctx: &AppContext, question: &str) -> String {
    let context_text = ctx.knowledge.serialize();
    let composed = prompt::compose(question, &context_text);
    debug!(prompt_chars = composed.len(), "prompt composed");

    let exchange = tokio::time::timeout(ctx.completion_timeout, ctx.provider.complete(&composed));

    match exchange.await {
        Ok(Ok(Completion::Answer(text))) => sanitize_reply(&text),
        Ok(Ok(Completion::Blocked { feedback })) => {
            warn!(feedback = %feedback, "completion blocked by the service");
            NO_ANSWER_REPLY.to_owned()
        }
        Ok(Ok(Completion::Empty)) => {
            warn!("completion returned no usable content");
            NO_ANSWER_REPLY.to_owned()
        }
        Ok(Err(e)) => {
            error!(error = %e, "completion exchange failed");
            GENERIC_ERROR_REPLY.to_owned()
        }
        Err(_) => {
            error!(timeout = ?ctx.completion_timeout, "completion timed out");
            GENERIC_ERROR_REPLY.to_owned()
        }
    }
}
