//! Prompt composition: builds the single grounding prompt sent per question.
//!
//! Every call re-injects the full serialized corpus; nothing accumulates
//! across turns, so grounding context never leaks between unrelated
//! questions. The persona lives in [`SYSTEM_INSTRUCTION`] and is configured
//! once at gateway construction, not re-stated per call.

/// Persona instruction: scope restriction to Maricá plus polite refusal for
/// anything else. Sent as the service-side system instruction.
pub const SYSTEM_INSTRUCTION: &str = "Você é o 'MaricáBot', um assistente virtual focado \
     exclusivamente na cidade de Maricá, RJ. Sua única função é responder perguntas sobre \
     turismo, serviços e informações locais de Maricá. Se a pergunta não for sobre Maricá, \
     recuse educadamente e lembre o usuário do seu propósito.";

/// Marker opening the grounding context block.
pub const CONTEXT_BEGIN: &str = "--- INÍCIO DO CONTEXTO ---";

/// Marker closing the grounding context block.
pub const CONTEXT_END: &str = "--- FIM DO CONTEXTO ---";

/// Output-format directive: Telegram's HTML mode renders only a small
/// inline tag set, and block tags make the send call fail outright.
const FORMAT_RULE: &str = "Responda usando apenas as tags HTML <b>, <i>, <u>, <code> e <a>. \
     Não use tags de bloco como <p> ou <br>.";

/// Build the grounding prompt for one user question.
///
/// Pure and deterministic: identical inputs produce byte-identical output.
/// The question is embedded verbatim with no validation, trimming, or
/// escaping, even when empty or markup-laden; judging it is the model's job.
pub fn compose(question: &str, context: &str) -> String {
    format!(
        "**Contexto da Cidade de Maricá:**\n\
         {CONTEXT_BEGIN}\n\
         {context}\n\
         {CONTEXT_END}\n\n\
         **Regra:** Use *apenas* as informações do contexto acima para responder.\n\
         **Pergunta do Usuário:** {question}\n\n\
         **Formato:** {FORMAT_RULE}\n\n\
         **Resposta:**"
    )
}
