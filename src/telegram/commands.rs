//! Telegram slash command handlers.
//!
//! Each function returns an HTML-formatted response string. All output uses
//! HTML parse mode per project convention.

use crate::telegram::ui::mention_html;

/// Build the `/start` welcome message, personalized with an inline mention
/// of the sender.
pub fn handle_start(user_id: u64, display_name: &str) -> String {
    let mention = mention_html(user_id, display_name);
    format!("Olá, {mention}! 👋\n\nEu sou um bot com IA. Envie-me qualquer pergunta!")
}
