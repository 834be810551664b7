//! HTML formatting helpers for Telegram messages.
//!
//! All output uses HTML parse mode (never MarkdownV2) per project convention.

/// Escape special HTML characters in user-provided text.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build an inline mention link for a user, escaping the display name.
///
/// Telegram resolves `tg://user?id=...` links to a tappable mention even
/// when the user has no public username.
pub fn mention_html(user_id: u64, display_name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={user_id}\">{}</a>",
        escape_html(display_name)
    )
}
