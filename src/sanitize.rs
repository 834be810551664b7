//! Markup normalization chokepoint for model output.
//!
//! Telegram's HTML mode renders only a small inline tag set; a block tag in
//! the payload makes the send call fail outright. Every usable completion
//! passes through [`sanitize_reply`] before transmission.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches one well-formed tag: optional slash, name, attribute tail.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)([a-z][a-z0-9]*)([^<>]*)>").expect("tag pattern is valid")
});

/// Inline tags Telegram renders; preserved character-for-character.
const ALLOWED_TAGS: [&str; 5] = ["b", "i", "u", "code", "a"];

/// Normalize model markup into the Telegram-safe inline subset.
///
/// Per tag:
/// - a paragraph-open marker is removed, a paragraph-close marker becomes
///   one newline;
/// - a line-break marker (self-closing or not) becomes one newline;
/// - allow-listed inline tags pass through untouched;
/// - any other tag is stripped entirely, keeping the text around it.
///
/// Bare `<` and `>` that never form a tag are left alone. The scan repeats
/// until the text stops changing, so the transform is idempotent even when
/// a removal splices a new marker together out of surrounding characters.
pub fn sanitize_reply(raw: &str) -> String {
    let mut text = raw.to_owned();
    loop {
        let pass = TAG_PATTERN
            .replace_all(&text, |caps: &Captures<'_>| rewrite_tag(caps))
            .into_owned();
        if pass == text {
            return pass;
        }
        text = pass;
    }
}

fn rewrite_tag(caps: &Captures<'_>) -> String {
    let closing = !caps[1].is_empty();
    let name = caps[2].to_ascii_lowercase();
    match name.as_str() {
        "p" => {
            if closing {
                "\n".to_owned()
            } else {
                String::new()
            }
        }
        "br" => "\n".to_owned(),
        _ if ALLOWED_TAGS.contains(&name.as_str()) => caps[0].to_owned(),
        _ => String::new(),
    }
}
