//! MaricáBot: a Telegram assistant for the city of Maricá, RJ.
//!
//! Answers free-text questions by grounding Google Gemini on a local
//! knowledge file whose full content rides along in every prompt, then
//! normalizes the model's markup to the Telegram HTML subset before
//! replying. One question, one completion call, one reply; nothing is
//! remembered between messages.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod knowledge;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod sanitize;
pub mod telegram;
