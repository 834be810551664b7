//! Telegram adapter: bot dispatcher, slash commands, and reply dispatch.
//!
//! Wraps the per-message pipeline in a teloxide long-polling dispatcher.
//! All output uses HTML parse mode per project convention.

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use tracing::{debug, info, warn};

use crate::pipeline::{self, AppContext};

pub mod commands;
pub mod ui;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the Telegram bot adapter.
///
/// Builds the long-polling dispatcher with the shared [`AppContext`]
/// injected into handlers via `dptree::deps!`. Blocks until the bot is
/// stopped (Ctrl+C).
pub async fn run_bot(ctx: AppContext) -> anyhow::Result<()> {
    let bot = Bot::new(ctx.settings.telegram_token.as_str());

    // Build dptree handler schema
    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    info!("telegram dispatcher starting");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

// ---------------------------------------------------------------------------
// Message handler
// ---------------------------------------------------------------------------

/// Handle an incoming Telegram message.
///
/// `/start` gets the fixed welcome; other slash commands are ignored, since
/// nothing else is registered. Regular text is answered through
/// [`pipeline::respond`], with exactly one typing indicator signalled before
/// the remote call. Send failures are logged and skipped; one message's
/// trouble never takes the dispatcher down.
async fn handle_message(bot: Bot, msg: Message, ctx: AppContext) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "non-text message ignored");
        return Ok(());
    };
    let text = text.to_owned();

    debug!(chat_id = %msg.chat.id, "telegram message received");

    // Handle slash commands
    if text.starts_with('/') {
        if parse_command(&text) == Some("start") {
            let greeting = match msg.from {
                Some(ref user) => commands::handle_start(user.id.0, &user.full_name()),
                None => {
                    debug!(chat_id = %msg.chat.id, "start command without a sender, ignoring");
                    return Ok(());
                }
            };
            if let Err(e) = bot
                .send_message(msg.chat.id, greeting)
                .parse_mode(ParseMode::Html)
                .await
            {
                warn!(error = %e, "failed to send welcome message");
            }
        } else {
            debug!(chat_id = %msg.chat.id, "unknown command ignored");
        }
        return Ok(());
    }

    // Bound concurrent completions; messages past the cap wait for a permit.
    let _permit = match ctx.limiter.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            warn!(chat_id = %msg.chat.id, "reply limiter closed, dropping message");
            return Ok(());
        }
    };

    // Latency signal: one typing indicator before the remote call.
    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        debug!(error = %e, "failed to send typing indicator");
    }

    let reply = pipeline::respond(&ctx, &text).await;

    if let Err(e) = bot
        .send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!(error = %e, "failed to send reply");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

/// Extract the command name from a slash-command message.
///
/// Strips the leading `/`, any arguments, and a `@bot_name` mention suffix
/// (group chats address commands as `/start@marica_bot`). Returns `None`
/// for text that does not start with `/`.
pub fn parse_command(text: &str) -> Option<&str> {
    let without_slash = text.strip_prefix('/')?;
    let full_command = match without_slash.split_once(' ') {
        Some((cmd, _)) => cmd,
        None => without_slash,
    };
    Some(full_command.split('@').next().unwrap_or(full_command))
}
