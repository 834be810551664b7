//! MaricáBot process bootstrap.
//!
//! Order matters here: credentials are checked before the logging subsystem
//! exists, because a missing credential must print a plain diagnostic and
//! exit non-zero. Then logging, then the degradable knowledge load, then
//! the long-polling dispatcher.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use maricabot::config::{Settings, GEMINI_MODEL, KNOWLEDGE_PATH, LOGS_DIR};
use maricabot::knowledge::KnowledgeBase;
use maricabot::pipeline::AppContext;
use maricabot::prompt::SYSTEM_INSTRUCTION;
use maricabot::providers::gemini::GeminiProvider;
use maricabot::telegram;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pull .env into the process environment before reading credentials.
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    let _logging_guard =
        maricabot::logging::init(Path::new(LOGS_DIR)).context("failed to initialise logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "maricabot starting");

    let knowledge = KnowledgeBase::load(Path::new(KNOWLEDGE_PATH));
    if knowledge.is_empty() {
        warn!("no local knowledge loaded, answers will be degraded");
    }

    let provider = GeminiProvider::new(
        settings.gemini_api_key.clone(),
        GEMINI_MODEL.to_owned(),
        SYSTEM_INSTRUCTION.to_owned(),
    );

    let ctx = AppContext::new(settings, knowledge, Arc::new(provider));

    telegram::run_bot(ctx).await
}
