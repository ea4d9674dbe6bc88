//! Headless composition root: config from the environment, concrete
//! adapters, and the poll loop.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::dto::GameContext;
use crate::application::services::session_service::DEFAULT_POLL_MS;
use crate::application::services::PollSession;
use crate::client::GameClient;
use crate::infrastructure::headless::{headless_dialogs, HeadlessBoard, HeadlessTimer};
use crate::infrastructure::{HttpGameServer, SystemClock};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub engine_url: String,
    pub game_id: String,
    pub player_id: String,
    pub poll_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let engine_url = std::env::var("SKIRMISH_ENGINE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let game_id =
            std::env::var("SKIRMISH_GAME_ID").context("SKIRMISH_GAME_ID must be set")?;
        let player_id =
            std::env::var("SKIRMISH_PLAYER_ID").context("SKIRMISH_PLAYER_ID must be set")?;
        let poll_ms = std::env::var("SKIRMISH_POLL_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_POLL_MS);
        Ok(Self {
            engine_url,
            game_id,
            player_id,
            poll_ms,
        })
    }
}

pub async fn run(config: ClientConfig) -> Result<()> {
    tracing::info!(
        engine_url = %config.engine_url,
        game_id = %config.game_id,
        player_id = %config.player_id,
        poll_ms = config.poll_ms,
        "starting client session"
    );

    let server = Arc::new(HttpGameServer::new(config.engine_url.clone()));
    let client = GameClient::new(
        GameContext::new(config.game_id.clone(), config.player_id.clone()),
        server,
        headless_dialogs(),
        Arc::new(HeadlessBoard::new()),
        Arc::new(HeadlessTimer::new()),
        Arc::new(SystemClock::new()),
    );

    PollSession::new(client, config.poll_ms)
        .run_until_finished()
        .await
}
