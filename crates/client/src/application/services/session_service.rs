//! Polling session service.
//!
//! Drives the periodic status refresh that closes the control loop: poll,
//! reconcile, repeat. Failures are logged and swallowed; the next poll is
//! always the recovery path.

use std::time::Duration;

use skirmish_domain::GameStatus;

use crate::client::GameClient;

/// Default poll interval
pub const DEFAULT_POLL_MS: u64 = 1_000;

pub struct PollSession {
    client: GameClient,
    interval: Duration,
}

impl PollSession {
    pub fn new(client: GameClient, poll_ms: u64) -> Self {
        Self {
            client,
            interval: Duration::from_millis(poll_ms.max(50)),
        }
    }

    pub fn client(&self) -> &GameClient {
        &self.client
    }

    /// Poll until the game reports finished
    pub async fn run_until_finished(&self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last_status = GameStatus::Unknown;
        loop {
            ticker.tick().await;
            if let Err(error) = self.client.refresh().await {
                tracing::warn!(error = %error, "status refresh failed; will retry next poll");
                continue;
            }
            let status = self.client.last_status().await;
            if status != last_status {
                tracing::info!(?status, "game status changed");
                last_status = status;
            }
            if status == GameStatus::Finished {
                tracing::info!("game finished; stopping poll loop");
                return Ok(());
            }
        }
    }
}
