//! HTTP adapter for the game engine API.

use async_trait::async_trait;
use serde::Serialize;

use skirmish_domain::{GameId, PlayerId};
use skirmish_shared::{
    AcknowledgeEventsRequest, ConfirmChoiceRequest, GameSnapshot, PlayerActionRequest,
    RequestError, ResponseResult,
};

use crate::ports::outbound::GameServerPort;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct HttpGameServer {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGameServer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ResponseResult, RequestError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(to_request_error)?;
        response
            .json::<ResponseResult>()
            .await
            .map_err(to_request_error)
    }
}

fn to_request_error(error: reqwest::Error) -> RequestError {
    if error.is_timeout() {
        RequestError::Timeout
    } else {
        RequestError::SendFailed(error.to_string())
    }
}

#[async_trait]
impl GameServerPort for HttpGameServer {
    async fn get_game_status(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<GameSnapshot, RequestError> {
        let url = self.url(&format!("/games/{game_id}/status"));
        let response = self
            .http
            .get(url)
            .query(&[("playerId", player_id.as_str())])
            .send()
            .await
            .map_err(to_request_error)?;
        response
            .json::<GameSnapshot>()
            .await
            .map_err(to_request_error)
    }

    async fn player_action(
        &self,
        request: PlayerActionRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/actions", &request).await
    }

    async fn confirm_blocker_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/choices/blocker", &request).await
    }

    async fn confirm_burst_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/choices/burst", &request).await
    }

    async fn confirm_option_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/choices/option", &request).await
    }

    async fn confirm_token_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/choices/token", &request).await
    }

    async fn confirm_target_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/choices/target", &request).await
    }

    async fn acknowledge_events(
        &self,
        request: AcknowledgeEventsRequest,
    ) -> Result<ResponseResult, RequestError> {
        self.post_json("/games/events/acknowledge", &request).await
    }
}
