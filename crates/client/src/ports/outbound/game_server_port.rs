//! Game Server Port - the remote engine's request API.
//!
//! The engine is reached over async request methods that resolve with a
//! response envelope or reject with a `RequestError`. Snapshot content, not
//! call completion order, is ground truth: callers must treat the next poll
//! as the authoritative outcome of any submission.

use async_trait::async_trait;

use skirmish_domain::{GameId, PlayerId};
use skirmish_shared::{
    AcknowledgeEventsRequest, ConfirmChoiceRequest, GameSnapshot, PlayerActionRequest,
    RequestError, ResponseResult,
};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameServerPort: Send + Sync {
    /// Poll the full game state
    async fn get_game_status(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
    ) -> Result<GameSnapshot, RequestError>;

    /// Submit a generic game action (attack, skip, activate ability, ...)
    async fn player_action(
        &self,
        request: PlayerActionRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Submit the defender's blocker decision (including "no block")
    async fn confirm_blocker_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Submit a burst activate/pass decision (single or grouped row)
    async fn confirm_burst_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Submit an option-choice decision
    async fn confirm_option_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Submit a token-choice decision
    async fn confirm_token_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Submit a target selection answering a prompt choice
    async fn confirm_target_choice(
        &self,
        request: ConfirmChoiceRequest,
    ) -> Result<ResponseResult, RequestError>;

    /// Acknowledge a batch of grouped notification events
    async fn acknowledge_events(
        &self,
        request: AcknowledgeEventsRequest,
    ) -> Result<ResponseResult, RequestError>;
}
