//! Action executor - the bridge from UI intent to concrete game actions.
//!
//! Stateless: every outbound payload is stamped with the current context's
//! game and player ids immediately before sending. Payloads never embed
//! those ids themselves, which makes this the single anti-corruption point
//! against stale-session identifiers.

use std::sync::Arc;

use skirmish_domain::{BattleStatus, CardUid, PlayerId, ZoneId};
use skirmish_shared::{PlayerActionKind, PlayerActionRequest, RequestError, ResponseResult};

use crate::application::dto::GameContext;
use crate::ports::outbound::GameServerPort;

#[derive(Clone)]
pub struct ActionExecutor {
    server: Arc<dyn GameServerPort>,
}

impl ActionExecutor {
    pub fn new(server: Arc<dyn GameServerPort>) -> Self {
        Self { server }
    }

    /// Send a game action, stamped with the current context
    pub async fn execute(
        &self,
        ctx: &GameContext,
        action: PlayerActionKind,
    ) -> Result<ResponseResult, RequestError> {
        let request = PlayerActionRequest {
            game_id: ctx.game_id.clone(),
            player_id: ctx.player_id.clone(),
            action,
        };
        self.server.player_action(request).await
    }

    pub async fn attack_unit(
        &self,
        ctx: &GameContext,
        attacker: ZoneId,
        target: ZoneId,
        target_player: PlayerId,
    ) -> Result<ResponseResult, RequestError> {
        self.execute(
            ctx,
            PlayerActionKind::AttackUnit {
                attacker,
                target,
                target_player,
            },
        )
        .await
    }

    pub async fn attack_shield_area(
        &self,
        ctx: &GameContext,
        attacker: ZoneId,
    ) -> Result<ResponseResult, RequestError> {
        self.execute(ctx, PlayerActionKind::AttackShieldArea { attacker })
            .await
    }

    /// Pass the action step. Only issues the confirm-battle call when the
    /// battle is actually in its action step; a no-op skip stays local and
    /// returns `Ok(false)`.
    pub async fn skip_action(
        &self,
        ctx: &GameContext,
        battle_status: Option<BattleStatus>,
    ) -> Result<bool, RequestError> {
        if battle_status != Some(BattleStatus::ActionStep) {
            tracing::debug!(?battle_status, "no action step to confirm; skip stays local");
            return Ok(false);
        }
        self.execute(ctx, PlayerActionKind::ConfirmBattleAction)
            .await?
            .into_result()?;
        Ok(true)
    }

    pub async fn activate_ability(
        &self,
        ctx: &GameContext,
        card_uid: CardUid,
        ability_index: u32,
    ) -> Result<ResponseResult, RequestError> {
        self.execute(
            ctx,
            PlayerActionKind::ActivateAbility {
                card_uid,
                ability_index,
            },
        )
        .await
    }

    pub async fn play_card(
        &self,
        ctx: &GameContext,
        card_uid: CardUid,
        slot: Option<ZoneId>,
    ) -> Result<ResponseResult, RequestError> {
        self.execute(ctx, PlayerActionKind::PlayCard { card_uid, slot })
            .await
    }

    pub async fn end_turn(&self, ctx: &GameContext) -> Result<ResponseResult, RequestError> {
        self.execute(ctx, PlayerActionKind::EndTurn).await
    }
}
