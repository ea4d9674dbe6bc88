//! The client façade: a synchronous coordination core under a mutex, driven
//! by an async shell.
//!
//! All state transitions happen inside short, synchronous coordinator calls;
//! the shell executes the [`FollowUp`] commands they emit around the network
//! boundary. The mutex is never held across an await, so polling continues
//! while a submission is in flight - which is exactly why the flows'
//! submitted-stamp grace window exists.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use skirmish_domain::{ActionId, CardUid, ChoiceKind, EventId, GameStatus, Side, SlotKey, ZoneId};
use skirmish_shared::{
    AcknowledgeEventsRequest, ChoiceDecision, ConfirmChoiceRequest, PlayerActionKind,
    RequestError, ResponseResult,
};

use crate::application::dto::GameContext;
use crate::application::services::ActionExecutor;
use crate::automation::Automation;
use crate::coordinator::GameCoordinator;
use crate::flows::{FollowUp, SubmissionTicket};
use crate::ports::outbound::{BoardPort, ClockPort, Dialogs, GameServerPort, TurnTimerPort};
use crate::state::ActionBarState;

/// Bound on command-chain length within a single shell run; anything beyond
/// is picked up by the next poll.
const MAX_FOLLOW_UP_ROUNDS: usize = 16;

#[derive(Clone)]
pub struct GameClient {
    coordinator: Arc<Mutex<GameCoordinator>>,
    server: Arc<dyn GameServerPort>,
    executor: ActionExecutor,
    clock: Arc<dyn ClockPort>,
    dialogs: Dialogs,
}

impl GameClient {
    pub fn new(
        ctx: GameContext,
        server: Arc<dyn GameServerPort>,
        dialogs: Dialogs,
        board: Arc<dyn BoardPort>,
        timer: Arc<dyn TurnTimerPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let coordinator = GameCoordinator::new(ctx, dialogs.clone(), board, timer);
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
            server: server.clone(),
            executor: ActionExecutor::new(server),
            clock,
            dialogs,
        }
    }

    // -------------------------------------------------------------------------
    // Read surface
    // -------------------------------------------------------------------------

    pub async fn context(&self) -> GameContext {
        self.coordinator.lock().await.ctx().clone()
    }

    pub async fn action_bar(&self) -> ActionBarState {
        self.coordinator.lock().await.bar().clone()
    }

    pub async fn last_status(&self) -> GameStatus {
        self.coordinator.lock().await.last_status()
    }

    pub fn dialogs(&self) -> &Dialogs {
        &self.dialogs
    }

    pub fn automation(&self) -> Automation {
        Automation::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Poll the server and reconcile all flows against the fresh snapshot
    pub async fn refresh(&self) -> Result<()> {
        self.run(vec![FollowUp::Refresh]).await
    }

    /// Submit a decision for a choice flow
    pub async fn submit_choice(&self, kind: ChoiceKind, decision: ChoiceDecision) -> Result<()> {
        self.run(vec![FollowUp::Submit { kind, decision }]).await
    }

    pub async fn click_slot(&self, key: SlotKey) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_slot_click(key, self.clock.now_millis())
        };
        self.run(follow).await
    }

    pub async fn click_hand(&self, uid: CardUid) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_hand_click(uid, self.clock.now_millis())
        };
        self.run(follow).await
    }

    pub async fn click_base(&self, side: Side) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_base_click(side, self.clock.now_millis())
        };
        self.run(follow).await
    }

    /// Route a selection made inside a flow's dialog
    pub async fn choose_dialog_option(&self, kind: ChoiceKind, option_id: &str) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_dialog_option(kind, option_id.to_string(), self.clock.now_millis())
        };
        self.run(follow).await
    }

    /// Back out of a flow's sub-dialog without submitting
    pub async fn dialog_back(&self, kind: ChoiceKind) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_dialog_back(kind, self.clock.now_millis())
        };
        self.run(follow).await
    }

    /// Answer the board-full slot-replacement dialog
    pub async fn choose_replacement_slot(&self, zone: ZoneId) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.handle_slot_replacement_option(zone)
        };
        self.run(follow).await
    }

    /// Press an action-bar button
    pub async fn invoke_action(&self, id: ActionId) -> Result<()> {
        let follow = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.invoke_action(id, self.clock.now_millis())
        };
        self.run(follow).await
    }

    pub async fn dismiss_error(&self) {
        self.coordinator.lock().await.dismiss_error();
    }

    // -------------------------------------------------------------------------
    // Shell
    // -------------------------------------------------------------------------

    async fn run(&self, initial: Vec<FollowUp>) -> Result<()> {
        let mut queue: VecDeque<FollowUp> = initial.into();
        let mut rounds = 0usize;
        while let Some(item) = queue.pop_front() {
            rounds += 1;
            if rounds > MAX_FOLLOW_UP_ROUNDS {
                tracing::warn!("follow-up chain too long; deferring the rest to the next poll");
                break;
            }
            match item {
                FollowUp::Refresh => self.do_refresh(&mut queue).await,
                FollowUp::Submit { kind, decision } => {
                    self.do_submit(kind, decision, &mut queue).await;
                }
                FollowUp::AcknowledgeGroup { event_ids } => {
                    self.do_acknowledge(event_ids, &mut queue).await;
                }
                FollowUp::Action(action) => self.do_action(action, &mut queue).await,
            }
        }
        Ok(())
    }

    async fn do_refresh(&self, queue: &mut VecDeque<FollowUp>) {
        let ctx = self.context().await;
        match self
            .server
            .get_game_status(&ctx.game_id, &ctx.player_id)
            .await
        {
            Ok(snapshot) => {
                let now = self.clock.now_millis();
                let follow = {
                    let mut coordinator = self.coordinator.lock().await;
                    coordinator.apply_snapshot(snapshot, now)
                };
                queue.extend(follow);
            }
            Err(error) => {
                tracing::warn!(error = %error, "status poll failed; keeping previous state");
            }
        }
    }

    async fn do_submit(
        &self,
        kind: ChoiceKind,
        decision: ChoiceDecision,
        queue: &mut VecDeque<FollowUp>,
    ) {
        let ticket = {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.begin_submission(kind, decision, self.clock.now_millis())
        };
        let Some(ticket) = ticket else {
            return;
        };
        let success = match self.send_confirmation(&ticket).await {
            Ok(ResponseResult::Success { .. }) => true,
            Ok(envelope) => {
                if let Err(error) = envelope.into_result() {
                    tracing::warn!(kind = %kind, error = %error, "choice submission rejected");
                }
                false
            }
            Err(error) => {
                // Transient failure: recovered locally, the user may retry
                tracing::warn!(kind = %kind, error = %error, "choice submission failed");
                false
            }
        };
        {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.finish_submission(&ticket, success, self.clock.now_millis());
        }
        // Deliberate status refresh after every submission
        push_refresh(queue);
    }

    async fn send_confirmation(
        &self,
        ticket: &SubmissionTicket,
    ) -> Result<ResponseResult, RequestError> {
        // Ids are stamped from the current context at send time
        let ctx = self.context().await;
        let request = ConfirmChoiceRequest {
            game_id: ctx.game_id,
            player_id: ctx.player_id,
            entry_id: ticket.entry_id.clone(),
            event_id: ticket.event_id.clone(),
            decision: ticket.decision.clone(),
        };
        match ticket.kind {
            ChoiceKind::Prompt => self.server.confirm_target_choice(request).await,
            ChoiceKind::Option => self.server.confirm_option_choice(request).await,
            ChoiceKind::Token => self.server.confirm_token_choice(request).await,
            ChoiceKind::Burst | ChoiceKind::BurstGroup => {
                self.server.confirm_burst_choice(request).await
            }
            ChoiceKind::Blocker => self.server.confirm_blocker_choice(request).await,
        }
    }

    async fn do_acknowledge(&self, event_ids: Vec<EventId>, queue: &mut VecDeque<FollowUp>) {
        let ctx = self.context().await;
        let request = AcknowledgeEventsRequest {
            game_id: ctx.game_id,
            player_id: ctx.player_id,
            event_ids,
        };
        let success = match self.server.acknowledge_events(request).await {
            Ok(ResponseResult::Success { .. }) => true,
            Ok(_) | Err(_) => false,
        };
        {
            let mut coordinator = self.coordinator.lock().await;
            coordinator.finish_group_ack(success, self.clock.now_millis());
        }
        push_refresh(queue);
    }

    async fn do_action(&self, action: PlayerActionKind, queue: &mut VecDeque<FollowUp>) {
        let ctx = self.context().await;
        let is_attack = matches!(
            action,
            PlayerActionKind::AttackUnit { .. } | PlayerActionKind::AttackShieldArea { .. }
        );
        let played_card = match &action {
            PlayerActionKind::PlayCard { card_uid, slot: None } => Some(card_uid.clone()),
            _ => None,
        };

        let outcome = if matches!(action, PlayerActionKind::ConfirmBattleAction) {
            let battle_status = {
                let coordinator = self.coordinator.lock().await;
                coordinator.snapshot().and_then(|snapshot| snapshot.battle_status())
            };
            self.executor.skip_action(&ctx, battle_status).await.map(|_| ())
        } else {
            self.executor
                .execute(&ctx, action)
                .await
                .and_then(|envelope| envelope.into_result().map(|_| ()))
        };

        if let Err(error) = outcome {
            self.handle_action_rejection(error, played_card).await;
        }

        if is_attack {
            // Attacks always leave a clean slate, success or failure
            let mut coordinator = self.coordinator.lock().await;
            coordinator.clear_attack_state(self.clock.now_millis());
        }
        push_refresh(queue);
    }

    async fn handle_action_rejection(&self, error: RequestError, played_card: Option<CardUid>) {
        if error.is_board_full() {
            if let Some(card_uid) = played_card {
                tracing::debug!("board full; asking for a slot to replace");
                self.coordinator.lock().await.open_slot_replacement(card_uid);
                return;
            }
        }
        match &error {
            RequestError::Rejected { .. } => {
                self.coordinator.lock().await.show_error(&error.user_message());
            }
            other => {
                tracing::warn!(error = %other, "action failed; state recovers on next poll");
            }
        }
    }
}

fn push_refresh(queue: &mut VecDeque<FollowUp>) {
    if !queue.iter().any(|item| matches!(item, FollowUp::Refresh)) {
        queue.push_back(FollowUp::Refresh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::headless::{headless_dialogs, HeadlessBoard, HeadlessTimer};
    use crate::ports::outbound::MockGameServerPort;
    use crate::testkit;
    use skirmish_shared::GameSnapshot;

    struct Harness {
        client: GameClient,
        dialogs: Dialogs,
        clock: Arc<FixedClock>,
    }

    fn harness(mut server: MockGameServerPort, snapshots: Vec<GameSnapshot>) -> Harness {
        let mut snapshots = snapshots.into_iter().collect::<VecDeque<_>>();
        server.expect_get_game_status().returning(move |_, _| {
            let snapshot = if snapshots.len() > 1 {
                snapshots.pop_front().unwrap_or_default()
            } else {
                snapshots.front().cloned().unwrap_or_default()
            };
            Ok(snapshot)
        });

        let dialogs = headless_dialogs();
        let clock = Arc::new(FixedClock::at(1_000));
        let client = GameClient::new(
            GameContext::new("g1", "player_1"),
            Arc::new(server),
            dialogs.clone(),
            Arc::new(HeadlessBoard::new()),
            Arc::new(HeadlessTimer::new()),
            clock.clone(),
        );
        Harness {
            client,
            dialogs,
            clock,
        }
    }

    #[tokio::test]
    async fn rapid_duplicate_submissions_reach_the_server_once() {
        let mut server = MockGameServerPort::new();
        server
            .expect_confirm_option_choice()
            .times(1)
            .returning(|_| Ok(ResponseResult::success_empty()));

        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_option_choice("e1", "player_1", testkit::options(&["a"]))
            .build();
        let h = harness(server, vec![snapshot]);
        h.client.refresh().await.expect("refresh");

        let decision = ChoiceDecision::Option {
            option_id: "a".to_string(),
        };
        let (first, second) = tokio::join!(
            h.client.submit_choice(ChoiceKind::Option, decision.clone()),
            h.client.submit_choice(ChoiceKind::Option, decision.clone()),
        );
        first.expect("first submit");
        second.expect("second submit");
        // A third attempt inside the retry window is also a no-op
        h.client
            .submit_choice(ChoiceKind::Option, decision)
            .await
            .expect("third submit");
    }

    #[tokio::test]
    async fn dialog_stays_hidden_between_submit_and_acknowledgement() {
        let mut server = MockGameServerPort::new();
        server
            .expect_confirm_option_choice()
            .returning(|_| Ok(ResponseResult::success_empty()));

        // The server keeps reporting the entry unresolved after the submit
        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_option_choice("e1", "player_1", testkit::options(&["a"]))
            .build();
        let h = harness(server, vec![snapshot]);
        h.client.refresh().await.expect("refresh");
        assert!(h.dialogs.option.is_open());

        h.client
            .submit_choice(
                ChoiceKind::Option,
                ChoiceDecision::Option {
                    option_id: "a".to_string(),
                },
            )
            .await
            .expect("submit");
        assert!(!h.dialogs.option.is_open());

        // Polls inside the grace window must not reopen the dialog
        h.clock.advance(2_000);
        h.client.refresh().await.expect("refresh");
        assert!(!h.dialogs.option.is_open());

        // Past the window the safety valve re-enables the UI
        h.clock.advance(3_000);
        h.client.refresh().await.expect("refresh");
        assert!(h.dialogs.option.is_open());
    }

    #[tokio::test]
    async fn failed_attack_still_clears_selection_and_mode() {
        let mut server = MockGameServerPort::new();
        server
            .expect_player_action()
            .returning(|_| Err(RequestError::SendFailed("boom".to_string())));

        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_local_unit("slot1", "U1", true)
            .with_opponent_unit("slot2", "E1")
            .build();
        let h = harness(server, vec![snapshot]);
        h.client.refresh().await.expect("refresh");

        h.client
            .click_slot(SlotKey::new(Side::Local, "slot1"))
            .await
            .expect("select attacker");
        h.client
            .invoke_action(ActionId::AttackUnit)
            .await
            .expect("enter attack mode");
        h.client
            .click_slot(SlotKey::new(Side::Opponent, "slot2"))
            .await
            .expect("pick target");

        let bar = h.client.action_bar().await;
        assert_ne!(bar.owner, crate::state::BarOwner::AttackMode);
    }

    #[tokio::test]
    async fn board_full_rejection_opens_slot_replacement() {
        let mut server = MockGameServerPort::new();
        server.expect_player_action().times(1).returning(|_| {
            Ok(ResponseResult::error(
                skirmish_shared::ErrorCode::BoardFull,
                "choose a slot to replace",
            ))
        });

        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_hand_card("player_1", "H1")
            .with_local_unit("slot1", "U1", true)
            .build();
        let h = harness(server, vec![snapshot]);
        h.client.refresh().await.expect("refresh");

        h.client
            .click_hand(CardUid::new("H1"))
            .await
            .expect("select hand card");
        h.client
            .invoke_action(ActionId::PlayCard)
            .await
            .expect("play card");
        assert!(h.dialogs.slot_replacement.is_open());
        assert!(!h.dialogs.error.is_open());
    }

    #[tokio::test]
    async fn other_rejections_surface_in_the_error_dialog() {
        let mut server = MockGameServerPort::new();
        server.expect_player_action().returning(|_| {
            Ok(ResponseResult::error(
                skirmish_shared::ErrorCode::IllegalAction,
                "that unit cannot act",
            ))
        });

        let snapshot = testkit::snapshot()
            .main_phase("player_1")
            .with_hand_card("player_1", "H1")
            .build();
        let h = harness(server, vec![snapshot]);
        h.client.refresh().await.expect("refresh");

        h.client
            .click_hand(CardUid::new("H1"))
            .await
            .expect("select hand card");
        h.client
            .invoke_action(ActionId::PlayCard)
            .await
            .expect("play card");
        assert!(h.dialogs.error.is_open());
        let state = h.dialogs.error.automation_state();
        assert_eq!(state.title, "Action Failed");
    }
}
