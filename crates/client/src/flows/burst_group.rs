//! Grouped burst flow - a batch of burst effects resolved one row at a time.
//!
//! The owner loop: while the group has unresolved events, show the list
//! dialog; selecting a row opens the single-burst item dialog for that
//! event; completing (or backing out of) the sub-choice returns to the
//! list. When the server reports the group completed, the whole batch is
//! acknowledged in one event-ids call and the flow clears.

use std::sync::Arc;

use skirmish_domain::{ChoiceKind, EventId};
use skirmish_shared::{BurstDecision, ChoiceDecision, ChoiceEntry, GameSnapshot};

use crate::application::dto::GameContext;
use crate::ports::outbound::{DialogOption, DialogPort, DialogRequest};
use crate::state::ActionBarState;

use super::choice_flow::{ChoiceFlow, FlowConfig};
use super::{DialogCommand, FlowEnv, FlowManager, FollowUp, SubmissionTicket};

pub struct BurstGroupFlow {
    inner: ChoiceFlow,
    item_dialog: Arc<dyn DialogPort>,
    /// Row currently open in the item dialog
    open_event: Option<EventId>,
    item_deadline_ms: Option<u64>,
    ack_pending: bool,
    acked: bool,
}

impl BurstGroupFlow {
    pub fn new(list_dialog: Arc<dyn DialogPort>, item_dialog: Arc<dyn DialogPort>) -> Self {
        Self {
            inner: ChoiceFlow::new(FlowConfig::for_kind(ChoiceKind::BurstGroup), list_dialog),
            item_dialog,
            open_event: None,
            item_deadline_ms: None,
            ack_pending: false,
            acked: false,
        }
    }

    pub fn open_event(&self) -> Option<&EventId> {
        self.open_event.as_ref()
    }

    fn open_item(&mut self, entry: &ChoiceEntry, event_id: EventId, now_ms: u64) {
        self.item_deadline_ms = entry.data.timeout_ms.map(|ms| now_ms + ms);
        self.show_item_dialog(entry, &event_id);
        self.open_event = Some(event_id);
    }

    /// Display-only half of `open_item`; the failure-retry path uses it to
    /// bring the row back without rearming the deadline.
    fn show_item_dialog(&mut self, entry: &ChoiceEntry, event_id: &EventId) {
        let row = entry.data.events.iter().find(|e| &e.event_id == event_id);
        let body = row.and_then(|e| e.description.clone());
        self.inner.set_dialog_suspended(true);
        self.item_dialog.show(DialogRequest {
            title: "Burst Effect".to_string(),
            body,
            options: vec![
                DialogOption::new("activate", "Activate"),
                DialogOption::new("pass", "Pass"),
                DialogOption::new("back", "Back"),
            ],
            timeout: None,
        });
    }

    fn close_item(&mut self, now_ms: u64, redisplay_list: bool) {
        self.open_event = None;
        self.item_deadline_ms = None;
        self.item_dialog.hide();
        self.inner.set_dialog_suspended(false);
        if redisplay_list {
            self.inner.redisplay(now_ms);
        }
    }

    /// Completion of the batch acknowledgement call.
    pub fn finish_ack(&mut self, success: bool) {
        self.ack_pending = false;
        if success {
            self.acked = true;
            // Full state clearing happens on the next sync when the entry
            // has left the queue; take the dialogs down now.
            self.item_dialog.hide();
            self.inner.set_dialog_suspended(true);
        } else {
            tracing::warn!("group acknowledgement failed; will retry on next sync");
        }
    }
}

impl FlowManager for BurstGroupFlow {
    fn kind(&self) -> ChoiceKind {
        ChoiceKind::BurstGroup
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn sync_decision_state(
        &mut self,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        self.inner.sync_decision_state(snapshot, ctx, env);

        if !self.inner.is_active() {
            if self.open_event.is_some() || self.acked || self.ack_pending {
                self.item_dialog.hide();
            }
            self.open_event = None;
            self.item_deadline_ms = None;
            self.ack_pending = false;
            self.acked = false;
            return Vec::new();
        }

        let Some(entry) = self.inner.active_entry().cloned() else {
            return Vec::new();
        };

        if !self.inner.is_owner(ctx) {
            self.close_item(env.now_ms, false);
            return Vec::new();
        }

        // A row the user answered has been resolved server-side: back to
        // the list, which re-renders with the row marked done.
        if let Some(open) = self.open_event.clone() {
            if entry.data.resolved_event_ids.contains(&open) {
                self.close_item(env.now_ms, true);
            }
        }

        if entry.is_completed && !self.acked && !self.ack_pending {
            self.ack_pending = true;
            let event_ids: Vec<EventId> =
                entry.data.events.iter().map(|e| e.event_id.clone()).collect();
            tracing::debug!(count = event_ids.len(), "group completed; acknowledging batch");
            return vec![FollowUp::AcknowledgeGroup { event_ids }];
        }
        Vec::new()
    }

    fn apply_action_bar(
        &mut self,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
        bar: &mut ActionBarState,
    ) -> bool {
        self.inner.apply_action_bar(ctx, env, bar)
    }

    fn handle_dialog_command(
        &mut self,
        command: DialogCommand,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        let DialogCommand::SelectOption(option_id) = command else {
            // Back: reset to the list without submitting
            self.close_item(env.now_ms, true);
            return Vec::new();
        };
        if !self.inner.is_owner(ctx) {
            tracing::debug!("group dialog option from non-owner; ignoring");
            return Vec::new();
        }
        let Some(entry) = self.inner.active_entry().cloned() else {
            return Vec::new();
        };

        if let Some(raw) = option_id.strip_prefix("event-") {
            let event_id = EventId::new(raw);
            let selectable = entry
                .data
                .events
                .iter()
                .any(|e| e.event_id == event_id)
                && !entry.data.resolved_event_ids.contains(&event_id);
            if selectable {
                self.open_item(&entry, event_id, env.now_ms);
            } else {
                tracing::debug!(event_id = %event_id, "row missing or already resolved; ignoring");
            }
            return Vec::new();
        }

        match option_id.as_str() {
            "back" => {
                self.close_item(env.now_ms, true);
                Vec::new()
            }
            "activate" | "pass" if self.open_event.is_some() => {
                let decision = if option_id == "activate" {
                    BurstDecision::Activate
                } else {
                    BurstDecision::Pass
                };
                vec![FollowUp::Submit {
                    kind: ChoiceKind::BurstGroup,
                    decision: ChoiceDecision::Burst { decision },
                }]
            }
            other => {
                tracing::warn!(option_id = %other, "unknown group dialog option");
                Vec::new()
            }
        }
    }

    fn due_timeout(&mut self, ctx: &GameContext, now_ms: u64) -> Vec<FollowUp> {
        // Only the open item dialog times out; the list waits for the user
        let Some(deadline) = self.item_deadline_ms else {
            return Vec::new();
        };
        if now_ms < deadline || self.open_event.is_none() || !self.inner.is_owner(ctx) {
            return Vec::new();
        }
        self.item_deadline_ms = None;
        tracing::info!("burst item timer elapsed; applying default");
        vec![FollowUp::Submit {
            kind: ChoiceKind::BurstGroup,
            decision: ChoiceDecision::Burst {
                decision: BurstDecision::TIMEOUT_DEFAULT,
            },
        }]
    }

    fn begin_submission(
        &mut self,
        ctx: &GameContext,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket> {
        let event_id = self.open_event.clone()?;
        let mut ticket = self.inner.begin_submission(ctx, decision, now_ms)?;
        ticket.event_id = Some(event_id);
        self.item_dialog.hide();
        Some(ticket)
    }

    fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool) {
        self.inner.finish_submission(ticket, success);
        if success {
            // The group entry outlives the row: drop the stamp so the list
            // keeps rendering, and return to it. The answered row flips to
            // done when the next snapshot reports it resolved.
            self.inner.clear_submitted_stamp();
            self.close_item(0, false);
        } else if let Some(event_id) = self.open_event.clone() {
            // Keep the row open so the user can retry
            if let Some(entry) = self.inner.active_entry().cloned() {
                self.show_item_dialog(&entry, &event_id);
            }
        }
    }
}
