//! The shared lifecycle engine behind every choice flow.
//!
//! All six decision kinds run the same lifecycle: locate the active queue
//! entry, show exactly one dialog to the owning player, keep the non-owner
//! waiting, submit exactly once, and tolerate duplicate or slow server
//! acknowledgement. `ChoiceFlow` implements that lifecycle once; the
//! concrete kinds are thin [`FlowConfig`]s (plus the blocker and grouped
//! wrappers layered on top).
//!
//! Two guards carry the exactly-once contract across the async gap:
//!
//! - `request_pending` blocks re-entry into the submit path while a network
//!   call is in flight.
//! - the submitted stamp (`entry id` + timestamp) keeps the dialog hidden
//!   between an optimistic submit and the server acknowledging it, so a
//!   poll that still shows the old unresolved entry cannot flicker the
//!   dialog back open. If the stamp outlives the retry window without the
//!   entry resolving, it is dropped and the user may submit again.

use std::sync::Arc;

use futures_channel::oneshot;

use skirmish_domain::{ChoiceKind, EntryId, PlayerId};
use skirmish_shared::{
    BurstDecision, ChoiceData, ChoiceDecision, ChoiceEntry, ChoiceOption, GameSnapshot, OptionTag,
    TargetSelector,
};

use crate::application::dto::GameContext;
use crate::ports::outbound::{DialogOption, DialogPort, DialogRequest, DialogTimeout};
use crate::state::{ActionBarState, BarOwner};

use super::{DialogCommand, FlowEnv, FlowManager, FollowUp, SubmissionTicket};

/// How long a submitted-but-unacknowledged decision suppresses the dialog
/// before the flow permits resubmission.
pub const RETRY_TIMEOUT_MS: u64 = 4_000;

/// Per-kind configuration of the shared lifecycle
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub kind: ChoiceKind,
    pub title: &'static str,
    pub retry_timeout_ms: u64,
    /// Re-render an already shown dialog when its rows change (grouped
    /// burst lists mark resolved rows as done without a new entry id)
    pub redisplay_on_data_change: bool,
}

impl FlowConfig {
    pub fn for_kind(kind: ChoiceKind) -> Self {
        let title = match kind {
            ChoiceKind::Prompt => "Choose a Target",
            ChoiceKind::Option => "Choose an Option",
            ChoiceKind::Token => "Choose a Token",
            ChoiceKind::Burst => "Burst Effect",
            ChoiceKind::BurstGroup => "Burst Effects",
            ChoiceKind::Blocker => "Choose a Blocker",
        };
        Self {
            kind,
            title,
            retry_timeout_ms: RETRY_TIMEOUT_MS,
            redisplay_on_data_change: matches!(kind, ChoiceKind::BurstGroup),
        }
    }
}

/// Local record of an in-flight or just-finished submission
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubmittedStamp {
    entry_id: EntryId,
    at_ms: u64,
}

/// Outcome delivered to a waiter blocked on this flow's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The entry was answered (locally or by the server)
    Resolved,
    /// The entry disappeared or was superseded without an answer
    Cleared,
}

pub struct ChoiceFlow {
    config: FlowConfig,
    dialog: Arc<dyn DialogPort>,
    active: Option<ChoiceEntry>,
    shown_entry_id: Option<EntryId>,
    shown_fingerprint: Option<u64>,
    submitted: Option<SubmittedStamp>,
    request_pending: bool,
    pending_resolve: Option<oneshot::Sender<ChoiceOutcome>>,
    dialog_deadline_ms: Option<u64>,
    dialog_suspended: bool,
}

impl ChoiceFlow {
    pub fn new(config: FlowConfig, dialog: Arc<dyn DialogPort>) -> Self {
        Self {
            config,
            dialog,
            active: None,
            shown_entry_id: None,
            shown_fingerprint: None,
            submitted: None,
            request_pending: false,
            pending_resolve: None,
            dialog_deadline_ms: None,
            dialog_suspended: false,
        }
    }

    pub fn kind(&self) -> ChoiceKind {
        self.config.kind
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_entry(&self) -> Option<&ChoiceEntry> {
        self.active.as_ref()
    }

    pub fn request_pending(&self) -> bool {
        self.request_pending
    }

    /// A one-shot future resolved when this flow's current question is
    /// answered or goes away. At most one waiter at a time; a new call
    /// replaces (and cancels) the previous receiver. Resolution happens
    /// exactly once: whichever of user action, timeout, or server-side
    /// clearing fires first wins and the others become no-ops.
    pub fn decision_future(&mut self) -> oneshot::Receiver<ChoiceOutcome> {
        let (tx, rx) = oneshot::channel();
        self.pending_resolve = Some(tx);
        rx
    }

    fn resolve_pending(&mut self, outcome: ChoiceOutcome) {
        if let Some(tx) = self.pending_resolve.take() {
            let _ = tx.send(outcome);
        }
    }

    fn entry_owned_by(entry: &ChoiceEntry, player: &PlayerId) -> bool {
        // An entry without an owner is addressed to whoever received it
        entry
            .player_id
            .as_ref()
            .map(|owner| owner == player)
            .unwrap_or(true)
    }

    pub fn is_owner(&self, ctx: &GameContext) -> bool {
        self.active
            .as_ref()
            .map(|entry| Self::entry_owned_by(entry, &ctx.player_id))
            .unwrap_or(false)
    }

    fn stamp_is_fresh(&self, entry_id: &EntryId, now_ms: u64) -> bool {
        self.submitted
            .as_ref()
            .is_some_and(|stamp| {
                stamp.entry_id == *entry_id
                    && now_ms.saturating_sub(stamp.at_ms) < self.config.retry_timeout_ms
            })
    }

    /// Idempotent reconciliation against the latest snapshot.
    pub fn sync_decision_state(
        &mut self,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) {
        let found = skirmish_shared::find_active_entry(snapshot, self.config.kind);

        let Some(entry) = found else {
            // Entry gone from both queues: the question no longer exists
            if self.active.is_some() {
                tracing::debug!(kind = %self.config.kind, "entry left the queue; clearing flow");
                self.clear(ChoiceOutcome::Cleared, env);
            }
            return;
        };

        if entry.data.user_decision_made {
            if self.active.is_some() {
                tracing::debug!(kind = %self.config.kind, entry_id = %entry.id, "decision already made; clearing flow");
                self.clear(ChoiceOutcome::Resolved, env);
            }
            return;
        }

        // A new entry id supersedes the previous question entirely
        if self.active.as_ref().map(|a| &a.id) != Some(&entry.id) {
            if self.active.is_some() {
                self.resolve_pending(ChoiceOutcome::Cleared);
            }
            self.shown_entry_id = None;
            self.shown_fingerprint = None;
            self.submitted = None;
            self.dialog_deadline_ms = None;
        }
        self.active = Some(entry.clone());

        if self.stamp_is_fresh(&entry.id, env.now_ms) {
            // Post-submit grace: the poll still shows the old unresolved
            // entry; keep the dialog down until the server catches up.
            self.dialog.hide();
            return;
        }
        if self
            .submitted
            .as_ref()
            .is_some_and(|stamp| stamp.entry_id == entry.id)
        {
            // Retry window elapsed with no resolution. The prior outcome is
            // unknown; the server is assumed idempotent per entry id.
            tracing::warn!(
                kind = %self.config.kind,
                entry_id = %entry.id,
                "submission unacknowledged past retry window; re-enabling decision UI"
            );
            self.submitted = None;
            self.shown_entry_id = None;
            self.shown_fingerprint = None;
        }

        if !Self::entry_owned_by(&entry, &ctx.player_id) {
            self.dialog.hide();
            self.shown_entry_id = None;
            self.shown_fingerprint = None;
            self.dialog_deadline_ms = None;
            return;
        }

        self.maybe_show_dialog(&entry, env.now_ms);
    }

    fn maybe_show_dialog(&mut self, entry: &ChoiceEntry, now_ms: u64) {
        if self.dialog_suspended {
            return;
        }
        let request = self.build_dialog_request(&entry.data);
        let fingerprint = request.fingerprint();
        let first_show = self.shown_entry_id.as_ref() != Some(&entry.id);
        if !first_show
            && (!self.config.redisplay_on_data_change
                || self.shown_fingerprint == Some(fingerprint))
        {
            // Never reopen a dialog already shown for this entry id
            return;
        }
        if first_show {
            self.dialog_deadline_ms = request.timeout.as_ref().map(|t| now_ms + t.after_ms);
        }
        tracing::debug!(kind = %self.config.kind, entry_id = %entry.id, "showing choice dialog");
        self.dialog.show(request);
        self.shown_entry_id = Some(entry.id.clone());
        self.shown_fingerprint = Some(fingerprint);
    }

    /// Re-show the dialog for the current entry (used by the grouped flow
    /// when the user backs out of a sub-choice).
    pub fn redisplay(&mut self, now_ms: u64) {
        self.dialog_suspended = false;
        if let Some(entry) = self.active.clone() {
            self.shown_entry_id = None;
            self.maybe_show_dialog(&entry, now_ms);
        }
    }

    /// Suspend (and hide) this flow's dialog while a sub-dialog is open.
    pub fn set_dialog_suspended(&mut self, suspended: bool) {
        self.dialog_suspended = suspended;
        if suspended {
            self.dialog.hide();
        }
    }

    /// Drop the submitted stamp; the grouped flow clears it after each
    /// per-row submission because the group entry outlives the row.
    pub fn clear_submitted_stamp(&mut self) {
        self.submitted = None;
    }

    fn clear(&mut self, outcome: ChoiceOutcome, env: &mut FlowEnv<'_>) {
        self.resolve_pending(outcome);
        self.active = None;
        self.shown_entry_id = None;
        self.shown_fingerprint = None;
        self.submitted = None;
        self.request_pending = false;
        self.dialog_deadline_ms = None;
        self.dialog_suspended = false;
        self.dialog.hide();
        env.timer.resume();
    }

    pub fn apply_action_bar(
        &mut self,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
        bar: &mut ActionBarState,
    ) -> bool {
        let Some(entry) = &self.active else {
            return false;
        };
        if !Self::entry_owned_by(entry, &ctx.player_id) {
            env.timer.pause();
            bar.set_waiting(BarOwner::Flow(self.config.kind));
            return true;
        }
        // Owner: the dialog, not the bar, drives the buttons
        env.timer.resume();
        bar.clear_for(BarOwner::Flow(self.config.kind));
        true
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    pub fn begin_submission(
        &mut self,
        ctx: &GameContext,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket> {
        let entry = self.active.as_ref()?;
        if !Self::entry_owned_by(entry, &ctx.player_id) {
            tracing::warn!(kind = %self.config.kind, "non-owner attempted to submit; ignoring");
            return None;
        }
        if self.request_pending {
            tracing::debug!(kind = %self.config.kind, "submission already in flight; ignoring");
            return None;
        }
        if self.stamp_is_fresh(&entry.id, now_ms) {
            tracing::debug!(kind = %self.config.kind, entry_id = %entry.id, "decision already submitted for this entry; ignoring");
            return None;
        }
        self.request_pending = true;
        self.submitted = Some(SubmittedStamp {
            entry_id: entry.id.clone(),
            at_ms: now_ms,
        });
        self.dialog_deadline_ms = None;
        // Optimistic hide; the post-submit grace keeps it down
        self.dialog.hide();
        Some(SubmissionTicket {
            kind: self.config.kind,
            entry_id: entry.id.clone(),
            event_id: entry.event_id.clone(),
            decision,
        })
    }

    pub fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool) {
        self.request_pending = false;
        if success {
            self.resolve_pending(ChoiceOutcome::Resolved);
            return;
        }
        // Failed submission: drop the stamp so the same dialog can be
        // retried by the user on the next sync.
        if self
            .submitted
            .as_ref()
            .is_some_and(|stamp| stamp.entry_id == ticket.entry_id)
        {
            self.submitted = None;
            self.shown_entry_id = None;
            self.shown_fingerprint = None;
        }
    }

    pub fn due_timeout(&mut self, ctx: &GameContext, now_ms: u64) -> Option<ChoiceDecision> {
        let deadline = self.dialog_deadline_ms?;
        if now_ms < deadline {
            return None;
        }
        let entry = self.active.as_ref()?;
        if !Self::entry_owned_by(entry, &ctx.player_id)
            || self.request_pending
            || self
                .submitted
                .as_ref()
                .is_some_and(|stamp| stamp.entry_id == entry.id)
        {
            return None;
        }
        self.dialog_deadline_ms = None;
        let decision = self.default_decision(&entry.data)?;
        tracing::info!(kind = %self.config.kind, entry_id = %entry.id, "decision timer elapsed; applying default");
        Some(decision)
    }

    // -------------------------------------------------------------------------
    // Kind-specific surfaces
    // -------------------------------------------------------------------------

    fn option_rows(&self, data: &ChoiceData) -> Vec<ChoiceOption> {
        match self.config.kind {
            ChoiceKind::Option => data.available_options.clone(),
            // Token choices usually arrive on availableChoices; older
            // engines reuse availableOptions
            ChoiceKind::Token if !data.available_choices.is_empty() => {
                data.available_choices.clone()
            }
            ChoiceKind::Token => data.available_options.clone(),
            _ => Vec::new(),
        }
    }

    pub(super) fn build_dialog_request(&self, data: &ChoiceData) -> DialogRequest {
        let options = match self.config.kind {
            ChoiceKind::Option | ChoiceKind::Token => self
                .option_rows(data)
                .into_iter()
                .map(|option| DialogOption {
                    id: option.id.clone(),
                    label: if option.label.is_empty() {
                        option.id
                    } else {
                        option.label
                    },
                    enabled: option.enabled,
                    done: false,
                })
                .collect(),
            ChoiceKind::Prompt => data
                .available_targets
                .iter()
                .enumerate()
                .map(|(index, target)| {
                    DialogOption::new(format!("target-{index}"), target_label(target))
                })
                .collect(),
            ChoiceKind::Burst => vec![
                DialogOption::new("activate", "Activate"),
                DialogOption::new("pass", "Pass"),
            ],
            ChoiceKind::BurstGroup => data
                .events
                .iter()
                .map(|event| {
                    let resolved = data.resolved_event_ids.contains(&event.event_id);
                    let label = event
                        .description
                        .clone()
                        .unwrap_or_else(|| event.event_id.to_string());
                    let row = DialogOption::new(format!("event-{}", event.event_id), label);
                    if resolved {
                        row.done()
                    } else {
                        row
                    }
                })
                .collect(),
            ChoiceKind::Blocker => {
                let mut options: Vec<DialogOption> = data
                    .available_targets
                    .iter()
                    .enumerate()
                    .map(|(index, target)| {
                        DialogOption::new(format!("target-{index}"), target_label(target))
                    })
                    .collect();
                options.push(DialogOption::new("skip", "No Block"));
                options
            }
        };

        let timeout = data.timeout_ms.and_then(|after_ms| {
            self.default_option_id(data).map(|default_option| DialogTimeout {
                after_ms,
                default_option,
            })
        });

        DialogRequest {
            title: self.config.title.to_string(),
            body: data.prompt_text.clone(),
            options,
            timeout,
        }
    }

    fn default_option_id(&self, data: &ChoiceData) -> Option<String> {
        match self.config.kind {
            ChoiceKind::Burst | ChoiceKind::BurstGroup => Some("activate".to_string()),
            ChoiceKind::Blocker => Some("skip".to_string()),
            ChoiceKind::Option | ChoiceKind::Token => {
                safe_option(&self.option_rows(data)).map(|o| o.id)
            }
            ChoiceKind::Prompt => {
                if data.available_targets.is_empty() {
                    None
                } else {
                    Some("target-0".to_string())
                }
            }
        }
    }

    /// The decision applied when a dialog deadline elapses. Bursts default
    /// to Activate: not cancelling a burst means it triggers.
    pub fn default_decision(&self, data: &ChoiceData) -> Option<ChoiceDecision> {
        match self.config.kind {
            ChoiceKind::Burst | ChoiceKind::BurstGroup => Some(ChoiceDecision::Burst {
                decision: BurstDecision::TIMEOUT_DEFAULT,
            }),
            ChoiceKind::Blocker => Some(ChoiceDecision::Blocker { target: None }),
            ChoiceKind::Option => safe_option(&self.option_rows(data))
                .map(|option| ChoiceDecision::Option { option_id: option.id }),
            ChoiceKind::Token => safe_option(&self.option_rows(data))
                .map(|option| ChoiceDecision::Token { token_id: option.id }),
            ChoiceKind::Prompt => data.available_targets.first().map(|target| {
                ChoiceDecision::Target {
                    card_uid: target.card_uid.clone(),
                    zone: target.zone.clone(),
                }
            }),
        }
    }

    /// Map a clicked dialog option id to the wire decision it stands for.
    pub fn decision_for_option(&self, option_id: &str) -> Option<ChoiceDecision> {
        let entry = self.active.as_ref()?;
        let data = &entry.data;
        match self.config.kind {
            ChoiceKind::Burst => match option_id {
                "activate" => Some(ChoiceDecision::Burst {
                    decision: BurstDecision::Activate,
                }),
                "pass" => Some(ChoiceDecision::Burst {
                    decision: BurstDecision::Pass,
                }),
                _ => None,
            },
            ChoiceKind::Option => self
                .option_rows(data)
                .iter()
                .find(|o| o.id == option_id && o.enabled)
                .map(|o| ChoiceDecision::Option {
                    option_id: o.id.clone(),
                }),
            ChoiceKind::Token => self
                .option_rows(data)
                .iter()
                .find(|o| o.id == option_id && o.enabled)
                .map(|o| ChoiceDecision::Token {
                    token_id: o.id.clone(),
                }),
            ChoiceKind::Prompt => indexed_target(data, option_id).map(|target| {
                ChoiceDecision::Target {
                    card_uid: target.card_uid.clone(),
                    zone: target.zone.clone(),
                }
            }),
            ChoiceKind::Blocker => {
                if option_id == "skip" {
                    return Some(ChoiceDecision::Blocker { target: None });
                }
                indexed_target(data, option_id).map(|target| ChoiceDecision::Blocker {
                    target: Some(TargetSelector {
                        card_uid: target.card_uid.clone(),
                        zone: target.zone.clone(),
                    }),
                })
            }
            // Grouped rows are routed by the wrapper, not by index
            ChoiceKind::BurstGroup => None,
        }
    }
}

fn indexed_target<'a>(
    data: &'a ChoiceData,
    option_id: &str,
) -> Option<&'a skirmish_shared::TargetOption> {
    let index: usize = option_id.strip_prefix("target-")?.parse().ok()?;
    data.available_targets.get(index)
}

fn target_label(target: &skirmish_shared::TargetOption) -> String {
    if let Some(label) = &target.label {
        return label.clone();
    }
    match (&target.card_uid, &target.zone) {
        (Some(uid), _) => uid.to_string(),
        (None, Some(zone)) => zone.to_string(),
        (None, None) => "Target".to_string(),
    }
}

fn safe_option(options: &[ChoiceOption]) -> Option<ChoiceOption> {
    options
        .iter()
        .find(|o| o.enabled && o.tag == Some(OptionTag::Bottom))
        .or_else(|| options.iter().find(|o| o.enabled))
        .cloned()
}

impl FlowManager for ChoiceFlow {
    fn kind(&self) -> ChoiceKind {
        ChoiceFlow::kind(self)
    }

    fn is_active(&self) -> bool {
        ChoiceFlow::is_active(self)
    }

    fn sync_decision_state(
        &mut self,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        ChoiceFlow::sync_decision_state(self, snapshot, ctx, env);
        Vec::new()
    }

    fn apply_action_bar(
        &mut self,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
        bar: &mut ActionBarState,
    ) -> bool {
        ChoiceFlow::apply_action_bar(self, ctx, env, bar)
    }

    fn handle_dialog_command(
        &mut self,
        command: DialogCommand,
        ctx: &GameContext,
        _env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp> {
        match command {
            DialogCommand::SelectOption(option_id) => {
                if !self.is_owner(ctx) {
                    tracing::debug!(kind = %self.config.kind, "dialog option from non-owner; ignoring");
                    return Vec::new();
                }
                match self.decision_for_option(&option_id) {
                    Some(decision) => vec![FollowUp::Submit {
                        kind: self.config.kind,
                        decision,
                    }],
                    None => {
                        tracing::warn!(kind = %self.config.kind, option_id = %option_id, "unknown or disabled dialog option");
                        Vec::new()
                    }
                }
            }
            DialogCommand::Back => Vec::new(),
        }
    }

    fn due_timeout(&mut self, ctx: &GameContext, now_ms: u64) -> Vec<FollowUp> {
        match ChoiceFlow::due_timeout(self, ctx, now_ms) {
            Some(decision) => vec![FollowUp::Submit {
                kind: self.config.kind,
                decision,
            }],
            None => Vec::new(),
        }
    }

    fn begin_submission(
        &mut self,
        ctx: &GameContext,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket> {
        ChoiceFlow::begin_submission(self, ctx, decision, now_ms)
    }

    fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool) {
        ChoiceFlow::finish_submission(self, ticket, success)
    }
}
