//! Interactive choice flows.
//!
//! One flow manager per choice kind, all built on the shared
//! [`choice_flow::ChoiceFlow`] lifecycle engine. The coordinator consults
//! them in strict priority order each refresh; the first active one owns the
//! action bar and its dialog.

pub mod blocker;
pub mod burst_group;
pub mod choice_flow;

use skirmish_domain::{ChoiceKind, EntryId, EventId};
use skirmish_shared::{ChoiceDecision, GameSnapshot, PlayerActionKind};

use crate::application::dto::GameContext;
use crate::ports::outbound::{BoardPort, Dialogs, TurnTimerPort};
use crate::state::{ActionBarState, SlotInteractionGate};

pub use blocker::{BlockerFlow, BlockerTarget};
pub use burst_group::BurstGroupFlow;
pub use choice_flow::{ChoiceFlow, ChoiceOutcome, FlowConfig, RETRY_TIMEOUT_MS};

/// Flow priority, highest first. The coordinator walks this order and the
/// first active flow wins the action bar; everything below is starved by
/// design.
pub const FLOW_PRIORITY: [ChoiceKind; 6] = [
    ChoiceKind::BurstGroup,
    ChoiceKind::Burst,
    ChoiceKind::Prompt,
    ChoiceKind::Option,
    ChoiceKind::Token,
    ChoiceKind::Blocker,
];

/// Collaborators a flow may touch during a synchronous transition
pub struct FlowEnv<'a> {
    pub board: &'a dyn BoardPort,
    pub gate: &'a mut SlotInteractionGate,
    pub timer: &'a dyn TurnTimerPort,
    pub now_ms: u64,
}

/// A user interaction inside a flow's dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogCommand {
    /// The user picked a dialog option by id
    SelectOption(String),
    /// The user backed out of a sub-dialog without submitting
    Back,
}

/// Work the synchronous core hands to the async shell for execution.
///
/// Flows and coordinators never await; they emit these commands and the
/// client executes them around the network boundary.
#[derive(Debug)]
pub enum FollowUp {
    /// Submit a decision for the given flow kind
    Submit {
        kind: ChoiceKind,
        decision: ChoiceDecision,
    },
    /// Acknowledge a completed grouped notification in one batch call
    AcknowledgeGroup { event_ids: Vec<EventId> },
    /// Execute a concrete game action through the action executor
    Action(PlayerActionKind),
    /// Fetch a fresh snapshot and re-run the refresh cycle
    Refresh,
}

/// Claim produced by a successful `begin_submission`; carries everything the
/// shell needs to build the network call and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub kind: ChoiceKind,
    pub entry_id: EntryId,
    pub event_id: Option<EventId>,
    pub decision: ChoiceDecision,
}

/// Shared contract of all flow managers
pub trait FlowManager: Send {
    fn kind(&self) -> ChoiceKind;

    fn is_active(&self) -> bool;

    /// Idempotent reconciliation against the latest snapshot
    fn sync_decision_state(
        &mut self,
        snapshot: &GameSnapshot,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp>;

    /// Take ownership of the action bar if this flow is active.
    /// Returns false to let the next manager (or default policy) run.
    fn apply_action_bar(
        &mut self,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
        bar: &mut ActionBarState,
    ) -> bool;

    /// Route a user interaction from this flow's dialog
    fn handle_dialog_command(
        &mut self,
        command: DialogCommand,
        ctx: &GameContext,
        env: &mut FlowEnv<'_>,
    ) -> Vec<FollowUp>;

    /// Auto-decision when a dialog deadline has elapsed
    fn due_timeout(&mut self, ctx: &GameContext, now_ms: u64) -> Vec<FollowUp>;

    /// Reentrancy-guarded start of a submission
    fn begin_submission(
        &mut self,
        ctx: &GameContext,
        decision: ChoiceDecision,
        now_ms: u64,
    ) -> Option<SubmissionTicket>;

    /// Completion callback for a submission started by this flow
    fn finish_submission(&mut self, ticket: &SubmissionTicket, success: bool);
}

/// All flow managers, consulted in [`FLOW_PRIORITY`] order
pub struct FlowSet {
    pub burst_group: BurstGroupFlow,
    pub burst: ChoiceFlow,
    pub prompt: ChoiceFlow,
    pub option: ChoiceFlow,
    pub token: ChoiceFlow,
    pub blocker: BlockerFlow,
}

impl FlowSet {
    pub fn new(dialogs: &Dialogs) -> Self {
        Self {
            burst_group: BurstGroupFlow::new(
                dialogs.burst_group.clone(),
                dialogs.burst_group_item.clone(),
            ),
            burst: ChoiceFlow::new(FlowConfig::for_kind(ChoiceKind::Burst), dialogs.burst.clone()),
            prompt: ChoiceFlow::new(
                FlowConfig::for_kind(ChoiceKind::Prompt),
                dialogs.prompt.clone(),
            ),
            option: ChoiceFlow::new(
                FlowConfig::for_kind(ChoiceKind::Option),
                dialogs.option.clone(),
            ),
            token: ChoiceFlow::new(FlowConfig::for_kind(ChoiceKind::Token), dialogs.token.clone()),
            blocker: BlockerFlow::new(dialogs.blocker.clone()),
        }
    }

    /// Flow managers in priority order. Keeping this an explicit array makes
    /// the ordering a testable data structure rather than nested early
    /// returns.
    pub fn iter_priority_mut(&mut self) -> [&mut dyn FlowManager; 6] {
        [
            &mut self.burst_group,
            &mut self.burst,
            &mut self.prompt,
            &mut self.option,
            &mut self.token,
            &mut self.blocker,
        ]
    }

    pub fn by_kind_mut(&mut self, kind: ChoiceKind) -> &mut dyn FlowManager {
        match kind {
            ChoiceKind::BurstGroup => &mut self.burst_group,
            ChoiceKind::Burst => &mut self.burst,
            ChoiceKind::Prompt => &mut self.prompt,
            ChoiceKind::Option => &mut self.option,
            ChoiceKind::Token => &mut self.token,
            ChoiceKind::Blocker => &mut self.blocker,
        }
    }

}
