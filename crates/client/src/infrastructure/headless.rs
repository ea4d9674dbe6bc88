//! Headless port adapters.
//!
//! Recording implementations of the rendering-side ports, used by the
//! headless runner binary and throughout the test suite. They keep the last
//! pushed state behind a mutex so tests can assert on what the coordination
//! engine asked the (absent) renderer to do.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use skirmish_domain::{SelectionTarget, SlotKey};

use crate::ports::outbound::{
    BoardPort, DialogAutomationState, DialogPort, DialogRequest, Dialogs, SlotView, TurnTimerPort,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Dialog
// =============================================================================

#[derive(Default)]
struct DialogState {
    open: bool,
    request: Option<DialogRequest>,
}

#[derive(Default)]
pub struct HeadlessDialog {
    state: Mutex<DialogState>,
    shows: AtomicUsize,
    hides: AtomicUsize,
}

impl HeadlessDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `show` calls so far
    pub fn show_count(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }

    pub fn hide_count(&self) -> usize {
        self.hides.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<DialogRequest> {
        lock(&self.state).request.clone()
    }
}

impl DialogPort for HeadlessDialog {
    fn show(&self, request: DialogRequest) {
        let mut state = lock(&self.state);
        state.open = true;
        state.request = Some(request);
        self.shows.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        let mut state = lock(&self.state);
        if state.open {
            self.hides.fetch_add(1, Ordering::SeqCst);
        }
        state.open = false;
    }

    fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    fn automation_state(&self) -> DialogAutomationState {
        let state = lock(&self.state);
        DialogAutomationState {
            open: state.open,
            title: state
                .request
                .as_ref()
                .map(|request| request.title.clone())
                .unwrap_or_default(),
            options: state
                .request
                .as_ref()
                .map(|request| request.options.clone())
                .unwrap_or_default(),
        }
    }
}

/// A complete headless dialog set
pub fn headless_dialogs() -> Dialogs {
    Dialogs {
        prompt: Arc::new(HeadlessDialog::new()),
        option: Arc::new(HeadlessDialog::new()),
        token: Arc::new(HeadlessDialog::new()),
        burst: Arc::new(HeadlessDialog::new()),
        burst_group: Arc::new(HeadlessDialog::new()),
        burst_group_item: Arc::new(HeadlessDialog::new()),
        blocker: Arc::new(HeadlessDialog::new()),
        error: Arc::new(HeadlessDialog::new()),
        slot_replacement: Arc::new(HeadlessDialog::new()),
    }
}

// =============================================================================
// Board
// =============================================================================

#[derive(Default)]
struct BoardState {
    slots: Vec<SlotView>,
    selected: Option<SelectionTarget>,
    attack_targets: Vec<SlotKey>,
    click_enabled: bool,
}

#[derive(Default)]
pub struct HeadlessBoard {
    state: Mutex<BoardState>,
}

impl HeadlessBoard {
    pub fn new() -> Self {
        let board = Self::default();
        lock(&board.state).click_enabled = true;
        board
    }

    /// Seed the rendered slot list (normally done by the rendering layer)
    pub fn set_slots(&self, slots: Vec<SlotView>) {
        lock(&self.state).slots = slots;
    }

    pub fn selected(&self) -> Option<SelectionTarget> {
        lock(&self.state).selected.clone()
    }

    pub fn attack_targets(&self) -> Vec<SlotKey> {
        lock(&self.state).attack_targets.clone()
    }

    pub fn click_enabled(&self) -> bool {
        lock(&self.state).click_enabled
    }
}

impl BoardPort for HeadlessBoard {
    fn visible_slots(&self) -> Vec<SlotView> {
        lock(&self.state).slots.clone()
    }

    fn set_selected(&self, selection: Option<SelectionTarget>) {
        lock(&self.state).selected = selection;
    }

    fn set_slot_click_enabled(&self, enabled: bool) {
        lock(&self.state).click_enabled = enabled;
    }

    fn show_attack_targets(&self, targets: Vec<SlotKey>) {
        lock(&self.state).attack_targets = targets;
    }

    fn clear_attack_targets(&self) {
        lock(&self.state).attack_targets.clear();
    }
}

// =============================================================================
// Turn timer
// =============================================================================

#[derive(Default)]
pub struct HeadlessTimer {
    paused: AtomicBool,
}

impl HeadlessTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl TurnTimerPort for HeadlessTimer {
    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}
