//! The single "currently selected" UI target.
//!
//! Exactly one or none may be selected at a time. The selection handler is
//! the only writer; flow managers request clearing through it rather than
//! mutating this store directly.

use skirmish_domain::SelectionTarget;

#[derive(Debug, Default)]
pub struct SelectionStore {
    current: Option<SelectionTarget>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, target: SelectionTarget) {
        self.current = Some(target);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<&SelectionTarget> {
        self.current.as_ref()
    }
}
