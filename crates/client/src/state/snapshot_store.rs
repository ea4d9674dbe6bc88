//! Latest server snapshot and last known game status.

use skirmish_domain::GameStatus;
use skirmish_shared::GameSnapshot;

/// Holds the most recent snapshot; replaced wholesale on every poll.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<GameSnapshot>,
    last_status: GameStatus,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, snapshot: GameSnapshot) {
        self.last_status = snapshot.status;
        self.current = Some(snapshot);
    }

    pub fn current(&self) -> Option<&GameSnapshot> {
        self.current.as_ref()
    }

    pub fn last_status(&self) -> GameStatus {
        self.last_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_updates_status() {
        let mut store = SnapshotStore::new();
        assert_eq!(store.last_status(), GameStatus::Unknown);
        store.replace(GameSnapshot {
            status: GameStatus::InProgress,
            ..Default::default()
        });
        assert_eq!(store.last_status(), GameStatus::InProgress);
        assert!(store.current().is_some());
    }
}
