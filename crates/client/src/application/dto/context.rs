//! The current game session context.

use skirmish_domain::{GameId, PlayerId};

/// Identifies the session every outbound payload is stamped with.
///
/// Payload builders never embed these ids themselves; the executor and the
/// submission path read them from the context immediately before sending, so
/// a payload captured before a context change cannot leak stale identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub game_id: GameId,
    pub player_id: PlayerId,
}

impl GameContext {
    pub fn new(game_id: impl Into<GameId>, player_id: impl Into<PlayerId>) -> Self {
        Self {
            game_id: game_id.into(),
            player_id: player_id.into(),
        }
    }
}
