//! Folding an ordered message stream into a deduplicated state sequence.
//!
//! Messages must be consumed strictly in wire order, one at a time: the
//! eliminations depend on the exact temporal order of plays.

use crate::engine::{StateError, next};
use crate::state::GameState;
use belote_protocol::messages::game::GameMessage;

/// Incrementally tracks the table state of one session.
#[derive(Debug, Clone)]
pub struct StateTracker {
    state: GameState,
}

impl StateTracker {
    pub fn new(self_player_id: impl Into<String>) -> Self {
        Self {
            state: GameState::new(self_player_id),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Feeds one message; returns the new state only when it changed.
    pub fn advance(&mut self, message: &GameMessage) -> Result<Option<&GameState>, StateError> {
        let updated = next(&self.state, message)?;
        if updated == self.state {
            return Ok(None);
        }
        self.state = updated;
        Ok(Some(&self.state))
    }
}

/// Folds a bounded message sequence into the distinct states it traverses.
pub fn states<'a>(
    self_player_id: &str,
    messages: impl IntoIterator<Item = &'a GameMessage>,
) -> Result<Vec<GameState>, StateError> {
    let mut tracker = StateTracker::new(self_player_id);
    let mut out = Vec::new();
    for message in messages {
        if let Some(state) = tracker.advance(message)? {
            out.push(state.clone());
        }
    }
    Ok(out)
}
