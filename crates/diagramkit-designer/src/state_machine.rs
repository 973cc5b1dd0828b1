//! Interaction state machine.
//!
//! Holds the single active [`InteractionState`] and accepts only the
//! transitions in its adjacency table. Rejected transitions are logged and
//! leave the state unchanged, so a faulty tool can never wedge the editor
//! in an unreachable mode.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use diagramkit_core::constants::DEFAULT_STATE_HISTORY;
use diagramkit_core::{EditorError, EditorEvent, EventBus, InteractionState, Result};

/// One accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub sequence: u64,
    pub from: InteractionState,
    pub to: InteractionState,
}

/// True when `from -> to` is in the adjacency table.
///
/// Idle reaches every active state and every active state returns to Idle.
/// The only direct edge between active states is source-to-target while
/// placing a connector.
pub fn is_legal(from: InteractionState, to: InteractionState) -> bool {
    use InteractionState::*;
    match (from, to) {
        (Idle, Idle) => false,
        (Idle, _) | (_, Idle) => true,
        (PlacingConnectionSource, PlacingConnectionTarget) => true,
        _ => false,
    }
}

pub struct InteractionStateMachine {
    state: InteractionState,
    history: VecDeque<TransitionRecord>,
    capacity: usize,
    sequence: u64,
    event_bus: Option<Arc<EventBus>>,
}

impl Default for InteractionStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_HISTORY)
    }
}

impl std::fmt::Debug for InteractionStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionStateMachine")
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl InteractionStateMachine {
    /// Creates a machine in Idle that remembers the last `capacity`
    /// transitions.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: InteractionState::Idle,
            history: VecDeque::with_capacity(capacity.min(256)),
            capacity,
            sequence: 0,
            event_bus: None,
        }
    }

    /// Publishes `StateChanged` on `bus` for every accepted transition.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    pub fn can_transition(&self, to: InteractionState) -> bool {
        is_legal(self.state, to)
    }

    /// Moves to `to` if the edge is legal.
    pub fn transition(&mut self, to: InteractionState) -> Result<()> {
        if !is_legal(self.state, to) {
            tracing::warn!(
                "Rejected state transition {} -> {}",
                self.state.as_str(),
                to.as_str()
            );
            return Err(EditorError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.apply(to);
        Ok(())
    }

    /// Forces Idle from any state. A no-op when already idle.
    pub fn reset(&mut self) {
        if !self.state.is_idle() {
            tracing::debug!("State machine reset from {}", self.state.as_str());
            self.apply(InteractionState::Idle);
        }
    }

    /// Accepted transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.history.back()
    }

    /// Targets reachable from `from` in one step.
    pub fn legal_targets(from: InteractionState) -> Vec<InteractionState> {
        InteractionState::ALL
            .into_iter()
            .filter(|to| is_legal(from, *to))
            .collect()
    }

    fn apply(&mut self, to: InteractionState) {
        let from = self.state;
        self.state = to;
        self.sequence += 1;
        if self.capacity > 0 {
            if self.history.len() == self.capacity {
                self.history.pop_front();
            }
            self.history.push_back(TransitionRecord {
                sequence: self.sequence,
                from,
                to,
            });
        }
        tracing::trace!("State {} -> {}", from.as_str(), to.as_str());
        if let Some(bus) = &self.event_bus {
            bus.publish(EditorEvent::StateChanged { from, to });
        }
    }
}
