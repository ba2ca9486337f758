//! Drag interaction controller and drop handler.
//!
//! The controller only tracks which player is in flight so the UI can render
//! feedback. It never touches the roster; the drop handler turns a finished
//! gesture into the next roster, which the caller hands to
//! [`RosterState::mutate`](crate::roster::RosterState::mutate).
use log::{debug, warn};

use crate::types::{DraftRosterPlayer, Player, Position};

/// What is being dragged. Lives for exactly one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// A player from the pool, not yet placed.
    PoolPlayer(Player),
    /// A player already on the roster, with the entry it was dragged from.
    SlotPlayer {
        player: Player,
        slot: DraftRosterPlayer,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Slot(Position),
    Bench,
    Pool,
}

/// Typed events raised by the external drag-and-drop capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start(DragPayload),
    Over(Option<DropTarget>),
    End(Option<DropTarget>),
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragPayload),
}

/// A completed gesture with somewhere to land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAction {
    pub payload: DragPayload,
    pub target: DropTarget,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragPayload {
    pub fn player(&self) -> &Player {
        match self {
            DragPayload::PoolPlayer(player) => player,
            DragPayload::SlotPlayer { player, .. } => player,
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active_player(&self) -> Option<&Player> {
        match &self.state {
            DragState::Dragging(payload) => Some(payload.player()),
            DragState::Idle => None,
        }
    }

    /// Only set when the gesture started from a placed roster entry.
    pub fn active_slot_player(&self) -> Option<&DraftRosterPlayer> {
        match &self.state {
            DragState::Dragging(DragPayload::SlotPlayer { slot, .. }) => Some(slot),
            _ => None,
        }
    }

    pub fn drag_start(&mut self, payload: DragPayload) {
        if let DragState::Dragging(stale) = &self.state {
            warn!(
                "drag started while {} was still in flight, dropping stale payload",
                stale.player().id
            );
        }
        debug!("drag start: {}", payload.player().id);
        self.state = DragState::Dragging(payload);
    }

    // Hover feedback is derived from the active player alone.
    pub fn drag_over(&mut self, _target: Option<DropTarget>) {}

    /// Ends the gesture and hands back whatever was in flight.
    pub fn drag_end(&mut self) -> Option<DragPayload> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(payload) => Some(payload),
            DragState::Idle => None,
        }
    }

    pub fn drag_cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Dispatches one event. Returns a [`DropAction`] only for an end event that
    /// landed on a target while a payload was in flight.
    pub fn handle(&mut self, event: DragEvent) -> Option<DropAction> {
        match event {
            DragEvent::Start(payload) => {
                self.drag_start(payload);
                None
            }
            DragEvent::Over(target) => {
                self.drag_over(target);
                None
            }
            DragEvent::End(target) => {
                let payload = self.drag_end()?;
                target.map(|target| DropAction { payload, target })
            }
            DragEvent::Cancel => {
                self.drag_cancel();
                None
            }
        }
    }
}

/// Computes the roster after `payload` lands on `target`.
///
/// Returns `None` when the drop changes nothing. Capacity and captaincy are
/// not checked here; the validator reports them on the resulting roster.
pub fn apply_drop(
    roster: &[DraftRosterPlayer],
    payload: &DragPayload,
    target: DropTarget,
) -> Option<Vec<DraftRosterPlayer>> {
    let player = payload.player();
    let existing = roster.iter().position(|entry| entry.player_id == player.id);

    match (target, existing) {
        (DropTarget::Pool, None) => None,
        (DropTarget::Pool, Some(index)) => {
            let mut next = roster.to_vec();
            next.remove(index);
            Some(next)
        }
        (DropTarget::Slot(position), None) => {
            let mut next = roster.to_vec();
            next.push(DraftRosterPlayer::starting(player.id.clone(), position));
            Some(next)
        }
        (DropTarget::Bench, None) => {
            let mut next = roster.to_vec();
            next.push(DraftRosterPlayer::benched(player.id.clone(), player.position));
            Some(next)
        }
        (DropTarget::Slot(position), Some(index)) => {
            let current = &roster[index];
            if current.slot == position && !current.is_benched {
                return None;
            }
            let mut next = roster.to_vec();
            next[index].slot = position;
            next[index].is_benched = false;
            Some(next)
        }
        (DropTarget::Bench, Some(index)) => {
            if roster[index].is_benched {
                return None;
            }
            let mut next = roster.to_vec();
            next[index].is_benched = true;
            Some(next)
        }
    }
}
