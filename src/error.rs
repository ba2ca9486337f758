use chrono::{DateTime, Utc};

use crate::types::{Money, PlayerId, Position};

/// A named reason a candidate roster fails validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("player {player_id} appears more than once")]
    DuplicatePlayer { player_id: PlayerId },
    #[error("{count} starters at {position}, capacity is {capacity}")]
    SlotOverflow {
        position: Position,
        count: usize,
        capacity: usize,
    },
    #[error("{count} players on the bench, capacity is {capacity}")]
    BenchOverflow { count: usize, capacity: usize },
    #[error("roster has no captain in the starting lineup")]
    MissingCaptain,
    #[error("roster has {count} captains")]
    MultipleCaptains { count: usize },
    #[error("captain {player_id} is on the bench")]
    CaptainBenched { player_id: PlayerId },
    #[error("squad value {total} exceeds budget {budget}")]
    BudgetExceeded { total: Money, budget: Money },
    #[error("no current value known for player {player_id}")]
    UnknownPlayer { player_id: PlayerId },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("roster failed validation with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transfer window is closed (open {opens_at} until {closes_at})")]
    TransferWindowClosed {
        opens_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    },
    #[error("save would use {used} transfers, only {allowed} allowed")]
    TransferLimitExceeded { used: usize, allowed: usize },
    #[error("roster has not been loaded yet")]
    NotHydrated,
    #[error("failed to save roster: {0}")]
    Persistence(#[source] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("roster data unavailable: {0}")]
    DataUnavailable(#[source] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),
    #[error("failed to encode record: {0}")]
    Encode(String),
    #[error("failed to decode record: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("snapshot {0} is referenced but missing")]
    MissingSnapshot(String),
    #[error("roster entries {0} are referenced but missing")]
    MissingEntries(String),
}
