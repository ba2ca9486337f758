//! Draft session: one owner editing one team's roster for one week.
//!
//! Wires the roster state, drag controller, validator, transfer diff and
//! window policy together behind the surface a UI consumes. Loads are
//! ticketed so results that arrive after a newer load, or after teardown,
//! are dropped instead of being applied to stale state.
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::auth::{AuthChannel, Subscription};
use crate::config::{AppConfig, RosterRules, TransferWindowConfig};
use crate::diff::{TransferSummary, compute_transfers};
use crate::drag::{DragController, DragEvent, apply_drop};
use crate::error::{LoadError, SubmitError, Violation};
use crate::roster::RosterState;
use crate::store::{Persistence, PlayerDirectory, SnapshotLoader};
use crate::types::{DraftRosterPlayer, Player, Snapshot, TeamId, WeekId};
use crate::validation;
use crate::window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    // fetch failed; a new load retries
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub snapshot: Option<Snapshot>,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { hydrated: bool },
    Unavailable,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    ConfirmRequired,
    Stay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardChoice {
    Discard,
    Stay,
}

#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub snapshot: Snapshot,
    pub transfers: TransferSummary,
}

pub struct DraftSession {
    team_id: TeamId,
    week_id: WeekId,
    rules: RosterRules,
    window: TransferWindowConfig,
    roster: RosterState,
    drag: DragController,
    snapshot: Option<Snapshot>,
    players: Vec<Player>,
    load_state: LoadState,
    generation: u64,
    torn_down: bool,
    auth: Option<Subscription>,
}

/// Fetches everything a session needs. A missing snapshot is a normal
/// outcome; only collaborator failures map to `DataUnavailable`.
pub fn fetch_roster_data<L, D>(
    loader: &L,
    directory: &D,
    team_id: &TeamId,
    week_id: WeekId,
) -> Result<LoadedData, LoadError>
where
    L: SnapshotLoader + ?Sized,
    D: PlayerDirectory + ?Sized,
{
    let snapshot = loader
        .fetch_snapshot(team_id, week_id)
        .map_err(LoadError::DataUnavailable)?;
    let players = directory
        .fetch_players(team_id)
        .map_err(LoadError::DataUnavailable)?;

    Ok(LoadedData { snapshot, players })
}

impl DraftSession {
    pub fn new(
        team_id: TeamId,
        week_id: WeekId,
        rules: RosterRules,
        window: TransferWindowConfig,
    ) -> Self {
        Self {
            team_id,
            week_id,
            rules,
            window,
            roster: RosterState::new(),
            drag: DragController::new(),
            snapshot: None,
            players: Vec::new(),
            load_state: LoadState::Pending,
            generation: 0,
            torn_down: false,
            auth: None,
        }
    }

    pub fn from_config(team_id: TeamId, week_id: WeekId, config: &AppConfig) -> Self {
        Self::new(
            team_id,
            week_id,
            config.roster.clone(),
            config.transfer_window.clone(),
        )
    }

    // LOADING

    /// Starts a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if self.load_state != LoadState::Ready {
            self.load_state = LoadState::Pending;
        }
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedData, LoadError>,
    ) -> LoadOutcome {
        if self.torn_down || ticket.generation != self.generation {
            info!(
                "discarding stale load for team {} week {}",
                self.team_id, self.week_id
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(data) => {
                let hydrated = self.roster.initialize(
                    data.snapshot.as_ref(),
                    self.week_id,
                    self.team_id.clone(),
                );
                self.snapshot = data.snapshot;
                self.players = data.players;
                self.load_state = LoadState::Ready;
                LoadOutcome::Applied { hydrated }
            }
            Err(err) => {
                warn!("roster load for team {} failed: {}", self.team_id, err);
                self.load_state = LoadState::Unavailable {
                    reason: err.to_string(),
                };
                LoadOutcome::Unavailable
            }
        }
    }

    pub fn load<L, D>(&mut self, loader: &L, directory: &D) -> LoadOutcome
    where
        L: SnapshotLoader + ?Sized,
        D: PlayerDirectory + ?Sized,
    {
        let ticket = self.begin_load();
        let result = fetch_roster_data(loader, directory, &self.team_id, self.week_id);
        self.apply_load(ticket, result)
    }

    /// Ends the session: outstanding loads are discarded and the auth
    /// subscription is released.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation += 1;
        self.drag.drag_cancel();
        self.auth = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // AUTH

    pub fn attach_auth(&mut self, channel: &AuthChannel) {
        let consumer = format!("draft/{}/{}", self.team_id, self.week_id);
        self.auth = Some(channel.subscribe(&consumer));
    }

    pub fn acting_user(&mut self) -> Option<String> {
        self.auth
            .as_mut()
            .and_then(|sub| sub.latest_user().map(str::to_owned))
    }

    // EDITING

    /// Replaces the draft. Returns `false` while the first load is pending.
    pub fn mutate(&mut self, next: Vec<DraftRosterPlayer>) -> bool {
        self.roster.mutate(next)
    }

    /// Feeds one drag event through the controller. Returns whether the
    /// draft changed; drops before the first load change nothing.
    pub fn handle_drag(&mut self, event: DragEvent) -> bool {
        let Some(action) = self.drag.handle(event) else {
            return false;
        };
        match apply_drop(self.roster.draft(), &action.payload, action.target) {
            Some(next) => self.roster.mutate(next),
            None => false,
        }
    }

    // VIEW

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn week_id(&self) -> WeekId {
        self.week_id
    }

    pub fn draft_roster(&self) -> &[DraftRosterPlayer] {
        self.roster.draft()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.roster.has_unsaved_changes()
    }

    pub fn violations(&self) -> Vec<Violation> {
        validation::violations(self.roster.draft(), &self.rules, self.players.as_slice())
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.drag.active_player()
    }

    pub fn active_slot_player(&self) -> Option<&DraftRosterPlayer> {
        self.drag.active_slot_player()
    }

    pub fn pending_transfers(&self) -> TransferSummary {
        compute_transfers(self.snapshot.as_ref(), self.roster.draft())
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    // NAVIGATION GUARD

    pub fn request_navigation(&self) -> NavigationDecision {
        if self.roster.has_unsaved_changes() {
            NavigationDecision::ConfirmRequired
        } else {
            NavigationDecision::Proceed
        }
    }

    pub fn resolve_navigation(&mut self, choice: GuardChoice) -> NavigationDecision {
        match choice {
            GuardChoice::Discard => {
                self.roster.discard_changes();
                NavigationDecision::Proceed
            }
            GuardChoice::Stay => NavigationDecision::Stay,
        }
    }

    // SUBMIT

    /// Submits as the user reported by the attached auth subscription.
    pub fn submit<P>(
        &mut self,
        persistence: &P,
        now: DateTime<Utc>,
    ) -> Result<SubmitReceipt, SubmitError>
    where
        P: Persistence + ?Sized,
    {
        let user = self.acting_user();
        self.submit_as(persistence, now, user.as_deref())
    }

    /// Checks the window, validates and commits the draft.
    ///
    /// On any error the draft and its dirty flag are left exactly as they
    /// were. On success the draft re-hydrates from the new snapshot.
    pub fn submit_as<P>(
        &mut self,
        persistence: &P,
        now: DateTime<Utc>,
        acting_user: Option<&str>,
    ) -> Result<SubmitReceipt, SubmitError>
    where
        P: Persistence + ?Sized,
    {
        if !self.roster.is_hydrated() {
            return Err(SubmitError::NotHydrated);
        }

        let transfers = self.pending_transfers();

        if !window::is_transfer_permitted(now, &self.window, acting_user) {
            warn!(
                "submit for team {} rejected, transfer window closed",
                self.team_id
            );
            return Err(SubmitError::TransferWindowClosed {
                opens_at: self.window.opens_at,
                closes_at: self.window.closes_at,
            });
        }

        validation::validate(self.roster.draft(), &self.rules, self.players.as_slice())?;

        if let Some(allowed) = self.rules.free_transfers {
            if transfers.transfers_used > allowed {
                return Err(SubmitError::TransferLimitExceeded {
                    used: transfers.transfers_used,
                    allowed,
                });
            }
        }

        let snapshot = persistence
            .save_roster(&self.team_id, self.week_id, self.roster.draft())
            .map_err(|err| {
                warn!("saving roster for team {} failed: {}", self.team_id, err);
                SubmitError::Persistence(err)
            })?;

        info!(
            "team {} week {} saved snapshot {} using {} transfer(s)",
            self.team_id, self.week_id, snapshot.id, transfers.transfers_used
        );

        self.roster
            .initialize(Some(&snapshot), self.week_id, self.team_id.clone());
        self.snapshot = Some(snapshot.clone());

        Ok(SubmitReceipt {
            snapshot,
            transfers,
        })
    }
}
