//! Roster state manager: the editable draft and its dirty flag
use log::{debug, info, warn};

use crate::types::{DraftRosterPlayer, PlayerId, Snapshot, SnapshotId, TeamId, WeekId};

/// Identity of the data a draft was hydrated from. Compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HydrationKey {
    pub snapshot_id: Option<SnapshotId>, // None for a team with no committed roster
    pub week_id: WeekId,
    pub team_id: TeamId,
}

#[derive(Debug, Default)]
pub struct RosterState {
    draft: Vec<DraftRosterPlayer>,
    baseline: Vec<DraftRosterPlayer>,
    dirty: bool,
    key: Option<HydrationKey>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates the draft from `snapshot`, or to empty when there is none.
    ///
    /// Does nothing when `(snapshot id, week, team)` matches the last hydration,
    /// so repeated upstream notifications never clobber edits in progress.
    /// Returns whether the draft was replaced.
    pub fn initialize(
        &mut self,
        snapshot: Option<&Snapshot>,
        week_id: WeekId,
        team_id: TeamId,
    ) -> bool {
        let key = HydrationKey {
            snapshot_id: snapshot.map(|s| s.id.clone()),
            week_id,
            team_id,
        };
        if self.key.as_ref() == Some(&key) {
            debug!("hydration skipped, identity unchanged for team {}", key.team_id);
            return false;
        }

        let entries = snapshot.map(|s| s.entries.clone()).unwrap_or_default();
        info!(
            "hydrating draft for team {} week {} from {} ({} players)",
            key.team_id,
            key.week_id,
            key.snapshot_id
                .as_ref()
                .map_or_else(|| "empty roster".to_string(), |id| id.to_string()),
            entries.len()
        );

        self.baseline = entries.clone();
        self.draft = entries;
        self.dirty = false;
        self.key = Some(key);
        true
    }

    /// Replaces the draft. Any explicit edit marks it dirty, even a no-op one.
    ///
    /// Refused until the first hydration, which would otherwise overwrite the
    /// edit. Returns whether the draft was replaced.
    pub fn mutate(&mut self, next: Vec<DraftRosterPlayer>) -> bool {
        if !self.is_hydrated() {
            warn!("edit refused, roster not loaded yet");
            return false;
        }
        self.draft = next;
        self.dirty = true;
        true
    }

    pub fn draft(&self) -> &[DraftRosterPlayer] {
        &self.draft
    }

    pub fn baseline(&self) -> &[DraftRosterPlayer] {
        &self.baseline
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn differs_from_baseline(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn is_hydrated(&self) -> bool {
        self.key.is_some()
    }

    pub fn key(&self) -> Option<&HydrationKey> {
        self.key.as_ref()
    }

    /// Throws away edits and returns to the hydrated roster.
    pub fn discard_changes(&mut self) {
        self.draft = self.baseline.clone();
        self.dirty = false;
    }
}

/// Gives the captaincy to `player_id`, clearing it everywhere else.
/// Returns `None` when the player is not on the roster.
pub fn with_captain(
    roster: &[DraftRosterPlayer],
    player_id: &PlayerId,
) -> Option<Vec<DraftRosterPlayer>> {
    if !roster.iter().any(|entry| &entry.player_id == player_id) {
        return None;
    }
    let next = roster
        .iter()
        .cloned()
        .map(|mut entry| {
            entry.is_captain = &entry.player_id == player_id;
            entry
        })
        .collect();
    Some(next)
}

pub fn without_player(roster: &[DraftRosterPlayer], player_id: &PlayerId) -> Vec<DraftRosterPlayer> {
    roster
        .iter()
        .filter(|entry| &entry.player_id != player_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, TimeStamp};

    fn snapshot(id: &str, entries: Vec<DraftRosterPlayer>) -> Snapshot {
        Snapshot {
            id: SnapshotId(id.to_string()),
            team_id: TeamId::from("team"),
            week_id: WeekId(1),
            committed_at: TimeStamp::new(),
            entries,
            entries_hash: String::new(),
        }
    }

    #[test]
    fn no_snapshot_hydrates_empty_and_clean() {
        let mut state = RosterState::new();
        assert!(!state.is_hydrated());

        assert!(state.initialize(None, WeekId(1), TeamId::from("team")));
        assert!(state.draft().is_empty());
        assert!(!state.has_unsaved_changes());
        assert!(state.is_hydrated());
    }

    #[test]
    fn mutate_before_hydration_is_refused() {
        let mut state = RosterState::new();

        assert!(!state.mutate(vec![DraftRosterPlayer::starting("x".into(), Position::Forward)]));
        assert!(state.draft().is_empty());
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn mutate_replaces_draft_and_marks_dirty() {
        let mut state = RosterState::new();
        state.initialize(None, WeekId(1), TeamId::from("team"));

        let next = vec![DraftRosterPlayer::starting("x".into(), Position::Forward)];
        state.mutate(next.clone());

        assert_eq!(state.draft(), next.as_slice());
        assert!(state.has_unsaved_changes());
    }

    #[test]
    fn mutate_with_same_roster_still_marks_dirty() {
        let entries = vec![DraftRosterPlayer::starting("x".into(), Position::Forward).captain()];
        let mut state = RosterState::new();
        state.initialize(Some(&snapshot("s1", entries.clone())), WeekId(1), "team".into());

        state.mutate(entries);

        assert!(state.has_unsaved_changes());
        assert!(!state.differs_from_baseline());
    }

    #[test]
    fn unchanged_identity_keeps_dirty_draft() {
        let snap = snapshot("s1", vec![]);
        let mut state = RosterState::new();
        state.initialize(Some(&snap), WeekId(1), "team".into());
        state.mutate(vec![DraftRosterPlayer::starting("x".into(), Position::Forward)]);

        assert!(!state.initialize(Some(&snap), WeekId(1), "team".into()));
        assert!(!state.initialize(Some(&snap), WeekId(1), "team".into()));

        assert!(state.has_unsaved_changes());
        assert_eq!(state.draft().len(), 1);
    }

    #[test]
    fn changed_identity_rehydrates() {
        let mut state = RosterState::new();
        state.initialize(None, WeekId(1), "team".into());
        state.mutate(vec![DraftRosterPlayer::starting("x".into(), Position::Forward)]);

        assert!(state.initialize(None, WeekId(2), "team".into()));
        assert!(state.draft().is_empty());
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn identity_fields_do_not_collide() {
        // "ab" + "c" and "a" + "bc" would collide under string concatenation
        let mut state = RosterState::new();
        state.initialize(Some(&snapshot("ab", vec![])), WeekId(1), "c".into());

        assert!(state.initialize(Some(&snapshot("a", vec![])), WeekId(1), "bc".into()));
    }

    #[test]
    fn discard_restores_baseline() {
        let entries = vec![DraftRosterPlayer::starting("x".into(), Position::Forward).captain()];
        let mut state = RosterState::new();
        state.initialize(Some(&snapshot("s1", entries.clone())), WeekId(1), "team".into());
        state.mutate(vec![]);

        state.discard_changes();

        assert_eq!(state.draft(), entries.as_slice());
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn captaincy_moves_to_one_player() {
        let roster = vec![
            DraftRosterPlayer::starting("a".into(), Position::Forward).captain(),
            DraftRosterPlayer::starting("b".into(), Position::Defender),
        ];

        let next = with_captain(&roster, &"b".into()).unwrap();
        assert!(!next[0].is_captain);
        assert!(next[1].is_captain);

        assert!(with_captain(&roster, &"zz".into()).is_none());
    }

    #[test]
    fn removes_player() {
        let roster = vec![
            DraftRosterPlayer::starting("a".into(), Position::Forward),
            DraftRosterPlayer::starting("b".into(), Position::Defender),
        ];

        let next = without_player(&roster, &"a".into());
        assert_eq!(next, vec![roster[1].clone()]);
    }
}
