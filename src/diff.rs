//! Transfers a save would consume, relative to the last committed snapshot
use std::collections::HashSet;

use crate::types::{DraftRosterPlayer, PlayerId, Snapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub players_in: Vec<PlayerId>,  // draft order
    pub players_out: Vec<PlayerId>, // snapshot order
    pub transfers_used: usize,
}

impl TransferSummary {
    pub fn is_empty(&self) -> bool {
        self.players_in.is_empty() && self.players_out.is_empty()
    }
}

/// One-for-one swap model: `transfers_used = max(|in|, |out|)`.
///
/// Without a prior snapshot every drafted player comes in, nothing goes out,
/// and the initial draft is free.
pub fn compute_transfers(
    snapshot: Option<&Snapshot>,
    draft: &[DraftRosterPlayer],
) -> TransferSummary {
    let Some(snapshot) = snapshot else {
        return TransferSummary {
            players_in: ordered_difference(draft, &HashSet::new()),
            players_out: Vec::new(),
            transfers_used: 0,
        };
    };

    let before: HashSet<&PlayerId> = snapshot.entries.iter().map(|e| &e.player_id).collect();
    let after: HashSet<&PlayerId> = draft.iter().map(|e| &e.player_id).collect();

    let players_in = ordered_difference(draft, &before);
    let players_out = ordered_difference(&snapshot.entries, &after);
    let transfers_used = players_in.len().max(players_out.len());

    TransferSummary {
        players_in,
        players_out,
        transfers_used,
    }
}

fn ordered_difference(
    entries: &[DraftRosterPlayer],
    exclude: &HashSet<&PlayerId>,
) -> Vec<PlayerId> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| &entry.player_id)
        .filter(|id| !exclude.contains(id) && seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, SnapshotId, TeamId, TimeStamp, WeekId};

    fn entries(ids: &[&str]) -> Vec<DraftRosterPlayer> {
        ids.iter()
            .map(|id| DraftRosterPlayer::starting((*id).into(), Position::Midfielder))
            .collect()
    }

    fn snapshot(ids: &[&str]) -> Snapshot {
        Snapshot {
            id: SnapshotId("snap".into()),
            team_id: TeamId::from("team"),
            week_id: WeekId(1),
            committed_at: TimeStamp::new(),
            entries: entries(ids),
            entries_hash: String::new(),
        }
    }

    #[test]
    fn one_swap_is_one_transfer() {
        let summary = compute_transfers(Some(&snapshot(&["A", "B", "C"])), &entries(&["A", "B", "D"]));

        assert_eq!(summary.players_in, vec![PlayerId::from("D")]);
        assert_eq!(summary.players_out, vec![PlayerId::from("C")]);
        assert_eq!(summary.transfers_used, 1);
    }

    #[test]
    fn initial_draft_uses_no_transfers() {
        let summary = compute_transfers(None, &entries(&["A", "B"]));

        assert_eq!(summary.players_in.len(), 2);
        assert!(summary.players_out.is_empty());
        assert_eq!(summary.transfers_used, 0);
    }

    #[test]
    fn uneven_swap_counts_larger_side() {
        let summary = compute_transfers(Some(&snapshot(&["A"])), &entries(&["B", "C", "D"]));

        assert_eq!(summary.players_in.len(), 3);
        assert_eq!(summary.players_out.len(), 1);
        assert_eq!(summary.transfers_used, 3);
    }

    #[test]
    fn flag_changes_are_free() {
        let snap = snapshot(&["A", "B"]);
        let draft = vec![
            DraftRosterPlayer::benched("A".into(), Position::Forward),
            DraftRosterPlayer::starting("B".into(), Position::Defender).captain(),
        ];

        let summary = compute_transfers(Some(&snap), &draft);
        assert!(summary.is_empty());
        assert_eq!(summary.transfers_used, 0);
    }
}
