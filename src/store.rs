//! Collaborator traits for loading and committing rosters, plus a sled backed store
use super::error::StoreError;
use super::types::{DraftRosterPlayer, Player, Snapshot, SnapshotId, TeamId, TimeStamp, WeekId};
use super::utils;
use chrono::Utc;
use log::info;
use sled::Batch;
use std::sync::Arc;

pub trait SnapshotLoader {
    /// `Ok(None)` means the team has never saved a roster for this week.
    fn fetch_snapshot(&self, team_id: &TeamId, week_id: WeekId)
    -> anyhow::Result<Option<Snapshot>>;
}

pub trait PlayerDirectory {
    fn fetch_players(&self, team_id: &TeamId) -> anyhow::Result<Vec<Player>>;
}

pub trait Persistence {
    fn save_roster(
        &self,
        team_id: &TeamId,
        week_id: WeekId,
        draft: &[DraftRosterPlayer],
    ) -> anyhow::Result<Snapshot>;
}

// Snapshot header as stored. Entries live under their content hash.
#[derive(minicbor::Encode, minicbor::Decode, Debug)]
struct SnapshotRecord {
    #[n(0)]
    id: SnapshotId,
    #[n(1)]
    team_id: TeamId,
    #[n(2)]
    week_id: WeekId,
    #[n(3)]
    committed_at: TimeStamp<Utc>,
    #[n(4)]
    entries_hash: String,
}

pub struct SledStore {
    instance: Arc<sled::Db>,
}

impl SledStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(sled::open(path)?)))
    }

    /// Replaces the player directory for a team.
    pub fn seed_players(&self, team_id: &TeamId, players: &[Player]) -> Result<(), StoreError> {
        let cbor = minicbor::to_vec(players).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.instance.insert(players_key(team_id), cbor)?;
        Ok(())
    }

    fn load_snapshot(&self, id: &str) -> Result<Snapshot, StoreError> {
        let raw = self
            .instance
            .get(snapshot_key(id))?
            .ok_or_else(|| StoreError::MissingSnapshot(id.to_string()))?;
        let record: SnapshotRecord = minicbor::decode(&raw)?;

        let raw_entries = self
            .instance
            .get(entries_key(&record.entries_hash))?
            .ok_or_else(|| StoreError::MissingEntries(record.entries_hash.clone()))?;
        let entries: Vec<DraftRosterPlayer> = minicbor::decode(&raw_entries)?;

        Ok(Snapshot {
            id: record.id,
            team_id: record.team_id,
            week_id: record.week_id,
            committed_at: record.committed_at,
            entries,
            entries_hash: record.entries_hash,
        })
    }
}

impl SnapshotLoader for SledStore {
    fn fetch_snapshot(
        &self,
        team_id: &TeamId,
        week_id: WeekId,
    ) -> anyhow::Result<Option<Snapshot>> {
        let Some(latest) = self.instance.get(latest_key(team_id, week_id))? else {
            return Ok(None);
        };
        let id = String::from_utf8(latest.to_vec())?;
        Ok(Some(self.load_snapshot(&id)?))
    }
}

impl PlayerDirectory for SledStore {
    fn fetch_players(&self, team_id: &TeamId) -> anyhow::Result<Vec<Player>> {
        match self.instance.get(players_key(team_id))? {
            Some(raw) => Ok(minicbor::decode(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

impl Persistence for SledStore {
    /// Commits the draft as a new snapshot and points the (team, week) at it.
    fn save_roster(
        &self,
        team_id: &TeamId,
        week_id: WeekId,
        draft: &[DraftRosterPlayer],
    ) -> anyhow::Result<Snapshot> {
        let (entries_hash, entries_cbor) = utils::hash_entries(draft)?;

        let record = SnapshotRecord {
            id: utils::new_snapshot_id()?,
            team_id: team_id.clone(),
            week_id,
            committed_at: TimeStamp::new(),
            entries_hash,
        };
        let record_cbor =
            minicbor::to_vec(&record).map_err(|e| StoreError::Encode(e.to_string()))?;

        // Batch insert: entries, snapshot header and the latest pointer
        let mut batch = Batch::default();
        batch.insert(entries_key(&record.entries_hash), entries_cbor);
        batch.insert(snapshot_key(&record.id.0), record_cbor);
        batch.insert(latest_key(team_id, week_id), record.id.0.as_bytes());
        self.instance.apply_batch(batch)?;

        info!(
            "committed snapshot {} for team {} week {} ({} players)",
            record.id,
            team_id,
            week_id,
            draft.len()
        );

        Ok(Snapshot {
            id: record.id,
            team_id: record.team_id,
            week_id: record.week_id,
            committed_at: record.committed_at,
            entries: draft.to_vec(),
            entries_hash: record.entries_hash,
        })
    }
}

fn players_key(team_id: &TeamId) -> Vec<u8> {
    format!("players/{}", team_id).into_bytes()
}

fn snapshot_key(id: &str) -> Vec<u8> {
    format!("snapshot/{}", id).into_bytes()
}

fn entries_key(hash: &str) -> Vec<u8> {
    format!("entries/{}", hash).into_bytes()
}

fn latest_key(team_id: &TeamId, week_id: WeekId) -> Vec<u8> {
    format!("latest/{}/{}", team_id, week_id).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, SledStore) {
        let temp_dir = tempdir().unwrap();
        let db = sled::open(temp_dir.path().join("store.db")).unwrap();
        (temp_dir, SledStore::new(Arc::new(db)))
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let (_dir, store) = store();
        let found = store.fetch_snapshot(&"team".into(), WeekId(1)).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn saved_roster_is_loaded_back() {
        let (_dir, store) = store();
        let team = TeamId::from("team");
        let draft = vec![
            DraftRosterPlayer::starting("a".into(), Position::Forward).captain(),
            DraftRosterPlayer::benched("b".into(), Position::Defender),
        ];

        let saved = store.save_roster(&team, WeekId(4), &draft).unwrap();
        let loaded = store.fetch_snapshot(&team, WeekId(4)).unwrap().unwrap();

        assert_eq!(saved, loaded);
        assert_eq!(loaded.entries, draft);
        assert!(store.fetch_snapshot(&team, WeekId(5)).unwrap().is_none());
    }

    #[test]
    fn each_save_creates_a_new_snapshot() {
        let (_dir, store) = store();
        let team = TeamId::from("team");
        let draft = vec![DraftRosterPlayer::starting("a".into(), Position::Forward).captain()];

        let first = store.save_roster(&team, WeekId(1), &draft).unwrap();
        let second = store.save_roster(&team, WeekId(1), &draft).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.entries_hash, second.entries_hash);
        let latest = store.fetch_snapshot(&team, WeekId(1)).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[test]
    fn seeded_players_are_returned() {
        let (_dir, store) = store();
        let team = TeamId::from("team");
        let players = vec![
            Player::new("a", "Ada", Position::Forward, &team).set_starting_value(10),
            Player::new("b", "Bo", Position::Goalkeeper, &team)
                .set_starting_value(5)
                .set_draft_order(2)
                .set_role("keeper"),
        ];

        store.seed_players(&team, &players).unwrap();

        assert_eq!(store.fetch_players(&team).unwrap(), players);
        assert!(store.fetch_players(&"other".into()).unwrap().is_empty());
    }
}
