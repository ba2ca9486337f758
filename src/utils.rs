//! Utility functions for ids and content hashes

use bech32::Bech32m;
use uuid7::uuid7;

use crate::error::StoreError;
use crate::types::{DraftRosterPlayer, SnapshotId};

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

pub fn new_snapshot_id() -> anyhow::Result<SnapshotId> {
    Ok(SnapshotId(new_uuid_to_bech32("snap_")?))
}

/// Encodes roster entries into cbor and returns `(hash, cbor)`.
pub fn hash_entries(entries: &[DraftRosterPlayer]) -> Result<(String, Vec<u8>), StoreError> {
    let cbor = minicbor::to_vec(entries).map_err(|e| StoreError::Encode(e.to_string()))?;
    let hash = sha256::digest(&cbor);

    Ok((hash, cbor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn snapshot_ids_are_unique_and_prefixed() {
        let a = new_snapshot_id().unwrap();
        let b = new_snapshot_id().unwrap();

        assert!(a.0.starts_with("snap_1"));
        assert_ne!(a, b);
    }

    #[test]
    fn entry_hash_depends_on_flags() {
        let plain = vec![DraftRosterPlayer::starting("p1".into(), Position::Forward)];
        let captained = vec![DraftRosterPlayer::starting("p1".into(), Position::Forward).captain()];

        let (h1, _) = hash_entries(&plain).unwrap();
        let (h2, _) = hash_entries(&plain).unwrap();
        let (h3, _) = hash_entries(&captained).unwrap();

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }
}
