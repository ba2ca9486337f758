//! Core roster domain types
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

/// Integer money amount. Never use floats for prices.
pub type Money = u64;

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct PlayerId(#[n(0)] pub String);

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct TeamId(#[n(0)] pub String);

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct WeekId(#[n(0)] pub u32);

// bech32 encoded uuid7, see utils::new_snapshot_id
#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct SnapshotId(#[n(0)] pub String);

#[derive(
    minicbor::Encode,
    minicbor::Decode,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[n(0)]
    Goalkeeper,
    #[n(1)]
    Defender,
    #[n(2)]
    Midfielder,
    #[n(3)]
    Forward,
}

impl Position {
    /// Reporting order for per-position checks.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    #[n(0)]
    pub id: PlayerId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub position: Position, // natural position
    #[n(3)]
    pub starting_value: Money, // price when the season opened
    #[n(4)]
    pub current_value: Money, // price this week, used for budget checks
    #[n(5)]
    pub draft_order: Option<u32>,
    #[n(6)]
    pub role: Option<String>,
    #[n(7)]
    pub team_id: TeamId,
}

/// One entry of a draft roster or a committed snapshot.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct DraftRosterPlayer {
    #[n(0)]
    pub player_id: PlayerId,
    #[n(1)]
    pub slot: Position,
    #[n(2)]
    pub is_benched: bool,
    #[n(3)]
    pub is_captain: bool,
}

// Committed roster for one (team, week). Only a successful save creates one.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    #[n(0)]
    pub id: SnapshotId,
    #[n(1)]
    pub team_id: TeamId,
    #[n(2)]
    pub week_id: WeekId,
    #[n(3)]
    pub committed_at: TimeStamp<Utc>,
    #[n(4)]
    pub entries: Vec<DraftRosterPlayer>,
    #[n(5)]
    pub entries_hash: String, // sha256 of the cbor encoded entries
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl Player {
    /// Starts a player record; both values default to zero until set.
    pub fn new(id: &str, name: &str, position: Position, team_id: &TeamId) -> Self {
        Self {
            id: PlayerId::from(id),
            name: name.to_string(),
            position,
            starting_value: 0,
            current_value: 0,
            draft_order: None,
            role: None,
            team_id: team_id.clone(),
        }
    }
    /// Sets the opening price and, until told otherwise, the current price.
    pub fn set_starting_value(mut self, value: Money) -> Self {
        self.starting_value = value;
        self.current_value = value;
        self
    }
    pub fn set_current_value(mut self, value: Money) -> Self {
        self.current_value = value;
        self
    }
    pub fn set_draft_order(mut self, order: u32) -> Self {
        self.draft_order = Some(order);
        self
    }
    pub fn set_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }
}

impl DraftRosterPlayer {
    pub fn starting(player_id: PlayerId, slot: Position) -> Self {
        Self {
            player_id,
            slot,
            is_benched: false,
            is_captain: false,
        }
    }
    pub fn benched(player_id: PlayerId, slot: Position) -> Self {
        Self {
            player_id,
            slot,
            is_benched: true,
            is_captain: false,
        }
    }
    pub fn captain(mut self) -> Self {
        self.is_captain = true;
        self
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        PlayerId(value.to_string())
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        TeamId(value.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        };
        f.write_str(label)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_encoding() {
        let original = TimeStamp::new();

        let encoding = minicbor::to_vec(original.clone()).unwrap();
        let decode: TimeStamp<Utc> = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decode);
    }

    #[test]
    fn snapshot_encoding() {
        let snapshot = Snapshot {
            id: SnapshotId("snap_1".into()),
            team_id: TeamId::from("team"),
            week_id: WeekId(3),
            committed_at: TimeStamp::new(),
            entries: vec![
                DraftRosterPlayer::starting("p1".into(), Position::Forward).captain(),
                DraftRosterPlayer::benched("p2".into(), Position::Defender),
            ],
            entries_hash: "abc".into(),
        };

        let encoding = minicbor::to_vec(&snapshot).unwrap();
        let decode: Snapshot = minicbor::decode(&encoding).unwrap();

        assert_eq!(snapshot, decode);
    }

    #[test]
    fn starting_value_sets_current_value_until_overridden() {
        let team = TeamId::from("team");
        let player = Player::new("p1", "Ada", Position::Midfielder, &team).set_starting_value(50);
        assert_eq!(player.current_value, 50);

        let player = player.set_current_value(65);
        assert_eq!(player.starting_value, 50);
        assert_eq!(player.current_value, 65);
    }
}
