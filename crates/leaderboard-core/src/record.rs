//! Score records and ranking results.
//!
//! A [`ScoreRecord`] is the only persisted entity: one best score per
//! player. Rankings are derived views over the full record set and are
//! rendered on the wire as a JSON object keyed by rank:
//!
//! ```
//! use chrono::NaiveDate;
//! use leaderboard_core::{Ranking, ScoreRecord};
//!
//! let logged_at = NaiveDate::from_ymd_opt(2024, 5, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 30, 0)
//!     .unwrap();
//! let record = ScoreRecord::new("a1", "alice", 100, logged_at);
//! let ranking = Ranking::from_ordered(vec![record]);
//!
//! assert_eq!(ranking.len(), 1);
//! assert_eq!(ranking.entries()[0].rank, 1);
//! ```

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Text format of `log_time`, both on the wire and in storage.
///
/// Lexicographic order of formatted values matches chronological order.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A player's best recorded score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Time of the most recent accepted submission.
    #[serde(rename = "log_time", with = "log_time")]
    pub logged_at: NaiveDateTime,

    /// Client-generated opaque identifier, unique per player.
    #[serde(rename = "uuid")]
    pub player_id: String,

    /// Display name; may change between submissions.
    #[serde(rename = "user_name")]
    pub player_name: String,

    pub score: i64,
}

impl ScoreRecord {
    pub fn new(
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        score: i64,
        logged_at: NaiveDateTime,
    ) -> Self {
        Self {
            logged_at,
            player_id: player_id.into(),
            player_name: player_name.into(),
            score,
        }
    }
}

/// Serde adapter for `log_time` strings.
pub mod log_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::LOG_TIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(LOG_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, LOG_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A record paired with its rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRecord {
    /// 1-based. Meaning depends on the query: result position for
    /// `top_ranking`, dense rank for `player_ranking`.
    pub rank: u64,
    pub record: ScoreRecord,
}

/// Ordered ranking result, serialized as `{"<rank>": record, ...}`.
///
/// An empty ranking serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    entries: Vec<RankedRecord>,
}

impl Ranking {
    /// Creates an empty ranking.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Numbers records by position, starting at 1.
    pub fn from_ordered(records: Vec<ScoreRecord>) -> Self {
        let entries = records
            .into_iter()
            .zip(1u64..)
            .map(|(record, rank)| RankedRecord { rank, record })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the records in ranking order.
    pub fn records(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.entries.iter().map(|e| &e.record)
    }
}

impl From<Option<RankedRecord>> for Ranking {
    fn from(entry: Option<RankedRecord>) -> Self {
        Self {
            entries: entry.into_iter().collect(),
        }
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.rank.to_string(), &entry.record)?;
        }
        map.end()
    }
}

/// Row cap for `top_ranking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    /// Every record.
    #[default]
    Unbounded,

    /// At most this many records.
    Top(u64),
}

impl Limit {
    /// Interprets a client-supplied limit; zero or negative means unbounded.
    pub fn from_raw(raw: i64) -> Self {
        if raw <= 0 {
            Limit::Unbounded
        } else {
            Limit::Top(raw as u64)
        }
    }

    /// Value for a SQL `LIMIT` clause, where `-1` means no limit.
    pub fn as_sql(self) -> i64 {
        match self {
            Limit::Unbounded => -1,
            Limit::Top(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unbounded => write!(f, "unbounded"),
            Limit::Top(n) => write!(f, "top {}", n),
        }
    }
}
