//! The ranking store seam.

use crate::error::Result;
use crate::record::{Limit, RankedRecord, Ranking};

/// Keeper of one best [`ScoreRecord`](crate::ScoreRecord) per player.
///
/// Implementations own all record state; nothing else mutates it. Every
/// failure of the backing storage is reported as an error, never as an
/// empty result.
pub trait RankingStore: Send + Sync {
    /// Records a submission.
    ///
    /// Creates the record on a player's first submission. Afterwards the
    /// stored record is replaced (name, score and timestamp) only when
    /// `score` is greater than or equal to the stored score. The check and
    /// the write happen atomically.
    fn submit_score(&self, player_id: &str, player_name: &str, score: i64) -> Result<()>;

    /// Records sorted by score descending, numbered by result position.
    ///
    /// Equal scores are ordered by earliest `log_time`, then by player id.
    fn top_ranking(&self, limit: Limit) -> Result<Ranking>;

    /// The player's dense rank by score descending, with their record.
    ///
    /// Returns `Ok(None)` when the player has never submitted.
    fn player_ranking(&self, player_id: &str) -> Result<Option<RankedRecord>>;

    /// Destroys every record and recreates the empty schema.
    fn reset(&self) -> Result<()>;
}
