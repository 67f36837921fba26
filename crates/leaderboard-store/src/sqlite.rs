//! SQLite-backed ranking store.
//!
//! One table holds one row per player. Submissions are a single conditional
//! upsert executed in a transaction, so concurrent submissions for the same
//! player cannot interleave between the comparison and the write. The
//! connection lives behind a mutex and is never handed out.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use leaderboard_config::DatabaseConfig;
use leaderboard_core::{
    Clock, Limit, RankedRecord, Ranking, RankingStore, Result, ScoreRecord, StoreError,
    SystemClock, LOG_TIME_FORMAT,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS ors (
        log_time  TEXT    NOT NULL,
        uuid      TEXT    NOT NULL PRIMARY KEY,
        user_name TEXT    NOT NULL,
        score     INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS ors_by_score ON ors (score DESC, log_time, uuid);
";

const DROP_SCHEMA: &str = "DROP TABLE IF EXISTS ors;";

// Ties (score equal to the stored best) still refresh name and log_time.
const UPSERT_SCORE: &str = "
    INSERT INTO ors (log_time, uuid, user_name, score) VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (uuid) DO UPDATE SET
        log_time  = excluded.log_time,
        user_name = excluded.user_name,
        score     = excluded.score
    WHERE excluded.score >= ors.score
";

const TOP_RANKING: &str = "
    SELECT log_time, uuid, user_name, score FROM ors
    ORDER BY score DESC, log_time ASC, uuid ASC
    LIMIT ?1
";

const PLAYER_RANKING: &str = "
    SELECT log_time, uuid, user_name, score, ranking FROM (
        SELECT log_time, uuid, user_name, score,
               DENSE_RANK() OVER (ORDER BY score DESC) AS ranking
        FROM ors
    )
    WHERE uuid = ?1
";

/// Ranking store persisted in a SQLite database.
pub struct SqliteRankingStore {
    connection: Mutex<Connection>,
    clock: Arc<dyn Clock>,
    location: String,
}

impl SqliteRankingStore {
    /// Opens (creating if needed) the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`open`](Self::open), stamping submissions with `clock`.
    pub fn open_with_clock(config: &DatabaseConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let location = config.path.display().to_string();
        let open_error = |message: String| StoreError::Open {
            path: location.clone(),
            message,
        };

        ensure_parent_dir(&config.path).map_err(|err| open_error(err.to_string()))?;
        let connection =
            Connection::open(&config.path).map_err(|err| open_error(err.to_string()))?;
        connection
            .busy_timeout(config.busy_timeout())
            .map_err(|err| open_error(err.to_string()))?;

        let store = Self::from_connection(connection, clock, location.clone())
            .map_err(|err| open_error(err.to_string()))?;
        info!(path = %location, "Ranking store opened");
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    /// Opens a private in-memory database stamping submissions with `clock`.
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(|err| StoreError::Open {
            path: ":memory:".to_string(),
            message: err.to_string(),
        })?;
        Self::from_connection(connection, clock, ":memory:".to_string())
    }

    fn from_connection(
        connection: Connection,
        clock: Arc<dyn Clock>,
        location: String,
    ) -> Result<Self> {
        connection.execute_batch(CREATE_SCHEMA).map_err(db_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
            clock,
            location,
        })
    }

    /// Where the database lives, for diagnostics.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl RankingStore for SqliteRankingStore {
    fn submit_score(&self, player_id: &str, player_name: &str, score: i64) -> Result<()> {
        let log_time = self.clock.now().format(LOG_TIME_FORMAT).to_string();

        let mut connection = self.connection.lock();
        let tx = connection.transaction().map_err(db_error)?;
        let changed = tx
            .execute(UPSERT_SCORE, params![log_time, player_id, player_name, score])
            .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        drop(connection);

        if changed == 0 {
            debug!(player_id, score, "Submission below stored best, kept previous");
        } else {
            debug!(player_id, score, "Submission recorded");
        }
        Ok(())
    }

    fn top_ranking(&self, limit: Limit) -> Result<Ranking> {
        let connection = self.connection.lock();
        let mut stmt = connection.prepare_cached(TOP_RANKING).map_err(db_error)?;
        let rows = stmt
            .query_map(params![limit.as_sql()], map_record_row)
            .map_err(db_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_error)?;
        drop(stmt);
        drop(connection);

        let records = rows
            .into_iter()
            .map(RecordRow::into_record)
            .collect::<Result<Vec<_>>>()?;
        debug!(%limit, returned = records.len(), "Top ranking queried");
        Ok(Ranking::from_ordered(records))
    }

    fn player_ranking(&self, player_id: &str) -> Result<Option<RankedRecord>> {
        let connection = self.connection.lock();
        let row = connection
            .query_row(PLAYER_RANKING, params![player_id], |row| {
                Ok((map_record_row(row)?, row.get::<_, i64>(4)?))
            })
            .optional()
            .map_err(db_error)?;
        drop(connection);

        let Some((row, rank)) = row else {
            debug!(player_id, "Player has no record");
            return Ok(None);
        };
        let rank = u64::try_from(rank)
            .map_err(|_| StoreError::Corrupt(format!("negative rank {rank} for {player_id}")))?;
        Ok(Some(RankedRecord {
            rank,
            record: row.into_record()?,
        }))
    }

    fn reset(&self) -> Result<()> {
        let mut connection = self.connection.lock();
        let tx = connection.transaction().map_err(db_error)?;
        tx.execute_batch(DROP_SCHEMA).map_err(db_error)?;
        tx.execute_batch(CREATE_SCHEMA).map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        drop(connection);

        info!(path = %self.location, "Ranking store reset");
        Ok(())
    }
}

/// Raw column values of one `ors` row.
struct RecordRow {
    log_time: String,
    uuid: String,
    user_name: String,
    score: i64,
}

impl RecordRow {
    fn into_record(self) -> Result<ScoreRecord> {
        let logged_at = NaiveDateTime::parse_from_str(&self.log_time, LOG_TIME_FORMAT)
            .map_err(|err| {
                StoreError::Corrupt(format!(
                    "bad log_time {:?} for {}: {err}",
                    self.log_time, self.uuid
                ))
            })?;
        Ok(ScoreRecord {
            logged_at,
            player_id: self.uuid,
            player_name: self.user_name,
            score: self.score,
        })
    }
}

fn map_record_row(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        log_time: row.get(0)?,
        uuid: row.get(1)?,
        user_name: row.get(2)?,
        score: row.get(3)?,
    })
}

fn db_error(err: rusqlite::Error) -> StoreError {
    StoreError::Db(err.to_string())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
