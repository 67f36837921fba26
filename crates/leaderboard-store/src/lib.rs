//! Persistent ranking store for the leaderboard service.
//!
//! [`SqliteRankingStore`] implements [`RankingStore`](leaderboard_core::RankingStore)
//! on top of a single SQLite table.
//!
//! ```
//! use leaderboard_core::{Limit, RankingStore};
//! use leaderboard_store::SqliteRankingStore;
//!
//! let store = SqliteRankingStore::open_in_memory().unwrap();
//! store.submit_score("a1", "alice", 100).unwrap();
//! store.submit_score("a1", "alice", 50).unwrap();
//!
//! let ranking = store.top_ranking(Limit::Unbounded).unwrap();
//! assert_eq!(ranking.records().next().unwrap().score, 100);
//! ```

mod sqlite;

pub use sqlite::SqliteRankingStore;
