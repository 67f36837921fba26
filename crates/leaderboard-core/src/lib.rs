//! Core types and traits for the leaderboard service.
//!
//! - [`ScoreRecord`] - the persisted best score of one player
//! - [`Ranking`] / [`RankedRecord`] - ranking query results
//! - [`RankingStore`] - the storage seam the HTTP layer calls into
//! - [`Clock`] - time source for submission timestamps

pub mod clock;
pub mod error;
pub mod record;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{Result, StoreError};
pub use record::{Limit, RankedRecord, Ranking, ScoreRecord, LOG_TIME_FORMAT};
pub use store::RankingStore;
