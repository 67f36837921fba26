//! Shared test fixtures for leaderboard crates.
//!
//! This crate depends only on `leaderboard-core`, so both the store and the
//! server can use it as a dev-dependency.
//!
//! - [`clock`] - a manually driven [`Clock`](leaderboard_core::Clock)
//! - [`players`] - canned players and fresh player ids
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! leaderboard-test = { workspace = true }
//! ```

pub mod clock;
pub mod players;

pub use clock::{epoch, ManualClock};
pub use players::{fresh_player_id, Player, ALICE, BOB, CAROL, DAVE};
