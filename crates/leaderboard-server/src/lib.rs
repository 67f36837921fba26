//! HTTP boundary of the leaderboard service.
//!
//! Maps `GET`/`POST` requests onto a [`RankingStore`](leaderboard_core::RankingStore)
//! and renders results as JSON.
//!
//! - [`api`] - router and handlers
//! - [`request`] - typed request decoding and validation
//! - [`response`] - JSON rendering and CORS header policy
//! - [`server`] - configuration loading and the listener
//! - [`console`] - banner and colored tracing output

pub mod api;
pub mod console;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use api::{router, AppState};
pub use error::{ApiError, ServerError};
