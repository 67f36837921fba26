//! Typed requests decoded once at the HTTP boundary.
//!
//! `GET` parameters become a [`RankingRequest`]; a `POST` body becomes a
//! [`SubmitRequest`]. Anything that does not decode is an
//! [`ApiError::Validation`] and never reaches the store.

use leaderboard_core::Limit;
use serde::Deserialize;

use crate::error::ApiError;

/// Raw `GET` query parameters. Unknown parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingParams {
    pub uuid: Option<String>,
    pub limit: Option<String>,
}

/// What a `GET` asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingRequest {
    /// Top of the leaderboard, optionally truncated.
    Top(Limit),

    /// One player's dense rank.
    Player(String),
}

impl RankingParams {
    /// Resolves the parameters into a request.
    ///
    /// Blank values count as absent, and `uuid` wins over `limit`.
    pub fn into_request(self) -> Result<RankingRequest, ApiError> {
        if let Some(uuid) = non_blank(self.uuid) {
            return Ok(RankingRequest::Player(uuid));
        }
        match non_blank(self.limit) {
            None => Ok(RankingRequest::Top(Limit::Unbounded)),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(|n| RankingRequest::Top(Limit::from_raw(n)))
                .map_err(|_| ApiError::Validation(format!("limit is not an integer: {raw:?}"))),
        }
    }
}

/// A validated score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub player_id: String,
    pub player_name: String,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    uuid: Option<String>,
    user_name: Option<String>,
    score: Option<ScoreField>,
}

/// `score` as sent by clients: a JSON integer or a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoreField {
    Integer(i64),
    Text(String),
}

impl ScoreField {
    fn into_score(self) -> Option<i64> {
        match self {
            ScoreField::Integer(n) => Some(n),
            ScoreField::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl SubmitRequest {
    /// Decodes and validates a `POST` body.
    ///
    /// All of `uuid`, `user_name` and `score` must be present and non-empty;
    /// a zero score counts as empty.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let body: SubmitBody = serde_json::from_slice(body)
            .map_err(|err| ApiError::Validation(format!("malformed body: {err}")))?;

        let player_id = body
            .uuid
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("uuid"))?;
        let player_name = body
            .user_name
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("user_name"))?;
        let score = body
            .score
            .and_then(ScoreField::into_score)
            .filter(|&n| n != 0)
            .ok_or_else(|| missing("score"))?;

        Ok(Self {
            player_id,
            player_name,
            score,
        })
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::Validation(format!("missing or empty field: {field}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
