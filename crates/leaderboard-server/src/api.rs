//! REST API for the leaderboard.
//!
//! Every path routes to the same resource, as clients only vary the method,
//! query string and body:
//!
//! - `GET`  - top ranking, or one player's rank with `?uuid=`
//! - `POST` - submit a score
//! - anything else - `400 Bad Request`

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, MethodRouter};
use axum::Router;
use leaderboard_core::{Ranking, RankingStore};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::request::{RankingParams, RankingRequest, SubmitRequest};
use crate::response::{cors_headers, json_response};

/// Application state shared across handlers.
pub struct AppState {
    store: Arc<dyn RankingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RankingStore>) -> Self {
        Self { store }
    }

    /// Runs a store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn RankingStore) -> leaderboard_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|err| ApiError::Worker(err.to_string()))?
            .map_err(ApiError::from)
    }
}

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let [allow_origin, allow_headers, allow_methods] = cors_headers();

    Router::new()
        .route("/", ranking_resource())
        .route("/{*path}", ranking_resource())
        .layer(middleware::from_fn(log_request))
        .layer(allow_origin)
        .layer(allow_headers)
        .layer(allow_methods)
        .with_state(state)
}

// `get` would also answer HEAD; only GET and POST are served.
fn ranking_resource() -> MethodRouter<Arc<AppState>> {
    get(get_ranking)
        .head(reject_method)
        .post(submit_score)
        .fallback(reject_method)
}

async fn get_ranking(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let Query(params) = Query::<RankingParams>::try_from_uri(&uri)
        .map_err(|err| ApiError::Validation(format!("bad query string: {err}")))?;

    let ranking = match params.into_request()? {
        RankingRequest::Top(limit) => {
            debug!(%limit, "Top ranking requested");
            state.with_store(move |store| store.top_ranking(limit)).await?
        }
        RankingRequest::Player(player_id) => {
            debug!(player_id = %player_id, "Player ranking requested");
            let entry = state
                .with_store(move |store| store.player_ranking(&player_id))
                .await?;
            Ranking::from(entry)
        }
    };

    json_response(&ranking)
}

async fn submit_score(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, ApiError> {
    let body = body.map_err(|err| ApiError::Validation(format!("unreadable body: {err}")))?;
    let request = SubmitRequest::from_body(&body)?;

    debug!(
        player_id = %request.player_id,
        score = request.score,
        "Score submitted"
    );
    state
        .with_store(move |store| {
            store.submit_score(&request.player_id, &request.player_name, request.score)
        })
        .await?;

    Ok(StatusCode::OK)
}

async fn reject_method(request: Request) -> ApiError {
    ApiError::Validation(format!("method not allowed: {}", request.method()))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "/".to_owned());
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16() as u64,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Request handled"
    );
    response
}

#[cfg(test)]
mod tests;
