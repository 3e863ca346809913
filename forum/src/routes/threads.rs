use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use super::json_body;
use crate::error::ForumResult;
use crate::models::{
    CreateThreadRequest, ThreadDetail, ThreadEnvelope, ThreadListQuery, ThreadSummary, VoteRequest,
    VoteResponse,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadSummary>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forums/threads", get(list_threads).post(create_thread))
        .route("/forums/threads/:thread_id", get(get_thread))
        .route("/forums/threads/:thread_id/vote", post(vote_on_thread))
}

async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThreadListQuery>,
) -> ForumResult<Json<ThreadListResponse>> {
    let threads = state
        .forum()
        .list_threads(query.category_id.as_deref())
        .await?;
    Ok(Json(ThreadListResponse { threads }))
}

async fn create_thread(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateThreadRequest>, JsonRejection>,
) -> ForumResult<Json<ThreadEnvelope>> {
    let request = json_body(payload)?;
    let thread = state.forum().create_thread(request).await?;
    Ok(Json(ThreadEnvelope { ok: true, thread }))
}

async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ForumResult<Json<ThreadDetail>> {
    let detail = state.forum().get_thread_detail(&thread_id).await?;
    Ok(Json(detail))
}

async fn vote_on_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ForumResult<Json<VoteResponse>> {
    let request = json_body(payload)?;
    let score = state.forum().vote_on_thread(&thread_id, request).await?;
    Ok(Json(VoteResponse::new(score)))
}
