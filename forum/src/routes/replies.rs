use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use super::json_body;
use crate::error::ForumResult;
use crate::models::{CreateReplyRequest, ReplyEnvelope, VoteRequest, VoteResponse};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forums/replies", post(create_reply))
        .route("/forums/replies/:reply_id/vote", post(vote_on_reply))
}

async fn create_reply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateReplyRequest>, JsonRejection>,
) -> ForumResult<Json<ReplyEnvelope>> {
    let request = json_body(payload)?;
    let reply = state.forum().create_reply(request).await?;
    Ok(Json(ReplyEnvelope { ok: true, reply }))
}

async fn vote_on_reply(
    State(state): State<Arc<AppState>>,
    Path(reply_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ForumResult<Json<VoteResponse>> {
    let request = json_body(payload)?;
    let score = state.forum().vote_on_reply(&reply_id, request).await?;
    Ok(Json(VoteResponse::new(score)))
}
