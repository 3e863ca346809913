use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ForumResult;
use crate::models::Category;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/forums/categories", get(list_categories))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ForumResult<Json<CategoriesResponse>> {
    let categories = state.forum().list_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}
