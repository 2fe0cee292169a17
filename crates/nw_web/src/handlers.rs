use std::sync::Arc;

use axum::{extract::State, Json};
use nw_core::ArticleRecord;
use nw_storage::check_news_exists;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub found: bool,
    pub article: Option<ArticleRecord>,
}

/// Fuzzy "is this headline known" query, a pass-through to the matcher.
pub async fn check_news(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckRequest>,
) -> Json<CheckResponse> {
    let (found, article) = check_news_exists(&state.store, &request.text).await;
    Json(CheckResponse { found, article })
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<ArticleRecord>> {
    let snapshot = state.store.read().await.snapshot();
    Json(snapshot.into_values().collect())
}
