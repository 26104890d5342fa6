//! Categories API endpoints.

use api_types::category::{CategoryFilter, CategoryNew, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    ServerError, parse_kind,
    server::{AuthUser, ServerState},
};

pub(crate) fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: category.kind.to_string(),
    }
}

pub async fn create(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let kind = parse_kind(&payload.kind)?;
    let category = state
        .engine
        .new_category(user_id, &payload.name, kind)
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

/// `GET /categories?kind=income`: without `kind` every category is listed.
pub async fn list(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = match filter.kind.as_deref() {
        Some(raw) => {
            let kind = parse_kind(raw)?;
            state.engine.categories_by_kind(user_id, kind).await?
        }
        None => state.engine.categories(user_id).await?,
    };
    Ok(Json(categories.into_iter().map(map_category).collect()))
}

pub async fn get(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(category_id, user_id).await?;
    Ok(Json(map_category(category)))
}
