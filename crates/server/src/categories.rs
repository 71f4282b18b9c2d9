//! Category API endpoints

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, utc_offset};
use engine::users;

fn category_view(category: engine::Category) -> Result<CategoryView, ServerError> {
    let utc = utc_offset()?;
    Ok(CategoryView {
        id: category.id,
        name: category.name,
        created_at: category.created_at.with_timezone(&utc),
    })
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .new_category(&user.username, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category)?)))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(&user.username, id).await?;
    Ok(Json(category_view(category)?))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories(&user.username).await?;
    categories
        .into_iter()
        .map(category_view)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .rename_category(&user.username, id, &payload.name)
        .await?;
    Ok(Json(category_view(category)?))
}
