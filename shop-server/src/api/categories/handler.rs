//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::category as category_repo;
use crate::utils::{AppResult, validation};
use shared::models::{Category, CategoryCreate, CategoryGroup, CategoryGroupWithCategories, CategoryUpdate};

/// GET /api/categories - 分组列表 (含分类)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CategoryGroupWithCategories>>> {
    let groups = category_repo::find_all_grouped(&state.pool).await?;
    Ok(Json(groups))
}

#[derive(Debug, Deserialize)]
pub struct GroupCreate {
    pub name: String,
    pub position: Option<i64>,
}

/// POST /api/categories/groups - 创建分组
pub async fn create_group(
    State(state): State<ServerState>,
    Json(payload): Json<GroupCreate>,
) -> AppResult<Json<CategoryGroup>> {
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    let group =
        category_repo::create_group(&state.pool, &payload.name, payload.position.unwrap_or(0))
            .await?;
    Ok(Json(group))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    let category = category_repo::create(&state.pool, payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    let category = category_repo::update(&state.pool, id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - 删除分类 (有商品引用时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    category_repo::delete(&state.pool, id).await?;
    Ok(Json(true))
}
