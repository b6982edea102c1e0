//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product as product_repo;
use crate::utils::{AppError, AppResult, ErrorCode, validation};
use shared::models::{
    Product, ProductCreate, ProductFeedback, ProductFeedbackCreate, ProductInstance,
    ProductInstanceCreate, ProductInstanceUpdate, ProductQuery, ProductUpdate,
    ProductWithInstances,
};

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
}

/// GET /api/products - 商品列表 (过滤 + 排序)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::find_all(&state.pool, &query).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 商品详情 (含规格)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithInstances>> {
    let product = product_repo::find_with_instances(&state.pool, id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(
        &payload.description,
        "description",
        validation::MAX_NOTE_LEN,
    )?;

    let product = product_repo::create(&state.pool, payload).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(
        &payload.description,
        "description",
        validation::MAX_NOTE_LEN,
    )?;

    let product = product_repo::update(&state.pool, id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    product_repo::delete(&state.pool, id).await?;
    Ok(Json(true))
}

// =============================================================================
// Variants
// =============================================================================

/// POST /api/products/:id/instances - 创建规格
pub async fn create_instance(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInstanceCreate>,
) -> AppResult<Json<ProductInstance>> {
    validation::validate_instance_create(&payload)?;
    let instance = product_repo::create_instance(&state.pool, id, payload).await?;
    Ok(Json(instance))
}

/// PUT /api/products/:id/instances/:instance_id - 更新规格
pub async fn update_instance(
    State(state): State<ServerState>,
    Path((id, instance_id)): Path<(i64, i64)>,
    Json(payload): Json<ProductInstanceUpdate>,
) -> AppResult<Json<ProductInstance>> {
    validation::validate_instance_update(&payload)?;
    let instance = product_repo::update_instance(&state.pool, id, instance_id, payload).await?;
    Ok(Json(instance))
}

// =============================================================================
// Feedback
// =============================================================================

/// POST /api/products/:id/feedback - 添加评价
pub async fn add_feedback(
    State(state): State<ServerState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductFeedbackCreate>,
) -> AppResult<Json<bool>> {
    if !(0..=5).contains(&payload.rating) {
        return Err(AppError::validation("Rating must be between 0 and 5."));
    }
    validation::validate_required_text(&payload.review, "review", validation::MAX_NOTE_LEN)?;

    product_repo::add_feedback(&state.pool, id, Some(&user_id), payload).await?;
    Ok(Json(true))
}

/// GET /api/products/:id/feedback - 商品评价列表
pub async fn list_feedback(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ProductFeedback>>> {
    let feedback = product_repo::find_feedback_by_product(&state.pool, id).await?;
    Ok(Json(feedback))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub category: Option<String>,
}

/// GET /api/products/feedback - 全部评价 (可按分类过滤, 最新优先)
pub async fn all_feedback(
    State(state): State<ServerState>,
    Query(query): Query<FeedbackQuery>,
) -> AppResult<Json<Vec<ProductFeedback>>> {
    let feedback = product_repo::find_all_feedback(&state.pool, query.category.as_deref()).await?;
    Ok(Json(feedback))
}
