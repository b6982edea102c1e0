//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::api::CurrentUser;
use crate::core::ServerState;
use crate::orders;
use crate::utils::{AppResult, validation};
use shared::models::{OrderCreateRequest, OrderUpdateRequest, OrderView};

/// POST /api/orders - 创建订单 (事务核心)
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<Json<OrderView>> {
    validation::validate_customer(&payload.customer)?;

    let cancel = CancellationToken::new();
    let view = orders::create_order(&state.pool, &user_id, &payload, &cancel).await?;

    tracing::info!(
        order_id = view.id,
        user_id = %view.user_id,
        records = view.order_records.len(),
        skipped = view.skipped_lines.len(),
        "Order created"
    );
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub user_id: Option<String>,
}

/// GET /api/orders - 订单列表 (可按用户过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrdersQuery>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = orders::get_orders(&state.pool, query.user_id.as_deref()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Option<OrderView>>> {
    let order = orders::get_order_by_id(&state.pool, id).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id - 更新状态和备注
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdateRequest>,
) -> AppResult<Json<OrderView>> {
    validation::validate_required_text(&payload.status, "status", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.notes, "notes", validation::MAX_NOTE_LEN)?;

    let view = orders::update_order(&state.pool, id, &payload).await?;
    Ok(Json(view))
}
