//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Role, UserWithRoles};

/// GET /api/users - 用户列表 (含角色)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserWithRoles>>> {
    let users = user_repo::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/:id - 用户详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserWithRoles>> {
    let user = user_repo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        })?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct RolesUpdate {
    pub roles: Vec<String>,
}

/// PUT /api/users/:id/roles - 替换角色集合
pub async fn change_roles(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RolesUpdate>,
) -> AppResult<Json<UserWithRoles>> {
    let user = user_repo::change_roles(&state.pool, &id, &payload.roles).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user_repo::delete(&state.pool, &id).await?;
    Ok(Json(true))
}

/// GET /api/users/roles - 角色列表
pub async fn list_roles(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    let roles = user_repo::find_all_roles(&state.pool).await?;
    Ok(Json(roles))
}
