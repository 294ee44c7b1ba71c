//! Notification API Handlers
//!
//! 通知按接收方角色存放在两张平行表里；每个请求先读调用者档案解析角色，
//! 再由 [`Role`] 选出 (表, 过滤列) 对。路由和处理逻辑对两种角色完全一致。

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::api::fetch;
use crate::auth::CurrentUser;
use crate::client::Select;
use crate::core::ServerState;
use crate::models::{Notification, Role};
use shared::{AppError, AppResult, ErrorCode};

/// 从调用者档案解析通知路由角色
async fn resolve_role(state: &ServerState, user: &CurrentUser) -> AppResult<Role> {
    let profile = fetch::profile(&state.downstream, &user.token, user.id).await?;
    Role::from_profile(&profile.role)
        .ok_or_else(|| AppError::new(ErrorCode::RoleUnknown).with_detail("role", profile.role))
}

/// GET /notifications - 列出调用者未读通知，新的在前
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let role = resolve_role(&state, &user).await?;

    let rows = state
        .downstream
        .select(
            &user.token,
            role.notifications_table(),
            Select::new()
                .eq(role.owner_column(), user.id)
                .eq("read", false)
                .order("created_at.desc"),
        )
        .await?;

    Ok(Json(rows))
}

/// POST /notifications/{id}/read - 标记通知已读
///
/// 存在性检查带接收方过滤：别人的通知和不存在的通知同样报 not found，
/// 不向调用者泄露其他用户的通知 ID 是否存在
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let role = resolve_role(&state, &user).await?;

    let owned: Vec<Notification> = state
        .downstream
        .select(
            &user.token,
            role.notifications_table(),
            Select::new().eq("id", id).eq(role.owner_column(), user.id),
        )
        .await?;
    if owned.is_empty() {
        return Err(AppError::new(ErrorCode::NotificationNotFound)
            .with_detail("notification_id", id.to_string()));
    }

    let mut updated: Vec<Notification> = state
        .downstream
        .update(
            &user.token,
            role.notifications_table(),
            Select::new().eq("id", id),
            &serde_json::json!({ "read": true }),
        )
        .await?;

    updated
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))
}
