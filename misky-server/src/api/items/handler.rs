//! Item API Handlers
//!
//! 食品的创建、修改和关闭都要求调用者是所属餐厅；关闭 (取消/完成)
//! 会级联处理该食品下所有活跃预订并逐个通知顾客。级联是顺序执行的，
//! 中途失败即中止，已完成的步骤不回滚。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::fetch;
use crate::auth::CurrentUser;
use crate::client::Select;
use crate::core::ServerState;
use crate::models::{
    Item, ItemCreate, ItemInsert, ItemUpdate, LifecycleStatus, NotificationInsert, Reservation,
    Role,
};
use shared::{AppError, AppResult, ErrorCode};

/// GET /items 查询参数
#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    /// 只看某家餐厅的食品
    pub restaurant_id: Option<Uuid>,
}

/// GET /items - 列出食品，可按餐厅过滤
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(params): Query<ItemListQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let mut query = Select::new();
    if let Some(restaurant_id) = params.restaurant_id {
        query = query.eq("restaurant_id", restaurant_id);
    }

    let items = state
        .downstream
        .select(&user.token, "items", query)
        .await?;

    Ok(Json(items))
}

/// POST /items - 创建食品
///
/// 所有权一律取调用者身份，载荷里即使带了 `restaurant_id` 也不生效
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<Item>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let row = ItemInsert::from_payload(user.id, payload);
    let mut created: Vec<Item> = state
        .downstream
        .insert(&user.token, "items", &row)
        .await?;

    let item = created
        .pop()
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))?;

    tracing::info!(item_id = %item.id, restaurant_id = %user.id, "Item created");
    Ok(Json(item))
}

/// PATCH /items/{id} - 修改食品描述字段
///
/// 只有所属餐厅可以修改；所有权和计数器字段不可补丁
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<Item>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let item = fetch::item(&state.downstream, &user.token, id).await?;
    if item.restaurant_id != user.id {
        return Err(AppError::forbidden("Item belongs to another restaurant"));
    }

    let mut updated: Vec<Item> = state
        .downstream
        .update(&user.token, "items", Select::new().eq("id", id), &payload)
        .await?;

    updated
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))
}

/// POST /items/{id}/cancel - 取消食品并级联取消所有活跃预订
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    close(state, user, id, LifecycleStatus::Cancelled).await
}

/// POST /items/{id}/complete - 完成食品并级联完成所有活跃预订
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    close(state, user, id, LifecycleStatus::Completed).await
}

/// 取消和完成共用的关闭流程
///
/// 1. 所有权检查，终态拒绝再次转换
/// 2. 食品行转入目标状态
/// 3. 逐个把活跃预订转入同一目标状态，并给顾客插入通知
async fn close(
    state: ServerState,
    user: CurrentUser,
    id: Uuid,
    target: LifecycleStatus,
) -> AppResult<Json<Item>> {
    let item = fetch::item(&state.downstream, &user.token, id).await?;
    if item.restaurant_id != user.id {
        return Err(AppError::forbidden("Item belongs to another restaurant"));
    }
    if item.status.is_terminal() {
        return Err(AppError::new(ErrorCode::ItemAlreadyClosed)
            .with_detail("status", item.status.as_str()));
    }

    let mut updated: Vec<Item> = state
        .downstream
        .update(
            &user.token,
            "items",
            Select::new().eq("id", id),
            &serde_json::json!({ "status": target }),
        )
        .await?;
    let item = updated
        .pop()
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))?;

    let active: Vec<Reservation> = state
        .downstream
        .select(
            &user.token,
            "reservations",
            Select::new()
                .eq("item_id", id)
                .eq("status", LifecycleStatus::Active.as_str()),
        )
        .await?;

    for reservation in &active {
        let _: Vec<Reservation> = state
            .downstream
            .update(
                &user.token,
                "reservations",
                Select::new().eq("id", reservation.id),
                &serde_json::json!({ "status": target }),
            )
            .await?;

        let notification = NotificationInsert::item_closed(reservation, &item, target);
        let _: Vec<serde_json::Value> = state
            .downstream
            .insert(
                &user.token,
                Role::Customer.notifications_table(),
                &notification,
            )
            .await?;
    }

    tracing::info!(
        item_id = %id,
        status = target.as_str(),
        cascaded = active.len(),
        "Item closed"
    );
    Ok(Json(item))
}
