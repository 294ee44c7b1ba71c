//! Reservation API Handlers
//!
//! 预订的创建和取消各是一条顺序下游调用链：先写预订行，再通过命名 RPC
//! 增减食品上的名额计数器 (计数器绝不在本服务里直接写)。链条没有事务
//! 语义，计数器一步失败时预订行已落库，此时上报专门的错误码而不是回滚。

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::fetch;
use crate::auth::CurrentUser;
use crate::client::Select;
use crate::core::ServerState;
use crate::models::{
    LifecycleStatus, NotificationInsert, Reservation, ReservationCreate, ReservationInsert,
    ReservationWithItem, Role,
};
use shared::{AppError, AppResult, ErrorCode};

/// 计数器 RPC 的参数形状
fn counter_args(item_id: Uuid, amount: i32) -> serde_json::Value {
    serde_json::json!({ "item_uuid": item_id, "amount": amount })
}

/// GET /reservations - 列出调用者自己的预订 (内嵌父食品)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<ReservationWithItem>>> {
    let rows = state
        .downstream
        .select(
            &user.token,
            "reservations",
            Select::new()
                .columns("*,item:items(*)")
                .eq("customer_id", user.id),
        )
        .await?;

    Ok(Json(rows))
}

/// POST /reservations - 创建预订
///
/// 名额检查发生在任何写入之前：数量不足时下游完全不被触碰。
/// 检查和写入之间没有锁，并发超订由下游计数器 RPC 兜底。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    if payload.quantity < 1 {
        return Err(AppError::new(ErrorCode::QuantityTooSmall)
            .with_detail("quantity", payload.quantity));
    }

    let item = fetch::item(&state.downstream, &user.token, payload.item_id).await?;
    if item.status.is_terminal() {
        return Err(AppError::new(ErrorCode::ItemAlreadyClosed)
            .with_detail("status", item.status.as_str()));
    }

    let available = item.available_spots();
    if payload.quantity > available {
        return Err(AppError::with_message(
            ErrorCode::NoSpotsAvailable,
            format!("{} available, {} requested", available, payload.quantity),
        ));
    }

    let row = ReservationInsert {
        customer_id: user.id,
        item_id: payload.item_id,
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
        status: LifecycleStatus::Active,
        quantity: payload.quantity,
    };
    let mut created: Vec<Reservation> = state
        .downstream
        .insert(&user.token, "reservations", &row)
        .await?;
    let reservation = created
        .pop()
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))?;

    state
        .downstream
        .rpc(
            &user.token,
            "increment_num_of_reservations",
            &counter_args(payload.item_id, payload.quantity),
        )
        .await
        .map_err(|e| {
            tracing::error!(reservation_id = %reservation.id, error = %e, "Counter update failed");
            AppError::with_message(
                ErrorCode::CounterUpdateFailed,
                "Reservation created but failed to update item count",
            )
            .with_detail("reservation_id", reservation.id.to_string())
        })?;

    tracing::info!(
        reservation_id = %reservation.id,
        item_id = %payload.item_id,
        quantity = payload.quantity,
        "Reservation created"
    );
    Ok(Json(reservation))
}

/// POST /reservations/{id}/cancel - 取消预订
///
/// 链条：改状态 → 递减计数器 → 通知餐厅。只有所属顾客可以取消，
/// 终态预订按原状态给出对应的冲突错误
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch::reservation(&state.downstream, &user.token, id).await?;
    if reservation.customer_id != user.id {
        return Err(AppError::forbidden("Reservation belongs to another customer"));
    }
    reject_terminal(&reservation)?;

    let mut updated: Vec<Reservation> = state
        .downstream
        .update(
            &user.token,
            "reservations",
            Select::new().eq("id", id),
            &serde_json::json!({ "status": LifecycleStatus::Cancelled }),
        )
        .await?;
    let reservation = updated
        .pop()
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))?;

    state
        .downstream
        .rpc(
            &user.token,
            "decrement_num_of_reservations",
            &counter_args(reservation.item_id, reservation.quantity),
        )
        .await
        .map_err(|e| {
            tracing::error!(reservation_id = %id, error = %e, "Counter update failed");
            AppError::with_message(
                ErrorCode::CounterUpdateFailed,
                "Reservation cancelled but failed to update item count",
            )
            .with_detail("reservation_id", id.to_string())
        })?;

    let item = fetch::item(&state.downstream, &user.token, reservation.item_id).await?;
    let notification =
        NotificationInsert::reservation_cancelled(item.restaurant_id, &reservation, &item);
    let _: Vec<serde_json::Value> = state
        .downstream
        .insert(
            &user.token,
            Role::Restaurant.notifications_table(),
            &notification,
        )
        .await?;

    tracing::info!(reservation_id = %id, "Reservation cancelled");
    Ok(Json(reservation))
}

/// POST /reservations/{id}/complete - 标记预订已完成 (取货)
///
/// 只改状态，不动计数器、不发通知
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Reservation>> {
    let reservation = fetch::reservation(&state.downstream, &user.token, id).await?;
    if reservation.customer_id != user.id {
        return Err(AppError::forbidden("Reservation belongs to another customer"));
    }
    reject_terminal(&reservation)?;

    let mut updated: Vec<Reservation> = state
        .downstream
        .update(
            &user.token,
            "reservations",
            Select::new().eq("id", id),
            &serde_json::json!({ "status": LifecycleStatus::Completed }),
        )
        .await?;

    updated
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))
}

/// 终态预订拒绝任何再次转换，错误码区分已取消/已完成
fn reject_terminal(reservation: &Reservation) -> AppResult<()> {
    match reservation.status {
        LifecycleStatus::Active => Ok(()),
        LifecycleStatus::Cancelled => {
            Err(AppError::new(ErrorCode::ReservationAlreadyCancelled))
        }
        LifecycleStatus::Completed => {
            Err(AppError::new(ErrorCode::ReservationAlreadyCompleted))
        }
    }
}
