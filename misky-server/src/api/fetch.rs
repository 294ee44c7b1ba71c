//! 单行查找辅助
//!
//! 所有权检查和状态机判定都要先把当前行读回来；这里收敛"按主键查一行，
//! 查不到给出资源专属错误码"的套路，处理器各自只关心后续判定。

use uuid::Uuid;

use crate::client::{Downstream, Select};
use crate::models::{Item, Profile, Reservation};
use shared::{AppError, AppResult, ErrorCode};

/// 按主键查食品行
pub async fn item(downstream: &Downstream, token: &str, id: Uuid) -> AppResult<Item> {
    let mut rows: Vec<Item> = downstream
        .select(token, "items", Select::new().eq("id", id))
        .await?;

    rows.pop()
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound).with_detail("item_id", id.to_string()))
}

/// 按主键查预订行
pub async fn reservation(downstream: &Downstream, token: &str, id: Uuid) -> AppResult<Reservation> {
    let mut rows: Vec<Reservation> = downstream
        .select(token, "reservations", Select::new().eq("id", id))
        .await?;

    rows.pop().ok_or_else(|| {
        AppError::new(ErrorCode::ReservationNotFound).with_detail("reservation_id", id.to_string())
    })
}

/// 按用户 ID 查档案行
pub async fn profile(downstream: &Downstream, token: &str, user_id: Uuid) -> AppResult<Profile> {
    let mut rows: Vec<Profile> = downstream
        .select(token, "profiles", Select::new().eq("user_id", user_id))
        .await?;

    rows.pop().ok_or_else(|| {
        AppError::new(ErrorCode::ProfileNotFound).with_detail("user_id", user_id.to_string())
    })
}
