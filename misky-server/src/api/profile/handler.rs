//! Profile API Handlers
//!
//! 档案行由下游在注册时创建，本服务只读写调用者自己那一行 (按
//! `user_id` 过滤)。`role` 和 `user_id` 不可补丁。

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::fetch;
use crate::auth::CurrentUser;
use crate::client::Select;
use crate::core::ServerState;
use crate::models::{Profile, ProfilePicture, ProfileUpdate};
use shared::{AppError, AppResult};

/// GET /profile - 读取调用者自己的档案
pub async fn get(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let profile = fetch::profile(&state.downstream, &user.token, user.id).await?;
    Ok(Json(profile))
}

/// PATCH /profile - 修改展示字段
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // 先确认行存在，PATCH 匹配零行时下游照样返回 200 + 空数组
    fetch::profile(&state.downstream, &user.token, user.id).await?;

    let mut updated: Vec<Profile> = state
        .downstream
        .update(
            &user.token,
            "profiles",
            Select::new().eq("user_id", user.id),
            &payload,
        )
        .await?;

    updated
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))
}

/// GET /profile/picture - 单独读取头像字段
pub async fn get_picture(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ProfilePicture>> {
    let profile = fetch::profile(&state.downstream, &user.token, user.id).await?;
    Ok(Json(ProfilePicture {
        profile_picture: profile.profile_picture,
    }))
}

/// PATCH /profile/picture - 替换头像 (传 null 即清除)
pub async fn update_picture(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProfilePicture>,
) -> AppResult<Json<ProfilePicture>> {
    fetch::profile(&state.downstream, &user.token, user.id).await?;

    let mut updated: Vec<Profile> = state
        .downstream
        .update(
            &user.token,
            "profiles",
            Select::new().eq("user_id", user.id),
            &serde_json::json!({ "profile_picture": payload.profile_picture }),
        )
        .await?;

    updated
        .pop()
        .map(|p| {
            Json(ProfilePicture {
                profile_picture: p.profile_picture,
            })
        })
        .ok_or_else(|| AppError::internal("Downstream returned no representation"))
}
