//! 维护路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /maintenance/archive | POST | 触发过期食品归档 | 无 |
//!
//! 归档清扫本身在下游的存储过程里跑；这个接口只是个无认证的触发器，
//! 给定时任务 (cron) 一个可以打的 HTTP 端点，调用时携带服务密钥。

use axum::{Json, Router, extract::State, routing::post};

use crate::core::ServerState;
use shared::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/maintenance/archive", post(archive))
}

/// POST /maintenance/archive - 触发归档清扫
pub async fn archive(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<()>>> {
    state
        .downstream
        .rpc(
            state.downstream.service_token(),
            "archive_old_items",
            &serde_json::json!({}),
        )
        .await?;

    tracing::info!("Archive sweep triggered");
    Ok(Json(ApiResponse::ok()))
}
