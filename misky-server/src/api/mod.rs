//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`items`] - 食品管理接口 (餐厅侧)
//! - [`reservations`] - 预订管理接口 (顾客侧)
//! - [`notifications`] - 通知接口 (按角色路由)
//! - [`profile`] - 用户档案接口
//! - [`maintenance`] - 归档等维护接口
//!
//! 每个子模块导出一个 `router()`，在 [`build_router`] 里统一合并；
//! [`app`] 在其上叠加中间件并注入状态。

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

mod fetch;

pub mod health;
pub mod items;
pub mod maintenance;
pub mod notifications;
pub mod profile;
pub mod reservations;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Restaurant API - authentication required
        .merge(items::router())
        // Customer API - authentication required
        .merge(reservations::router())
        // Role-routed API - authentication required
        .merge(notifications::router())
        .merge(profile::router())
        // Maintenance API - public route
        .merge(maintenance::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn app(state: ServerState) -> Router {
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
