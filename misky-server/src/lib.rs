//! Misky Backend - 剩余食品预订平台的 BFF 服务
//!
//! # 架构概述
//!
//! 本服务是一个薄 BFF (backend-for-frontend)：所有持久化状态都在下游的
//! PostgREST 风格 REST API (Supabase) 中，本进程只负责：
//!
//! - **身份提取** (`auth`): 从 Bearer 令牌解码 subject claim (不验证签名)
//! - **授权检查** (`api`): 所有权比较 (餐厅拥有食品、顾客拥有预订)
//! - **下游编排** (`client`): 每个请求一条严格顺序的下游调用链，无重试、
//!   无事务、无并发扇出
//!
//! # 模块结构
//!
//! ```text
//! misky-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 令牌解码、CurrentUser 提取器
//! ├── client/        # 下游 PostgREST 客户端
//! ├── models.rs      # 实体类型 (Item, Reservation, Notification, Profile)
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志等工具
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod core;
pub mod models;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use client::Downstream;
pub use core::{Config, Server, ServerState};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 日志)
///
/// 必须在 [`Config::from_env`] 之前调用，否则 .env 中的配置不生效
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(level.as_deref(), dir.as_deref());
}
