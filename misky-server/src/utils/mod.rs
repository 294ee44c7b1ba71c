//! 工具模块 - 日志等通用设施
//!
//! 错误和响应类型统一放在 `shared` crate，这里只保留日志初始化。

pub mod logger;

pub use logger::{init_logger, init_logger_with_file};
