//! 下游客户端模块
//!
//! 面向 PostgREST 风格 REST API 的 HTTP 客户端：
//! - [`Downstream`] - 表读写和 RPC 调用
//! - [`Select`] - 等值过滤查询构造器

pub mod downstream;

pub use downstream::{Downstream, Select};
