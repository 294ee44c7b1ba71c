//! 认证模块
//!
//! 从 Bearer 令牌提取调用者身份：
//! - [`decode_subject`] - 解码令牌的 subject claim (不验证签名)
//! - [`CurrentUser`] - 当前用户上下文 (axum 提取器)

pub mod extractor;
pub mod token;

pub use extractor::CurrentUser;
pub use token::{Claims, decode_subject, extract_bearer};
