use shared::{AppError, AppResult};

/// 服务器配置 - 下游绑定和运行参数
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SUPABASE_URL | (必填) | 下游 REST API 基地址 |
/// | SUPABASE_KEY | (必填) | 下游服务密钥 (apikey 头) |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 下游请求超时(毫秒) |
///
/// 下游绑定在进程启动时一次性解析为不可变配置；`SUPABASE_URL` 或
/// `SUPABASE_KEY` 缺失时启动直接失败。
///
/// # 示例
///
/// ```ignore
/// SUPABASE_URL=https://xyz.supabase.co SUPABASE_KEY=... cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 下游 REST API 基地址
    pub supabase_url: String,
    /// 下游服务密钥
    pub supabase_key: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 下游请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 下游绑定缺失时返回 [`shared::ErrorCode::ConfigError`]
    pub fn from_env() -> AppResult<Self> {
        let supabase_url = std::env::var("SUPABASE_URL")
            .map_err(|_| AppError::config("Missing SUPABASE_URL in environment"))?;
        let supabase_key = std::env::var("SUPABASE_KEY")
            .map_err(|_| AppError::config("Missing SUPABASE_KEY in environment"))?;

        Ok(Self {
            supabase_url,
            supabase_key,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        })
    }

    /// 使用自定义下游绑定构造配置
    ///
    /// 常用于测试场景 (指向本地 mock 下游)
    pub fn with_overrides(
        supabase_url: impl Into<String>,
        supabase_key: impl Into<String>,
        http_port: u16,
    ) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            supabase_key: supabase_key.into(),
            http_port,
            environment: "test".into(),
            request_timeout_ms: 30000,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
