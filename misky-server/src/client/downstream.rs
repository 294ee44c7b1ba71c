//! 下游 PostgREST 客户端
//!
//! 所有持久化实体都住在下游的托管数据库里；本客户端只做三件事：
//! 表资源读写 (等值过滤)、命名 RPC 调用、错误中继。
//!
//! 每次调用携带固定的服务密钥 (`apikey` 头) 和调用者的原始 Bearer 令牌；
//! 写操作带 `Prefer: return=representation`，变更后的行随响应体返回。
//! 无重试：链条中第一个失败的调用中止其余步骤并上报错误。

use std::fmt::Display;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::Config;
use shared::{AppError, AppResult, ErrorCode};

/// 等值过滤查询构造器
///
/// 生成 PostgREST 查询参数：`select=...`、`col=eq.value`、`order=...`
///
/// # 示例
///
/// ```ignore
/// let query = Select::new()
///     .eq("restaurant_id", restaurant_id)
///     .eq("status", "active")
///     .order("created_at.desc");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    pairs: Vec<(String, String)>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 select 表达式 (默认 `*`；内嵌关联时使用如 `*,item:items(*)`)
    pub fn columns(mut self, expr: &str) -> Self {
        self.pairs.push(("select".into(), expr.into()));
        self
    }

    /// 追加等值过滤: `column=eq.value`
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.pairs.push((column.into(), format!("eq.{}", value)));
        self
    }

    /// 追加排序表达式，如 `created_at.desc`
    pub fn order(mut self, expr: &str) -> Self {
        self.pairs.push(("order".into(), expr.into()));
        self
    }

    fn into_params(mut self) -> Vec<(String, String)> {
        if !self.pairs.iter().any(|(k, _)| k == "select") {
            self.pairs.insert(0, ("select".into(), "*".into()));
        }
        self.pairs
    }
}

/// 下游 PostgREST 客户端
#[derive(Clone, Debug)]
pub struct Downstream {
    http: Client,
    base_url: String,
    service_key: String,
}

impl Downstream {
    /// 构造客户端
    ///
    /// # Panics
    ///
    /// HTTP 客户端构建失败时 panic (仅发生在 TLS 后端初始化失败)
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to build downstream HTTP client");

        Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_key.clone(),
        }
    }

    /// 服务密钥本身可作为 Bearer 令牌 (无认证触发器转发时使用)
    pub fn service_token(&self) -> &str {
        &self.service_key
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, name)
    }

    /// 构造带标准头集的请求
    fn request(&self, method: Method, url: String, token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
    }

    /// SELECT 行 (等值过滤)
    pub async fn select<T: DeserializeOwned>(
        &self,
        token: &str,
        table: &str,
        query: Select,
    ) -> AppResult<Vec<T>> {
        let resp = self
            .request(Method::GET, self.table_url(table), token)
            .query(&query.into_params())
            .send()
            .await
            .map_err(transport_error)?;

        read_rows(resp).await
    }

    /// INSERT 一行，返回下游的 representation
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &str,
        table: &str,
        body: &B,
    ) -> AppResult<Vec<T>> {
        let resp = self
            .request(Method::POST, self.table_url(table), token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        read_rows(resp).await
    }

    /// PATCH 匹配过滤条件的行，返回变更后的行
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        token: &str,
        table: &str,
        query: Select,
        body: &B,
    ) -> AppResult<Vec<T>> {
        let resp = self
            .request(Method::PATCH, self.table_url(table), token)
            .query(&query.into_params())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        read_rows(resp).await
    }

    /// 调用命名 RPC (服务端原子操作，如计数器增减、归档清扫)
    pub async fn rpc<B: Serialize + ?Sized>(
        &self,
        token: &str,
        name: &str,
        args: &B,
    ) -> AppResult<()> {
        let resp = self
            .request(Method::POST, self.rpc_url(name), token)
            .json(args)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(resp).await.map(|_| ())
    }
}

/// 下游非 2xx 响应按状态类别映射到本服务的错误码，原始状态码和
/// 响应体保留在错误 details 里供排障使用
async fn check_status(resp: Response) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
        StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::CONFLICT => ErrorCode::AlreadyExists,
        s if s.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::DownstreamError,
    };

    tracing::warn!(status = %status, "Downstream request failed");
    Err(AppError::downstream(code, status.as_u16(), body))
}

async fn read_rows<T: DeserializeOwned>(resp: Response) -> AppResult<Vec<T>> {
    let resp = check_status(resp).await?;
    resp.json::<Vec<T>>()
        .await
        .map_err(|e| AppError::internal(format!("Invalid downstream response: {}", e)))
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::network(format!("Downstream timeout: {}", e))
    } else {
        AppError::network(format!("Downstream unreachable: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_star() {
        let params = Select::new().into_params();
        assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn test_select_eq_filters() {
        let params = Select::new()
            .eq("restaurant_id", "abc")
            .eq("status", "active")
            .into_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("restaurant_id".to_string(), "eq.abc".to_string()),
                ("status".to_string(), "eq.active".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_explicit_columns_kept() {
        let params = Select::new().columns("*,item:items(*)").into_params();
        assert_eq!(
            params,
            vec![("select".to_string(), "*,item:items(*)".to_string())]
        );
    }

    #[test]
    fn test_select_order() {
        let params = Select::new()
            .eq("read", false)
            .order("created_at.desc")
            .into_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("read".to_string(), "eq.false".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config::with_overrides("http://localhost:9999/", "key", 0);
        let downstream = Downstream::new(&config);
        assert_eq!(
            downstream.table_url("items"),
            "http://localhost:9999/rest/v1/items"
        );
        assert_eq!(
            downstream.rpc_url("increment_num_of_reservations"),
            "http://localhost:9999/rest/v1/rpc/increment_num_of_reservations"
        );
    }
}
