use crate::client::Downstream;
use crate::core::Config;

/// 服务器状态 - 每个请求共享的不可变引用
///
/// 本服务没有自己的持久化状态：除配置和下游客户端外不持有任何东西，
/// 因此没有内部锁。所有一致性问题都来自下游多次调用之间缺少事务边界。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | downstream | Downstream | 下游 PostgREST 客户端 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 下游 PostgREST 客户端
    pub downstream: Downstream,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// # Panics
    ///
    /// HTTP 客户端构建失败时 panic (仅发生在 TLS 后端初始化失败)
    pub fn initialize(config: &Config) -> Self {
        let downstream = Downstream::new(config);

        Self {
            config: config.clone(),
            downstream,
        }
    }
}
