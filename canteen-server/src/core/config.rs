use crate::auth::JwtConfig;
use crate::orders::OrderWindows;
use chrono::Duration;

/// 服务器配置 - 食堂订单服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | canteen.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 |
/// | LOG_DIR | (未设置) | 滚动日志目录 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SELF_CANCEL_WINDOW_SECS | 60 | 自助下单取消窗口(秒) |
/// | ADMIN_ORDER_WINDOW_HOURS | 24 | 代下单取消/申诉窗口(小时) |
///
/// JWT 相关变量 (JWT_SECRET, JWT_ISSUER, JWT_AUDIENCE) 见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/canteen.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 默认日志级别
    pub log_level: String,
    /// 日志目录 (存在时写入按天滚动的文件)
    pub log_dir: Option<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 自助下单的取消窗口 (秒)
    pub self_cancel_window_secs: i64,
    /// 代下单的取消/申诉窗口 (小时)
    pub admin_order_window_hours: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "canteen.db".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            self_cancel_window_secs: env_parse("SELF_CANCEL_WINDOW_SECS", 60),
            admin_order_window_hours: env_parse("ADMIN_ORDER_WINDOW_HOURS", 24),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    /// 取消/申诉窗口
    pub fn order_windows(&self) -> OrderWindows {
        OrderWindows {
            self_cancel: Duration::seconds(self.self_cancel_window_secs),
            admin_order: Duration::hours(self.admin_order_window_hours),
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

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_windows_from_config() {
        let mut config = Config::with_overrides(":memory:", 0);
        config.self_cancel_window_secs = 90;
        config.admin_order_window_hours = 12;

        let windows = config.order_windows();
        assert_eq!(windows.self_cancel, Duration::seconds(90));
        assert_eq!(windows.admin_order, Duration::hours(12));
    }

    #[test]
    fn test_env_parse_falls_back() {
        assert_eq!(env_parse("CANTEEN_TEST_UNSET_VARIABLE", 42u16), 42);
    }
}
