use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置 - order relay 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | HEARTBEAT_INTERVAL_SECS | 30 | 推送流心跳间隔(秒) |
/// | SUBSCRIBER_QUEUE_CAPACITY | 256 | 每个订阅者的待发送队列长度 |
/// | PUBLIC_DIR | public | 静态资源目录 (dashboard) |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志文件目录，未设置时只输出到 stdout |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 HEARTBEAT_INTERVAL_SECS=15 cargo run -p crab-relay
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 推送流心跳间隔
    pub heartbeat_interval: Duration,
    /// 每个订阅者的队列容量，写满即视为断开
    pub subscriber_queue_capacity: usize,
    /// Dashboard 静态资源目录
    pub public_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub const DEFAULT_HTTP_PORT: u16 = 3000;
    pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(Self::DEFAULT_HTTP_PORT),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            heartbeat_interval: Duration::from_secs(
                env_parse("HEARTBEAT_INTERVAL_SECS")
                    .filter(|secs| *secs > 0)
                    .unwrap_or(Self::DEFAULT_HEARTBEAT_SECS),
            ),
            subscriber_queue_capacity: env_parse("SUBSCRIBER_QUEUE_CAPACITY")
                .filter(|cap| *cap > 0)
                .unwrap_or(Self::DEFAULT_QUEUE_CAPACITY),
            public_dir: std::env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".into())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        http_port: u16,
        heartbeat_interval: Duration,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.heartbeat_interval = heartbeat_interval;
        config.public_dir = public_dir.into();
        config
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

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
