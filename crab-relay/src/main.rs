use crab_relay::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env 优先于默认值
    dotenv::dotenv().ok();

    // 2. 加载配置 + 日志
    let config = Config::from_env();
    setup_environment(&config);

    print_banner();

    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        heartbeat_secs = config.heartbeat_interval.as_secs(),
        "🦀 Crab Relay starting..."
    );

    // 3. 启动 HTTP 服务器
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
