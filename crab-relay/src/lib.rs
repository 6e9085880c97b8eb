//! Crab Relay - 外卖订单中转服务
//!
//! # 架构概述
//!
//! 外部订单来源通过 webhook 推送订单，relay 保存在内存中，
//! 并实时推送给所有打开的 admin dashboard：
//!
//! - **订单存储** (`orders`): 内存订单列表，最新在前
//! - **实时推送** (`live`): 订阅者注册表 + SSE 推送流
//! - **HTTP API** (`api`): webhook、admin、health 路由
//!
//! # 模块结构
//!
//! ```text
//! crab-relay/src/
//! ├── core/          # 配置、状态、时钟、服务器
//! ├── orders/        # 订单存储
//! ├── live/          # Broadcaster、LiveStream
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod core;
pub mod live;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Clock, Config, FixedClock, Server, ServerState, SystemClock};
pub use live::{Broadcaster, LiveStream};
pub use orders::OrderStore;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 按配置初始化日志
pub fn setup_environment(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
    ____       __
   / __ \___  / /___ ___  __
  / /_/ / _ \/ / __ `/ / / /
 / _, _/  __/ / /_/ / /_/ /
/_/ |_|\___/_/\__,_/\__, /
                   /____/
    "#
    );
}
