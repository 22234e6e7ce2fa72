//! Tile Server - 照片瓷砖店后端
//!
//! # 架构概述
//!
//! - **订单** (`orders`): redb 持久化的订单集合，写穿 + 变更广播
//! - **编辑器** (`editor`): 每位顾客一个编辑会话 (上传、裁剪、滤镜)
//! - **结账** (`checkout`): 编辑会话 → 新订单
//! - **管理后台** (`admin`): 按状态分栏、搜索、任意改状态
//! - **登录** (`auth`): 模拟登录令牌
//! - **HTTP API** (`api`): RESTful 接口 + SSE
//!
//! # 模块结构
//!
//! ```text
//! tile-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 会话、中间件
//! ├── orders/        # 存储、订单集合、顾客服务
//! ├── editor/        # 编辑器状态机
//! ├── admin/         # 管理后台查询、演示数据
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod editor;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentCustomer, SessionStore};
pub use crate::core::{Config, Server, ServerState, build_router};
pub use orders::{OrderStorage, OrderStore};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建日志目录 (LOG_DIR)
/// 3. 初始化日志 (生产环境使用 JSON 格式)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  _______ _ _
 |__   __(_) |
    | |   _| | ___
    | |  | | |/ _ \
    | |  | | |  __/
    |_|  |_|_|\___|
    "#
    );
}
