//! PremiumVerse Storefront - 订阅商品店面的数据层与统计
//!
//! # 架构概述
//!
//! 进程内的持久化 store 与只读统计服务：
//!
//! - **存储** (`storage`): redb 键值槽位，每个 store 独占一个槽位
//! - **Store** (`store`): 商品、订单、优惠、客户四个持久化集合，变更即写盘并通知订阅者
//! - **统计** (`analytics`): 仪表盘、销售趋势、品类收入、利润分布
//! - **导出** (`export`): CSV 表格导出 / 商品导入
//! - **通知** (`notify`): 注册欢迎通知
//! - **核心** (`core`): 配置与应用上下文
//!
//! # 模块结构
//!
//! ```text
//! storefront/src/
//! ├── core/          # 配置、应用上下文
//! ├── storage/       # KvStore trait, redb / 内存实现
//! ├── store/         # 持久化集合与四个 store
//! ├── analytics/     # 统计服务与展示格式化
//! ├── export/        # CSV 导出 / 导入
//! ├── notify/        # 注册通知
//! └── utils/         # 日志、时间
//! ```

pub mod analytics;
pub mod core;
pub mod export;
pub mod notify;
pub mod storage;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use analytics::AnalyticsService;
pub use core::{AppContext, Config};
pub use storage::{KvStore, MemoryKvStore, RedbKvStore, StorageError};
pub use store::{DealStore, LeadStore, OrderStore, ProductStore, Subscription};

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，创建工作目录，初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    let log_dir = log_dir.to_string_lossy();
    let file_dir = if config.is_development() {
        None
    } else {
        Some(log_dir.as_ref())
    };
    init_logger_with_file(&config.log_level, config.log_json, file_dir)?;

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____                       _
   / __ \________  ____ ___  (_)_  ______ ___
  / /_/ / ___/ _ \/ __ `__ \/ / / / / __ `__ \
 / ____/ /  /  __/ / / / / / / /_/ / / / / / /
/_/   /_/   \___/_/ /_/ /_/_/\__,_/_/ /_/ /_/
    _    __
   | |  / /__  _____________
   | | / / _ \/ ___/ ___/ _ \
   | |/ /  __/ /  (__  )  __/
   |___/\___/_/  /____/\___/
    "#
    );
}
