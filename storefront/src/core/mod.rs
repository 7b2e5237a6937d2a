//! 核心模块 - 配置与应用上下文
//!
//! # 模块结构
//!
//! - [`Config`] - 应用配置
//! - [`AppContext`] - 应用上下文 (store 与服务单例)

pub mod config;
pub mod context;

pub use config::Config;
pub use context::AppContext;
