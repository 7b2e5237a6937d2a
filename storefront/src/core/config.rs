use std::path::PathBuf;

/// 应用配置 - 店面数据层的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 |
/// | DB_FILE | storefront.redb | 数据库文件名 (位于工作目录下) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | 控制台输出 JSON 日志 |
/// | EXPORT_DIR | <WORK_DIR>/exports | 表格导出目录 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/storefront LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志、导出文件
    pub work_dir: String,
    /// redb 数据库文件名
    pub db_file: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 是否输出 JSON 格式日志
    pub log_json: bool,
    /// 导出目录，未设置时为 `<work_dir>/exports`
    pub export_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            db_file: std::env::var("DB_FILE").unwrap_or_else(|_| "storefront.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            export_dir: std::env::var("EXPORT_DIR").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用指定工作目录
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.export_dir = None;
        config
    }

    /// 数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 导出目录
    pub fn export_path(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.work_dir).join("exports"),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_work_dir() {
        let config = Config::with_work_dir("/tmp/sf");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/sf").join(&config.db_file));
        assert_eq!(config.export_path(), PathBuf::from("/tmp/sf/exports"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/sf/logs"));
    }

    #[test]
    fn test_environment_flags() {
        let mut config = Config::with_work_dir("/tmp/sf");
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());
    }
}
