use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::error::{AppError, AppResult};
use shared::models::{Lead, LeadCreate};

use crate::analytics::AnalyticsService;
use crate::core::Config;
use crate::export::{
    self, ImportOutcome, import_products, leads_file_name, leads_to_csv, products_file_name,
    products_to_csv,
};
use crate::notify::{LogNotifier, SignupNotifier};
use crate::storage::{KvStore, RedbKvStore};
use crate::store::{DealStore, LeadStore, OrderStore, ProductStore};
use crate::utils::{Clock, SystemClock};

/// 应用上下文 - 持有所有 store 与服务的单例引用
///
/// 进程启动时构造一次，通过引用 (或 `Arc`) 传给使用方。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | kv | Arc<dyn KvStore> | 持久化槽位 |
/// | products | Arc<ProductStore> | 商品目录 |
/// | orders | Arc<OrderStore> | 订单台账 |
/// | deals | Arc<DealStore> | 限时优惠 |
/// | leads | Arc<LeadStore> | 注册客户 |
/// | analytics | AnalyticsService | 仪表盘统计 |
/// | notifier | Arc<dyn SignupNotifier> | 注册通知 |
/// | clock | Arc<dyn Clock> | 时间源 |
#[derive(Clone)]
pub struct AppContext {
    pub kv: Arc<dyn KvStore>,
    pub products: Arc<ProductStore>,
    pub orders: Arc<OrderStore>,
    pub deals: Arc<DealStore>,
    pub leads: Arc<LeadStore>,
    pub analytics: AnalyticsService,
    pub notifier: Arc<dyn SignupNotifier>,
    pub clock: Arc<dyn Clock>,
    export_dir: PathBuf,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("products", &self.products)
            .field("orders", &self.orders)
            .field("deals", &self.deals)
            .field("leads", &self.leads)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}

impl AppContext {
    /// 初始化应用上下文
    ///
    /// 按顺序:
    /// 1. 创建工作目录，打开 redb 数据库
    /// 2. 加载商品 (订单种子数据依赖商品目录)
    /// 3. 加载订单、优惠、客户
    /// 4. 构建统计服务和通知器
    pub fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::config(format!("Failed to create work dir {}: {}", config.work_dir, e))
        })?;

        let db_path = config.db_path();
        let kv = RedbKvStore::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Storage opened");

        let mut context = Self::with_kv(Arc::new(kv), Arc::new(SystemClock));
        context.export_dir = config.export_path();
        Ok(context)
    }

    /// 使用指定存储与时钟构造 (测试场景)
    pub fn with_kv(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let products = Arc::new(ProductStore::load(kv.clone(), clock.clone()));
        let orders = Arc::new(OrderStore::load(
            kv.clone(),
            clock.clone(),
            &products.get_all(),
        ));
        let deals = Arc::new(DealStore::load(kv.clone(), clock.clone()));
        let leads = Arc::new(LeadStore::load(kv.clone(), clock.clone()));
        let analytics = AnalyticsService::new(products.clone(), orders.clone());

        tracing::debug!(
            products = products.get_all().len(),
            orders = orders.get_all().len(),
            deals = deals.get_all().len(),
            leads = leads.total_count(),
            "Stores loaded"
        );

        Self {
            kv,
            products,
            orders,
            deals,
            leads,
            analytics,
            notifier: Arc::new(LogNotifier),
            clock,
            export_dir: PathBuf::from("exports"),
        }
    }

    /// 替换注册通知器
    pub fn with_notifier(mut self, notifier: Arc<dyn SignupNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 替换导出目录
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    // ========== 业务流程 ==========

    /// 客户注册: 先写入 (按邮箱 upsert)，再发送欢迎通知
    ///
    /// 通知失败只记录日志，不影响已保存的客户记录
    pub fn register_customer(&self, data: LeadCreate) -> Lead {
        let lead = self.leads.add_lead(data);
        if let Err(e) = self.notifier.send_welcome(&lead) {
            tracing::warn!(
                customer_id = lead.customer_id,
                error = %e,
                "Welcome notification failed"
            );
        }
        lead
    }

    /// 导出商品表
    pub fn export_products(&self) -> AppResult<PathBuf> {
        let csv = products_to_csv(&self.products.get_all())?;
        export::write_export(
            &self.export_dir,
            &products_file_name(self.clock.today()),
            &csv,
        )
    }

    /// 导出客户表 (最新注册在前)
    pub fn export_leads(&self) -> AppResult<PathBuf> {
        let csv = leads_to_csv(&self.leads.get_all())?;
        export::write_export(&self.export_dir, &leads_file_name(self.clock.today()), &csv)
    }

    /// 导入商品表: 合法行一次性写入，非法行原样返回
    ///
    /// 文件本身无法解析时返回错误，不写入任何行
    pub fn import_products(&self, input: &str) -> AppResult<ImportOutcome> {
        let outcome = import_products(input)?;
        let created = self.products.add_many(outcome.valid.clone());
        tracing::info!(
            imported = created.len(),
            rejected = outcome.rejected.len(),
            "Product sheet imported"
        );
        Ok(outcome)
    }
}
