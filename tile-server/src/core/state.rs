use std::sync::Arc;

use crate::admin::{AdminService, demo};
use crate::auth::SessionStore;
use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::editor::EditorService;
use crate::orders::{CustomerOrderService, OrderStorage, OrderStore};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一次的成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<OrderStore> | 订单集合 + 变更广播 |
/// | orders | CustomerOrderService | 顾客视角的订单操作 |
/// | editor | Arc<EditorService> | 编辑器会话 |
/// | checkout | CheckoutService | 结账 |
/// | admin | AdminService | 管理后台 |
/// | sessions | Arc<SessionStore> | 登录会话 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单集合
    pub store: Arc<OrderStore>,
    /// 顾客订单服务
    pub orders: CustomerOrderService,
    /// 编辑器会话
    pub editor: Arc<EditorService>,
    /// 结账服务
    pub checkout: CheckoutService,
    /// 管理后台
    pub admin: AdminService,
    /// 登录会话
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    /// 由已打开的存储组装状态
    pub fn with_storage(config: Config, storage: OrderStorage) -> Result<Self, AppError> {
        let pricing = config.pricing();
        let store = OrderStore::open(storage, pricing.clone())?;
        let orders = CustomerOrderService::new(store.clone());
        let editor = EditorService::new(orders.clone(), pricing);
        let checkout = CheckoutService::new(store.clone(), editor.clone());
        let admin = AdminService::new(store.clone());

        Ok(Self {
            config,
            store,
            orders,
            editor,
            checkout,
            admin,
            sessions: Arc::new(SessionStore::new()),
        })
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/orders.redb)
    /// 3. 各服务
    /// 4. 演示订单 (SEED_DEMO_ORDERS=true 且库为空)
    ///
    /// 已存储的订单无法解析时返回错误，不会覆盖原数据
    pub fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure().map_err(|e| {
            AppError::internal(format!("Failed to create work directory structure: {e}"))
        })?;

        let db_path = config.database_path();
        let storage = OrderStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Order database opened");

        let state = Self::with_storage(config.clone(), storage)?;

        if config.seed_demo_orders {
            demo::seed_if_empty(&state.store)?;
        }

        Ok(state)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
