//! OrderStore - 订单集合与变更广播
//!
//! # 写路径
//!
//! ```text
//! mutation(args)
//!     ├─ 1. 获取写锁
//!     ├─ 2. 在副本上执行检查与修改 (检查失败则原样返回)
//!     ├─ 3. 持久化副本 (整份文档)
//!     ├─ 4. 替换内存集合
//!     ├─ 5. 分配序号并广播 StoreEvent
//!     └─ 6. 释放写锁
//! ```
//!
//! 写入失败时，存储文档和内存集合都保持不变。序号在写锁内分配，
//! 因此事件顺序与提交顺序一致。

use super::storage::OrderStorage;
use chrono::Utc;
use parking_lot::RwLock;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MAX_TILES, Order, ShippingDetails, TileItem};
use shared::order::{OrderStatus, Pricing, StoreEvent, StoreEventKind};
use shared::util::{generate_order_id, now_millis};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Attempts at drawing an unused order id before giving up
const MAX_ID_ATTEMPTS: usize = 32;

/// 订单集合
///
/// 内存中的 `Vec<Order>` (最新在前) 是读取的唯一来源，每次修改都写穿到
/// [`OrderStorage`]。
pub struct OrderStore {
    storage: OrderStorage,
    orders: RwLock<Vec<Order>>,
    pricing: Pricing,
    event_tx: broadcast::Sender<StoreEvent>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders", &self.orders.read().len())
            .field("pricing", &self.pricing)
            .field("event_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl OrderStore {
    /// 从存储加载集合
    ///
    /// 已存储的文档无法解析时返回错误。
    pub fn open(storage: OrderStorage, pricing: Pricing) -> AppResult<Arc<Self>> {
        let mut orders = storage.load_orders()?;
        sort_newest_first(&mut orders);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!(count = orders.len(), "Order store loaded");

        Ok(Arc::new(Self {
            storage,
            orders: RwLock::new(orders),
            pricing,
            event_tx,
            sequence: AtomicU64::new(0),
        }))
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// 订阅变更通知
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// 全部订单，最新在前
    pub fn list(&self) -> Vec<Order> {
        self.orders.read().clone()
    }

    /// 某位顾客的订单，最新在前
    pub fn list_for(&self, customer_id: &str) -> Vec<Order> {
        self.orders
            .read()
            .iter()
            .filter(|o| o.is_owned_by(customer_id))
            .cloned()
            .collect()
    }

    pub fn get(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .read()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| AppError::order_not_found(order_id))
    }

    /// 新建订单 (状态 `new`)
    pub fn create(
        &self,
        customer_id: &str,
        items: Vec<TileItem>,
        shipping: ShippingDetails,
    ) -> AppResult<Order> {
        validate_items(&items)?;

        let mut guard = self.orders.write();
        let order = Order {
            id: unused_order_id(&guard)?,
            customer_id: customer_id.to_string(),
            created_at: Utc::now(),
            status: OrderStatus::New,
            total: self.pricing.total_for(items.len()),
            currency: self.pricing.currency.clone(),
            items,
            shipping,
        };

        let mut next = Vec::with_capacity(guard.len() + 1);
        next.push(order.clone());
        next.extend(guard.iter().cloned());
        self.storage.save_orders(&next)?;
        *guard = next;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            tiles = order.tiles_count(),
            total = %order.total,
            "Order created"
        );
        self.broadcast(
            &order,
            StoreEventKind::Created {
                tiles_count: order.tiles_count(),
            },
        );
        Ok(order)
    }

    /// 替换订单明细并重算总价，不检查编辑锁
    pub fn update_items(&self, order_id: &str, items: Vec<TileItem>) -> AppResult<Order> {
        self.update_items_checked(order_id, items, |_| Ok(()))
    }

    /// 替换订单明细，`check` 在写锁内针对当前订单执行
    pub fn update_items_checked(
        &self,
        order_id: &str,
        items: Vec<TileItem>,
        check: impl FnOnce(&Order) -> AppResult<()>,
    ) -> AppResult<Order> {
        validate_items(&items)?;
        let total = self.pricing.total_for(items.len());

        self.mutate(order_id, |order| {
            check(order)?;
            order.items = items;
            order.total = total;
            tracing::info!(
                order_id = %order.id,
                tiles = order.tiles_count(),
                total = %order.total,
                "Order items updated"
            );
            Ok(Some(StoreEventKind::ItemsUpdated {
                tiles_count: order.tiles_count(),
            }))
        })
    }

    /// 直接覆盖状态，无迁移规则
    pub fn set_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        self.set_status_checked(order_id, status, |_| Ok(()))
    }

    /// 覆盖状态，`check` 在写锁内针对当前订单执行
    ///
    /// 状态未变化时不写入也不广播。
    pub fn set_status_checked(
        &self,
        order_id: &str,
        status: OrderStatus,
        check: impl FnOnce(&Order) -> AppResult<()>,
    ) -> AppResult<Order> {
        self.mutate(order_id, |order| {
            check(order)?;
            let from = order.status;
            if from == status {
                return Ok(None);
            }
            order.status = status;
            tracing::info!(order_id = %order.id, from = %from, to = %status, "Order status changed");
            Ok(Some(StoreEventKind::StatusChanged { from, to: status }))
        })
    }

    /// 取消订单；重复取消不产生变化
    pub fn cancel(&self, order_id: &str) -> AppResult<Order> {
        self.set_status(order_id, OrderStatus::Cancelled)
    }

    /// 原样追加订单 (演示数据)
    pub fn insert_all(&self, orders: Vec<Order>) -> AppResult<usize> {
        let count = orders.len();
        {
            let mut guard = self.orders.write();
            let mut next = guard.clone();
            next.extend(orders);
            sort_newest_first(&mut next);
            self.storage.save_orders(&next)?;
            *guard = next;
        }
        tracing::info!(count, "Orders inserted");
        Ok(count)
    }

    /// 在写锁内对副本执行 `f`
    ///
    /// `f` 返回 `Some(kind)` 表示有变化：持久化、替换并广播。
    /// 返回 `None` 或错误时集合不变。
    fn mutate(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut Order) -> AppResult<Option<StoreEventKind>>,
    ) -> AppResult<Order> {
        let mut guard = self.orders.write();
        let index = guard
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| AppError::order_not_found(order_id))?;

        let mut next = guard.clone();
        let Some(kind) = f(&mut next[index])? else {
            return Ok(guard[index].clone());
        };
        self.storage.save_orders(&next)?;
        *guard = next;

        let order = guard[index].clone();
        self.broadcast(&order, kind);
        Ok(order)
    }

    /// 必须在持有写锁时调用
    fn broadcast(&self, order: &Order, kind: StoreEventKind) {
        let event = StoreEvent {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            timestamp: now_millis(),
            order_id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            kind,
        };
        if self.event_tx.send(event).is_err() {
            tracing::trace!("No store event subscribers");
        }
    }
}

/// 订单明细校验
///
/// 非空，最多 [`MAX_TILES`] 张，全部已裁剪，id 不重复。
pub fn validate_items(items: &[TileItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if items.len() > MAX_TILES {
        return Err(
            AppError::validation(format!("An order holds at most {MAX_TILES} tiles"))
                .with_detail("items", items.len()),
        );
    }
    if let Some(item) = items.iter().find(|i| !i.is_cropped) {
        return Err(AppError::validation("Every tile must be cropped").with_detail("tile_id", item.id));
    }
    let mut seen = HashSet::with_capacity(items.len());
    if let Some(item) = items.iter().find(|i| !seen.insert(i.id)) {
        return Err(AppError::validation("Duplicate tile id").with_detail("tile_id", item.id));
    }
    Ok(())
}

fn unused_order_id(orders: &[Order]) -> AppResult<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate_order_id(&mut rng);
        if !orders.iter().any(|o| o.id == id) {
            return Ok(id);
        }
    }
    Err(AppError::internal("Could not allocate an order id"))
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
