//! 订单模块
//!
//! - [`storage`]: redb 键值存储，整份集合持久化
//! - [`store`]: 内存集合，写穿持久化，变更广播
//! - [`service`]: 顾客视图，所有权与编辑锁检查

pub mod service;
pub mod storage;
pub mod store;

pub use service::{CustomerOrderService, OrderView};
pub use storage::{OrderStorage, StorageError, StorageResult};
pub use store::OrderStore;
