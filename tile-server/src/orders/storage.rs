//! 基于 redb 的订单集合存储
//!
//! # 表结构
//!
//! | 表名 | Key | Value | 用途 |
//! |------|-----|-------|------|
//! | `storage` | `&str` | JSON 字节 | 命名文档 (`orders` = 整个订单集合) |
//!
//! 集合以单个 JSON 数组存于一个 key 下，每次修改整份重写。
//! key 不存在视为空集合；值存在但无法解析时报错，绝不静默丢弃。

use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use shared::error::{AppError, ErrorCode};
use shared::models::Order;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// 键值表: key = 文档名, value = JSON 字节
const STORAGE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("storage");

/// 存放全部订单 JSON 数组的 key
pub const ORDERS_KEY: &str = "orders";

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(e) => AppError::with_message(
                ErrorCode::StorageError,
                format!("Stored orders are unreadable: {e}"),
            ),
            other => AppError::storage(other.to_string()),
        }
    }
}

/// 基于 redb 的订单存储
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// 打开或创建数据库
    ///
    /// `commit()` 返回即已持久化。
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// 内存数据库 (仅测试)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STORAGE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// 读取原始文档
    pub fn get_raw(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORAGE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    /// 写入原始文档，覆盖旧值
    pub fn put_raw(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STORAGE_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// 加载整个订单集合
    pub fn load_orders(&self) -> StorageResult<Vec<Order>> {
        match self.get_raw(ORDERS_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// 覆盖整个订单集合
    pub fn save_orders(&self, orders: &[Order]) -> StorageResult<()> {
        let value = serde_json::to_vec(orders)?;
        self.put_raw(ORDERS_KEY, &value)
    }

    /// 已存文档数
    pub fn document_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORAGE_TABLE)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::models::{ShippingDetails, TileItem};
    use shared::order::OrderStatus;

    fn create_test_order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            customer_id: "c-1".to_string(),
            created_at: Utc::now(),
            status: OrderStatus::New,
            items: vec![TileItem::plain(1), TileItem::plain(2)],
            total: Decimal::from(400),
            currency: "THB".to_string(),
            shipping: ShippingDetails::default(),
        }
    }

    #[test]
    fn test_missing_key_is_empty() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert!(storage.load_orders().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let orders = vec![create_test_order("ORD-0001-AA"), create_test_order("ORD-0002-BB")];
        storage.save_orders(&orders).unwrap();

        let loaded = storage.load_orders().unwrap();
        assert_eq!(loaded, orders);
        assert_eq!(storage.document_count().unwrap(), 1);
    }

    #[test]
    fn test_save_replaces_collection() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage
            .save_orders(&[create_test_order("ORD-0001-AA"), create_test_order("ORD-0002-BB")])
            .unwrap();
        storage.save_orders(&[create_test_order("ORD-0003-CC")]).unwrap();

        let loaded = storage.load_orders().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "ORD-0003-CC");
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_raw(ORDERS_KEY, b"{not json").unwrap();

        let err = storage.load_orders().unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));

        let app_err: AppError = err.into();
        assert_eq!(app_err.code, ErrorCode::StorageError);
    }

    #[test]
    fn test_reopen_file_keeps_orders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");
        {
            let storage = OrderStorage::open(&path).unwrap();
            storage.save_orders(&[create_test_order("ORD-0001-AA")]).unwrap();
        }
        let storage = OrderStorage::open(&path).unwrap();
        assert_eq!(storage.load_orders().unwrap()[0].id, "ORD-0001-AA");
    }
}
