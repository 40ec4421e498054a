//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{ExportService, IconService, ServiceContext, VaultService};
use crate::traits::KeyValueStore;
use crate::types::{Account, AddItemRequest};

// ===== MockKeyValueStore =====

pub struct MockKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    /// 如果 Some，get/list 时返回此错误（用于测试读取失败路径）
    read_error: RwLock<Option<String>>,
    /// 如果 Some，set/delete 时返回此错误（用于测试写入失败路径）
    write_error: RwLock<Option<String>>,
    /// 成功写入次数
    writes: RwLock<usize>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            read_error: RwLock::new(None),
            write_error: RwLock::new(None),
            writes: RwLock::new(0),
        }
    }

    pub async fn set_read_error(&self, err: Option<String>) {
        *self.read_error.write().await = err;
    }

    pub async fn set_write_error(&self, err: Option<String>) {
        *self.write_error.write().await = err;
    }

    pub async fn write_count(&self) -> usize {
        *self.writes.read().await
    }

    async fn check_read(&self) -> CoreResult<()> {
        match *self.read_error.read().await {
            Some(ref msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }

    async fn check_write(&self) -> CoreResult<()> {
        if let Some(ref msg) = *self.write_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        *self.writes.write().await += 1;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        self.check_read().await?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.check_write().await?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CoreResult<()> {
        self.check_write().await?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        self.check_read().await?;
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockKeyValueStore>) {
    let store = Arc::new(MockKeyValueStore::new());
    let ctx = Arc::new(ServiceContext::new(store.clone()));
    (ctx, store)
}

/// 创建测试用 `VaultService`
pub fn create_test_vault_service(user: &str) -> (VaultService, Arc<MockKeyValueStore>) {
    let (ctx, store) = create_test_context();
    (VaultService::new(ctx, user), store)
}

/// 创建测试用 `IconService`
pub fn create_test_icon_service(user: &str) -> (IconService, Arc<MockKeyValueStore>) {
    let (ctx, store) = create_test_context();
    (IconService::new(ctx, user), store)
}

/// 创建测试用 `ExportService`
pub fn create_test_export_service() -> (ExportService, Arc<MockKeyValueStore>) {
    let (ctx, store) = create_test_context();
    (ExportService::new(ctx), store)
}

/// 新增条目请求（放入分类的默认子分类）
pub fn sample_add_request(category_id: &str) -> AddItemRequest {
    AddItemRequest {
        category_id: category_id.to_string(),
        subcategory_id: None,
        website: "GitHub".to_string(),
        url: None,
        account: Account::new("octocat", "Sh0rt!", "work"),
    }
}
