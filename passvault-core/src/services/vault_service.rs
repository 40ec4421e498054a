//! 密码树服务
//!
//! 持有当前用户的可见密码树，并负责其加载与持久化。
//! 变更流程：在副本上应用变更 → 写入存储 → 写入成功后才替换可见树。

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{passwords_key, ServiceContext};
use crate::tree::{self, Applied, Mutation};
use crate::types::{AddItemRequest, EditItemRequest, SecurityOverview, Vault};

/// 密码树服务（每个登录用户一个实例）
pub struct VaultService {
    ctx: Arc<ServiceContext>,
    user: String,
    /// 文档缺失或损坏时是否写入示例数据
    seed_sample_data: bool,
    current: RwLock<Vault>,
}

impl VaultService {
    /// 创建密码树服务实例（尚未加载，可见树为空）
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, user: impl Into<String>) -> Self {
        Self {
            ctx,
            user: user.into(),
            seed_sample_data: true,
            current: RwLock::new(Vault::default()),
        }
    }

    /// 设置是否写入示例数据
    #[must_use]
    pub fn with_seed_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }

    /// 当前用户名
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// 从存储加载密码树
    ///
    /// 文档缺失或无法解析时写入初始数据（示例数据或空树）。
    /// 存储读取失败时只在内存中使用初始数据，不写回存储，
    /// 避免覆盖远端可能仍然存在的文档。
    pub async fn load(&self) -> CoreResult<Vault> {
        let key = passwords_key(&self.user);
        let stored = match self.ctx.kv_store().get(&key).await {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!(
                    "Failed to read password tree for {}, using an unsaved tree: {e}",
                    self.user
                );
                let vault = self.initial_tree();
                *self.current.write().await = vault.clone();
                return Ok(vault);
            }
        };

        let vault = match stored.as_deref().map(Vault::from_json) {
            Some(Ok(vault)) => {
                log::info!(
                    "Loaded password tree for {}: {} categories",
                    self.user,
                    vault.categories.len()
                );
                vault
            }
            Some(Err(e)) => {
                log::warn!("Stored password tree for {} is malformed: {e}", self.user);
                self.seed(&key).await?
            }
            None => self.seed(&key).await?,
        };

        *self.current.write().await = vault.clone();
        Ok(vault)
    }

    fn initial_tree(&self) -> Vault {
        if self.seed_sample_data {
            Vault::sample()
        } else {
            Vault::default()
        }
    }

    async fn seed(&self, key: &str) -> CoreResult<Vault> {
        if !self.seed_sample_data {
            log::info!("No password tree for {}, starting empty", self.user);
            return Ok(Vault::default());
        }

        let vault = self.initial_tree();
        self.ctx.kv_store().set(key, &vault.to_json()?).await?;
        log::info!("Seeded sample password tree for {}", self.user);
        Ok(vault)
    }

    /// 当前可见树的副本
    pub async fn snapshot(&self) -> Vault {
        self.current.read().await.clone()
    }

    /// 应用变更
    ///
    /// 持久化失败时可见树不变并返回 `StorageError`。
    /// 写锁贯穿整个持久化过程，同一服务上的写操作串行执行。
    pub async fn apply(&self, mutation: Mutation) -> CoreResult<Applied> {
        let op = mutation.name();
        let mut current = self.current.write().await;

        let applied = tree::apply(&current, mutation).inspect_err(|e| log_failure(op, e))?;

        let json = applied.vault.to_json()?;
        self.ctx
            .kv_store()
            .set(&passwords_key(&self.user), &json)
            .await
            .inspect_err(|e| log_failure(op, e))?;

        *current = applied.vault.clone();
        log::debug!("Applied {op} for {}", self.user);
        Ok(applied)
    }

    /// 按搜索词过滤当前树
    pub async fn search(&self, term: &str) -> Vault {
        let current = self.current.read().await;
        tree::filter_by_search_term(&current, term).into_owned()
    }

    /// 当前树的安全总览
    pub async fn security_overview(&self) -> SecurityOverview {
        tree::aggregate_security(&*self.current.read().await)
    }

    // ===== 便捷方法 =====

    /// 新增条目，返回新条目 ID
    pub async fn add_item(&self, request: AddItemRequest) -> CoreResult<String> {
        let applied = self.apply(Mutation::AddItem(request)).await?;
        applied
            .created_id
            .ok_or_else(|| CoreError::StorageError("Created item id missing".to_string()))
    }

    /// 编辑条目
    pub async fn edit_item(&self, request: EditItemRequest) -> CoreResult<Vault> {
        Ok(self.apply(Mutation::EditItem(request)).await?.vault)
    }

    /// 删除账户
    pub async fn delete_account(&self, item_id: &str, account_index: usize) -> CoreResult<Vault> {
        let mutation = Mutation::DeleteAccount {
            item_id: item_id.to_string(),
            account_index,
        };
        Ok(self.apply(mutation).await?.vault)
    }

    /// 删除条目
    pub async fn delete_item(&self, item_id: &str) -> CoreResult<Vault> {
        let mutation = Mutation::DeleteItem {
            item_id: item_id.to_string(),
        };
        Ok(self.apply(mutation).await?.vault)
    }
}

fn log_failure(op: &str, e: &CoreError) {
    if e.is_expected() {
        log::warn!("{op} rejected: {e}");
    } else {
        log::error!("{op} failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_vault_service, sample_add_request};
    use crate::traits::KeyValueStore;
    use crate::types::AccountField;

    #[tokio::test]
    async fn load_seeds_missing_document() {
        let (svc, store) = create_test_vault_service("alice");

        let vault = svc.load().await.unwrap();
        assert_eq!(vault, Vault::sample());

        let stored = store.get("passwords_alice").await.unwrap().unwrap();
        assert_eq!(Vault::from_json(&stored).unwrap(), Vault::sample());
    }

    #[tokio::test]
    async fn load_replaces_malformed_document() {
        let (svc, store) = create_test_vault_service("alice");
        store.set("passwords_alice", "not json").await.unwrap();

        assert_eq!(svc.load().await.unwrap(), Vault::sample());
        assert_eq!(svc.snapshot().await, Vault::sample());
    }

    #[tokio::test]
    async fn load_without_seeding_starts_empty() {
        let (svc, store) = create_test_vault_service("alice");
        let svc = svc.with_seed_sample_data(false);

        assert!(svc.load().await.unwrap().is_empty());
        assert!(store.get("passwords_alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_survives_read_failure_without_writing() {
        let (svc, store) = create_test_vault_service("alice");
        store.set_read_error(Some("HTTP 500".to_string())).await;

        assert_eq!(svc.load().await.unwrap(), Vault::sample());
        assert_eq!(svc.snapshot().await, Vault::sample());
        assert_eq!(store.write_count().await, 0);

        let svc = svc.with_seed_sample_data(false);
        assert!(svc.load().await.unwrap().is_empty());
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn load_keeps_existing_document() {
        let (svc, store) = create_test_vault_service("bob");
        store
            .set("passwords_bob", r#"{"categories":[]}"#)
            .await
            .unwrap();

        assert!(svc.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_persists_full_document() {
        let (svc, store) = create_test_vault_service("alice");
        svc.load().await.unwrap();

        let id = svc.add_item(sample_add_request("1")).await.unwrap();

        let stored = store.get("passwords_alice").await.unwrap().unwrap();
        let persisted = Vault::from_json(&stored).unwrap();
        assert_eq!(persisted, svc.snapshot().await);
        assert!(tree::find_item(&persisted, &id).is_some());
    }

    #[tokio::test]
    async fn failed_write_leaves_visible_tree_unchanged() {
        let (svc, store) = create_test_vault_service("alice");
        svc.load().await.unwrap();
        store.set_write_error(Some("disk full".to_string())).await;

        let result = svc.delete_item("1-1-1").await;
        assert!(matches!(result, Err(CoreError::StorageError(_))));
        assert_eq!(svc.snapshot().await, Vault::sample());

        store.set_write_error(None).await;
        let vault = svc.delete_item("1-1-1").await.unwrap();
        assert!(vault.is_empty());
        assert!(svc.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn rejected_mutation_is_not_persisted() {
        let (svc, store) = create_test_vault_service("alice");
        svc.load().await.unwrap();
        let writes = store.write_count().await;

        let result = svc.delete_account("1-1-1", 9).await;
        assert!(matches!(result, Err(CoreError::IndexOutOfRange { .. })));
        assert_eq!(store.write_count().await, writes);
    }

    #[tokio::test]
    async fn search_and_security_use_visible_tree() {
        let (svc, _) = create_test_vault_service("alice");
        svc.load().await.unwrap();

        assert_eq!(tree::query::item_count(&svc.search("docker").await), 1);
        assert!(svc.search("nothing-matches").await.is_empty());

        let stats = svc.security_overview().await.stats().cloned().unwrap();
        assert_eq!((stats.total, stats.weak), (1, 1));

        svc.apply(Mutation::UpdateAccountField {
            item_id: "1-1-1".to_string(),
            account_index: 0,
            field: AccountField::Password,
            value: "Correct-Horse-9".to_string(),
        })
        .await
        .unwrap();
        let stats = svc.security_overview().await.stats().cloned().unwrap();
        assert_eq!((stats.strong, stats.strong_percent), (1, 100));
    }
}
