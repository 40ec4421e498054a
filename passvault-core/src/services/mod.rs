//! 业务逻辑服务层

mod auth_service;
mod export_service;
mod icon_service;
mod vault_service;

pub use auth_service::{AuthService, UserDirectory};
pub use export_service::ExportService;
pub use icon_service::IconService;
pub use vault_service::VaultService;

use std::sync::Arc;

use crate::traits::KeyValueStore;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// 键值存储
    kv_store: Arc<dyn KeyValueStore>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(kv_store: Arc<dyn KeyValueStore>) -> Self {
        Self { kv_store }
    }

    /// 键值存储
    #[must_use]
    pub fn kv_store(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv_store
    }
}

/// 用户密码树的存储键
#[must_use]
pub fn passwords_key(user: &str) -> String {
    format!("passwords_{user}")
}

/// 用户图标集合的存储键
#[must_use]
pub fn icons_key(user: &str) -> String {
    format!("icons_{user}")
}
