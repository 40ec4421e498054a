//! 上传图标管理服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{icons_key, ServiceContext};
use crate::types::IconAsset;
use crate::utils::new_id;

const DATA_IMAGE_PREFIX: &str = "data:image/";

/// 上传图标管理服务（每个登录用户一个实例）
///
/// 图标集合整体作为一个文档存储在 `icons_{user}` 下。
pub struct IconService {
    ctx: Arc<ServiceContext>,
    user: String,
}

impl IconService {
    /// 创建图标服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, user: impl Into<String>) -> Self {
        Self {
            ctx,
            user: user.into(),
        }
    }

    /// 列出所有图标（文档缺失或损坏时为空）
    pub async fn list(&self) -> CoreResult<Vec<IconAsset>> {
        let Some(json) = self.ctx.kv_store().get(&icons_key(&self.user)).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&json) {
            Ok(icons) => Ok(icons),
            Err(e) => {
                log::warn!("Stored icons for {} are malformed: {e}", self.user);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, icons: &[IconAsset]) -> CoreResult<()> {
        let json = serde_json::to_string(icons)?;
        self.ctx
            .kv_store()
            .set(&icons_key(&self.user), &json)
            .await
    }

    /// 添加图标
    pub async fn add(&self, name: &str, data: &str) -> CoreResult<IconAsset> {
        let name = validate_icon_name(name)?;
        if !data.starts_with(DATA_IMAGE_PREFIX) {
            return Err(CoreError::ValidationError(
                "Icon data must be an inline image (data:image/...)".to_string(),
            ));
        }

        let icon = IconAsset {
            id: new_id(),
            name,
            data: data.to_string(),
        };

        let mut icons = self.list().await?;
        icons.push(icon.clone());
        self.save(&icons).await?;

        log::info!("Added icon {} for {}", icon.id, self.user);
        Ok(icon)
    }

    /// 重命名图标
    pub async fn rename(&self, icon_id: &str, name: &str) -> CoreResult<IconAsset> {
        let name = validate_icon_name(name)?;
        let mut icons = self.list().await?;

        let icon = icons
            .iter_mut()
            .find(|i| i.id == icon_id)
            .ok_or_else(|| CoreError::IconNotFound(icon_id.to_string()))?;
        icon.name = name;
        let renamed = icon.clone();

        self.save(&icons).await?;
        Ok(renamed)
    }

    /// 删除图标
    ///
    /// 已复制到分类或条目上的图标数据不受影响。
    pub async fn delete(&self, icon_id: &str) -> CoreResult<()> {
        let mut icons = self.list().await?;
        let pos = icons
            .iter()
            .position(|i| i.id == icon_id)
            .ok_or_else(|| CoreError::IconNotFound(icon_id.to_string()))?;
        icons.remove(pos);

        self.save(&icons).await?;
        log::info!("Deleted icon {icon_id} for {}", self.user);
        Ok(())
    }
}

fn validate_icon_name(name: &str) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::ValidationError(
            "Icon name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
