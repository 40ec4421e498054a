//! 用户上传图标类型定义

use serde::{Deserialize, Serialize};

/// 上传的图标（按值引用：选择时复制 `data` 到分类或条目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconAsset {
    pub id: String,
    pub name: String,
    /// 内联图片编码（`data:image/...;base64,...`）
    pub data: String,
}
