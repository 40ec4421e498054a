//! 变更请求类型定义

use serde::{Deserialize, Serialize};

use super::Account;

/// 新增条目请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    /// 目标分类 ID
    pub category_id: String,
    /// 目标子分类 ID（为空时放入默认子分类）
    #[serde(default)]
    pub subcategory_id: Option<String>,
    /// 网站名称
    pub website: String,
    /// 网址（为空时由网站名称推导）
    #[serde(default)]
    pub url: Option<String>,
    /// 第一个账户
    pub account: Account,
}

/// 编辑条目请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditItemRequest {
    pub item_id: String,
    pub website: String,
    #[serde(default)]
    pub url: Option<String>,
    /// 新的账户列表（缺少用户名或密码的账户会被丢弃）
    pub accounts: Vec<Account>,
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
}

/// 新增分类请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryRequest {
    pub name: String,
    /// 为空时使用默认图标
    #[serde(default)]
    pub icon: Option<String>,
    /// 为空时随机选取一个颜色
    #[serde(default)]
    pub color: Option<String>,
}

/// 图标设置目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum IconTarget {
    /// 分类图标
    Category(String),
    /// 条目图标（favicon）
    Item(String),
}

/// 排序目标序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReorderTarget {
    /// 顶级分类列表
    Categories,
    /// 某分类下的子分类（不含默认子分类）
    #[serde(rename_all = "camelCase")]
    Subcategories { category_id: String },
    /// 某子分类下的条目
    #[serde(rename_all = "camelCase")]
    Items {
        category_id: String,
        subcategory_id: String,
    },
}
