//! 密码树引擎
//!
//! - [`mutation`]: 纯函数变更操作（旧树 + 意图 → 新树）
//! - [`query`]: 只读查询（搜索过滤、安全统计）
//!
//! [`Mutation`] 把所有变更意图收拢成一个可序列化的枚举，由 [`apply`] 分发。

pub mod mutation;
pub mod query;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::types::{
    Account, AccountField, AddCategoryRequest, AddItemRequest, EditItemRequest, IconTarget,
    ReorderTarget, Vault,
};

pub use query::{aggregate_security, filter_by_search_term, find_item, ItemRef};

/// 变更意图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    AddItem(AddItemRequest),
    AddAccountToItem {
        item_id: String,
        account: Account,
    },
    DeleteAccount {
        item_id: String,
        account_index: usize,
    },
    UpdateAccountField {
        item_id: String,
        account_index: usize,
        field: AccountField,
        value: String,
    },
    DeleteItem {
        item_id: String,
    },
    EditItem(EditItemRequest),
    AddCategory(AddCategoryRequest),
    RenameCategory {
        category_id: String,
        name: String,
    },
    DeleteCategory {
        category_id: String,
    },
    AddSubcategory {
        category_id: String,
        name: String,
    },
    RenameSubcategory {
        category_id: String,
        subcategory_id: String,
        name: String,
    },
    DeleteSubcategory {
        category_id: String,
        subcategory_id: String,
    },
    SetIcon {
        target: IconTarget,
        data: String,
    },
    Reorder {
        target: ReorderTarget,
        from: usize,
        to: usize,
    },
}

impl Mutation {
    /// 操作名称（用于日志）
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::AddAccountToItem { .. } => "add_account_to_item",
            Self::DeleteAccount { .. } => "delete_account",
            Self::UpdateAccountField { .. } => "update_account_field",
            Self::DeleteItem { .. } => "delete_item",
            Self::EditItem(_) => "edit_item",
            Self::AddCategory(_) => "add_category",
            Self::RenameCategory { .. } => "rename_category",
            Self::DeleteCategory { .. } => "delete_category",
            Self::AddSubcategory { .. } => "add_subcategory",
            Self::RenameSubcategory { .. } => "rename_subcategory",
            Self::DeleteSubcategory { .. } => "delete_subcategory",
            Self::SetIcon { .. } => "set_icon",
            Self::Reorder { .. } => "reorder",
        }
    }
}

/// 变更结果
#[derive(Debug, Clone)]
pub struct Applied {
    /// 新树
    pub vault: Vault,
    /// 新建对象的 ID（新增条目/分类/子分类时）
    pub created_id: Option<String>,
}

impl From<Vault> for Applied {
    fn from(vault: Vault) -> Self {
        Self {
            vault,
            created_id: None,
        }
    }
}

impl From<(Vault, String)> for Applied {
    fn from((vault, id): (Vault, String)) -> Self {
        Self {
            vault,
            created_id: Some(id),
        }
    }
}

/// 对树应用一个变更意图
pub fn apply(vault: &Vault, mutation: Mutation) -> CoreResult<Applied> {
    use crate::tree::mutation as m;

    let applied: Applied = match mutation {
        Mutation::AddItem(request) => m::add_item(vault, request)?.into(),
        Mutation::AddAccountToItem { item_id, account } => {
            m::add_account_to_item(vault, &item_id, account)?.into()
        }
        Mutation::DeleteAccount {
            item_id,
            account_index,
        } => m::delete_account(vault, &item_id, account_index)?.into(),
        Mutation::UpdateAccountField {
            item_id,
            account_index,
            field,
            value,
        } => m::update_account_field(vault, &item_id, account_index, field, &value)?.into(),
        Mutation::DeleteItem { item_id } => m::delete_item(vault, &item_id)?.into(),
        Mutation::EditItem(request) => m::edit_item(vault, request)?.into(),
        Mutation::AddCategory(request) => m::add_category(vault, request)?.into(),
        Mutation::RenameCategory { category_id, name } => {
            m::rename_category(vault, &category_id, &name)?.into()
        }
        Mutation::DeleteCategory { category_id } => m::delete_category(vault, &category_id)?.into(),
        Mutation::AddSubcategory { category_id, name } => {
            m::add_subcategory(vault, &category_id, &name)?.into()
        }
        Mutation::RenameSubcategory {
            category_id,
            subcategory_id,
            name,
        } => m::rename_subcategory(vault, &category_id, &subcategory_id, &name)?.into(),
        Mutation::DeleteSubcategory {
            category_id,
            subcategory_id,
        } => m::delete_subcategory(vault, &category_id, &subcategory_id)?.into(),
        Mutation::SetIcon { target, data } => m::set_icon(vault, &target, &data)?.into(),
        Mutation::Reorder { target, from, to } => m::reorder(vault, &target, from, to)?.into(),
    };

    Ok(applied)
}
