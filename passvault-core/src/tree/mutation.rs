//! 树变更操作
//!
//! 每个操作都是纯函数：输入旧树和参数，返回新树，旧树保持不变。
//! 调用方负责持久化新树。

use rand::seq::IndexedRandom;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    Account, AccountField, AddCategoryRequest, AddItemRequest, Category, EditItemRequest,
    IconTarget, Item, ReorderTarget, Subcategory, Vault, CATEGORY_COLORS, DEFAULT_CATEGORY_ICON,
};
use crate::utils::favicon::{favicon_url, resolve_url};
use crate::utils::new_id;

/// 条目在树中的位置（下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemLocation {
    category: usize,
    subcategory: usize,
    item: usize,
}

fn locate_item(vault: &Vault, item_id: &str) -> Option<ItemLocation> {
    for (ci, cat) in vault.categories.iter().enumerate() {
        for (si, sub) in cat.subcategories.iter().enumerate() {
            if let Some(ii) = sub.items.iter().position(|i| i.id == item_id) {
                return Some(ItemLocation {
                    category: ci,
                    subcategory: si,
                    item: ii,
                });
            }
        }
    }
    None
}

fn item_at(vault: &mut Vault, loc: ItemLocation) -> &mut Item {
    &mut vault.categories[loc.category].subcategories[loc.subcategory].items[loc.item]
}

fn require_item(vault: &Vault, item_id: &str) -> CoreResult<ItemLocation> {
    locate_item(vault, item_id).ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))
}

fn require_category<'a>(vault: &'a mut Vault, category_id: &str) -> CoreResult<&'a mut Category> {
    vault
        .category_mut(category_id)
        .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))
}

fn require_subcategory<'a>(
    category: &'a mut Category,
    subcategory_id: &str,
) -> CoreResult<&'a mut Subcategory> {
    category
        .subcategory_mut(subcategory_id)
        .ok_or_else(|| CoreError::SubcategoryNotFound(subcategory_id.to_string()))
}

fn check_index(index: usize, len: usize) -> CoreResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(CoreError::IndexOutOfRange { index, len })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_name(name: &str, what: &str) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::ValidationError(format!("{what} name cannot be empty")));
    }
    Ok(name.to_string())
}

fn validate_website(website: &str) -> CoreResult<String> {
    validate_name(website, "Website")
}

/// 解析目标子分类：指定了 ID 则必须存在，否则使用（必要时创建）默认子分类
fn resolve_target<'a>(
    category: &'a mut Category,
    subcategory_id: Option<&str>,
) -> CoreResult<&'a mut Subcategory> {
    match subcategory_id.filter(|id| !id.is_empty()) {
        Some(id) => require_subcategory(category, id),
        None => Ok(default_bucket_mut(category)),
    }
}

fn default_bucket_mut(category: &mut Category) -> &mut Subcategory {
    let pos = if let Some(pos) = category.subcategories.iter().position(|s| s.is_default) {
        pos
    } else {
        log::debug!("Creating default subcategory for category {}", category.id);
        category
            .subcategories
            .insert(0, Subcategory::default_bucket(new_id()));
        0
    };
    &mut category.subcategories[pos]
}

/// 删除类操作后的级联清理：子分类空了就删掉，分类空了也删掉
fn prune_empty_path(vault: &mut Vault, category_id: &str, subcategory_id: &str) {
    let Some(ci) = vault.categories.iter().position(|c| c.id == category_id) else {
        return;
    };
    let category = &mut vault.categories[ci];
    let Some(si) = category
        .subcategories
        .iter()
        .position(|s| s.id == subcategory_id)
    else {
        return;
    };
    if !category.subcategories[si].items.is_empty() {
        return;
    }

    category.subcategories.remove(si);
    log::debug!("Pruned empty subcategory {subcategory_id}");
    if category.subcategories.is_empty() {
        vault.categories.remove(ci);
        log::debug!("Pruned empty category {category_id}");
    }
}

fn path_ids(vault: &Vault, loc: ItemLocation) -> (String, String) {
    let category = &vault.categories[loc.category];
    (
        category.id.clone(),
        category.subcategories[loc.subcategory].id.clone(),
    )
}

// ===== 条目与账户 =====

/// 新增条目，返回新树和新条目 ID
pub fn add_item(vault: &Vault, request: AddItemRequest) -> CoreResult<(Vault, String)> {
    let website = validate_website(&request.website)?;
    if !request.account.is_complete() {
        return Err(CoreError::ValidationError(
            "Username and password are required".to_string(),
        ));
    }

    let mut next = vault.clone();
    let category = require_category(&mut next, &request.category_id)?;
    let target = resolve_target(category, request.subcategory_id.as_deref())?;

    let url = resolve_url(&website, request.url.as_deref());
    let item = Item {
        id: new_id(),
        favicon: favicon_url(&url),
        website,
        url,
        accounts: vec![request.account],
    };
    let item_id = item.id.clone();
    target.items.push(item);

    Ok((next, item_id))
}

/// 为条目追加账户
pub fn add_account_to_item(vault: &Vault, item_id: &str, account: Account) -> CoreResult<Vault> {
    let loc = require_item(vault, item_id)?;
    let mut next = vault.clone();
    item_at(&mut next, loc).accounts.push(account);
    Ok(next)
}

/// 删除账户；条目没有账户后一并删除，并级联清理空容器
pub fn delete_account(vault: &Vault, item_id: &str, account_index: usize) -> CoreResult<Vault> {
    let loc = require_item(vault, item_id)?;
    let mut next = vault.clone();

    let item = item_at(&mut next, loc);
    check_index(account_index, item.accounts.len())?;
    item.accounts.remove(account_index);

    if item.accounts.is_empty() {
        let (category_id, subcategory_id) = path_ids(&next, loc);
        next.categories[loc.category].subcategories[loc.subcategory]
            .items
            .remove(loc.item);
        prune_empty_path(&mut next, &category_id, &subcategory_id);
    }

    Ok(next)
}

/// 更新账户的单个字段
pub fn update_account_field(
    vault: &Vault,
    item_id: &str,
    account_index: usize,
    field: AccountField,
    value: &str,
) -> CoreResult<Vault> {
    let loc = require_item(vault, item_id)?;
    let mut next = vault.clone();

    let item = item_at(&mut next, loc);
    check_index(account_index, item.accounts.len())?;
    *item.accounts[account_index].field_mut(field) = value.to_string();

    Ok(next)
}

/// 删除条目并级联清理空容器
pub fn delete_item(vault: &Vault, item_id: &str) -> CoreResult<Vault> {
    let loc = require_item(vault, item_id)?;
    let mut next = vault.clone();

    let (category_id, subcategory_id) = path_ids(&next, loc);
    next.categories[loc.category].subcategories[loc.subcategory]
        .items
        .remove(loc.item);
    prune_empty_path(&mut next, &category_id, &subcategory_id);

    Ok(next)
}

/// 编辑条目
///
/// 目标子分类与当前所在子分类相同时原地修改（保持位置）；
/// 否则从原位置移除（级联清理）并追加到目标子分类末尾。条目 ID 不变。
pub fn edit_item(vault: &Vault, request: EditItemRequest) -> CoreResult<Vault> {
    let website = validate_website(&request.website)?;
    let accounts: Vec<Account> = request
        .accounts
        .into_iter()
        .filter(Account::is_complete)
        .collect();
    if accounts.is_empty() {
        return Err(CoreError::ValidationError(
            "At least one account with username and password is required".to_string(),
        ));
    }

    let loc = require_item(vault, &request.item_id)?;
    let target_category = vault
        .category(&request.category_id)
        .ok_or_else(|| CoreError::CategoryNotFound(request.category_id.clone()))?;

    // None: target is a default bucket that does not exist yet
    let target_subcategory_id = match non_blank(request.subcategory_id) {
        Some(id) => {
            if target_category.subcategory(&id).is_none() {
                return Err(CoreError::SubcategoryNotFound(id));
            }
            Some(id)
        }
        None => target_category.default_subcategory().map(|s| s.id.clone()),
    };

    let (source_category_id, source_subcategory_id) = path_ids(vault, loc);
    let url = resolve_url(&website, request.url.as_deref());
    let mut next = vault.clone();

    if source_category_id == request.category_id
        && target_subcategory_id.as_deref() == Some(source_subcategory_id.as_str())
    {
        apply_item_edit(item_at(&mut next, loc), website, url, accounts);
        return Ok(next);
    }

    let mut item = next.categories[loc.category].subcategories[loc.subcategory]
        .items
        .remove(loc.item);
    apply_item_edit(&mut item, website, url, accounts);

    let category = require_category(&mut next, &request.category_id)?;
    resolve_target(category, target_subcategory_id.as_deref())?
        .items
        .push(item);

    prune_empty_path(&mut next, &source_category_id, &source_subcategory_id);
    Ok(next)
}

fn apply_item_edit(item: &mut Item, website: String, url: String, accounts: Vec<Account>) {
    // 保留 url 未变时的自定义图标
    if item.url != url {
        item.favicon = favicon_url(&url);
    }
    item.website = website;
    item.url = url;
    item.accounts = accounts;
}

// ===== 分类与子分类 =====

fn random_color() -> String {
    CATEGORY_COLORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(CATEGORY_COLORS[0])
        .to_string()
}

/// 新增分类，返回新树和新分类 ID
pub fn add_category(vault: &Vault, request: AddCategoryRequest) -> CoreResult<(Vault, String)> {
    let name = validate_name(&request.name, "Category")?;
    let category = Category {
        id: new_id(),
        name,
        icon: non_blank(request.icon).unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
        color: non_blank(request.color).unwrap_or_else(random_color),
        subcategories: Vec::new(),
    };
    let category_id = category.id.clone();

    let mut next = vault.clone();
    next.categories.push(category);
    Ok((next, category_id))
}

pub fn rename_category(vault: &Vault, category_id: &str, name: &str) -> CoreResult<Vault> {
    let name = validate_name(name, "Category")?;
    let mut next = vault.clone();
    require_category(&mut next, category_id)?.name = name;
    Ok(next)
}

/// 删除分类（连同其下所有内容）
pub fn delete_category(vault: &Vault, category_id: &str) -> CoreResult<Vault> {
    let pos = vault
        .categories
        .iter()
        .position(|c| c.id == category_id)
        .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
    let mut next = vault.clone();
    next.categories.remove(pos);
    Ok(next)
}

/// 新增普通子分类，返回新树和新子分类 ID
pub fn add_subcategory(vault: &Vault, category_id: &str, name: &str) -> CoreResult<(Vault, String)> {
    let name = validate_name(name, "Subcategory")?;
    let mut next = vault.clone();
    let category = require_category(&mut next, category_id)?;

    let subcategory = Subcategory::new(new_id(), name);
    let subcategory_id = subcategory.id.clone();
    category.subcategories.push(subcategory);

    Ok((next, subcategory_id))
}

pub fn rename_subcategory(
    vault: &Vault,
    category_id: &str,
    subcategory_id: &str,
    name: &str,
) -> CoreResult<Vault> {
    let name = validate_name(name, "Subcategory")?;
    let mut next = vault.clone();
    let category = require_category(&mut next, category_id)?;
    require_subcategory(category, subcategory_id)?.name = name;
    Ok(next)
}

/// 删除子分类（连同其下所有条目）；分类即使变空也保留
pub fn delete_subcategory(
    vault: &Vault,
    category_id: &str,
    subcategory_id: &str,
) -> CoreResult<Vault> {
    let mut next = vault.clone();
    let category = require_category(&mut next, category_id)?;
    let pos = category
        .subcategories
        .iter()
        .position(|s| s.id == subcategory_id)
        .ok_or_else(|| CoreError::SubcategoryNotFound(subcategory_id.to_string()))?;
    category.subcategories.remove(pos);
    Ok(next)
}

// ===== 图标与排序 =====

/// 把图标数据复制到分类图标或条目 favicon
pub fn set_icon(vault: &Vault, target: &IconTarget, icon_data: &str) -> CoreResult<Vault> {
    if icon_data.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "Icon data cannot be empty".to_string(),
        ));
    }

    let mut next = vault.clone();
    match target {
        IconTarget::Category(id) => {
            require_category(&mut next, id)?.icon = icon_data.to_string();
        }
        IconTarget::Item(id) => {
            let loc = require_item(vault, id)?;
            item_at(&mut next, loc).favicon = Some(icon_data.to_string());
        }
    }
    Ok(next)
}

fn move_element<T>(seq: &mut Vec<T>, from: usize, to: usize) -> CoreResult<()> {
    check_index(from, seq.len())?;
    check_index(to, seq.len())?;
    let element = seq.remove(from);
    seq.insert(to, element);
    Ok(())
}

/// 在同一序列内移动元素
///
/// 子分类排序时下标只针对非默认子分类；默认子分类始终固定在第一位。
pub fn reorder(vault: &Vault, target: &ReorderTarget, from: usize, to: usize) -> CoreResult<Vault> {
    let mut next = vault.clone();
    match target {
        ReorderTarget::Categories => move_element(&mut next.categories, from, to)?,
        ReorderTarget::Subcategories { category_id } => {
            let category = require_category(&mut next, category_id)?;
            let (defaults, mut others): (Vec<_>, Vec<_>) =
                std::mem::take(&mut category.subcategories)
                    .into_iter()
                    .partition(|s| s.is_default);
            move_element(&mut others, from, to)?;
            category.subcategories = defaults.into_iter().chain(others).collect();
        }
        ReorderTarget::Items {
            category_id,
            subcategory_id,
        } => {
            let category = require_category(&mut next, category_id)?;
            let subcategory = require_subcategory(category, subcategory_id)?;
            move_element(&mut subcategory.items, from, to)?;
        }
    }
    Ok(next)
}
