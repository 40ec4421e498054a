//! 只读查询：搜索过滤、安全统计、条目定位

use std::borrow::Cow;

use crate::strength;
use crate::types::{Category, Item, SecurityOverview, SecurityStats, StrengthLevel, Vault};

/// 条目及其所在位置
#[derive(Debug, Clone, Copy)]
pub struct ItemRef<'a> {
    pub category_id: &'a str,
    pub subcategory_id: &'a str,
    pub item: &'a Item,
}

fn item_matches(item: &Item, needle: &str) -> bool {
    item.website.to_lowercase().contains(needle)
        || item
            .accounts
            .iter()
            .any(|acc| acc.username.to_lowercase().contains(needle))
}

/// 按搜索词过滤
///
/// 搜索词为空时原样借用输入；否则只保留匹配的条目（网站名或任一账户用户名，
/// 忽略大小写），以及仍有条目的子分类和仍有子分类的分类。
#[must_use]
pub fn filter_by_search_term<'a>(vault: &'a Vault, term: &str) -> Cow<'a, Vault> {
    if term.is_empty() {
        return Cow::Borrowed(vault);
    }

    let needle = term.to_lowercase();
    let categories = vault
        .categories
        .iter()
        .filter_map(|cat| {
            let subcategories: Vec<_> = cat
                .subcategories
                .iter()
                .filter_map(|sub| {
                    let items: Vec<Item> = sub
                        .items
                        .iter()
                        .filter(|item| item_matches(item, &needle))
                        .cloned()
                        .collect();
                    (!items.is_empty()).then(|| {
                        let mut sub = sub.clone();
                        sub.items = items;
                        sub
                    })
                })
                .collect();
            (!subcategories.is_empty()).then(|| Category {
                id: cat.id.clone(),
                name: cat.name.clone(),
                icon: cat.icon.clone(),
                color: cat.color.clone(),
                subcategories,
            })
        })
        .collect();

    Cow::Owned(Vault { categories })
}

fn percent(count: usize, total: usize) -> u32 {
    // round half up, integer only
    u32::try_from((count * 200 + total) / (total * 2)).unwrap_or(100)
}

/// 统计所有账户的密码强度分布
#[must_use]
pub fn aggregate_security(vault: &Vault) -> SecurityOverview {
    let mut total = 0;
    let (mut strong, mut medium, mut weak) = (0, 0, 0);

    for account in vault.accounts() {
        total += 1;
        match strength::level(&account.password) {
            Some(StrengthLevel::Strong) => strong += 1,
            Some(StrengthLevel::Medium) => medium += 1,
            Some(StrengthLevel::Weak) => weak += 1,
            None => {}
        }
    }

    if total == 0 {
        return SecurityOverview::Empty;
    }

    SecurityOverview::Rated(SecurityStats {
        total,
        strong,
        medium,
        weak,
        strong_percent: percent(strong, total),
        medium_percent: percent(medium, total),
        weak_percent: percent(weak, total),
    })
}

/// 按 ID 查找条目（第一个匹配）
#[must_use]
pub fn find_item<'a>(vault: &'a Vault, item_id: &str) -> Option<ItemRef<'a>> {
    vault
        .items()
        .find(|(_, _, item)| item.id == item_id)
        .map(|(cat, sub, item)| ItemRef {
            category_id: &cat.id,
            subcategory_id: &sub.id,
            item,
        })
}

/// 条目总数（侧边栏标题显示）
#[must_use]
pub fn item_count(vault: &Vault) -> usize {
    vault.items().count()
}

/// 账户总数
#[must_use]
pub fn account_count(vault: &Vault) -> usize {
    vault.accounts().count()
}
