//! 密码树类型定义（分类 → 子分类 → 条目 → 账户）

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// 默认子分类的显示名称
pub const DEFAULT_SUBCATEGORY_NAME: &str = "默认";

/// 新分类的默认图标
pub const DEFAULT_CATEGORY_ICON: &str = "🔑";

/// 分类颜色（渐变样式标记，核心层不解析）
pub const CATEGORY_COLORS: &[&str] = &[
    "from-blue-500 to-cyan-500",
    "from-purple-500 to-pink-500",
    "from-green-500 to-emerald-500",
    "from-orange-500 to-red-500",
    "from-indigo-500 to-purple-500",
];

/// 一个用户的完整密码树（整体持久化为一个文档）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// 顶级分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Emoji or inline image data
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// 分类下的子分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    /// 默认子分类标记：未指定子分类的条目放在这里，始终排在第一位
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// 网站/服务条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub website: String,
    pub url: String,
    /// 图标引用（由 url 推导，或用户上传图标的数据）
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// 单个账户
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub note: String,
}

/// 账户中可单独编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountField {
    Username,
    Password,
    Note,
}

impl Vault {
    /// 从存储文档解析
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 序列化为存储文档（`{ "categories": [...] }`）
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 首次登录时写入的示例数据
    #[must_use]
    pub fn sample() -> Self {
        Self {
            categories: vec![Category {
                id: "1".to_string(),
                name: "Docker".to_string(),
                icon: "🐳".to_string(),
                color: CATEGORY_COLORS[0].to_string(),
                subcategories: vec![Subcategory {
                    id: "1-1".to_string(),
                    name: "存储平台".to_string(),
                    is_default: false,
                    items: vec![Item {
                        id: "1-1-1".to_string(),
                        website: "Docker Hub".to_string(),
                        url: "https://hub.docker.com".to_string(),
                        favicon: Some(
                            "https://www.google.com/s2/favicons?domain=hub.docker.com&sz=128"
                                .to_string(),
                        ),
                        accounts: vec![Account::new("admin@example.com", "docker123", "主账号")],
                    }],
                }],
            }],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// Iterate every item together with its category and subcategory.
    pub fn items(&self) -> impl Iterator<Item = (&Category, &Subcategory, &Item)> {
        self.categories.iter().flat_map(|cat| {
            cat.subcategories
                .iter()
                .flat_map(move |sub| sub.items.iter().map(move |item| (cat, sub, item)))
        })
    }

    /// Iterate every account in traversal order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.items().flat_map(|(_, _, item)| item.accounts.iter())
    }
}

impl Category {
    /// 默认子分类（若存在）
    pub fn default_subcategory(&self) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.is_default)
    }

    pub fn subcategory(&self, id: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }

    pub fn subcategory_mut(&mut self, id: &str) -> Option<&mut Subcategory> {
        self.subcategories.iter_mut().find(|s| s.id == id)
    }
}

impl Subcategory {
    /// 创建普通子分类
    #[must_use]
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            is_default: false,
            items: Vec::new(),
        }
    }

    /// 创建默认子分类
    #[must_use]
    pub fn default_bucket(id: String) -> Self {
        Self {
            id,
            name: DEFAULT_SUBCATEGORY_NAME.to_string(),
            is_default: true,
            items: Vec::new(),
        }
    }
}

impl Account {
    #[must_use]
    pub fn new(username: &str, password: &str, note: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            note: note.to_string(),
        }
    }

    /// 用户名和密码都已填写
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }

    pub fn field_mut(&mut self, field: AccountField) -> &mut String {
        match field {
            AccountField::Username => &mut self.username,
            AccountField::Password => &mut self.password,
            AccountField::Note => &mut self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roundtrip() {
        let vault = Vault::sample();
        let json = vault.to_json().unwrap();
        let parsed = Vault::from_json(&json).unwrap();
        assert_eq!(parsed, vault);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let mut vault = Vault::sample();
        vault.categories[0]
            .subcategories
            .push(Subcategory::default_bucket("d".to_string()));
        let json: serde_json::Value = serde_json::from_str(&vault.to_json().unwrap()).unwrap();
        assert!(json["categories"][0]["subcategories"][1]["isDefault"]
            .as_bool()
            .unwrap());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{"categories":[{"id":"1","name":"Mail","subcategories":[
            {"id":"s","name":"x","items":[
                {"id":"i","website":"Mail","url":"https://mail.test",
                 "accounts":[{"username":"u","password":"p"}]}]}]}]}"#;
        let vault = Vault::from_json(json).unwrap();
        let (_, sub, item) = vault.items().next().unwrap();
        assert!(!sub.is_default);
        assert_eq!(item.favicon, None);
        assert_eq!(item.accounts[0].note, "");
        assert_eq!(vault.categories[0].icon, "");
    }

    #[test]
    fn empty_document_has_no_categories() {
        assert!(Vault::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn account_completeness() {
        assert!(Account::new("a", "b", "").is_complete());
        assert!(!Account::new(" ", "b", "").is_complete());
        assert!(!Account::new("a", "", "").is_complete());
    }
}
