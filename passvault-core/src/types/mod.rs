//! 类型定义模块

mod export;
mod icon;
mod request;
mod security;
mod vault;

pub use export::CsvExport;
pub use icon::IconAsset;
pub use request::{AddCategoryRequest, AddItemRequest, EditItemRequest, IconTarget, ReorderTarget};
pub use security::{SecurityOverview, SecurityStats, StrengthLevel, StrengthScore};
pub use vault::{
    Account, AccountField, Category, Item, Subcategory, Vault, CATEGORY_COLORS,
    DEFAULT_CATEGORY_ICON, DEFAULT_SUBCATEGORY_NAME,
};
