//! CSV 导出服务

use std::sync::Arc;

use chrono::Utc;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::services::{passwords_key, ServiceContext};
use crate::types::{CsvExport, Vault};

const CSV_HEADER: &str = "Category,Subcategory,Website,URL,Username,Password,Note";
const UTF8_BOM: char = '\u{feff}';

/// CSV 导出服务
pub struct ExportService {
    ctx: Arc<ServiceContext>,
}

impl ExportService {
    /// 创建导出服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 导出用户已保存的密码树
    ///
    /// 文档缺失或无法解析时导出空表；存储读取失败时返回错误。
    pub async fn export_csv(&self, user: &str) -> CoreResult<CsvExport> {
        let vault = match self.ctx.kv_store().get(&passwords_key(user)).await? {
            Some(json) => Vault::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Stored password tree for {user} is malformed, exporting nothing: {e}");
                Vault::default()
            }),
            None => Vault::default(),
        };
        Self::export_vault(user, &vault)
    }

    /// 导出给定的密码树
    pub fn export_vault(user: &str, vault: &Vault) -> CoreResult<CsvExport> {
        let csv = Self::to_csv(vault)?;
        let row_count = vault.accounts().count();

        let mut content = String::with_capacity(csv.len() + UTF8_BOM.len_utf8());
        content.push(UTF8_BOM);
        content.push_str(&csv);

        let suggested_filename = format!(
            "passwords_{user}_{}.csv",
            Utc::now().format("%Y-%m-%d")
        );
        log::info!("Exported {row_count} accounts for {user}");

        Ok(CsvExport {
            content,
            suggested_filename,
            row_count,
        })
    }

    /// 把密码树展开为 CSV（每个账户一行，按树的遍历顺序）
    pub fn to_csv(vault: &Vault) -> CoreResult<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for (category, subcategory, item) in vault.items() {
            for account in &item.accounts {
                writer
                    .write_record([
                        category.name.as_str(),
                        subcategory.name.as_str(),
                        item.website.as_str(),
                        item.url.as_str(),
                        account.username.as_str(),
                        account.password.as_str(),
                        account.note.as_str(),
                    ])
                    .map_err(|e| CoreError::ExportError(e.to_string()))?;
            }
        }

        let rows = writer
            .into_inner()
            .map_err(|e| CoreError::ExportError(e.to_string()))?;
        let rows = String::from_utf8(rows).map_err(|e| CoreError::ExportError(e.to_string()))?;

        Ok(format!("{CSV_HEADER}\n{rows}"))
    }
}
