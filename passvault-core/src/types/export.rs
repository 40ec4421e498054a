//! 导出相关类型定义

use serde::{Deserialize, Serialize};

/// CSV 导出结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    /// 文件内容（UTF-8，带 BOM）
    pub content: String,
    /// 建议文件名
    pub suggested_filename: String,
    /// 导出的账户行数
    pub row_count: usize,
}
