//! 密码强度与安全总览类型定义

use serde::{Deserialize, Serialize};

/// 密码强度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    /// 界面显示标签
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "弱",
            Self::Medium => "中",
            Self::Strong => "强",
        }
    }
}

/// 单个密码的评分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthScore {
    pub level: StrengthLevel,
    /// 0..=5
    pub score: u8,
}

/// 整棵树的安全统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityStats {
    pub total: usize,
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
    pub strong_percent: u32,
    pub medium_percent: u32,
    pub weak_percent: u32,
}

/// 安全总览（没有任何账户时为 `Empty`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stats", rename_all = "lowercase")]
pub enum SecurityOverview {
    Empty,
    Rated(SecurityStats),
}

impl SecurityOverview {
    /// 统计数据（`Empty` 时为 `None`）
    #[must_use]
    pub fn stats(&self) -> Option<&SecurityStats> {
        match self {
            Self::Empty => None,
            Self::Rated(stats) => Some(stats),
        }
    }
}
