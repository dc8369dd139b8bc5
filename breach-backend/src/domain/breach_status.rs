// src/domain/breach_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 漏洩レコードの審査状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreachStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl BreachStatus {
    /// 文字列からBreachStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Pending, Self::Approved, Self::Rejected]
    }

    /// 公開検索の対象になるか
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// 遷移に制約はない（どの状態からどの状態へも変更可能）
    pub fn can_transition_to(&self, _new_status: Self) -> bool {
        true
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for BreachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BreachStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid breach status: '{}'. Valid statuses are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<BreachStatus> for String {
    fn from(status: BreachStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<&str> for BreachStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
