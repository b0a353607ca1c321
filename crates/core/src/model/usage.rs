use serde::{Deserialize, Serialize};

use crate::model::UserId;

/// The signed-in user's own counters from `GET /usage/tokens`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub user_id: UserId,
    pub user_email: String,
    #[serde(default)]
    pub total_tokens_used: u64,
    #[serde(default)]
    pub prompt_tokens_used: u64,
    #[serde(default)]
    pub completion_tokens_used: u64,
    #[serde(default)]
    pub last_token_update: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUsage {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_tokens_used: u64,
    #[serde(default)]
    pub prompt_tokens_used: u64,
    #[serde(default)]
    pub completion_tokens_used: u64,
    #[serde(default)]
    pub last_token_update: Option<String>,
}

/// System-wide counters from `GET /usage/tokens/all` (admin only).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUsage {
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub total_prompt_tokens: u64,
    #[serde(default)]
    pub total_completion_tokens: u64,
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub users: Vec<UserUsage>,
}

impl SystemUsage {
    /// Heaviest consumers first; ties keep the backend order.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.users
            .sort_by(|a, b| b.total_tokens_used.cmp(&a.total_tokens_used));
        self
    }

    #[must_use]
    pub fn row_for(&self, user_id: UserId) -> Option<&UserUsage> {
        self.users.iter().find(|row| row.user_id == user_id)
    }
}

/// Token count with thousands separators, e.g. `1,234,567`.
#[must_use]
pub fn format_tokens(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
