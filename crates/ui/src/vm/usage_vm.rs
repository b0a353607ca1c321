use review_core::model::{SystemUsage, TokenUsage, UserId, UserUsage, format_tokens};

use crate::vm::time_fmt::format_wire_timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageTotalsVm {
    pub total: String,
    pub prompt: String,
    pub completion: String,
    pub users: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageRowVm {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub total: String,
    pub prompt: String,
    pub completion: String,
    pub last_update: String,
    pub is_current: bool,
}

impl UsageRowVm {
    fn new(row: &UserUsage, current: Option<UserId>) -> Self {
        Self {
            user_id: row.user_id,
            name: row
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "-".to_string()),
            email: row.email.clone(),
            total: format_tokens(row.total_tokens_used),
            prompt: format_tokens(row.prompt_tokens_used),
            completion: format_tokens(row.completion_tokens_used),
            last_update: format_wire_timestamp(row.last_token_update.as_deref()),
            is_current: current == Some(row.user_id),
        }
    }
}

#[must_use]
pub fn usage_totals(usage: &SystemUsage) -> UsageTotalsVm {
    UsageTotalsVm {
        total: format_tokens(usage.total_tokens),
        prompt: format_tokens(usage.total_prompt_tokens),
        completion: format_tokens(usage.total_completion_tokens),
        users: usage.total_users,
    }
}

/// Table rows in the order given, flagging the signed-in user's row.
#[must_use]
pub fn map_usage_rows(usage: &SystemUsage, current: Option<UserId>) -> Vec<UsageRowVm> {
    usage
        .users
        .iter()
        .map(|row| UsageRowVm::new(row, current))
        .collect()
}

#[must_use]
pub fn own_usage_totals(usage: &TokenUsage) -> (UsageTotalsVm, String) {
    let totals = UsageTotalsVm {
        total: format_tokens(usage.total_tokens_used),
        prompt: format_tokens(usage.prompt_tokens_used),
        completion: format_tokens(usage.completion_tokens_used),
        users: 1,
    };
    (totals, format_wire_timestamp(usage.last_token_update.as_deref()))
}
