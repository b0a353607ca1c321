use std::sync::Arc;

use review_core::model::{SystemUsage, TokenUsage};

use crate::api::ExamApi;
use crate::error::ApiError;

/// What the usage tab shows, depending on who is asking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageReport {
    Own(TokenUsage),
    /// Admin view; rows sorted by total tokens, highest first.
    System(SystemUsage),
}

#[derive(Clone)]
pub struct UsageService {
    api: Arc<dyn ExamApi>,
}

impl UsageService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the usage request fails.
    pub async fn load(&self, is_admin: bool) -> Result<UsageReport, ApiError> {
        if is_admin {
            let usage = self.api.all_token_usage().await?;
            return Ok(UsageReport::System(usage.sorted()));
        }
        Ok(UsageReport::Own(self.api.own_token_usage().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, InMemoryExamApi};
    use review_core::model::{User, UserId, UserUsage};
    use review_core::time::fixed_now;
    use url::Url;

    fn row(id: i64, total: u64) -> UserUsage {
        UserUsage {
            user_id: UserId::new(id),
            email: format!("u{id}@example.com"),
            name: None,
            total_tokens_used: total,
            prompt_tokens_used: total / 2,
            completion_tokens_used: total - total / 2,
            last_token_update: None,
        }
    }

    fn setup(admin: bool) -> (Arc<InMemoryExamApi>, UsageService) {
        let api = Arc::new(InMemoryExamApi::new(
            Url::parse("http://backend.test/").unwrap(),
            fixed_now(),
        ));
        let me = User::new(UserId::new(1), "Ada", "u1@example.com").with_admin(admin);
        api.register_session("tok", me);
        api.set_bearer_token(Some("tok".into()));
        api.set_usage(SystemUsage {
            total_tokens: 1_600,
            total_prompt_tokens: 800,
            total_completion_tokens: 800,
            total_users: 3,
            users: vec![row(1, 100), row(2, 1_000), row(3, 500)],
        });
        let service = UsageService::new(Arc::clone(&api) as Arc<dyn ExamApi>);
        (api, service)
    }

    #[tokio::test]
    async fn admin_sees_sorted_system_usage() {
        let (api, service) = setup(true);
        let UsageReport::System(usage) = service.load(true).await.unwrap() else {
            panic!("expected system usage");
        };
        let totals: Vec<_> = usage.users.iter().map(|r| r.total_tokens_used).collect();
        assert_eq!(totals, vec![1_000, 500, 100]);
        assert_eq!(api.call_count(Endpoint::OwnUsage), 0);
    }

    #[tokio::test]
    async fn student_sees_only_own_counters() {
        let (api, service) = setup(false);
        let UsageReport::Own(own) = service.load(false).await.unwrap() else {
            panic!("expected own usage");
        };
        assert_eq!(own.total_tokens_used, 100);
        assert_eq!(api.call_count(Endpoint::AllUsage), 0);
    }
}
