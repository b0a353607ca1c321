use review_core::model::{Achievement, StudentStats, SubjectStats};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub label: &'static str,
    pub value: String,
    pub tone: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectRowVm {
    pub subject: String,
    pub total: u32,
    pub pending: u32,
    pub reviewing: u32,
    pub understood: u32,
    pub mastery_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementVm {
    pub title: &'static str,
    pub earned: bool,
}

#[must_use]
pub fn stat_cards(stats: &StudentStats) -> Vec<StatCardVm> {
    vec![
        StatCardVm {
            label: "Total questions",
            value: stats.total_questions.to_string(),
            tone: "neutral",
        },
        StatCardVm {
            label: "Pending",
            value: stats.pending_questions.to_string(),
            tone: "pending",
        },
        StatCardVm {
            label: "Reviewing",
            value: stats.reviewing_questions.to_string(),
            tone: "reviewing",
        },
        StatCardVm {
            label: "Understood",
            value: stats.understood_questions.to_string(),
            tone: "understood",
        },
        StatCardVm {
            label: "Uploads",
            value: stats.total_uploads.to_string(),
            tone: "neutral",
        },
        StatCardVm {
            label: "Mastery",
            value: format!("{}%", stats.mastery_percent()),
            tone: "neutral",
        },
    ]
}

#[must_use]
pub fn map_subject_rows(rows: &[SubjectStats]) -> Vec<SubjectRowVm> {
    rows.iter()
        .map(|row| SubjectRowVm {
            subject: row.subject.clone(),
            total: row.total_questions,
            pending: row.pending,
            reviewing: row.reviewing,
            understood: row.understood,
            mastery_percent: row.mastery_percent(),
        })
        .collect()
}

/// Every achievement, earned or not, in display order.
#[must_use]
pub fn achievement_badges(stats: &StudentStats) -> Vec<AchievementVm> {
    Achievement::ALL
        .into_iter()
        .map(|achievement| AchievementVm {
            title: achievement.title(),
            earned: achievement.is_earned(stats),
        })
        .collect()
}
