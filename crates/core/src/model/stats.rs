use serde::{Deserialize, Serialize};

/// Totals returned by `GET /stats/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
    pub total_questions: u32,
    pub pending_questions: u32,
    pub reviewing_questions: u32,
    pub understood_questions: u32,
    pub total_uploads: u32,
}

/// One row of `GET /stats/by-subject`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject: String,
    pub total_questions: u32,
    pub pending: u32,
    pub reviewing: u32,
    pub understood: u32,
}

/// Rounded share of `value` in `total`, as a whole percent. Zero total yields 0.
#[must_use]
pub fn percentage(value: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(value) / f64::from(total) * 100.0).round();
    pct.clamp(0.0, f64::from(u32::MAX)) as u32
}

impl StudentStats {
    #[must_use]
    pub fn mastery_percent(&self) -> u32 {
        percentage(self.understood_questions, self.total_questions)
    }

    #[must_use]
    pub fn achievements(&self) -> Vec<Achievement> {
        Achievement::ALL
            .into_iter()
            .filter(|achievement| achievement.is_earned(self))
            .collect()
    }
}

impl SubjectStats {
    #[must_use]
    pub fn mastery_percent(&self) -> u32 {
        percentage(self.understood, self.total_questions)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Achievement {
    TenUploaded,
    FiveMastered,
    HalfMastery,
}

impl Achievement {
    pub const ALL: [Achievement; 3] = [
        Achievement::TenUploaded,
        Achievement::FiveMastered,
        Achievement::HalfMastery,
    ];

    #[must_use]
    pub fn is_earned(self, stats: &StudentStats) -> bool {
        match self {
            Achievement::TenUploaded => stats.total_questions >= 10,
            Achievement::FiveMastered => stats.understood_questions >= 5,
            Achievement::HalfMastery => stats.mastery_percent() >= 50,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Achievement::TenUploaded => "10+ questions uploaded",
            Achievement::FiveMastered => "5+ mastered",
            Achievement::HalfMastery => "50% mastery",
        }
    }
}
