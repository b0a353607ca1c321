use chrono::NaiveDate;

use crate::model::{Grade, QuestionStatus};

/// Criteria for `GET /questions/wrong`.
///
/// Only set fields are sent; an all-`None` filter lists everything the
/// backend is willing to return.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub subject: Option<String>,
    pub grade: Option<Grade>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<QuestionStatus>,
}

impl QuestionFilter {
    /// Filter the review screen opens with: pending questions at the user's grade.
    #[must_use]
    pub fn review_default(grade: Option<Grade>) -> Self {
        Self {
            grade,
            status: Some(QuestionStatus::Pending),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Query parameters in wire order: subject, grade, start_date, end_date, status.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(subject) = self.subject.as_deref().map(str::trim) {
            if !subject.is_empty() {
                pairs.push(("subject", subject.to_string()));
            }
        }
        if let Some(grade) = &self.grade {
            pairs.push(("grade", grade.as_str().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }

    /// Reset every criterion except the grade, which follows the session user.
    pub fn clear_keeping_grade(&mut self) {
        *self = Self {
            grade: self.grade.take(),
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_sends_nothing() {
        let filter = QuestionFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn pairs_follow_wire_order() {
        let filter = QuestionFilter {
            subject: Some("Physics".into()),
            grade: Some(Grade::parse("sec2").unwrap()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            status: Some(QuestionStatus::Understood),
        };
        let keys: Vec<_> = filter.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["subject", "grade", "start_date", "end_date", "status"]);
        assert_eq!(filter.query_pairs()[2].1, "2024-01-01");
    }

    #[test]
    fn blank_subject_is_skipped() {
        let filter = QuestionFilter {
            subject: Some("  ".into()),
            status: Some(QuestionStatus::Reviewing),
            ..QuestionFilter::default()
        };
        assert_eq!(filter.query_pairs(), vec![("status", "reviewing".to_string())]);
    }

    #[test]
    fn review_default_is_pending_at_grade() {
        let mut filter = QuestionFilter::review_default(Some(Grade::parse("p5").unwrap()));
        assert_eq!(filter.status, Some(QuestionStatus::Pending));
        filter.subject = Some("Art".into());
        filter.clear_keeping_grade();
        assert_eq!(filter.grade.as_ref().map(Grade::as_str), Some("p5"));
        assert!(filter.subject.is_none());
        assert!(filter.status.is_none());
    }
}
