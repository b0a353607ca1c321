use review_core::model::{QuestionId, QuestionStatus, WrongQuestion, format_grade};
use services::ListSource;
use url::Url;

use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::{format_date, format_datetime};

const PREVIEW_CHARS: usize = 96;

/// Row of the review list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRowVm {
    pub id: QuestionId,
    pub subject: String,
    pub grade_label: String,
    pub status: QuestionStatus,
    pub preview: String,
    pub created_label: String,
    pub image_url: Option<String>,
}

impl QuestionRowVm {
    #[must_use]
    pub fn new(question: &WrongQuestion, api_base: &Url) -> Self {
        Self {
            id: question.id,
            subject: question.subject.clone(),
            grade_label: format_grade(question.grade.as_ref()),
            status: question.status,
            preview: truncate_preview(&question.question_text, PREVIEW_CHARS),
            created_label: format_date(question.created_at),
            image_url: question.resolved_image_url(api_base),
        }
    }
}

#[must_use]
pub fn map_question_rows(questions: &[WrongQuestion], api_base: &Url) -> Vec<QuestionRowVm> {
    questions
        .iter()
        .map(|question| QuestionRowVm::new(question, api_base))
        .collect()
}

/// Everything the detail panel shows for one question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionDetailVm {
    pub id: QuestionId,
    pub subject: String,
    pub grade_label: String,
    pub status: QuestionStatus,
    pub question_text: String,
    pub explanation_html: Option<String>,
    pub image_url: Option<String>,
    pub created_label: String,
    pub updated_label: Option<String>,
}

#[must_use]
pub fn map_question_detail(question: &WrongQuestion, api_base: &Url) -> QuestionDetailVm {
    let explanation_html = question
        .has_explanation()
        .then(|| markdown_to_html(question.explanation.as_deref().unwrap_or_default()));
    QuestionDetailVm {
        id: question.id,
        subject: question.subject.clone(),
        grade_label: format_grade(question.grade.as_ref()),
        status: question.status,
        question_text: question.question_text.clone(),
        explanation_html,
        image_url: question.resolved_image_url(api_base),
        created_label: format_datetime(question.created_at),
        updated_label: question.updated_at.map(format_datetime),
    }
}

/// Heading above the list: search results are labelled as such.
#[must_use]
pub fn list_heading(source: Option<ListSource>, count: usize) -> String {
    match source {
        Some(ListSource::Search) => format!("Search results ({count})"),
        _ if count == 1 => "1 question".to_string(),
        _ => format!("{count} questions"),
    }
}

fn truncate_preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let mut lines = trimmed.lines();
    let first_line = lines.next().unwrap_or_default();
    let has_more_lines = lines.next().is_some();

    let mut out: String = first_line.chars().take(max_chars).collect();
    if has_more_lines || first_line.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::time::fixed_now;

    fn question(text: &str) -> WrongQuestion {
        WrongQuestion {
            id: QuestionId::new(7),
            subject: "Physics".into(),
            question_text: text.into(),
            grade: None,
            image_url: Some("/uploads/7.jpg".into()),
            image_snippet_url: None,
            explanation: Some("**Step 1**: draw the diagram".into()),
            status: QuestionStatus::Reviewing,
            created_at: fixed_now(),
            updated_at: None,
        }
    }

    #[test]
    fn rows_resolve_images_and_truncate() {
        let base = Url::parse("http://api.test/v1/").unwrap();
        let long = "x".repeat(200);
        let rows = map_question_rows(&[question(&long)], &base);
        assert_eq!(rows[0].preview.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(rows[0].grade_label, "No Grade");
        assert_eq!(
            rows[0].image_url.as_deref(),
            Some("http://api.test/v1/uploads/7.jpg")
        );
    }

    #[test]
    fn multi_line_text_previews_first_line() {
        assert_eq!(truncate_preview("Solve for x.\nShow working.", 50), "Solve for x....");
        assert_eq!(truncate_preview("  short  ", 50), "short");
    }

    #[test]
    fn detail_renders_explanation_markdown() {
        let base = Url::parse("http://api.test/").unwrap();
        let detail = map_question_detail(&question("Q"), &base);
        let html = detail.explanation_html.unwrap();
        assert!(html.contains("<strong>Step 1</strong>"));

        let mut bare = question("Q");
        bare.explanation = Some("   ".into());
        assert!(map_question_detail(&bare, &base).explanation_html.is_none());
    }

    #[test]
    fn heading_distinguishes_search() {
        assert_eq!(list_heading(Some(ListSource::Search), 3), "Search results (3)");
        assert_eq!(list_heading(Some(ListSource::Filtered), 1), "1 question");
        assert_eq!(list_heading(None, 0), "0 questions");
    }
}
