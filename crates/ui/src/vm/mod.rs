mod markdown_vm;
mod progress_vm;
mod question_vm;
mod time_fmt;
mod usage_vm;

pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use progress_vm::{
    AchievementVm, StatCardVm, SubjectRowVm, achievement_badges, map_subject_rows, stat_cards,
};
pub use question_vm::{
    QuestionDetailVm, QuestionRowVm, list_heading, map_question_detail, map_question_rows,
};
pub use time_fmt::{format_date, format_datetime, format_wire_timestamp};
pub use usage_vm::{UsageRowVm, UsageTotalsVm, map_usage_rows, own_usage_totals, usage_totals};

/// Human file size for the upload preview, e.g. `2.4 MB`.
#[must_use]
pub fn format_file_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < KB * KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / (KB * KB))
    }
}
