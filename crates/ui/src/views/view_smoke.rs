use review_core::model::{QuestionStatus, SystemUsage, User, UserId, UserUsage};

use super::test_harness::{ViewKind, setup_view_harness, student};

fn usage_row(id: i64, email: &str, total: u64) -> UserUsage {
    UserUsage {
        user_id: UserId::new(id),
        email: email.to_string(),
        name: None,
        total_tokens_used: total,
        prompt_tokens_used: total / 2,
        completion_tokens_used: total - total / 2,
        last_token_update: None,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn signed_out_gate_shows_login() {
    let mut harness = setup_view_harness(ViewKind::Gate, None);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign in"), "missing sign-in button in {html}");
    assert!(html.contains("REVIEW_GOOGLE_CLIENT_ID"), "missing setup hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn gradeless_user_is_asked_for_grade_without_skip() {
    let mut harness = setup_view_harness(ViewKind::Gate, Some(student(None)));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Welcome, Mei!"), "missing greeting in {html}");
    assert!(html.contains("Continue"), "missing submit in {html}");
    assert!(!html.contains("Skip for now"), "skip offered without a grade: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn review_lists_pending_questions_at_user_grade() {
    let mut harness = setup_view_harness(ViewKind::Review, Some(student(Some("sec2"))));
    let api = harness.api.clone();
    api.add_question(api.question_fixture(
        1,
        "Physics",
        Some("sec2"),
        QuestionStatus::Pending,
        "Find the net force on the block",
    ));
    api.add_question(api.question_fixture(
        2,
        "Biology",
        Some("sec2"),
        QuestionStatus::Understood,
        "Explain osmosis",
    ));
    api.add_question(api.question_fixture(
        3,
        "Physics",
        Some("p5"),
        QuestionStatus::Pending,
        "Count the magnets",
    ));

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Find the net force"), "missing pending question in {html}");
    assert!(!html.contains("Explain osmosis"), "understood question leaked: {html}");
    assert!(!html.contains("Count the magnets"), "other grade leaked: {html}");
    assert!(html.contains("1 question"), "missing heading in {html}");
    assert!(
        html.contains("http://backend.test/uploads/1.jpg"),
        "image not resolved against api base: {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn upload_offers_subject_catalog() {
    let mut harness = setup_view_harness(ViewKind::Upload, Some(student(Some("sec2"))));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Choose image..."), "missing picker in {html}");
    assert!(html.contains("Mathematics"), "missing subject in {html}");
    assert!(html.contains("Physical Education"), "missing subject in {html}");
}

/// Whether the grade dropdown shows `grade`, via its value or a selected option.
fn grade_select_shows(html: &str, grade: &str) -> bool {
    let Some(start) = html.find("<select class=\"grade-select\"") else {
        return false;
    };
    let select = &html[start..];
    let open_tag = &select[..select.find('>').unwrap_or(select.len())];
    if open_tag.contains(&format!("value=\"{grade}\"")) {
        return true;
    }
    let needle = format!("<option value=\"{grade}\"");
    select.find(&needle).is_some_and(|at| {
        let option = &select[at..];
        let tag = &option[..option.find('>').unwrap_or(option.len())];
        tag.contains("selected")
            && !tag.contains("selected=false")
            && !tag.contains("selected=\"false\"")
    })
}

#[tokio::test(flavor = "current_thread")]
async fn upload_grade_follows_session_grade_change() {
    let mut harness = setup_view_harness(ViewKind::Upload, Some(student(Some("sec2"))));
    harness.settle().await;
    let html = harness.render();
    assert!(grade_select_shows(&html, "sec2"), "initial grade in {html}");

    harness
        .services
        .grades()
        .select_raw(Some("jc1"))
        .await
        .expect("grade update");
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(grade_select_shows(&html, "jc1"), "grade not followed in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_shows_earned_achievements() {
    let mut harness = setup_view_harness(ViewKind::Progress, Some(student(Some("sec2"))));
    let api = harness.api.clone();
    for id in 1..=10 {
        let status = if id <= 5 {
            QuestionStatus::Understood
        } else {
            QuestionStatus::Pending
        };
        api.add_question(api.question_fixture(id, "Chemistry", Some("sec2"), status, "Balance it"));
    }

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Chemistry"), "missing subject row in {html}");
    assert!(html.contains("50%"), "missing mastery in {html}");
    assert_eq!(
        html.matches("achievement earned").count(),
        3,
        "expected all badges earned in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn admin_usage_is_sorted_and_highlights_self() {
    let admin = User::new(UserId::new(1), "Ada Admin", "ada@school.test").with_admin(true);
    let mut harness = setup_view_harness(ViewKind::Usage, Some(admin));
    harness.api.set_usage(SystemUsage {
        total_tokens: 2_500,
        total_prompt_tokens: 1_250,
        total_completion_tokens: 1_250,
        total_users: 2,
        users: vec![
            usage_row(2, "light@school.test", 500),
            usage_row(1, "ada@school.test", 2_000),
        ],
    });

    harness.settle().await;
    let html = harness.render();
    let heavy = html.find("ada@school.test").expect("admin row");
    let light = html.find("light@school.test").expect("student row");
    assert!(heavy < light, "rows not sorted by usage: {html}");
    assert!(html.contains("2,500"), "missing total in {html}");
    assert!(html.contains("current-user"), "own row not highlighted: {html}");
    assert_eq!(html.matches("(you)").count(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn student_usage_shows_own_totals() {
    let mut harness = setup_view_harness(ViewKind::Usage, Some(student(Some("sec2"))));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Total tokens"), "missing totals in {html}");
    assert!(html.contains("Last activity: Never"), "missing activity in {html}");
    assert!(!html.contains("usage-table"), "student saw system table: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn users_view_rejects_non_admins() {
    let mut harness = setup_view_harness(ViewKind::Users, Some(student(Some("sec2"))));
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Access denied. Admin privileges required."),
        "missing 403 message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn users_view_hides_delete_on_own_row() {
    let admin = User::new(UserId::new(1), "Ada Admin", "ada@school.test").with_admin(true);
    let mut harness = setup_view_harness(ViewKind::Users, Some(admin));
    harness
        .api
        .add_user(User::new(UserId::new(2), "Bo Student", "bo@school.test"));

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("bo@school.test"), "missing user row in {html}");
    assert!(html.contains("ada@school.test"), "missing own row in {html}");
    assert_eq!(html.matches(">Delete<").count(), 1, "delete buttons in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_shows_profile() {
    let mut harness = setup_view_harness(ViewKind::Settings, Some(student(Some("sec2"))));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Mei Tan"), "missing name in {html}");
    assert!(html.contains("mei@school.test"), "missing email in {html}");
    assert!(html.contains("Dark mode"), "missing appearance toggle in {html}");
}
