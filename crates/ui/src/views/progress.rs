use dioxus::prelude::*;
use services::ProgressReport;

use crate::context::AppContext;
use crate::session::use_session;
use crate::views::components::ErrorBanner;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{achievement_badges, map_subject_rows, stat_cards};

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let progress = ctx.progress();
    let report = use_resource(move || {
        let progress = progress.clone();
        let _revision = session.read().revision;
        async move {
            progress.load().await.map_err(|err| {
                ViewError::new(err.user_message("Failed to load progress. Please try again."))
            })
        }
    });

    rsx! {
        div { class: "page progress-page",
            h2 { "Your progress" }
            match view_state_from_resource(&report) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading progress..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorBanner { message: err.message().to_string() }
                },
                ViewState::Ready(report) => rsx! { ProgressBody { report } },
            }
        }
    }
}

#[component]
fn ProgressBody(report: ProgressReport) -> Element {
    let cards = stat_cards(&report.overall);
    let subjects = map_subject_rows(&report.by_subject);
    let badges = achievement_badges(&report.overall);

    rsx! {
        div { class: "stat-cards",
            for card in cards {
                div { key: "{card.label}", class: "stat-card tone-{card.tone}",
                    span { class: "stat-value", "{card.value}" }
                    span { class: "stat-label", "{card.label}" }
                }
            }
        }

        section { class: "subject-progress",
            h3 { "By subject" }
            if subjects.is_empty() {
                p { class: "empty", "No questions yet. Upload a paper to start tracking progress." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Subject" }
                            th { "Total" }
                            th { "Pending" }
                            th { "Reviewing" }
                            th { "Understood" }
                            th { "Mastery" }
                        }
                    }
                    tbody {
                        for row in subjects {
                            tr { key: "{row.subject}",
                                td { "{row.subject}" }
                                td { "{row.total}" }
                                td { "{row.pending}" }
                                td { "{row.reviewing}" }
                                td { "{row.understood}" }
                                td {
                                    div { class: "progress-track",
                                        div { class: "progress-fill", style: "width: {row.mastery_percent}%" }
                                    }
                                    span { class: "muted", "{row.mastery_percent}%" }
                                }
                            }
                        }
                    }
                }
            }
        }

        section { class: "achievements",
            h3 { "Achievements" }
            ul {
                for badge in badges {
                    li {
                        key: "{badge.title}",
                        class: if badge.earned { "achievement earned" } else { "achievement" },
                        "{badge.title}"
                    }
                }
            }
        }
    }
}
