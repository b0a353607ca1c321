use dioxus::prelude::*;
use review_core::model::{SystemUsage, UserId};
use services::UsageReport;

use crate::context::AppContext;
use crate::session::{signed_in_user, use_session};
use crate::views::components::ErrorBanner;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{UsageTotalsVm, map_usage_rows, own_usage_totals, usage_totals};

#[component]
pub fn UsageView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let usage = ctx.usage();
    let report = use_resource(move || {
        let usage = usage.clone();
        let is_admin = session.read().user().is_some_and(|user| user.is_admin());
        async move {
            usage.load(is_admin).await.map_err(|err| {
                ViewError::new(err.user_message("Failed to load usage. Please try again."))
            })
        }
    });
    let current = signed_in_user(session).map(|user| user.id());

    rsx! {
        div { class: "page usage-page",
            h2 { "Token usage" }
            match view_state_from_resource(&report) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading usage..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorBanner { message: err.message().to_string() }
                },
                ViewState::Ready(UsageReport::Own(own)) => {
                    let (totals, last_update) = own_usage_totals(&own);
                    rsx! {
                        TotalsCards { totals, show_users: false }
                        p { class: "muted", "Last activity: {last_update}" }
                    }
                }
                ViewState::Ready(UsageReport::System(system)) => rsx! {
                    TotalsCards { totals: usage_totals(&system), show_users: true }
                    SystemTable { usage: system, current }
                },
            }
        }
    }
}

#[component]
fn TotalsCards(totals: UsageTotalsVm, show_users: bool) -> Element {
    rsx! {
        div { class: "stat-cards",
            div { class: "stat-card",
                span { class: "stat-value", "{totals.total}" }
                span { class: "stat-label", "Total tokens" }
            }
            div { class: "stat-card",
                span { class: "stat-value", "{totals.prompt}" }
                span { class: "stat-label", "Prompt tokens" }
            }
            div { class: "stat-card",
                span { class: "stat-value", "{totals.completion}" }
                span { class: "stat-label", "Completion tokens" }
            }
            if show_users {
                div { class: "stat-card",
                    span { class: "stat-value", "{totals.users}" }
                    span { class: "stat-label", "Users" }
                }
            }
        }
    }
}

#[component]
fn SystemTable(usage: SystemUsage, #[props(!optional)] current: Option<UserId>) -> Element {
    let rows = map_usage_rows(&usage, current);

    rsx! {
        table { class: "usage-table",
            thead {
                tr {
                    th { "User" }
                    th { "Email" }
                    th { "Total" }
                    th { "Prompt" }
                    th { "Completion" }
                    th { "Last activity" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        key: "{row.user_id}",
                        class: if row.is_current { "current-user" } else { "" },
                        td {
                            "{row.name}"
                            if row.is_current {
                                span { class: "you-badge", " (you)" }
                            }
                        }
                        td { "{row.email}" }
                        td { "{row.total}" }
                        td { "{row.prompt}" }
                        td { "{row.completion}" }
                        td { "{row.last_update}" }
                    }
                }
            }
        }
    }
}
