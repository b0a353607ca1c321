use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use review_core::model::{ClientPreferences, Grade, User, UserId};
use review_core::time::fixed_now;
use services::{AppServices, ClientConfig, InMemoryExamApi};
use url::Url;

use crate::app::AuthGate;
use crate::context::{UiApp, build_app_context};
use crate::session::use_session_signal;
use crate::views::{ProgressView, ReviewView, SettingsView, UploadView, UsageView, UsersView};

pub const TEST_TOKEN: &str = "view-test-token";

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn initial_preferences(&self) -> ClientPreferences {
        ClientPreferences::default()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Gate,
    Upload,
    Review,
    Progress,
    Usage,
    Users,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    let session = use_session_signal(ctx.session());
    let preferences = use_signal(|| ctx.initial_preferences());
    use_context_provider(|| session);
    use_context_provider(|| preferences);
    use_context_provider(|| props.view);

    if props.view == ViewKind::Gate {
        return rsx! { AuthGate {} };
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Gate => rsx! {},
        ViewKind::Upload => rsx! { UploadView {} },
        ViewKind::Review => rsx! { ReviewView {} },
        ViewKind::Progress => rsx! { ProgressView {} },
        ViewKind::Usage => rsx! { UsageView {} },
        ViewKind::Users => rsx! { UsersView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<InMemoryExamApi>,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let spawned loads settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

#[must_use]
pub fn student(grade: Option<&str>) -> User {
    User::new(UserId::new(1), "Mei Tan", "mei@school.test")
        .with_grade(grade.and_then(|raw| Grade::parse(raw).ok()))
}

/// Harness with `user` signed in, or signed out when `None`.
///
/// The fake backend is returned so tests can seed it before `settle`.
pub fn setup_view_harness(view: ViewKind, user: Option<User>) -> ViewHarness {
    let api = Arc::new(InMemoryExamApi::new(
        Url::parse("http://backend.test/").expect("base url"),
        fixed_now(),
    ));
    let config = ClientConfig::from_lookup(|_| None).expect("default config");
    let services = AppServices::in_memory(config, api.clone());

    if let Some(user) = user {
        api.register_session(TEST_TOKEN, user.clone());
        services.api().set_bearer_token(Some(TEST_TOKEN.to_string()));
        services.session().set_user(user);
    }

    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, api, services }
}
