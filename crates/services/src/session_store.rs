use tokio::sync::watch;

use review_core::model::User;

/// Where the sign-in flow currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// A credential exchange is in flight.
    Authenticating,
    Authenticated(User),
}

/// Value broadcast to every subscriber of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: AuthState,
    /// Bumped on every change; views key their fetches on it.
    pub revision: u64,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        self.state == AuthState::Authenticating
    }
}

/// Single owner of the signed-in user, shared by every view.
///
/// Writers replace the snapshot; readers either clone it or subscribe for
/// change notifications.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionSnapshot>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user().cloned()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn begin_authentication(&self) {
        self.update(AuthState::Authenticating, None);
    }

    /// Install a (possibly updated) user, e.g. after login or a grade change.
    pub fn set_user(&self, user: User) {
        self.update(AuthState::Authenticated(user), None);
    }

    /// Drop back to signed-out and surface `message`.
    pub fn fail(&self, message: impl Into<String>) {
        self.update(AuthState::Unauthenticated, Some(message.into()));
    }

    pub fn clear(&self) {
        self.update(AuthState::Unauthenticated, None);
    }

    fn update(&self, state: AuthState, last_error: Option<String>) {
        self.tx.send_modify(|snapshot| {
            snapshot.state = state;
            snapshot.last_error = last_error;
            snapshot.revision += 1;
        });
    }
}
