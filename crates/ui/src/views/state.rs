use dioxus::prelude::*;

/// User-facing failure text for a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError(String);

impl ViewError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new("Something went wrong. Please try again.")
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::unknown()),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Progress of a one-shot mutation (save, delete, upload).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Error(ViewError),
}

impl SaveState {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, SaveState::Saving)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SaveState::Error(err) => Some(err.message()),
            _ => None,
        }
    }
}
