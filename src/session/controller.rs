//! Drives a [`SessionState`] through the request/response lifecycle.

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::timers::LoadingTimers;
use super::{Event, Panel, SessionState};
use crate::ports::CoverApi;

/// Called after every applied event with the event and the resulting state.
pub type Observer = Box<dyn FnMut(&Event, &SessionState) + Send>;

/// Owns a session's state and submits its requests through a [`CoverApi`].
pub struct SessionController<A> {
    api: A,
    state: SessionState,
    observer: Option<Observer>,
}

impl<A: CoverApi> SessionController<A> {
    /// Start a fresh session.
    pub fn new(api: A) -> Self {
        Self { api, state: SessionState::default(), observer: None }
    }

    /// Watch every state change, including timer ticks during loading.
    #[must_use]
    pub fn with_observer(
        mut self,
        observer: impl FnMut(&Event, &SessionState) + Send + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply a user event.
    pub fn dispatch(&mut self, event: Event) {
        apply(&mut self.state, &mut self.observer, event);
    }

    /// Submit the current settings and wait for the outcome.
    ///
    /// Loading timers run while the request is in flight and are torn down
    /// before the outcome is applied. Does nothing unless the form is shown.
    /// Returns `true` if a history item was added.
    pub async fn submit(&mut self) -> bool {
        if self.state.panel != Panel::Form {
            return false;
        }
        let request = self.state.to_request();
        let history_len = self.state.history.len();
        apply(&mut self.state, &mut self.observer, Event::Submit);
        debug!(mode = %request.mode, prompt_len = request.prompt.chars().count(), "submitting");

        let Self { api, state, observer } = self;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timers = LoadingTimers::start(&tx);
        drop(tx);

        let mut call = api.generate(&request);
        let outcome = loop {
            tokio::select! {
                result = &mut call => break result,
                Some(event) = rx.recv() => apply(state, observer, event),
            }
        };
        drop(timers);

        let event = match outcome {
            Ok(image) => Event::Succeeded { image, at: Utc::now() },
            Err(message) => {
                warn!(%message, "generation failed");
                Event::Failed(message)
            }
        };
        apply(state, observer, event);
        state.history.len() > history_len
    }
}

fn apply(state: &mut SessionState, observer: &mut Option<Observer>, event: Event) {
    let Some(observer) = observer else {
        *state = std::mem::take(state).apply(event);
        return;
    };
    let seen = event.clone();
    *state = std::mem::take(state).apply(event);
    observer(&seen, state);
}
