//! Generation session: the client-side state of one browsing session.
//!
//! [`SessionState`] is a plain value. Every change goes through
//! [`SessionState::apply`], which takes the old state and an [`Event`] and
//! returns the new state. [`controller::SessionController`] owns a state,
//! talks to the cover API and runs the loading timers.

pub mod controller;
pub mod history;
pub mod settings;
pub mod timers;

use chrono::{DateTime, Utc};

use crate::params::{Field, Mode};
use crate::ports::GenerationRequest;

pub use history::{filter_history, HistoryItem};
pub use settings::GenerationSettings;

/// The panel currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    /// Settings are editable.
    #[default]
    Form,
    /// A request is in flight.
    Loading,
    /// The latest (or selected) result is shown.
    Preview,
    /// Browsing past results.
    History,
}

/// A settings edit made in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the prompt.
    Prompt(String),
    /// Replace the negative prompt.
    NegativePrompt(String),
    /// Pick a value for a constrained field.
    Choice(Field, String),
    /// Set or clear the seed.
    Seed(Option<u64>),
    /// Set or clear the step count.
    Steps(Option<u32>),
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Switch between image and avatar mode.
    ChangeMode(Mode),
    /// Edit a setting.
    Edit(Edit),
    /// Copy the n-th suggestion of the current mode into the prompt.
    ApplySuggestion(usize),
    /// Submit the form.
    Submit,
    /// The in-flight request returned an image.
    Succeeded {
        /// Data URI of the image.
        image: String,
        /// Completion time.
        at: DateTime<Utc>,
    },
    /// The in-flight request failed.
    Failed(String),
    /// Advance the simulated progress bar.
    ProgressTick,
    /// Show the next loading status line.
    RotateLoadingText,
    /// Open the history panel.
    ViewHistory,
    /// Return to the form.
    Back,
    /// Show a past result.
    SelectHistoryItem(String),
    /// Update the history search query.
    Search(String),
    /// Toggle the avatar preview rotation.
    ToggleRotate,
}

/// Full state of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Current mode.
    pub mode: Mode,
    /// Visible panel.
    pub panel: Panel,
    /// Form settings.
    pub settings: GenerationSettings,
    /// Results, most recent first.
    pub history: Vec<HistoryItem>,
    /// Error banner text from the last failed request.
    pub error: Option<String>,
    /// Simulated progress, 0 to 100.
    pub progress: f32,
    /// Index into the mode's loading texts.
    pub loading_text_index: usize,
    /// History search query.
    pub search_query: String,
    /// History item chosen for preview, if not the latest.
    pub selected: Option<String>,
    /// Avatar preview rotation.
    pub rotating: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        let mode = Mode::default();
        Self {
            mode,
            panel: Panel::Form,
            settings: GenerationSettings::defaults_for(mode),
            history: Vec::new(),
            error: None,
            progress: 0.0,
            loading_text_index: 0,
            search_query: String::new(),
            selected: None,
            rotating: false,
        }
    }
}

impl SessionState {
    /// Compute the state that follows `event`.
    ///
    /// Events that make no sense in the current panel leave the state
    /// unchanged. While loading, only timer ticks and the request outcome
    /// are accepted, and outcomes arriving outside loading are dropped, so
    /// each successful request adds exactly one history item.
    #[must_use]
    pub fn apply(mut self, event: Event) -> Self {
        if self.panel == Panel::Loading {
            match event {
                Event::ProgressTick => {
                    let step = self.mode.options().progress_step;
                    self.progress = (self.progress + step).min(100.0);
                }
                Event::RotateLoadingText => {
                    let len = self.mode.options().loading_texts.len();
                    self.loading_text_index = (self.loading_text_index + 1) % len;
                }
                Event::Succeeded { image, at } => {
                    self.push_history(image, at);
                    self.leave_loading(Panel::Preview);
                }
                Event::Failed(message) => {
                    self.error = Some(message);
                    self.leave_loading(Panel::Form);
                }
                _ => {}
            }
            return self;
        }

        match event {
            Event::ChangeMode(mode) => {
                self.mode = mode;
                self.settings.reconcile(mode);
                self.panel = Panel::Form;
                self.error = None;
                self.selected = None;
                self.rotating = false;
            }
            Event::Edit(edit) if self.panel == Panel::Form => self.edit(edit),
            Event::ApplySuggestion(index) if self.panel == Panel::Form => {
                if let Some(suggestion) = self.mode.options().suggestions.get(index) {
                    self.settings.prompt = (*suggestion).to_string();
                }
            }
            Event::Submit if self.panel == Panel::Form => {
                self.panel = Panel::Loading;
                self.error = None;
                self.progress = 0.0;
                self.loading_text_index = 0;
            }
            Event::ViewHistory if matches!(self.panel, Panel::Form | Panel::Preview) => {
                self.panel = Panel::History;
            }
            Event::Back => {
                self.panel = Panel::Form;
                self.error = None;
                self.selected = None;
            }
            Event::SelectHistoryItem(id) => {
                if let Some(kind) = self.history.iter().find(|i| i.id == id).map(|i| i.kind) {
                    if kind != self.mode {
                        self.mode = kind;
                        self.settings.reconcile(kind);
                    }
                    self.selected = Some(id);
                    self.panel = Panel::Preview;
                    self.rotating = false;
                }
            }
            Event::Search(query) => self.search_query = query,
            Event::ToggleRotate if self.panel == Panel::Preview && self.mode == Mode::Avatar => {
                self.rotating = !self.rotating;
            }
            _ => {}
        }
        self
    }

    fn edit(&mut self, edit: Edit) {
        match edit {
            Edit::Prompt(prompt) => self.settings.prompt = prompt,
            Edit::NegativePrompt(negative) => self.settings.negative_prompt = negative,
            Edit::Choice(field, value) => {
                self.settings.set(self.mode, field, &value);
            }
            Edit::Seed(seed) => self.settings.seed = seed,
            Edit::Steps(steps) => self.settings.steps = steps,
        }
    }

    fn push_history(&mut self, url: String, at: DateTime<Utc>) {
        let prompt = if self.settings.prompt.is_empty() {
            history::FALLBACK_PROMPT.to_string()
        } else {
            self.settings.prompt.clone()
        };
        let item = HistoryItem {
            id: format!("{}-{}", at.timestamp_millis(), self.history.len()),
            kind: self.mode,
            url,
            prompt,
            timestamp: at,
        };
        self.history.insert(0, item);
        self.selected = None;
    }

    fn leave_loading(&mut self, next: Panel) {
        self.panel = next;
        self.progress = 0.0;
    }

    /// Request body for the current settings and mode.
    #[must_use]
    pub fn to_request(&self) -> GenerationRequest {
        self.settings.to_request(self.mode)
    }

    /// Item shown in the preview: the selected one, else the latest.
    #[must_use]
    pub fn preview_item(&self) -> Option<&HistoryItem> {
        match &self.selected {
            Some(id) => self.history.iter().find(|i| &i.id == id),
            None => self.history.first(),
        }
    }

    /// History filtered by the current search query.
    #[must_use]
    pub fn filtered_history(&self) -> Vec<&HistoryItem> {
        filter_history(&self.history, &self.search_query)
    }

    /// Loading status line currently shown.
    #[must_use]
    pub fn loading_text(&self) -> &'static str {
        let texts = self.mode.options().loading_texts;
        texts[self.loading_text_index % texts.len()]
    }
}
