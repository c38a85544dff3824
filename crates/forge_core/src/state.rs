use crate::effect::Notification;
use crate::extract::{extract_code_with, BlockSelection};
use crate::render::{select_render, Theme, ViewMode};
use crate::view_model::AppViewModel;
use crate::{CompletionResult, Stack};

pub type RequestId = u64;

/// Text shown in the code panel after a failed generation.
pub const FAILURE_SENTINEL: &str = "// Failed to get response from AI.";

/// What happens to already displayed code when a regeneration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Replace whatever was shown with the failure sentinel.
    #[default]
    ReplaceWithSentinel,
    /// Keep the last good code; only an empty panel shows the sentinel.
    KeepPrevious,
}

/// Session knobs fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    pub stack: Stack,
    pub theme: Theme,
    pub failure_policy: FailurePolicy,
    pub block_selection: BlockSelection,
}

/// The code panel's content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CodeSlot {
    #[default]
    Empty,
    Generated(String),
    Failed,
}

impl CodeSlot {
    fn from_extracted(code: String) -> Self {
        if code.trim().is_empty() {
            CodeSlot::Empty
        } else {
            CodeSlot::Generated(code)
        }
    }

    /// Generated code, if any. The sentinel is not code.
    pub fn code(&self) -> Option<&str> {
        match self {
            CodeSlot::Generated(code) => Some(code),
            CodeSlot::Empty | CodeSlot::Failed => None,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            CodeSlot::Empty => "",
            CodeSlot::Generated(code) => code,
            CodeSlot::Failed => FAILURE_SENTINEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: SessionSettings,
    stack: Stack,
    description: String,
    code: CodeSlot,
    view_mode: ViewMode,
    theme: Theme,
    in_flight: Option<RequestId>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        Self {
            settings,
            stack: settings.stack,
            theme: settings.theme,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let has_code = self.code.code().is_some();
        AppViewModel {
            stack: self.stack,
            description: self.description.clone(),
            is_generating: self.is_generating(),
            can_generate: !self.is_generating() && !self.description.trim().is_empty(),
            can_copy: has_code,
            can_toggle_view: has_code,
            view_mode: self.view_mode,
            theme: self.theme,
            render: select_render(&self.code, self.view_mode, self.stack, self.theme),
            dirty: self.dirty,
        }
    }

    pub fn stack(&self) -> Stack {
        self.stack
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn code(&self) -> &CodeSlot {
        &self.code
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_description(&mut self, text: String) {
        if self.description != text {
            self.description = text;
            self.dirty = true;
        }
    }

    pub(crate) fn select_stack(&mut self, stack: Stack) {
        if self.stack != stack {
            self.stack = stack;
            self.dirty = true;
        }
    }

    /// Marks the session as generating and hands out the id of the new request.
    pub(crate) fn begin_generation(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.in_flight = Some(self.last_request_id);
        self.dirty = true;
        self.last_request_id
    }

    /// Applies a completion for the in-flight request. Returns `None` when the
    /// id is stale, leaving the state untouched.
    pub(crate) fn finish_generation(
        &mut self,
        request_id: RequestId,
        result: CompletionResult,
    ) -> Option<Notification> {
        if self.in_flight != Some(request_id) {
            return None;
        }
        self.in_flight = None;
        self.dirty = true;

        let notification = match result {
            CompletionResult::Success { raw_text } => {
                let code = extract_code_with(&raw_text, self.settings.block_selection);
                self.code = CodeSlot::from_extracted(code);
                Notification::GenerationSucceeded
            }
            CompletionResult::Failure { reason } => {
                let keep = self.settings.failure_policy == FailurePolicy::KeepPrevious
                    && self.code.code().is_some();
                if !keep {
                    self.code = CodeSlot::Failed;
                }
                Notification::GenerationFailed { reason }
            }
        };
        Some(notification)
    }

    /// Flips the view mode. Inert while there is no generated code.
    pub(crate) fn toggle_view_mode(&mut self) -> bool {
        if self.code.code().is_none() {
            return false;
        }
        self.view_mode = self.view_mode.toggled();
        self.dirty = true;
        true
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.dirty = true;
    }
}
