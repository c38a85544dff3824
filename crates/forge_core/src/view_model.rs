use crate::{RenderChoice, Stack, Theme, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub stack: Stack,
    pub description: String,
    pub is_generating: bool,
    /// Generate is disabled while generating or while the description is blank.
    pub can_generate: bool,
    pub can_copy: bool,
    pub can_toggle_view: bool,
    pub view_mode: ViewMode,
    pub theme: Theme,
    pub render: RenderChoice,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn generate_label(&self) -> &'static str {
        if self.is_generating {
            "Generating..."
        } else {
            "Generate Code"
        }
    }

    /// Label of the view toggle, naming the mode it switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self.view_mode {
            ViewMode::Source => "Preview",
            ViewMode::Preview => "Code View",
        }
    }
}
