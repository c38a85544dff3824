//! Forge core: pure session state machine, prompt construction, code
//! extraction and render selection.
mod effect;
mod extract;
mod msg;
mod prompt;
mod render;
mod stack;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, Severity};
pub use extract::{extract_code, extract_code_with, BlockSelection};
pub use msg::{CompletionResult, Msg};
pub use prompt::build_instruction;
pub use render::{
    highlight_grammar_for, select_render, Grammar, Palette, RenderChoice, Theme, ViewMode,
    EMPTY_PLACEHOLDER,
};
pub use stack::{ParseStackError, Stack};
pub use state::{AppState, CodeSlot, FailurePolicy, RequestId, SessionSettings, FAILURE_SENTINEL};
pub use update::update;
pub use view_model::AppViewModel;
