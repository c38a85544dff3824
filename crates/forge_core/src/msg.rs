use crate::{RequestId, Stack};

/// Outcome of one completion request, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Success { raw_text: String },
    Failure { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the description box.
    DescriptionChanged(String),
    /// User picked a target stack.
    StackSelected(Stack),
    /// User pressed Generate.
    GenerateClicked,
    /// Engine finished a completion request.
    CompletionFinished {
        request_id: RequestId,
        result: CompletionResult,
    },
    /// User toggled between source and preview.
    ViewModeToggled,
    /// User toggled light/dark.
    ThemeToggled,
    /// User pressed Copy.
    CopyClicked,
    /// Platform confirmed the clipboard write.
    ClipboardWritten,
    /// User asked for the full-window preview.
    OpenDetachedClicked,
}
