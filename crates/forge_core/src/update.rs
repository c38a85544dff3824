use crate::{build_instruction, AppState, Effect, Msg, Notification};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DescriptionChanged(text) => {
            state.set_description(text);
            Vec::new()
        }
        Msg::StackSelected(stack) => {
            state.select_stack(stack);
            Vec::new()
        }
        Msg::GenerateClicked => {
            // The trigger is disabled while a request is out: at most one in flight.
            if state.is_generating() {
                return (state, Vec::new());
            }
            if state.description().trim().is_empty() {
                return (state, vec![Effect::Notify(Notification::EmptyDescription)]);
            }
            let instruction = build_instruction(state.description(), state.stack());
            let request_id = state.begin_generation();
            vec![Effect::RequestCompletion {
                request_id,
                instruction,
            }]
        }
        Msg::CompletionFinished { request_id, result } => {
            match state.finish_generation(request_id, result) {
                Some(notification) => vec![Effect::Notify(notification)],
                None => Vec::new(),
            }
        }
        Msg::ViewModeToggled => {
            state.toggle_view_mode();
            Vec::new()
        }
        Msg::ThemeToggled => {
            state.toggle_theme();
            Vec::new()
        }
        Msg::CopyClicked => match state.code().code() {
            Some(code) => vec![Effect::CopyToClipboard {
                code: code.to_string(),
            }],
            None => Vec::new(),
        },
        Msg::ClipboardWritten => vec![Effect::Notify(Notification::CodeCopied)],
        Msg::OpenDetachedClicked => match state.code().code() {
            Some(code) => vec![Effect::OpenDetached {
                code: code.to_string(),
                description: state.description().to_string(),
            }],
            None => Vec::new(),
        },
    };

    (state, effects)
}
