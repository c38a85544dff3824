use std::time::Duration;

use forge_core::{CompletionResult, Effect, Msg};
use forge_engine::{
    DetachedWindow, EngineEvent, EngineHandle, OutputDir, PresentationPort, WindowOpener,
};
use forge_logging::{forge_info, forge_warn};

use crate::platform::clipboard::Clipboard;
use crate::platform::ui::notify::Notifier;

/// Carries out the effects returned by `update` and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    clipboard: Box<dyn Clipboard>,
    opener: Box<dyn WindowOpener>,
    notifier: Box<dyn Notifier>,
    output_dir: OutputDir,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        clipboard: Box<dyn Clipboard>,
        opener: Box<dyn WindowOpener>,
        notifier: Box<dyn Notifier>,
        output_dir: OutputDir,
    ) -> Self {
        Self {
            engine,
            clipboard,
            opener,
            notifier,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &OutputDir {
        &self.output_dir
    }

    /// Runs `effects` in order. Returns the messages they produced, which the
    /// caller feeds back through `update`.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestCompletion {
                    request_id,
                    instruction,
                } => {
                    forge_info!(
                        "RequestCompletion request_id={} instruction_len={}",
                        request_id,
                        instruction.len()
                    );
                    self.engine.submit(request_id, instruction);
                }
                Effect::Notify(notification) => self.notifier.notify(&notification),
                Effect::CopyToClipboard { code } => match self.clipboard.write_text(&code) {
                    Ok(()) => follow_up.push(Msg::ClipboardWritten),
                    Err(err) => forge_warn!("clipboard write failed: {}", err),
                },
                Effect::OpenDetached { code, description } => {
                    let window = DetachedWindow::new(self.output_dir.clone(), self.opener.as_ref())
                        .labelled(description);
                    if let Err(err) = window.present(&code) {
                        forge_warn!("detached preview failed: {}", err);
                    }
                }
            }
        }
        follow_up
    }

    pub fn poll_engine(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }

    pub fn wait_engine(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CompletionFinished { request_id, result } => Msg::CompletionFinished {
            request_id,
            result: match result {
                Ok(completion) => CompletionResult::Success {
                    raw_text: completion.text,
                },
                Err(err) => {
                    forge_warn!("Request {} failed: {}", request_id, err);
                    CompletionResult::Failure {
                        reason: err.to_string(),
                    }
                }
            },
        },
    }
}
