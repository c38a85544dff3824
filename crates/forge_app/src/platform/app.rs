use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use colored::Colorize;
use forge_core::{update, AppState, AppViewModel, CodeSlot, Msg};
use forge_logging::{forge_debug, forge_info, forge_warn};

use crate::platform::effects::EffectRunner;
use crate::platform::ui::commands::{parse_command, Command, HELP};
use crate::platform::ui::panel::refresh_panel;
use crate::platform::ui::render::{render_lines, stack_lines};

const INPUT_POLL: Duration = Duration::from_millis(20);

/// Owns the session state and applies messages to it one at a time.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Runs `msg` and every message its effects produce. Returns whether the
    /// view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let mut queue = VecDeque::from([msg]);
        let mut changed = false;
        while let Some(msg) = queue.pop_front() {
            forge_debug!("dispatch {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            changed |= state.consume_dirty();
            self.state = state;
            queue.extend(self.runner.run(effects));
        }
        changed
    }

    /// Applies any engine results that have already arrived.
    pub fn pump_engine(&mut self) -> bool {
        let mut changed = false;
        for msg in self.runner.poll_engine() {
            changed |= self.dispatch(msg);
        }
        changed
    }

    pub fn wait_for_engine(&mut self, timeout: Duration) -> bool {
        match self.runner.wait_engine(timeout) {
            Some(msg) => self.dispatch(msg),
            None => false,
        }
    }

    fn refresh(&self) -> Option<PathBuf> {
        match refresh_panel(self.runner.output_dir(), &self.view()) {
            Ok(path) => Some(path),
            Err(err) => {
                forge_warn!("panel refresh failed: {}", err);
                None
            }
        }
    }
}

/// Interactive loop: lines from stdin become messages, engine results are
/// applied as they arrive, and the view is redrawn whenever it changes.
pub fn run_session(mut session: Session) -> Result<()> {
    let (input_tx, input_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(parse_command(&line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(Command::Quit);
    });

    forge_info!("session started");
    println!("{}", "uiforge: describe a component, or :help".bold());
    draw(&session);

    loop {
        let mut changed = false;
        match input_rx.recv_timeout(INPUT_POLL) {
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::ListStacks) => stack_lines().iter().for_each(|line| println!("{line}")),
            Ok(Command::Invalid(reason)) => eprintln!("{}", reason.yellow()),
            Ok(Command::Dispatch(msgs)) => {
                for msg in msgs {
                    changed |= session.dispatch(msg);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
        changed |= session.pump_engine();
        if changed {
            draw(&session);
        }
    }

    if session.state().is_generating() {
        forge_info!("session closed with a request in flight; its result is discarded");
    }
    forge_info!("session ended");
    Ok(())
}

fn draw(session: &Session) {
    let panel = session.refresh();
    for line in render_lines(&session.view(), panel.as_deref()) {
        println!("{line}");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub open: bool,
    pub panel: bool,
}

/// One-shot generation: prints the extracted code to stdout. Fails when no
/// code was produced.
pub fn run_generate(
    mut session: Session,
    description: &str,
    options: GenerateOptions,
    timeout: Duration,
) -> Result<()> {
    session.dispatch(Msg::DescriptionChanged(description.to_string()));
    session.dispatch(Msg::GenerateClicked);
    if !session.state().is_generating() {
        bail!("nothing to generate: the description is empty");
    }

    let deadline = Instant::now() + timeout;
    while session.state().is_generating() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            bail!("no reply within {}s", timeout.as_secs());
        }
        session.wait_for_engine(remaining);
    }

    let code = match session.state().code() {
        CodeSlot::Generated(code) => code.clone(),
        CodeSlot::Failed => bail!("generation failed"),
        CodeSlot::Empty => bail!("the reply contained no code"),
    };
    println!("{code}");

    if options.panel {
        session.dispatch(Msg::ViewModeToggled);
        if let Some(path) = session.refresh() {
            eprintln!("panel: {}", path.display());
        }
    }
    if options.open {
        session.dispatch(Msg::OpenDetachedClicked);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use forge_core::Notification;
    use forge_engine::{
        Completion, CompletionClient, CompletionError, EngineHandle, FailureKind, OutputDir,
        WindowOpener,
    };

    use crate::platform::clipboard::Clipboard;
    use crate::platform::ui::notify::Notifier;

    struct ScriptedClient {
        reply: Result<String, String>,
    }

    #[async_trait::async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _instruction: &str) -> Result<Completion, CompletionError> {
            match &self.reply {
                Ok(text) => Ok(Completion {
                    text: text.clone(),
                    model: "scripted".to_string(),
                    finish_reason: None,
                }),
                Err(message) => Err(CompletionError {
                    kind: FailureKind::HttpStatus(500),
                    message: message.clone(),
                }),
            }
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        notifications: Arc<Mutex<Vec<Notification>>>,
        copied: Arc<Mutex<Vec<String>>>,
        opened: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: &Notification) {
            self.notifications.lock().unwrap().push(notification.clone());
        }
    }

    impl Clipboard for Recorder {
        fn write_text(&self, text: &str) -> io::Result<()> {
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    impl WindowOpener for Recorder {
        fn open(&self, path: &Path) -> io::Result<()> {
            self.opened.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&self, _text: &str) -> io::Result<()> {
            Err(io::Error::other("no clipboard"))
        }
    }

    fn session_with(
        reply: Result<&str, &str>,
        dir: &Path,
        clipboard: Option<Box<dyn Clipboard>>,
    ) -> (Session, Recorder) {
        let recorder = Recorder::default();
        let client = ScriptedClient {
            reply: reply.map(str::to_string).map_err(str::to_string),
        };
        let engine = EngineHandle::with_client(Arc::new(client)).unwrap();
        let runner = EffectRunner::new(
            engine,
            clipboard.unwrap_or_else(|| Box::new(recorder.clone())),
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
            OutputDir::new(dir),
        );
        (Session::new(AppState::new(), runner), recorder)
    }

    fn generate(session: &mut Session, description: &str) {
        session.dispatch(Msg::DescriptionChanged(description.to_string()));
        session.dispatch(Msg::GenerateClicked);
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.state().is_generating() && Instant::now() < deadline {
            session.wait_for_engine(Duration::from_millis(50));
        }
        assert!(!session.state().is_generating(), "engine never answered");
    }

    #[test]
    fn successful_generation_then_copy() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) =
            session_with(Ok("Sure!\n```html\n<button>Go</button>\n```"), temp.path(), None);

        generate(&mut session, "a button");
        assert_eq!(
            session.state().code(),
            &CodeSlot::Generated("<button>Go</button>".to_string())
        );

        session.dispatch(Msg::CopyClicked);
        assert_eq!(*recorder.copied.lock().unwrap(), vec!["<button>Go</button>"]);
        assert_eq!(
            *recorder.notifications.lock().unwrap(),
            vec![Notification::GenerationSucceeded, Notification::CodeCopied]
        );
    }

    #[test]
    fn pumping_applies_results_as_they_arrive() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) =
            session_with(Ok("```html\n<nav></nav>\n```"), temp.path(), None);

        session.dispatch(Msg::DescriptionChanged("a nav".to_string()));
        session.dispatch(Msg::GenerateClicked);
        assert!(session.state().is_generating());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut changed = false;
        while session.state().is_generating() && Instant::now() < deadline {
            changed |= session.pump_engine();
            thread::sleep(Duration::from_millis(10));
        }

        assert!(changed);
        assert!(!session.state().is_generating());
        assert_eq!(
            session.state().code(),
            &CodeSlot::Generated("<nav></nav>".to_string())
        );
        assert!(!session.pump_engine());
        assert_eq!(
            *recorder.notifications.lock().unwrap(),
            vec![Notification::GenerationSucceeded]
        );
    }

    #[test]
    fn failed_generation_shows_sentinel() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) = session_with(Err("boom"), temp.path(), None);

        generate(&mut session, "a card");
        assert_eq!(session.state().code(), &CodeSlot::Failed);
        assert!(!session.view().can_copy);
        assert_eq!(
            *recorder.notifications.lock().unwrap(),
            vec![Notification::GenerationFailed {
                reason: "http status 500: boom".to_string()
            }]
        );
    }

    #[test]
    fn empty_description_only_notifies() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) = session_with(Ok("x"), temp.path(), None);

        session.dispatch(Msg::DescriptionChanged("   ".to_string()));
        session.dispatch(Msg::GenerateClicked);
        assert!(!session.state().is_generating());
        assert_eq!(
            *recorder.notifications.lock().unwrap(),
            vec![Notification::EmptyDescription]
        );
    }

    #[test]
    fn failed_copy_does_not_notify() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) =
            session_with(Ok("<p>hi</p>"), temp.path(), Some(Box::new(BrokenClipboard)));

        generate(&mut session, "text");
        session.dispatch(Msg::CopyClicked);
        assert_eq!(
            *recorder.notifications.lock().unwrap(),
            vec![Notification::GenerationSucceeded]
        );
    }

    #[test]
    fn open_detached_writes_wrapper_and_opens_it() {
        let temp = tempfile::TempDir::new().unwrap();
        let (mut session, recorder) = session_with(Ok("<p>hi</p>"), temp.path(), None);

        generate(&mut session, "Hero Banner");
        session.dispatch(Msg::OpenDetachedClicked);

        let opened = recorder.opened.lock().unwrap().clone();
        assert_eq!(opened.len(), 1);
        let name = opened[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("hero-banner--"), "{name}");
        let page = std::fs::read_to_string(&opened[0]).unwrap();
        assert!(page.contains("<title>Full Screen Preview</title>"));
        assert!(page.contains("<p>hi</p>"));
    }

    #[test]
    fn panel_refresh_lands_in_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let (session, _recorder) = session_with(Ok("x"), temp.path(), None);
        let path = session.refresh().unwrap();
        assert_eq!(path, temp.path().join("panel.html"));
    }
}
