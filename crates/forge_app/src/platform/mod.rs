pub mod app;
pub mod clipboard;
pub mod config;
pub mod effects;
pub mod logging;
pub mod opener;
pub mod ui;

use std::time::Duration;

use anyhow::Result;
use forge_core::{AppState, Stack};
use forge_engine::{EngineHandle, OutputDir};
use forge_logging::{forge_info, forge_warn};

use crate::cli::{Args, Command};
use app::{GenerateOptions, Session};
use clipboard::SystemClipboard;
use config::Settings;
use effects::EffectRunner;
use opener::SystemOpener;
use ui::notify::TerminalNotifier;
use ui::render::stack_lines;

/// Slack on top of the request timeout before a one-shot run gives up.
const REPLY_GRACE: Duration = Duration::from_secs(5);

pub fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?.with_overrides(args.overrides());
    forge_info!(
        "uiforge starting model={} endpoint={}",
        settings.model,
        settings.endpoint
    );

    match args.command.unwrap_or(Command::Session { stack: None }) {
        Command::Stacks => {
            for line in stack_lines() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Session { stack } => app::run_session(build_session(&settings, stack)?),
        Command::Generate {
            description,
            stack,
            open,
            panel,
        } => {
            let timeout = Duration::from_secs(settings.connect_timeout_secs)
                + Duration::from_secs(settings.request_timeout_secs)
                + REPLY_GRACE;
            app::run_generate(
                build_session(&settings, stack)?,
                &description,
                GenerateOptions { open, panel },
                timeout,
            )
        }
    }
}

fn build_session(settings: &Settings, stack: Option<Stack>) -> Result<Session> {
    let api_key = settings.api_key_from_env();
    if api_key.is_none() {
        forge_warn!(
            "{} is not set; generation requests will fail",
            settings.api_key_env
        );
    }
    let engine = EngineHandle::new(settings.completion_settings(api_key))?;
    let output_dir = OutputDir::new(settings.output_dir.clone());
    output_dir.ensure()?;

    let runner = EffectRunner::new(
        engine,
        Box::new(SystemClipboard),
        Box::new(SystemOpener),
        Box::new(TerminalNotifier),
        output_dir,
    );
    let state = AppState::with_settings(settings.session_settings(stack)?);
    Ok(Session::new(state, runner))
}
