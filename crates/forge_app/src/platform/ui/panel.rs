use std::path::PathBuf;

use forge_core::{AppViewModel, RenderChoice, EMPTY_PLACEHOLDER};
use forge_engine::{InlinePanel, OutputDir, PresentationPort, PreviewError};

/// Re-renders the inline panel page for the current view and returns its path.
pub fn refresh_panel(dir: &OutputDir, view: &AppViewModel) -> Result<PathBuf, PreviewError> {
    let panel = InlinePanel::new(dir.clone()).dark(view.theme.is_dark());
    match &view.render {
        RenderChoice::Placeholder => panel.show_placeholder(EMPTY_PLACEHOLDER),
        RenderChoice::Source {
            code,
            grammar,
            palette,
        } => panel.show_source(code, grammar.id(), palette.background),
        RenderChoice::Preview { code } => panel.present(code).map(|shown| shown.path),
    }
}
