use std::path::Path;

use forge_core::{AppViewModel, RenderChoice, Stack, ViewMode, EMPTY_PLACEHOLDER};

/// Terminal rendering of the session view. Pure so it can be tested.
pub fn render_lines(view: &AppViewModel, panel_path: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();
    let status = if view.is_generating {
        view.generate_label()
    } else if view.can_generate {
        "Ready"
    } else {
        "Idle"
    };
    lines.push(format!(
        "[{status}] stack: {} ({}) | view: {} | theme: {:?}",
        view.stack.label(),
        view.stack.value(),
        match view.view_mode {
            ViewMode::Source => "code",
            ViewMode::Preview => "preview",
        },
        view.theme
    ));
    if !view.description.is_empty() {
        lines.push(format!("description: {}", view.description));
    }

    match &view.render {
        RenderChoice::Placeholder => lines.push(format!("  {EMPTY_PLACEHOLDER}")),
        RenderChoice::Source {
            code,
            grammar,
            palette,
        } => {
            lines.push(format!("--- {} ({}) ---", grammar.id(), palette.name));
            let width = code.lines().count().max(1).to_string().len();
            lines.extend(
                code.lines()
                    .enumerate()
                    .map(|(index, line)| format!("{:>width$} | {line}", index + 1)),
            );
        }
        RenderChoice::Preview { .. } => {
            lines.push("--- preview ---".to_string());
            if let Some(path) = panel_path {
                lines.push(format!("  rendered in sandboxed panel: {}", path.display()));
            }
        }
    }

    let mut actions = Vec::new();
    if view.can_copy {
        actions.push(":copy");
        actions.push(":open");
    }
    if view.can_toggle_view {
        actions.push(match view.view_mode {
            ViewMode::Source => ":view (Preview)",
            ViewMode::Preview => ":view (Code View)",
        });
    }
    actions.push(":theme");
    actions.push(":help");
    lines.push(actions.join("  "));
    lines
}

pub fn stack_lines() -> Vec<String> {
    Stack::ALL
        .iter()
        .map(|stack| format!("{:<18} {}", stack.value(), stack.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{update, AppState, CompletionResult, Msg};
    use std::path::PathBuf;

    fn generated(raw: &str) -> AppState {
        let (state, _) = update(AppState::new(), Msg::DescriptionChanged("card".to_string()));
        let (state, _) = update(state, Msg::GenerateClicked);
        let (state, _) = update(
            state,
            Msg::CompletionFinished {
                request_id: 1,
                result: CompletionResult::Success {
                    raw_text: raw.to_string(),
                },
            },
        );
        state
    }

    #[test]
    fn empty_session_shows_placeholder() {
        let lines = render_lines(&AppState::new().view(), None);
        assert!(lines[0].starts_with("[Idle] stack: HTML (html)"));
        assert!(lines.contains(&"  Your generated code will appear here".to_string()));
        assert_eq!(lines.last().unwrap(), ":theme  :help");
    }

    #[test]
    fn source_is_numbered() {
        let state = generated("```html\n<div>\n</div>\n```");
        let lines = render_lines(&state.view(), None);
        assert!(lines.contains(&"--- html (prism) ---".to_string()));
        assert!(lines.contains(&"1 | <div>".to_string()));
        assert!(lines.contains(&"2 | </div>".to_string()));
        assert!(lines.last().unwrap().contains(":view (Preview)"));
    }

    #[test]
    fn preview_points_at_panel() {
        let (state, _) = update(generated("<p>x</p>"), Msg::ViewModeToggled);
        let path = PathBuf::from("/tmp/panel.html");
        let lines = render_lines(&state.view(), Some(&path));
        assert!(lines.contains(&"--- preview ---".to_string()));
        assert!(lines.iter().any(|line| line.contains("/tmp/panel.html")));
    }

    #[test]
    fn stacks_in_catalog_order() {
        let lines = stack_lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("html "));
        assert!(lines[4].ends_with("HTML + Bootstrap"));
    }
}
