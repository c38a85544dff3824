use crate::{CodeSlot, Stack};

/// Shown in place of the code panel while there is nothing to display.
pub const EMPTY_PLACEHOLDER: &str = "Your generated code will appear here";

/// Syntax-highlighting grammar for the source view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Javascript,
    Css,
    Markup,
}

impl Grammar {
    /// Identifier understood by the highlighter.
    pub fn id(self) -> &'static str {
        match self {
            Grammar::Javascript => "javascript",
            Grammar::Css => "css",
            Grammar::Markup => "html",
        }
    }
}

/// Maps a stack identifier to a grammar. First match wins: a script marker
/// beats a styling marker, markup is the default.
pub fn highlight_grammar_for(stack_id: &str) -> Grammar {
    let id = stack_id.to_ascii_lowercase();
    if id.contains("js") {
        Grammar::Javascript
    } else if id.contains("css") || id.contains("tailwind") {
        Grammar::Css
    } else {
        Grammar::Markup
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Source,
    Preview,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Source => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Highlighting palette for the source view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub background: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                name: "vsc-dark-plus",
                background: "#1e1e1e",
            },
            Theme::Light => Palette {
                name: "prism",
                background: "#f5f5f5",
            },
        }
    }
}

/// What the code panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderChoice {
    Placeholder,
    Source {
        code: String,
        grammar: Grammar,
        palette: Palette,
    },
    Preview {
        code: String,
    },
}

/// Decides between placeholder, highlighted source and sandboxed preview.
///
/// The failure sentinel is never executed; it always renders as source.
pub fn select_render(slot: &CodeSlot, mode: ViewMode, stack: Stack, theme: Theme) -> RenderChoice {
    let source = |code: &str| RenderChoice::Source {
        code: code.to_string(),
        grammar: highlight_grammar_for(stack.value()),
        palette: Palette::for_theme(theme),
    };
    match slot {
        CodeSlot::Empty => RenderChoice::Placeholder,
        CodeSlot::Failed => source(slot.display_text()),
        CodeSlot::Generated(code) => match mode {
            ViewMode::Source => source(code),
            ViewMode::Preview => RenderChoice::Preview { code: code.clone() },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_ids() {
        assert_eq!(Grammar::Javascript.id(), "javascript");
        assert_eq!(Grammar::Css.id(), "css");
        assert_eq!(Grammar::Markup.id(), "html");
    }

    #[test]
    fn bootstrap_falls_back_to_markup() {
        assert_eq!(highlight_grammar_for("html+bootstrap"), Grammar::Markup);
        assert_eq!(highlight_grammar_for("html+css"), Grammar::Css);
        assert_eq!(highlight_grammar_for("HTML+JS"), Grammar::Javascript);
    }

    #[test]
    fn palette_follows_theme() {
        assert_eq!(Palette::for_theme(Theme::Dark).background, "#1e1e1e");
        assert_eq!(Palette::for_theme(Theme::Light).name, "prism");
    }

    #[test]
    fn toggles_flip() {
        assert_eq!(ViewMode::Source.toggled(), ViewMode::Preview);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
