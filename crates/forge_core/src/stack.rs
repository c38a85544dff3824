use std::fmt;
use std::str::FromStr;

/// Supported target front-end stacks.
///
/// The `value` strings are what the model sees in the instruction and what the
/// render selector inspects, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stack {
    #[default]
    Html,
    HtmlCss,
    HtmlTailwind,
    HtmlJsTailwind,
    HtmlBootstrap,
}

impl Stack {
    /// Catalog order, as shown in the selection control.
    pub const ALL: [Stack; 5] = [
        Stack::Html,
        Stack::HtmlCss,
        Stack::HtmlTailwind,
        Stack::HtmlJsTailwind,
        Stack::HtmlBootstrap,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Stack::Html => "html",
            Stack::HtmlCss => "html+css",
            Stack::HtmlTailwind => "html+tailwind",
            Stack::HtmlJsTailwind => "html+js+tailwind",
            Stack::HtmlBootstrap => "html+bootstrap",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stack::Html => "HTML",
            Stack::HtmlCss => "HTML + CSS",
            Stack::HtmlTailwind => "HTML + Tailwind CSS",
            Stack::HtmlJsTailwind => "HTML + JS + Tailwind CSS",
            Stack::HtmlBootstrap => "HTML + Bootstrap",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStackError {
    pub input: String,
}

impl fmt::Display for ParseStackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported stack {:?}", self.input)
    }
}

impl std::error::Error for ParseStackError {}

impl FromStr for Stack {
    type Err = ParseStackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Stack::ALL
            .into_iter()
            .find(|stack| stack.value().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseStackError {
                input: s.to_string(),
            })
    }
}
