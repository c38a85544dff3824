use forge_core::{Msg, Stack};

/// One line of session input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    ListStacks,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Type a component description and press Enter to generate it.
  :stack <value>   select the target stack (see :stacks)
  :stacks          list supported stacks
  :gen             generate again with the current description
  :view            toggle between source and preview
  :theme           toggle light/dark
  :copy            copy the generated code to the clipboard
  :open            open a full-window preview
  :help            show this help
  :quit            leave the session";

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Dispatch(vec![
            Msg::DescriptionChanged(trimmed.to_string()),
            Msg::GenerateClicked,
        ]);
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let argument = words.collect::<Vec<_>>().join(" ");
    match name {
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" => Command::Help,
        "stacks" => Command::ListStacks,
        "stack" if argument.is_empty() => Command::Invalid("usage: :stack <value>".to_string()),
        "stack" => match argument.parse::<Stack>() {
            Ok(stack) => Command::Dispatch(vec![Msg::StackSelected(stack)]),
            Err(err) => Command::Invalid(err.to_string()),
        },
        "gen" | "generate" => Command::Dispatch(vec![Msg::GenerateClicked]),
        "view" => Command::Dispatch(vec![Msg::ViewModeToggled]),
        "theme" => Command::Dispatch(vec![Msg::ThemeToggled]),
        "copy" => Command::Dispatch(vec![Msg::CopyClicked]),
        "open" => Command::Dispatch(vec![Msg::OpenDetachedClicked]),
        other => Command::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_describes_and_generates() {
        assert_eq!(
            parse_command("  a dark pricing table \n"),
            Command::Dispatch(vec![
                Msg::DescriptionChanged("a dark pricing table".to_string()),
                Msg::GenerateClicked,
            ])
        );
    }

    #[test]
    fn blank_line_still_triggers_validation() {
        assert_eq!(
            parse_command("   "),
            Command::Dispatch(vec![
                Msg::DescriptionChanged(String::new()),
                Msg::GenerateClicked,
            ])
        );
    }

    #[test]
    fn stack_command() {
        assert_eq!(
            parse_command(":stack html+js+tailwind"),
            Command::Dispatch(vec![Msg::StackSelected(Stack::HtmlJsTailwind)])
        );
        assert!(matches!(parse_command(":stack vue"), Command::Invalid(_)));
        assert!(matches!(parse_command(":stack"), Command::Invalid(_)));
    }

    #[test]
    fn toggles_and_actions() {
        assert_eq!(parse_command(":view"), Command::Dispatch(vec![Msg::ViewModeToggled]));
        assert_eq!(parse_command(":theme"), Command::Dispatch(vec![Msg::ThemeToggled]));
        assert_eq!(parse_command(":copy"), Command::Dispatch(vec![Msg::CopyClicked]));
        assert_eq!(parse_command(":open"), Command::Dispatch(vec![Msg::OpenDetachedClicked]));
        assert_eq!(parse_command(":gen"), Command::Dispatch(vec![Msg::GenerateClicked]));
        assert_eq!(parse_command(":q"), Command::Quit);
        assert_eq!(parse_command(":stacks"), Command::ListStacks);
        assert!(matches!(parse_command(":frobnicate"), Command::Invalid(_)));
    }
}
