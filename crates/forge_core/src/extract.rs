const FENCE: &str = "```";

/// Which fenced block wins when a reply carries several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockSelection {
    /// Only the first complete block; later blocks and prose are dropped.
    #[default]
    First,
    /// The block whose body is longest once leading and trailing whitespace
    /// is trimmed; earliest on ties.
    Largest,
}

/// Isolates the code artifact from a model reply using the default selection.
pub fn extract_code(raw: &str) -> String {
    extract_code_with(raw, BlockSelection::First)
}

/// Isolates the code artifact from a model reply.
///
/// Never fails: without a complete fenced block the whole reply, trimmed, is
/// taken to be the code. A blank result means "no code".
pub fn extract_code_with(raw: &str, selection: BlockSelection) -> String {
    let mut blocks = FencedBlocks { rest: raw };
    let picked = match selection {
        BlockSelection::First => blocks.next(),
        BlockSelection::Largest => blocks.fold(None, |best: Option<&str>, block| match best {
            Some(current) if current.trim().len() >= block.trim().len() => Some(current),
            _ => Some(block),
        }),
    };
    picked.unwrap_or(raw).trim().to_string()
}

/// Yields the bodies of complete fenced blocks in order of appearance.
struct FencedBlocks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for FencedBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let open = self.rest.find(FENCE)?;
        let after = &self.rest[open + FENCE.len()..];
        let body = &after[body_offset(after)..];
        match body.find(FENCE) {
            Some(close) => {
                self.rest = &body[close + FENCE.len()..];
                Some(&body[..close])
            }
            None => {
                self.rest = "";
                None
            }
        }
    }
}

/// Where the block body starts, relative to the text right after the opening
/// fence. A leading language hint is never part of the body: it is skipped
/// together with the rest of its line when nothing else is on that line, and
/// on its own when code follows it after whitespace or a `<`.
fn body_offset(after_fence: &str) -> usize {
    let line_end = after_fence.find('\n').unwrap_or(after_fence.len());
    let line = &after_fence[..line_end];
    let hint_len = line
        .find(|c: char| !is_hint_char(c))
        .unwrap_or(line.len());
    let rest = &line[hint_len..];
    if rest.trim().is_empty() {
        return (line_end + 1).min(after_fence.len());
    }
    if hint_len > 0 && rest.starts_with(|c: char| matches!(c, ' ' | '\t' | '<')) {
        hint_len
    } else {
        0
    }
}

fn is_hint_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.' | '#')
}
