use std::io;
use std::path::{Path, PathBuf};

use forge_logging::forge_info;
use thiserror::Error;

use crate::filename::preview_filename;
use crate::persist::{OutputDir, PersistError};

/// File the inline panel is rendered into, overwritten on every render.
pub const INLINE_PANEL_FILENAME: &str = "panel.html";
pub const INLINE_PANEL_HEIGHT_PX: u32 = 400;
/// Sandbox tokens for the inline frame. Must never include `allow-same-origin`:
/// the generated document runs in an opaque origin and shares no cookies,
/// storage or globals with the host page.
pub const SANDBOX_PERMISSIONS: &str = "allow-scripts allow-forms allow-modals allow-popups";

const DETACHED_TITLE: &str = "Full Screen Preview";
const PRISM_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("nothing to preview")]
    EmptyCode,
    #[error("failed to write preview: {0}")]
    Persist(#[from] PersistError),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where a preview ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub path: PathBuf,
    /// Whether a new browsing context was asked to show it.
    pub opened: bool,
}

/// Runs generated code somewhere isolated from the session.
pub trait PresentationPort {
    /// Fails with [`PreviewError::EmptyCode`] without creating anything when
    /// `code` is blank.
    fn present(&self, code: &str) -> Result<Presentation, PreviewError>;
}

/// Opens a document in a new, independent browsing context.
pub trait WindowOpener: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Fixed-size panel page: a host document embedding the code in a sandboxed
/// frame, or the highlighted source, or the empty-state placeholder.
#[derive(Debug, Clone)]
pub struct InlinePanel {
    dir: OutputDir,
    dark: bool,
}

impl InlinePanel {
    pub fn new(dir: OutputDir) -> Self {
        Self { dir, dark: false }
    }

    pub fn dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    pub fn show_source(
        &self,
        code: &str,
        grammar_id: &str,
        background: &str,
    ) -> Result<PathBuf, PreviewError> {
        let page = source_document(code, grammar_id, background, self.dark);
        Ok(self.dir.write_atomic(INLINE_PANEL_FILENAME, &page)?)
    }

    pub fn show_placeholder(&self, text: &str) -> Result<PathBuf, PreviewError> {
        let page = placeholder_document(text, self.dark);
        Ok(self.dir.write_atomic(INLINE_PANEL_FILENAME, &page)?)
    }
}

impl PresentationPort for InlinePanel {
    fn present(&self, code: &str) -> Result<Presentation, PreviewError> {
        if code.trim().is_empty() {
            return Err(PreviewError::EmptyCode);
        }
        let page = inline_preview_document(code, self.dark);
        let path = self.dir.write_atomic(INLINE_PANEL_FILENAME, &page)?;
        Ok(Presentation {
            path,
            opened: false,
        })
    }
}

/// Full-window preview written to its own file and handed to a
/// [`WindowOpener`]. Closing that window has no effect on the session.
pub struct DetachedWindow<'a> {
    dir: OutputDir,
    opener: &'a dyn WindowOpener,
    label: String,
}

impl<'a> DetachedWindow<'a> {
    pub fn new(dir: OutputDir, opener: &'a dyn WindowOpener) -> Self {
        Self {
            dir,
            opener,
            label: String::new(),
        }
    }

    /// Text the file name is derived from, usually the description.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl PresentationPort for DetachedWindow<'_> {
    fn present(&self, code: &str) -> Result<Presentation, PreviewError> {
        if code.trim().is_empty() {
            return Err(PreviewError::EmptyCode);
        }
        let filename = preview_filename(&self.label, code);
        let path = self.dir.write_atomic(&filename, &detached_document(code))?;
        self.opener.open(&path).map_err(|source| PreviewError::Open {
            path: path.clone(),
            source,
        })?;
        forge_info!("detached preview opened at {:?}", path);
        Ok(Presentation { path, opened: true })
    }
}

/// Minimal well-formed wrapper whose body is the generated code.
pub fn detached_document(code: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <title>{DETACHED_TITLE}</title>\n\
         </head>\n\
         <body>\n\
         {code}\n\
         </body>\n\
         </html>\n"
    )
}

pub fn inline_preview_document(code: &str, dark: bool) -> String {
    let frame = format!(
        "<iframe title=\"preview\" sandbox=\"{SANDBOX_PERMISSIONS}\" \
         referrerpolicy=\"no-referrer\" srcdoc=\"{}\"></iframe>",
        escape_html(code)
    );
    let style = format!(
        "iframe {{ width: 100%; height: {INLINE_PANEL_HEIGHT_PX}px; border: 1px solid {}; \
         border-radius: 8px; background: #ffffff; }}",
        border_color(dark)
    );
    host_page("Preview", dark, &style, "", &frame)
}

/// Highlighted source view. The grammar id selects the Prism language class.
pub fn source_document(code: &str, grammar_id: &str, background: &str, dark: bool) -> String {
    let theme_css = if dark {
        "prism-tomorrow.min.css"
    } else {
        "prism.min.css"
    };
    let head = format!(
        "<link rel=\"stylesheet\" href=\"{PRISM_BASE}/themes/{theme_css}\" />\n\
         <link rel=\"stylesheet\" href=\"{PRISM_BASE}/plugins/line-numbers/prism-line-numbers.min.css\" />\n\
         <script defer src=\"{PRISM_BASE}/prism.min.js\"></script>\n\
         <script defer src=\"{PRISM_BASE}/plugins/line-numbers/prism-line-numbers.min.js\"></script>"
    );
    let style = format!(
        "pre[class*=\"language-\"] {{ margin: 0; padding: 1.5rem 1.5rem 1.5rem 3.8em; \
         background: {background}; font-size: 0.9rem; border-radius: 8px; \
         border: 1px solid {}; }}",
        border_color(dark)
    );
    let body = format!(
        "<pre class=\"line-numbers\"><code class=\"language-{grammar_id}\">{}</code></pre>",
        escape_html(code)
    );
    host_page("Generated Code", dark, &style, &head, &body)
}

pub fn placeholder_document(text: &str, dark: bool) -> String {
    let style = format!(
        ".placeholder {{ height: {INLINE_PANEL_HEIGHT_PX}px; display: flex; align-items: center; \
         justify-content: center; border: 1px dashed {}; border-radius: 8px; color: #9ca3af; }}",
        border_color(dark)
    );
    let body = format!("<div class=\"placeholder\"><p>{}</p></div>", escape_html(text));
    host_page("Generated Code", dark, &style, "", &body)
}

fn border_color(dark: bool) -> &'static str {
    if dark {
        "#4b5563"
    } else {
        "#d1d5db"
    }
}

fn host_page(title: &str, dark: bool, style: &str, head_extra: &str, body: &str) -> String {
    let (class, background, color) = if dark {
        (" class=\"dark\"", "#111827", "#f3f4f6")
    } else {
        ("", "#f3f4f6", "#111827")
    };
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\"{class}>\n\
         <head>\n\
         <meta charset=\"UTF-8\" />\n\
         <title>{title}</title>\n\
         {head_extra}\n\
         <style>\n\
         body {{ margin: 0; padding: 1.5rem; background: {background}; color: {color}; \
         font-family: system-ui, sans-serif; }}\n\
         {style}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n"
    )
}

/// Escapes text for element content and double-quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
