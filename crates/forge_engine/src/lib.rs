//! Forge engine: completion requests, preview documents and file output.
mod completion;
mod engine;
mod filename;
mod persist;
mod preview;
mod types;

pub use completion::{
    CompletionClient, CompletionSettings, GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
pub use engine::{EngineError, EngineHandle};
pub use filename::preview_filename;
pub use persist::{OutputDir, PersistError};
pub use preview::{
    detached_document, escape_html, inline_preview_document, placeholder_document,
    source_document, DetachedWindow, InlinePanel, Presentation, PresentationPort, PreviewError,
    WindowOpener, INLINE_PANEL_FILENAME, INLINE_PANEL_HEIGHT_PX, SANDBOX_PERMISSIONS,
};
pub use types::{Completion, CompletionError, EngineEvent, FailureKind, RequestId};
