use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use forge_engine::{
    DetachedWindow, InlinePanel, OutputDir, PresentationPort, PreviewError, WindowOpener,
    INLINE_PANEL_FILENAME,
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl WindowOpener for RecordingOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
        }
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn inline_panel_writes_sandboxed_host_page() {
    let temp = TempDir::new().unwrap();
    let panel = InlinePanel::new(OutputDir::new(temp.path()));

    let presentation = panel.present("<button>Hi</button>").unwrap();

    assert_eq!(presentation.path, temp.path().join(INLINE_PANEL_FILENAME));
    assert!(!presentation.opened);
    let page = fs::read_to_string(&presentation.path).unwrap();
    assert!(page.contains("<iframe title=\"preview\" sandbox=\"allow-scripts"));
    assert!(page.contains("srcdoc=\"&lt;button&gt;Hi&lt;/button&gt;\""));
    assert!(!page.contains("<button>Hi</button>"));
}

#[test]
fn inline_panel_rerenders_in_place() {
    let temp = TempDir::new().unwrap();
    let panel = InlinePanel::new(OutputDir::new(temp.path())).dark(true);

    let first = panel.show_placeholder("Your generated code will appear here").unwrap();
    let second = panel.show_source("<p>x</p>", "html", "#1e1e1e").unwrap();

    assert_eq!(first, second);
    let page = fs::read_to_string(&second).unwrap();
    assert!(page.contains("language-html"));
    assert!(page.contains("class=\"dark\""));
}

#[test]
fn empty_code_creates_no_sandbox() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let opener = RecordingOpener::default();

    let inline = InlinePanel::new(OutputDir::new(&out)).present("  \n");
    let detached = DetachedWindow::new(OutputDir::new(&out), &opener).present("");

    assert!(matches!(inline, Err(PreviewError::EmptyCode)));
    assert!(matches!(detached, Err(PreviewError::EmptyCode)));
    assert!(!out.exists());
    assert!(opener.opened.lock().unwrap().is_empty());
}

#[test]
fn detached_window_writes_wrapper_and_opens_it() {
    let temp = TempDir::new().unwrap();
    let opener = RecordingOpener::default();
    let window = DetachedWindow::new(OutputDir::new(temp.path()), &opener).labelled("A pricing table");

    let presentation = window.present("<table></table>").unwrap();

    assert!(presentation.opened);
    let name = presentation.path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("a-pricing-table--"));
    let page = fs::read_to_string(&presentation.path).unwrap();
    assert!(page.contains("<title>Full Screen Preview</title>"));
    assert!(page.contains("<body>\n<table></table>\n</body>"));
    assert_eq!(*opener.opened.lock().unwrap(), vec![presentation.path.clone()]);
}

#[test]
fn opener_failure_is_reported_after_writing() {
    let temp = TempDir::new().unwrap();
    let opener = RecordingOpener {
        fail: true,
        ..RecordingOpener::default()
    };
    let window = DetachedWindow::new(OutputDir::new(temp.path()), &opener);

    let err = window.present("<p>x</p>").unwrap_err();

    match err {
        PreviewError::Open { path, .. } => assert!(path.exists()),
        other => panic!("expected open error, got {other:?}"),
    }
}
