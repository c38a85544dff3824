use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use forge_logging::forge_debug;

/// Writes text to the system clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> io::Result<()>;
}

/// Pipes text into the first clipboard tool found on `PATH`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

impl SystemClipboard {
    fn locate() -> Option<(PathBuf, &'static [&'static str])> {
        CANDIDATES
            .iter()
            .find_map(|(program, args)| which::which(program).ok().map(|path| (path, *args)))
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let (program, args) = Self::locate().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no clipboard tool found on PATH")
        })?;
        forge_debug!("copying {} bytes with {:?}", text.len(), program);

        let mut child = Command::new(&program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {status}", program.display())))
        }
    }
}
