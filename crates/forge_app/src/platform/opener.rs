use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use forge_engine::WindowOpener;

/// Opens files in the desktop's default browser.
#[derive(Debug, Default)]
pub struct SystemOpener;

#[cfg(target_os = "windows")]
fn launcher(path: &Path) -> io::Result<Command> {
    let cmd = which::which("cmd").map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let mut command = Command::new(cmd);
    command.args(["/C", "start", ""]).arg(path);
    Ok(command)
}

#[cfg(target_os = "macos")]
fn launcher(path: &Path) -> io::Result<Command> {
    let open = which::which("open").map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let mut command = Command::new(open);
    command.arg(path);
    Ok(command)
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn launcher(path: &Path) -> io::Result<Command> {
    let open = which::which("xdg-open").map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))?;
    let mut command = Command::new(open);
    command.arg(path);
    Ok(command)
}

impl WindowOpener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        let status = launcher(path)?
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("browser launcher exited with {status}")))
        }
    }
}
