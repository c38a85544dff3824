use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory unusable: {path}: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory that receives rendered preview pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory if missing and checks that it accepts files.
    pub fn ensure(&self) -> Result<(), PersistError> {
        let unusable = |reason: String| PersistError::OutputDir {
            path: self.path.clone(),
            reason,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".into())),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.path).map_err(|e| unusable(e.to_string()))?;
            }
            Err(err) => return Err(unusable(err.to_string())),
        }
        NamedTempFile::new_in(&self.path).map_err(|e| unusable(e.to_string()))?;
        Ok(())
    }

    /// Writes `content` to `{dir}/{filename}` through a temp file and rename,
    /// so a browser reloading the page never sees a half-written document.
    pub fn write_atomic(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        self.ensure()?;

        let target = self.path.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
