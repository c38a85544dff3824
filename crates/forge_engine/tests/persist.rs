use std::fs;

use forge_engine::{OutputDir, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let dir = OutputDir::new(temp.path().join("nested").join("out"));
    assert!(!dir.path().exists());

    dir.ensure().unwrap();
    assert!(dir.path().is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let dir = OutputDir::new(temp.path());

    let first = dir.write_atomic("panel.html", "one").unwrap();
    let second = dir.write_atomic("panel.html", "two").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "two");
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = OutputDir::new(&file_path).write_atomic("panel.html", "data").unwrap_err();

    assert!(matches!(err, PersistError::OutputDir { .. }));
    assert!(!temp.path().join("panel.html").exists());
}
