//! Validation of the install folders the user points the app at.

use std::path::{Path, PathBuf};

use shared::domain::PathKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathCheckError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("expected folder named {expected:?}, got {found:?}")]
    WrongFolderName { expected: &'static str, found: String },
    #[error("missing {0}")]
    MissingFile(&'static str),
}

pub fn expected_folder_name(kind: PathKind) -> &'static str {
    match kind {
        PathKind::DedicatedServer => "Don't Starve Together Dedicated Server",
        PathKind::Cluster => "DoNotStarveTogether",
    }
}

/// Checks that `path` is the folder of the given kind and holds every file
/// the app needs from it.
pub fn required_files_exist(path: &Path, kind: PathKind) -> Result<(), PathCheckError> {
    if !path.is_dir() {
        return Err(PathCheckError::NotADirectory(path.to_path_buf()));
    }

    let expected = expected_folder_name(kind);
    let found = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if found != expected {
        return Err(PathCheckError::WrongFolderName { expected, found });
    }

    for &relative in kind.required_files() {
        if !path.join(relative).is_file() {
            return Err(PathCheckError::MissingFile(relative));
        }
    }
    Ok(())
}
