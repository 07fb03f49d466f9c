use std::{
    fs, io,
    path::{Path, PathBuf},
};

use path_defence_world::{Progress, ProgressError, ProgressStore};
use tracing::warn;

/// Progress store backed by a single JSON file.
#[derive(Clone, Debug)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Option<Progress> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Progress::from_json(&raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "progress file unreadable");
                None
            }
        }
    }

    fn save(&mut self, progress: Progress) -> Result<(), ProgressError> {
        fs::write(&self.path, progress.to_json()?)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressError> {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}
