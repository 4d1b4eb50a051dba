use personas_core::domain::Persona;
use personas_core::ports::PersonasStorage;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum JsonStorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JsonStorageError>;

/// JSON file implementation of the PersonasStorage trait
pub struct JsonPersonasStorage {
    file_path: PathBuf,
}

impl JsonPersonasStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Writes the full set as a pretty-printed JSON array.
    /// Each backup is staged in its own temporary file next to the target and
    /// only replaces the previous backup once it is fully written.
    pub fn try_backup(&self, personas: &[Persona]) -> Result<()> {
        let parent = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut staging = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut staging, personas)?;
        staging.flush()?;
        staging.persist(&self.file_path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Reads the last backup; a missing file holds no personas
    pub fn try_restore(&self) -> Result<Vec<Persona>> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }
}

impl PersonasStorage for JsonPersonasStorage {
    fn restore(&self) -> Vec<Persona> {
        match self.try_restore() {
            Ok(personas) => {
                info!(path = %self.file_path.display(), count = personas.len(), "restored from json");
                personas
            }
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "json restore failed");
                Vec::new()
            }
        }
    }

    fn backup(&self, personas: &[Persona]) -> bool {
        match self.try_backup(personas) {
            Ok(()) => {
                info!(path = %self.file_path.display(), count = personas.len(), "backed up to json");
                true
            }
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "json backup failed");
                false
            }
        }
    }
}
