//! Course history persistence with file locking.
//!
//! The history file is plain JSON. Reads take a shared lock; writes go to a
//! locked temp file in the same directory which is then renamed over the
//! original.

use crate::{AcademicHistory, Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl AcademicHistory {
    /// Load history from a file with shared locking
    ///
    /// Returns an empty history if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No history file at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open history file {:?}: {}. Starting empty.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock history file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read history file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<AcademicHistory>(&contents) {
            Ok(history) => {
                tracing::debug!("Loaded {} records from {:?}", history.records.len(), path);
                Ok(history)
            }
            Err(e) => {
                tracing::warn!("Failed to parse history file {:?}: {}. Starting empty.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save history to a file with exclusive locking, replacing it atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("history path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} records to {:?}", self.records.len(), path);
        Ok(())
    }

    /// Load history, modify it, and save it back
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut AcademicHistory) -> Result<T>,
    {
        let mut history = Self::load(path)?;
        let out = f(&mut history)?;
        history.save(path)?;
        Ok(out)
    }
}
