//! File-backed project storage.
//!
//! Each project is one JSON file holding a [`CanvasState`] blob, named after
//! the sanitized project id inside a data directory.

use std::path::{Path, PathBuf};

use studio_core::CanvasState;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested project has no file in the data directory.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The project file could not be parsed or written.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Projects saved as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    data_dir: PathBuf,
}

impl ProjectStorage {
    /// Open storage rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, project_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", sanitize_filename(project_id)))
    }

    /// Whether a project file exists.
    #[must_use]
    pub fn exists(&self, project_id: &str) -> bool {
        self.path_for(project_id).exists()
    }

    /// Save a composition under `project_id`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, project_id: &str, state: &CanvasState) -> Result<PathBuf, StorageError> {
        let json = state
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.path_for(project_id);
        std::fs::write(&path, json)?;
        tracing::debug!("Saved project {project_id} to {}", path.display());
        Ok(path)
    }

    /// Load the composition saved under `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ProjectNotFound`] if no file exists, or an
    /// error if it cannot be read or parsed.
    pub fn load(&self, project_id: &str) -> Result<CanvasState, StorageError> {
        let path = self.path_for(project_id);
        if !path.exists() {
            return Err(StorageError::ProjectNotFound(project_id.to_string()));
        }
        let contents = std::fs::read_to_string(&path)?;
        CanvasState::from_json(&contents).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// List the project ids found in the data directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory can't be read.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Remove a project's file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ProjectNotFound`] if no file exists, or an
    /// error if it cannot be removed.
    pub fn delete(&self, project_id: &str) -> Result<(), StorageError> {
        let path = self.path_for(project_id);
        if !path.exists() {
            return Err(StorageError::ProjectNotFound(project_id.to_string()));
        }
        std::fs::remove_file(&path)?;
        tracing::debug!("Deleted project {project_id} at {}", path.display());
        Ok(())
    }
}

/// Sanitize a project id for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(project_id: &str) -> String {
    project_id
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
