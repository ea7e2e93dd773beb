//! Repository traits and file system implementations

use crate::config::{ConfigError, InterceptorConfig};
use crate::types::data::Database;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format in {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Invalid configuration in {path}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

impl RepositoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound {
                path: path.to_path_buf(),
            };
        }
        Self::IoError {
            message: format!("Failed to read {}", path.display()),
            source,
        }
    }
}

/// Source of the interceptor configuration
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_config(&self) -> Result<InterceptorConfig, RepositoryError>;
}

/// Source of static game data
#[async_trait]
pub trait DatabaseRepository: Send + Sync {
    async fn load_database(&self) -> Result<Database, RepositoryError>;
}

/// Reads the configuration from a JSON file
pub struct FileConfigRepository {
    path: PathBuf,
}

impl FileConfigRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load_config(&self) -> Result<InterceptorConfig, RepositoryError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RepositoryError::io(&self.path, e))?;

        InterceptorConfig::from_json(&content).map_err(|source| RepositoryError::InvalidConfig {
            path: self.path.clone(),
            source,
        })
    }
}

/// Reads the database from a JSON file
pub struct FileDatabaseRepository {
    path: PathBuf,
}

impl FileDatabaseRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatabaseRepository for FileDatabaseRepository {
    async fn load_database(&self) -> Result<Database, RepositoryError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RepositoryError::io(&self.path, e))?;

        let database: Database =
            serde_json::from_str(&content).map_err(|e| RepositoryError::InvalidFormat {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        log::debug!(
            "Loaded {} map(s) and {} common event(s) from {}",
            database.maps.len(),
            database.common_events.len(),
            self.path.display()
        );
        Ok(database.normalized())
    }
}
