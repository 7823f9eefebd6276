pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub rating_states: sled::Tree,
    pub technical_progress: sled::Tree,
    pub personality_results: sled::Tree,
    pub final_reports: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub users_by_created_at: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let rating_states = db.open_tree(trees::RATING_STATES)?;
        let technical_progress = db.open_tree(trees::TECHNICAL_PROGRESS)?;
        let personality_results = db.open_tree(trees::PERSONALITY_RESULTS)?;
        let final_reports = db.open_tree(trees::FINAL_REPORTS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let users_by_created_at = db.open_tree(trees::USERS_BY_CREATED_AT)?;

        Ok(Self {
            db,
            users,
            rating_states,
            technical_progress,
            personality_results,
            final_reports,
            config_versions,
            users_by_created_at,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads and decodes one JSON value from `tree`.
    pub(crate) fn get_json<T: DeserializeOwned>(
        tree: &sled::Tree,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match tree.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn put_json<T: Serialize>(
        tree: &sled::Tree,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        tree.insert(key.as_bytes(), Self::serialize(value)?)?;
        Ok(())
    }
}
