pub mod keys;
pub mod migrate;
pub mod operations;
pub mod seed;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub biomechanics_records: sled::Tree,
    pub drills: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub drills_by_category: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let biomechanics_records = db.open_tree(trees::BIOMECHANICS_RECORDS)?;
        let drills = db.open_tree(trees::DRILLS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let drills_by_category = db.open_tree(trees::DRILLS_BY_CATEGORY)?;

        Ok(Self {
            db,
            biomechanics_records,
            drills,
            config_versions,
            drills_by_category,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// 健康检查用：确认底层数据库可读
    pub fn ping(&self) -> Result<(), StoreError> {
        self.config_versions.get(b"_meta:version")?;
        Ok(())
    }

    pub fn size_on_disk(&self) -> Result<u64, StoreError> {
        Ok(self.db.size_on_disk()?)
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
