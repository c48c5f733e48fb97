//! Key-value snapshot storage.
//!
//! Each collection is stored as one JSON document under a fixed key. Readers
//! get the whole collection back or nothing; there is no partial write.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const TEACHERS_KEY: &str = "teachers";
pub const PAYMENTS_KEY: &str = "payments";
pub const SETTINGS_KEY: &str = "appSettings";

/// Every key the workspace knows about, in export order.
pub const ALL_KEYS: [&str; 3] = [TEACHERS_KEY, PAYMENTS_KEY, SETTINGS_KEY];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("snapshot `{key}` is corrupt: {source}")]
    CorruptSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Writes (`Some`) or removes (`None`) each key. Backends that support it
    /// apply the whole batch or none of it.
    fn replace_all(&self, entries: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            match value {
                Some(v) => self.save(key, v)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

pub fn load_snapshot<T>(store: &dyn SnapshotStore, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
{
    let Some(text) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::CorruptSnapshot {
            key: key.to_string(),
            source,
        })
}

pub fn save_snapshot<T>(store: &dyn SnapshotStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &text)
}

/// Reads `key`, or writes `seed()` under it when nothing is stored yet.
/// A stored value that does not parse is an error, never replaced by the seed.
pub fn load_or_seed<T, F>(store: &dyn SnapshotStore, key: &str, seed: F) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    if let Some(v) = load_snapshot(store, key)? {
        return Ok(v);
    }
    let seeded = seed();
    save_snapshot(store, key, &seeded)?;
    tracing::info!(key, "seeded empty snapshot");
    Ok(seeded)
}
