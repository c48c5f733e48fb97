//! Free-form application settings stored under `appSettings`.
//!
//! The UI owns the shape of this object; the sidecar only knows the defaults
//! and merges patches shallowly, so unknown keys survive a round trip.

use serde_json::{json, Map, Value};
use tracing::info;

use crate::store::{load_snapshot, save_snapshot, SnapshotStore, StoreError, SETTINGS_KEY};

pub fn defaults() -> Map<String, Value> {
    let v = json!({
        "schoolName": "TeacherHub Academy",
        "schoolEmail": "contact@teacherhub.com",
        "schoolPhone": "+91 98765 43210",
        "schoolAddress": "123 Education Street, Mumbai, Maharashtra 400001",
        "timezone": "Asia/Kolkata",
        "language": "English",

        "theme": "light",
        "sidebarCollapsed": false,
        "compactMode": false,

        "emailNotifications": true,
        "pushNotifications": true,
        "smsNotifications": false,
        "weeklyReports": true,
        "monthlyReports": true,

        "sessionTimeout": "30",
        "passwordExpiry": "90",
        "loginAttempts": "5",
        "twoFactorAuth": false,

        "autoBackup": true,
        "backupFrequency": "daily",
        "retentionPeriod": "365",
        "dataExport": true
    });
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// Stored settings, or the defaults when nothing was saved. Reading never writes.
pub fn load(store: &dyn SnapshotStore) -> Result<Map<String, Value>, StoreError> {
    Ok(load_snapshot(store, SETTINGS_KEY)?.unwrap_or_else(defaults))
}

pub fn update(
    store: &dyn SnapshotStore,
    patch: Map<String, Value>,
) -> Result<Map<String, Value>, StoreError> {
    let mut current = load(store)?;
    let keys = patch.len();
    for (k, v) in patch {
        current.insert(k, v);
    }
    save_snapshot(store, SETTINGS_KEY, &current)?;
    info!(keys, "settings saved");
    Ok(current)
}

pub fn reset(store: &dyn SnapshotStore) -> Result<Map<String, Value>, StoreError> {
    let d = defaults();
    save_snapshot(store, SETTINGS_KEY, &d)?;
    info!("settings reset to defaults");
    Ok(d)
}
