use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::db::{DocumentStore, KeyValueBackend, StoreResult, EXPORT_KEYS};
use crate::errors::StoreError;

/// Serializes every collection plus the settings into one pretty-printed JSON
/// object. Keys with no stored value are exported as `null`.
pub fn export_all_data<B: KeyValueBackend>(store: &DocumentStore<B>) -> StoreResult<String> {
    let mut backup = Map::new();
    for key in EXPORT_KEYS {
        let value = match store.read_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key, error = %err, "unreadable value left out of export");
                Value::Null
            }),
            None => Value::Null,
        };
        backup.insert(key.to_string(), value);
    }

    serde_json::to_string_pretty(&Value::Object(backup)).map_err(|source| StoreError::Encode {
        key: "backup".to_string(),
        source,
    })
}

/// Restores a backup produced by [`export_all_data`].
///
/// Returns `Ok(false)` when `json` is not a JSON object; nothing is written in
/// that case. Known keys present with a non-null value overwrite the stored
/// value; everything else is left alone. The writes land in one batch.
pub fn import_all_data<B: KeyValueBackend>(store: &DocumentStore<B>, json: &str) -> StoreResult<bool> {
    let backup: Map<String, Value> = match serde_json::from_str(json) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("backup is not a JSON object, import skipped");
            return Ok(false);
        }
        Err(err) => {
            warn!(error = %err, "backup is not valid JSON, import skipped");
            return Ok(false);
        }
    };

    for key in backup.keys().filter(|key| !EXPORT_KEYS.contains(&key.as_str())) {
        warn!(key = %key, "unknown backup key ignored");
    }

    let mut entries: Vec<(&str, String)> = Vec::new();
    for key in EXPORT_KEYS {
        match backup.get(key) {
            Some(Value::Null) | None => continue,
            Some(value) => {
                let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
                    key: key.to_string(),
                    source,
                })?;
                entries.push((key, encoded));
            }
        }
    }

    store.write_batch(&entries)?;
    info!(keys = entries.len(), "backup imported");
    Ok(true)
}
