use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{KeyValueBackend, QuoteChild, Record, StoreResult, SEEDED_KEY, SETTINGS_KEY};
use crate::errors::StoreError;
use crate::models::CompanySettings;
use crate::utils::now_rfc3339;

/// Named collections persisted as whole JSON arrays over a key/value backend.
///
/// Every mutation is a read-modify-write of one collection: the current array
/// is loaded, changed in memory and written back in full. Nothing is cached, so
/// two writers sharing a backend race and the last write wins.
pub struct DocumentStore<B> {
    backend: B,
}

/// One collection as read from storage.
///
/// Rows that do not decode as `T` are kept as raw JSON and written back
/// unchanged, after the readable rows, so a single malformed row never costs
/// the rest of the collection.
#[derive(Debug, Clone)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    unreadable: Vec<Value>,
}

impl<T: Record> Rows<T> {
    fn empty() -> Self {
        Rows {
            rows: Vec::new(),
            unreadable: Vec::new(),
        }
    }

    pub fn unreadable_count(&self) -> usize {
        self.unreadable.len()
    }

    /// `max(id) + 1` over readable and unreadable rows, or 1 when there are none.
    pub fn next_id(&self) -> i64 {
        let readable = self.rows.iter().map(|row| row.id());
        let raw = self.unreadable.iter().filter_map(|value| raw_field(value, "id"));
        readable.chain(raw).max().map_or(1, |max| max + 1)
    }

    /// Removes every row whose `field` equals `value`, including unreadable
    /// rows that carry that field. `key_of` reads the same field from a
    /// decoded row. Returns how many rows went.
    pub fn remove_matching<F>(&mut self, field: &str, value: i64, key_of: F) -> usize
    where
        F: Fn(&T) -> i64,
    {
        let before = self.rows.len() + self.unreadable.len();
        self.rows.retain(|row| key_of(row) != value);
        self.unreadable.retain(|raw| raw_field(raw, field) != Some(value));
        before - self.rows.len() - self.unreadable.len()
    }

    /// Serializes into the `(key, value)` pair the backend stores.
    pub fn encode(&self) -> StoreResult<(&'static str, String)> {
        let key = T::COLLECTION.key();
        let mut values = Vec::with_capacity(self.rows.len() + self.unreadable.len());
        for row in &self.rows {
            values.push(serde_json::to_value(row).map_err(|source| StoreError::Encode {
                key: key.to_string(),
                source,
            })?);
        }
        values.extend(self.unreadable.iter().cloned());
        Ok((key, encode(key, &values)?))
    }
}

impl<B: KeyValueBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        DocumentStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads a collection row by row. A missing value, or one that is not a
    /// JSON array, reads as empty; rows that fail to decode are logged and
    /// kept aside.
    pub fn load<T: Record>(&self) -> StoreResult<Rows<T>> {
        let key = T::COLLECTION.key();
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Rows::empty());
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(collection = key, error = %err, "unreadable collection, treating as empty");
                return Ok(Rows::empty());
            }
        };

        let mut loaded = Rows::empty();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(row) => loaded.rows.push(row),
                Err(err) => {
                    warn!(collection = key, index, error = %err, "unreadable row kept as stored");
                    loaded.unreadable.push(value);
                }
            }
        }
        Ok(loaded)
    }

    pub fn save<T: Record>(&self, rows: &Rows<T>) -> StoreResult<()> {
        let (key, encoded) = rows.encode()?;
        self.backend.set(key, &encoded)?;
        debug!(collection = key, rows = rows.rows.len(), "collection written");
        Ok(())
    }

    /// Readable rows in insertion order. Missing collections are empty.
    pub fn list<T: Record>(&self) -> StoreResult<Vec<T>> {
        Ok(self.load::<T>()?.rows)
    }

    pub fn find<T: Record>(&self, id: i64) -> StoreResult<Option<T>> {
        Ok(self.list::<T>()?.into_iter().find(|row| row.id() == id))
    }

    /// `max(id) + 1` over the stored rows, or 1 when there are none.
    pub fn next_id<T: Record>(&self) -> StoreResult<i64> {
        Ok(self.load::<T>()?.next_id())
    }

    pub fn create<T: Record>(&self, draft: T::Draft) -> StoreResult<T> {
        let mut loaded = self.load::<T>()?;
        let row = T::from_draft(loaded.next_id(), draft, &now_rfc3339());
        loaded.rows.push(row.clone());
        self.save(&loaded)?;
        Ok(row)
    }

    /// Returns `None` when no row has `id`; nothing is written in that case.
    pub fn update<T: Record>(&self, id: i64, patch: T::Patch) -> StoreResult<Option<T>> {
        let mut loaded = self.load::<T>()?;
        let Some(row) = loaded.rows.iter_mut().find(|row| row.id() == id) else {
            return Ok(None);
        };
        row.merge(patch, &now_rfc3339());
        let updated = row.clone();
        self.save(&loaded)?;
        Ok(Some(updated))
    }

    pub fn delete<T: Record>(&self, id: i64) -> StoreResult<bool> {
        let mut loaded = self.load::<T>()?;
        if loaded.remove_matching("id", id, |row| row.id()) == 0 {
            return Ok(false);
        }
        self.save(&loaded)?;
        Ok(true)
    }

    /// Applies several pre-encoded collection writes as one backend call.
    pub fn write_batch(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        self.backend.set_many(entries)?;
        debug!(keys = entries.len(), "batch written");
        Ok(())
    }

    /// Rows of a child collection that belong to `quote_id`, in stored order.
    pub fn children<T: QuoteChild>(&self, quote_id: i64) -> StoreResult<Vec<T>> {
        Ok(self
            .list::<T>()?
            .into_iter()
            .filter(|row| row.quote_id() == quote_id)
            .collect())
    }

    /// Drops every existing child of `quote_id` and appends the drafts with
    /// fresh ids and `sortOrder` equal to their position.
    pub fn replace_children<T: QuoteChild>(
        &self,
        quote_id: i64,
        drafts: Vec<T::Draft>,
    ) -> StoreResult<Vec<T>> {
        let mut loaded = self.load::<T>()?;
        loaded.remove_matching("quoteId", quote_id, |row| row.quote_id());

        let now = now_rfc3339();
        let first_id = loaded.next_id();
        let created: Vec<T> = drafts
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| {
                let mut row = T::from_draft(first_id + idx as i64, draft, &now);
                row.attach(quote_id, idx as i64);
                row
            })
            .collect();

        loaded.rows.extend(created.iter().cloned());
        self.save(&loaded)?;
        Ok(created)
    }

    pub fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.backend.get(key)
    }

    /// Company settings over the built-in defaults, merged key by key: a
    /// stored field that does not fit its type keeps the default and the other
    /// stored fields still apply. A value that is not a JSON object yields
    /// defaults.
    pub fn settings(&self) -> StoreResult<CompanySettings> {
        let Some(raw) = self.backend.get(SETTINGS_KEY)? else {
            return Ok(CompanySettings::default());
        };

        let stored = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("settings are not a JSON object, using defaults");
                return Ok(CompanySettings::default());
            }
            Err(err) => {
                warn!(error = %err, "unreadable settings, using defaults");
                return Ok(CompanySettings::default());
            }
        };

        let mut merged = match serde_json::to_value(CompanySettings::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (field, value) in stored {
            let mut candidate = merged.clone();
            candidate.insert(field.clone(), value);
            if serde_json::from_value::<CompanySettings>(Value::Object(candidate.clone())).is_ok() {
                merged = candidate;
            } else {
                warn!(field = %field, "stored setting has the wrong type, keeping default");
            }
        }

        Ok(serde_json::from_value(Value::Object(merged)).unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &CompanySettings) -> StoreResult<()> {
        let encoded = encode(SETTINGS_KEY, settings)?;
        self.backend.set(SETTINGS_KEY, &encoded)
    }

    pub fn is_seeded(&self) -> StoreResult<bool> {
        Ok(self.backend.get(SEEDED_KEY)?.is_some())
    }

    pub fn mark_seeded(&self) -> StoreResult<()> {
        self.backend.set(SEEDED_KEY, "true")
    }
}

fn raw_field(value: &Value, field: &str) -> Option<i64> {
    value.get(field).and_then(Value::as_i64)
}

fn encode<V: Serialize + ?Sized>(key: &str, value: &V) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}
