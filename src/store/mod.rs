pub mod json_store;
pub mod schema;

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TutorError;
use crate::store::schema::{
    EXPORT_VERSION, Envelope, ExportData, PROGRESS_KEY, STATE_VERSION, THEME_KEY,
};

/// Durable key-value storage shared by the stores. Each store owns one key.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Non-durable storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the envelope stored under `key`. Missing, unreadable and malformed
/// records all come back as `None`; the caller falls back to its default.
pub fn load_state<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, ?err, "storage read failed");
            return None;
        }
    };
    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) => Some(envelope.state),
        Err(err) => {
            tracing::warn!(key, %err, "discarding malformed stored state");
            None
        }
    }
}

pub fn save_state<T: Serialize>(storage: &dyn Storage, key: &str, state: &T) -> Result<()> {
    let envelope = Envelope {
        state,
        version: STATE_VERSION,
    };
    let json = serde_json::to_string(&envelope)?;
    storage
        .set(key, &json)
        .with_context(|| format!("write {key}"))
}

/// Bundle the persisted progress and theme into an export payload stamped
/// with `now_ms`.
pub fn export_all(storage: &dyn Storage, now_ms: i64) -> ExportData {
    ExportData {
        docktutor_export_version: EXPORT_VERSION,
        exported_at: DateTime::from_timestamp_millis(now_ms).unwrap_or_default(),
        progress: load_state(storage, PROGRESS_KEY).unwrap_or_default(),
        theme: load_state(storage, THEME_KEY).unwrap_or_default(),
    }
}

/// Replace both stored records with the bundle's contents.
///
/// Payloads are serialized before anything is written. If a write fails,
/// keys already written are restored to their previous value (or removed
/// if they had none).
pub fn import_all(storage: &dyn Storage, data: &ExportData) -> Result<()> {
    if data.docktutor_export_version != EXPORT_VERSION {
        return Err(TutorError::UnsupportedExportVersion {
            found: data.docktutor_export_version,
            expected: EXPORT_VERSION,
        }
        .into());
    }

    let staged = [
        (
            PROGRESS_KEY,
            serde_json::to_string(&Envelope {
                state: &data.progress,
                version: STATE_VERSION,
            })?,
        ),
        (
            THEME_KEY,
            serde_json::to_string(&Envelope {
                state: &data.theme,
                version: STATE_VERSION,
            })?,
        ),
    ];

    let mut committed: Vec<(&str, Option<String>)> = Vec::new();
    for (key, json) in &staged {
        let previous = storage.get(key).unwrap_or(None);
        if let Err(err) = storage.set(key, json) {
            for (done_key, done_previous) in committed.iter().rev() {
                let restored = match done_previous {
                    Some(value) => storage.set(done_key, value),
                    None => storage.remove(done_key),
                };
                if let Err(restore_err) = restored {
                    tracing::warn!(key = done_key, ?restore_err, "import rollback failed");
                }
            }
            return Err(err.context(format!("import failed while writing {key}")));
        }
        committed.push((*key, previous));
    }

    tracing::info!(
        completed = data.progress.completed_sections.len(),
        history = data.progress.learning_history.len(),
        "imported progress"
    );
    Ok(())
}
