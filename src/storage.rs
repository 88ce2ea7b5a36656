use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AvailabilityRecord, UserAccount};

/// A flat string key/value store. Last writer wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Storage("database lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        queries::kv_get(&*self.conn()?, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        queries::kv_set(&*self.conn()?, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        queries::kv_remove(&*self.conn()?, key).map(|_| ())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        queries::kv_keys_with_prefix(&*self.conn()?, prefix)
    }
}

/// Process-local store; contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .entries()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Reads and writes planner state under `<namespace>-...` keys.
pub struct Persistence<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn session_key(&self) -> String {
        format!("{}-user", self.namespace)
    }

    fn availability_prefix(&self) -> String {
        format!("{}-availability-", self.namespace)
    }

    pub fn availability_key(&self, user_id: &str) -> String {
        format!("{}{user_id}", self.availability_prefix())
    }

    pub fn save_availability(
        &self,
        user_id: &str,
        record: &AvailabilityRecord,
    ) -> Result<(), AppError> {
        let json = record.to_json()?;
        self.store.set(&self.availability_key(user_id), &json)?;
        tracing::debug!(
            user_id,
            slots = record.available_slots().count(),
            "saved availability"
        );
        Ok(())
    }

    pub fn load_availability(&self, user_id: &str) -> Result<Option<AvailabilityRecord>, AppError> {
        self.store
            .get(&self.availability_key(user_id))?
            .map(|json| AvailabilityRecord::from_json(&json))
            .transpose()
    }

    pub fn remove_availability(&self, user_id: &str) -> Result<(), AppError> {
        self.store.remove(&self.availability_key(user_id))?;
        tracing::info!(user_id, "removed stored availability");
        Ok(())
    }

    /// Ids of every user with a stored record.
    pub fn stored_user_ids(&self) -> Result<Vec<String>, AppError> {
        let prefix = self.availability_prefix();
        Ok(self
            .store
            .keys_with_prefix(&prefix)?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    pub fn save_session(&self, user: &UserAccount) -> Result<(), AppError> {
        let json = serde_json::to_string(user)?;
        self.store.set(&self.session_key(), &json)
    }

    pub fn load_session(&self) -> Result<Option<UserAccount>, AppError> {
        match self.store.get(&self.session_key())? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear_session(&self) -> Result<(), AppError> {
        self.store.remove(&self.session_key())
    }
}
