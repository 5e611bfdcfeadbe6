//! The key-value store that holds the serialized transactions.
//!
//! The store is deliberately opaque: string keys map to string values. The dashboard only ever
//! reads a single key, chosen by `StoreKey`.

use crate::error::Res;
use crate::model::UserProfile;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Prefix shared by every key this app writes.
pub const KEY_PREFIX: &str = "@gofinances";

/// The key used when no user identity is available.
pub const GLOBAL_TRANSACTIONS_KEY: &str = "@gofinances:transactions";

/// A string key-value store.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns the value stored at `key`, or `None` if nothing is stored there.
    async fn get(&self, key: &str) -> Res<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Res<()>;

    /// Removes the value at `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Res<()>;
}

/// Chooses the store key that holds the transactions.
///
/// With an authenticated user the key is namespaced by the user's id so that users sharing a
/// device do not see each other's data. Without one, the fixed global key is used.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum StoreKey {
    User(String),
    Global,
}

impl StoreKey {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        StoreKey::User(user_id.into())
    }

    /// Uses the profile's id when a profile is present, otherwise the global key.
    pub fn from_profile(user: Option<&UserProfile>) -> Self {
        match user {
            Some(profile) => StoreKey::for_user(profile.id()),
            None => StoreKey::Global,
        }
    }

    pub fn key(&self) -> String {
        match self {
            StoreKey::User(id) => format!("{KEY_PREFIX}:transactions_user:{id}"),
            StoreKey::Global => GLOBAL_TRANSACTIONS_KEY.to_string(),
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// A `Store` that keeps everything in memory. Used in tests and when no data directory exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> Res<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| anyhow::anyhow!("The in-memory store lock is poisoned"))
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Res<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Res<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Res<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
