use common::errors::AppError;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::queries::ClientState;

/// In-process key-value storage
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<(Uuid, String), String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, client_id: Uuid, key: &str) -> Option<String> {
        let values = self.values.read().await;
        values.get(&(client_id, key.to_string())).cloned()
    }

    async fn set(&self, client_id: Uuid, key: &str, value: String) {
        let mut values = self.values.write().await;
        values.insert((client_id, key.to_string()), value);
    }

    async fn remove(&self, client_id: Uuid, key: &str) -> bool {
        let mut values = self.values.write().await;
        values.remove(&(client_id, key.to_string())).is_some()
    }
}

/// Keyed client storage, backed by Postgres or by memory
#[derive(Clone)]
pub enum PreferenceStore {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl PreferenceStore {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn get(&self, client_id: Uuid, key: &str) -> Result<Option<String>, AppError> {
        match self {
            Self::Postgres(pool) => {
                let state = ClientState::find(pool, client_id, key).await?;
                if let Some(state) = &state {
                    debug!(
                        client_id = %state.client_id,
                        key = %state.key,
                        updated_at = %state.updated_at,
                        "Loaded client state"
                    );
                }
                Ok(state.map(|s| s.value))
            }
            Self::Memory(store) => Ok(store.get(client_id, key).await),
        }
    }

    pub async fn set(&self, client_id: Uuid, key: &str, value: String) -> Result<(), AppError> {
        match self {
            Self::Postgres(pool) => {
                ClientState::upsert(pool, client_id, key, &value).await?;
            }
            Self::Memory(store) => store.set(client_id, key, value).await,
        }
        Ok(())
    }

    /// Returns whether a value was present
    pub async fn remove(&self, client_id: Uuid, key: &str) -> Result<bool, AppError> {
        match self {
            Self::Postgres(pool) => Ok(ClientState::delete(pool, client_id, key).await?),
            Self::Memory(store) => Ok(store.remove(client_id, key).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = PreferenceStore::memory();
        let client = Uuid::new_v4();

        assert_eq!(store.get(client, "theme").await.unwrap(), None);
        store.set(client, "theme", "\"dark\"".to_string()).await.unwrap();
        assert_eq!(store.get(client, "theme").await.unwrap().as_deref(), Some("\"dark\""));

        assert!(store.remove(client, "theme").await.unwrap());
        assert!(!store.remove(client, "theme").await.unwrap());
    }

    #[tokio::test]
    async fn clients_are_isolated() {
        let store = PreferenceStore::memory();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.set(alice, "theme", "\"dark\"".to_string()).await.unwrap();
        assert_eq!(store.get(bob, "theme").await.unwrap(), None);
    }
}
