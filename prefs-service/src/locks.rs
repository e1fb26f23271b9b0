use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per client, so read-modify-write cycles on a client's
/// stored state run one at a time.
#[derive(Clone, Default)]
pub struct ClientLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ClientLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `client_id`'s state
    pub async fn lock(&self, client_id: Uuid) -> OwnedMutexGuard<()> {
        let client_lock = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on can go
            locks.retain(|id, lock| *id == client_id || Arc::strong_count(lock) > 1);
            locks.entry(client_id).or_default().clone()
        };
        client_lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
