use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Tags live lookups per client so a slow response cannot overwrite a newer one
pub struct RequestSequencer {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            latest: Mutex::new(HashMap::new()),
        }
    }

    /// Start a request for `client`; any earlier in-flight request becomes stale
    pub async fn begin(&self, client: &str) -> u64 {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        self.latest.lock().await.insert(client.to_string(), sequence);
        sequence
    }

    /// Finish a request; true if it is still the newest one for `client`
    pub async fn finish(&self, client: &str, sequence: u64) -> bool {
        let mut latest = self.latest.lock().await;
        match latest.get(client) {
            Some(&current) if current == sequence => {
                latest.remove(client);
                true
            }
            _ => false,
        }
    }

    pub async fn in_flight(&self) -> usize {
        self.latest.lock().await.len()
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}
