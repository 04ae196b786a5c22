use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Per-conversation async locks. Requests on the same id run one at a time;
/// different ids never contend. Entries are dropped once nobody holds or waits
/// on them.
#[derive(Clone, Default)]
pub struct ConversationLocks {
    inner: Arc<Mutex<LockMap>>,
}

pub struct ConversationGuard {
    guard: Option<OwnedMutexGuard<()>>,
    conversation_id: String,
    locks: Arc<Mutex<LockMap>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, conversation_id: &str) -> ConversationGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = lock.lock_owned().await;
        ConversationGuard {
            guard: Some(guard),
            conversation_id: conversation_id.to_string(),
            locks: self.inner.clone(),
        }
    }

    /// Number of ids currently locked or awaited.
    #[cfg(test)]
    fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for ConversationGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = map
            .get(&self.conversation_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            map.remove(&self.conversation_id);
        }
    }
}
