use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::assistant::model::ChatMessage;

pub type ThreadHistory = Arc<tokio::sync::Mutex<Vec<ChatMessage>>>;

/// In-process dialogue history, keyed by thread. Each key carries its own
/// async mutex: callers hold it across the model call, so turns within one
/// thread never interleave.
#[derive(Default)]
pub struct DialogueThreads {
    inner: Mutex<HashMap<String, ThreadHistory>>,
}

impl DialogueThreads {
    pub fn thread(&self, key: &str) -> ThreadHistory {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(key.to_string()).or_default().clone()
    }

    /// Discards the history for a key; the next caller starts fresh.
    pub fn reset(&self, key: &str) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        debug!(key, "dialogue thread cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_key_returns_the_same_thread() {
        let threads = DialogueThreads::default();
        let a = threads.thread("user-1");
        let b = threads.thread("user-1");
        assert!(Arc::ptr_eq(&a, &b));

        let other = threads.thread("user-2");
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn reset_discards_history() {
        let threads = DialogueThreads::default();
        threads
            .thread("demo")
            .lock()
            .await
            .push(ChatMessage::user("hello"));
        assert_eq!(threads.thread("demo").lock().await.len(), 1);

        threads.reset("demo");
        assert!(threads.thread("demo").lock().await.is_empty());
    }
}
