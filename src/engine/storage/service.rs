use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;

use super::area::StorageArea;
use super::event::StorageEvent;
use crate::engine::DEFAULT_CHANNEL_CAPACITY;

/// A handle for receiving storage change notifications.
pub type Subscription = broadcast::Receiver<StorageEvent>;

#[derive(Debug)]
struct StorageBus {
    tx: broadcast::Sender<StorageEvent>,
}

impl Default for StorageBus {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl StorageBus {
    fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }
    fn publish(&self, ev: StorageEvent) {
        // broadcast::Sender::send() fails only when there are 0 receivers.
        // That's fine: if nobody listens, we can ignore the error.
        let _ = self.tx.send(ev);
    }
}

/// Owns the process-wide storage area and its change bus.
///
/// The area handed out by [`area`](Self::area) is wrapped so that every
/// mutation publishes a [`StorageEvent`] to all subscribers.
#[derive(Clone)]
pub struct StorageService {
    area: Arc<dyn StorageArea>,
    bus: Arc<StorageBus>,
}

impl Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService").finish_non_exhaustive()
    }
}

impl StorageService {
    pub fn new(backing: Arc<dyn StorageArea>) -> Self {
        let bus = Arc::new(StorageBus::default());
        let area = Arc::new(NotifyingStore {
            inner: backing,
            bus: bus.clone(),
        });
        Self { area, bus }
    }

    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// The shared storage area; all writes through it raise change events.
    pub fn area(&self) -> Arc<dyn StorageArea> {
        self.area.clone()
    }
}

struct NotifyingStore {
    inner: Arc<dyn StorageArea>,
    bus: Arc<StorageBus>,
}

impl StorageArea for NotifyingStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let old = self.inner.get_item(key);
        self.inner.set_item(key, value)?;
        self.bus.publish(StorageEvent {
            key: Some(key.to_string()),
            old_value: old,
            new_value: Some(value.to_string()),
        });
        Ok(())
    }
    fn remove_item(&self, key: &str) -> Result<()> {
        let old = self.inner.get_item(key);
        self.inner.remove_item(key)?;
        self.bus.publish(StorageEvent {
            key: Some(key.to_string()),
            old_value: old,
            new_value: None,
        });
        Ok(())
    }
    fn clear(&self) -> Result<()> {
        self.inner.clear()?;
        self.bus.publish(StorageEvent {
            key: None,
            old_value: None,
            new_value: None,
        });
        Ok(())
    }
    fn len(&self) -> usize {
        self.inner.len()
    }
    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::InMemoryStore;

    #[tokio::test]
    async fn set_publishes_old_and_new_value() {
        let service = StorageService::new(Arc::new(InMemoryStore::new()));
        let area = service.area();
        let mut sub = service.subscribe();

        area.set_item("k", "v1").unwrap();
        area.set_item("k", "v2").unwrap();

        let first = sub.recv().await.unwrap();
        assert_eq!(first.key.as_deref(), Some("k"));
        assert_eq!(first.old_value, None);
        assert_eq!(first.new_value.as_deref(), Some("v1"));

        let second = sub.recv().await.unwrap();
        assert_eq!(second.old_value.as_deref(), Some("v1"));
        assert_eq!(second.new_value.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn clear_publishes_keyless_event() {
        let service = StorageService::new(Arc::new(InMemoryStore::new()));
        let area = service.area();
        area.set_item("k", "v").unwrap();

        let mut sub = service.subscribe();
        area.clear().unwrap();

        let ev = sub.recv().await.unwrap();
        assert!(ev.key.is_none());
        assert!(ev.new_value.is_none());
        assert_eq!(area.len(), 0);
    }

    #[tokio::test]
    async fn reads_do_not_publish() {
        let service = StorageService::new(Arc::new(InMemoryStore::new()));
        let area = service.area();
        area.set_item("k", "v").unwrap();

        let mut sub = service.subscribe();
        let _ = area.get_item("k");
        let _ = area.keys();

        assert!(matches!(
            sub.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
