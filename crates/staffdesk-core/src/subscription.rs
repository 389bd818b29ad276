// ── In-app notification fan-out ──
//
// Listeners register with the center and get a `Subscription` handle
// back. Dropping the handle (or calling `unsubscribe`) removes the
// listener, so a screen that goes away cannot leak its callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::{DashMap, DashSet};
use tracing::debug;

use crate::model::{EntityId, Notification};

type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener>,
    /// Ids already delivered through `publish_new`.
    seen: DashSet<EntityId>,
}

/// Process-wide notification broadcaster.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    registry: Arc<Registry>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.listeners.insert(id, Arc::new(listener));
        debug!(id, "notification listener added");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver to every live listener. Returns how many were called.
    pub fn publish(&self, notification: &Notification) -> usize {
        // Snapshot first so a listener may subscribe or unsubscribe
        // without deadlocking on the map shard.
        let listeners: Vec<Listener> = self
            .registry
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for listener in &listeners {
            listener(notification);
        }
        listeners.len()
    }

    /// Deliver only notifications not published through here before,
    /// e.g. after each poll of the notifications list.
    pub fn publish_new<'a>(&self, batch: impl IntoIterator<Item = &'a Notification>) -> usize {
        let mut delivered = 0;
        for notification in batch {
            if self.registry.seen.insert(notification.id.clone()) {
                self.publish(notification);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.len()
    }
}

/// Live registration; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.listeners.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners.remove(&self.id);
            debug!(id = self.id, "notification listener removed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::Utc;

    use super::*;

    fn note(id: &str) -> Notification {
        Notification {
            id: id.into(),
            title: "Leave approved".into(),
            body: None,
            kind: Some("leave".into()),
            created_at: Utc::now(),
            read: false,
        }
    }

    fn counter(center: &NotificationCenter) -> (Subscription, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sub = center.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (sub, count)
    }

    #[test]
    fn dropping_handle_unsubscribes() {
        let center = NotificationCenter::new();
        let (sub, count) = counter(&center);

        center.publish(&note("n-1"));
        drop(sub);
        center.publish(&note("n-2"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(center.listener_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe_leaves_others() {
        let center = NotificationCenter::new();
        let (a, a_count) = counter(&center);
        let (b, b_count) = counter(&center);

        a.unsubscribe();
        assert_eq!(center.publish(&note("n-1")), 1);

        assert_eq!(a_count.load(Ordering::SeqCst), 0);
        assert_eq!(b_count.load(Ordering::SeqCst), 1);
        assert!(b.is_active());
    }

    #[test]
    fn publish_new_skips_repeats() {
        let center = NotificationCenter::new();
        let (_sub, count) = counter(&center);

        let first = [note("n-1"), note("n-2")];
        assert_eq!(center.publish_new(&first), 2);
        let second = [note("n-2"), note("n-3")];
        assert_eq!(center.publish_new(&second), 1);

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn handle_outliving_center_is_inert() {
        let center = NotificationCenter::new();
        let (sub, _) = counter(&center);
        drop(center);
        assert!(!sub.is_active());
        drop(sub);
    }
}
