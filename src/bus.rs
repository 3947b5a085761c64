//! In-process fan-out for chat messages and the activity feed.
//!
//! Channels are unbounded; a slow subscriber buffers rather than blocks
//! the publisher. Dead subscribers are pruned on the next publish.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::types::{ActivityItem, ChatMessage, Sender};

/// Maximum activity items kept in memory.
const ACTIVITY_CAP: usize = 200;

// ---------------------------------------------------------------------------
// Chat bus
// ---------------------------------------------------------------------------

/// Broadcast of chat transcript entries to any number of listeners.
#[derive(Debug, Default)]
pub struct ChatBus {
    subscribers: Mutex<Vec<UnboundedSender<ChatMessage>>>,
}

impl ChatBus {
    pub fn subscribe(&self) -> UnboundedReceiver<ChatMessage> {
        let (tx, rx) = unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    pub fn publish(&self, message: ChatMessage) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(message.clone()).is_ok());
        }
    }

    /// Convenience for agent-originated notices.
    pub fn push_system(&self, text: impl Into<String>) {
        self.publish(ChatMessage::now(Sender::System, text));
    }
}

// ---------------------------------------------------------------------------
// Activity store
// ---------------------------------------------------------------------------

/// Bounded, newest-first store of activity items with change
/// notifications. Subscribers get a full snapshot on every change; the
/// feed is small so diffing is not worth the bookkeeping.
#[derive(Debug, Default)]
pub struct ActivityStore {
    items: Mutex<VecDeque<ActivityItem>>,
    subscribers: Mutex<Vec<UnboundedSender<Vec<ActivityItem>>>>,
}

impl ActivityStore {
    /// Subscribe; the current snapshot arrives immediately.
    pub fn subscribe(&self) -> UnboundedReceiver<Vec<ActivityItem>> {
        let (tx, rx) = unbounded_channel();
        let _ = tx.send(self.recent(ACTIVITY_CAP));
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    pub fn push(&self, item: ActivityItem) {
        if let Ok(mut items) = self.items.lock() {
            items.push_front(item);
            items.truncate(ACTIVITY_CAP);
        }
        self.notify();
    }

    /// Replace the whole feed, as the poller does after each refresh.
    pub fn replace_all(&self, mut fresh: Vec<ActivityItem>) {
        fresh.truncate(ACTIVITY_CAP);
        if let Ok(mut items) = self.items.lock() {
            *items = fresh.into();
        }
        self.notify();
    }

    /// Newest `limit` items.
    pub fn recent(&self, limit: usize) -> Vec<ActivityItem> {
        match self.items.lock() {
            Ok(items) => items.iter().take(limit).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn notify(&self) {
        let snapshot = self.recent(ACTIVITY_CAP);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityKind;

    fn item(id: &str) -> ActivityItem {
        ActivityItem {
            id: id.to_string(),
            kind: ActivityKind::System,
            title: "test".to_string(),
            message: String::new(),
            status: "ok".to_string(),
            at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_chat_bus_fan_out_and_pruning() {
        let bus = ChatBus::default();
        let mut rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        bus.push_system("hello");
        assert_eq!(rx1.try_recv().expect("rx1").text, "hello");

        drop(rx2);
        bus.push_system("again");
        assert_eq!(rx1.try_recv().expect("rx1").text, "again");
        assert_eq!(bus.subscribers.lock().expect("lock").len(), 1);
    }

    #[test]
    fn test_activity_store_newest_first_and_capped() {
        let store = ActivityStore::default();
        for i in 0..(ACTIVITY_CAP + 10) {
            store.push(item(&i.to_string()));
        }
        let recent = store.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, (ACTIVITY_CAP + 9).to_string());
        assert_eq!(store.recent(usize::MAX).len(), ACTIVITY_CAP);
    }

    #[test]
    fn test_subscribe_gets_immediate_snapshot() {
        let store = ActivityStore::default();
        store.push(item("a"));
        let mut rx = store.subscribe();
        let snapshot = rx.try_recv().expect("snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "a");
    }

    #[test]
    fn test_replace_all_notifies() {
        let store = ActivityStore::default();
        let mut rx = store.subscribe();
        let _ = rx.try_recv();

        store.replace_all(vec![item("x"), item("y")]);
        let snapshot = rx.try_recv().expect("snapshot");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, "x");
    }
}
