//! Remote subscription driver.
//!
//! # Responsibility
//! - Drain the subscription on the session thread.
//! - Report the first-snapshot readiness timeout exactly once.
//!
//! # Invariants
//! - After an error event the subscription is released; no later events
//!   are reported.
//! - One poll reports at most one snapshot, the most recent.

use crate::store::remote::{PageDocument, RemoteError, RemoteEvent, Subscription};
use log::{info, warn};

/// What the session must react to after a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    Snapshot(Vec<PageDocument>),
    /// The feed failed; the listener is now stopped.
    Failed(RemoteError),
    /// No snapshot arrived within the readiness window.
    ReadinessTimeout,
}

#[derive(Debug)]
pub struct SnapshotListener {
    subscription: Option<Subscription>,
    started_at_ms: i64,
    ready_timeout_ms: i64,
    ready: bool,
    timeout_reported: bool,
}

impl SnapshotListener {
    pub fn new(subscription: Subscription, now_ms: i64, ready_timeout_ms: i64) -> Self {
        Self {
            subscription: Some(subscription),
            started_at_ms: now_ms,
            ready_timeout_ms,
            ready: false,
            timeout_reported: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether at least one snapshot has been delivered.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Collects pending events, then checks the readiness deadline.
    pub fn poll(&mut self, now_ms: i64) -> Vec<ListenerEvent> {
        let delivered = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => Vec::new(),
        };

        // Snapshots carry the full document set, so only the newest one in a
        // batch matters.
        let mut latest = None;
        let mut events = Vec::new();
        for event in delivered {
            match event {
                RemoteEvent::Snapshot(documents) => {
                    if !self.ready {
                        info!(
                            "event=remote_ready module=sync status=ok documents={} waited_ms={}",
                            documents.len(),
                            now_ms - self.started_at_ms
                        );
                    }
                    self.ready = true;
                    latest = Some(documents);
                }
                RemoteEvent::Error(err) => {
                    warn!("event=remote_listen module=sync status=error error={err}");
                    self.stop();
                    events.extend(latest.map(ListenerEvent::Snapshot));
                    events.push(ListenerEvent::Failed(err));
                    return events;
                }
            }
        }
        events.extend(latest.map(ListenerEvent::Snapshot));

        if !self.ready
            && !self.timeout_reported
            && now_ms - self.started_at_ms >= self.ready_timeout_ms
        {
            self.timeout_reported = true;
            warn!(
                "event=remote_ready module=sync status=timeout waited_ms={}",
                now_ms - self.started_at_ms
            );
            events.push(ListenerEvent::ReadinessTimeout);
        }
        events
    }

    /// Releases the subscription; idempotent.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerEvent, SnapshotListener};
    use crate::model::page::Page;
    use crate::store::memory_remote::MemoryRemoteStore;
    use crate::store::remote::{RemoteError, RemoteStore};

    #[test]
    fn ready_store_delivers_snapshot_without_timeout() {
        let remote = MemoryRemoteStore::new();
        let mut listener = SnapshotListener::new(remote.subscribe("pages").unwrap(), 0, 3_000);
        assert_eq!(listener.poll(0), vec![ListenerEvent::Snapshot(vec![])]);
        assert!(listener.is_ready());
        assert!(listener.poll(10_000).is_empty());
    }

    #[test]
    fn queued_snapshots_collapse_to_latest() {
        let remote = MemoryRemoteStore::new();
        let mut listener = SnapshotListener::new(remote.subscribe("pages").unwrap(), 0, 3_000);
        let first = Page::new("📄", 1);
        let second = Page::new("📝", 2);
        remote.put("pages", &first.id.to_string(), &first).unwrap();
        remote.put("pages", &second.id.to_string(), &second).unwrap();

        let events = listener.poll(0);
        assert_eq!(events.len(), 1);
        let ListenerEvent::Snapshot(documents) = &events[0] else {
            panic!("expected a snapshot, got {events:?}");
        };
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn readiness_timeout_fires_once() {
        let remote = MemoryRemoteStore::initializing();
        let mut listener = SnapshotListener::new(remote.subscribe("pages").unwrap(), 0, 3_000);
        assert!(listener.poll(2_999).is_empty());
        assert_eq!(listener.poll(3_000), vec![ListenerEvent::ReadinessTimeout]);
        assert!(listener.poll(6_000).is_empty());
        assert!(listener.is_active());

        remote.set_ready();
        assert_eq!(listener.poll(7_000), vec![ListenerEvent::Snapshot(vec![])]);
    }

    #[test]
    fn error_stops_listener_and_unsubscribes() {
        let remote = MemoryRemoteStore::new();
        let mut listener = SnapshotListener::new(remote.subscribe("pages").unwrap(), 0, 3_000);
        listener.poll(0);

        let error = RemoteError::PermissionDenied("revoked".to_string());
        remote.disconnect(error.clone());
        assert_eq!(listener.poll(1), vec![ListenerEvent::Failed(error)]);
        assert!(!listener.is_active());
        assert_eq!(remote.subscriber_count(), 0);
        assert!(listener.poll(2).is_empty());
    }
}
