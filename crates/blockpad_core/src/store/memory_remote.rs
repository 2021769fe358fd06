//! In-process remote store.
//!
//! Cloned handles share one document set, so two sessions holding clones
//! behave like two devices on the same account. Failure injection hooks let
//! callers simulate an offline network, a late-initializing backend, or a
//! dropped subscription.

use crate::store::remote::{
    PageDocument, RemoteError, RemoteEvent, RemoteResult, RemoteStore, Subscription,
};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Subscriber {
    id: u64,
    collection: String,
    sender: Sender<RemoteEvent>,
}

#[derive(Debug)]
struct RemoteState {
    collections: HashMap<String, BTreeMap<String, PageDocument>>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
    write_failure: Option<RemoteError>,
    reject_subscriptions: bool,
    ready: bool,
    write_count: usize,
}

impl RemoteState {
    fn snapshot(&self, collection: &str) -> Vec<PageDocument> {
        self.collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn broadcast(&mut self, collection: &str) {
        if !self.ready {
            return;
        }
        let snapshot = self.snapshot(collection);
        self.subscribers.retain(|subscriber| {
            subscriber.collection != collection
                || subscriber
                    .sender
                    .send(RemoteEvent::Snapshot(snapshot.clone()))
                    .is_ok()
        });
    }
}

/// Shared in-memory document store.
#[derive(Debug, Clone)]
pub struct MemoryRemoteStore {
    state: Arc<Mutex<RemoteState>>,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemoteStore {
    /// Creates a ready store; subscribers get an initial snapshot at once.
    pub fn new() -> Self {
        Self::with_ready(true)
    }

    /// Creates a store that delivers no snapshots until [`Self::set_ready`].
    pub fn initializing() -> Self {
        Self::with_ready(false)
    }

    fn with_ready(ready: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(RemoteState {
                collections: HashMap::new(),
                subscribers: Vec::new(),
                next_subscriber_id: 0,
                write_failure: None,
                reject_subscriptions: false,
                ready,
                write_count: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks initialization finished and pushes a snapshot to subscribers.
    pub fn set_ready(&self) {
        let mut state = self.lock();
        state.ready = true;
        let collections: Vec<String> = state
            .subscribers
            .iter()
            .map(|subscriber| subscriber.collection.clone())
            .collect();
        for collection in collections {
            state.broadcast(&collection);
        }
    }

    /// Makes writes and deletes fail with `failure` until cleared.
    pub fn set_write_failure(&self, failure: Option<RemoteError>) {
        self.lock().write_failure = failure;
    }

    pub fn set_reject_subscriptions(&self, reject: bool) {
        self.lock().reject_subscriptions = reject;
    }

    /// Sends `error` to every subscriber and drops them.
    pub fn disconnect(&self, error: RemoteError) {
        let mut state = self.lock();
        for subscriber in state.subscribers.drain(..) {
            let _ = subscriber.sender.send(RemoteEvent::Error(error.clone()));
        }
    }

    /// Seeds a document without notifying subscribers.
    pub fn insert_silently(&self, collection: &str, document: PageDocument) {
        self.lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(document.id.to_string(), document);
    }

    pub fn documents(&self, collection: &str) -> Vec<PageDocument> {
        self.lock().snapshot(collection)
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<PageDocument> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// Number of successful `put` calls.
    pub fn write_count(&self) -> usize {
        self.lock().write_count
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn put(&self, collection: &str, id: &str, document: &PageDocument) -> RemoteResult<()> {
        let mut state = self.lock();
        if let Some(failure) = state.write_failure.clone() {
            return Err(failure);
        }
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        state.write_count += 1;
        state.broadcast(collection);
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> RemoteResult<()> {
        let mut state = self.lock();
        if let Some(failure) = state.write_failure.clone() {
            return Err(failure);
        }
        if let Some(docs) = state.collections.get_mut(collection) {
            docs.remove(id);
        }
        state.broadcast(collection);
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> RemoteResult<Subscription> {
        let mut state = self.lock();
        if state.reject_subscriptions {
            return Err(RemoteError::SubscriptionRejected(
                "subscriptions disabled".to_string(),
            ));
        }

        let (sender, receiver) = channel();
        if state.ready {
            let _ = sender.send(RemoteEvent::Snapshot(state.snapshot(collection)));
        }
        let id = state.next_subscriber_id;
        state.next_subscriber_id += 1;
        state.subscribers.push(Subscriber {
            id,
            collection: collection.to_string(),
            sender,
        });
        debug!("event=remote_subscribe module=store status=ok subscriber={id}");

        let shared = Arc::clone(&self.state);
        Ok(Subscription::new(receiver, move || {
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            state.subscribers.retain(|subscriber| subscriber.id != id);
        }))
    }
}
