//! Remote synchronized document store contract.
//!
//! # Responsibility
//! - Define the document-store operations the persistence layer relies on.
//! - Deliver change notifications as events drained on the session thread.
//!
//! # Invariants
//! - One document per page, keyed by page id, written as a whole.
//! - A snapshot always carries the complete current document set.

use crate::model::page::Page;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Remote document shape: `{ id, title, icon, blocks, createdAt, updatedAt }`.
pub type PageDocument = Page;

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Network unreachable or store offline.
    Unavailable(String),
    PermissionDenied(String),
    QuotaExceeded,
    /// The store rejected or dropped a subscription.
    SubscriptionRejected(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "remote store unavailable: {reason}"),
            Self::PermissionDenied(reason) => write!(f, "remote permission denied: {reason}"),
            Self::QuotaExceeded => write!(f, "remote quota exceeded"),
            Self::SubscriptionRejected(reason) => {
                write!(f, "remote subscription rejected: {reason}")
            }
        }
    }
}

impl Error for RemoteError {}

/// Notification delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    Snapshot(Vec<PageDocument>),
    Error(RemoteError),
}

/// Active subscription: an event queue plus an unsubscribe hook.
pub struct Subscription {
    events: Receiver<RemoteEvent>,
    on_unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(events: Receiver<RemoteEvent>, on_unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            events,
            on_unsubscribe: Some(Box::new(on_unsubscribe)),
        }
    }

    /// Drains every event delivered so far without blocking.
    ///
    /// A disconnected sender is reported as an `Error` event once.
    pub fn drain(&mut self) -> Vec<RemoteEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.on_unsubscribe.is_some() {
                        events.push(RemoteEvent::Error(RemoteError::SubscriptionRejected(
                            "remote feed closed".to_string(),
                        )));
                        self.on_unsubscribe = None;
                    }
                    break;
                }
            }
        }
        events
    }

    pub fn unsubscribe(mut self) {
        if let Some(hook) = self.on_unsubscribe.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.on_unsubscribe.is_some())
            .finish()
    }
}

/// Document store keyed by page id within one collection.
pub trait RemoteStore {
    /// Upserts a full document, overwriting any previous version.
    fn put(&self, collection: &str, id: &str, document: &PageDocument) -> RemoteResult<()>;
    fn delete(&self, collection: &str, id: &str) -> RemoteResult<()>;
    /// Subscribes to snapshots of `collection`.
    fn subscribe(&self, collection: &str) -> RemoteResult<Subscription>;
}
