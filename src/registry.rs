//! Realtime delivery: a per-user connection registry with fan-out.
//!
//! One process-wide registry owns every live subscriber channel,
//! guarded by a single mutex. A user may hold several connections at
//! once (multiple tabs, phone plus laptop); each gets its own row.
//! Subscriptions unregister themselves on drop, so a disconnecting
//! client cleans up its own row.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

pub type ConnectionId = u64;

/// A notification as delivered to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event: String,
    pub data: Value,
    pub sent_at: DateTime<Utc>,
}

impl Envelope {
    pub fn new(event: &str, data: Value) -> Self {
        Self { event: event.to_string(), data, sent_at: Utc::now() }
    }
}

struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Envelope>,
}

#[derive(Default)]
struct Inner {
    next_id: ConnectionId,
    by_user: HashMap<String, Vec<Connection>>,
}

/// Process-wide registry of live subscriber connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel for `user` and record it under a fresh
    /// connection id.
    pub fn register(self: &Arc<Self>, user: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.by_user.entry(user.to_string()).or_default().push(Connection { id, tx });
        Subscription { registry: Arc::clone(self), user: user.to_string(), id, rx }
    }

    /// Remove one connection row. Unknown users or ids are a no-op,
    /// so double unregistration is harmless.
    pub fn unregister(&self, user: &str, id: ConnectionId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(connections) = inner.by_user.get_mut(user) {
            connections.retain(|c| c.id != id);
            if connections.is_empty() {
                inner.by_user.remove(user);
            }
        }
    }

    /// Send an envelope to every live connection of `user`, returning
    /// the delivered count. Rows whose receiver is gone are pruned.
    pub fn publish(&self, user: &str, envelope: &Envelope) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let mut delivered = 0;
        if let Some(connections) = inner.by_user.get_mut(user) {
            connections.retain(|c| match c.tx.send(envelope.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            });
            if connections.is_empty() {
                inner.by_user.remove(user);
            }
        }
        delivered
    }

    pub fn is_online(&self, user: &str) -> bool {
        self.inner.lock().unwrap().by_user.contains_key(user)
    }

    /// Live connection count for one user.
    pub fn connections(&self, user: &str) -> usize {
        self.inner.lock().unwrap().by_user.get(user).map_or(0, |c| c.len())
    }

    /// Every user with at least one live connection, sorted.
    pub fn online_users(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut users: Vec<String> = inner.by_user.keys().cloned().collect();
        users.sort();
        users
    }
}

/// A live subscriber channel. Dropping it unregisters the connection.
pub struct Subscription {
    registry: Arc<ConnectionRegistry>,
    user: String,
    id: ConnectionId,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Subscription {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Wait for the next envelope. Returns None once the connection
    /// row is gone from the registry.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = Envelope;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Envelope>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unregister(&self.user, self.id);
    }
}
