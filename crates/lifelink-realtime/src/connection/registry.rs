//! Connection registry — process-scoped session state with explicit
//! lifecycle: populated on connect, removed on disconnect, looked up
//! read-only by the dispatcher.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use lifelink_core::config::RealtimeConfig;

use crate::message::types::ServerEvent;

use super::handle::{ConnectionHandle, ConnectionId};

/// Registry of all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Connection ID → handle.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID → that user's connection IDs, oldest first.
    user_index: DashMap<Uuid, Vec<ConnectionId>>,
    /// Connections that have joined their private channel. A session
    /// joins explicitly after connecting; there is no automatic
    /// subscription.
    joined: DashMap<ConnectionId, ()>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionRegistry {
    /// Creates a new connection registry.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            connections: DashMap::new(),
            user_index: DashMap::new(),
            joined: DashMap::new(),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the handle and the receiver for outbound messages. When
    /// the user is at their connection cap the oldest connection is
    /// evicted.
    pub fn register(
        &self,
        user_id: Uuid,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, username, tx));

        {
            let mut conns = self.user_index.entry(user_id).or_default();
            if conns.len() >= self.config.max_connections_per_user {
                let oldest = conns.remove(0);
                warn!(
                    user_id = %user_id,
                    conn_id = %oldest,
                    max = self.config.max_connections_per_user,
                    "User at max connections, evicting oldest"
                );
                if let Some((_, old)) = self.connections.remove(&oldest) {
                    old.mark_closed();
                }
                self.joined.remove(&oldest);
            }
            conns.push(handle.id);
        }

        self.connections.insert(handle.id, Arc::clone(&handle));

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and clears its channel membership.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, handle)) = self.connections.remove(conn_id) {
            handle.mark_closed();
            self.joined.remove(conn_id);

            if let Some(mut conns) = self.user_index.get_mut(&handle.user_id) {
                conns.retain(|id| id != conn_id);
            }
            self.user_index
                .remove_if(&handle.user_id, |_, conns| conns.is_empty());

            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Joins a connection to its user's private channel.
    pub fn join(&self, conn_id: &ConnectionId) {
        if self.connections.contains_key(conn_id) {
            self.joined.insert(*conn_id, ());
            debug!(conn_id = %conn_id, "Joined private channel");
        }
    }

    /// Leaves the private channel without disconnecting.
    pub fn leave(&self, conn_id: &ConnectionId) {
        self.joined.remove(conn_id);
    }

    /// Whether the user has at least one joined connection.
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.user_index
            .get(&user_id)
            .map(|conns| conns.iter().any(|id| self.joined.contains_key(id)))
            .unwrap_or(false)
    }

    /// Sends an event to every joined connection of one user.
    ///
    /// Fire-and-forget: failures are logged and otherwise ignored.
    pub async fn send_to_user(&self, user_id: Uuid, event: &ServerEvent) {
        let Some(conn_ids) = self.user_index.get(&user_id).map(|c| c.clone()) else {
            return;
        };

        let Ok(payload) = serde_json::to_string(event) else {
            warn!(user_id = %user_id, "Failed to serialize outbound event");
            return;
        };

        for conn_id in conn_ids {
            if !self.joined.contains_key(&conn_id) {
                continue;
            }
            if let Some(handle) = self.connections.get(&conn_id).map(|h| Arc::clone(&h)) {
                if handle.send(payload.clone()).await.is_err() {
                    debug!(conn_id = %conn_id, "Dropped event for unreachable connection");
                }
            }
        }
    }

    /// Broadcasts an event to every registered connection.
    pub async fn broadcast(&self, event: &ServerEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            warn!("Failed to serialize broadcast event");
            return;
        };

        let handles: Vec<Arc<ConnectionHandle>> = self
            .connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for handle in handles {
            let _ = handle.send(payload.clone()).await;
        }
    }

    /// Total registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::types::ServerEvent;

    fn registry() -> ConnectionRegistry {
        ConnectionRegistry::new(RealtimeConfig {
            max_connections_per_user: 2,
            channel_buffer_size: 8,
        })
    }

    fn test_event() -> ServerEvent {
        ServerEvent::DonationConfirmed {
            request_id: Uuid::new_v4(),
            units_provided: 1,
            donation_count: 1,
            badges: vec!["First Drop".into()],
        }
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let registry = registry();
        let user = Uuid::new_v4();

        let (handle, _rx) = registry.register(user, "alice".into());
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.user_count(), 1);

        registry.unregister(&handle.id);
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.user_count(), 0);
    }

    #[tokio::test]
    async fn test_no_delivery_before_join() {
        let registry = registry();
        let user = Uuid::new_v4();
        let (handle, mut rx) = registry.register(user, "alice".into());

        assert!(!registry.is_online(user));
        registry.send_to_user(user, &test_event()).await;
        assert!(rx.try_recv().is_err());

        registry.join(&handle.id);
        assert!(registry.is_online(user));
        registry.send_to_user(user, &test_event()).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_connection_cap_evicts_oldest() {
        let registry = registry();
        let user = Uuid::new_v4();

        let (first, _rx1) = registry.register(user, "alice".into());
        let (_second, _rx2) = registry.register(user, "alice".into());
        let (_third, _rx3) = registry.register(user, "alice".into());

        assert_eq!(registry.connection_count(), 2);
        assert!(first.is_closed());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_unjoined_connections() {
        let registry = registry();
        let (_handle, mut rx) = registry.register(Uuid::new_v4(), "bob".into());

        registry.broadcast(&test_event()).await;
        assert!(rx.try_recv().is_ok());
    }
}
