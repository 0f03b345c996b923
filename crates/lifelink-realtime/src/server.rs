//! Realtime engine — owns the connection registry.

use std::sync::Arc;

use lifelink_core::config::RealtimeConfig;

use crate::connection::ConnectionRegistry;

/// The WebSocket engine shared across the application.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Active connection registry.
    pub connections: Arc<ConnectionRegistry>,
}

impl RealtimeEngine {
    /// Creates a new realtime engine.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            connections: Arc::new(ConnectionRegistry::new(config.clone())),
        }
    }

    /// Total registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.connection_count()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.connections.user_count()
    }
}
