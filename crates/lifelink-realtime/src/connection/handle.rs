//! Connection handle — the send side of one WebSocket connection.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for a single WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one registered connection.
///
/// Holds the outbound message sender; the socket task owns the matching
/// receiver and forwards everything to the wire.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection identifier.
    pub id: ConnectionId,
    /// The authenticated user this connection belongs to.
    pub user_id: Uuid,
    /// Username, for logging.
    pub username: String,
    /// Outbound message sender.
    sender: mpsc::Sender<String>,
    /// Set once the connection is being torn down.
    closed: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new handle.
    pub fn new(user_id: Uuid, username: String, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            username,
            sender,
            closed: AtomicBool::new(false),
        }
    }

    /// Queue a serialized message for delivery.
    ///
    /// Fails when the connection is closed or its buffer is gone; callers
    /// treat failure as "recipient not reachable" and move on.
    pub async fn send(&self, message: String) -> Result<(), ()> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(());
        }
        self.sender.send(message).await.map_err(|_| ())
    }

    /// Mark this connection as closed.
    pub fn mark_closed(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }

    /// Whether the connection has been marked closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}
