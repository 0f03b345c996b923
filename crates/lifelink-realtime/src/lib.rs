//! # lifelink-realtime
//!
//! WebSocket push layer. Connections register into a process-scoped
//! registry with explicit connect/disconnect lifecycle; the event
//! dispatcher fans blood-request events out to per-user channels and
//! persists the durable notification record before each emit.
//!
//! Socket delivery is fire-and-forget best-effort: a recipient without a
//! joined connection simply misses the live event and reads the persisted
//! notification later.

pub mod connection;
pub mod dispatcher;
pub mod message;
pub mod server;

pub use dispatcher::EventDispatcher;
pub use server::RealtimeEngine;
