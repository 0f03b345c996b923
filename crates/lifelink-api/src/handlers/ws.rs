//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use lifelink_realtime::message::types::{ClientMessage, ServerEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade
    let claims = state.jwt_decoder.decode_access_token(&query.token)?;

    Ok(ws.on_upgrade(move |socket| {
        handle_ws_connection(state, claims.user_id(), claims.username, socket)
    }))
}

/// Handles an established WebSocket connection.
///
/// The connection is registered immediately but receives private-channel
/// events only after the client sends a `join` message.
async fn handle_ws_connection(
    state: AppState,
    user_id: uuid::Uuid,
    username: String,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.realtime.connections.register(user_id, username);
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection established");

    // Forward queued outbound events to the wire.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let parsed: Result<ClientMessage, _> = serde_json::from_str(text.as_str());
                match parsed {
                    Ok(ClientMessage::Join) => {
                        state.realtime.connections.join(&conn_id);
                    }
                    Ok(ClientMessage::Leave) => {
                        state.realtime.connections.leave(&conn_id);
                    }
                    Ok(ClientMessage::Ping) => {
                        if let Ok(pong) = serde_json::to_string(&ServerEvent::Pong) {
                            let _ = handle.send(pong).await;
                        }
                    }
                    Err(e) => {
                        debug!(conn_id = %conn_id, error = %e, "Unparseable client message");
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.connections.unregister(&conn_id);

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection closed");
}
