//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use staylink_core::traits::VerifiedToken;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade.
///
/// The token is verified before the upgrade so an invalid handshake is a
/// plain 401, never an accepted-then-dropped socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let identity = state.authenticator.authenticate(&query.token).await?;
    Ok(ws.on_upgrade(move |socket| handle_connection(state, identity, socket)))
}

/// Drives one established WebSocket connection.
async fn handle_connection(state: AppState, identity: VerifiedToken, socket: WebSocket) {
    let user_id = identity.user_id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = match state.engine.connect(identity).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Failed to open realtime session");
            return;
        }
    };
    let session_id = handle.id;

    info!(session_id = %session_id, user_id = %user_id, "WebSocket connection established");

    // Outbound forwarder: drains the session queue into the socket until
    // the queue ends or the session is closed (eviction, shutdown).
    let forward_handle = handle.clone();
    let outbound_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe = outbound_rx.recv() => match maybe {
                    Some(frame) => {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = forward_handle.closed() => break,
            }
        }
        let _ = ws_tx.close().await;
    });

    // Inbound loop: every text frame gets exactly one ack, queued behind
    // any broadcasts already in flight.
    loop {
        tokio::select! {
            _ = handle.closed() => break,
            maybe = ws_rx.next() => match maybe {
                Some(Ok(Message::Text(text))) => {
                    let ack = state.engine.handle_frame(&handle, text.as_str()).await;
                    handle.send(ack);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(session_id = %session_id, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    state.engine.disconnect(session_id).await;
    outbound_task.abort();

    info!(session_id = %session_id, user_id = %user_id, "WebSocket connection closed");
}
