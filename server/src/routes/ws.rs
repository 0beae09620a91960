//! WebSocket handler — snapshot on join, then bidirectional relay.
//!
//! DESIGN
//! ======
//! On upgrade, the connection registers an outbound queue and atomically
//! takes the store snapshot, then enters a `select!` loop:
//! - Incoming `place-tile` intents → validate + commit + fan out
//! - Broadcast messages from peers → forward to this client
//!
//! The queue-then-snapshot order is what guarantees the protocol invariant:
//! `all-tiles` is the first message on every connection, and every paint
//! committed afterwards arrives as a `new-tile`.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register queue + snapshot → send `all-tiles`
//! 2. Client sends `place-tile` → commit → broadcast `new-tile` to all,
//!    including the sender (its echo rides its own queue)
//! 3. Invalid paints are logged and dropped without a reply
//! 4. Close → deregister queue

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tiles::{ClientMessage, ServerMessage, TilePos};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::sync;
use crate::state::AppState;

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

/// Outbound queue depth per client. A queue this far behind marks a slow
/// consumer; broadcasts to it are dropped rather than awaited.
const CLIENT_QUEUE_CAPACITY: usize = 256;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<ServerMessage>(CLIENT_QUEUE_CAPACITY);

    let entries = sync::join(&state, client_id, client_tx).await;
    let snapshot = ServerMessage::AllTiles { entries };
    if send_message(&mut socket, &snapshot).await.is_err() {
        sync::part(&state, client_id).await;
        return;
    }
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => dispatch_text(&state, client_id, &text).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(message) = client_rx.recv() => {
                if send_message(&mut socket, &message).await.is_err() {
                    break;
                }
            }
        }
    }

    sync::part(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Decode and apply one inbound text message.
///
/// Committed paints fan out to every connected client, including the
/// sender. Malformed messages and rejected paints are dropped without a
/// reply — the only rejection cause is input a well-behaved client clamps
/// away before sending.
async fn dispatch_text(state: &AppState, client_id: Uuid, text: &str) {
    let message = match tiles::decode_client(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound message");
            return;
        }
    };

    match message {
        ClientMessage::PlaceTile { x, y, color } => {
            match sync::paint(state, TilePos::new(x, y), color).await {
                Ok(tile) => {
                    let message =
                        ServerMessage::NewTile { x: tile.pos.x, y: tile.pos.y, color: tile.color };
                    sync::broadcast(state, &message).await;
                }
                Err(e) => {
                    warn!(%client_id, error = %e, "ws: rejected paint");
                }
            }
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    socket
        .send(Message::Text(tiles::encode(message).into()))
        .await
        .map_err(|_| ())
}
