//! Tile sync service — join/part bookkeeping, paint commit, and fan-out.
//!
//! DESIGN
//! ======
//! Handlers in the websocket layer call into these functions; nothing here
//! touches a socket directly. `join` registers the client's outbound queue
//! and takes the snapshot in one write-lock section, which is what makes
//! the protocol ordering hold: every paint committed after the snapshot is
//! observed by the new client as a later `new-tile`, and none can slip in
//! between.
//!
//! ERROR HANDLING
//! ==============
//! `paint` surfaces the store's rejection untouched; the websocket layer
//! logs it and drops the intent without replying (the protocol has no
//! rejection message). Broadcast is best-effort per client: a full queue
//! means a slow or stuck consumer, and skipping it must not stall the rest.

use tiles::{PaintError, ServerMessage, Tile, TileEntry, TilePos};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;

/// Register a client and return the snapshot it must receive first.
///
/// Registration and snapshot are atomic with respect to paints.
pub async fn join(
    state: &AppState,
    client_id: Uuid,
    tx: mpsc::Sender<ServerMessage>,
) -> Vec<TileEntry> {
    let mut canvas = state.canvas.write().await;
    canvas.clients.insert(client_id, tx);
    let snapshot = canvas.store.snapshot();
    info!(%client_id, clients = canvas.clients.len(), tiles = snapshot.len(), "client joined");
    snapshot
}

/// Remove a client's outbound queue.
pub async fn part(state: &AppState, client_id: Uuid) {
    let mut canvas = state.canvas.write().await;
    canvas.clients.remove(&client_id);
    info!(%client_id, remaining = canvas.clients.len(), "client left");
}

/// Validate and commit one paint to the authoritative store.
///
/// # Errors
///
/// Propagates [`PaintError`] for out-of-grid positions or out-of-palette
/// colors; the store is untouched in that case.
pub async fn paint(state: &AppState, pos: TilePos, color: u8) -> Result<Tile, PaintError> {
    let mut canvas = state.canvas.write().await;
    canvas.store.paint(pos, color)
}

/// Fan a message out to every connected client, including the originator.
///
/// Best-effort per client: a full queue is skipped so a slow consumer
/// cannot block the paint path or delivery to its peers.
pub async fn broadcast(state: &AppState, message: &ServerMessage) {
    let canvas = state.canvas.read().await;
    for (client_id, tx) in &canvas.clients {
        if tx.try_send(message.clone()).is_err() {
            warn!(%client_id, "dropping broadcast for slow client");
        }
    }
}
