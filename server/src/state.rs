//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the single authoritative canvas: the tile store plus the map of
//! connected clients. Everything lives in memory — the store is the source
//! of truth for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tiles::{ServerMessage, TileStore};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

// =============================================================================
// CANVAS STATE
// =============================================================================

/// The live canvas: authoritative tile store and connected clients.
///
/// Each client's sender is an independent bounded queue, so one slow
/// consumer never stalls delivery to the rest.
pub struct CanvasState {
    /// Authoritative position -> color map. Last-writer-wins per cell.
    pub store: TileStore,
    /// Connected clients: `client_id` -> sender for outgoing messages.
    pub clients: HashMap<Uuid, mpsc::Sender<ServerMessage>>,
}

impl CanvasState {
    #[must_use]
    pub fn new() -> Self {
        Self { store: TileStore::new(), clients: HashMap::new() }
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum — the inner canvas
/// is Arc-wrapped, so clones observe the same store and client map.
#[derive(Clone)]
pub struct AppState {
    pub canvas: Arc<RwLock<CanvasState>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { canvas: Arc::new(RwLock::new(CanvasState::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
