//! Client session: server reconciliation and the optimistic paint path.
//!
//! Lifecycle: connect → apply the `all-tiles` snapshot → steady state
//! (apply each `new-tile`, emit `place-tile` on local taps) → disconnect.
//! Reconnection re-runs the same handshake; a fresh snapshot supersedes any
//! stale local state.
//!
//! Local paints render immediately and are not rolled back: the session
//! clamps tap coordinates into the grid before emitting, so the server's
//! only rejection cause cannot originate here, and the echoed `new-tile`
//! re-applies the same overwrite (a no-op on screen).

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tiles::{
    COLS, ClientMessage, PaintError, Palette, ROWS, ServerMessage, Tile, TilePos, TileStore,
};

use crate::engine::Action;

/// Rendering capability the host implements over a real 2D context.
pub trait TileRenderer {
    /// Fill exactly one `TILE_SIZE x TILE_SIZE` cell with the palette color.
    fn fill_tile(&mut self, x: u16, y: u16, color: u8);
    /// Clear the whole canvas back to blank.
    fn clear_all(&mut self);
}

/// Error applying a server message to the local state.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("malformed snapshot position key: {0:?}")]
    BadKey(String),
    #[error(transparent)]
    InvalidTile(#[from] PaintError),
}

/// Per-connection client state: local mirror of the tile grid and the
/// currently selected palette color.
#[derive(Debug, Default)]
pub struct ClientSession {
    mirror: TileStore,
    active_color: u8,
}

impl ClientSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected palette index. Defaults to blank (0).
    #[must_use]
    pub fn active_color(&self) -> u8 {
        self.active_color
    }

    /// Select the palette color used for subsequent paints.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::InvalidColor`] for out-of-palette indices,
    /// leaving the selection unchanged.
    pub fn set_active_color(&mut self, index: u8) -> Result<(), PaintError> {
        if !Palette::contains(index) {
            return Err(PaintError::InvalidColor(index));
        }
        self.active_color = index;
        Ok(())
    }

    /// Local color of a cell, as last rendered.
    #[must_use]
    pub fn tile(&self, pos: TilePos) -> u8 {
        self.mirror.get(pos)
    }

    /// Apply one server message to the local mirror and the renderer.
    ///
    /// `all-tiles` resets the mirror and redraws from scratch; `new-tile`
    /// overwrites one cell. Both are idempotent — re-applying the same
    /// message leaves rendered state identical.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] if the server sends a malformed snapshot key
    /// or an out-of-range tile. Validation runs before any mutation, so a
    /// rejected message leaves mirror and canvas untouched.
    pub fn apply_server_message<R: TileRenderer>(
        &mut self,
        message: &ServerMessage,
        renderer: &mut R,
    ) -> Result<(), ApplyError> {
        match message {
            ServerMessage::AllTiles { entries } => {
                let mut snapshot = Vec::with_capacity(entries.len());
                for entry in entries {
                    let pos = TilePos::from_key(&entry.key)
                        .map_err(|_| ApplyError::BadKey(entry.key.clone()))?;
                    if !pos.in_bounds() {
                        return Err(PaintError::OutOfBounds { x: pos.x, y: pos.y }.into());
                    }
                    if !Palette::contains(entry.color) {
                        return Err(PaintError::InvalidColor(entry.color).into());
                    }
                    snapshot.push(Tile { pos, color: entry.color });
                }

                self.mirror = TileStore::new();
                renderer.clear_all();
                for tile in snapshot {
                    let _ = self.mirror.paint(tile.pos, tile.color);
                    renderer.fill_tile(tile.pos.x, tile.pos.y, tile.color);
                }
                Ok(())
            }
            ServerMessage::NewTile { x, y, color } => {
                let tile = self.mirror.paint(TilePos::new(*x, *y), *color)?;
                renderer.fill_tile(tile.pos.x, tile.pos.y, tile.color);
                Ok(())
            }
        }
    }

    /// Optimistic paint at a tapped grid cell: clamp into the grid, render
    /// immediately, and return the `place-tile` intent to send. Clamping
    /// here keeps the server's silent-rejection path unreachable for a
    /// well-behaved client.
    pub fn paint_at<R: TileRenderer>(
        &mut self,
        grid_x: i64,
        grid_y: i64,
        renderer: &mut R,
    ) -> ClientMessage {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let x = grid_x.clamp(0, i64::from(COLS) - 1) as u16;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let y = grid_y.clamp(0, i64::from(ROWS) - 1) as u16;
        let color = self.active_color;

        // Clamped position + validated selection: the mirror cannot reject.
        let _ = self.mirror.paint(TilePos::new(x, y), color);
        renderer.fill_tile(x, y, color);

        ClientMessage::PlaceTile { x, y, color }
    }

    /// Convenience glue for hosts: turn an engine [`Action`] into the
    /// message to send, if any. Viewport changes are the host's concern.
    pub fn handle_action<R: TileRenderer>(
        &mut self,
        action: Action,
        renderer: &mut R,
    ) -> Option<ClientMessage> {
        match action {
            Action::Tapped { grid_x, grid_y } => Some(self.paint_at(grid_x, grid_y, renderer)),
            Action::None | Action::ViewportChanged => None,
        }
    }
}
