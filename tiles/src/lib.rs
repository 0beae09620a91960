//! Shared tile model and wire protocol for the pixel canvas.
//!
//! This crate owns everything the server and the client core must agree on:
//! the grid dimensions, the fixed 12-color palette, the authoritative
//! [`TileStore`], and the tagged JSON messages exchanged over the realtime
//! transport. Validation happens here, at the model boundary — callers get a
//! typed [`PaintError`] instead of silently corrupted state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

// =============================================================================
// GRID CONSTANTS
// =============================================================================

/// Grid width in tiles.
pub const COLS: u16 = 100;

/// Grid height in tiles.
pub const ROWS: u16 = 80;

/// Edge length of one tile in canvas pixels at scale 1:1.
pub const TILE_SIZE: u16 = 10;

// =============================================================================
// PALETTE
// =============================================================================

/// The fixed, ordered color palette. Index is the wire representation.
///
/// Index 0 is the blank/background color; every grid cell starts there.
pub struct Palette;

impl Palette {
    /// CSS values for each palette index, in wire order.
    pub const CSS: [&'static str; 12] = [
        "#fff", "#999", "#666", "#333", "#000", "#840", "#f00", "#f80", "#ff0",
        "#0f0", "#00f", "#f0f",
    ];

    /// Number of selectable colors.
    pub const LEN: u8 = Self::CSS.len() as u8;

    /// The blank/background color index.
    pub const BLANK: u8 = 0;

    /// Resolve a palette index to its CSS color value.
    #[must_use]
    pub fn css(index: u8) -> Option<&'static str> {
        Self::CSS.get(usize::from(index)).copied()
    }

    /// Whether `index` names a palette color.
    #[must_use]
    pub fn contains(index: u8) -> bool {
        index < Self::LEN
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// A grid cell position. Only positions inside `[0,COLS) x [0,ROWS)` name
/// real cells; construction does not validate — the store boundary does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: u16,
    pub y: u16,
}

impl TilePos {
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Whether this position lies inside the grid.
    #[must_use]
    pub fn in_bounds(self) -> bool {
        self.x < COLS && self.y < ROWS
    }

    /// Canonical `"x,y"` key used for `all-tiles` snapshot entries.
    #[must_use]
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse a canonical `"x,y"` key back into a position.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKey`] if the key is not two
    /// comma-separated unsigned integers.
    pub fn from_key(key: &str) -> Result<Self, CodecError> {
        let Some((x, y)) = key.split_once(',') else {
            return Err(CodecError::InvalidKey(key.to_string()));
        };
        let x = x
            .parse()
            .map_err(|_| CodecError::InvalidKey(key.to_string()))?;
        let y = y
            .parse()
            .map_err(|_| CodecError::InvalidKey(key.to_string()))?;
        Ok(Self { x, y })
    }
}

/// One grid cell with its committed color. Returned by [`TileStore::paint`]
/// so the caller has the exact value to broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub pos: TilePos,
    pub color: u8,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Rejection reason for an invalid paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    #[error("position ({x}, {y}) outside the {COLS}x{ROWS} grid")]
    OutOfBounds { x: u16, y: u16 },
    #[error("color index {0} outside the palette (0..{len})", len = Palette::LEN)]
    InvalidColor(u8),
}

/// Error returned when decoding wire messages or snapshot keys.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid message json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid position key: {0:?}")]
    InvalidKey(String),
}

// =============================================================================
// TILE STORE
// =============================================================================

/// Map from grid position to committed color index.
///
/// Last-writer-wins by construction: each paint is a single-key overwrite,
/// and concurrent paints to the same position resolve by arrival order. The
/// store only grows — cells are repainted, never deleted.
#[derive(Debug, Default)]
pub struct TileStore {
    tiles: HashMap<TilePos, u8>,
}

impl TileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and commit one paint. On success the previous color is
    /// overwritten unconditionally and the committed tile is returned for
    /// broadcast. On rejection the store is untouched.
    ///
    /// # Errors
    ///
    /// [`PaintError::OutOfBounds`] for positions outside the grid,
    /// [`PaintError::InvalidColor`] for out-of-palette color indices.
    pub fn paint(&mut self, pos: TilePos, color: u8) -> Result<Tile, PaintError> {
        if !pos.in_bounds() {
            return Err(PaintError::OutOfBounds { x: pos.x, y: pos.y });
        }
        if !Palette::contains(color) {
            return Err(PaintError::InvalidColor(color));
        }
        self.tiles.insert(pos, color);
        Ok(Tile { pos, color })
    }

    /// Current color of a cell; blank until painted.
    #[must_use]
    pub fn get(&self, pos: TilePos) -> u8 {
        self.tiles.get(&pos).copied().unwrap_or(Palette::BLANK)
    }

    /// Snapshot every painted tile as `all-tiles` entries. Order is
    /// unspecified.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TileEntry> {
        self.tiles
            .iter()
            .map(|(pos, color)| TileEntry { key: pos.key(), color: *color })
            .collect()
    }

    /// Number of painted cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// One entry of an `all-tiles` snapshot: canonical position key and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEntry {
    pub key: String,
    pub color: u8,
}

/// Messages a client sends to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Paint intent for one cell. Invalid intents are dropped server-side
    /// without a reply.
    PlaceTile { x: u16, y: u16, color: u8 },
}

/// Messages the server sends to a client. Per connection, `all-tiles`
/// arrives exactly once, before any `new-tile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Full store snapshot, sent immediately on connect.
    AllTiles { entries: Vec<TileEntry> },
    /// Broadcast of one committed paint, sent to every connected client
    /// including the originator.
    NewTile { x: u16, y: u16, color: u8 },
}

/// Encode a message as JSON text for the transport.
///
/// Never fails in practice: both message enums serialize to plain JSON
/// objects with no non-string map keys.
#[must_use]
pub fn encode<T: Serialize>(message: &T) -> String {
    serde_json::to_string(message).unwrap_or_default()
}

/// Decode an inbound client message.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed or unknown messages. Negative
/// or non-numeric coordinates fail here, before any store logic runs.
pub fn decode_client(text: &str) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode an inbound server message.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed or unknown messages.
pub fn decode_server(text: &str) -> Result<ServerMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}
