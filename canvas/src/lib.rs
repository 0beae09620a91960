//! Client-side core for the shared pixel canvas.
//!
//! This crate owns the browser-independent half of a canvas client: the
//! pan/zoom viewport math, the pointer gesture state machine that separates
//! taps from drags and pinch-zooms, and the session logic that reconciles
//! local optimistic paints against server broadcasts. The host layer is
//! responsible only for wiring DOM events into [`engine::InputEngine`],
//! applying the viewport's CSS transform, implementing
//! [`session::TileRenderer`] over a real 2D context, and moving
//! [`tiles::ClientMessage`]s over the websocket.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`camera`] | Pan/zoom viewport and screen-to-grid conversion |
//! | [`input`] | Pointer/gesture types and the gesture state machine |
//! | [`engine`] | Event-driven input engine emitting [`engine::Action`]s |
//! | [`session`] | Snapshot + broadcast reconciliation, optimistic paint |
//! | [`consts`] | Tuning constants (drag threshold, zoom limits) |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod input;
pub mod session;
