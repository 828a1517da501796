//! Trellis: a retained-mode UI layout and composition engine.
//!
//! Trellis owns a tree of windows, computes their sizes and positions
//! each frame via a two-pass measure/layout algorithm, routes mouse and
//! keyboard input through the tree with focus management, and renders
//! the tree back-to-front honoring z-order, overlays, and dropdowns.
//! Concrete widget rendering lives with the host: widgets expose a
//! measured minimum size and consume a final rect, a draw callback, and
//! input callbacks.

/// Compass anchors and the pure anchor resolver.
pub mod anchor;
/// Cross-controller focus arbitration.
pub mod arbitrator;
/// The controller: root window and per-frame driver.
pub mod controller;
/// The two-pass layout engine.
mod engine;
/// Core error type.
pub mod error;
/// Input event types.
pub mod event;
/// Per-controller keyboard focus.
mod focus;
/// Layout configuration types.
pub mod layout;
/// Background content loading.
pub mod loading;
/// Window data stored in the arena.
pub mod node;
/// The per-pass relative-to mapping.
mod relative;
/// Render-pass contract.
pub mod render;
/// Display scale collaborator.
pub mod scale;
/// Test utilities.
pub mod testing;
/// The window arena and structural operations.
pub mod tree;
/// Explicit tween state objects.
pub mod tween;
/// Widget behavior trait.
pub mod widget;

pub use anchor::{Anchor, anchor_offset, is_inside};
pub use arbitrator::{ControllerId, FocusArbitrator};
pub use controller::Controller;
pub use error::{Error, Result};
pub use event::{ButtonState, Key, MouseButton, Pointer};
pub use layout::{Layout, LayoutMode, Sizing};
pub use loading::{LoadTask, Loader};
pub use node::{Phase, Window};
pub use render::{PaintOp, Painter, RecordingPainter};
pub use scale::{FixedScale, ScaleProvider};
pub use tree::{Tree, WindowId};
pub use tween::{Easing, Tween, TweenId, TweenScheduler};
pub use widget::Widget;

pub use trellis_geom as geom;
