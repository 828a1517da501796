//! Render-pass contract between the tree walk and the host renderer.

use trellis_geom::Rect;

/// Sink for the back-to-front render walk. Concrete widget drawing lives
/// with the host; the engine only reports walk order, backdrop fills, and
/// hands the painter to widget draw callbacks.
pub trait Painter {
    /// Called before a window's own draw, in paint order.
    fn begin_window(&mut self, name: &str, rect: Rect) {
        let _ = (name, rect);
    }

    /// Fill a window's backdrop.
    fn fill(&mut self, rect: Rect, alpha: f32);
}

/// A recorded paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// A window began drawing.
    Window {
        /// Window name.
        name: String,
        /// Final screen rect.
        rect: Rect,
    },
    /// A backdrop fill.
    Fill {
        /// Filled rect.
        rect: Rect,
        /// Effective alpha.
        alpha: f32,
    },
}

/// Painter that records operations for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// Recorded operations in paint order.
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    /// Construct an empty recording painter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of windows that began drawing, in paint order.
    pub fn window_names(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Window { name, .. } => Some(name.as_str()),
                PaintOp::Fill { .. } => None,
            })
            .collect()
    }
}

impl Painter for RecordingPainter {
    fn begin_window(&mut self, name: &str, rect: Rect) {
        self.ops.push(PaintOp::Window {
            name: name.to_string(),
            rect,
        });
    }

    fn fill(&mut self, rect: Rect, alpha: f32) {
        self.ops.push(PaintOp::Fill { rect, alpha });
    }
}
