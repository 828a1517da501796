//! Test utilities: reusable widgets and a harness around an arbitrator
//! with a single pre-registered controller.

use std::sync::{Arc, Mutex, mpsc};

use trellis_geom::{Rect, Vec2};

use crate::{
    arbitrator::{ControllerId, FocusArbitrator},
    controller::Controller,
    error::{Error, Result},
    event::{ButtonState, Key, MouseButton},
    loading::LoadTask,
    render::{Painter, RecordingPainter},
    tree::{Tree, WindowId},
    widget::Widget,
};

/// Shared event log filled in by test widgets.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Construct an empty event log.
pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Drain an event log into a plain vector.
pub fn drain_log(log: &EventLog) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

/// A configurable test widget that records lifecycle and input events.
pub struct TWidget {
    /// Tag used as the prefix of every logged event.
    tag: String,
    /// Intrinsic minimum size.
    min: Vec2,
    /// Event log sink, if any.
    log: Option<EventLog>,
    /// Accept keyboard focus.
    accepts_focus: bool,
    /// Propagate key events to the parent.
    propagate_keys: bool,
    /// Report the draw as consumed, suppressing children.
    consume_draw: bool,
}

impl TWidget {
    /// A minimal widget with a tag and zero intrinsic size.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            min: Vec2::ZERO,
            log: None,
            accepts_focus: false,
            propagate_keys: true,
            consume_draw: false,
        }
    }

    /// Set the intrinsic minimum size.
    pub fn with_min(mut self, min: Vec2) -> Self {
        self.min = min;
        self
    }

    /// Attach an event log.
    pub fn with_log(mut self, log: &EventLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Accept keyboard focus.
    pub fn focusable(mut self) -> Self {
        self.accepts_focus = true;
        self
    }

    /// Stop key events from bubbling past this widget.
    pub fn swallow_keys(mut self) -> Self {
        self.propagate_keys = false;
        self
    }

    /// Report draws as consumed so children are skipped.
    pub fn consuming_draw(mut self) -> Self {
        self.consume_draw = true;
        self
    }

    /// Append an event to the log, if one is attached.
    fn record(&self, event: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("{}:{}", self.tag, event));
        }
    }
}

impl Widget for TWidget {
    fn measure(&mut self, _avail: Vec2, scale: Vec2) -> Vec2 {
        self.min * scale
    }

    fn draw(&mut self, _painter: &mut dyn Painter, _rect: Rect, _alpha: f32) -> bool {
        self.consume_draw
    }

    fn on_key(&mut self, _key: Key, _state: ButtonState, _mouse: Vec2) -> bool {
        self.record("key");
        self.propagate_keys
    }

    fn on_mouse_enter(&mut self) {
        self.record("enter");
    }

    fn on_mouse_leave(&mut self) {
        self.record("leave");
    }

    fn on_open(&mut self) {
        self.record("open");
    }

    fn on_close(&mut self) {
        self.record("close");
    }

    fn on_focus_gained(&mut self) {
        self.record("focus");
    }

    fn on_focus_lost(&mut self) {
        self.record("blur");
    }

    fn accepts_focus(&self) -> bool {
        self.accepts_focus
    }
}

/// A widget whose content load blocks until the test releases a gate, or
/// fails immediately when constructed failing.
pub struct GatedLoad {
    /// Gate receiver handed to the load task on first dispatch.
    rx: Option<mpsc::Receiver<()>>,
    /// Fail the task instead of completing it.
    fail: bool,
}

impl GatedLoad {
    /// A widget whose load completes when the returned sender fires.
    pub fn gated() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                rx: Some(rx),
                fail: false,
            },
            tx,
        )
    }

    /// A widget whose load fails once, then completes on retry.
    pub fn failing() -> Self {
        Self {
            rx: None,
            fail: true,
        }
    }
}

impl Widget for GatedLoad {
    fn load(&mut self) -> Option<Box<dyn LoadTask>> {
        if self.fail {
            self.fail = false;
            return Some(Box::new(|| -> Result<()> {
                Err(Error::Load("gated load failure".into()))
            }));
        }
        let rx = self.rx.take()?;
        Some(Box::new(move || -> Result<()> {
            rx.recv().map_err(|e| Error::Load(e.to_string()))
        }))
    }
}

/// Test harness: an arbitrator with one pre-registered controller.
pub struct Harness {
    /// The arbitration service under test.
    pub arbitrator: FocusArbitrator,
    /// The pre-registered controller.
    pub controller: ControllerId,
}

impl Harness {
    /// Build a harness with a free-layout root of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_controller(Controller::new(
            Box::new(TWidget::new("root")),
            "root",
            Rect::new(0.0, 0.0, width, height),
        ))
    }

    /// Build a harness around an explicit controller.
    pub fn with_controller(controller: Controller) -> Self {
        let mut arbitrator = FocusArbitrator::new();
        let controller = arbitrator.register(controller);
        Self {
            arbitrator,
            controller,
        }
    }

    /// Borrow the primary controller.
    pub fn ctrl(&self) -> &Controller {
        self.arbitrator.controller(self.controller).unwrap()
    }

    /// Borrow the primary controller mutably.
    pub fn ctrl_mut(&mut self) -> &mut Controller {
        self.arbitrator.controller_mut(self.controller).unwrap()
    }

    /// Borrow the primary controller's tree.
    pub fn tree(&self) -> &Tree {
        self.ctrl().tree()
    }

    /// Borrow the primary controller's tree mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.ctrl_mut().tree_mut()
    }

    /// Attach a new window under a parent in the primary tree.
    pub fn add(
        &mut self,
        parent: WindowId,
        widget: impl Widget,
        name: &str,
    ) -> Result<WindowId> {
        let tree = self.tree_mut();
        let id = tree.insert(Box::new(widget), name);
        tree.attach(parent, id)?;
        Ok(id)
    }

    /// Advance one frame at a nominal 60 Hz.
    pub fn tick(&mut self) {
        self.arbitrator.tick(1.0 / 60.0);
    }

    /// Move the shared cursor.
    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.arbitrator.mouse_moved(Vec2::new(x, y));
    }

    /// Press a mouse button.
    pub fn press(&mut self, button: MouseButton) {
        self.arbitrator.mouse_button(button, ButtonState::Pressed);
    }

    /// Release a mouse button.
    pub fn release(&mut self, button: MouseButton) {
        self.arbitrator.mouse_button(button, ButtonState::Released);
    }

    /// Render the primary controller into a recording painter.
    pub fn render(&mut self) -> RecordingPainter {
        let mut painter = RecordingPainter::new();
        self.ctrl_mut().render(&mut painter);
        painter
    }
}
