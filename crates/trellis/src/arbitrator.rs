//! Cross-controller focus arbitration.
//!
//! All live controllers share one mouse and one keyboard. The arbitrator
//! owns the ordered controller list (register on create, unregister on
//! dispose; no process-wide statics) and resolves mouse focus at most
//! once per tick, so exactly one controller's subtree ever reports
//! "mouse inside".

use slotmap::{SlotMap, new_key_type};
use trellis_geom::Vec2;

use crate::{
    controller::Controller,
    event::{ButtonState, Key, MouseButton, Pointer},
    tree::WindowId,
};

new_key_type! {
    /// Opaque identifier for a registered controller.
    pub struct ControllerId;
}

/// An in-progress button drag: the controller and window that held mouse
/// focus when the button went down.
#[derive(Debug, Clone, Copy)]
struct Drag {
    /// Controller owning the drag.
    controller: ControllerId,
    /// Window the button went down on.
    window: WindowId,
    /// The held button.
    button: MouseButton,
}

/// The shared focus-arbitration service.
pub struct FocusArbitrator {
    /// Registered controllers.
    controllers: SlotMap<ControllerId, Controller>,
    /// Controller ids in input-priority order, highest first. Stable for
    /// equal priorities: registration order is preserved.
    order: Vec<ControllerId>,
    /// Current tick index.
    tick: u64,
    /// Tick the mouse-focus resolution last ran for; the once-per-tick
    /// gate.
    mouse_tick: u64,
    /// Shared pointer state.
    pointer: Pointer,
    /// Active button drag, if any.
    drag: Option<Drag>,
}

impl Default for FocusArbitrator {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusArbitrator {
    /// Construct an arbitrator with no controllers.
    pub fn new() -> Self {
        Self {
            controllers: SlotMap::with_key(),
            order: Vec::new(),
            tick: 0,
            mouse_tick: 0,
            pointer: Pointer::default(),
            drag: None,
        }
    }

    /// Register a controller. Controllers are queried in priority order,
    /// highest first; ties keep registration order.
    pub fn register(&mut self, controller: Controller) -> ControllerId {
        let id = self.controllers.insert(controller);
        self.order.push(id);
        let controllers = &self.controllers;
        self.order
            .sort_by_key(|cid| std::cmp::Reverse(controllers[*cid].priority()));
        id
    }

    /// Unregister and return a controller.
    pub fn unregister(&mut self, id: ControllerId) -> Option<Controller> {
        self.order.retain(|cid| *cid != id);
        if self.drag.is_some_and(|d| d.controller == id) {
            self.drag = None;
        }
        self.controllers.remove(id)
    }

    /// Borrow a registered controller.
    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(id)
    }

    /// Borrow a registered controller mutably.
    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(id)
    }

    /// Registered controller ids in priority order.
    pub fn controller_ids(&self) -> &[ControllerId] {
        &self.order
    }

    /// The current shared pointer state.
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// The current tick index.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick: update every active controller in priority
    /// order, then resolve mouse focus (unless a host mouse-move already
    /// resolved it this tick).
    pub fn tick(&mut self, dt: f32) {
        self.tick += 1;
        let order = self.order.clone();
        for cid in order {
            let tick = self.tick;
            let pointer = self.pointer;
            if let Some(controller) = self.controllers.get_mut(cid) {
                if controller.is_active() {
                    controller.update(tick, dt, &pointer);
                }
            }
        }
        self.resolve_mouse_focus();
    }

    /// Host mouse-move event. Updates the shared cursor position and runs
    /// the focus resolution if it has not already run this tick.
    pub fn mouse_moved(&mut self, pos: Vec2) {
        self.pointer.pos = pos;
        self.resolve_mouse_focus();
    }

    /// Host mouse-button event. Tracks drag state and routes the event to
    /// the controller that owns mouse focus.
    pub fn mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        self.pointer.buttons[button.index()] = state == ButtonState::Pressed;

        match state {
            ButtonState::Pressed => {
                if self.drag.is_none() {
                    if let Some((controller, window)) = self.focus_owner() {
                        self.drag = Some(Drag {
                            controller,
                            window,
                            button,
                        });
                    }
                }
            }
            ButtonState::Released => {
                if self.drag.is_some_and(|d| d.button == button) {
                    self.drag = None;
                }
            }
        }

        if let Some((cid, _)) = self.focus_owner() {
            let pos = self.pointer.pos;
            if let Some(controller) = self.controllers.get_mut(cid) {
                controller.mouse_button(button, state, pos);
            }
        }
    }

    /// Host key event. Keyboard focus is scoped per controller; the event
    /// goes to the highest-priority controller holding a keyboard focus.
    pub fn key_event(&mut self, key: Key, state: ButtonState) {
        let target = self
            .order
            .iter()
            .copied()
            .find(|cid| {
                self.controllers
                    .get(*cid)
                    .is_some_and(|c| c.key_focus().is_some())
            });
        if let Some(cid) = target {
            let pos = self.pointer.pos;
            if let Some(controller) = self.controllers.get_mut(cid) {
                controller.key_event(key, state, pos);
            }
        }
    }

    /// The controller currently owning mouse focus, with its window.
    fn focus_owner(&self) -> Option<(ControllerId, WindowId)> {
        self.order.iter().copied().find_map(|cid| {
            self.controllers
                .get(cid)
                .and_then(|c| c.mouse_focus().map(|w| (cid, w)))
        })
    }

    /// Resolve which single controller owns mouse focus this tick.
    ///
    /// An active button drag keeps focus where the button went down; the
    /// cursor crossing another controller's window must not steal it.
    /// Otherwise each active controller is queried in priority order for
    /// a window under the cursor and the first hit wins. Every controller
    /// not selected has its focus explicitly cleared, firing mouse-leave.
    fn resolve_mouse_focus(&mut self) {
        if self.mouse_tick == self.tick {
            return;
        }
        self.mouse_tick = self.tick;

        if let Some(drag) = self.drag {
            let holding = self.pointer.is_down(drag.button)
                && self
                    .controllers
                    .get(drag.controller)
                    .is_some_and(|c| c.mouse_focus() == Some(drag.window));
            if holding {
                let order = self.order.clone();
                let pos = self.pointer.pos;
                for cid in order {
                    if cid == drag.controller {
                        // Keep the focus window, but report cursor motion.
                        if let Some(controller) = self.controllers.get_mut(cid) {
                            controller.set_mouse_focus(Some(drag.window), pos);
                        }
                    } else if let Some(controller) = self.controllers.get_mut(cid) {
                        controller.clear_mouse_focus();
                    }
                }
                return;
            }
            self.drag = None;
        }

        let order = self.order.clone();
        let pos = self.pointer.pos;
        let tick = self.tick;
        let mut winner = None;
        for cid in order {
            let Some(controller) = self.controllers.get_mut(cid) else {
                continue;
            };
            if !controller.is_active_for(tick) {
                controller.clear_mouse_focus();
                continue;
            }
            if winner.is_none() {
                if let Some(hit) = controller.window_under_mouse(pos) {
                    controller.set_mouse_focus(Some(hit), pos);
                    winner = Some(cid);
                    continue;
                }
            }
            controller.clear_mouse_focus();
        }
    }
}
