use delve_common::RayQuery;
use glam::Vec2;
use std::collections::BTreeMap;
use std::fmt;

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer press in window pixel coordinates (origin top-left, +Y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub viewport: Vec2,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(position: Vec2, viewport: Vec2, button: PointerButton) -> Self {
        Self {
            position,
            viewport,
            button,
        }
    }

    /// Normalized device coordinates: `[-1, 1]` on both axes, +Y up.
    /// `None` for an empty viewport.
    pub fn ndc(&self) -> Option<Vec2> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let unit = self.position / self.viewport;
        Some(Vec2::new(unit.x * 2.0 - 1.0, 1.0 - unit.y * 2.0))
    }
}

/// Identifies a registered handler. Pass it to [`PointerDispatcher::dispose`]
/// to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler = Box<dyn FnMut(&PointerEvent, &dyn RayQuery) -> Option<Action>>;

/// Routes pointer events to handlers registered per button.
///
/// Handlers run in registration order; each may produce one action.
#[derive(Default)]
pub struct PointerDispatcher {
    handlers: BTreeMap<HandlerId, (PointerButton, Handler)>,
    next_id: u64,
}

impl fmt::Debug for PointerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDispatcher")
            .field("handlers", &self.handlers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        button: PointerButton,
        handler: impl FnMut(&PointerEvent, &dyn RayQuery) -> Option<Action> + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, (button, Box::new(handler)));
        tracing::debug!(?id, ?button, "pointer handler registered");
        id
    }

    /// Unregister a handler. Returns false if it was already gone.
    pub fn dispose(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    pub fn dispatch(&mut self, event: &PointerEvent, scene: &dyn RayQuery) -> Vec<Action> {
        self.handlers
            .values_mut()
            .filter(|(button, _)| *button == event.button)
            .filter_map(|(_, handler)| handler(event, scene))
            .collect()
    }
}

/// Standard click-to-move handler: cast the pointer into the scene and move
/// to whatever it hits. A miss produces no action.
pub fn move_to_handler() -> impl FnMut(&PointerEvent, &dyn RayQuery) -> Option<Action> {
    |event: &PointerEvent, scene: &dyn RayQuery| {
        let ndc = event.ndc()?;
        match scene.intersect(ndc) {
            Some(point) => Some(Action::MoveTo(point)),
            None => {
                tracing::debug!(x = ndc.x, y = ndc.y, "pointer ray hit nothing");
                None
            }
        }
    }
}
